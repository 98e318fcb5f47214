//! Path utilities for the tool's own data and the game's install

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Set once from `--data-dir`.
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const GAME_DIR: [&str; 2] = ["Zachtronics Industries", "SpaceChem"];

/// Fix the tool's data directory, `~/.schem` unless overridden. Call before
/// logging is set up; later calls are ignored.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        tracing::debug!(path = %path.display(), "Data directory already initialized");
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".schem"))
        .unwrap_or_else(|| PathBuf::from(".schem"))
}

/// Tool data directory (logs live below it).
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// `<data dir>/logs/schem.log`
pub fn log_file_path() -> PathBuf {
    logs_dir().join("schem.log")
}

/// Where the game keeps `.locals` and the `save/` directory.
#[cfg(windows)]
pub fn default_save_path() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    GAME_DIR.iter().fold(base, |path, part| path.join(part))
}

/// Where the game keeps `.locals` and the `save/` directory.
#[cfg(not(windows))]
pub fn default_save_path() -> PathBuf {
    let base = home().join(".local").join("share");
    GAME_DIR.iter().fold(base, |path, part| path.join(part))
}

/// The game's texture directory.
#[cfg(windows)]
pub fn default_image_path() -> PathBuf {
    std::env::var_os("ProgramFiles")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
        .join(r"Steam\steamapps\common\spacechem\images")
}

/// The game's texture directory. The macOS app bundle is preferred when it
/// exists.
#[cfg(not(windows))]
pub fn default_image_path() -> PathBuf {
    let mac = home().join(
        "Library/Application Support/Steam/SteamApps/common/SpaceChem/SpaceChem.app/Contents/Resources/images",
    );
    if mac.is_dir() {
        return mac;
    }
    home().join(".local/share/Steam/SteamApps/common/SpaceChem/images")
}

#[cfg(not(windows))]
fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `.locals`, the game's user list.
pub fn locals_path(save_path: &Path) -> PathBuf {
    save_path.join(".locals")
}

pub fn save_dir(save_path: &Path) -> PathBuf {
    save_path.join("save")
}

/// `save/<user>.user`
pub fn save_file_path(save_path: &Path, user: &str) -> PathBuf {
    save_dir(save_path).join(format!("{}.user", user))
}
