use std::fs;
use std::path::Path;

use crate::core::services::error::ServiceError;
use crate::core::{SaveFile, ToolCore};
use crate::data::{Database, UserStore};

/// Result of one diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Ok,
    Missing,
    Broken,
}

#[derive(Debug, Clone, Default)]
pub struct DiagnoseReport {
    pub checks: Vec<(String, Check)>,
}

impl DiagnoseReport {
    fn record(&mut self, path: &Path, check: Check) -> Check {
        self.checks.push((path.display().to_string(), check));
        check
    }

    pub fn problems(&self) -> usize {
        self.checks.iter().filter(|(_, c)| *c != Check::Ok).count()
    }
}

pub struct DiagnoseService;

impl DiagnoseService {
    /// Report on the game files the tool depends on. Problems are reported,
    /// not returned as errors.
    pub fn run(core: &ToolCore) -> Result<DiagnoseReport, ServiceError> {
        let config = core.config();
        let mut report = DiagnoseReport::default();

        println!("Checking save files");
        check_directory(&mut report, &config.save_path);
        check_sqlite(&mut report, &core.locals_path(), |db| {
            for user in UserStore::new(db.connection()).list_users()? {
                println!(
                    "    User:{} Save:{} Last played:{}",
                    user.name,
                    user.save_file,
                    user.last_played.as_deref().unwrap_or("never")
                );
            }
            Ok(())
        });

        let save_dir = core.save_dir();
        if check_directory(&mut report, &save_dir) == Check::Ok {
            let mut saves = fs::read_dir(&save_dir)
                .map_err(ServiceError::io(&save_dir))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("user"))
                .collect::<Vec<_>>();
            saves.sort();
            for save in saves {
                check_sqlite(&mut report, &save, |db| {
                    let levels = SaveFile::new(db.clone()).levels.count()?;
                    println!("    {} custom levels", levels);
                    Ok(())
                });
            }
        }

        println!("Checking images");
        if check_directory(&mut report, &config.image_path) == Check::Ok {
            for name in ["024.tex", "041.tex"] {
                check_file(&mut report, &config.image_path.join(name));
            }
        }

        Ok(report)
    }
}

fn check_directory(report: &mut DiagnoseReport, path: &Path) -> Check {
    if path.is_dir() {
        println!("  {} found", path.display());
        report.record(path, Check::Ok)
    } else {
        println!("  {} NOT FOUND", path.display());
        report.record(path, Check::Missing)
    }
}

fn check_file(report: &mut DiagnoseReport, path: &Path) -> Check {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let access = if meta.permissions().readonly() {
                "read-only"
            } else {
                "writable"
            };
            println!("  {} found ({} bytes, {})", path.display(), meta.len(), access);
            report.record(path, Check::Ok)
        }
        _ => {
            println!("  {} NOT FOUND", path.display());
            report.record(path, Check::Missing)
        }
    }
}

/// Check that a SQLite file exists, can be read and can be queried.
fn check_sqlite<F>(report: &mut DiagnoseReport, path: &Path, inspect: F) -> Check
where
    F: FnOnce(&Database) -> Result<(), ServiceError>,
{
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => {
            println!("  {} NOT FOUND", path.display());
            return report.record(path, Check::Missing);
        }
    }

    match fs::read(path) {
        Ok(bytes) => println!("  {} read {} bytes", path.display(), bytes.len()),
        Err(e) => {
            println!("  {} CANNOT READ: {}", path.display(), e);
            return report.record(path, Check::Broken);
        }
    }

    let result = Database::open(path)
        .map_err(ServiceError::from)
        .and_then(|db| {
            println!("  {} connected", path.display());
            inspect(&db)
        });
    match result {
        Ok(()) => report.record(path, Check::Ok),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Save file check failed");
            println!("  {} CANNOT CONNECT: {}", path.display(), e);
            report.record(path, Check::Broken)
        }
    }
}
