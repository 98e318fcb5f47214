use std::fs;
use std::path::{Path, PathBuf};

use crate::core::services::error::ServiceError;
use crate::core::ToolCore;
use crate::images::{layouts, FeatureImages, ImageDefinition, Texture};

const BACKUP_SUFFIX: &str = ".original";

pub struct ImageService;

impl ImageService {
    /// Put every backed-up texture back in place.
    pub fn restore(core: &ToolCore) -> Result<Vec<PathBuf>, ServiceError> {
        let image_path = &core.config().image_path;
        println!("Reverting changes to {}", image_path.display());

        let mut backups = fs::read_dir(image_path)
            .map_err(ServiceError::io(image_path))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".tex.original"))
            })
            .collect::<Vec<_>>();
        backups.sort();

        let mut restored = Vec::with_capacity(backups.len());
        for backup in backups {
            let image = backup.with_extension("");
            println!("  Reverting {} to {}", image.display(), backup.display());
            if image.exists() {
                fs::remove_file(&image).map_err(ServiceError::io(&image))?;
            }
            fs::rename(&backup, &image).map_err(ServiceError::io(&backup))?;
            restored.push(image);
        }
        Ok(restored)
    }

    /// Paint the features of `<puzzle>.images` onto the reactor textures,
    /// starting from the untouched backups.
    pub fn apply(core: &ToolCore, puzzle: &str) -> Result<Vec<PathBuf>, ServiceError> {
        let lines = core.tournament().image_definition(puzzle)?;
        let definition = ImageDefinition::parse(&lines)?;

        let feature_dir = &core.config().working_dir;
        println!("  Loading reactor feature images from {}", feature_dir.display());
        let images = FeatureImages::from_raw(
            read(&feature_dir.join("nowaldo.tex"))?,
            read(&feature_dir.join("hbarrier.tex"))?,
            read(&feature_dir.join("vbarrier.tex"))?,
        )?;

        let image_path = &core.config().image_path;
        let mut written = Vec::new();
        for layout in layouts(definition.size) {
            let target = image_path.join(layout.file_name);
            let backup = backup_path(&target);
            if !backup.exists() {
                println!("  Copying {} to {}", target.display(), backup.display());
                fs::copy(&target, &backup).map_err(ServiceError::io(&target))?;
            }

            println!(
                "  Using image definition to create {} from {}",
                target.display(),
                backup.display()
            );
            let mut texture = Texture::from_raw(read(&backup)?)?;
            for feature in &definition.features {
                texture.apply(&layout, feature, &images)?;
            }
            fs::write(&target, texture.into_raw()).map_err(ServiceError::io(&target))?;
            tracing::info!(puzzle = %puzzle, texture = %target.display(), "Patched reactor texture");
            written.push(target);
        }
        Ok(written)
    }
}

fn backup_path(image: &Path) -> PathBuf {
    let mut name = image.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn read(path: &Path) -> Result<Vec<u8>, ServiceError> {
    fs::read(path).map_err(ServiceError::io(path))
}
