use std::fs;

use crate::core::services::error::ServiceError;
use crate::core::ToolCore;
use crate::data::User;

/// What happened to a user's save file while adding the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFileStatus {
    Created,
    Replaced,
    Kept,
}

pub struct UserService;

impl UserService {
    /// Make sure each user is listed in `.locals` with a usable save file.
    pub fn add_users(core: &ToolCore, users: &[&str]) -> Result<Vec<SaveFileStatus>, ServiceError> {
        let locals = core.locals_path();
        println!("Checking for users in {}", locals.display());
        let store = core.open_locals()?;

        let mut statuses = Vec::with_capacity(users.len());
        for &user in users {
            let added = store.add_user(user)?;
            if added {
                println!("  Added {}", user);
                tracing::info!(user = %user, "Added game user");
            } else {
                println!("  {} already present", user);
                let expected = User::expected_save_file(user);
                let save_file = store.save_file_of(user)?.unwrap_or_default();
                if save_file != expected {
                    return Err(ServiceError::StoreInconsistent(format!(
                        "User {} should reference save file {} but references save file {}",
                        user, expected, save_file
                    )));
                }
            }
            statuses.push(Self::ensure_save_file(core, user)?);
        }
        Ok(statuses)
    }

    /// Remove the users the tool added. Users pointing at other save files
    /// are left alone.
    pub fn remove_users(core: &ToolCore, users: &[&str]) -> Result<usize, ServiceError> {
        let locals = core.locals_path();
        println!("Removing tournament users from {}", locals.display());
        let store = core.open_locals()?;

        let mut removed = 0;
        for &user in users {
            if store.remove_user(user)? {
                println!("  Deleted {}", user);
                tracing::info!(user = %user, "Removed game user");
                removed += 1;
            } else {
                println!("  {} not present", user);
            }
        }
        Ok(removed)
    }

    /// Create the user's save file from the template, or replace it when it
    /// is smaller than the template.
    fn ensure_save_file(core: &ToolCore, user: &str) -> Result<SaveFileStatus, ServiceError> {
        let template = core.save_template_path();
        let min_len = fs::metadata(&template)
            .map_err(ServiceError::io(&template))?
            .len();
        let save_file = core.save_file_path(user);

        match fs::metadata(&save_file) {
            Ok(meta) if meta.len() < min_len => {
                println!(
                    "    Save file {} too small ({}) to be valid. Replacing with new save file ({} bytes)",
                    save_file.display(),
                    meta.len(),
                    min_len
                );
                fs::copy(&template, &save_file).map_err(ServiceError::io(&save_file))?;
                Ok(SaveFileStatus::Replaced)
            }
            Ok(meta) => {
                println!(
                    "    Existing save file {} looks ok ({} bytes)",
                    save_file.display(),
                    meta.len()
                );
                Ok(SaveFileStatus::Kept)
            }
            Err(_) => {
                println!(
                    "    Creating new save file {} ({} bytes)",
                    save_file.display(),
                    min_len
                );
                let save_dir = core.save_dir();
                fs::create_dir_all(&save_dir).map_err(ServiceError::io(&save_dir))?;
                fs::copy(&template, &save_file).map_err(ServiceError::io(&save_file))?;
                Ok(SaveFileStatus::Created)
            }
        }
    }
}
