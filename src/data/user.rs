//! User data access object for the game's `.locals` file

use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use super::database::{lock, DatabaseError};
use super::models::User;

#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Add a user backed by `<name>.user`. Returns false if a user with
    /// that name already exists.
    pub fn add_user(&self, name: &str) -> Result<bool, DatabaseError> {
        let conn = lock(&self.conn)?;
        let added = conn.execute(
            "INSERT OR IGNORE INTO User VALUES (?1, 0, ?2, datetime('now', 'localtime'))",
            params![name, User::expected_save_file(name)],
        )?;
        Ok(added == 1)
    }

    pub fn save_file_of(&self, name: &str) -> Result<Option<String>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let save_file = conn
            .query_row(
                "SELECT save_file FROM User WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(save_file)
    }

    /// Remove a user, but only one the tool could have added.
    pub fn remove_user(&self, name: &str) -> Result<bool, DatabaseError> {
        let conn = lock(&self.conn)?;
        let deleted = conn.execute(
            "DELETE FROM User WHERE name = ?1 AND save_file = ?2",
            params![name, User::expected_save_file(name)],
        )?;
        Ok(deleted == 1)
    }

    pub fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare("SELECT name, save_file, last_played FROM User ORDER BY rowid")?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    name: row.get(0)?,
                    save_file: row.get(1)?,
                    last_played: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
