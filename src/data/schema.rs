//! Tables of the game's save files.
//!
//! The game creates and owns the real files; these definitions only exist to
//! create empty ones (fresh users, tests). Column order matches the game,
//! because inserts are positional.

use rusqlite::{params, Connection};

/// One table of a save file.
pub struct Table {
    pub name: &'static str,
    pub sql: &'static str,
}

/// Tables of a `<user>.user` save file, in creation order.
pub const SAVE_TABLES: &[Table] = &[
    Table {
        name: "ResearchNet",
        sql: r#"
            CREATE TABLE IF NOT EXISTS ResearchNet (
                level_id TEXT PRIMARY KEY,
                created TEXT NOT NULL,
                definition TEXT NOT NULL
            );
        "#,
    },
    Table {
        name: "Level",
        sql: r#"
            CREATE TABLE IF NOT EXISTS Level (
                id TEXT PRIMARY KEY,
                passed INTEGER NOT NULL,
                mastered INTEGER NOT NULL,
                cycles INTEGER NOT NULL,
                symbols INTEGER NOT NULL,
                reactors INTEGER NOT NULL,
                best_cycles INTEGER NOT NULL,
                best_symbols INTEGER NOT NULL,
                best_reactors INTEGER NOT NULL
            );
        "#,
    },
    Table {
        name: "Component",
        sql: r#"
            CREATE TABLE IF NOT EXISTS Component (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                level_id TEXT NOT NULL,
                type TEXT NOT NULL,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                name TEXT,
                p1 INTEGER,
                p2 INTEGER,
                p3 INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_component_level ON Component(level_id);
        "#,
    },
    Table {
        name: "Member",
        sql: r#"
            CREATE TABLE IF NOT EXISTS Member (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                component_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                arrow_dir INTEGER NOT NULL,
                choice INTEGER NOT NULL,
                layer INTEGER NOT NULL,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                element_type INTEGER NOT NULL,
                element INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_member_component ON Member(component_id);
        "#,
    },
    Table {
        name: "Pipe",
        sql: r#"
            CREATE TABLE IF NOT EXISTS Pipe (
                component_id INTEGER NOT NULL,
                output_id INTEGER NOT NULL,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL
            );
        "#,
    },
    Table {
        name: "Annotation",
        sql: r#"
            CREATE TABLE IF NOT EXISTS Annotation (
                component_id INTEGER NOT NULL,
                output_id INTEGER NOT NULL,
                expanded INTEGER NOT NULL,
                x INTEGER NOT NULL,
                y INTEGER NOT NULL,
                annotation TEXT NOT NULL
            );
        "#,
    },
];

/// The user list kept in `.locals`.
pub const LOCALS_TABLES: &[Table] = &[Table {
    name: "User",
    sql: r#"
        CREATE TABLE IF NOT EXISTS User (
            name TEXT PRIMARY KEY,
            flags INTEGER NOT NULL,
            save_file TEXT NOT NULL,
            last_played TEXT
        );
    "#,
}];

/// Create any missing save file tables.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    create_tables(conn, SAVE_TABLES)
}

/// Create the `.locals` user table if missing.
pub fn ensure_locals_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    create_tables(conn, LOCALS_TABLES)
}

fn create_tables(conn: &mut Connection, tables: &[Table]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    for table in tables {
        if table_exists(&tx, table.name)? {
            continue;
        }
        tracing::info!(table = table.name, "Creating table");
        if let Err(e) = tx.execute_batch(table.sql) {
            tracing::error!(table = table.name, error = %e, "Creating table failed");
            return Err(e);
        }
    }
    tx.commit()
}

pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
