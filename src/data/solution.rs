//! Solution data access object

use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};

use super::database::{lock, DatabaseError};
use super::level::create_custom_level;
use crate::solution::{
    Annotation, BuiltSolution, Component, ComponentBlock, Layer, Member, Pipe,
    SolutionRecordBuilder,
};

/// Trailing Component columns the game expects on new rows.
const COMPONENT_DEFAULTS: (i64, i64, i64) = (200, 255, 0);

/// Level a solution is written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    pub level_id: String,
    /// Encoded puzzle definition stored in ResearchNet
    pub definition: String,
}

/// Data access object for the components of a level and their children
#[derive(Clone)]
pub struct SolutionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SolutionStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Read the components of a level in placement order, optionally with
    /// the red and blue waldos exchanged.
    pub fn read_solution(&self, level_id: &str, swap: bool) -> Result<BuiltSolution, DatabaseError> {
        let conn = lock(&self.conn)?;
        let mut builder = SolutionRecordBuilder::new().swap_waldos(swap);

        let mut components = conn.prepare(
            "SELECT rowid, type, x, y, name FROM Component WHERE level_id = ?1 ORDER BY rowid",
        )?;
        let rows = components
            .query_map(params![level_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Component {
                        kind: row.get(1)?,
                        x: row.get(2)?,
                        y: row.get(3)?,
                        name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (component_id, component) in rows {
            builder.push_component(component);
            for member in Self::members(&conn, component_id)? {
                builder.push_member(member)?;
            }
            for pipe in Self::pipes(&conn, component_id)? {
                builder.push_pipe(pipe)?;
            }
            for annotation in Self::annotations(&conn, component_id)? {
                builder.push_annotation(annotation)?;
            }
        }

        Ok(builder.finish())
    }

    /// Insert a new level holding `components` in one transaction. Nothing
    /// is kept if any insert fails.
    pub fn write_solution(
        &self,
        context: &ImportContext,
        components: &[ComponentBlock],
    ) -> Result<(), DatabaseError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;

        create_custom_level(&tx, &context.level_id, &context.definition)?;
        for block in components {
            Self::insert_block(&tx, &context.level_id, block)?;
        }

        tx.commit()?;
        tracing::debug!(
            level_id = %context.level_id,
            components = components.len(),
            "Wrote solution"
        );
        Ok(())
    }

    fn insert_block(
        tx: &Transaction<'_>,
        level_id: &str,
        block: &ComponentBlock,
    ) -> rusqlite::Result<()> {
        let component = &block.component;
        let (p1, p2, p3) = COMPONENT_DEFAULTS;
        tx.execute(
            "INSERT INTO Component VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                level_id,
                component.kind,
                component.x,
                component.y,
                component.name,
                p1,
                p2,
                p3
            ],
        )?;
        let component_id = tx.last_insert_rowid();

        for member in &block.members {
            tx.execute(
                "INSERT INTO Member VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    component_id,
                    member.kind,
                    member.arrow_dir,
                    member.choice,
                    member.layer.raw(),
                    member.x,
                    member.y,
                    member.element_type,
                    member.element
                ],
            )?;
        }
        for pipe in &block.pipes {
            tx.execute(
                "INSERT INTO Pipe VALUES (?1, ?2, ?3, ?4)",
                params![component_id, pipe.output_id, pipe.x, pipe.y],
            )?;
        }
        for annotation in &block.annotations {
            tx.execute(
                "INSERT INTO Annotation VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    component_id,
                    annotation.output_id,
                    annotation.expanded,
                    annotation.x,
                    annotation.y,
                    annotation.text
                ],
            )?;
        }
        Ok(())
    }

    fn members(conn: &Connection, component_id: i64) -> rusqlite::Result<Vec<Member>> {
        let mut stmt = conn.prepare(
            "SELECT type, arrow_dir, choice, layer, x, y, element_type, element
             FROM Member WHERE component_id = ?1 ORDER BY rowid",
        )?;
        let members = stmt
            .query_map(params![component_id], |row| {
                Ok(Member {
                    kind: row.get(0)?,
                    arrow_dir: row.get(1)?,
                    choice: row.get(2)?,
                    layer: Layer::new(row.get(3)?),
                    x: row.get(4)?,
                    y: row.get(5)?,
                    element_type: row.get(6)?,
                    element: row.get(7)?,
                })
            })?
            .collect();
        members
    }

    fn pipes(conn: &Connection, component_id: i64) -> rusqlite::Result<Vec<Pipe>> {
        let mut stmt = conn.prepare(
            "SELECT output_id, x, y FROM Pipe WHERE component_id = ?1 ORDER BY rowid",
        )?;
        let pipes = stmt
            .query_map(params![component_id], |row| {
                Ok(Pipe {
                    output_id: row.get(0)?,
                    x: row.get(1)?,
                    y: row.get(2)?,
                })
            })?
            .collect();
        pipes
    }

    fn annotations(conn: &Connection, component_id: i64) -> rusqlite::Result<Vec<Annotation>> {
        let mut stmt = conn.prepare(
            "SELECT output_id, expanded, x, y, annotation
             FROM Annotation WHERE component_id = ?1 ORDER BY rowid",
        )?;
        let annotations = stmt
            .query_map(params![component_id], |row| {
                Ok(Annotation {
                    output_id: row.get(0)?,
                    expanded: row.get(1)?,
                    x: row.get(2)?,
                    y: row.get(3)?,
                    text: row.get(4)?,
                })
            })?
            .collect();
        annotations
    }
}
