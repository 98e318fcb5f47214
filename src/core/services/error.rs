use std::path::PathBuf;

use thiserror::Error;

use crate::data::DatabaseError;
use crate::images::{ImageDefinitionError, TextureError};
use crate::puzzle::{DefinitionError, TournamentError};
use crate::solution::{FilterError, RecordError, WaldoPathError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    /// The game's files disagree with what the tool expects of them.
    #[error("{0}")]
    StoreInconsistent(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    WaldoPath(#[from] WaldoPathError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    ImageDefinition(#[from] ImageDefinitionError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ServiceError::Io { path, source }
    }
}
