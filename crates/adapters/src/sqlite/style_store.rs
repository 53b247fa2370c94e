use std::path::PathBuf;

use log::debug;
use meme_studio_application::{ApplicationError, StyleStateRepository};
use meme_studio_domain::{StyleField, StyleState};
use rusqlite::Connection;

use super::{apply_migrations, ensure_parent_dir, persistence, queries};

/// Origin-scoped key/value storage for the style state, kept in the
/// `local_storage` table. Each field lives under its own key.
#[derive(Debug, Clone)]
pub struct SqliteStyleStore {
    path: PathBuf,
    origin: String,
}

impl SqliteStyleStore {
    pub fn new(path: impl Into<PathBuf>, origin: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: origin.into(),
        }
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        ensure_parent_dir(&self.path)?;
        let conn = Connection::open(&self.path).map_err(persistence)?;
        apply_migrations(&conn)?;
        Ok(conn)
    }
}

impl StyleStateRepository for SqliteStyleStore {
    fn load(&self) -> Result<StyleState, ApplicationError> {
        let conn = self.open_connection()?;
        let mut state = StyleState::default();
        for (key, value) in queries::load_storage(&conn, &self.origin).map_err(persistence)? {
            match StyleField::from_storage_key(&key) {
                Some(field) => state.set_field(field, Some(value)),
                None => debug!("ignoring unrelated storage key {key}"),
            }
        }
        Ok(state)
    }

    fn save(&self, field: StyleField, value: Option<&str>) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        let key = field.storage_key();
        let written = match value {
            Some(value) => queries::set_storage_item(&conn, &self.origin, key, value),
            None => queries::remove_storage_item(&conn, &self.origin, key),
        };
        written.map_err(persistence)
    }

    fn clear(&self) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::clear_storage(&conn, &self.origin).map_err(persistence)
    }
}
