mod queries;
mod style_store;

use std::fs;
use std::path::{Path, PathBuf};

use meme_studio_application::{ApplicationError, CatalogRepository};
use meme_studio_domain::{
    AiStyle, Collage, MemeTemplate, NewAiStyle, NewCollage, NewMemeTemplate, NewSavedMeme,
    RecordId, SavedMeme,
};
use rusqlite::Connection;

use crate::migrations::MIGRATIONS;

pub use style_store::SqliteStyleStore;

#[derive(Debug, Clone)]
pub struct SqliteCatalogRepository {
    path: PathBuf,
}

impl SqliteCatalogRepository {
    pub fn new(path: String) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }

    /// Foreign key enforcement is per connection in SQLite.
    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        let conn = Connection::open(&self.path).map_err(persistence)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(persistence)?;
        Ok(conn)
    }

    fn fetch_template(
        &self,
        conn: &Connection,
        id: i64,
    ) -> Result<MemeTemplate, ApplicationError> {
        queries::find_template(conn, id)
            .map_err(persistence)?
            .ok_or_else(|| missing_row("template", id))
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "catalog path must not be empty".to_string(),
            ));
        }

        ensure_parent_dir(&self.path)?;
        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(persistence)?;
        apply_migrations(&conn)
    }

    fn count_templates(&self) -> Result<usize, ApplicationError> {
        let conn = self.open_connection()?;
        queries::count_templates(&conn).map_err(persistence)
    }

    fn insert_template(
        &self,
        template: &NewMemeTemplate,
        created_at: &str,
    ) -> Result<MemeTemplate, ApplicationError> {
        let conn = self.open_connection()?;
        let id = queries::insert_template(&conn, template, created_at).map_err(persistence)?;
        self.fetch_template(&conn, id)
    }

    fn list_templates(&self) -> Result<Vec<MemeTemplate>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_templates(&conn).map_err(persistence)
    }

    fn find_template(&self, id: RecordId) -> Result<Option<MemeTemplate>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_template(&conn, id.get()).map_err(persistence)
    }

    fn find_template_by_image_url(
        &self,
        image_url: &str,
    ) -> Result<Option<MemeTemplate>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_template_by_image_url(&conn, image_url).map_err(persistence)
    }

    fn replace_template(&self, template: &MemeTemplate) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        match queries::update_template(&conn, template).map_err(persistence)? {
            0 => Err(missing_row("template", template.id.get())),
            _ => Ok(()),
        }
    }

    fn delete_template(&self, id: RecordId) -> Result<bool, ApplicationError> {
        let conn = self.open_connection()?;
        queries::delete_by_id(&conn, "meme_templates", id.get()).map_err(persistence)
    }

    fn insert_meme(
        &self,
        meme: &NewSavedMeme,
        created_at: &str,
    ) -> Result<SavedMeme, ApplicationError> {
        let conn = self.open_connection()?;
        let id = queries::insert_meme(&conn, meme, created_at).map_err(persistence)?;
        queries::find_meme(&conn, id)
            .map_err(persistence)?
            .ok_or_else(|| missing_row("meme", id))
    }

    fn list_memes_for_user(&self, user_id: i64) -> Result<Vec<SavedMeme>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_memes_for_user(&conn, user_id).map_err(persistence)
    }

    fn find_meme(&self, id: RecordId) -> Result<Option<SavedMeme>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_meme(&conn, id.get()).map_err(persistence)
    }

    fn replace_meme(&self, meme: &SavedMeme) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        match queries::update_meme(&conn, meme).map_err(persistence)? {
            0 => Err(missing_row("meme", meme.id.get())),
            _ => Ok(()),
        }
    }

    fn delete_meme(&self, id: RecordId) -> Result<bool, ApplicationError> {
        let conn = self.open_connection()?;
        queries::delete_by_id(&conn, "saved_memes", id.get()).map_err(persistence)
    }

    fn insert_collage(
        &self,
        collage: &NewCollage,
        created_at: &str,
    ) -> Result<Collage, ApplicationError> {
        let conn = self.open_connection()?;
        let id = queries::insert_collage(&conn, collage, created_at).map_err(persistence)?;
        queries::find_collage(&conn, id)
            .map_err(persistence)?
            .ok_or_else(|| missing_row("collage", id))
    }

    fn list_collages_for_user(&self, user_id: i64) -> Result<Vec<Collage>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_collages_for_user(&conn, user_id).map_err(persistence)
    }

    fn find_collage(&self, id: RecordId) -> Result<Option<Collage>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_collage(&conn, id.get()).map_err(persistence)
    }

    fn replace_collage(&self, collage: &Collage) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        match queries::update_collage(&conn, collage).map_err(persistence)? {
            0 => Err(missing_row("collage", collage.id.get())),
            _ => Ok(()),
        }
    }

    fn delete_collage(&self, id: RecordId) -> Result<bool, ApplicationError> {
        let conn = self.open_connection()?;
        queries::delete_by_id(&conn, "collages", id.get()).map_err(persistence)
    }

    fn count_styles(&self) -> Result<usize, ApplicationError> {
        let conn = self.open_connection()?;
        queries::count_styles(&conn).map_err(persistence)
    }

    fn insert_style(&self, style: &NewAiStyle) -> Result<AiStyle, ApplicationError> {
        let conn = self.open_connection()?;
        let id = queries::insert_style(&conn, style).map_err(persistence)?;
        queries::find_style(&conn, id)
            .map_err(persistence)?
            .ok_or_else(|| missing_row("ai style", id))
    }

    fn list_styles(&self) -> Result<Vec<AiStyle>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_styles(&conn).map_err(persistence)
    }

    fn find_style(&self, id: RecordId) -> Result<Option<AiStyle>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_style(&conn, id.get()).map_err(persistence)
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), ApplicationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|error| ApplicationError::Io(error.to_string()))?;
        }
    }
    Ok(())
}

fn apply_migrations(conn: &Connection) -> Result<(), ApplicationError> {
    for migration in MIGRATIONS {
        conn.execute_batch(migration).map_err(persistence)?;
    }
    Ok(())
}

fn persistence(error: rusqlite::Error) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}

fn missing_row(kind: &str, id: i64) -> ApplicationError {
    ApplicationError::NotFound(format!("{kind} not found for id={id}"))
}

#[cfg(test)]
mod tests {
    use meme_studio_domain::{
        default_ai_styles, default_templates, TextArea, TextContent, DEFAULT_STYLE_SOURCE,
    };
    use tempfile::TempDir;

    use super::*;

    fn repo(dir: &TempDir) -> SqliteCatalogRepository {
        let db_path = dir.path().join("nested").join("catalog.sqlite3");
        let repo = SqliteCatalogRepository::new(db_path.to_string_lossy().to_string());
        repo.initialize().expect("initialize");
        repo
    }

    fn id(value: i64) -> RecordId {
        RecordId::new(value).expect("id")
    }

    #[test]
    fn initialize_creates_schema() {
        let dir = TempDir::new().expect("tempdir");
        repo(&dir);

        let conn = Connection::open(dir.path().join("nested").join("catalog.sqlite3")).expect("open");
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('meme_templates', 'saved_memes', 'collages', 'local_storage',
                              'ai_styles')",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 5);
    }

    #[test]
    fn initialize_rejects_empty_path() {
        let repo = SqliteCatalogRepository::new(String::new());
        assert!(matches!(
            repo.initialize(),
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[test]
    fn templates_roundtrip_with_text_areas() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let seed = default_templates().remove(4);

        let stored = repo.insert_template(&seed, "1700000000").expect("insert");
        assert_eq!(stored.id, id(1));
        assert_eq!(stored.text_areas, seed.text_areas);
        assert_eq!(repo.count_templates().expect("count"), 1);

        let by_url = repo
            .find_template_by_image_url(&seed.image_url)
            .expect("find")
            .expect("exists");
        assert_eq!(by_url, stored);
        assert!(repo
            .find_template_by_image_url("/images/other.png")
            .expect("find")
            .is_none());
    }

    #[test]
    fn replace_and_delete_template() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let mut stored = repo
            .insert_template(&default_templates().remove(0), "0")
            .expect("insert");

        stored.name = "Renamed".to_string();
        stored.text_areas = vec![TextArea::new(1.0, 2.0, 3.0, 4.0, "Only")];
        repo.replace_template(&stored).expect("replace");
        assert_eq!(repo.find_template(stored.id).expect("find"), Some(stored.clone()));

        assert!(repo.delete_template(stored.id).expect("delete"));
        assert!(!repo.delete_template(stored.id).expect("delete again"));
        assert!(matches!(
            repo.replace_template(&stored),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn memes_are_scoped_to_user() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let template = repo
            .insert_template(&default_templates().remove(0), "0")
            .expect("template");
        let meme = NewSavedMeme {
            name: "Monday".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            template_id: Some(template.id),
            user_id: Some(1),
            text_content: vec![TextContent {
                area_index: 0,
                text: "hello".to_string(),
            }],
            applied_filters: vec!["grayscale".to_string()],
            ai_style: None,
        };

        let stored = repo.insert_meme(&meme, "0").expect("insert");
        assert_eq!(stored.ai_style, "none");
        assert_eq!(stored.template_id, Some(template.id));
        assert_eq!(stored.text_content[0].text, "hello");

        assert_eq!(repo.list_memes_for_user(1).expect("list").len(), 1);
        assert!(repo.list_memes_for_user(2).expect("list").is_empty());
        assert!(repo.delete_meme(stored.id).expect("delete"));
        assert_eq!(repo.find_meme(stored.id).expect("find"), None);
    }

    #[test]
    fn collage_roundtrip_and_update() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let collage = NewCollage {
            name: "Trip".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            layout: "grid-2x2".to_string(),
            user_id: Some(1),
            source_images: vec!["a.png".to_string(), "b.png".to_string()],
            text_content: Vec::new(),
            applied_filters: Vec::new(),
            ai_style: Some("Cubism".to_string()),
        };

        let mut stored = repo.insert_collage(&collage, "0").expect("insert");
        assert_eq!(stored.source_images, collage.source_images);
        assert_eq!(stored.ai_style, "Cubism");

        stored.layout = "row-3".to_string();
        repo.replace_collage(&stored).expect("replace");
        let listed = repo.list_collages_for_user(1).expect("list");
        assert_eq!(listed, vec![stored]);
    }

    #[test]
    fn deleting_template_detaches_its_memes() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let template = repo
            .insert_template(&default_templates().remove(0), "0")
            .expect("template");
        let meme = repo
            .insert_meme(
                &NewSavedMeme {
                    name: "Orphan".to_string(),
                    image_url: "data:image/png;base64,AAAA".to_string(),
                    template_id: Some(template.id),
                    user_id: Some(1),
                    text_content: Vec::new(),
                    applied_filters: Vec::new(),
                    ai_style: None,
                },
                "0",
            )
            .expect("meme");

        assert!(repo.delete_template(template.id).expect("delete"));
        let stored = repo.find_meme(meme.id).expect("find").expect("meme kept");
        assert_eq!(stored.template_id, None);
    }

    #[test]
    fn styles_roundtrip_with_params() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        assert_eq!(repo.count_styles().expect("count"), 0);

        for style in default_ai_styles() {
            repo.insert_style(&style).expect("insert");
        }
        assert_eq!(repo.count_styles().expect("count"), 12);

        let styles = repo.list_styles().expect("list");
        assert_eq!(styles[0].name, "Oil Painting");
        assert_eq!(styles[0].source, DEFAULT_STYLE_SOURCE);
        assert_eq!(styles[0].api_params.ai_model, "Oil Painting");

        let neon = styles
            .iter()
            .find(|style| style.name == "Neon")
            .expect("seeded");
        assert_eq!(repo.find_style(neon.id).expect("find"), Some(neon.clone()));
        assert_eq!(repo.find_style(id(404)).expect("find"), None);
    }

    #[test]
    fn duplicate_style_name_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let repo = repo(&dir);
        let style = default_ai_styles().remove(0);
        repo.insert_style(&style).expect("insert");
        assert!(matches!(
            repo.insert_style(&style),
            Err(ApplicationError::Persistence(_))
        ));
    }
}
