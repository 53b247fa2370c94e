use meme_studio_domain::{
    AiStyle, Collage, MemeTemplate, NewAiStyle, NewCollage, NewMemeTemplate, NewSavedMeme,
    RecordId, SavedMeme, DEFAULT_AI_STYLE, DEFAULT_STYLE_SOURCE,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Error, OptionalExtension, Result, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

const TEMPLATE_COLUMNS: &str = "id, name, image_url, user_id, is_public, text_areas_json, created_at";
const MEME_COLUMNS: &str = "id, name, image_url, template_id, user_id, text_content_json,
    applied_filters_json, ai_style, created_at";
const COLLAGE_COLUMNS: &str = "id, name, image_url, user_id, layout, source_images_json,
    text_content_json, applied_filters_json, ai_style, created_at";
const STYLE_COLUMNS: &str = "id, name, description, preview_url, api_params_json, source";

pub fn count_templates(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM meme_templates", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

pub fn insert_template(
    conn: &Connection,
    template: &NewMemeTemplate,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO meme_templates (name, image_url, user_id, is_public, text_areas_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            template.name,
            template.image_url,
            template.user_id,
            template.is_public,
            to_json(&template.text_areas)?,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_templates(conn: &Connection) -> Result<Vec<MemeTemplate>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM meme_templates ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([], template_from_row)?;
    rows.collect()
}

pub fn find_template(conn: &Connection, id: i64) -> Result<Option<MemeTemplate>> {
    conn.query_row(
        &format!("SELECT {TEMPLATE_COLUMNS} FROM meme_templates WHERE id = ?1"),
        params![id],
        template_from_row,
    )
    .optional()
}

pub fn find_template_by_image_url(
    conn: &Connection,
    image_url: &str,
) -> Result<Option<MemeTemplate>> {
    conn.query_row(
        &format!("SELECT {TEMPLATE_COLUMNS} FROM meme_templates WHERE image_url = ?1 LIMIT 1"),
        params![image_url],
        template_from_row,
    )
    .optional()
}

pub fn update_template(conn: &Connection, template: &MemeTemplate) -> Result<usize> {
    conn.execute(
        "UPDATE meme_templates
         SET name = ?2, image_url = ?3, user_id = ?4, is_public = ?5, text_areas_json = ?6
         WHERE id = ?1",
        params![
            template.id.get(),
            template.name,
            template.image_url,
            template.user_id,
            template.is_public,
            to_json(&template.text_areas)?,
        ],
    )
}

pub fn insert_meme(conn: &Connection, meme: &NewSavedMeme, created_at: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO saved_memes
         (name, image_url, template_id, user_id, text_content_json, applied_filters_json, ai_style, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            meme.name,
            meme.image_url,
            meme.template_id.map(RecordId::get),
            meme.user_id,
            to_json(&meme.text_content)?,
            to_json(&meme.applied_filters)?,
            meme.ai_style.as_deref().unwrap_or(DEFAULT_AI_STYLE),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_memes_for_user(conn: &Connection, user_id: i64) -> Result<Vec<SavedMeme>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEME_COLUMNS} FROM saved_memes WHERE user_id = ?1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], meme_from_row)?;
    rows.collect()
}

pub fn find_meme(conn: &Connection, id: i64) -> Result<Option<SavedMeme>> {
    conn.query_row(
        &format!("SELECT {MEME_COLUMNS} FROM saved_memes WHERE id = ?1"),
        params![id],
        meme_from_row,
    )
    .optional()
}

pub fn update_meme(conn: &Connection, meme: &SavedMeme) -> Result<usize> {
    conn.execute(
        "UPDATE saved_memes
         SET name = ?2, image_url = ?3, template_id = ?4, user_id = ?5,
             text_content_json = ?6, applied_filters_json = ?7, ai_style = ?8
         WHERE id = ?1",
        params![
            meme.id.get(),
            meme.name,
            meme.image_url,
            meme.template_id.map(RecordId::get),
            meme.user_id,
            to_json(&meme.text_content)?,
            to_json(&meme.applied_filters)?,
            meme.ai_style,
        ],
    )
}

pub fn insert_collage(conn: &Connection, collage: &NewCollage, created_at: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO collages
         (name, image_url, user_id, layout, source_images_json, text_content_json,
          applied_filters_json, ai_style, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            collage.name,
            collage.image_url,
            collage.user_id,
            collage.layout,
            to_json(&collage.source_images)?,
            to_json(&collage.text_content)?,
            to_json(&collage.applied_filters)?,
            collage.ai_style.as_deref().unwrap_or(DEFAULT_AI_STYLE),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_collages_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Collage>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLLAGE_COLUMNS} FROM collages WHERE user_id = ?1 ORDER BY id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], collage_from_row)?;
    rows.collect()
}

pub fn find_collage(conn: &Connection, id: i64) -> Result<Option<Collage>> {
    conn.query_row(
        &format!("SELECT {COLLAGE_COLUMNS} FROM collages WHERE id = ?1"),
        params![id],
        collage_from_row,
    )
    .optional()
}

pub fn update_collage(conn: &Connection, collage: &Collage) -> Result<usize> {
    conn.execute(
        "UPDATE collages
         SET name = ?2, image_url = ?3, user_id = ?4, layout = ?5, source_images_json = ?6,
             text_content_json = ?7, applied_filters_json = ?8, ai_style = ?9
         WHERE id = ?1",
        params![
            collage.id.get(),
            collage.name,
            collage.image_url,
            collage.user_id,
            collage.layout,
            to_json(&collage.source_images)?,
            to_json(&collage.text_content)?,
            to_json(&collage.applied_filters)?,
            collage.ai_style,
        ],
    )
}

pub fn count_styles(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM ai_styles", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

pub fn insert_style(conn: &Connection, style: &NewAiStyle) -> Result<i64> {
    conn.execute(
        "INSERT INTO ai_styles (name, description, preview_url, api_params_json, source)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            style.name,
            style.description,
            style.preview_url,
            to_json(&style.api_params)?,
            style.source.as_deref().unwrap_or(DEFAULT_STYLE_SOURCE),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_styles(conn: &Connection) -> Result<Vec<AiStyle>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STYLE_COLUMNS} FROM ai_styles ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([], style_from_row)?;
    rows.collect()
}

pub fn find_style(conn: &Connection, id: i64) -> Result<Option<AiStyle>> {
    conn.query_row(
        &format!("SELECT {STYLE_COLUMNS} FROM ai_styles WHERE id = ?1"),
        params![id],
        style_from_row,
    )
    .optional()
}

/// `table` is always one of the crate's own table names.
pub fn delete_by_id(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let deleted = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])?;
    Ok(deleted > 0)
}

pub fn load_storage(conn: &Connection, origin: &str) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM local_storage WHERE origin = ?1")?;
    let rows = stmt.query_map(params![origin], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

pub fn set_storage_item(conn: &Connection, origin: &str, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO local_storage (origin, key, value)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(origin, key) DO UPDATE SET value = excluded.value",
        params![origin, key, value],
    )?;
    Ok(())
}

pub fn remove_storage_item(conn: &Connection, origin: &str, key: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM local_storage WHERE origin = ?1 AND key = ?2",
        params![origin, key],
    )?;
    Ok(())
}

pub fn clear_storage(conn: &Connection, origin: &str) -> Result<()> {
    conn.execute("DELETE FROM local_storage WHERE origin = ?1", params![origin])?;
    Ok(())
}

fn template_from_row(row: &Row<'_>) -> Result<MemeTemplate> {
    Ok(MemeTemplate {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        image_url: row.get(2)?,
        user_id: row.get(3)?,
        is_public: row.get(4)?,
        text_areas: from_json(row, 5)?,
        created_at: row.get(6)?,
    })
}

fn meme_from_row(row: &Row<'_>) -> Result<SavedMeme> {
    let template_id: Option<i64> = row.get(3)?;
    Ok(SavedMeme {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        image_url: row.get(2)?,
        template_id: template_id
            .map(|value| RecordId::new(value).map_err(|error| conversion(3, Type::Integer, error)))
            .transpose()?,
        user_id: row.get(4)?,
        text_content: from_json(row, 5)?,
        applied_filters: from_json(row, 6)?,
        ai_style: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn collage_from_row(row: &Row<'_>) -> Result<Collage> {
    Ok(Collage {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        image_url: row.get(2)?,
        user_id: row.get(3)?,
        layout: row.get(4)?,
        source_images: from_json(row, 5)?,
        text_content: from_json(row, 6)?,
        applied_filters: from_json(row, 7)?,
        ai_style: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn style_from_row(row: &Row<'_>) -> Result<AiStyle> {
    Ok(AiStyle {
        id: record_id(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        preview_url: row.get(3)?,
        api_params: from_json(row, 4)?,
        source: row.get(5)?,
    })
}

fn record_id(row: &Row<'_>, index: usize) -> Result<RecordId> {
    let value: i64 = row.get(index)?;
    RecordId::new(value).map_err(|error| conversion(index, Type::Integer, error))
}

fn from_json<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> Result<T> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw).map_err(|error| conversion(index, Type::Text, error))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|error| Error::ToSqlConversionFailure(Box::new(error)))
}

fn conversion(
    index: usize,
    kind: Type,
    error: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::FromSqlConversionFailure(index, kind, Box::new(error))
}
