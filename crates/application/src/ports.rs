use std::path::{Path, PathBuf};

use meme_studio_domain::{
    AiStyle, Collage, HttpMethod, MemeTemplate, NewAiStyle, NewCollage, NewMemeTemplate,
    NewSavedMeme, RecordId, SavedMeme, StyleField, StyleState, StyleStrength,
};

use crate::ApplicationError;

/// Origin-scoped key/value store behind the style state.
///
/// `save(field, None)` removes the key. The two fields are written by separate
/// calls and are never paired into a single atomic write.
pub trait StyleStateRepository {
    fn load(&self) -> Result<StyleState, ApplicationError>;

    fn save(&self, field: StyleField, value: Option<&str>) -> Result<(), ApplicationError>;

    fn clear(&self) -> Result<(), ApplicationError>;
}

/// RGBA8 pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, source: &str) -> Result<DecodedImage, ApplicationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub include_credentials: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApplicationError>;
}

pub trait StyleTransferModel: Send {
    fn initialize(&mut self) -> Result<(), ApplicationError>;

    fn stylize(
        &self,
        content_path: &Path,
        style_path: &Path,
        strength: StyleStrength,
        output_path: &Path,
    ) -> Result<(), ApplicationError>;
}

pub trait CatalogRepository {
    fn initialize(&self) -> Result<(), ApplicationError>;

    fn count_templates(&self) -> Result<usize, ApplicationError>;

    fn insert_template(
        &self,
        template: &NewMemeTemplate,
        created_at: &str,
    ) -> Result<MemeTemplate, ApplicationError>;

    fn list_templates(&self) -> Result<Vec<MemeTemplate>, ApplicationError>;

    fn find_template(&self, id: RecordId) -> Result<Option<MemeTemplate>, ApplicationError>;

    fn find_template_by_image_url(
        &self,
        image_url: &str,
    ) -> Result<Option<MemeTemplate>, ApplicationError>;

    fn replace_template(&self, template: &MemeTemplate) -> Result<(), ApplicationError>;

    fn delete_template(&self, id: RecordId) -> Result<bool, ApplicationError>;

    fn insert_meme(&self, meme: &NewSavedMeme, created_at: &str)
        -> Result<SavedMeme, ApplicationError>;

    fn list_memes_for_user(&self, user_id: i64) -> Result<Vec<SavedMeme>, ApplicationError>;

    fn find_meme(&self, id: RecordId) -> Result<Option<SavedMeme>, ApplicationError>;

    fn replace_meme(&self, meme: &SavedMeme) -> Result<(), ApplicationError>;

    fn delete_meme(&self, id: RecordId) -> Result<bool, ApplicationError>;

    fn insert_collage(
        &self,
        collage: &NewCollage,
        created_at: &str,
    ) -> Result<Collage, ApplicationError>;

    fn list_collages_for_user(&self, user_id: i64) -> Result<Vec<Collage>, ApplicationError>;

    fn find_collage(&self, id: RecordId) -> Result<Option<Collage>, ApplicationError>;

    fn replace_collage(&self, collage: &Collage) -> Result<(), ApplicationError>;

    fn delete_collage(&self, id: RecordId) -> Result<bool, ApplicationError>;

    fn count_styles(&self) -> Result<usize, ApplicationError>;

    fn insert_style(&self, style: &NewAiStyle) -> Result<AiStyle, ApplicationError>;

    fn list_styles(&self) -> Result<Vec<AiStyle>, ApplicationError>;

    fn find_style(&self, id: RecordId) -> Result<Option<AiStyle>, ApplicationError>;
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub canonical_path: PathBuf,
    pub file_stem: String,
}

#[derive(Debug, Clone, Default)]
pub struct FileScanSummary {
    pub scanned_files: usize,
    pub supported_files: usize,
    pub files: Vec<ScannedFile>,
}

pub trait FileScanner {
    fn scan_images(&self, folder: &str) -> Result<FileScanSummary, ApplicationError>;
}

pub trait Clock {
    fn now_timestamp_string(&self) -> String;
}
