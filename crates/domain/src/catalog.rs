use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_AI_STYLE: &str = "none";
const DEFAULT_TEMPLATE_BASE_URL: &str = "/images/meme-templates/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidRecordId(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RecordId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::BlankField(field));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub default_text: String,
}

impl TextArea {
    pub fn new(x: f32, y: f32, width: f32, height: f32, default_text: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            default_text: default_text.to_string(),
        }
    }

    pub fn top_and_bottom() -> Vec<TextArea> {
        vec![
            TextArea::new(400.0, 200.0, 300.0, 100.0, "Top text"),
            TextArea::new(400.0, 500.0, 300.0, 100.0, "Bottom text"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub area_index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeTemplate {
    pub id: RecordId,
    pub name: String,
    pub image_url: String,
    pub user_id: Option<i64>,
    pub is_public: bool,
    pub text_areas: Vec<TextArea>,
    pub created_at: String,
}

impl MemeTemplate {
    pub fn visible_to(&self, user_id: i64) -> bool {
        self.is_public || self.user_id == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemeTemplate {
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub text_areas: Vec<TextArea>,
}

impl NewMemeTemplate {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name)?;
        require_text("imageUrl", &self.image_url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_areas: Option<Vec<TextArea>>,
}

impl TemplatePatch {
    pub fn apply(self, template: &mut MemeTemplate) -> Result<(), DomainError> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            template.name = name;
        }
        if let Some(image_url) = self.image_url {
            require_text("imageUrl", &image_url)?;
            template.image_url = image_url;
        }
        if let Some(user_id) = self.user_id {
            template.user_id = Some(user_id);
        }
        if let Some(is_public) = self.is_public {
            template.is_public = is_public;
        }
        if let Some(text_areas) = self.text_areas {
            template.text_areas = text_areas;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMeme {
    pub id: RecordId,
    pub name: String,
    pub image_url: String,
    pub template_id: Option<RecordId>,
    pub user_id: Option<i64>,
    pub text_content: Vec<TextContent>,
    pub applied_filters: Vec<String>,
    pub ai_style: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedMeme {
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub template_id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub text_content: Vec<TextContent>,
    #[serde(default)]
    pub applied_filters: Vec<String>,
    #[serde(default)]
    pub ai_style: Option<String>,
}

impl NewSavedMeme {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name)?;
        require_text("imageUrl", &self.image_url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMemePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<Vec<TextContent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_filters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_style: Option<String>,
}

impl SavedMemePatch {
    pub fn apply(self, meme: &mut SavedMeme) -> Result<(), DomainError> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            meme.name = name;
        }
        if let Some(image_url) = self.image_url {
            require_text("imageUrl", &image_url)?;
            meme.image_url = image_url;
        }
        if let Some(template_id) = self.template_id {
            meme.template_id = Some(template_id);
        }
        if let Some(text_content) = self.text_content {
            meme.text_content = text_content;
        }
        if let Some(applied_filters) = self.applied_filters {
            meme.applied_filters = applied_filters;
        }
        if let Some(ai_style) = self.ai_style {
            meme.ai_style = ai_style;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collage {
    pub id: RecordId,
    pub name: String,
    pub image_url: String,
    pub user_id: Option<i64>,
    pub layout: String,
    pub source_images: Vec<String>,
    pub text_content: Vec<TextContent>,
    pub applied_filters: Vec<String>,
    pub ai_style: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollage {
    pub name: String,
    pub image_url: String,
    pub layout: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub source_images: Vec<String>,
    #[serde(default)]
    pub text_content: Vec<TextContent>,
    #[serde(default)]
    pub applied_filters: Vec<String>,
    #[serde(default)]
    pub ai_style: Option<String>,
}

impl NewCollage {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name)?;
        require_text("imageUrl", &self.image_url)?;
        require_text("layout", &self.layout)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<Vec<TextContent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_filters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_style: Option<String>,
}

impl CollagePatch {
    pub fn apply(self, collage: &mut Collage) -> Result<(), DomainError> {
        if let Some(name) = self.name {
            require_text("name", &name)?;
            collage.name = name;
        }
        if let Some(image_url) = self.image_url {
            require_text("imageUrl", &image_url)?;
            collage.image_url = image_url;
        }
        if let Some(layout) = self.layout {
            require_text("layout", &layout)?;
            collage.layout = layout;
        }
        if let Some(source_images) = self.source_images {
            collage.source_images = source_images;
        }
        if let Some(text_content) = self.text_content {
            collage.text_content = text_content;
        }
        if let Some(applied_filters) = self.applied_filters {
            collage.applied_filters = applied_filters;
        }
        if let Some(ai_style) = self.ai_style {
            collage.ai_style = ai_style;
        }
        Ok(())
    }
}

/// Templates seeded into an empty catalog.
pub fn default_templates() -> Vec<NewMemeTemplate> {
    let template = |index: u32, text_areas: Vec<TextArea>| NewMemeTemplate {
        name: format!("Template {index}"),
        image_url: format!("{DEFAULT_TEMPLATE_BASE_URL}{index}.jpg"),
        user_id: None,
        is_public: true,
        text_areas,
    };

    vec![
        template(1, TextArea::top_and_bottom()),
        template(
            2,
            vec![
                TextArea::new(350.0, 150.0, 300.0, 100.0, "Top text"),
                TextArea::new(350.0, 350.0, 300.0, 100.0, "Bottom text"),
            ],
        ),
        template(
            3,
            vec![
                TextArea::new(400.0, 200.0, 350.0, 100.0, "Main text"),
                TextArea::new(400.0, 400.0, 350.0, 100.0, "Extra text"),
            ],
        ),
        template(
            4,
            vec![
                TextArea::new(350.0, 150.0, 300.0, 100.0, "Top text"),
                TextArea::new(350.0, 350.0, 300.0, 100.0, "Bottom text"),
            ],
        ),
        template(
            5,
            vec![
                TextArea::new(300.0, 100.0, 280.0, 80.0, "Text 1"),
                TextArea::new(300.0, 200.0, 280.0, 80.0, "Text 2"),
                TextArea::new(300.0, 300.0, 280.0, 80.0, "Text 3"),
            ],
        ),
    ]
}

pub fn detect_template_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "gif" | "webp"
    )
}
