use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn carries_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a query does when the backend answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnauthorizedBehavior {
    ReturnNull,
    #[default]
    Throw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStyleRequest {
    pub image_data: String,
    pub style_id: String,
}

impl ApplyStyleRequest {
    pub fn new(image_data: String, style_id: RecordId) -> Self {
        Self {
            image_data,
            style_id: style_id.get().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStyleResponse {
    pub styled_image: String,
}

pub mod endpoints {
    use crate::RecordId;

    pub const TEMPLATES: &str = "/api/templates";
    pub const MEMES: &str = "/api/memes";
    pub const COLLAGES: &str = "/api/collages";
    pub const STYLES: &str = "/api/styles";
    pub const APPLY_STYLE: &str = "/api/apply-style";

    pub fn template(id: RecordId) -> String {
        format!("{TEMPLATES}/{}", id.get())
    }

    pub fn meme(id: RecordId) -> String {
        format!("{MEMES}/{}", id.get())
    }

    pub fn collage(id: RecordId) -> String {
        format!("{COLLAGES}/{}", id.get())
    }

    pub fn style(id: RecordId) -> String {
        format!("{STYLES}/{}", id.get())
    }
}
