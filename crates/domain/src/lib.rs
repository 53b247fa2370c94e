mod ai_style;
mod api;
mod catalog;
mod data_uri;
mod display;
mod error;
mod route;
mod style;

pub use ai_style::{
    default_ai_styles, AiStyle, NewAiStyle, StyleParams, DEFAULT_STYLE_SOURCE,
};
pub use api::{
    endpoints, ApplyStyleRequest, ApplyStyleResponse, HttpMethod, UnauthorizedBehavior,
};
pub use catalog::{
    default_templates, detect_template_image, require_text, Collage, CollagePatch, MemeTemplate,
    NewCollage, NewMemeTemplate, NewSavedMeme, RecordId, SavedMeme, SavedMemePatch,
    TemplatePatch, TextArea, TextContent, DEFAULT_AI_STYLE, DEFAULT_USER_ID,
};
pub use data_uri::DataUri;
pub use display::{select_display_image, DisplaySelection};
pub use error::DomainError;
pub use route::{NavItem, Route, NAV_ITEMS};
pub use style::{StyleField, StyleState, StyleStrength};
