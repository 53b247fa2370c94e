use serde::{Deserialize, Serialize};

use crate::{require_text, DomainError, RecordId};

pub const DEFAULT_STYLE_SOURCE: &str = "magenta";

/// Parameters forwarded to whatever renders the style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleParams {
    pub ai_model: String,
    pub style_intensity: f32,
    pub use_local_filters_only: bool,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            ai_model: String::new(),
            style_intensity: 1.0,
            use_local_filters_only: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStyle {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub api_params: StyleParams,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAiStyle {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub api_params: StyleParams,
    #[serde(default)]
    pub source: Option<String>,
}

impl NewAiStyle {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name)
    }
}

/// Styles seeded into an empty catalog, in id order.
pub fn default_ai_styles() -> Vec<NewAiStyle> {
    [
        ("Oil Painting", "Expressive brush strokes and saturated colors"),
        ("Watercolor", "Transparent washes with soft transitions"),
        ("Pencil Sketch", "Detailed pencil lines and shading"),
        ("Ink", "Bold ink strokes and fine lines"),
        ("Line Art", "Clean outlines only"),
        ("Pixel Art", "Blocky pixels with a limited palette"),
        ("Anime", "Japanese animation look"),
        ("Comic", "Bright colors with strong outlines"),
        ("Neon", "Glowing edges on a dark background"),
        ("Vintage", "Faded old-photograph look"),
        ("Caricature", "Exaggerated features"),
        ("Neural Art", "Abstract neural-network rendering"),
    ]
    .into_iter()
    .map(|(name, description)| NewAiStyle {
        name: name.to_string(),
        description: Some(description.to_string()),
        preview_url: None,
        api_params: StyleParams {
            ai_model: name.to_string(),
            ..StyleParams::default()
        },
        source: None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_named_after_their_model() {
        let styles = default_ai_styles();
        assert_eq!(styles.len(), 12);
        assert!(styles.iter().all(|style| style.validate().is_ok()));
        assert!(styles
            .iter()
            .all(|style| style.api_params.ai_model == style.name));
    }

    #[test]
    fn params_fill_missing_keys() {
        let params: StyleParams =
            serde_json::from_str(r#"{"aiModel":"Neon"}"#).expect("params");
        assert_eq!(params.ai_model, "Neon");
        assert_eq!(params.style_intensity, 1.0);
        assert!(params.use_local_filters_only);
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut style = default_ai_styles().remove(0);
        style.name = " ".to_string();
        assert_eq!(style.validate(), Err(DomainError::BlankField("name")));
    }
}
