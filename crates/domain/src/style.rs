use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The two persisted fields of the style state, each stored under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleField {
    CurrentImage,
    LastStyleUsed,
}

impl StyleField {
    pub const ALL: [StyleField; 2] = [StyleField::CurrentImage, StyleField::LastStyleUsed];

    pub fn storage_key(self) -> &'static str {
        match self {
            Self::CurrentImage => "currentImage",
            Self::LastStyleUsed => "lastStyleUsed",
        }
    }

    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.storage_key() == key)
    }
}

/// Current (possibly stylized) image plus the name of the last style applied.
///
/// `last_style_used` only describes `current_image` when both were written by
/// the same style-apply. They are persisted independently, so after a partial
/// restore the name can outlive the image it described.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleState {
    pub current_image: Option<String>,
    pub last_style_used: Option<String>,
}

impl StyleState {
    pub fn field(&self, field: StyleField) -> Option<&str> {
        match field {
            StyleField::CurrentImage => self.current_image.as_deref(),
            StyleField::LastStyleUsed => self.last_style_used.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: StyleField, value: Option<String>) {
        match field {
            StyleField::CurrentImage => self.current_image = value,
            StyleField::LastStyleUsed => self.last_style_used = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_image.is_none() && self.last_style_used.is_none()
    }

    pub fn caption(&self) -> Option<String> {
        self.last_style_used
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("styled with {name}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleStrength(f32);

impl StyleStrength {
    pub const FULL: StyleStrength = StyleStrength(1.0);

    pub fn new(value: f32) -> Result<Self, DomainError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DomainError::StrengthOutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for StyleStrength {
    fn default() -> Self {
        Self::FULL
    }
}
