use log::{debug, info, warn};
use meme_studio_domain::{StyleField, StyleState};

use crate::StyleStateRepository;

/// Session-lifetime holder of the style state.
///
/// Every mutation updates memory first and then persists the touched field on
/// its own. Store failures are logged and swallowed: the in-memory state stays
/// authoritative for the session and durability is best-effort.
pub struct StyleContext {
    state: StyleState,
    store: Box<dyn StyleStateRepository>,
    revision: u64,
}

impl StyleContext {
    pub fn new(store: Box<dyn StyleStateRepository>) -> Self {
        Self {
            state: StyleState::default(),
            store,
            revision: 0,
        }
    }

    /// Builds a context and restores whatever the store holds.
    pub fn hydrated(store: Box<dyn StyleStateRepository>) -> Self {
        let mut context = Self::new(store);
        context.hydrate();
        context
    }

    /// Restores fields present in the store. Absent fields keep their current
    /// value, so running this twice against the same store is a no-op.
    pub fn hydrate(&mut self) {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(error) => {
                warn!("style state hydration failed, keeping defaults: {error}");
                return;
            }
        };

        info!(
            "style state restored (has_image={}, last_style={:?})",
            stored.current_image.is_some(),
            stored.last_style_used
        );
        for field in StyleField::ALL {
            if let Some(value) = stored.field(field) {
                self.replace_field(field, Some(value.to_string()));
            }
        }
    }

    pub fn state(&self) -> &StyleState {
        &self.state
    }

    pub fn current_image(&self) -> Option<&str> {
        self.state.current_image.as_deref()
    }

    pub fn last_style_used(&self) -> Option<&str> {
        self.state.last_style_used.as_deref()
    }

    /// Bumped whenever a field actually changes value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_current_image(&mut self, image: Option<String>) {
        self.replace_field(StyleField::CurrentImage, image);
        self.persist(StyleField::CurrentImage);
    }

    /// Replaces the current image with a stylized one. The previous image is
    /// dropped and cannot be recovered through the context.
    pub fn apply_style(&mut self, styled_image: String) {
        debug!("applying style result over current image");
        self.set_current_image(Some(styled_image));
    }

    pub fn set_last_style_used(&mut self, name: Option<String>) {
        self.replace_field(StyleField::LastStyleUsed, name);
        self.persist(StyleField::LastStyleUsed);
    }

    pub fn clear(&mut self) {
        for field in StyleField::ALL {
            self.replace_field(field, None);
        }
        if let Err(error) = self.store.clear() {
            warn!("failed to clear persisted style state: {error}");
        }
    }

    fn replace_field(&mut self, field: StyleField, value: Option<String>) {
        if self.state.field(field) == value.as_deref() {
            return;
        }
        self.state.set_field(field, value);
        self.revision += 1;
    }

    fn persist(&self, field: StyleField) {
        if let Err(error) = self.store.save(field, self.state.field(field)) {
            warn!(
                "failed to persist {}, keeping in-memory value: {error}",
                field.storage_key()
            );
        }
    }
}
