use std::path::Path;

use log::{debug, info};
use meme_studio_application::{ApplicationError, StyleTransferModel};
use meme_studio_domain::StyleStrength;
use texture_synthesis::Session;

/// Example-based style transfer: the style image is the example and the
/// content image guides the output layout. Strength maps to the guide alpha,
/// so 1.0 follows the content most closely.
#[derive(Debug, Default)]
pub struct TextureSynthesisModel {
    max_threads: Option<usize>,
    seed: u64,
    initialized: bool,
}

impl TextureSynthesisModel {
    pub fn new(max_threads: Option<usize>, seed: u64) -> Self {
        Self {
            max_threads,
            seed,
            initialized: false,
        }
    }
}

impl StyleTransferModel for TextureSynthesisModel {
    fn initialize(&mut self) -> Result<(), ApplicationError> {
        if self.max_threads == Some(0) {
            return Err(ApplicationError::StyleTransfer(
                "max_threads must be at least 1".to_string(),
            ));
        }
        info!(
            "texture synthesis ready (threads={:?}, seed={})",
            self.max_threads, self.seed
        );
        self.initialized = true;
        Ok(())
    }

    fn stylize(
        &self,
        content_path: &Path,
        style_path: &Path,
        strength: StyleStrength,
        output_path: &Path,
    ) -> Result<(), ApplicationError> {
        if !self.initialized {
            return Err(ApplicationError::StyleTransfer(
                "model used before initialization".to_string(),
            ));
        }

        let content = content_path.to_path_buf();
        let style = style_path.to_path_buf();
        let mut builder = Session::builder()
            .add_example(&style)
            .load_target_guide(&content)
            .guide_alpha(strength.get())
            .seed(self.seed);
        if let Some(threads) = self.max_threads {
            builder = builder.max_thread_count(threads);
        }

        let session = builder
            .build()
            .map_err(|error| ApplicationError::StyleTransfer(error.to_string()))?;
        debug!("texture synthesis session built");
        session
            .run(None)
            .save(output_path)
            .map_err(|error| ApplicationError::StyleTransfer(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn zero_threads_fail_initialization() {
        let mut model = TextureSynthesisModel::new(Some(0), 1);
        assert!(matches!(
            model.initialize(),
            Err(ApplicationError::StyleTransfer(_))
        ));
    }

    #[test]
    fn stylize_requires_initialization() {
        let model = TextureSynthesisModel::new(None, 1);
        let path = PathBuf::from("unused.png");
        let result = model.stylize(&path, &path, StyleStrength::FULL, &path);
        assert!(matches!(result, Err(ApplicationError::StyleTransfer(_))));
    }

    #[test]
    fn missing_style_image_surfaces_as_error() {
        let mut model = TextureSynthesisModel::new(Some(1), 1);
        model.initialize().expect("initialize");
        let missing = PathBuf::from("/definitely/missing.png");
        let result = model.stylize(&missing, &missing, StyleStrength::FULL, &missing);
        assert!(result.is_err());
    }
}
