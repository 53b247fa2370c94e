use std::path::PathBuf;

use meme_studio_domain::{CollagePatch, RecordId, SavedMemePatch, StyleStrength, TemplatePatch};

#[derive(Debug, Clone, Default)]
pub struct BootstrapCatalogCommand;

#[derive(Debug, Clone)]
pub struct ImportTemplatesCommand {
    pub folder: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTemplateCommand {
    pub id: RecordId,
    pub patch: TemplatePatch,
}

#[derive(Debug, Clone)]
pub struct UpdateMemeCommand {
    pub id: RecordId,
    pub patch: SavedMemePatch,
}

#[derive(Debug, Clone)]
pub struct UpdateCollageCommand {
    pub id: RecordId,
    pub patch: CollagePatch,
}

#[derive(Debug, Clone)]
pub struct StylizeCommand {
    pub content_path: PathBuf,
    pub style_path: PathBuf,
    pub output_path: PathBuf,
    pub strength: StyleStrength,
}
