pub mod decode;
pub mod fs;
pub mod http;
pub mod migrations;
pub mod presenters;
pub mod sqlite;
pub mod style_transfer;

pub use decode::ImageCrateDecoder;
pub use fs::{SystemClock, WalkdirFileScanner};
pub use http::ReqwestTransport;
pub use presenters::{
    present_collage_row, present_import_report, present_meme_row, present_style_row,
    present_style_state, present_template_row,
};
pub use sqlite::{SqliteCatalogRepository, SqliteStyleStore};
pub use style_transfer::TextureSynthesisModel;
