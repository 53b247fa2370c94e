mod api;
mod display;
mod error;
mod ports;
mod provider;
mod service;
mod style_context;
mod stylize;
mod use_cases;

pub use api::{ApiClient, QueryFn};
pub use display::{ImageDisplay, ReadyCallback, Surface};
pub use error::ApplicationError;
pub use ports::{
    CatalogRepository, Clock, DecodedImage, FileScanSummary, FileScanner, HttpRequest,
    HttpResponse, HttpTransport, ImageDecoder, ScannedFile, StyleStateRepository,
    StyleTransferModel,
};
pub use provider::{StyleConsumer, StyleProvider};
pub use service::{CatalogService, ImportReport};
pub use style_context::StyleContext;
pub use stylize::{StylizeReport, StylizeService};
pub use use_cases::{
    BootstrapCatalogCommand, ImportTemplatesCommand, StylizeCommand, UpdateCollageCommand,
    UpdateMemeCommand, UpdateTemplateCommand,
};
