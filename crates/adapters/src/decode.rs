use std::path::Path;

use meme_studio_application::{ApplicationError, DecodedImage, ImageDecoder};
use meme_studio_domain::DataUri;

/// Decodes data URIs and local files into RGBA8 pixels.
#[derive(Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, source: &str) -> Result<DecodedImage, ApplicationError> {
        let image = if DataUri::is_data_uri(source) {
            let uri = DataUri::parse(source)?;
            if !uri.is_image() {
                return Err(ApplicationError::Decode(format!(
                    "data uri is not an image: {}",
                    uri.mime
                )));
            }
            image::load_from_memory(&uri.bytes)
                .map_err(|error| ApplicationError::Decode(error.to_string()))?
        } else if source.starts_with("http://") || source.starts_with("https://") {
            return Err(ApplicationError::Decode(format!(
                "remote images are not supported: {source}"
            )));
        } else {
            image::ImageReader::open(Path::new(source))
                .map_err(|error| ApplicationError::Io(error.to_string()))?
                .with_guessed_format()
                .map_err(|error| ApplicationError::Decode(error.to_string()))?
                .decode()
                .map_err(|error| ApplicationError::Decode(error.to_string()))?
        };

        let rgba = image.to_rgba8();
        Ok(DecodedImage {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}
