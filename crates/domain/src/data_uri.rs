use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::DomainError;

const SCHEME: &str = "data:";
const DEFAULT_MIME: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_data_uri(value: &str) -> bool {
        value
            .get(..SCHEME.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if !Self::is_data_uri(value) {
            return Err(DomainError::InvalidDataUri(
                "missing data: scheme".to_string(),
            ));
        }
        let rest = &value[SCHEME.len()..];
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DomainError::InvalidDataUri("missing ',' separator".to_string()))?;

        let mut params = header.split(';');
        let mime = match params.next() {
            Some(mime) if !mime.trim().is_empty() => mime.trim().to_ascii_lowercase(),
            _ => DEFAULT_MIME.to_string(),
        };
        let is_base64 = params.any(|param| param.trim().eq_ignore_ascii_case("base64"));

        let bytes = if is_base64 {
            STANDARD
                .decode(payload.trim())
                .map_err(|error| DomainError::InvalidDataUri(error.to_string()))?
        } else {
            payload.as_bytes().to_vec()
        };

        Ok(Self { mime, bytes })
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn encode(&self) -> String {
        format!("{SCHEME}{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base64_image_payload() {
        let uri = DataUri::parse("data:image/png;base64,iVBORw0K").expect("parse");
        assert_eq!(uri.mime, "image/png");
        assert!(uri.is_image());
        assert_eq!(&uri.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn encode_produces_parseable_uri() {
        let uri = DataUri::new("image/jpeg", vec![0xff, 0xd8, 0xff]);
        let text = uri.encode();
        assert!(text.starts_with("data:image/jpeg;base64,"));
        assert_eq!(DataUri::parse(&text).expect("parse"), uri);
    }

    #[test]
    fn plain_payload_defaults_mime() {
        let uri = DataUri::parse("data:,hello").expect("parse");
        assert_eq!(uri.mime, "text/plain");
        assert_eq!(uri.bytes, b"hello");
    }

    #[test]
    fn rejects_non_data_values() {
        assert!(matches!(
            DataUri::parse("/images/meme-templates/1.jpg"),
            Err(DomainError::InvalidDataUri(_))
        ));
        assert!(DataUri::parse("data:image/png;base64").is_err());
        assert!(DataUri::parse("data:image/png;base64,@@@").is_err());
    }
}
