//! Embedded images: `data:` URL handling and logo loading.

use std::io::{Cursor, Read};

use ::image::{DynamicImage, ImageFormat};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CardError;

/// Formats every render target can embed without conversion.
const EMBEDDABLE: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse a base64 `data:` URL. Only the payload is decoded; the image
    /// itself is not inspected.
    pub fn parse(src: &str) -> Result<Self, CardError> {
        let rest = src
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| CardError::Image("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CardError::Image("data URL has no payload".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| CardError::Image("data URL is not base64 encoded".to_string()))?;

        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| CardError::Image(format!("Invalid base64 payload: {}", e)))?;

        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }

    pub fn to_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Decode the image behind a `data:` URL.
pub fn decode_image(src: &str) -> Result<DynamicImage, CardError> {
    let data = DataUrl::parse(src)?;
    ::image::load_from_memory(&data.bytes)
        .map_err(|e| CardError::Image(format!("Failed to decode image: {}", e)))
}

/// Turn raw image bytes into a `data:` URL every target can embed,
/// re-encoding to PNG when the source format is not widely supported.
pub fn image_bytes_to_data_url(bytes: &[u8]) -> Result<String, CardError> {
    let format = ::image::guess_format(bytes)
        .map_err(|e| CardError::Image(format!("Unknown image format: {}", e)))?;
    let img = ::image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CardError::Image(format!("Failed to decode image: {}", e)))?;

    if EMBEDDABLE.contains(&format) {
        let data = DataUrl {
            mime: format.to_mime_type().to_string(),
            bytes: bytes.to_vec(),
        };
        return Ok(data.to_url());
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CardError::Image(format!("Failed to re-encode image: {}", e)))?;
    Ok(DataUrl {
        mime: ImageFormat::Png.to_mime_type().to_string(),
        bytes: png,
    }
    .to_url())
}

/// Load a logo from a file path or an http(s) URL as a `data:` URL.
pub fn load_logo(path: &str) -> Result<String, CardError> {
    let image_bytes = if path.starts_with("http://") || path.starts_with("https://") {
        let response = ureq::get(path)
            .call()
            .map_err(|e| CardError::Image(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| CardError::Image(format!("Failed to read response: {}", e)))?;
        bytes
    } else {
        std::fs::read(path).map_err(|e| CardError::Image(format!("{}: {}", path, e)))?
    };

    image_bytes_to_data_url(&image_bytes)
}
