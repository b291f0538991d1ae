use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

use crate::error::MenuError;

pub const ACCEPTED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// 10 MiB. A file of exactly this size is still accepted.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// An image picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Builds a file whose type the browser did not declare, by looking at its magic bytes.
    pub fn sniffed(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes);
        Self::new(name, mime, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.name, self.mime, self.bytes)
    }

    /// Type is checked before size, so a huge PDF reports the wrong type.
    pub fn validate(&self) -> Result<(), MenuError> {
        if !ACCEPTED_TYPES.contains(&self.mime.as_str()) {
            return Err(MenuError::UnsupportedType);
        }
        if self.size() > MAX_FILE_BYTES {
            return Err(MenuError::TooLarge);
        }
        Ok(())
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// What the preview panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file_name: String,
    pub data_url: String,
}

impl Preview {
    pub fn of(file: &SelectedFile) -> Self {
        Self {
            file_name: file.name().to_string(),
            data_url: file.data_url(),
        }
    }
}

pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        _ => "application/octet-stream",
    }
}
