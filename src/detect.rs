//! Document format detection and payload decoding.
//!
//! The analysis service accepts PDF, PNG, JPEG and TIFF input. Checking the
//! magic bytes up front turns an obviously wrong upload into a client error
//! instead of a round trip to the service.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// Document formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `%PDF-`
    Pdf,
    /// PNG signature
    Png,
    /// JPEG SOI marker
    Jpeg,
    /// Little- or big-endian TIFF
    Tiff,
}

impl DocumentFormat {
    /// MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Png => "image/png",
            DocumentFormat::Jpeg => "image/jpeg",
            DocumentFormat::Tiff => "image/tiff",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Png => "PNG",
            DocumentFormat::Jpeg => "JPEG",
            DocumentFormat::Tiff => "TIFF",
        };
        f.write_str(name)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";

/// Detect the document format from its leading bytes.
///
/// # Returns
/// * `Ok(DocumentFormat)` for a supported format
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocumentFormat> {
    let format = if data.starts_with(PDF_MAGIC) {
        DocumentFormat::Pdf
    } else if data.starts_with(PNG_MAGIC) {
        DocumentFormat::Png
    } else if data.starts_with(JPEG_MAGIC) {
        DocumentFormat::Jpeg
    } else if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        DocumentFormat::Tiff
    } else {
        return Err(Error::UnknownFormat);
    };
    Ok(format)
}

/// Check if bytes look like a supported document.
pub fn is_supported_document(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Decode a base64 request body into raw document bytes.
///
/// Surrounding whitespace and embedded line breaks are tolerated.
pub fn decode_base64_body(body: &str) -> Result<Vec<u8>> {
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(Error::InvalidPayload("request body is empty".into()));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::InvalidPayload(format!("body is not valid base64: {}", e)))
}

/// Encode raw bytes as a base64 request body.
pub fn encode_base64_body(data: &[u8]) -> String {
    STANDARD.encode(data)
}
