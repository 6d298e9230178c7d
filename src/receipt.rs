//! Receipt files for the scan service and the fields it extracts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The largest receipt file the scan service accepts.
pub const MAX_RECEIPT_BYTES: u64 = 10 * 1024 * 1024;

/// The fields the scan service could read from a receipt.
///
/// Every field is optional because OCR may fail to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The receipt total.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The issuer's tax identifier.
    #[serde(default)]
    pub rut: Option<String>,
    /// The issuer's business name.
    #[serde(default)]
    pub provider_name: Option<String>,
    /// The full text recognised on the receipt.
    #[serde(default)]
    pub raw_text: Option<String>,
}

/// A receipt image or PDF that has been checked against the scan service's
/// limits and loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    /// The file name sent with the upload.
    pub file_name: String,
    /// The MIME type sent with the upload.
    pub mime_type: &'static str,
    /// The file contents.
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    /// Read a receipt from disk.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - the extension is not one of an image or PDF ([Error::UnsupportedFileType]),
    /// - the file is larger than [MAX_RECEIPT_BYTES] ([Error::FileTooLarge]),
    /// - the file cannot be read ([Error::IoError]).
    pub fn open(path: &Path) -> Result<Self, Error> {
        let mime_type = mime_type_for(path)?;

        let size = std::fs::metadata(path)?.len();
        if size > MAX_RECEIPT_BYTES {
            return Err(Error::FileTooLarge(size));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "receipt".to_owned());

        tracing::debug!("Loaded receipt {file_name} ({size} bytes, {mime_type})");

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// Guess the MIME type of a receipt from its file extension.
///
/// # Errors
///
/// Returns [Error::UnsupportedFileType] for anything other than JPEG, PNG,
/// WebP, GIF, TIFF or PDF.
pub fn mime_type_for(path: &Path) -> Result<&'static str, Error> {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "tif" | "tiff" => Ok("image/tiff"),
        "pdf" => Ok("application/pdf"),
        _ => Err(Error::UnsupportedFileType(extension)),
    }
}
