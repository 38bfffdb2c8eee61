//! Image intake for create/edit.
//!
//! Local files are checked for type and size and embedded as a base64 data
//! URI; links are checked for being absolute http(s) URLs. A rejected image
//! never reaches the catalog.

use crate::error::{Result, ShipdexError};
use crate::model::ImageSource;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Url;
use std::fs;
use std::path::Path;

const ACCEPTED: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    ACCEPTED
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Reads an image file into an embedded data URI.
pub fn from_file(path: &Path, max_bytes: u64) -> Result<ImageSource> {
    let mime = mime_for(path).ok_or_else(|| {
        ShipdexError::UploadRejected(
            "Please select a valid image file (JPG, PNG, GIF, WebP)".to_string(),
        )
    })?;

    let size = fs::metadata(path).map_err(ShipdexError::Io)?.len();
    if size > max_bytes {
        return Err(ShipdexError::UploadRejected(format!(
            "Image size should be less than {}",
            human_size(max_bytes)
        )));
    }

    let bytes = fs::read(path).map_err(ShipdexError::Io)?;
    Ok(ImageSource::DataUri(format!(
        "data:{};base64,{}",
        mime,
        STANDARD.encode(bytes)
    )))
}

/// Accepts an absolute http(s) link as-is.
pub fn from_url(raw: &str) -> Result<ImageSource> {
    let raw = raw.trim();
    let url = Url::parse(raw)
        .map_err(|e| ShipdexError::UploadRejected(format!("Not a usable image URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(ImageSource::Url(raw.to_string())),
        other => Err(ShipdexError::UploadRejected(format!(
            "Image URLs must be http or https, not {}",
            other
        ))),
    }
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
