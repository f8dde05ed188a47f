use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Reads `file_path` and deserializes its JSON content into `T`.
///
/// Fails with `Error::IoError` when the file cannot be read and with
/// `Error::DeserializationError` when the content does not match `T`.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let file_path = file_path.as_ref();
    let data = fs::read_to_string(file_path)?;
    log::debug!("Read {} bytes from {}", data.len(), file_path.display());

    parse_json_str(&data)
}

pub fn parse_json_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    Ok(serde_json::from_str(data)?)
}
