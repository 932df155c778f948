use std::fs::{self, File};
use std::path::Path;

use super::SetupError;

/// Stream `url` into `dest`, creating parent directories. Returns bytes written.
///
/// A partially written file is removed on failure.
pub fn download_file(url: &str, dest: &Path) -> Result<u64, SetupError> {
    tracing::info!("Downloading {} to {}", url, dest.display());

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let client = reqwest::blocking::Client::builder()
        .build()
        .map_err(|e| SetupError::Network(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| SetupError::Network(e.to_string()))?;

    if let Some(total) = response.content_length() {
        tracing::debug!(total_bytes = total, "Response received");
    }

    let mut file = File::create(dest)?;
    match response.copy_to(&mut file) {
        Ok(written) => {
            tracing::info!(bytes = written, "Download complete");
            Ok(written)
        }
        Err(e) => {
            drop(file);
            fs::remove_file(dest).ok();
            Err(SetupError::Network(e.to_string()))
        }
    }
}
