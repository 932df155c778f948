//! ZIP extraction for the dataset archive.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::SetupError;

/// Extract every entry of `zip_path` under `dest_dir`, keeping relative paths.
/// Returns the number of files written.
///
/// Entries whose names would escape `dest_dir` are skipped.
pub fn extract_archive(zip_path: &Path, dest_dir: &Path) -> Result<usize, SetupError> {
    tracing::info!("Extracting {} to {}", zip_path.display(), dest_dir.display());

    fs::create_dir_all(dest_dir)?;

    let file = File::open(zip_path)?;
    let mut archive =
        zip::ZipArchive::new(io::BufReader::new(file)).map_err(|e| SetupError::Archive(e.to_string()))?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| SetupError::Archive(e.to_string()))?;

        let relative_path = match entry.enclosed_name() {
            Some(path) => path.to_owned(),
            None => {
                tracing::warn!("Skipping unsafe archive entry {:?}", entry.name());
                continue;
            }
        };

        let out_path = dest_dir.join(&relative_path);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
            extracted += 1;
            tracing::debug!("Extracted: {}", relative_path.display());
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode)).ok();
            }
        }
    }

    tracing::info!(files = extracted, "Extraction complete");
    Ok(extracted)
}
