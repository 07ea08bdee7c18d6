use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{BuildError, BuildResult};

/// In-process zip extraction.
#[derive(Debug, Default, Clone)]
pub struct BuiltinUnzip;

impl BuiltinUnzip {
    pub async fn unpack(&self, archive: &Path, destination: &Path) -> BuildResult<bool> {
        let archive = archive.to_path_buf();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || extract_zip_file(&archive, &destination))
            .await
            .map_err(|e| BuildError::Other(format!("Task join error: {e}")))??;

        Ok(true)
    }
}

/// Extract every entry of `zip_path` under `destination`, keeping the
/// archive's own layout.
pub fn extract_zip_file(zip_path: &Path, destination: &Path) -> BuildResult<()> {
    let zip_file = std::fs::File::open(zip_path).map_err(|source| BuildError::Io {
        path: zip_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(zip_file)?;

    std::fs::create_dir_all(destination).map_err(|source| BuildError::Io {
        path: destination.to_path_buf(),
        source,
    })?;

    for index in 0..archive.len() {
        let mut zipped = archive.by_index(index)?;

        let Some(relative) = zipped.enclosed_name() else {
            warn!("Skipping unsafe zip entry {:?}", zipped.name());
            continue;
        };
        let out_path: PathBuf = destination.join(relative);

        if zipped.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|source| BuildError::Io {
                path: out_path,
                source,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| BuildError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut out = std::fs::File::create(&out_path).map_err(|source| BuildError::Io {
            path: out_path.clone(),
            source,
        })?;
        std::io::copy(&mut zipped, &mut out).map_err(|source| BuildError::Io {
            path: out_path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = zipped.unix_mode() {
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|source| BuildError::Io {
                        path: out_path.clone(),
                        source,
                    })?;
            }
        }
    }

    debug!(
        "Extracted {} entries from {:?} into {:?}",
        archive.len(),
        zip_path,
        destination
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;

    /// Build an in-memory zip from `(name, contents)` pairs.
    /// Names ending in `/` become directories.
    pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }
}
