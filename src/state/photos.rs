/// Photo scanning and the gallery manifest
///
/// The gallery is seeded from a `photos/` directory next to the
/// executable's working directory, then extended with photos the user
/// adds through the file picker. Added photos are recorded in a JSON
/// manifest in the data directory so they survive restarts.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::Photo;

/// File extensions treated as gallery photos
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// One user-added photo as stored in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: PathBuf,
    pub caption: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("could not read or write the gallery manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("gallery manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestEntry {
    pub fn from_path(path: PathBuf) -> Self {
        let caption = caption_from_path(&path);
        Self { path, caption }
    }

    pub fn to_photo(&self) -> Photo {
        Photo {
            path: self.path.clone(),
            alt: format!("Photo: {}", self.caption),
            caption: self.caption.clone(),
        }
    }
}

/// Default caption: the file name without its extension
pub fn caption_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Photo".to_owned())
}

/// Whether a path looks like a photo we can display
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Scan a directory tree for photos, sorted by path for a stable
/// gallery order. A missing directory yields an empty gallery.
pub fn scan_photos(dir: &Path) -> Vec<Photo> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_image(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| ManifestEntry::from_path(path).to_photo())
        .collect()
}

/// Where the manifest of user-added photos lives
pub fn default_manifest_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("birthday-card");
    path.push("gallery.json");
    path
}

/// Load the manifest. A missing file is an empty gallery, not an error.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Save the manifest, creating its parent directory if needed.
pub fn save_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}
