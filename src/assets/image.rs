// Downloadable image identity and its on-disk sidecar metadata

use crate::hash;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const QUERY_TAG_LEN: usize = 12;

/// A remote image, identified by its URL.
///
/// The local file lives at a path derived from the URL beneath an image
/// root, so every manager and client agrees on where an image is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetImage {
    url: String,
}

impl AssetImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path of the cached file under `root`.
    ///
    /// Built from the URL's host and path segments; anything that could
    /// escape `root` is dropped. A query string tags the file name with a
    /// short hash of the query so variants of one resource stay apart.
    /// URLs without usable segments fall back to the SHA-256 of the URL.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        let without_scheme = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        // fragments never reach the server
        let without_fragment = without_scheme
            .split('#')
            .next()
            .unwrap_or(without_scheme);
        let (resource, query) = match without_fragment.split_once('?') {
            Some((resource, query)) => (resource, Some(query).filter(|q| !q.is_empty())),
            None => (without_fragment, None),
        };

        let mut segments: Vec<String> = resource
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .map(sanitize_segment)
            .collect();

        // a bare host is not a file
        if segments.len() < 2 {
            return root.join(format!("{}.img", hash::sha256_hex(self.url.as_bytes())));
        }

        if let (Some(query), Some(name)) = (query, segments.last_mut()) {
            *name = tag_file_name(name, &hash::sha256_hex(query.as_bytes())[..QUERY_TAG_LEN]);
        }

        segments.iter().fold(root.to_path_buf(), |path, s| path.join(s))
    }

    /// Path of the JSON sidecar next to the cached file.
    pub fn metadata_path(&self, root: &Path) -> PathBuf {
        with_suffix(&self.local_path(root), ".json")
    }

    pub fn has_metadata(&self, root: &Path) -> bool {
        self.metadata_path(root).exists()
    }

    pub fn load_metadata(&self, root: &Path) -> anyhow::Result<ImageMetadata> {
        let path = self.metadata_path(root);
        let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn save_metadata(&self, root: &Path, metadata: &ImageMetadata) -> anyhow::Result<()> {
        let path = self.metadata_path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec(metadata)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for AssetImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// `path` with `suffix` appended to its full file name, so `icon.png`
/// becomes `icon.png.json` rather than `icon.json`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Insert `tag` before the extension, keeping it decodable by extension.
fn tag_file_name(name: &str, tag: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, tag, ext),
        _ => format!("{}-{}", name, tag),
    }
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Bookkeeping stored next to each cached image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub version_downloaded: String,
    pub last_version_checked_against: String,
}

impl ImageMetadata {
    pub fn new(version: &str) -> Self {
        Self {
            version_downloaded: version.to_string(),
            last_version_checked_against: version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ICON: &str = "https://media.valorant-api.com/agents/5f8d3a7f/displayicon.png";

    #[test]
    fn test_local_path_follows_url() {
        let root = Path::new("/cache/images");
        let image = AssetImage::new(ICON);
        assert_eq!(
            image.local_path(root),
            root.join("media.valorant-api.com/agents/5f8d3a7f/displayicon.png")
        );
        assert_eq!(
            image.metadata_path(root),
            root.join("media.valorant-api.com/agents/5f8d3a7f/displayicon.png.json")
        );
    }

    #[test]
    fn test_local_path_stays_under_root() {
        let root = Path::new("/cache/images");
        let image = AssetImage::new("https://evil.example/../../etc/passwd#frag");
        let path = image.local_path(root);
        assert!(path.starts_with(root));
        assert_eq!(path, root.join("evil.example/etc/passwd"));
    }

    #[test]
    fn test_query_variants_get_distinct_files() {
        let root = Path::new("/cache");
        let small = AssetImage::new("https://media.example/agents/jett/icon.png?w=64");
        let large = AssetImage::new("https://media.example/agents/jett/icon.png?w=512");
        let plain = AssetImage::new("https://media.example/agents/jett/icon.png");

        let small_path = small.local_path(root);
        assert_ne!(small_path, large.local_path(root));
        assert_ne!(small_path, plain.local_path(root));
        assert_ne!(small.metadata_path(root), large.metadata_path(root));

        // still under the resource's directory and decodable by extension
        assert_eq!(small_path.parent(), Some(root.join("media.example/agents/jett").as_path()));
        assert_eq!(small_path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(small_path, small.clone().local_path(root));
    }

    #[test]
    fn test_fragment_does_not_change_file() {
        let root = Path::new("/cache");
        let plain = AssetImage::new("https://media.example/agents/jett/icon.png");
        let anchored = AssetImage::new("https://media.example/agents/jett/icon.png#top");
        assert_eq!(plain.local_path(root), anchored.local_path(root));
    }

    #[test]
    fn test_same_stem_images_keep_separate_sidecars() {
        let root = Path::new("/cache");
        let png = AssetImage::new("https://media.example/maps/ascent/splash.png");
        let jpg = AssetImage::new("https://media.example/maps/ascent/splash.jpg");

        assert_ne!(png.local_path(root), jpg.local_path(root));
        assert_ne!(png.metadata_path(root), jpg.metadata_path(root));
        assert_eq!(
            jpg.metadata_path(root),
            root.join("media.example/maps/ascent/splash.jpg.json")
        );
    }

    #[test]
    fn test_bare_host_falls_back_to_hash() {
        let root = Path::new("/cache");
        let image = AssetImage::new("https://media.valorant-api.com/");
        let path = image.local_path(root);
        assert_eq!(path.parent(), Some(root));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("img"));
        assert_eq!(path, image.clone().local_path(root));
    }

    #[test]
    fn test_json_image_gets_distinct_sidecar() {
        let root = Path::new("/cache");
        let image = AssetImage::new("https://example.com/data/layout.json");
        assert_ne!(image.local_path(root), image.metadata_path(root));
        assert_eq!(
            image.metadata_path(root),
            root.join("example.com/data/layout.json.json")
        );
    }

    #[test]
    fn test_metadata_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let image = AssetImage::new(ICON);
        assert!(!image.has_metadata(dir.path()));

        image
            .save_metadata(dir.path(), &ImageMetadata::new("release-09.07"))
            .unwrap();

        let raw = fs::read_to_string(image.metadata_path(dir.path())).unwrap();
        assert!(raw.contains("\"versionDownloaded\":\"release-09.07\""));
        assert!(raw.contains("\"lastVersionCheckedAgainst\":\"release-09.07\""));
        assert_eq!(
            image.load_metadata(dir.path()).unwrap(),
            ImageMetadata::new("release-09.07")
        );
    }

    #[test]
    fn test_serializes_as_bare_url() {
        let image = AssetImage::new(ICON);
        assert_eq!(serde_json::to_string(&image).unwrap(), format!("\"{}\"", ICON));
    }
}
