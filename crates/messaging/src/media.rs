//! Attachment classification and local media storage.

use std::path::{Path, PathBuf};

use anyhow::Context;
use courier_config::MediaConfig;
use courier_database::MessageKind;
use tracing::info;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// Classifies a message by its attachment extensions. All-image sets give
/// `Image`, all-video sets give `Video`, anything else with attachments is
/// `Mixed`; no attachments means plain `Text`.
pub fn kind_for_attachments(urls: &[String]) -> MessageKind {
    if urls.is_empty() {
        return MessageKind::Text;
    }
    let all_images = urls.iter().all(|url| has_extension_in(url, IMAGE_EXTENSIONS));
    if all_images {
        return MessageKind::Image;
    }
    let all_videos = urls.iter().all(|url| has_extension_in(url, VIDEO_EXTENSIONS));
    if all_videos {
        return MessageKind::Video;
    }
    MessageKind::Mixed
}

fn has_extension_in(url: &str, extensions: &[&str]) -> bool {
    match url.rsplit_once('.') {
        Some((_, ext)) => extensions.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Writes uploaded files to a local directory and hands back public URLs.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Persists `bytes` under a unique name derived from `filename` and
    /// returns the URL clients use to reference the attachment.
    pub async fn store(&self, bytes: &[u8], filename: &str) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload directory {}", self.root.display()))?;
        let stored_name = format!("{}_{}", cuid2::create_id(), sanitize_filename(filename));
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing upload {}", path.display()))?;
        info!(file = %stored_name, size = bytes.len(), "stored upload");
        Ok(format!("{}/{}", self.public_base_url, stored_name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_attachments_is_text() {
        assert_eq!(kind_for_attachments(&[]), MessageKind::Text);
    }

    #[test]
    fn all_images_is_image() {
        let kind = kind_for_attachments(&urls(&["a.jpg", "b.PNG", "c.avif"]));
        assert_eq!(kind, MessageKind::Image);
    }

    #[test]
    fn all_videos_is_video() {
        let kind = kind_for_attachments(&urls(&["a.mp4", "b.mp4"]));
        assert_eq!(kind, MessageKind::Video);
    }

    #[test]
    fn image_and_video_is_mixed() {
        let kind = kind_for_attachments(&urls(&["a.jpg", "b.mp4"]));
        assert_eq!(kind, MessageKind::Mixed);
    }

    #[test]
    fn unknown_extension_is_mixed() {
        assert_eq!(kind_for_attachments(&urls(&["a.pdf"])), MessageKind::Mixed);
        assert_eq!(kind_for_attachments(&urls(&["noext"])), MessageKind::Mixed);
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("photo of me.jpg"), "photo_of_me.jpg");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = MediaConfig {
            upload_dir: dir.path().to_string_lossy().into_owned(),
            public_base_url: "http://127.0.0.1:5000/uploads/".into(),
        };
        let store = LocalMediaStore::new(&config);

        let url = store.store(b"hello", "pic.jpg").await.unwrap();

        assert!(url.starts_with("http://127.0.0.1:5000/uploads/"));
        assert!(url.ends_with("_pic.jpg"));
        let stored_name = url.rsplit('/').next().unwrap();
        let bytes = tokio::fs::read(dir.path().join(stored_name)).await.unwrap();
        assert_eq!(bytes, b"hello");
    }
}
