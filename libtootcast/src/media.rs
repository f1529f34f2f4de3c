//! Media attachment resolution
//!
//! Positional file arguments with a recognized image extension become
//! upload descriptors. `--description` values pair with the accepted files
//! in the order both were given.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Attachment cap per post, the instance-side limit.
pub const MAX_ATTACHMENTS: usize = 4;

/// Image types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaMimeType {
    Jpeg,
    Png,
    Gif,
}

impl MediaMimeType {
    /// Detect from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// The MIME type string sent with the upload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl fmt::Display for MediaMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One media file ready for upload.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: MediaMimeType,
    pub description: Option<String>,
}

pub(crate) fn is_media_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(MediaMimeType::from_extension)
        .is_some()
}

/// Collect media files from the positional arguments.
///
/// An unreadable file is skipped with a warning rather than aborting the
/// toot; files beyond the attachment cap are dropped the same way.
pub fn resolve(positionals: &[String], descriptions: &[String]) -> Vec<MediaFile> {
    let mut media = Vec::new();
    for arg in positionals {
        let path = Path::new(arg);
        let Some(mime) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(MediaMimeType::from_extension)
        else {
            continue;
        };

        if std::fs::metadata(path).is_err() {
            warn!("cannot read media file {}, skipping", path.display());
            continue;
        }
        if media.len() == MAX_ATTACHMENTS {
            warn!(
                "attachment limit is {}, skipping {}",
                MAX_ATTACHMENTS,
                path.display()
            );
            continue;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(arg)
            .to_string();
        let description = descriptions.get(media.len()).cloned();
        media.push(MediaFile {
            path: path.to_path_buf(),
            name,
            mime,
            description,
        });
    }
    media
}
