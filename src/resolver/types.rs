//! Share data types

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::format::{file_type, format_file_size, FileType};

/// Share-scoped parameters returned by enumeration and replayed on every link call.
#[derive(Debug, Clone, Default)]
pub struct ShareSession {
    /// Share token as it appears in the URL
    pub surl: String,
    /// Upstream internal share id (`shareid` / `primaryid`)
    pub share_id: String,
    pub uk: String,
    pub sign: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default)]
pub struct Thumbnails {
    pub url1: Option<String>,
    pub url2: Option<String>,
    pub url3: Option<String>,
}

impl Thumbnails {
    /// Largest available resolution.
    pub fn best(&self) -> Option<String> {
        [&self.url3, &self.url2, &self.url1]
            .into_iter()
            .flatten()
            .find(|u| !u.is_empty())
            .cloned()
    }
}

/// A node of the upstream file tree. Folders carry their children inline.
#[derive(Debug, Clone, Default)]
pub struct RawEntry {
    pub filename: String,
    pub is_dir: bool,
    pub size: u64,
    pub fs_id: u64,
    pub md5: Option<String>,
    pub thumbs: Option<Thumbnails>,
    pub children: Vec<RawEntry>,
}

impl RawEntry {
    pub fn file(filename: impl Into<String>, fs_id: u64, size: u64) -> Self {
        Self {
            filename: filename.into(),
            fs_id,
            size,
            ..Default::default()
        }
    }

    pub fn folder(filename: impl Into<String>, children: Vec<RawEntry>) -> Self {
        Self {
            filename: filename.into(),
            is_dir: true,
            children,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShareListing {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
    pub session: ShareSession,
}

/// A file entry with its root-relative path.
#[derive(Debug, Clone)]
pub struct FlatFile {
    pub filename: String,
    pub full_path: String,
    pub size: u64,
    pub fs_id: u64,
    pub md5: Option<String>,
    pub thumbs: Option<Thumbnails>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFile {
    pub filename: String,
    pub path: String,
    pub size: String,
    pub size_bytes: u64,
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub file_type: FileType,
    pub fs_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl ResolvedFile {
    pub fn new(file: FlatFile, download_url: String) -> Self {
        Self {
            size: format_file_size(file.size),
            file_type: file_type(&file.filename),
            thumbnail: file.thumbs.as_ref().and_then(Thumbnails::best),
            filename: file.filename,
            path: file.full_path,
            size_bytes: file.size,
            download_url,
            fs_id: file.fs_id,
            md5: file.md5.filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResult {
    pub share_title: String,
    pub share_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub files: Vec<ResolvedFile>,
    /// Flattened file count before the processing cap
    pub total_files: usize,
    pub processed_files: usize,
    pub timestamp: DateTime<Utc>,
}
