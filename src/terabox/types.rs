//! Terabox wire types

use serde::{Deserialize, Deserializer};

use crate::resolver::{RawEntry, ShareListing, ShareSession, Thumbnails};

#[derive(Debug, Deserialize)]
pub(crate) struct ShortUrlInfoResponse {
    pub errno: i32,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub show_msg: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub list: Vec<FileItem>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sign: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub shareid: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub primaryid: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub uk: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileItem {
    #[serde(default, alias = "filename")]
    pub server_filename: String,
    #[serde(default, deserialize_with = "flag")]
    pub isdir: bool,
    #[serde(default, deserialize_with = "string_or_u64")]
    pub size: u64,
    // fs_id or fsid, as a string or a number
    #[serde(default, alias = "fsid", deserialize_with = "string_or_u64")]
    pub fs_id: u64,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub thumbs: Option<Thumbs>,
    #[serde(default, alias = "list")]
    pub children: Vec<FileItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbs {
    #[serde(default)]
    pub url1: Option<String>,
    #[serde(default)]
    pub url2: Option<String>,
    #[serde(default)]
    pub url3: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadResponse {
    pub errno: i32,
    #[serde(default)]
    pub errmsg: String,
    #[serde(default)]
    pub list: Vec<DownloadItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadItem {
    #[serde(default)]
    pub dlink: Option<String>,
}

impl DownloadResponse {
    pub fn dlink(self) -> Option<String> {
        self.list
            .into_iter()
            .next()
            .and_then(|item| item.dlink)
            .filter(|link| !link.is_empty())
    }
}

impl From<FileItem> for RawEntry {
    fn from(item: FileItem) -> Self {
        RawEntry {
            filename: item.server_filename,
            is_dir: item.isdir,
            size: item.size,
            fs_id: item.fs_id,
            md5: item.md5,
            thumbs: item.thumbs.map(|t| Thumbnails {
                url1: t.url1,
                url2: t.url2,
                url3: t.url3,
            }),
            children: item.children.into_iter().map(RawEntry::from).collect(),
        }
    }
}

impl ShortUrlInfoResponse {
    pub fn message(&self) -> &str {
        if self.errmsg.is_empty() {
            &self.show_msg
        } else {
            &self.errmsg
        }
    }

    pub fn into_listing(self, surl: &str) -> ShareListing {
        ShareListing {
            title: self.title,
            entries: self.list.into_iter().map(RawEntry::from).collect(),
            session: ShareSession {
                surl: surl.to_string(),
                share_id: if self.primaryid.is_empty() {
                    self.shareid
                } else {
                    self.primaryid
                },
                uk: self.uk,
                sign: self.sign,
                timestamp: self.timestamp,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
}

/// Accepts ids and sizes sent either as strings or numbers
fn string_or_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(StringOrNumber::Str(s)) if s.is_empty() => Ok(0),
        Some(StringOrNumber::Str(s)) => s.parse().map_err(Error::custom),
        Some(StringOrNumber::Uint(n)) => Ok(n),
        Some(StringOrNumber::Int(n)) => u64::try_from(n).map_err(Error::custom),
        Some(StringOrNumber::Float(f)) => Err(Error::custom(format!("expected integer, got {}", f))),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(StringOrNumber::Str(s)) => s,
        Some(StringOrNumber::Int(n)) => n.to_string(),
        Some(StringOrNumber::Uint(n)) => n.to_string(),
        Some(StringOrNumber::Float(f)) => f.to_string(),
    })
}

/// `isdir` shows up as 0/1, "0"/"1" or a bool depending on the endpoint
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Num(i64),
        Str(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(b)) => b,
        Some(Flag::Num(n)) => n != 0,
        Some(Flag::Str(s)) => matches!(s.trim(), "1" | "true"),
    })
}
