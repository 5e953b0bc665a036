//! Folder tree flattening

use super::types::{FlatFile, RawEntry};

/// Depth-first, pre-order walk emitting files only. Folder contents take the
/// folder's place and their paths are joined with `/`.
pub fn flatten(entries: Vec<RawEntry>) -> Vec<FlatFile> {
    let mut files = Vec::new();
    walk(entries, None, &mut files);
    files
}

fn walk(entries: Vec<RawEntry>, parent: Option<&str>, out: &mut Vec<FlatFile>) {
    for entry in entries {
        let full_path = match parent {
            Some(parent) => format!("{}/{}", parent, entry.filename),
            None => entry.filename.clone(),
        };

        if entry.is_dir {
            walk(entry.children, Some(&full_path), out);
        } else {
            out.push(FlatFile {
                filename: entry.filename,
                full_path,
                size: entry.size,
                fs_id: entry.fs_id,
                md5: entry.md5,
                thumbs: entry.thumbs,
            });
        }
    }
}
