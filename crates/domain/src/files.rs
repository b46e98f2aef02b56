//! Files: remote file-system entries browsed through the backend.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{Timestamp, parse_backend_timestamp};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDirectory", alias = "is_directory", alias = "is_dir", default)]
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl FileItem {
    #[must_use]
    pub fn modified_at(&self) -> Option<Timestamp> {
        self.modified.as_deref().and_then(parse_backend_timestamp)
    }

    /// Size column: human readable for files, `-` for directories.
    #[must_use]
    pub fn size_label(&self) -> String {
        match (self.is_directory, self.size) {
            (false, Some(size)) => format_file_size(size),
            _ => "-".to_string(),
        }
    }
}

/// Content of `files/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    pub path: String,
    #[serde(default)]
    pub items: Vec<FileItem>,
}

impl DirectoryListing {
    /// Directories first, then files, each group sorted by name.
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
    }
}

/// A text file opened for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

/// Format a byte count with one decimal: `B`, `KB`, `MB`, `GB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Last segment of a slash separated path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Parent directory of `path`, `/` at the root.
#[must_use]
pub fn parent_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
    }
}

/// Join a directory and an entry name.
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Shortcut directories offered next to the path bar, as `(label, path)`.
pub const QUICK_ACCESS: [(&str, &str); 4] = [
    ("Root", "/"),
    ("Home", "/home"),
    ("Web", "/var/www"),
    ("Game", "/opt/gameservers"),
];

/// A clickable element of the path bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

/// Split `path` into breadcrumbs starting at `/`.
#[must_use]
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: "/".to_string(),
        path: "/".to_string(),
    }];
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: segment.to_string(),
            path: current.clone(),
        });
    }
    crumbs
}

/// Validate a new file or directory name typed by the user.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] when `name` is blank.
pub fn validate_entry_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_sizes_with_one_decimal() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn should_build_breadcrumbs() {
        let crumbs = breadcrumbs("/home/pi/games");
        let paths: Vec<_> = crumbs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/home", "/home/pi", "/home/pi/games"]);
        assert_eq!(crumbs[3].label, "games");
        assert_eq!(breadcrumbs("/").len(), 1);
    }

    #[test]
    fn should_compute_names_and_parents() {
        assert_eq!(file_name("/var/log/syslog"), "syslog");
        assert_eq!(file_name("/var/log/"), "log");
        assert_eq!(parent_path("/var/log"), "/var");
        assert_eq!(parent_path("/var"), "/");
        assert_eq!(join_path("/", "etc"), "/etc");
        assert_eq!(join_path("/etc", "hosts"), "/etc/hosts");
    }

    #[test]
    fn should_accept_both_directory_keys() {
        let a: FileItem =
            serde_json::from_str(r#"{"name":"a","path":"/a","isDirectory":true}"#).unwrap();
        let b: FileItem =
            serde_json::from_str(r#"{"name":"b","path":"/b","is_directory":true}"#).unwrap();
        assert!(a.is_directory && b.is_directory);
    }

    #[test]
    fn should_sort_directories_first() {
        let item = |name: &str, dir: bool| FileItem {
            name: name.to_string(),
            path: format!("/{name}"),
            is_directory: dir,
            size: None,
            modified: None,
        };
        let mut listing = DirectoryListing {
            path: "/".to_string(),
            items: vec![item("b.txt", false), item("zeta", true), item("A.txt", false)],
        };
        listing.sort();
        let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn should_label_directory_size_with_dash() {
        let dir = FileItem {
            name: "d".to_string(),
            path: "/d".to_string(),
            is_directory: true,
            size: Some(4096),
            modified: None,
        };
        assert_eq!(dir.size_label(), "-");
    }
}
