//! File manager simulation over a flat map of absolute paths.

use std::collections::BTreeMap;

use homeserver_app::ports::FileApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::files::{DirectoryListing, FileItem, file_name, join_path, parent_path};
use homeserver_domain::time::now;

use crate::{VirtualBackend, bad_request, not_found};

/// A file system entry.
pub(crate) enum Node {
    Dir,
    File { bytes: Vec<u8>, modified: String },
}

fn file(content: &str) -> Node {
    Node::File {
        bytes: content.as_bytes().to_vec(),
        modified: now().to_rfc3339(),
    }
}

pub(crate) fn seed() -> BTreeMap<String, Node> {
    let mut files = BTreeMap::new();
    for dir in [
        "/",
        "/home",
        "/home/pi",
        "/var",
        "/var/www",
        "/var/www/html",
        "/opt",
        "/opt/gameservers",
    ] {
        files.insert(dir.to_string(), Node::Dir);
    }
    files.insert("/home/pi/notes.txt".to_string(), file("remember to update gravity\n"));
    files.insert(
        "/var/www/html/index.html".to_string(),
        file("<html><body>It works!</body></html>\n"),
    );
    files
}

pub(crate) fn is_dir(files: &BTreeMap<String, Node>, path: &str) -> bool {
    matches!(files.get(path), Some(Node::Dir))
}

fn is_child(path: &str, dir: &str) -> bool {
    path != dir && parent_path(path) == dir
}

fn is_within(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Direct children of `dir`, `None` when it is not a directory.
pub(crate) fn children(files: &BTreeMap<String, Node>, dir: &str) -> Option<Vec<FileItem>> {
    if !is_dir(files, dir) {
        return None;
    }
    let items = files
        .iter()
        .filter(|(path, _)| is_child(path, dir))
        .map(|(path, node)| match node {
            Node::Dir => FileItem {
                name: file_name(path).to_string(),
                path: path.clone(),
                is_directory: true,
                size: None,
                modified: None,
            },
            Node::File { bytes, modified } => FileItem {
                name: file_name(path).to_string(),
                path: path.clone(),
                is_directory: false,
                size: Some(bytes.len() as u64),
                modified: Some(modified.clone()),
            },
        })
        .collect();
    Some(items)
}

fn normalise(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn write(files: &mut BTreeMap<String, Node>, path: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
    if !is_dir(files, &parent_path(path)) {
        return Err(not_found("directory"));
    }
    if is_dir(files, path) {
        return Err(bad_request(format!("'{path}' is a directory")));
    }
    files.insert(
        path.to_string(),
        Node::File {
            bytes,
            modified: now().to_rfc3339(),
        },
    );
    Ok(())
}

impl FileApi for VirtualBackend {
    async fn list_directory(&self, path: &str) -> Result<DirectoryListing, ApiError> {
        self.with_state(|state| {
            let path = normalise(path);
            let items = children(&state.files, &path).ok_or_else(|| not_found("directory"))?;
            Ok(DirectoryListing { path, items })
        })
        .await
    }

    async fn read_file(&self, path: &str) -> Result<String, ApiError> {
        self.with_state(|state| match state.files.get(&normalise(path)) {
            Some(Node::File { bytes, .. }) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Some(Node::Dir) => Err(bad_request(format!("'{path}' is a directory"))),
            None => Err(not_found("file")),
        })
        .await
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            write(&mut state.files, &normalise(path), content.as_bytes().to_vec())?;
            Ok("File saved".to_string())
        })
        .await
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let parent = normalise(parent);
            if !is_dir(&state.files, &parent) {
                return Err(not_found("directory"));
            }
            let path = join_path(&parent, name);
            if state.files.contains_key(&path) {
                return Err(bad_request(format!("'{name}' already exists")));
            }
            state.files.insert(path, Node::Dir);
            Ok("Folder created".to_string())
        })
        .await
    }

    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let old_path = normalise(old_path);
            if old_path == "/" || !state.files.contains_key(&old_path) {
                return Err(not_found("file"));
            }
            let new_path = join_path(&parent_path(&old_path), new_name);
            if state.files.contains_key(&new_path) {
                return Err(bad_request(format!("'{new_name}' already exists")));
            }
            let moved: Vec<String> = state
                .files
                .keys()
                .filter(|path| is_within(path, &old_path))
                .cloned()
                .collect();
            for path in moved {
                if let Some(node) = state.files.remove(&path) {
                    let target = format!("{new_path}{}", &path[old_path.len()..]);
                    state.files.insert(target, node);
                }
            }
            Ok("Renamed".to_string())
        })
        .await
    }

    async fn delete_path(&self, path: &str) -> Result<String, ApiError> {
        self.with_state(|state| {
            let path = normalise(path);
            if path == "/" {
                return Err(bad_request("refusing to delete '/'"));
            }
            if !state.files.contains_key(&path) {
                return Err(not_found("file"));
            }
            state.files.retain(|existing, _| !is_within(existing, &path));
            Ok("Deleted".to_string())
        })
        .await
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.with_state(|state| match state.files.get(&normalise(path)) {
            Some(Node::File { bytes, .. }) => Ok(bytes.clone()),
            _ => Err(not_found("file")),
        })
        .await
    }

    async fn upload(
        &self,
        directory: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        self.with_state(|state| {
            let path = join_path(&normalise(directory), file_name);
            write(&mut state.files, &path, bytes)?;
            Ok(format!("{file_name} uploaded"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_list_direct_children_only() {
        let backend = VirtualBackend::default();

        let listing = backend.list_directory("/var/").await.unwrap();

        assert_eq!(listing.path, "/var");
        let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["www"]);
    }

    #[tokio::test]
    async fn should_list_root_children() {
        let backend = VirtualBackend::default();

        let listing = backend.list_directory("/").await.unwrap();

        let names: Vec<_> = listing.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["home", "opt", "var"]);
    }

    #[tokio::test]
    async fn should_move_children_on_rename() {
        let backend = VirtualBackend::default();

        backend.rename("/var/www", "web").await.unwrap();

        let content = backend.read_file("/var/web/html/index.html").await.unwrap();
        assert!(content.contains("It works!"));
        assert!(backend.list_directory("/var/www").await.is_err());
    }

    #[tokio::test]
    async fn should_delete_directory_recursively() {
        let backend = VirtualBackend::default();

        backend.delete_path("/home/pi").await.unwrap();

        assert!(backend.read_file("/home/pi/notes.txt").await.is_err());
        assert!(backend.list_directory("/home").await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn should_round_trip_upload_and_download() {
        let backend = VirtualBackend::default();

        backend
            .upload("/home/pi", "photo.jpg", vec![0xff, 0xd8, 0xff])
            .await
            .unwrap();
        let bytes = backend.download("/home/pi/photo.jpg").await.unwrap();

        assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[tokio::test]
    async fn should_refuse_existing_folder_name() {
        let backend = VirtualBackend::default();

        let err = backend.create_folder("/home", "pi").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn should_not_write_into_missing_directory() {
        let backend = VirtualBackend::default();

        assert!(backend.write_file("/nope/a.txt", "x").await.is_err());
    }
}
