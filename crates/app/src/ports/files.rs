//! File port: the backend file manager.

use std::future::Future;

use homeserver_domain::error::ApiError;
use homeserver_domain::files::DirectoryListing;

pub trait FileApi: Send + Sync {
    /// `POST filemanager/list`.
    fn list_directory(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<DirectoryListing, ApiError>> + Send;

    /// `POST filemanager/read`.
    fn read_file(&self, path: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST filemanager/write`.
    fn write_file(
        &self,
        path: &str,
        content: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST filemanager/create_folder`.
    fn create_folder(
        &self,
        parent: &str,
        name: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST filemanager/rename`.
    fn rename(
        &self,
        old_path: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST filemanager/delete`.
    fn delete_path(&self, path: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST filemanager/download`. Raw file bytes.
    fn download(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;

    /// `POST filemanager/upload` (multipart `file` + `path`).
    fn upload(
        &self,
        directory: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;
}
