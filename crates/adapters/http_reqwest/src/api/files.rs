//! `filemanager/*`.

use homeserver_app::ports::FileApi;
use homeserver_domain::error::ApiError;
use homeserver_domain::files::DirectoryListing;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use crate::client::HttpClient;
use crate::envelope;
use crate::error::transport_error;

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    content: String,
}

impl FileApi for HttpClient {
    async fn list_directory(&self, path: &str) -> Result<DirectoryListing, ApiError> {
        self.fetch(
            self.post(&["filemanager", "list"])
                .json(&json!({ "path": path })),
        )
        .await
    }

    async fn read_file(&self, path: &str) -> Result<String, ApiError> {
        let file: Content = self
            .fetch(
                self.post(&["filemanager", "read"])
                    .json(&json!({ "path": path })),
            )
            .await?;
        Ok(file.content)
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["filemanager", "write"])
                .json(&json!({ "path": path, "content": content })),
        )
        .await
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["filemanager", "create_folder"])
                .json(&json!({ "path": parent, "name": name })),
        )
        .await
    }

    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["filemanager", "rename"])
                .json(&json!({ "old_path": old_path, "new_name": new_name })),
        )
        .await
    }

    async fn delete_path(&self, path: &str) -> Result<String, ApiError> {
        self.acknowledge(
            self.post(&["filemanager", "delete"])
                .json(&json!({ "path": path })),
        )
        .await
    }

    /// The body is the raw file; only failures are enveloped.
    async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(
                self.post(&["filemanager", "download"])
                    .json(&json!({ "path": path })),
            )
            .await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(err, self.timeout()))?;
        if !status.is_success() {
            return Err(envelope::status_error(status, &body));
        }
        Ok(body.to_vec())
    }

    async fn upload(
        &self,
        directory: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let form = Form::new()
            .text("path", directory.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        self.acknowledge(self.post(&["filemanager", "upload"]).multipart(form))
            .await
    }
}
