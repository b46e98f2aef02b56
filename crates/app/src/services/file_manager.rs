//! File manager: browse and edit the server file system.
//!
//! The manager remembers the directory it listed last. Operations that change
//! that directory (create, rename, delete, upload) list it again afterwards
//! so [`FileManager::listing`] never shows a stale view.

use homeserver_domain::error::HomeServerError;
use homeserver_domain::files::{self, Breadcrumb, DirectoryListing, FileContent};

use crate::ports::{FileApi, Notifier};
use crate::services::ServiceContext;

pub struct FileManager<A, N> {
    ctx: ServiceContext<A, N>,
    listing: DirectoryListing,
}

impl<A: FileApi, N: Notifier> FileManager<A, N> {
    #[must_use]
    pub fn new(ctx: ServiceContext<A, N>) -> Self {
        Self {
            ctx,
            listing: DirectoryListing {
                path: "/".to_string(),
                items: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.listing.path
    }

    /// Directory shown last, directories first.
    #[must_use]
    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        files::breadcrumbs(&self.listing.path)
    }

    /// List `path` and make it the current directory.
    ///
    /// On failure the previous directory stays current.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn open(&mut self, path: &str) -> Result<&DirectoryListing, HomeServerError> {
        let mut listing = self
            .ctx
            .call(self.ctx.api().list_directory(path))
            .await
            .map_err(|err| self.ctx.fail("Could not open directory", err))?;
        if listing.path.is_empty() {
            listing.path = path.to_string();
        }
        listing.sort();
        tracing::debug!(path = %listing.path, items = listing.items.len(), "directory listed");
        self.listing = listing;
        Ok(&self.listing)
    }

    /// List the current directory again.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn refresh(&mut self) -> Result<&DirectoryListing, HomeServerError> {
        let path = self.listing.path.clone();
        self.open(&path).await
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn go_up(&mut self) -> Result<&DirectoryListing, HomeServerError> {
        let parent = files::parent_path(&self.listing.path);
        self.open(&parent).await
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn read(&self, path: &str) -> Result<FileContent, HomeServerError> {
        let content = self
            .ctx
            .call(self.ctx.api().read_file(path))
            .await
            .map_err(|err| self.ctx.fail("Could not read file", err))?;
        Ok(FileContent {
            path: path.to_string(),
            content,
        })
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    #[tracing::instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn write(&self, path: &str, content: &str) -> Result<(), HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().write_file(path, content))
            .await
            .map_err(|err| self.ctx.fail("Could not save file", err))?;
        self.ctx.succeed(&message, "File saved");
        Ok(())
    }

    /// Create `name` inside the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request for a blank
    /// name, or the backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_folder(&mut self, name: &str) -> Result<(), HomeServerError> {
        let name = files::validate_entry_name(name).map_err(|err| self.ctx.fail("Folder", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().create_folder(&self.listing.path, name))
            .await
            .map_err(|err| self.ctx.fail("Could not create folder", err))?;
        self.ctx.succeed(&message, "Folder created");
        self.refresh_after_change().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] before any request for a blank
    /// name, or the backend failure.
    #[tracing::instrument(skip(self))]
    pub async fn rename(&mut self, path: &str, new_name: &str) -> Result<(), HomeServerError> {
        let new_name =
            files::validate_entry_name(new_name).map_err(|err| self.ctx.fail("Rename", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().rename(path, new_name))
            .await
            .map_err(|err| self.ctx.fail("Could not rename", err))?;
        self.ctx.succeed(&message, "Renamed");
        self.refresh_after_change().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, path: &str) -> Result<(), HomeServerError> {
        let message = self
            .ctx
            .call(self.ctx.api().delete_path(path))
            .await
            .map_err(|err| {
                self.ctx
                    .fail(&format!("Could not delete {}", files::file_name(path)), err)
            })?;
        self.ctx.succeed(&message, "Deleted");
        self.refresh_after_change().await;
        Ok(())
    }

    /// Raw content of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Api`] when the request fails.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, HomeServerError> {
        self.ctx
            .call(self.ctx.api().download(path))
            .await
            .map_err(|err| self.ctx.fail("Download failed", err))
    }

    /// Upload `bytes` as `file_name` into the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`HomeServerError::Validation`] for a blank file name, or the
    /// backend failure.
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<(), HomeServerError> {
        let file_name =
            files::validate_entry_name(file_name).map_err(|err| self.ctx.fail("Upload", err))?;
        let message = self
            .ctx
            .call(self.ctx.api().upload(&self.listing.path, file_name, bytes))
            .await
            .map_err(|err| self.ctx.fail("Upload failed", err))?;
        self.ctx.succeed(&message, &format!("{file_name} uploaded"));
        self.refresh_after_change().await;
        Ok(())
    }

    async fn refresh_after_change(&mut self) {
        // already notified by `open`
        let _ = self.refresh().await;
    }
}
