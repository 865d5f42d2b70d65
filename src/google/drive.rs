//! Drive v3 files API.

use crate::error::ApiError;
use crate::google::client::{GoogleClient, Query};
use crate::models::DriveFile;
use crate::services::DriveService;
use async_trait::async_trait;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const FILE_FIELDS: &str = "nextPageToken,files(id,name,parents,mimeType,\
permissions(role,type,emailAddress),owners(emailAddress),\
lastModifyingUser(emailAddress),capabilities(canShare))";

/// Drive search expression for folders, optionally by name substring.
fn folder_query(name: Option<&str>) -> String {
    match name {
        Some(name) => format!(
            "mimeType='{}' and name contains '{}'",
            FOLDER_MIME_TYPE,
            escape(name)
        ),
        None => format!("mimeType='{}'", FOLDER_MIME_TYPE),
    }
}

fn children_query(folder_id: &str) -> String {
    format!("'{}' in parents", escape(folder_id))
}

/// Escape a literal for use inside single quotes in a Drive query.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn files_params(q: String) -> Query {
    vec![("q", q), ("fields", FILE_FIELDS.to_string())]
}

#[async_trait]
impl DriveService for GoogleClient {
    async fn find_folders(&self, name: Option<&str>) -> Result<Vec<DriveFile>, ApiError> {
        let url = self.drive_url("/files");
        self.fetch_list("folders", self.list(url, files_params(folder_query(name)), "files"))
            .await
    }

    async fn files_in_folder(&self, folder_id: &str) -> Result<Vec<DriveFile>, ApiError> {
        let url = self.drive_url("/files");
        self.fetch_list(
            "folder contents",
            self.list(url, files_params(children_query(folder_id)), "files"),
        )
        .await
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile, ApiError> {
        let url = self.drive_url(&format!("/files/{}", file_id));
        self.get(&url, &[("fields", "id,name".to_string())]).await
    }
}
