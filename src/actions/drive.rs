//! Drive folder and sharing reports.

use crate::error::ApiError;
use crate::models::{DriveFile, Permission};
use crate::services::DriveService;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// A folder with its sharing and direct contents.
#[derive(Debug, Clone, Serialize)]
pub struct FolderReport {
    pub id: String,
    pub name: String,
    /// Name of the first parent, when visible to the caller.
    pub parent: Option<String>,
    pub permissions: Vec<Permission>,
    pub files: Vec<FileReport>,
}

/// One item inside a folder.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    pub can_share: bool,
    pub last_modifier: Option<String>,
    pub owners: Vec<String>,
    pub permissions: Vec<Permission>,
}

impl From<DriveFile> for FileReport {
    fn from(file: DriveFile) -> Self {
        let can_share = file.can_share();
        Self {
            name: file.name,
            can_share,
            last_modifier: file.last_modifying_user.and_then(|u| u.email_address),
            owners: file
                .owners
                .into_iter()
                .filter_map(|o| o.email_address)
                .collect(),
            permissions: file.permissions,
        }
    }
}

pub struct DriveActions<'a> {
    drive: &'a dyn DriveService,
}

impl<'a> DriveActions<'a> {
    pub fn new(drive: &'a dyn DriveService) -> Self {
        Self { drive }
    }

    /// Every folder, or only those whose name contains `keyword`.
    pub async fn folders(&self, keyword: Option<&str>) -> Result<Vec<FolderReport>, ApiError> {
        let folders = self.drive.find_folders(keyword).await?;
        info!("Found {} folders", folders.len());

        let mut parent_names: HashMap<String, Option<String>> = HashMap::new();
        let mut reports = Vec::with_capacity(folders.len());

        for folder in folders {
            let parent = match folder.parents.first() {
                Some(parent_id) => self.parent_name(parent_id, &mut parent_names).await?,
                None => None,
            };
            let files = self.drive.files_in_folder(&folder.id).await?;

            reports.push(FolderReport {
                id: folder.id,
                name: folder.name,
                parent,
                permissions: folder.permissions,
                files: files.into_iter().map(FileReport::from).collect(),
            });
        }

        Ok(reports)
    }

    /// Look up a parent folder name once per id. A parent the caller cannot
    /// see (404 or 403) is reported as absent.
    async fn parent_name(
        &self,
        parent_id: &str,
        cache: &mut HashMap<String, Option<String>>,
    ) -> Result<Option<String>, ApiError> {
        if let Some(name) = cache.get(parent_id) {
            return Ok(name.clone());
        }

        let name = match self.drive.get_file(parent_id).await {
            Ok(parent) => Some(parent.name),
            Err(e) if matches!(e.status(), Some(403) | Some(404)) => {
                debug!("Parent {} not visible: {}", parent_id, e);
                None
            }
            Err(e) => return Err(e),
        };

        cache.insert(parent_id.to_string(), name.clone());
        Ok(name)
    }
}
