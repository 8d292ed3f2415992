use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, ServiceAccountAuth};
use crate::core::workspace::{
    DriveFile, DriveService, Folder, PermissionGrant, WorkspaceError,
};

const SERVICE: &str = "Drive";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const FILE_FIELDS: &str = "id,name,mimeType,webViewLink,trashed";

/// Minimal Drive API v3 client. Exposes only the calls the core layer needs.
pub struct GoogleDriveClient {
    client: Client,
    auth: ServiceAccountAuth,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    web_view_link: Option<String>,
    #[serde(default)]
    trashed: bool,
}

impl ApiFile {
    fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    fn into_drive_file(self) -> DriveFile {
        let url = self
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", self.id));
        DriveFile {
            id: self.id,
            name: self.name,
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<ApiFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPermission {
    id: String,
    #[serde(default)]
    role: String,
    email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermissionList {
    #[serde(default)]
    permissions: Vec<ApiPermission>,
    next_page_token: Option<String>,
}

/// Permissions with write access. Owners have role `owner` and are left out.
fn editor_permissions(permissions: Vec<ApiPermission>) -> Vec<(String, String)> {
    permissions
        .into_iter()
        .filter(|p| p.role == "writer")
        .filter_map(|p| p.email_address.map(|email| (p.id, email)))
        .collect()
}

impl GoogleDriveClient {
    pub fn new(auth: ServiceAccountAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
        }
    }

    /// Fetches file metadata; `None` on 404.
    async fn get_metadata(&self, id: &str) -> Result<Option<ApiFile>, WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .get(format!("{}/files/{}", self.base_url, id))
            .bearer_auth(token)
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(id, "Drive item not found");
            return Ok(None);
        }
        let file: ApiFile = ensure_success(SERVICE, response).await?.json().await?;
        Ok((!file.trashed).then_some(file))
    }

    /// Every writer permission on a file as (permission id, email).
    async fn editor_permissions(
        &self,
        file_id: &str,
    ) -> Result<Vec<(String, String)>, WorkspaceError> {
        let url = format!("{}/files/{}/permissions", self.base_url, file_id);
        let mut editors = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let token = self.auth.get_access_token().await?;
            let mut request = self.client.get(&url).bearer_auth(token).query(&[
                ("fields", "nextPageToken,permissions(id,role,type,emailAddress)"),
                ("supportsAllDrives", "true"),
                ("pageSize", "100"),
            ]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page)]);
            }

            let page: PermissionList =
                ensure_success(SERVICE, request.send().await?).await?.json().await?;
            editors.extend(editor_permissions(page.permissions));

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(editors)
    }

    async fn delete_permission(
        &self,
        file_id: &str,
        permission_id: &str,
    ) -> Result<(), WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .delete(format!(
                "{}/files/{}/permissions/{}",
                self.base_url, file_id, permission_id
            ))
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}

#[async_trait]
impl DriveService for GoogleDriveClient {
    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>, WorkspaceError> {
        Ok(self
            .get_metadata(folder_id)
            .await?
            .filter(ApiFile::is_folder)
            .map(|f| Folder {
                id: f.id,
                name: f.name,
            }))
    }

    async fn get_file(&self, file_id: &str) -> Result<Option<DriveFile>, WorkspaceError> {
        Ok(self
            .get_metadata(file_id)
            .await?
            .filter(|f| !f.is_folder())
            .map(ApiFile::into_drive_file))
    }

    async fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>, WorkspaceError> {
        let query = format!(
            "'{}' in parents and trashed = false and mimeType != '{}'",
            folder_id, FOLDER_MIME_TYPE
        );
        let fields = format!("nextPageToken,files({})", FILE_FIELDS);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let token = self.auth.get_access_token().await?;
            let mut request = self
                .client
                .get(format!("{}/files", self.base_url))
                .bearer_auth(token)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", fields.as_str()),
                    ("pageSize", "1000"),
                    ("supportsAllDrives", "true"),
                    ("includeItemsFromAllDrives", "true"),
                ]);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page)]);
            }

            let page: FileList = ensure_success(SERVICE, request.send().await?)
                .await?
                .json()
                .await?;
            files.extend(page.files.into_iter().map(ApiFile::into_drive_file));

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(folder_id, count = files.len(), "Listed folder");
        Ok(files)
    }

    async fn copy_file(
        &self,
        file_id: &str,
        name: &str,
        folder_id: &str,
    ) -> Result<DriveFile, WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .post(format!("{}/files/{}/copy", self.base_url, file_id))
            .bearer_auth(token)
            .query(&[("fields", FILE_FIELDS), ("supportsAllDrives", "true")])
            .json(&json!({ "name": name, "parents": [folder_id] }))
            .send()
            .await?;
        let copy: ApiFile = ensure_success(SERVICE, response).await?.json().await?;
        Ok(copy.into_drive_file())
    }

    async fn grant_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<(), WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let notify = if grant.notify { "true" } else { "false" };
        let response = self
            .client
            .post(format!("{}/files/{}/permissions", self.base_url, file_id))
            .bearer_auth(token)
            .query(&[
                ("sendNotificationEmail", notify),
                ("supportsAllDrives", "true"),
            ])
            .json(&json!({
                "type": "user",
                "role": grant.role.as_api_str(),
                "emailAddress": grant.email,
            }))
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;
        Ok(())
    }

    async fn list_editors(&self, file_id: &str) -> Result<Vec<String>, WorkspaceError> {
        Ok(self
            .editor_permissions(file_id)
            .await?
            .into_iter()
            .map(|(_, email)| email)
            .collect())
    }

    async fn remove_editor(&self, file_id: &str, email: &str) -> Result<(), WorkspaceError> {
        let permission_id = self
            .editor_permissions(file_id)
            .await?
            .into_iter()
            .find(|(_, e)| e.eq_ignore_ascii_case(email))
            .map(|(id, _)| id);
        let Some(permission_id) = permission_id else {
            tracing::debug!(file_id, email, "No editor permission to remove");
            return Ok(());
        };
        self.delete_permission(file_id, &permission_id).await
    }

    async fn remove_all_editors(&self, file_id: &str) -> Result<Vec<String>, WorkspaceError> {
        let editors = self.editor_permissions(file_id).await?;
        let mut removed = Vec::with_capacity(editors.len());
        for (permission_id, email) in editors {
            self.delete_permission(file_id, &permission_id).await?;
            removed.push(email);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_permissions_skip_owner_and_anyone() {
        let list: PermissionList = serde_json::from_str(
            r#"{
                "permissions": [
                    {"id": "1", "role": "owner", "type": "user", "emailAddress": "owner@x.com"},
                    {"id": "2", "role": "writer", "type": "user", "emailAddress": "s@x.com"},
                    {"id": "3", "role": "reader", "type": "user", "emailAddress": "r@x.com"},
                    {"id": "anyoneWithLink", "role": "writer", "type": "anyone"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            editor_permissions(list.permissions),
            vec![("2".to_string(), "s@x.com".to_string())]
        );
        assert!(list.next_page_token.is_none());
    }

    #[test]
    fn test_file_without_link_gets_view_url() {
        let file: ApiFile =
            serde_json::from_str(r#"{"id": "F1", "name": "Sheet", "mimeType": "text/csv"}"#)
                .unwrap();
        assert!(!file.is_folder());
        let file = file.into_drive_file();
        assert_eq!(file.url, "https://drive.google.com/file/d/F1/view");
    }

    #[test]
    fn test_folder_detection() {
        let file: ApiFile = serde_json::from_str(
            r#"{"id": "D1", "name": "Apps", "mimeType": "application/vnd.google-apps.folder"}"#,
        )
        .unwrap();
        assert!(file.is_folder());
    }

    #[test]
    fn test_file_list_paging_token() {
        let list: FileList = serde_json::from_str(
            r#"{"nextPageToken": "p2", "files": [{"id": "F1", "name": "a", "webViewLink": "https://x"}]}"#,
        )
        .unwrap();
        assert_eq!(list.next_page_token.as_deref(), Some("p2"));
        assert_eq!(list.files[0].web_view_link.as_deref(), Some("https://x"));
    }
}
