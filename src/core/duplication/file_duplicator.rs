use crate::core::workspace::{DriveFile, DriveService, Folder, WorkspaceError};

/// Copies one template file into a folder once per target name.
pub struct FileDuplicator<'a, D: ?Sized> {
    drive: &'a D,
}

impl<'a, D: DriveService + ?Sized> FileDuplicator<'a, D> {
    pub fn new(drive: &'a D) -> Self {
        Self { drive }
    }

    /// Creates the copies in list order. The first failed copy stops the run;
    /// copies made before it are kept.
    pub async fn duplicate(
        &self,
        template: &DriveFile,
        folder: &Folder,
        names: &[String],
    ) -> Result<Vec<DriveFile>, WorkspaceError> {
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let copy = self
                .drive
                .copy_file(&template.id, name, &folder.id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        name = name.as_str(),
                        done = created.len(),
                        "Copy failed: {}",
                        e
                    );
                    e
                })?;
            tracing::info!(name = name.as_str(), id = copy.id.as_str(), "Created copy");
            created.push(copy);
        }
        Ok(created)
    }
}
