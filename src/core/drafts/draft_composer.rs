use crate::core::config::{DraftTemplate, RecordKeys};
use crate::core::records::Record;
use crate::core::workspace::{DraftMessage, MailService, WorkspaceError};

/// Builds one personalised draft per record from a fixed HTML template.
pub struct DraftComposer<'a, M: ?Sized> {
    mail: &'a M,
    template: &'a DraftTemplate,
    keys: &'a RecordKeys,
}

impl<'a, M: MailService + ?Sized> DraftComposer<'a, M> {
    pub fn new(mail: &'a M, template: &'a DraftTemplate, keys: &'a RecordKeys) -> Self {
        Self {
            mail,
            template,
            keys,
        }
    }

    /// Addressed to the student, copying the instructor.
    pub fn compose(&self, record: &Record) -> Result<DraftMessage, WorkspaceError> {
        let to = record.require(&self.keys.student_email)?.to_string();
        let cc = record
            .get(&self.keys.instructor_email)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        let html_body = format!(
            "Dear {student},<br>(CC: Prof. {instructor})<br><br>\
             Please access your Application Sheet below.<br>{link}<br><br>\
             ONLY if you have any questions, please reply back to us.</p><br><br>\
             Sincerely,<br><br>{signature}",
            student = record.get_or_blank(&self.keys.student_name),
            instructor = record.get_or_blank(&self.keys.instructor_name),
            link = record.get_or_blank(&self.keys.file_link),
            signature = self.template.signature,
        );

        Ok(DraftMessage {
            to,
            cc,
            subject: self.template.subject.clone(),
            html_body,
        })
    }

    /// Creates the drafts in record order and returns how many were made. The
    /// first failure stops the run; drafts already created stay in place.
    pub async fn create_drafts(&self, records: &[Record]) -> Result<usize, WorkspaceError> {
        let mut created = 0;
        for record in records {
            let message = self.compose(record)?;
            let draft_id = self.mail.create_draft(&message).await?;
            tracing::info!(to = message.to.as_str(), draft_id = draft_id.as_str(), "Draft created");
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::records_from_table;
    use crate::infra::memory::InMemoryWorkspace;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&[
            "Student Email",
            "Instructor Email",
            "Student Name(ENG)",
            "Instructor Name(ENG)",
            "File Link",
        ])
    }

    #[test]
    fn test_compose_fills_template() {
        let workspace = InMemoryWorkspace::new();
        let template = DraftTemplate::default();
        let keys = RecordKeys::default();
        let records = records_from_table(
            &header(),
            &[row(&["s@x.com", "i@x.com", "Sam", "Ito", "https://docs/F1"])],
        );

        let draft = DraftComposer::new(&workspace, &template, &keys)
            .compose(&records[0])
            .unwrap();

        assert_eq!(draft.to, "s@x.com");
        assert_eq!(draft.cc.as_deref(), Some("i@x.com"));
        assert_eq!(draft.subject, "Please Access the Application Sheet");
        assert!(draft.html_body.starts_with("Dear Sam,<br>(CC: Prof. Ito)<br><br>"));
        assert!(draft.html_body.contains("<br>https://docs/F1<br>"));
        assert!(draft.html_body.ends_with("Sincerely,<br><br>Division Name"));
    }

    #[test]
    fn test_blank_instructor_means_no_cc() {
        let workspace = InMemoryWorkspace::new();
        let template = DraftTemplate::default();
        let keys = RecordKeys::default();
        let records = records_from_table(&header(), &[row(&["s@x.com"])]);

        let draft = DraftComposer::new(&workspace, &template, &keys)
            .compose(&records[0])
            .unwrap();

        assert_eq!(draft.cc, None);
    }

    #[tokio::test]
    async fn test_one_draft_per_record_and_reruns_duplicate() {
        let workspace = InMemoryWorkspace::new();
        let template = DraftTemplate::default();
        let keys = RecordKeys::default();
        let records = records_from_table(
            &header(),
            &[
                row(&["a@x.com", "i@x.com", "A", "I", "L1"]),
                row(&["b@x.com", "i@x.com", "B", "I", "L2"]),
            ],
        );
        let composer = DraftComposer::new(&workspace, &template, &keys);

        assert_eq!(composer.create_drafts(&records).await.unwrap(), 2);
        assert_eq!(composer.create_drafts(&records).await.unwrap(), 2);

        let recipients: Vec<String> = workspace.drafts().into_iter().map(|d| d.to).collect();
        assert_eq!(recipients, vec!["a@x.com", "b@x.com", "a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn test_malformed_record_stops_the_loop() {
        let workspace = InMemoryWorkspace::new();
        let template = DraftTemplate::default();
        let keys = RecordKeys::default();
        let records = records_from_table(
            &header(),
            &[
                row(&["a@x.com", "i@x.com", "A", "I", "L1"]),
                row(&["", "i@x.com", "B", "I", "L2"]),
                row(&["c@x.com", "i@x.com", "C", "I", "L3"]),
            ],
        );

        let result = DraftComposer::new(&workspace, &template, &keys)
            .create_drafts(&records)
            .await;

        assert!(matches!(result, Err(WorkspaceError::MissingField(_))));
        assert_eq!(workspace.drafts().len(), 1);
    }
}
