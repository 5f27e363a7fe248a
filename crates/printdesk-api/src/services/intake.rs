//! The order-intake pipeline.
//!
//! One submission flows through reconciliation, per-file routing, and
//! notification dispatch. Per-file upload failures are recorded and never
//! abort sibling files; a notification dispatch failure fails the request
//! even when uploads already succeeded (uploaded objects are not rolled
//! back).

use std::sync::Arc;

use bytes::Bytes;

use printdesk_core::notify::{self, FileOutcome};
use printdesk_core::routing::{self, AttachmentRoute};
use printdesk_core::{reconcile, AppError, Config, FileContent, OrderForm, UploadedFile};
use printdesk_storage::{keys, ObjectStorage, UploadSource};

use crate::services::email::MailTransport;

/// Intake settings snapshot taken from [`Config`] at startup.
#[derive(Clone, Debug)]
pub struct IntakeSettings {
    pub inline_size_limit_bytes: u64,
    pub storage_prefix: String,
    pub require_files: bool,
    pub recipients: Vec<String>,
}

impl IntakeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            inline_size_limit_bytes: config.inline_size_limit_bytes,
            storage_prefix: config.storage_prefix.clone(),
            require_files: config.require_files,
            recipients: config.order_recipients.clone(),
        }
    }
}

/// What one processed submission produced, for the HTTP response.
#[derive(Debug)]
pub struct IntakeReport {
    pub file_links: Vec<String>,
    pub upload_errors: Vec<String>,
    pub missing_files: Vec<String>,
}

/// The order-intake pipeline with its injected collaborators.
///
/// Constructed once at startup; both collaborators are externally
/// synchronized services, so processing holds no locks of its own.
pub struct OrderIntake {
    storage: Arc<dyn ObjectStorage>,
    mailer: Arc<dyn MailTransport>,
    settings: IntakeSettings,
}

impl OrderIntake {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        mailer: Arc<dyn MailTransport>,
        settings: IntakeSettings,
    ) -> Self {
        Self {
            storage,
            mailer,
            settings,
        }
    }

    /// Process one validated submission end-to-end: reconcile, route every
    /// file, compose the notification, dispatch it.
    ///
    /// Succeeds only when the notification went out; the notification body is
    /// the source of truth for what actually got through.
    pub async fn process(
        &self,
        form: &OrderForm,
        files: Vec<UploadedFile>,
    ) -> Result<IntakeReport, AppError> {
        if self.settings.require_files && files.is_empty() {
            return Err(AppError::Validation(
                "At least one file attachment is required".to_string(),
            ));
        }

        let received: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();
        let missing = reconcile::missing_files(&form.declared_files(), &received);
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Declared files did not arrive");
        }

        let mut outcomes = Vec::with_capacity(files.len());
        for file in &files {
            outcomes.push(self.route_file(file).await);
        }

        let message = notify::compose(form, &outcomes, &missing, &self.settings.recipients);
        self.mailer
            .send(&message)
            .await
            .map_err(|e| AppError::NotificationDispatch(e.to_string()))?;

        let report = IntakeReport {
            file_links: outcomes
                .iter()
                .filter_map(|o| o.link().map(str::to_string))
                .collect(),
            upload_errors: outcomes
                .iter()
                .filter_map(|o| o.failure().map(|(name, cause)| format!("{}: {}", name, cause)))
                .collect(),
            missing_files: missing,
        };

        tracing::info!(
            order_number = form.order_number().unwrap_or("-"),
            files = files.len(),
            links = report.file_links.len(),
            upload_errors = report.upload_errors.len(),
            "Order processed and notification sent"
        );

        Ok(report)
        // `files` drops here, deleting any spooled temp files.
    }

    /// Route one file: inline files are materialized for the composer,
    /// remote files go through the two-call store contract. Every failure is
    /// captured as an outcome so siblings keep processing.
    async fn route_file(&self, file: &UploadedFile) -> FileOutcome {
        match routing::classify(file.size, self.settings.inline_size_limit_bytes) {
            AttachmentRoute::Inline => match self.read_content(file).await {
                Ok(content) => FileOutcome::Inline {
                    field: file.field.clone(),
                    filename: file.filename.clone(),
                    content_type: file.content_type.clone(),
                    content,
                },
                Err(e) => {
                    tracing::error!(
                        filename = %file.filename,
                        error = %e,
                        "Failed to read inline attachment"
                    );
                    FileOutcome::Failed {
                        filename: file.filename.clone(),
                        cause: e.to_string(),
                    }
                }
            },
            AttachmentRoute::Remote => match self.upload_file(file).await {
                Ok(url) => FileOutcome::Linked {
                    filename: file.filename.clone(),
                    url,
                },
                Err(e) => {
                    tracing::error!(
                        filename = %file.filename,
                        error = %e,
                        "Failed to upload attachment to object store"
                    );
                    FileOutcome::Failed {
                        filename: file.filename.clone(),
                        cause: e.to_string(),
                    }
                }
            },
        }
    }

    async fn read_content(&self, file: &UploadedFile) -> std::io::Result<Bytes> {
        match &file.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            // Inline files normally live in memory; a spooled one can still
            // be read back if the spill threshold ever diverges from the
            // routing limit.
            FileContent::Spooled(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }

    async fn upload_file(&self, file: &UploadedFile) -> Result<String, printdesk_storage::StorageError> {
        let key = keys::object_key(&self.settings.storage_prefix, &file.filename);
        let source = match &file.content {
            FileContent::Memory(bytes) => UploadSource::Memory(bytes.clone()),
            FileContent::Spooled(path) => UploadSource::File(path.to_path_buf()),
        };

        self.storage.put(&key, &file.content_type, source).await?;
        self.storage.grant_public_read(&key).await?;
        Ok(self.storage.public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use printdesk_core::{NotificationMessage, StorageBackend};
    use printdesk_storage::{StorageError, StorageResult};
    use std::sync::Mutex;

    const MIB: u64 = 1024 * 1024;

    /// Records uploads; can be told to fail for specific filenames.
    struct MockStorage {
        uploads: Mutex<Vec<String>>,
        fail_keys_containing: Option<String>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_keys_containing: None,
            }
        }

        fn failing_on(fragment: &str) -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                fail_keys_containing: Some(fragment.to_string()),
            }
        }

        fn upload_count(&self) -> usize {
            self.uploads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ObjectStorage for MockStorage {
        async fn put(
            &self,
            key: &str,
            _content_type: &str,
            _source: UploadSource,
        ) -> StorageResult<()> {
            if let Some(fragment) = &self.fail_keys_containing {
                if key.contains(fragment) {
                    return Err(StorageError::UploadFailed("connection reset".to_string()));
                }
            }
            self.uploads.lock().unwrap().push(key.to_string());
            Ok(())
        }

        async fn grant_public_read(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://files.example.com/{}", key)
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    /// Records every dispatched notification.
    struct RecordingMailer {
        sent: Mutex<Vec<NotificationMessage>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn last(&self) -> NotificationMessage {
            self.sent.lock().unwrap().last().expect("a sent message").clone()
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl crate::services::email::MailTransport for RecordingMailer {
        async fn send(
            &self,
            message: &NotificationMessage,
        ) -> Result<(), crate::services::email::MailError> {
            if self.fail {
                return Err(crate::services::email::MailError::Transport(
                    "connection refused".to_string(),
                ));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn settings() -> IntakeSettings {
        IntakeSettings {
            inline_size_limit_bytes: MIB,
            storage_prefix: "orders".to_string(),
            require_files: false,
            recipients: vec!["shop@example.com".to_string()],
        }
    }

    fn intake_with(
        storage: Arc<MockStorage>,
        mailer: Arc<RecordingMailer>,
        settings: IntakeSettings,
    ) -> OrderIntake {
        OrderIntake::new(storage, mailer, settings)
    }

    fn memory_file(filename: &str, size: usize) -> UploadedFile {
        UploadedFile::in_memory(
            "files",
            filename,
            "application/octet-stream",
            Bytes::from(vec![0u8; size]),
        )
    }

    #[tokio::test]
    async fn small_and_large_files_split_between_inline_and_remote() {
        // Scenario: order 123, one 0.5 MiB file and one 2 MiB file,
        // 1 MiB limit -> one inline attachment, one link, zero warnings.
        let storage = Arc::new(MockStorage::new());
        let mailer = Arc::new(RecordingMailer::new());
        let intake = intake_with(storage.clone(), mailer.clone(), settings());

        let form = OrderForm::from_pairs([("orderNumber", "123")]);
        let files = vec![
            memory_file("small.pdf", (MIB / 2) as usize),
            memory_file("large.tif", (2 * MIB) as usize),
        ];

        let report = intake.process(&form, files).await.expect("processed");

        assert_eq!(report.file_links.len(), 1);
        assert!(report.file_links[0].contains("large.tif"));
        assert!(report.upload_errors.is_empty());
        assert!(report.missing_files.is_empty());
        assert_eq!(storage.upload_count(), 1);

        let message = mailer.last();
        assert_eq!(message.subject, "New order #123");
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].filename, "small.pdf");
        assert!(!message.body.contains("Warning"));
        assert!(!message.body.contains("Upload errors"));
    }

    #[tokio::test]
    async fn declared_but_absent_files_produce_a_warning() {
        // Scenario: declared "a.pdf, b.png", received only a.pdf.
        let storage = Arc::new(MockStorage::new());
        let mailer = Arc::new(RecordingMailer::new());
        let intake = intake_with(storage, mailer.clone(), settings());

        let form = OrderForm::from_pairs([("filename", "a.pdf, b.png")]);
        let files = vec![memory_file("a.pdf", 1024)];

        let report = intake.process(&form, files).await.expect("processed");

        assert_eq!(report.missing_files, vec!["b.png"]);
        let message = mailer.last();
        assert!(message.body.contains("declared but not received"));
        assert!(message.body.contains("- b.png"));
    }

    #[tokio::test]
    async fn one_failed_upload_does_not_abort_siblings_or_the_request() {
        // Scenario: two remote-routed files, the store rejects one.
        let storage = Arc::new(MockStorage::failing_on("bad.psd"));
        let mailer = Arc::new(RecordingMailer::new());
        let intake = intake_with(storage.clone(), mailer.clone(), settings());

        let form = OrderForm::from_pairs([("orderNumber", "77")]);
        let files = vec![
            memory_file("good.psd", (2 * MIB) as usize),
            memory_file("bad.psd", (2 * MIB) as usize),
        ];

        let report = intake.process(&form, files).await.expect("processed");

        assert_eq!(report.file_links.len(), 1);
        assert!(report.file_links[0].contains("good.psd"));
        assert_eq!(report.upload_errors.len(), 1);
        assert!(report.upload_errors[0].starts_with("bad.psd:"));

        let message = mailer.last();
        assert!(message.body.contains("good.psd"));
        assert!(message.body.contains("Upload errors:"));
        assert!(message.body.contains("bad.psd"));
        assert_eq!(storage.upload_count(), 1);
    }

    #[tokio::test]
    async fn missing_files_are_rejected_before_any_side_effect() {
        let storage = Arc::new(MockStorage::new());
        let mailer = Arc::new(RecordingMailer::new());
        let mut settings = settings();
        settings.require_files = true;
        let intake = intake_with(storage.clone(), mailer.clone(), settings);

        let form = OrderForm::from_pairs([("orderNumber", "5")]);
        let result = intake.process(&form, Vec::new()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(storage.upload_count(), 0);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn dispatch_failure_fails_the_request_after_uploads() {
        let storage = Arc::new(MockStorage::new());
        let mailer = Arc::new(RecordingMailer::failing());
        let intake = intake_with(storage.clone(), mailer, settings());

        let form = OrderForm::from_pairs([("orderNumber", "9")]);
        let files = vec![memory_file("large.tif", (2 * MIB) as usize)];

        let result = intake.process(&form, files).await;

        assert!(matches!(result, Err(AppError::NotificationDispatch(_))));
        // No compensating delete: the upload stays in the store.
        assert_eq!(storage.upload_count(), 1);
    }

    #[tokio::test]
    async fn spooled_files_stream_from_disk_and_are_cleaned_up() {
        let storage = Arc::new(MockStorage::new());
        let mailer = Arc::new(RecordingMailer::new());
        let intake = intake_with(storage, mailer.clone(), settings());

        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(tmp.path(), vec![0u8; (2 * MIB) as usize]).expect("write");
        let tmp_path = tmp.path().to_path_buf();
        let file = UploadedFile::spooled(
            "files",
            "big.psd",
            "image/x-psd",
            2 * MIB,
            tmp.into_temp_path(),
        );

        let form = OrderForm::new();
        let report = intake.process(&form, vec![file]).await.expect("processed");

        assert_eq!(report.file_links.len(), 1);
        assert!(!tmp_path.exists(), "spooled temp file must be deleted");
    }
}
