//! Shared test setup: a TestServer wired to local storage in a temp
//! directory and a recording mail transport.

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use printdesk_api::services::email::{MailError, MailTransport};
use printdesk_api::services::intake::{IntakeSettings, OrderIntake};
use printdesk_api::setup::routes::setup_routes;
use printdesk_api::state::AppState;
use printdesk_core::{Config, NotificationMessage, StorageBackend};
use printdesk_storage::LocalStorage;

pub const BOUNDARY: &str = "printdesk-test-boundary";

/// Mail transport that records instead of sending.
pub struct RecordingMailer {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> NotificationMessage {
        self.sent
            .lock()
            .unwrap()
            .last()
            .expect("a sent notification")
            .clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    pub storage_dir: TempDir,
}

pub fn test_config(storage_dir: &TempDir, require_files: bool) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        storage_prefix: "orders".to_string(),
        local_storage_path: Some(storage_dir.path().display().to_string()),
        local_storage_base_url: Some("http://localhost:10000/files".to_string()),
        inline_size_limit_bytes: 1024 * 1024,
        max_upload_size_bytes: 32 * 1024 * 1024,
        require_files,
        smtp_host: Some("localhost".to_string()),
        smtp_port: Some(2525),
        smtp_user: None,
        smtp_password: None,
        smtp_from: Some("orders@example.com".to_string()),
        smtp_tls: false,
        order_recipients: vec!["shop@example.com".to_string()],
    }
}

pub async fn setup_test_app(require_files: bool) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("storage temp dir");
    let config = test_config(&storage_dir, require_files);

    let storage = LocalStorage::new(
        storage_dir.path(),
        config
            .local_storage_base_url
            .clone()
            .expect("local base url"),
    )
    .await
    .expect("local storage");

    let mailer = Arc::new(RecordingMailer::new());
    let intake = OrderIntake::new(
        Arc::new(storage),
        mailer.clone(),
        IntakeSettings::from_config(&config),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        intake,
    });
    let router = setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        mailer,
        storage_dir,
    }
}

/// Hand-rolled multipart/form-data body.
pub fn multipart_body(
    fields: &[(&str, &str)],
    files: &[(&str, &str, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for (name, filename, content_type, content) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
