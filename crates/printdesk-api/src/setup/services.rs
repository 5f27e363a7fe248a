//! Service initialization and application state setup

use anyhow::Result;
use printdesk_core::Config;
use printdesk_storage::create_storage;
use std::sync::Arc;

use crate::services::email::SmtpMailer;
use crate::services::intake::{IntakeSettings, OrderIntake};
use crate::state::AppState;

/// Initialize the storage backend, mail transport, and intake pipeline,
/// returning the application state.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        prefix = %config.storage_prefix,
        "Storage abstraction initialized successfully"
    );

    let mailer = SmtpMailer::from_config(config)?;

    let intake = OrderIntake::new(
        storage,
        Arc::new(mailer),
        IntakeSettings::from_config(config),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        intake,
    }))
}
