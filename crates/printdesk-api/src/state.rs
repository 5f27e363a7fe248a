//! Application state.
//!
//! Everything in here is constructed once at startup and read-only
//! afterwards; handlers share it through an `Arc`.

use printdesk_core::Config;

use crate::services::intake::OrderIntake;

/// Shared application state: the configuration and the order-intake
/// pipeline with its injected collaborators (object store, mail transport).
pub struct AppState {
    pub config: Config,
    pub intake: OrderIntake,
}
