//! Services used by the HTTP handlers.

pub mod email;
pub mod intake;
