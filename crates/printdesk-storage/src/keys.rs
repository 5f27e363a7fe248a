//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{uuid}/{filename}`. The uuid segment keeps
//! same-named files from different orders apart; object stores overwrite
//! silently on key collision.

use uuid::Uuid;

/// Generate a storage key for the given destination prefix and filename.
///
/// All backends must use this format for consistency.
pub fn object_key(prefix: &str, filename: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/{}", Uuid::new_v4(), filename)
    } else {
        format!("{}/{}/{}", prefix, Uuid::new_v4(), filename)
    }
}
