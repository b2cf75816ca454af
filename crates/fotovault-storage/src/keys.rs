//! Shared key generation for storage backends.
//!
//! Key format: `photos/{user_uuid}` for a user's namespace and
//! `photos/{user_uuid}/{stored_name}` for an object inside it.

use uuid::Uuid;

/// Namespace prefix holding all of one user's photos.
pub fn user_namespace(user_uuid: &Uuid) -> String {
    format!("photos/{}", user_uuid)
}

/// Storage key for one stored object inside a user's namespace.
pub fn photo_key(user_uuid: &Uuid, stored_name: &str) -> String {
    format!("photos/{}/{}", user_uuid, stored_name)
}
