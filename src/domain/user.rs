use time::OffsetDateTime;
use uuid::Uuid;

/// A registered account. Stays inside the crate: API responses only ever
/// carry the user id, never the hash or the username.
#[derive(Debug, Clone)]
pub struct User {
    pub(crate) id: Uuid,
    #[allow(dead_code)]
    pub(crate) username: String,
    pub(crate) password_hash: String,
    #[allow(dead_code)]
    pub(crate) created_at: OffsetDateTime,
}
