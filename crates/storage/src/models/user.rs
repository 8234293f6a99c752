use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_ATHLETE: &str = "athlete";

/// An account able to sign in. Roles live in a separate table and are
/// resolved on every authenticated request.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: Option<String>,
}

// Keep the hash out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
