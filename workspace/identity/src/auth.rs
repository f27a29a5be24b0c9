use crate::password::verify_secret;
use chrono::{DateTime, Duration, Utc};
use model::entities::user;
use tracing::warn;

/// How long a password reset token stays usable after it was issued.
pub const RESET_TOKEN_TTL_HOURS: i64 = 2;

/// Which stored digest a secret is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Password,
    Remember,
    Activation,
    Reset,
}

impl DigestKind {
    /// The stored digest of this kind, if one is set.
    pub fn digest(self, user: &user::Model) -> Option<&str> {
        let digest = match self {
            DigestKind::Password => Some(user.password_digest.as_str()),
            DigestKind::Remember => user.remember_digest.as_deref(),
            DigestKind::Activation => user.activation_digest.as_deref(),
            DigestKind::Reset => user.reset_digest.as_deref(),
        };
        digest.filter(|d| !d.is_empty())
    }
}

/// Returns true if `token` matches the user's digest of the given kind.
///
/// A missing digest is a plain `false`, as is a digest that cannot be
/// parsed; the latter is logged since it points at corrupted data.
pub fn authenticated(user: &user::Model, kind: DigestKind, token: &str) -> bool {
    let Some(digest) = kind.digest(user) else {
        return false;
    };

    match verify_secret(token, digest) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(user_id = user.id, ?kind, "Stored digest could not be parsed: {}", e);
            false
        }
    }
}

/// Password check for a loaded user.
pub fn authenticate(user: &user::Model, password: &str) -> bool {
    authenticated(user, DigestKind::Password, password)
}

/// True when no reset was requested or the request is older than
/// [`RESET_TOKEN_TTL_HOURS`] relative to `now`.
pub fn password_reset_expired(user: &user::Model, now: DateTime<Utc>) -> bool {
    match user.reset_sent_at {
        Some(sent_at) => sent_at < now - Duration::hours(RESET_TOKEN_TTL_HOURS),
        None => true,
    }
}
