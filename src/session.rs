//! Explicit session state for request handlers
//!
//! Replaces ambient token storage with a context object passed to each
//! handler. Refresh-token rotation is an explicit state machine instead of
//! storage mutation: {Valid, Expiring, Refreshing, Invalid}, where the
//! expiry-window classification is time-driven and only a completed refresh
//! rotates the token back to Valid.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenState {
    /// Token is usable and outside the refresh window
    Valid,
    /// Token is usable but inside the refresh window; a refresh should start
    Expiring,
    /// A refresh is in flight; the old token is still presented
    Refreshing,
    /// Token expired or was revoked; the session must re-authenticate
    Invalid,
}

/// Errors from illegal session transitions
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),
}

/// Per-request session context carrying explicit token state
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Authenticated subject (user id or service account)
    pub subject: String,
    refreshing: bool,
    revoked: bool,
    expires_at: DateTime<Utc>,
    refresh_window: Duration,
}

impl SessionContext {
    /// Create a session for a subject with the given token expiry
    pub fn new(subject: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject,
            refreshing: false,
            revoked: false,
            expires_at,
            refresh_window: Duration::minutes(5),
        }
    }

    /// Override the default five-minute refresh window
    pub fn with_refresh_window(mut self, refresh_window: Duration) -> Self {
        self.refresh_window = refresh_window;
        self
    }

    /// Token state at the given instant
    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked || now >= self.expires_at {
            return TokenState::Invalid;
        }
        if self.refreshing {
            return TokenState::Refreshing;
        }
        if now >= self.expires_at - self.refresh_window {
            TokenState::Expiring
        } else {
            TokenState::Valid
        }
    }

    /// Whether the session may still reach protected handlers
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.state(now) != TokenState::Invalid
    }

    /// Begin a refresh; allowed while the token is Valid or Expiring
    pub fn begin_refresh(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.state(now) {
            TokenState::Valid | TokenState::Expiring => {
                self.refreshing = true;
                Ok(())
            }
            state => Err(SessionError::InvalidTransition(format!(
                "cannot begin refresh from {state:?}"
            ))),
        }
    }

    /// Complete a refresh by rotating to a new expiry; only legal while
    /// Refreshing
    pub fn complete_refresh(
        &mut self,
        now: DateTime<Utc>,
        new_expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.state(now) != TokenState::Refreshing {
            return Err(SessionError::InvalidTransition(
                "no refresh in flight".to_string(),
            ));
        }
        self.refreshing = false;
        self.expires_at = new_expires_at;
        Ok(())
    }

    /// Revoke the session; any state may transition to Invalid
    pub fn invalidate(&mut self) {
        self.revoked = true;
        self.refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in_minutes: i64) -> (SessionContext, DateTime<Utc>) {
        let now = DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ctx = SessionContext::new(
            "user-42".to_string(),
            now + Duration::minutes(expires_in_minutes),
        );
        (ctx, now)
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let (ctx, now) = session(60);
        assert_eq!(ctx.state(now), TokenState::Valid);
        assert!(ctx.is_active(now));
    }

    #[test]
    fn test_token_inside_refresh_window_is_expiring() {
        let (ctx, now) = session(3);
        assert_eq!(ctx.state(now), TokenState::Expiring);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let (ctx, now) = session(60);
        let later = now + Duration::minutes(61);
        assert_eq!(ctx.state(later), TokenState::Invalid);
        assert!(!ctx.is_active(later));
    }

    #[test]
    fn test_refresh_rotation_returns_to_valid() {
        let (mut ctx, now) = session(3);
        ctx.begin_refresh(now).unwrap();
        assert_eq!(ctx.state(now), TokenState::Refreshing);

        ctx.complete_refresh(now, now + Duration::minutes(60)).unwrap();
        assert_eq!(ctx.state(now), TokenState::Valid);
    }

    #[test]
    fn test_cannot_refresh_an_invalid_session() {
        let (mut ctx, now) = session(60);
        ctx.invalidate();
        assert!(ctx.begin_refresh(now).is_err());
    }

    #[test]
    fn test_cannot_complete_refresh_that_never_started() {
        let (mut ctx, now) = session(60);
        let result = ctx.complete_refresh(now, now + Duration::minutes(60));
        assert!(matches!(result, Err(SessionError::InvalidTransition(_))));
    }

    #[test]
    fn test_expiry_during_refresh_invalidates() {
        let (mut ctx, now) = session(3);
        ctx.begin_refresh(now).unwrap();
        let later = now + Duration::minutes(4);
        assert_eq!(ctx.state(later), TokenState::Invalid);
        assert!(ctx.complete_refresh(later, later + Duration::minutes(60)).is_err());
    }
}
