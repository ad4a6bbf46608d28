//! Session manager: the single owner of the signed-in identity.
//!
//! All components read the current identity through [`SessionManager`]
//! accessors rather than ambient storage. Persistence is handled separately
//! by `sdlcv_core::db`; this type only holds the in-memory view.

use sdlcv_core::types::AuthSession;

/// Email of the pre-provisioned reviewer account.
pub const REVIEWER_EMAIL: &str = "reviewer@taskmanager.com";
/// Password of the pre-provisioned reviewer account.
pub const REVIEWER_PASSWORD: &str = "reviewer123";

/// Holds the current identity, if any.
#[derive(Default)]
pub struct SessionManager {
    current: Option<AuthSession>,
}

impl SessionManager {
    /// Restores a persisted session at startup.
    pub fn restore(session: Option<AuthSession>) -> Self {
        Self { current: session }
    }

    /// The current identity, `None` when signed out.
    pub fn current(&self) -> Option<&AuthSession> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// True when the current identity carries the reviewer role.
    pub fn is_reviewer(&self) -> bool {
        self.current.as_ref().is_some_and(AuthSession::is_reviewer)
    }

    /// Installs a new identity after a successful sign-in.
    pub fn set(&mut self, session: AuthSession) {
        self.current = Some(session);
    }

    /// Drops the identity on sign-out.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut mgr = SessionManager::default();
        assert!(!mgr.is_signed_in());
        assert!(!mgr.is_reviewer());

        mgr.set(AuthSession { user_id: "u1".into(), role: None, signed_in_at: 0 });
        assert!(mgr.is_signed_in());
        assert!(!mgr.is_reviewer());

        mgr.set(AuthSession {
            user_id: "r1".into(),
            role: Some("reviewer".into()),
            signed_in_at: 0,
        });
        assert!(mgr.is_reviewer());

        mgr.clear();
        assert!(!mgr.is_signed_in());
    }
}
