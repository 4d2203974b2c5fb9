//! Navigation gating. The guard is a capability check decoupled from the
//! storage mechanism: call sites depend on [`Authorizer`], not on how the
//! session happens to be held, so alternate auth schemes can be swapped in
//! without touching them.

use std::sync::Arc;

use crate::session::SessionStore;

/// The navigable views of the client. Only [`View::Admin`] is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Dashboard,
    AdminLogin,
    AdminSignup,
    Admin,
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(View),
}

pub trait Authorizer: Send + Sync {
    /// Must be evaluated on every navigation attempt; results are never
    /// cached, so a cleared session takes effect on the next check.
    fn authorize(&self, view: View) -> Access;
}

/// Presence-of-session authorizer: a session token, valid or not, admits the
/// admin view. Stale tokens are only detected by the remote service.
pub struct SessionAuthorizer {
    store: Arc<SessionStore>,
}

impl SessionAuthorizer {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

impl Authorizer for SessionAuthorizer {
    fn authorize(&self, view: View) -> Access {
        match view {
            View::Admin if self.store.session().is_none() => Access::Redirect(View::AdminLogin),
            _ => Access::Granted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionToken;
    use tempfile::tempdir;

    #[test]
    fn admin_view_requires_a_session() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SessionStore::open(Some(dir.path())).unwrap());
        let guard = SessionAuthorizer::new(store.clone());

        assert_eq!(
            guard.authorize(View::Admin),
            Access::Redirect(View::AdminLogin)
        );

        store.set_session(SessionToken::new("jwt-abc")).unwrap();
        assert_eq!(guard.authorize(View::Admin), Access::Granted);
    }

    #[test]
    fn clearing_the_session_takes_effect_on_the_next_check() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SessionStore::open(Some(dir.path())).unwrap());
        let guard = SessionAuthorizer::new(store.clone());

        store.set_session(SessionToken::new("jwt-abc")).unwrap();
        assert_eq!(guard.authorize(View::Admin), Access::Granted);

        store.clear_session().unwrap();
        assert_eq!(
            guard.authorize(View::Admin),
            Access::Redirect(View::AdminLogin)
        );
    }

    #[test]
    fn public_views_are_always_granted() {
        let dir = tempdir().unwrap();
        let store = Arc::new(SessionStore::open(Some(dir.path())).unwrap());
        let guard = SessionAuthorizer::new(store);

        for view in [View::Home, View::Dashboard, View::AdminLogin, View::AdminSignup] {
            assert_eq!(guard.authorize(view), Access::Granted);
        }
    }
}
