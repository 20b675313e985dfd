//! Navigation gate applied on every screen transition.
//!
//! The decision itself is a pure function of the destination and token
//! presence; `NavigationGuard` only supplies the storage read. The guard
//! never contacts the backend, so an expired token passes here and is
//! caught by the server on the first request.

use tracing::debug;

use crate::session::SharedSession;

/// Screens the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Projects,
    Issues(i64),
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign In",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Projects => "Projects",
            Route::Issues(_) => "Issues",
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether a destination may be shown given token presence.
/// Login and register are reachable without a session; every other screen
/// redirects to login. The requested destination is not remembered.
pub fn evaluate(dest: Route, has_token: bool) -> RouteDecision {
    match dest {
        Route::Login | Route::Register => RouteDecision::Allow,
        _ if has_token => RouteDecision::Allow,
        _ => RouteDecision::Redirect(Route::Login),
    }
}

/// Guard holding the shared session handle.
/// Reads the persisted token on every check, so a session written by a
/// previous process run counts immediately.
pub struct NavigationGuard {
    session: SharedSession,
}

impl NavigationGuard {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    pub fn check(&self, dest: Route) -> RouteDecision {
        // A failed storage read counts as signed out rather than an error
        let has_token = self
            .session
            .lock()
            .ok()
            .and_then(|session| session.persisted_token().ok().flatten())
            .map(|token| !token.is_empty())
            .unwrap_or(false);

        let decision = evaluate(dest, has_token);
        if let RouteDecision::Redirect(target) = decision {
            debug!(?dest, ?target, "Navigation redirected");
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionStore, Storage};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_login_and_register_always_allowed() {
        assert_eq!(evaluate(Route::Login, false), RouteDecision::Allow);
        assert_eq!(evaluate(Route::Register, false), RouteDecision::Allow);
        assert_eq!(evaluate(Route::Login, true), RouteDecision::Allow);
        assert_eq!(evaluate(Route::Register, true), RouteDecision::Allow);
    }

    #[test]
    fn test_protected_routes_redirect_without_token() {
        for dest in [Route::Dashboard, Route::Projects, Route::Issues(5)] {
            assert_eq!(
                evaluate(dest, false),
                RouteDecision::Redirect(Route::Login)
            );
        }
    }

    #[test]
    fn test_protected_routes_allowed_with_token() {
        for dest in [Route::Dashboard, Route::Projects, Route::Issues(5)] {
            assert_eq!(evaluate(dest, true), RouteDecision::Allow);
        }
    }

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn test_session() -> SharedSession {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "minijira-guard-test-{}-{}",
            std::process::id(),
            seq
        ));
        let store = SessionStore::load(Storage::new(dir)).unwrap();
        Arc::new(Mutex::new(store))
    }

    #[test]
    fn test_guard_reads_persisted_token() {
        let session = test_session();
        let guard = NavigationGuard::new(session.clone());

        assert_eq!(
            guard.check(Route::Dashboard),
            RouteDecision::Redirect(Route::Login)
        );

        session.lock().unwrap().set_token("jwt-abc").unwrap();
        assert_eq!(guard.check(Route::Dashboard), RouteDecision::Allow);

        session.lock().unwrap().logout().unwrap();
        assert_eq!(
            guard.check(Route::Projects),
            RouteDecision::Redirect(Route::Login)
        );
    }
}
