//! Navigation state kept consistent with the session.
//!
//! The navigator remembers the route the user asked for and where the guard
//! actually put them. Every navigation and every session change re-runs the
//! guard against the requested route, so signing in after a redirect lands
//! on the page originally asked for, and signing out while on a protected
//! page moves to the login page.

use tokio::sync::watch;

use crate::auth::{Decision, Route, Session, guard};

#[derive(Debug, Clone)]
pub struct Navigator {
    requested: Route,
    location: Route,
    session: Session,
}

impl Navigator {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { requested: Route::Home, location: Route::Home, session }
    }

    /// Ask for `route` and resolve it against the current session.
    pub fn navigate(&mut self, route: Route) -> Decision {
        self.requested = route;
        self.resolve()
    }

    /// Re-run the guard after the session changed.
    pub fn on_session_change(&mut self, session: Session) -> Decision {
        self.session = session;
        self.resolve()
    }

    /// Wait for the next session transition on `changes` and apply it.
    ///
    /// Returns `None` once the session manager is gone.
    pub async fn follow(&mut self, changes: &mut watch::Receiver<Session>) -> Option<Decision> {
        changes.changed().await.ok()?;
        let session = changes.borrow_and_update().clone();
        Some(self.on_session_change(session))
    }

    #[must_use]
    pub fn location(&self) -> Route {
        self.location
    }

    #[must_use]
    pub fn requested(&self) -> Route {
        self.requested
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn resolve(&mut self) -> Decision {
        let decision = guard(self.requested, &self.session);
        let location = match decision {
            Decision::Allow => self.requested,
            Decision::Redirect(target) => target,
        };
        if location != self.location {
            tracing::debug!(requested = %self.requested, location = %location, "navigation resolved");
        }
        self.location = location;
        decision
    }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;
