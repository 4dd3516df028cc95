//! Route guard: which routes a session may reach.
//!
//! The policy is a table from route to [`Access`]; [`guard`] is a pure
//! function of `(route, session)` with no I/O, so callers re-run it freely
//! whenever either input changes. Gating here is advisory UI behavior; the
//! backend enforces authorization independently.

use super::session::Session;

/// Access level required by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminSection {
    Dashboard,
    Books,
    Users,
    Borrows,
    Notifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Search,
    Books,
    BookDetail(i64),
    Profile,
    Favourites,
    Borrowed,
    History,
    Chat,
    Admin(AdminSection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

impl Route {
    /// Policy table.
    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Route::Home | Route::Login | Route::Register | Route::Search | Route::Books | Route::BookDetail(_) => {
                Access::Public
            }
            Route::Profile | Route::Favourites | Route::Borrowed | Route::History | Route::Chat => {
                Access::Authenticated
            }
            Route::Admin(_) => Access::Admin,
        }
    }

    #[must_use]
    pub fn path(self) -> String {
        match self {
            Route::Home => "/".to_owned(),
            Route::Login => "/login".to_owned(),
            Route::Register => "/register".to_owned(),
            Route::Search => "/search".to_owned(),
            Route::Books => "/books".to_owned(),
            Route::BookDetail(id) => format!("/books/{id}"),
            Route::Profile => "/profile".to_owned(),
            Route::Favourites => "/favourites".to_owned(),
            Route::Borrowed => "/borrowed".to_owned(),
            Route::History => "/history".to_owned(),
            Route::Chat => "/chat".to_owned(),
            Route::Admin(AdminSection::Dashboard) => "/admin".to_owned(),
            Route::Admin(AdminSection::Books) => "/admin/books".to_owned(),
            Route::Admin(AdminSection::Users) => "/admin/users".to_owned(),
            Route::Admin(AdminSection::Borrows) => "/admin/borrows".to_owned(),
            Route::Admin(AdminSection::Notifications) => "/admin/notifications".to_owned(),
        }
    }

    /// Parse a URL path. Query strings and trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["search"] => Route::Search,
            ["books"] => Route::Books,
            ["books", id] => Route::BookDetail(id.parse().ok()?),
            ["profile"] => Route::Profile,
            ["favourites"] => Route::Favourites,
            ["borrowed"] => Route::Borrowed,
            ["history"] => Route::History,
            ["chat"] => Route::Chat,
            ["admin"] => Route::Admin(AdminSection::Dashboard),
            ["admin", "books"] => Route::Admin(AdminSection::Books),
            ["admin", "users"] => Route::Admin(AdminSection::Users),
            ["admin", "borrows"] => Route::Admin(AdminSection::Borrows),
            ["admin", "notifications"] => Route::Admin(AdminSection::Notifications),
            _ => return None,
        };
        Some(route)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether `session` may enter `route`.
#[must_use]
pub fn guard(route: Route, session: &Session) -> Decision {
    match route.access() {
        Access::Public => Decision::Allow,
        Access::Authenticated if session.is_authenticated() => Decision::Allow,
        Access::Authenticated => Decision::Redirect(Route::Login),
        Access::Admin if !session.is_authenticated() => Decision::Redirect(Route::Login),
        Access::Admin if session.is_admin() => Decision::Allow,
        Access::Admin => Decision::Redirect(Route::Home),
    }
}

/// Navigation entries the session should see, in display order.
#[must_use]
pub fn nav_links(session: &Session) -> Vec<Route> {
    let mut links = vec![Route::Books, Route::Search];
    if session.is_authenticated() {
        links.extend([Route::Profile, Route::Favourites, Route::Borrowed, Route::History, Route::Chat]);
    } else {
        links.extend([Route::Login, Route::Register]);
    }
    if session.is_admin() {
        links.push(Route::Admin(AdminSection::Dashboard));
    }
    links
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
