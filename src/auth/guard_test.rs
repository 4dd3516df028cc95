use super::*;
use crate::auth::roles::Role;

fn authenticated(roles: &[&str]) -> Session {
    Session::Authenticated {
        subject: Some("alice".into()),
        roles: roles.iter().map(|r| Role::from(*r)).collect(),
    }
}

const PUBLIC: [Route; 6] =
    [Route::Home, Route::Login, Route::Register, Route::Search, Route::Books, Route::BookDetail(42)];
const MEMBER: [Route; 5] = [Route::Profile, Route::Favourites, Route::Borrowed, Route::History, Route::Chat];
const ADMIN: [Route; 5] = [
    Route::Admin(AdminSection::Dashboard),
    Route::Admin(AdminSection::Books),
    Route::Admin(AdminSection::Users),
    Route::Admin(AdminSection::Borrows),
    Route::Admin(AdminSection::Notifications),
];

// =============================================================================
// guard
// =============================================================================

#[test]
fn public_routes_always_allow() {
    for session in [Session::Anonymous, authenticated(&["ROLE_USER"]), authenticated(&["ROLE_ADMIN"])] {
        for route in PUBLIC {
            assert_eq!(guard(route, &session), Decision::Allow, "{route} for {session:?}");
        }
    }
}

#[test]
fn member_routes_redirect_anonymous_to_login() {
    for route in MEMBER {
        assert_eq!(guard(route, &Session::Anonymous), Decision::Redirect(Route::Login), "{route}");
        assert_eq!(guard(route, &authenticated(&[])), Decision::Allow, "{route}");
    }
}

#[test]
fn admin_routes_truth_table() {
    for route in ADMIN {
        assert_eq!(guard(route, &Session::Anonymous), Decision::Redirect(Route::Login), "{route}");
        assert_eq!(guard(route, &authenticated(&["ROLE_USER"])), Decision::Redirect(Route::Home), "{route}");
        assert_eq!(guard(route, &authenticated(&["ROLE_ADMIN"])), Decision::Allow, "{route}");
        assert_eq!(guard(route, &authenticated(&["ROLE_USER", "ROLE_ADMIN"])), Decision::Allow, "{route}");
    }
}

#[test]
fn role_match_is_exact() {
    let session = authenticated(&["role_admin", "ADMIN"]);
    assert_eq!(guard(Route::Admin(AdminSection::Dashboard), &session), Decision::Redirect(Route::Home));
}

#[test]
fn redirect_targets_are_public() {
    for session in [Session::Anonymous, authenticated(&["ROLE_USER"])] {
        for route in MEMBER.iter().chain(ADMIN.iter()) {
            if let Decision::Redirect(target) = guard(*route, &session) {
                assert_eq!(target.access(), Access::Public);
            }
        }
    }
}

// =============================================================================
// paths
// =============================================================================

#[test]
fn every_route_path_parses_back() {
    for route in PUBLIC.iter().chain(MEMBER.iter()).chain(ADMIN.iter()) {
        assert_eq!(Route::parse(&route.path()), Some(*route), "{route}");
    }
}

#[test]
fn parse_ignores_query_and_trailing_slash() {
    assert_eq!(Route::parse("/search?query=dune"), Some(Route::Search));
    assert_eq!(Route::parse("/admin/users/"), Some(Route::Admin(AdminSection::Users)));
    assert_eq!(Route::parse(""), Some(Route::Home));
}

#[test]
fn parse_rejects_unknown_paths() {
    assert_eq!(Route::parse("/nope"), None);
    assert_eq!(Route::parse("/books/abc"), None);
    assert_eq!(Route::parse("/admin/settings"), None);
}

// =============================================================================
// nav_links
// =============================================================================

#[test]
fn nav_links_for_anonymous() {
    assert_eq!(nav_links(&Session::Anonymous), vec![Route::Books, Route::Search, Route::Login, Route::Register]);
}

#[test]
fn nav_links_for_member_hide_admin() {
    let links = nav_links(&authenticated(&["ROLE_USER"]));
    assert!(links.contains(&Route::Profile));
    assert!(!links.contains(&Route::Login));
    assert!(!links.contains(&Route::Admin(AdminSection::Dashboard)));
}

#[test]
fn nav_links_for_admin_include_admin() {
    let links = nav_links(&authenticated(&["ROLE_ADMIN"]));
    assert_eq!(links.last(), Some(&Route::Admin(AdminSection::Dashboard)));
}

#[test]
fn every_nav_link_is_reachable() {
    for session in [Session::Anonymous, authenticated(&["ROLE_USER"]), authenticated(&["ROLE_ADMIN"])] {
        for link in nav_links(&session) {
            assert_eq!(guard(link, &session), Decision::Allow, "{link} for {session:?}");
        }
    }
}
