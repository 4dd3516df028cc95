use super::*;
use crate::auth::claims::UnverifiedJwtDecoder;
use crate::auth::token_store::MemoryTokenStore;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::sync::Mutex;

fn token_for(subject: &str, roles: &[&str]) -> String {
    let payload = serde_json::json!({ "sub": subject, "roles": roles, "exp": 4_102_444_800_u64 });
    format!("e30.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()))
}

fn manager_with(store: Arc<MemoryTokenStore>, policy: AuthFailurePolicy) -> SessionManager {
    SessionManager::new(store, Arc::new(UnverifiedJwtDecoder), policy)
}

fn role_set(names: &[&str]) -> BTreeSet<Role> {
    names.iter().map(|name| Role::from(*name)).collect()
}

// =========================================================================
// MockIssuer
// =========================================================================

struct MockIssuer {
    token: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockIssuer {
    fn issuing(token: Option<String>) -> Self {
        Self { token, calls: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl CredentialIssuer for MockIssuer {
    async fn login(&self, username: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        self.calls.lock().unwrap().push(format!("login:{username}"));
        Ok(AuthResponse { access_token: self.token.clone(), ..AuthResponse::default() })
    }

    async fn register(&self, username: &str, email: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        self.calls.lock().unwrap().push(format!("register:{username}:{email}"));
        Ok(AuthResponse { access_token: self.token.clone(), ..AuthResponse::default() })
    }
}

struct RejectingIssuer;

#[async_trait::async_trait]
impl CredentialIssuer for RejectingIssuer {
    async fn login(&self, _username: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        Err(ClientError::from_status(Domain::Identity, 401, Some("Bad credentials".into())))
    }

    async fn register(&self, _username: &str, _email: &str, _password: &str) -> Result<AuthResponse, ClientError> {
        Err(ClientError::from_status(Domain::Identity, 400, Some("Username already exists".into())))
    }
}

// =========================================================================
// init
// =========================================================================

#[test]
fn init_without_token_is_anonymous() {
    let manager = manager_with(Arc::new(MemoryTokenStore::new()), AuthFailurePolicy::ForceLogout);
    assert_eq!(manager.current(), Session::Anonymous);
    assert!(manager.token().is_none());
}

#[test]
fn init_with_valid_token_is_authenticated() {
    let store = Arc::new(MemoryTokenStore::with_token(token_for("alice", &["ROLE_USER"])));
    let manager = manager_with(store, AuthFailurePolicy::ForceLogout);
    let session = manager.current();
    assert!(session.is_authenticated());
    assert_eq!(session.subject(), Some("alice"));
    assert_eq!(session.roles(), &role_set(&["ROLE_USER"]));
    assert_eq!(*manager.subscribe().borrow(), session);
}

#[test]
fn init_with_malformed_token_is_anonymous_and_clears_slot() {
    for bad in ["garbage", "a.b", "e30.!!!.sig"] {
        let store = Arc::new(MemoryTokenStore::with_token(bad));
        let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
        assert_eq!(manager.current(), Session::Anonymous, "expected anonymous for {bad:?}");
        assert!(store.get().is_none(), "expected slot cleared for {bad:?}");
    }
}

#[test]
fn roles_equal_token_roles_regardless_of_order() {
    let store = Arc::new(MemoryTokenStore::with_token(token_for("bob", &["ROLE_USER", "ROLE_ADMIN"])));
    let manager = manager_with(store, AuthFailurePolicy::ForceLogout);
    assert_eq!(manager.current().roles(), &role_set(&["ROLE_ADMIN", "ROLE_USER"]));
    assert!(manager.current().is_admin());
}

#[test]
fn roles_are_rederived_when_token_changes() {
    let store = Arc::new(MemoryTokenStore::with_token(token_for("bob", &["ROLE_ADMIN"])));
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    assert!(manager.current().is_admin());

    store.set(&token_for("bob", &["ROLE_USER"])).unwrap();
    let session = manager.current();
    assert!(!session.is_admin());
    assert_eq!(session.roles(), &role_set(&["ROLE_USER"]));
}

// =========================================================================
// login / register
// =========================================================================

#[tokio::test]
async fn login_stores_token_and_authenticates() {
    let store = Arc::new(MemoryTokenStore::new());
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    let token = token_for("alice", &["ROLE_USER"]);
    let issuer = MockIssuer::issuing(Some(token.clone()));

    let session = manager.login(&issuer, "alice", "pw").await.unwrap();
    assert_eq!(session.subject(), Some("alice"));
    assert_eq!(store.get(), Some(token));
    assert_eq!(manager.current(), session);
    assert_eq!(issuer.calls.lock().unwrap().as_slice(), ["login:alice"]);
}

#[tokio::test]
async fn register_authenticates_new_user() {
    let manager = manager_with(Arc::new(MemoryTokenStore::new()), AuthFailurePolicy::ForceLogout);
    let issuer = MockIssuer::issuing(Some(token_for("carol", &["ROLE_USER"])));

    let session = manager.register(&issuer, "carol", "carol@example.com", "pw").await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(issuer.calls.lock().unwrap().as_slice(), ["register:carol:carol@example.com"]);
}

#[tokio::test]
async fn login_without_access_token_is_missing_credential() {
    let store = Arc::new(MemoryTokenStore::new());
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    let err = manager.login(&MockIssuer::issuing(None), "alice", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingCredential));
    assert!(store.get().is_none());
}

#[tokio::test]
async fn login_with_malformed_token_fails_and_leaves_anonymous() {
    let store = Arc::new(MemoryTokenStore::with_token(token_for("old", &["ROLE_USER"])));
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    let err = manager.login(&MockIssuer::issuing(Some("not-a-jwt".into())), "alice", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert!(store.get().is_none());
    assert_eq!(manager.current(), Session::Anonymous);
}

#[tokio::test]
async fn rejected_login_keeps_previous_state() {
    let manager = manager_with(Arc::new(MemoryTokenStore::new()), AuthFailurePolicy::ForceLogout);
    let err = manager.login(&RejectingIssuer, "alice", "wrong").await.unwrap_err();
    assert_eq!(err.user_message("Login failed"), "Bad credentials");
    assert_eq!(manager.current(), Session::Anonymous);
}

#[tokio::test]
async fn last_login_wins() {
    let manager = manager_with(Arc::new(MemoryTokenStore::new()), AuthFailurePolicy::ForceLogout);
    manager.login(&MockIssuer::issuing(Some(token_for("first", &[]))), "first", "pw").await.unwrap();
    manager.login(&MockIssuer::issuing(Some(token_for("second", &[]))), "second", "pw").await.unwrap();
    assert_eq!(manager.current().subject(), Some("second"));
}

// =========================================================================
// logout / subscriptions
// =========================================================================

#[tokio::test]
async fn logout_is_idempotent() {
    let store = Arc::new(MemoryTokenStore::new());
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    manager.login(&MockIssuer::issuing(Some(token_for("alice", &[]))), "alice", "pw").await.unwrap();

    manager.logout();
    assert_eq!(manager.current(), Session::Anonymous);
    manager.logout();
    assert_eq!(manager.current(), Session::Anonymous);
    assert!(store.get().is_none());
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let manager = manager_with(Arc::new(MemoryTokenStore::new()), AuthFailurePolicy::ForceLogout);
    let mut rx = manager.subscribe();
    assert!(!rx.borrow_and_update().is_authenticated());

    manager.login(&MockIssuer::issuing(Some(token_for("alice", &["ROLE_USER"]))), "alice", "pw").await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().subject(), Some("alice"));

    manager.logout();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Session::Anonymous);

    manager.logout();
    assert!(!rx.has_changed().unwrap());
}

// =========================================================================
// on_unauthorized
// =========================================================================

#[test]
fn force_logout_policy_clears_session() {
    let token = token_for("alice", &[]);
    let store = Arc::new(MemoryTokenStore::with_token(token.clone()));
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    assert!(manager.on_unauthorized(Domain::Catalog, Some(&token)));
    assert!(store.get().is_none());
    assert!(!manager.on_unauthorized(Domain::Catalog, Some(&token)));
}

#[test]
fn surface_policy_keeps_session() {
    let token = token_for("alice", &[]);
    let store = Arc::new(MemoryTokenStore::with_token(token.clone()));
    let manager = manager_with(store.clone(), AuthFailurePolicy::Surface);
    assert!(!manager.on_unauthorized(Domain::Catalog, Some(&token)));
    assert!(store.get().is_some());
    assert!(manager.current().is_authenticated());
}

#[test]
fn unauthorized_without_sent_token_keeps_session() {
    let store = Arc::new(MemoryTokenStore::with_token(token_for("alice", &[])));
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    assert!(!manager.on_unauthorized(Domain::Identity, None));
    assert!(manager.current().is_authenticated());
}

#[test]
fn unauthorized_for_replaced_token_keeps_newer_session() {
    let old = token_for("alice", &[]);
    let store = Arc::new(MemoryTokenStore::with_token(token_for("bob", &[])));
    let manager = manager_with(store.clone(), AuthFailurePolicy::ForceLogout);
    assert!(!manager.on_unauthorized(Domain::Catalog, Some(&old)));
    assert_eq!(manager.current().subject(), Some("bob"));
}

// =========================================================================
// Session
// =========================================================================

#[test]
fn anonymous_session_has_no_roles() {
    let session = Session::Anonymous;
    assert!(!session.is_authenticated());
    assert!(session.roles().is_empty());
    assert!(!session.is_admin());
    assert_eq!(session.subject(), None);
}
