//! Unit tests for the auth crate
//!
//! Use cases and routers are exercised against an in-memory repository;
//! the Postgres implementation shares the same trait contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::config::{AuthConfig, ProviderSettings};
use crate::application::{
    ExternalSignInUseCase, LoginInput, LoginUseCase, ProviderProfile, RegisterInput,
    RegisterUseCase, SessionManager,
};
use crate::domain::entity::{auth_session::AuthSession, credential::Credential, identity::Identity};
use crate::domain::repository::{
    CredentialRepository, IdentityRepository, ProviderLinkRepository, SessionRepository,
};
use crate::domain::value_object::{identity_id::IdentityId, provider::Provider, username::Username};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory repository
// ============================================================================

#[derive(Default)]
struct Store {
    identities: HashMap<Uuid, Identity>,
    credentials: HashMap<Uuid, Credential>,
    links: HashMap<(Provider, String), Uuid>,
    sessions: HashMap<Uuid, AuthSession>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryAuthRepository {
    inner: Arc<Mutex<Store>>,
}

impl InMemoryAuthRepository {
    fn identity_count(&self) -> usize {
        self.inner.lock().unwrap().identities.len()
    }

    fn session_count(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }
}

impl IdentityRepository for InMemoryAuthRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut store = self.inner.lock().unwrap();

        if let Some(username) = &identity.username {
            let taken = store.identities.values().any(|existing| {
                existing.username.as_ref().map(Username::canonical) == Some(username.canonical())
            });
            if taken {
                return Err(AuthError::DuplicateUsername);
            }
        }

        store
            .identities
            .insert(*identity.identity_id.as_uuid(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let store = self.inner.lock().unwrap();
        Ok(store.identities.get(identity_id.as_uuid()).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<Identity>> {
        let store = self.inner.lock().unwrap();
        Ok(store
            .identities
            .values()
            .find(|identity| {
                identity.username.as_ref().map(Username::canonical) == Some(username.canonical())
            })
            .cloned())
    }
}

impl CredentialRepository for InMemoryAuthRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        let mut store = self.inner.lock().unwrap();
        store
            .credentials
            .insert(*credential.identity_id.as_uuid(), credential.clone());
        Ok(())
    }

    async fn find_by_identity_id(
        &self,
        identity_id: &IdentityId,
    ) -> AuthResult<Option<Credential>> {
        let store = self.inner.lock().unwrap();
        Ok(store.credentials.get(identity_id.as_uuid()).cloned())
    }
}

impl ProviderLinkRepository for InMemoryAuthRepository {
    async fn find_or_create(&self, provider: Provider, subject_id: &str) -> AuthResult<Identity> {
        let mut store = self.inner.lock().unwrap();

        if let Some(identity_id) = store.links.get(&(provider, subject_id.to_string())) {
            return Ok(store.identities[identity_id].clone());
        }

        let identity = Identity::new_external();
        store
            .identities
            .insert(*identity.identity_id.as_uuid(), identity.clone());
        store.links.insert(
            (provider, subject_id.to_string()),
            *identity.identity_id.as_uuid(),
        );
        Ok(identity)
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let mut store = self.inner.lock().unwrap();
        store.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        let store = self.inner.lock().unwrap();
        Ok(store
            .sessions
            .get(&session_id)
            .filter(|session| !session.is_expired())
            .cloned())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        let mut store = self.inner.lock().unwrap();
        store.sessions.remove(&session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut store = self.inner.lock().unwrap();
        let before = store.sessions.len();
        store.sessions.retain(|_, session| !session.is_expired());
        Ok((before - store.sessions.len()) as u64)
    }
}

// ============================================================================
// Use case tests
// ============================================================================

mod use_cases {
    use super::*;

    fn register_use_case(
        repo: &InMemoryAuthRepository,
    ) -> RegisterUseCase<InMemoryAuthRepository, InMemoryAuthRepository> {
        RegisterUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    fn login_use_case(
        repo: &InMemoryAuthRepository,
    ) -> LoginUseCase<InMemoryAuthRepository, InMemoryAuthRepository> {
        LoginUseCase::new(Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let repo = InMemoryAuthRepository::default();

        let identity = register_use_case(&repo)
            .execute(RegisterInput {
                username: "alice".to_string(),
                password: "wonderland".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(identity.username_str(), Some("alice"));

        let logged_in = login_use_case(&repo)
            .execute(LoginInput {
                username: "alice".to_string(),
                password: "wonderland".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(logged_in.identity_id, identity.identity_id);
    }

    #[tokio::test]
    async fn test_duplicate_username_leaves_one_record() {
        let repo = InMemoryAuthRepository::default();
        let use_case = register_use_case(&repo);

        use_case
            .execute(RegisterInput {
                username: "alice".to_string(),
                password: "first".to_string(),
            })
            .await
            .unwrap();

        let second = use_case
            .execute(RegisterInput {
                username: "alice".to_string(),
                password: "second".to_string(),
            })
            .await;

        assert!(matches!(second, Err(AuthError::DuplicateUsername)));
        assert_eq!(repo.identity_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_case_insensitive() {
        let repo = InMemoryAuthRepository::default();
        let use_case = register_use_case(&repo);

        use_case
            .execute(RegisterInput {
                username: "Alice".to_string(),
                password: "first".to_string(),
            })
            .await
            .unwrap();

        let second = use_case
            .execute(RegisterInput {
                username: "ALICE".to_string(),
                password: "second".to_string(),
            })
            .await;

        assert!(matches!(second, Err(AuthError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let repo = InMemoryAuthRepository::default();

        register_use_case(&repo)
            .execute(RegisterInput {
                username: "alice".to_string(),
                password: "wonderland".to_string(),
            })
            .await
            .unwrap();

        let use_case = login_use_case(&repo);

        // Wrong password
        let wrong_password = use_case
            .execute(LoginInput {
                username: "alice".to_string(),
                password: "not-wonderland".to_string(),
            })
            .await;

        // Unknown username
        let unknown_user = use_case
            .execute(LoginInput {
                username: "bob".to_string(),
                password: "wonderland".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let repo = InMemoryAuthRepository::default();
        let use_case = ExternalSignInUseCase::new(Arc::new(repo.clone()));

        let profile = ProviderProfile {
            provider: Provider::Google,
            subject: "abc123".to_string(),
            email: Some("a@example.com".to_string()),
        };

        let first = use_case.execute(profile.clone()).await.unwrap();
        let second = use_case.execute(profile).await.unwrap();

        assert_eq!(first.identity_id, second.identity_id);
        assert_eq!(repo.identity_count(), 1);
        assert!(first.username.is_none());
    }

    #[tokio::test]
    async fn test_same_subject_on_other_provider_is_distinct() {
        let repo = InMemoryAuthRepository::default();
        let use_case = ExternalSignInUseCase::new(Arc::new(repo.clone()));

        let google = use_case
            .execute(ProviderProfile {
                provider: Provider::Google,
                subject: "abc123".to_string(),
                email: None,
            })
            .await
            .unwrap();

        let facebook = use_case
            .execute(ProviderProfile {
                provider: Provider::Facebook,
                subject: "abc123".to_string(),
                email: None,
            })
            .await
            .unwrap();

        assert_ne!(google.identity_id, facebook.identity_id);
        assert_eq!(repo.identity_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_subject_rejected() {
        let repo = InMemoryAuthRepository::default();
        let use_case = ExternalSignInUseCase::new(Arc::new(repo.clone()));

        let result = use_case
            .execute(ProviderProfile {
                provider: Provider::Google,
                subject: String::new(),
                email: None,
            })
            .await;

        assert!(matches!(result, Err(AuthError::ExternalAuthFailure(_))));
        assert_eq!(repo.identity_count(), 0);
    }
}

// ============================================================================
// Session manager tests
// ============================================================================

mod sessions {
    use super::*;

    fn manager(repo: &InMemoryAuthRepository, config: &AuthConfig) -> SessionManager<InMemoryAuthRepository> {
        SessionManager::new(Arc::new(repo.clone()), Arc::new(config.clone()))
    }

    #[tokio::test]
    async fn test_establish_resolve_destroy() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();
        let manager = manager(&repo, &config);

        let identity = Identity::new_local(Username::new("alice").unwrap());
        let (_, token) = manager.establish(&identity).await.unwrap();

        let current = manager.resolve(&token).await.unwrap();
        assert_eq!(current.identity_id, identity.identity_id);
        assert_eq!(current.username.as_deref(), Some("alice"));

        manager.destroy(&token).await.unwrap();
        assert!(manager.resolve(&token).await.is_none());

        // Destroying an already-destroyed session is not an error
        manager.destroy(&token).await.unwrap();
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_garbage_token_is_anonymous() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();
        let manager = manager(&repo, &config);

        assert!(manager.resolve("").await.is_none());
        assert!(manager.resolve("no-dot-here").await.is_none());
        assert!(manager.resolve("a.b.c").await.is_none());
        assert!(manager.resolve("not-a-uuid.c2ln").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_rejects_foreign_signature() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();
        let manager = manager(&repo, &config);

        let identity = Identity::new_external();
        let (session, _) = manager.establish(&identity).await.unwrap();

        // Token signed under a different secret must not resolve
        let other = SessionManager::new(
            Arc::new(repo.clone()),
            Arc::new(AuthConfig::development()),
        );
        let forged = other.sign_token(session.session_id);

        assert!(manager.resolve(&forged).await.is_none());
    }

    #[tokio::test]
    async fn test_destroy_unknown_token_is_ok() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();
        let manager = manager(&repo, &config);

        // Unparseable token: nothing to do
        manager.destroy("garbage").await.unwrap();

        // Well-formed token for a session that never existed
        let token = manager.sign_token(Uuid::new_v4());
        manager.destroy(&token).await.unwrap();
    }
}

// ============================================================================
// Router tests
// ============================================================================

mod routes {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::presentation::router::auth_router_generic;

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn test_config() -> AuthConfig {
        AuthConfig::development().with_provider(
            Provider::Google,
            ProviderSettings::google(
                "client-id".to_string(),
                "client-secret".to_string(),
                "http://localhost:3000",
            ),
        )
    }

    #[tokio::test]
    async fn test_home_is_public() {
        let app = auth_router_generic(InMemoryAuthRepository::default(), test_config());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_sets_session_and_redirects_to_secrets() {
        let app = auth_router_generic(InMemoryAuthRepository::default(), test_config());

        let response = app
            .oneshot(form_request("/register", "username=alice&password=wonderland"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/secrets");

        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("session=")));
        assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
    }

    #[tokio::test]
    async fn test_duplicate_register_redirects_back() {
        let repo = InMemoryAuthRepository::default();
        let app = auth_router_generic(repo.clone(), test_config());

        let first = app
            .clone()
            .oneshot(form_request("/register", "username=alice&password=one"))
            .await
            .unwrap();
        assert_eq!(location(&first), "/secrets");

        let second = app
            .oneshot(form_request("/register", "username=alice&password=two"))
            .await
            .unwrap();

        assert_eq!(second.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&second), "/register");
        assert!(set_cookies(&second).is_empty());
        assert_eq!(repo.identity_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_login_redirects_back() {
        let app = auth_router_generic(InMemoryAuthRepository::default(), test_config());

        let response = app
            .oneshot(form_request("/login", "username=ghost&password=boo"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        assert!(set_cookies(&response).is_empty());
    }

    #[tokio::test]
    async fn test_oauth_start_redirects_to_provider_with_state_cookie() {
        let app = auth_router_generic(InMemoryAuthRepository::default(), test_config());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/google")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("https://accounts.google.com/"));

        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("oauth_state=")));
    }

    #[tokio::test]
    async fn test_oauth_start_unconfigured_provider_redirects_home() {
        // Facebook is not configured in test_config()
        let app = auth_router_generic(InMemoryAuthRepository::default(), test_config());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/facebook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_oauth_callback_with_provider_error_redirects_home() {
        let repo = InMemoryAuthRepository::default();
        let app = auth_router_generic(repo.clone(), test_config());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/google/callback?error=access_denied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        // No partial records
        assert_eq!(repo.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_oauth_callback_state_mismatch_redirects_home() {
        let repo = InMemoryAuthRepository::default();
        let app = auth_router_generic(repo.clone(), test_config());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/google/callback?code=abc&state=evil")
                    .header(header::COOKIE, "oauth_state=expected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(repo.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_destroys_session() {
        let repo = InMemoryAuthRepository::default();
        let config = test_config();
        let app = auth_router_generic(repo.clone(), config.clone());

        let register = app
            .clone()
            .oneshot(form_request("/register", "username=alice&password=wonderland"))
            .await
            .unwrap();

        let session_cookie = set_cookies(&register)
            .into_iter()
            .find(|c| c.starts_with("session="))
            .unwrap();
        let token = session_cookie
            .split(';')
            .next()
            .unwrap()
            .trim_start_matches("session=")
            .to_string();

        assert_eq!(repo.session_count(), 1);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/logout")
                    .header(header::COOKIE, format!("session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(
            set_cookies(&response)
                .iter()
                .any(|c| c.starts_with("session=;") && c.contains("Max-Age=0"))
        );
        assert_eq!(repo.session_count(), 0);
    }
}

// ============================================================================
// Middleware tests
// ============================================================================

mod gate {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    use crate::application::session::CurrentIdentity;
    use crate::presentation::middleware::{AuthMiddlewareState, require_identity};

    fn protected_app(repo: InMemoryAuthRepository, config: AuthConfig) -> Router {
        let state = AuthMiddlewareState {
            repo: Arc::new(repo),
            config: Arc::new(config),
        };

        Router::new()
            .route(
                "/secrets",
                get(|Extension(identity): Extension<CurrentIdentity>| async move {
                    identity.identity_id.to_string()
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                state,
                require_identity::<InMemoryAuthRepository>,
            ))
    }

    #[tokio::test]
    async fn test_anonymous_is_redirected_to_login() {
        let app = protected_app(InMemoryAuthRepository::default(), AuthConfig::development());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/secrets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[tokio::test]
    async fn test_authenticated_request_passes_with_identity() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();

        let manager =
            SessionManager::new(Arc::new(repo.clone()), Arc::new(config.clone()));
        let identity = Identity::new_local(Username::new("alice").unwrap());
        let (_, token) = manager.establish(&identity).await.unwrap();

        let app = protected_app(repo, config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/secrets")
                    .header(header::COOKIE, format!("session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_gone_after_logout_semantics() {
        let repo = InMemoryAuthRepository::default();
        let config = AuthConfig::development();

        let manager =
            SessionManager::new(Arc::new(repo.clone()), Arc::new(config.clone()));
        let identity = Identity::new_external();
        let (_, token) = manager.establish(&identity).await.unwrap();
        manager.destroy(&token).await.unwrap();

        let app = protected_app(repo, config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/secrets")
                    .header(header::COOKIE, format!("session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }
}
