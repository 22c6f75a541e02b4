//! Sign-in, redirect fallback and sign-out against the mock identity
//! provider and the in-memory store.

use exp3_identity::{AuthError, IdentityProvider, UserIdentity};
use exp3_identity_mock::MockIdentityProvider;
use exp3_origins::OriginAuthorizer;
use exp3_profiles::ProfileManagement;
use exp3_sessions::{Error, SessionManagement, SessionManager, SessionManagerOptions, SignInOutcome};
use exp3_store_memory::MemoryStore;

fn ada() -> UserIdentity {
    UserIdentity::new("uid-ada")
        .with_name("Ada")
        .with_email("ada@example.com")
}

fn session_manager(
    provider: &MockIdentityProvider,
    store: &MemoryStore,
) -> SessionManager<MockIdentityProvider, MemoryStore> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    SessionManager::new(SessionManagerOptions {
        authorizer: OriginAuthorizer::new(["exp32024.web.app", "localhost"]),
        identity_provider: provider.clone(),
        store: store.clone(),
    })
}

#[tokio::test]
async fn test_sign_in_creates_profile() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    let outcome = sessions.sign_in("exp32024.web.app").await.unwrap();

    let SignInOutcome::SignedIn(profile) = outcome else {
        panic!("expected a signed-in outcome");
    };
    assert_eq!(profile.id, "uid-ada");
    assert_eq!(profile.xp, 0);
    assert!(profile.registered_events.is_empty());
    assert_eq!(
        sessions.profiles().get_profile("uid-ada").await.unwrap(),
        profile
    );
}

#[tokio::test]
async fn test_second_sign_in_keeps_profile() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    sessions.sign_in("localhost").await.unwrap();
    sessions.profiles().set_xp("uid-ada", 900).await.unwrap();

    let Ok(SignInOutcome::SignedIn(profile)) = sessions.sign_in("localhost").await else {
        panic!("expected a signed-in outcome");
    };
    assert_eq!(profile.xp, 900);
}

#[tokio::test]
async fn test_unauthorized_origin_never_reaches_provider() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    let result = sessions.sign_in("attacker.example").await;

    assert_eq!(
        result,
        Err(Error::UnauthorizedOrigin("attacker.example".to_string()))
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Unauthorized domain: attacker.example"
    );
    assert_eq!(provider.popup_requests().await, 0);
}

#[tokio::test]
async fn test_sandbox_origin_is_authorized() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    assert!(matches!(
        sessions.sign_in("foo.stackblitz.io").await,
        Ok(SignInOutcome::SignedIn(_))
    ));
}

#[tokio::test]
async fn test_blocked_popup_falls_back_to_redirect() {
    for error in [AuthError::PopupBlocked, AuthError::UnauthorizedDomain] {
        let provider = MockIdentityProvider::new();
        provider.push_popup_result(Err(error)).await;
        provider.set_redirect_user(ada()).await;
        let store = MemoryStore::new();
        let sessions = session_manager(&provider, &store);

        assert_eq!(
            sessions.sign_in("localhost").await,
            Ok(SignInOutcome::Redirecting)
        );
        assert_eq!(provider.redirect_requests().await, 1);

        // After the redirect round trip the profile is created.
        let profile = sessions.complete_redirect().await.unwrap().unwrap();
        assert_eq!(profile.id, "uid-ada");
        assert_eq!(sessions.complete_redirect().await, Ok(None));
    }
}

#[tokio::test]
async fn test_other_popup_errors_are_surfaced() {
    let provider = MockIdentityProvider::with_default_user(ada());
    provider.push_popup_result(Err(AuthError::PopupClosed)).await;
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    let result = sessions.sign_in("localhost").await;

    assert_eq!(result, Err(Error::Auth(AuthError::PopupClosed)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Authentication window was closed. Please try again."
    );
    assert_eq!(provider.redirect_requests().await, 0);
}

#[tokio::test]
async fn test_empty_popup_result() {
    let provider = MockIdentityProvider::new();
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    let result = sessions.sign_in("localhost").await;

    assert_eq!(result, Err(Error::NoUserData));
    assert_eq!(result.unwrap_err().to_string(), "No user data received");
}

#[tokio::test]
async fn test_profile_failure_is_surfaced() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);
    store.set_unavailable(true);

    let result = sessions.sign_in("localhost").await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "Failed to create/update user profile"
    );
}

#[tokio::test]
async fn test_current_user_prefers_stored_profile() {
    let provider = MockIdentityProvider::new();
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);

    assert_eq!(sessions.current_user().await, None);

    // No profile yet: the provider identity is used as is.
    let bare = UserIdentity::new("uid-ada");
    provider.set_current_user(Some(bare.clone())).await;
    assert_eq!(sessions.current_user().await, Some(bare));

    sessions.profiles().create_or_touch_profile(ada()).await.unwrap();
    assert_eq!(sessions.current_user().await, Some(ada()));
}

#[tokio::test]
async fn test_sign_out() {
    let provider = MockIdentityProvider::with_default_user(ada());
    let store = MemoryStore::new();
    let sessions = session_manager(&provider, &store);
    sessions.sign_in("localhost").await.unwrap();

    provider.fail_sign_out(AuthError::Network).await;
    let result = sessions.sign_out().await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Failed to sign out. Please try again."
    );
    assert!(provider.current_user().await.is_some());

    sessions.sign_out().await.unwrap();
    assert_eq!(provider.current_user().await, None);
}
