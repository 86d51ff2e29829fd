//! Registration, login and logout

use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{SessionContext, User},
    password,
    repositories::UserRepository,
    session,
    validation::{validate_password, validate_username},
};

/// Create a user with a salted password hash
pub async fn register(users: &UserRepository, username: &str, password: &str) -> AppResult<User> {
    validate_username(username).map_err(AppError::Validation)?;
    validate_password(password).map_err(AppError::Validation)?;

    let password_hash = password::hash_password_blocking(password.to_string()).await?;
    let user = users.create(username, &password_hash).await?;

    info!("Registered user: {}", user.username);
    Ok(user)
}

/// Check credentials and bind the user to `session`
///
/// Unknown usernames cost the same Argon2 verification as a wrong password.
pub async fn login(
    users: &UserRepository,
    session: &Session,
    username: &str,
    password: &str,
) -> AppResult<User> {
    let user = users.find_by_username(username).await?;

    let verified = match &user {
        Some(user) => {
            password::verify_password_blocking(user.password_hash.clone(), password.to_string())
                .await?
        }
        None => password::verify_unknown_user_blocking(password.to_string()).await?,
    };

    let Some(user) = user.filter(|_| verified) else {
        warn!("Login failed for user: {}", username);
        return Err(AppError::InvalidCredentials);
    };

    session::begin(
        session,
        &SessionContext {
            user_id: user.id,
            username: user.username.clone(),
        },
    )
    .await?;

    info!("User logged in: {}", user.username);
    Ok(user)
}

/// Close the session and delete it from the store
pub async fn logout(session: &Session) -> AppResult<()> {
    if let Some(user) = session::current_user(session).await? {
        info!("User logged out: {}", user.username);
    }

    session::end(session).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_state;
    use std::sync::Arc;

    fn new_session(state: &crate::state::AppState) -> Session {
        Session::new(None, Arc::new(state.session_store.clone()), None)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = test_state().await;
        let session = new_session(&state);

        let user = register(&state.user_repository, "alice", "pw123").await.unwrap();
        assert_ne!(user.password_hash, "pw123");

        let logged_in = login(&state.user_repository, &session, "alice", "pw123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let current = session::current_user(&session).await.unwrap().unwrap();
        assert_eq!(current.user_id, user.id);
        assert_eq!(current.username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let state = test_state().await;
        let session = new_session(&state);

        register(&state.user_repository, "alice", "pw123").await.unwrap();
        let err = register(&state.user_repository, "alice", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername(_)));

        // The first password still works, the second never took effect
        assert!(
            login(&state.user_repository, &session, "alice", "pw123")
                .await
                .is_ok()
        );
        assert!(matches!(
            login(&state.user_repository, &session, "alice", "other").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_invalid_credentials_leave_session_untouched() {
        let state = test_state().await;
        let session = new_session(&state);
        register(&state.user_repository, "alice", "pw123").await.unwrap();

        assert!(matches!(
            login(&state.user_repository, &session, "alice", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&state.user_repository, &session, "mallory", "pw123").await,
            Err(AppError::InvalidCredentials)
        ));
        assert_eq!(session::current_user(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let state = test_state().await;

        assert!(matches!(
            register(&state.user_repository, "", "pw123").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            register(&state.user_repository, "alice", "").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_closes_session() {
        let state = test_state().await;
        let session = new_session(&state);
        register(&state.user_repository, "alice", "pw123").await.unwrap();
        login(&state.user_repository, &session, "alice", "pw123")
            .await
            .unwrap();

        logout(&session).await.unwrap();
        assert_eq!(session::current_user(&session).await.unwrap(), None);
    }
}
