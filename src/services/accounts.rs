use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{
    AuthResponse, LoginRequest, PasswordHasher, RegisterRequest, RegisterResponse, TokenKeys,
};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::UserStore;

/// Registration, login and profile lookup over the user store.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenKeys>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenKeys>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Validates, checks email uniqueness, hashes and persists, then issues a token.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let account = request.into_new_account()?;

        if self.users.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let hasher = self.hasher;
        let password = account.password;
        let password_hash = run_blocking(move || hasher.hash(&password)).await?;

        let user = self
            .users
            .insert(User::new(
                account.first_name,
                account.last_name,
                account.email,
                account.phone,
                password_hash,
            ))
            .await?;
        let token = self.tokens.issue(user.id)?;
        log::info!("registered user {}", user.id);

        Ok(RegisterResponse {
            message: "user registered successfully".into(),
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let (email, password) = request.into_credentials()?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let hasher = self.hasher;
        let digest = user.password_hash.clone();
        let matches = run_blocking(move || hasher.verify(&password, &digest)).await?;
        if !matches {
            log::info!("failed login for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        log::info!("user {} logged in", user.id);
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }
}

/// bcrypt is CPU-bound; keep it off the request workers.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Password task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use chrono::Duration;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryUserStore::new()),
            PasswordHasher::new(4),
            Arc::new(TokenKeys::new(b"account-test-secret", Duration::hours(1))),
        )
    }

    fn ana(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            email: Some(email.into()),
            phone: Some("12345678".into()),
            password: Some("secret1".into()),
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[actix_rt::test]
    async fn test_register_then_login() {
        let service = service();
        let registered = service.register(ana("a@x.com")).await.unwrap();
        assert_eq!(registered.user.email, "a@x.com");

        let logged_in = service
            .login(credentials("a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);

        let claims = service.tokens.verify(&logged_in.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_rejected_case_insensitively() {
        let service = service();
        service.register(ana("a@x.com")).await.unwrap();

        let mut again = ana("A@X.COM");
        again.first_name = Some("Other".into());
        again.password = Some("different-password".into());
        assert!(matches!(
            service.register(again).await,
            Err(AppError::DuplicateEmail)
        ));
    }

    #[actix_rt::test]
    async fn test_validation_runs_before_uniqueness() {
        let service = service();
        service.register(ana("a@x.com")).await.unwrap();

        let mut invalid = ana("a@x.com");
        invalid.password = Some("123".into());
        assert!(matches!(
            service.register(invalid).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_rt::test]
    async fn test_login_failures() {
        let service = service();
        service.register(ana("a@x.com")).await.unwrap();

        assert!(matches!(
            service.login(credentials("nobody@x.com", "secret1")).await,
            Err(AppError::UserNotFound)
        ));
        assert!(matches!(
            service.login(credentials("a@x.com", "wrong-pass")).await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_rt::test]
    async fn test_profile() {
        let service = service();
        let registered = service.register(ana("a@x.com")).await.unwrap();

        let profile = service.profile(registered.user.id).await.unwrap();
        assert_eq!(profile, registered.user);

        assert!(matches!(
            service.profile(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
