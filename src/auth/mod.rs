pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::{normalize_email, UserProfile};

pub use extractors::AuthenticatedUserId;
pub use middleware::{authenticate, AuthMiddleware, AuthRejection};
pub use password::PasswordHasher;
pub use token::{Claims, TokenKeys};

lazy_static! {
    // Phone numbers: digits only, 8 to 15 of them.
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^[0-9]{8,15}$").unwrap();
}

/// Payload for `POST /register`.
///
/// Every field is optional at the serde level so that absence is reported by
/// [`RegisterRequest::into_new_account`] with its own message instead of a
/// deserialization error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre", default)]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Registration fields after the presence check.
#[derive(Validate)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(regex(
        path = "PHONE_REGEX",
        message = "phone number must contain 8 to 15 digits"
    ))]
    pub phone: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Order in which format failures are reported.
const FIELD_CHECK_ORDER: [&str; 3] = ["password", "email", "phone"];

impl RegisterRequest {
    /// Presence first, then password length, email format and phone format.
    /// The first failing check is returned on its own.
    pub fn into_new_account(self) -> Result<NewAccount, AppError> {
        let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(password)) = (
            present(self.first_name),
            present(self.last_name),
            present(self.email),
            present(self.phone),
            self.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::ValidationError("all fields are required".into()));
        };

        let account = NewAccount {
            first_name,
            last_name,
            email: normalize_email(&email),
            phone,
            password,
        };

        if let Err(errors) = account.validate() {
            let field_errors = errors.field_errors();
            let message = FIELD_CHECK_ORDER
                .iter()
                .filter_map(|field| field_errors.get(field))
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()));
            return Err(match message {
                Some(message) => AppError::ValidationError(message),
                None => AppError::from(errors),
            });
        }

        Ok(account)
    }
}

/// Payload for `POST /login`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalized email and the password, or a validation error if either is missing.
    pub fn into_credentials(self) -> Result<(String, String), AppError> {
        match (present(self.email), self.password.filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => Ok((normalize_email(&email), password)),
            _ => Err(AppError::ValidationError(
                "email and password are required".into(),
            )),
        }
    }
}

/// Response to a successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// Response to a successful login: the JWT and the public user projection.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
