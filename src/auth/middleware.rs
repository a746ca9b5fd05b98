use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::fmt;

use crate::auth::extractors::AuthenticatedUserId;
use crate::auth::token::TokenKeys;
use crate::error::AppError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Why the gateway refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidFormat,
    InvalidToken,
}

impl AuthRejection {
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "access denied, no token",
            AuthRejection::InvalidFormat => "invalid token format",
            AuthRejection::InvalidToken => "invalid token",
        }
    }
}

impl fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        AppError::Unauthorized(rejection.message().into())
    }
}

/// Runs the gateway checks in order: header present, `Bearer ` scheme, token valid.
/// The first failing stage decides the rejection.
pub fn authenticate(
    header: Option<&HeaderValue>,
    keys: &TokenKeys,
) -> Result<AuthenticatedUserId, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingToken)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthRejection::InvalidFormat)?;
    let claims = keys
        .verify(token.trim())
        .map_err(|_| AuthRejection::InvalidToken)?;
    Ok(AuthenticatedUserId(claims.sub))
}

/// Requires a valid bearer token on every request of the wrapped scope or resource.
///
/// The verification keys are read from the `web::Data<TokenKeys>` registered on the app.
/// On success an [`AuthenticatedUserId`] is stored in the request extensions; otherwise
/// the request is answered with a 401 JSON body and the inner service is never called.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let keys = match req.app_data::<web::Data<TokenKeys>>().cloned() {
            Some(keys) => keys,
            None => {
                let err = AppError::InternalServerError("TokenKeys not registered as app data".into());
                let res = req.error_response(err).map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
        };

        match authenticate(req.headers().get(header::AUTHORIZATION), &keys) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => {
                log::warn!("{} {} rejected: {}", req.method(), req.path(), rejection);
                let res = req
                    .error_response(AppError::from(rejection))
                    .map_into_right_body();
                Box::pin(ready(Ok(res)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::auth::token::Claims;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"middleware-test-secret", Duration::hours(1))
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authenticate(None, &keys()),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4()).unwrap();

        assert_eq!(
            authenticate(Some(&header(&token)), &keys),
            Err(AuthRejection::InvalidFormat)
        );
        assert_eq!(
            authenticate(Some(&header(&format!("Basic {}", token))), &keys),
            Err(AuthRejection::InvalidFormat)
        );
        assert_eq!(
            authenticate(Some(&header(&format!("bearer {}", token))), &keys),
            Err(AuthRejection::InvalidFormat)
        );
    }

    #[test]
    fn test_non_utf8_header_is_invalid_format() {
        let value = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        assert_eq!(
            authenticate(Some(&value), &keys()),
            Err(AuthRejection::InvalidFormat)
        );
    }

    #[test]
    fn test_bad_and_expired_tokens() {
        let keys = keys();
        assert_eq!(
            authenticate(Some(&header("Bearer garbage")), &keys),
            Err(AuthRejection::InvalidToken)
        );

        let expired = keys
            .sign(&Claims::new(
                Uuid::new_v4(),
                Utc::now() - Duration::hours(2),
                Duration::hours(1),
            ))
            .unwrap();
        assert_eq!(
            authenticate(Some(&header(&format!("Bearer {}", expired))), &keys),
            Err(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn test_valid_token_binds_user() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).unwrap();

        assert_eq!(
            authenticate(Some(&header(&format!("Bearer {}", token))), &keys),
            Ok(AuthenticatedUserId(user_id))
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(AuthRejection::MissingToken.message(), "access denied, no token");
        assert_eq!(AuthRejection::InvalidFormat.message(), "invalid token format");
        assert_eq!(AuthRejection::InvalidToken.message(), "invalid token");
    }
}
