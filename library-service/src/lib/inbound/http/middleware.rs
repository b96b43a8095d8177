use auth::JwtError;
use auth::TokenIssuer;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Identity attached to request extensions once a bearer token checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Why a protected request was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    MalformedToken(String),
    ExpiredToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::MissingToken => "Missing Authorization header",
            AuthRejection::MalformedToken(_) => "Invalid token",
            AuthRejection::ExpiredToken => "Token expired",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Work out who is calling from the `Authorization` header alone.
///
/// Nothing is looked up: a signed, unexpired access token is the whole proof.
pub fn resolve_identity(
    issuer: &TokenIssuer,
    header: Option<&HeaderValue>,
) -> Result<AuthenticatedUser, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingToken)?;

    let value = header
        .to_str()
        .map_err(|_| AuthRejection::MalformedToken("header is not valid UTF-8".to_string()))?;

    // Auth schemes are case-insensitive
    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => token.trim(),
        _ => {
            return Err(AuthRejection::MalformedToken(
                "expected Bearer scheme".to_string(),
            ))
        }
    };

    if token.is_empty() {
        return Err(AuthRejection::MalformedToken("empty token".to_string()));
    }

    let claims = issuer.verify_access(token).map_err(|e| match e {
        JwtError::TokenExpired => AuthRejection::ExpiredToken,
        other => AuthRejection::MalformedToken(other.to_string()),
    })?;

    let sub = claims
        .sub
        .ok_or_else(|| AuthRejection::MalformedToken("missing subject".to_string()))?;
    let user_id =
        UserId::from_string(&sub).map_err(|e| AuthRejection::MalformedToken(e.to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email.unwrap_or_default(),
    })
}

/// Middleware guarding the write routes of the catalog.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = resolve_identity(&state.token_issuer, req.headers().get(AUTHORIZATION))
        .map_err(|rejection| {
            match &rejection {
                AuthRejection::MissingToken => {
                    tracing::debug!(uri = %req.uri(), "Request without bearer token")
                }
                AuthRejection::MalformedToken(reason) => {
                    tracing::warn!(uri = %req.uri(), reason = %reason, "Rejected malformed token")
                }
                AuthRejection::ExpiredToken => {
                    tracing::debug!(uri = %req.uri(), "Rejected expired token")
                }
            }
            rejection
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use auth::TokenSubject;
    use chrono::Duration;
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"middleware-test-secret-at-least-32-bytes";

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[test]
    fn test_no_header_is_missing_token() {
        let issuer = TokenIssuer::new(SECRET);
        assert_eq!(
            resolve_identity(&issuer, None),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_valid_access_token() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer.issue(&TokenSubject::new(7, "a@x.com")).unwrap();

        let identity = resolve_identity(&issuer, Some(&bearer(&tokens.access_token))).unwrap();

        assert_eq!(identity.user_id, UserId(7));
        assert_eq!(identity.email, "a@x.com");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer.issue(&TokenSubject::new(7, "a@x.com")).unwrap();

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let header =
                HeaderValue::from_str(&format!("{} {}", scheme, tokens.access_token)).unwrap();
            let identity = resolve_identity(&issuer, Some(&header)).unwrap();
            assert_eq!(identity.user_id, UserId(7));
        }
    }

    #[test]
    fn test_wrong_scheme_is_malformed() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer.issue(&TokenSubject::new(7, "a@x.com")).unwrap();
        let header = HeaderValue::from_str(&format!("Token {}", tokens.access_token)).unwrap();

        assert!(matches!(
            resolve_identity(&issuer, Some(&header)),
            Err(AuthRejection::MalformedToken(_))
        ));
    }

    #[test]
    fn test_empty_and_garbage_tokens_are_malformed() {
        let issuer = TokenIssuer::new(SECRET);

        for header in [
            HeaderValue::from_static("Bearer "),
            HeaderValue::from_static("Bearer"),
            HeaderValue::from_static("Bearer not.a.jwt"),
            HeaderValue::from_bytes(b"Bearer \xff").unwrap(),
        ] {
            assert!(matches!(
                resolve_identity(&issuer, Some(&header)),
                Err(AuthRejection::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn test_expired_token() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer
            .issue_at(
                &TokenSubject::new(7, "a@x.com"),
                Utc::now() - Duration::hours(25),
            )
            .unwrap();

        assert_eq!(
            resolve_identity(&issuer, Some(&bearer(&tokens.access_token))),
            Err(AuthRejection::ExpiredToken)
        );
    }

    #[test]
    fn test_refresh_token_is_not_a_bearer_token() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer.issue(&TokenSubject::new(7, "a@x.com")).unwrap();

        assert!(matches!(
            resolve_identity(&issuer, Some(&bearer(&tokens.refresh_token))),
            Err(AuthRejection::MalformedToken(_))
        ));
    }

    #[test]
    fn test_foreign_signature_is_malformed() {
        let issuer = TokenIssuer::new(SECRET);
        let other = TokenIssuer::new(b"some-other-secret-also-32-bytes-long!!");
        let tokens = other.issue(&TokenSubject::new(7, "a@x.com")).unwrap();

        assert!(matches!(
            resolve_identity(&issuer, Some(&bearer(&tokens.access_token))),
            Err(AuthRejection::MalformedToken(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_is_malformed() {
        let issuer = TokenIssuer::new(SECRET);
        let tokens = issuer
            .issue(&TokenSubject::new("not-a-number", "a@x.com"))
            .unwrap();

        assert!(matches!(
            resolve_identity(&issuer, Some(&bearer(&tokens.access_token))),
            Err(AuthRejection::MalformedToken(_))
        ));
    }
}
