use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenType;

/// Identity a token pair is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: String,
    pub email: String,
}

impl TokenSubject {
    pub fn new(user_id: impl ToString, email: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
        }
    }
}

/// Lifetimes applied to newly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::hours(24),
            refresh: Duration::days(7),
        }
    }
}

/// Result of a successful issue.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry of the access token
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies self-contained signed tokens.
///
/// Verification needs nothing but the signing secret: no store lookup, no
/// revocation list. A token stays valid until its `exp` even if the user it
/// names changes afterwards.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    /// Create an issuer with the default lifetimes (24h access, 7d refresh).
    ///
    /// # Arguments
    /// * `secret` - Secret key for JWT signing
    pub fn new(secret: &[u8]) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            lifetimes: TokenLifetimes::default(),
        }
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    /// Issue an access/refresh pair for `subject`, starting now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedTokens, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue an access/refresh pair for `subject` as of `issued_at`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedTokens, JwtError> {
        let access_claims = Claims::for_user(
            &subject.user_id,
            TokenType::Access,
            issued_at,
            self.lifetimes.access,
        )
        .with_email(&subject.email);

        let refresh_claims = Claims::for_user(
            &subject.user_id,
            TokenType::Refresh,
            issued_at,
            self.lifetimes.refresh,
        )
        .with_token_id(Uuid::new_v4());

        Ok(IssuedTokens {
            access_token: self.jwt_handler.encode(&access_claims)?,
            refresh_token: self.jwt_handler.encode(&refresh_claims)?,
            expires_at: issued_at + self.lifetimes.access,
        })
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Past its expiry
    /// * `WrongTokenType` - A refresh token (or untyped token) was presented
    /// * any other `JwtError` - Malformed or not signed by this issuer
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(token, TokenType::Access)
    }

    /// Validate a token of the `expected` type and return its claims.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.token_type != Some(expected) {
            return Err(JwtError::WrongTokenType {
                expected: expected.to_string(),
            });
        }

        Ok(claims)
    }
}
