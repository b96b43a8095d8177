//! Authentication building blocks for the library catalog.
//!
//! - Password hashing (Argon2id)
//! - Signed, time-bound access and refresh tokens (HS256 JWT)
//!
//! The service crate owns its own domain types and adapts these
//! implementations at its edges; nothing here knows about users or books.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Issuing and verifying tokens
//! ```
//! use auth::{TokenIssuer, TokenSubject};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let subject = TokenSubject::new("42", "reader@example.com");
//!
//! let tokens = issuer.issue(&subject).unwrap();
//! let claims = issuer.verify_access(&tokens.access_token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("42"));
//!
//! // A refresh token is never accepted where an access token is expected.
//! assert!(issuer.verify_access(&tokens.refresh_token).is_err());
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

pub use issuer::IssuedTokens;
pub use issuer::TokenIssuer;
pub use issuer::TokenLifetimes;
pub use issuer::TokenSubject;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
