use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};

use super::domain::Claims;
use super::errors::AuthError;

/// Number of random bytes behind each refresh token (hex-encoded on the wire).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    max_ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, issuer: impl Into<String>, max_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            max_ttl,
        }
    }

    /// Requested lifetime in seconds, clamped to `(0, max_ttl]`; absent or
    /// non-positive requests get `max_ttl`.
    pub fn clamp_ttl(&self, requested_secs: Option<i64>) -> Duration {
        match requested_secs {
            Some(secs) if secs > 0 && secs <= self.max_ttl.num_seconds() => Duration::seconds(secs),
            _ => self.max_ttl,
        }
    }

    pub fn issue(&self, user_id: u64, requested_secs: Option<i64>) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.clamp_ttl(requested_secs)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Verify signature, issuer and expiry and return the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token rejected");
                AuthError::unauthorized("invalid or expired token")
            })
    }

    /// Verify the token and parse its subject as a user ID.
    pub fn validate(&self, token: &str) -> Result<u64, AuthError> {
        let claims = self.decode(token)?;
        claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::unauthorized("token subject is not a user id"))
    }
}

/// Generate an opaque refresh token: 32 bytes from the OS RNG, hex-encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", "chirpy", Duration::hours(1))
    }

    #[test]
    fn ttl_defaults_and_clamps_to_max() {
        let s = signer();
        assert_eq!(s.clamp_ttl(None), Duration::hours(1));
        assert_eq!(s.clamp_ttl(Some(0)), Duration::hours(1));
        assert_eq!(s.clamp_ttl(Some(-5)), Duration::hours(1));
        assert_eq!(s.clamp_ttl(Some(7200)), Duration::hours(1));
        assert_eq!(s.clamp_ttl(Some(60)), Duration::seconds(60));
    }

    #[test]
    fn issued_token_carries_claims() {
        let s = signer();
        let token = s.issue(42, Some(0)).unwrap();
        let claims = s.decode(&token).unwrap();
        assert_eq!(claims.iss, "chirpy");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(s.validate(&token).unwrap(), 42);
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = signer().issue(1, None).unwrap();
        let other = TokenSigner::new("other-secret", "chirpy", Duration::hours(1));
        assert!(matches!(other.validate(&token), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let s = signer();
        let now = Utc::now().timestamp();
        let claims = Claims { iss: "chirpy".into(), sub: "1".into(), iat: now - 120, exp: now - 60 };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();
        assert!(matches!(s.validate(&token), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn non_numeric_subject_is_unauthorized() {
        let s = signer();
        let now = Utc::now().timestamp();
        let claims = Claims { iss: "chirpy".into(), sub: "alice".into(), iat: now, exp: now + 60 };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();
        assert!(matches!(s.validate(&token), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn garbage_is_unauthorized() {
        assert!(matches!(signer().validate("not.a.jwt"), Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn refresh_tokens_are_64_hex_chars_and_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_eq!(a.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
