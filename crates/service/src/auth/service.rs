use std::sync::Arc;

use chrono::{Duration, Utc};
use models::RefreshToken;
use tracing::{debug, info, instrument, warn};

use super::domain::{LoginInput, LoginSession};
use super::errors::AuthError;
use super::password;
use super::tokens::{generate_refresh_token, TokenSigner};
use crate::errors::ServiceError;
use crate::store::ChirpyStore;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_token_max_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// argon2 time cost
    pub password_cost: u32,
}

impl AuthConfig {
    /// Defaults: issuer `chirpy`, 1 h access tokens, 60 h refresh tokens, time cost 1.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: "chirpy".into(),
            access_token_max_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::hours(60),
            password_cost: 1,
        }
    }
}

/// Credential service independent of web framework: password hashing,
/// access tokens and refresh tokens.
pub struct AuthService {
    store: Arc<dyn ChirpyStore>,
    signer: TokenSigner,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn ChirpyStore>, cfg: AuthConfig) -> Self {
        let signer = TokenSigner::new(&cfg.jwt_secret, cfg.issuer.clone(), cfg.access_token_max_ttl);
        Self { store, signer, cfg }
    }

    pub fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        password::hash_password(plain, self.cfg.password_cost)
    }

    pub fn verify_password(&self, hash: &str, plain: &str) -> bool {
        password::verify_password(hash, plain)
    }

    pub fn issue_access_token(&self, user_id: u64, requested_secs: Option<i64>) -> Result<String, AuthError> {
        self.signer.issue(user_id, requested_secs)
    }

    /// Returns the user ID carried by a valid access token.
    pub fn validate_access_token(&self, token: &str) -> Result<u64, AuthError> {
        self.signer.validate(token)
    }

    #[instrument(skip(self))]
    pub async fn issue_refresh_token(&self, user_id: u64) -> Result<RefreshToken, AuthError> {
        let token = generate_refresh_token();
        let expires_at = Utc::now() + self.cfg.refresh_token_ttl;
        let record = self.store.create_refresh_token(user_id, &token, expires_at).await?;
        debug!(%expires_at, "refresh token issued");
        Ok(record)
    }

    /// Mint a max-lifetime access token from a refresh token that exists and
    /// has not expired.
    #[instrument(skip_all)]
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let record = match self.store.get_refresh_token(refresh_token).await {
            Ok(record) => record,
            Err(ServiceError::NotFound(_)) => return Err(AuthError::unauthorized("refresh token not found")),
            Err(ServiceError::Expired(_)) => return Err(AuthError::unauthorized("refresh token expired")),
            Err(e) => return Err(e.into()),
        };
        self.signer.issue(record.user_id, None)
    }

    #[instrument(skip_all)]
    pub async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        match self.store.delete_refresh_token(refresh_token).await {
            Ok(()) => {
                info!("refresh_token_revoked");
                Ok(())
            }
            Err(ServiceError::NotFound(_)) => Err(AuthError::unauthorized("refresh token not found")),
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticate a user and issue an access token plus a refresh token.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn demo(svc: &service::auth::AuthService) -> Result<(), service::auth::errors::AuthError> {
    /// use service::auth::domain::LoginInput;
    /// let session = svc
    ///     .login(LoginInput { email: "u@e.com".into(), password: "04234".into(), expires_in_seconds: None })
    ///     .await?;
    /// assert_eq!(session.refresh_token.len(), 64);
    /// # Ok(()) }
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginSession, AuthError> {
        let user = match self.store.get_user_by_email(&input.email).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => return Err(AuthError::unauthorized("incorrect email or password")),
            Err(e) => return Err(e.into()),
        };
        if !self.verify_password(&user.hashed_password, &input.password) {
            return Err(AuthError::unauthorized("incorrect email or password"));
        }

        // 先签发访问令牌，再持久化刷新令牌
        let token = self.issue_access_token(user.id, input.expires_in_seconds)?;
        let refresh = self.issue_refresh_token(user.id).await?;

        let user = match self.store.get_user(user.id).await {
            Ok(user) => user,
            Err(e) => {
                // 补偿：撤回刚写入的刷新令牌
                if let Err(cleanup) = self.store.delete_refresh_token(&refresh.token).await {
                    warn!(error = %cleanup, "failed to discard refresh token after login error");
                }
                return Err(e.into());
            }
        };

        info!(user_id = user.id, "user_logged_in");
        Ok(LoginSession { user, token, refresh_token: refresh.token })
    }
}
