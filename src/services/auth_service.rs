use crate::config::AuthConfig;
use crate::domain::auth::{Claims, Password};
use crate::error::{AppError, Result};
use crate::storage::DbPool;
use crate::storage::user_repo::UserRepository;
use opentelemetry::{global, metrics::Counter};
use uuid::Uuid;

#[derive(Clone, Debug)]
struct Metrics {
    registered_total: Counter<u64>,
    login_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ticklist-server");
        Self {
            registered_total: meter
                .u64_counter("users_registered_total")
                .with_description("Total number of successful registrations")
                .build(),
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Total number of successful login attempts")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
    pool: DbPool,
    user_repo: UserRepository,
    metrics: Metrics,
}

impl AuthService {
    #[must_use]
    pub fn new(config: AuthConfig, pool: DbPool, user_repo: UserRepository) -> Self {
        Self { config, pool, user_repo, metrics: Metrics::new() }
    }

    #[tracing::instrument(
        skip(self, username, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        validate_credentials(username, password)?;

        let password_hash = self.hash_password(password).await?;

        let user = self.user_repo.create(&self.pool, username, &password_hash).await.map_err(|e| {
            if let AppError::Database(sqlx::Error::Database(db_err)) = &e
                && db_err.code().as_deref() == Some("23505")
            {
                return AppError::Conflict("user already exists".into());
            }
            e
        })?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::info!("User registered");
        self.metrics.registered_total.add(1, &[]);
        Ok(())
    }

    /// Authenticates the user and issues a short-lived access token.
    ///
    /// An unknown username and a wrong password produce the same error, so
    /// callers cannot probe which usernames exist.
    #[tracing::instrument(
        skip(self, username, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        validate_credentials(username, password)?;

        let user = match self.user_repo.find_by_username(&self.pool, username).await? {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: user not found");
                return Err(AppError::Auth);
            }
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        let is_valid = self.verify_password(password, &user.password_hash).await?;

        if !is_valid {
            tracing::warn!("Login failed: invalid password");
            return Err(AppError::Auth);
        }

        let token = self.issue_token(user.id)?;
        self.metrics.login_total.add(1, &[]);
        Ok(token)
    }

    #[tracing::instrument(err, skip(self, password))]
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || Password::hash(&password))
            .await
            .map_err(|_| AppError::Internal)?
    }

    #[tracing::instrument(err, skip(self, password, password_hash))]
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || Password::verify(&password, &password_hash))
            .await
            .map_err(|_| AppError::Internal)?
    }

    /// Verifies an access token and returns the user id (subject).
    pub fn verify_token(&self, token: &str) -> Result<Uuid> {
        Claims::decode(token, &self.config.jwt_secret).map(|claims| claims.sub)
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String> {
        Claims::new(user_id, self.config.access_token_ttl_secs).encode(&self.config.jwt_secret)
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".into()));
    }
    Ok(())
}
