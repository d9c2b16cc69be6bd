use sqlx::PgPool;
use tracing::instrument;

use shelfwise_auth::Role;
use shelfwise_core::{AppError, hash_password, verify_password};
use shelfwise_models::{LoginRequest, RegisterRequest, User, UserId, UserWithPassword};

use crate::metrics;

const USER_COLUMNS: &str = "id, username, email, role, created_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db))]
    pub async fn is_email_available(db: &PgPool, email: &str) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(db)
        .await?;

        Ok(!taken)
    }

    /// Creates an account with a bcrypt-hashed password.
    ///
    /// # Arguments
    ///
    /// * `db` - Database pool
    /// * `role` - Taken from the registration path, not the body
    /// * `dto` - Validated username, email and password
    ///
    /// # Errors
    ///
    /// * `400 Bad Request` with "Email already exists" if the email is taken
    /// * `500 Internal Server Error` if hashing or the insert fails
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(
        db: &PgPool,
        role: Role,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        if !Self::is_email_available(db, &dto.email).await? {
            return Err(AppError::bad_request(anyhow::anyhow!("Email already exists")));
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email already exists"));
            }
            AppError::from(e)
        })?;

        metrics::track_user_registered(role);
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Checks credentials and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns `401 Unauthorized` with the same "Invalid credentials" message
    /// for an unknown email and for a wrong password.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn login_user(db: &PgPool, dto: LoginRequest) -> Result<User, AppError> {
        let found = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await?;

        let Some(found) = found else {
            metrics::track_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        };

        if !verify_password(&dto.password, &found.password)? {
            metrics::track_login_failure("wrong_password");
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        }

        metrics::track_login_success(found.user.role);
        Ok(found.user)
    }

    /// `Ok(None)` when the user no longer exists.
    #[instrument(skip(db))]
    pub async fn find_user_by_id(db: &PgPool, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }
}
