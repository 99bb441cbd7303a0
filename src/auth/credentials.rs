use sqlx::SqlitePool;

use super::password;
use crate::database::manager::is_unique_violation;
use crate::database::{DatabaseError, User};

/// Username/password records in the `user` table
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, password_hash, role, created_at FROM "user" WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// True only if the user exists and the password matches its stored hash
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, DatabaseError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(false);
        };

        // Argon2 is deliberately slow; keep it off the async workers
        let password = password.to_owned();
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&password, &user.password_hash)
        })
        .await?;

        Ok(matches)
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<User, DatabaseError> {
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await?
            .map_err(|e| DatabaseError::PasswordHash(e.to_string()))?;

        sqlx::query_as::<_, User>(
            r#"INSERT INTO "user" (username, password_hash, role) VALUES (?, ?, ?)
               RETURNING id, username, password_hash, role, created_at"#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::Conflict(format!("User '{}' already exists", username))
            } else {
                DatabaseError::Sqlx(e)
            }
        })
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(1) FROM "user""#)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
