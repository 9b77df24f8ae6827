use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    auth::repo_types::{NewUser, UniqueField, UserCredentials},
    db::{ConnectionError, ConnectionProvider},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// `None` when the driver did not name a constraint we know.
    #[error("unique constraint violated")]
    UniqueViolation(Option<UniqueField>),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Persistence for the `user` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError>;
    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserCredentials>, StoreError>;
}

/// Classifies a driver error using the structured error kind, not its message text.
pub(crate) fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = db_err.constraint().and_then(UniqueField::from_constraint);
            return StoreError::UniqueViolation(field);
        }
    }
    StoreError::Database(err)
}

pub struct PgUserStore {
    db: ConnectionProvider,
}

impl PgUserStore {
    pub fn new(db: ConnectionProvider) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO "user" (username, first_name, second_name, last_name, email, password, date_of_birth, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.second_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.date_of_birth)
        .bind(&user.gender)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {
                tx.commit().await.map_err(classify)?;
                debug!(username = %user.username, "user row committed");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback after failed insert");
                }
                Err(classify(e))
            }
        }
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let mut conn = self.db.acquire().await?;
        sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT username, email, password
            FROM "user"
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
        .map_err(classify)
    }
}
