//! User queries.
//!
//! Rows are read into [`UserRow`] and converted into the domain [`User`],
//! revalidating the email, role and payment method on the way out.

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use prostore_core::{Email, PaymentMethod, ShippingAddress, UserId, UserRole};

use super::{PgStore, RepositoryError, UserRepository, conflict_on_unique};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str =
    "id, name, email, role, address, payment_method, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    role: String,
    address: Option<Json<ShippingAddress>>,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<UserRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;
        let payment_method = row
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            role,
            address: row.address.map(|Json(address)| address),
            payment_method,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgStore {
    async fn update_user_column<T>(
        &self,
        id: UserId,
        column: &str,
        value: T,
    ) -> Result<(), RepositoryError>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send,
    {
        let result = sqlx::query(&format!(
            "UPDATE storefront.user SET {column} = $2, updated_at = now() WHERE id = $1"
        ))
        .bind(id)
        .bind(value)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl UserRepository for PgStore {
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM storefront.user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM storefront.user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM storefront.user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO storefront.user (id, name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(UserId::generate())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(conflict_on_unique("email"))?;

        User::try_from(row)
    }

    async fn update_user_name(&self, id: UserId, name: &str) -> Result<(), RepositoryError> {
        self.update_user_column(id, "name", name.to_owned()).await
    }

    async fn update_user_address(
        &self,
        id: UserId,
        address: &ShippingAddress,
    ) -> Result<(), RepositoryError> {
        self.update_user_column(id, "address", Json(address.clone()))
            .await
    }

    async fn update_user_payment_method(
        &self,
        id: UserId,
        method: PaymentMethod,
    ) -> Result<(), RepositoryError> {
        self.update_user_column(id, "payment_method", method.as_str())
            .await
    }

    async fn set_user_role(&self, email: &Email, role: UserRole) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE storefront.user SET role = $2, updated_at = now() WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(role.as_str())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
