use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entity,
    error::{AccountError, AccountResult},
    models::{Account, NewAccount},
    repository::AccountRepository,
};

fn database_error(err: DbErr) -> AccountError {
    AccountError::Database(err.to_string())
}

pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: NewAccount) -> AccountResult<Account> {
        let email = input.email.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::DuplicateEmail(email),
                _ => database_error(e),
            }
        })?;

        tracing::debug!(account_id = %model.id, "Inserted account row");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(model.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> AccountResult<Option<Account>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(database_error)?;

        Ok(model.map(Into::into))
    }
}
