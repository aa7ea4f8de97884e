use crate::models::{Account, NewAccount, Role};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the accounts table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub roles: Json, // JSONB array of role names
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        // Unknown role names are skipped rather than failing the whole row
        let roles: Vec<Role> = serde_json::from_value::<Vec<String>>(model.roles)
            .unwrap_or_default()
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();

        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            roles: if roles.is_empty() { vec![Role::User] } else { roles },
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewAccount> for ActiveModel {
    fn from(input: NewAccount) -> Self {
        let roles: Vec<String> = input.roles.iter().map(Role::to_string).collect();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            roles: Set(Json::from(roles)),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
