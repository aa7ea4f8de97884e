use crate::models::{ContactInfo, Item, ItemType, NewItem};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the items table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub date: Date,
    #[sea_orm(column_name = "type")]
    pub item_type: ItemType,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub claim_requirements: Json, // JSONB array of strings
    pub reward: Option<String>,
    pub user_email: String,
    pub contact_info: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Item {
    fn from(model: Model) -> Self {
        let claim_requirements: Vec<String> =
            match serde_json::from_value(model.claim_requirements) {
                Ok(requirements) => requirements,
                Err(e) => {
                    tracing::warn!(item_id = %model.id, error = %e, "Malformed claim_requirements column, reading as empty");
                    Vec::new()
                }
            };
        let contact_info: Option<ContactInfo> =
            model
                .contact_info
                .and_then(|value| match serde_json::from_value(value) {
                    Ok(info) => Some(info),
                    Err(e) => {
                        tracing::warn!(item_id = %model.id, error = %e, "Malformed contact_info column, dropping it");
                        None
                    }
                });

        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            location: model.location,
            date: model.date,
            item_type: model.item_type,
            image_url: model.image_url,
            claim_requirements,
            reward: model.reward,
            user_email: model.user_email,
            contact_info,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewItem> for ActiveModel {
    fn from(input: NewItem) -> Self {
        let contact_info = input.contact_info.map(|info| {
            serde_json::json!({
                "name": info.name,
                "department": info.department,
            })
        });

        ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            date: Set(input.date),
            item_type: Set(input.item_type),
            image_url: Set(input.image_url),
            claim_requirements: Set(Json::from(input.claim_requirements)),
            reward: Set(input.reward),
            user_email: Set(input.user_email),
            contact_info: Set(contact_info),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
