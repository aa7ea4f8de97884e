use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Rejects strings that are empty once surrounding whitespace is removed
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Whether the report is about something lost or something found
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_type")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemType {
    #[sea_orm(string_value = "lost")]
    Lost,
    #[sea_orm(string_value = "found")]
    Found,
}

/// Display override for the reporter's contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
}

/// A persisted lost-or-found report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Day the item was lost or found
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Public URL of the photo, empty when the report has none
    pub image_url: String,
    /// Conditions a claimant must meet, usually set on found items
    pub claim_requirements: Vec<String>,
    /// Offered reward, usually set on lost items
    pub reward: Option<String>,
    pub user_email: String,
    pub contact_info: Option<ContactInfo>,
    pub created_at: DateTime<Utc>,
}

/// A report ready to be written, with the owner already resolved
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
    pub description: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub location: String,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub claim_requirements: Vec<String>,
    pub reward: Option<String>,
    #[validate(email)]
    pub user_email: String,
    pub contact_info: Option<ContactInfo>,
}

/// Body of the `item` part of a create request. The owner comes from the session.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub claim_requirements: Vec<String>,
    pub reward: Option<String>,
    pub contact_info: Option<ContactInfo>,
}

impl CreateItemRequest {
    pub fn into_create(self, user_email: impl Into<String>) -> CreateItem {
        CreateItem {
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            item_type: self.item_type,
            claim_requirements: self.claim_requirements,
            reward: self.reward,
            user_email: user_email.into(),
            contact_info: self.contact_info,
        }
    }
}

/// Normalized record handed to the repository. `id` and `created_at` are
/// assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub item_type: ItemType,
    pub image_url: String,
    pub claim_requirements: Vec<String>,
    pub reward: Option<String>,
    pub user_email: String,
    pub contact_info: Option<ContactInfo>,
}

impl CreateItem {
    /// Drops blank claim requirements. Everything else is kept as submitted.
    pub fn into_new_item(self, image_url: String) -> NewItem {
        let claim_requirements = self
            .claim_requirements
            .into_iter()
            .filter(|req| !req.trim().is_empty())
            .collect();

        NewItem {
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date,
            item_type: self.item_type,
            image_url,
            claim_requirements,
            reward: self.reward,
            user_email: self.user_email,
            contact_info: self.contact_info,
        }
    }
}

/// Query filters for listing items
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemFilter {
    /// Only return reports of this type
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    /// Return at most this many of the most recent reports
    pub limit: Option<usize>,
}

impl ItemFilter {
    pub fn of_type(item_type: ItemType) -> Self {
        Self {
            item_type: Some(item_type),
            limit: None,
        }
    }

    pub fn recent(limit: usize) -> Self {
        Self {
            item_type: None,
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive text matched against title, description and location
    #[serde(default)]
    pub q: String,
}

/// Counts for the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemStats {
    pub total: u64,
    pub lost: u64,
    pub found: u64,
}

/// Where to send a message about an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactDetails {
    pub to: String,
    pub subject: String,
}

impl Item {
    pub fn contact_details(&self) -> ContactDetails {
        let to = self
            .contact_info
            .as_ref()
            .map(|info| info.department.trim())
            .filter(|department| !department.is_empty())
            .unwrap_or(&self.user_email)
            .to_string();

        ContactDetails {
            to,
            subject: format!("Regarding your {} item: {}", self.item_type, self.title),
        }
    }

    /// Case-insensitive substring match over title, description and location
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        [&self.title, &self.description, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// Raw photo received from a client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
}

/// The signed-in caller as seen by ownership checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub email: String,
    pub admin: bool,
}

impl Actor {
    pub fn new(email: impl Into<String>, admin: bool) -> Self {
        Self {
            email: email.into(),
            admin,
        }
    }

    pub fn owns(&self, item: &Item) -> bool {
        self.email.eq_ignore_ascii_case(&item.user_email)
    }
}

impl From<&axum_helpers::JwtClaims> for Actor {
    fn from(claims: &axum_helpers::JwtClaims) -> Self {
        Self::new(claims.email.clone(), claims.is_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(item_type: ItemType) -> CreateItem {
        CreateItem {
            title: "Blue Backpack".into(),
            description: "Navy with a keychain".into(),
            location: "Library".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            item_type,
            claim_requirements: vec!["Describe the keychain".into(), "  ".into(), String::new()],
            reward: Some("$20".into()),
            user_email: "a@x.com".into(),
            contact_info: None,
        }
    }

    fn item(contact_info: Option<ContactInfo>) -> Item {
        Item {
            id: Uuid::now_v7(),
            title: "Blue Backpack".into(),
            description: "Navy".into(),
            location: "Library".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            item_type: ItemType::Lost,
            image_url: String::new(),
            claim_requirements: vec![],
            reward: None,
            user_email: "a@x.com".into(),
            contact_info,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_found_item_keeps_non_blank_requirements_and_reward() {
        let new_item = create(ItemType::Found).into_new_item(String::new());
        assert_eq!(new_item.claim_requirements, vec!["Describe the keychain"]);
        assert_eq!(new_item.reward.as_deref(), Some("$20"));
    }

    #[test]
    fn test_lost_item_keeps_reward_and_requirements() {
        let new_item = create(ItemType::Lost).into_new_item("/images/a.png".into());
        assert_eq!(new_item.claim_requirements, vec!["Describe the keychain"]);
        assert_eq!(new_item.reward.as_deref(), Some("$20"));
        assert_eq!(new_item.image_url, "/images/a.png");
    }

    #[test]
    fn test_reward_is_not_rewritten() {
        let mut input = create(ItemType::Lost);
        input.reward = Some("  ".into());
        assert_eq!(input.into_new_item(String::new()).reward.as_deref(), Some("  "));
    }

    #[test]
    fn test_blank_fields_fail_validation() {
        let mut input = create(ItemType::Lost);
        input.title = "   ".into();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let mut input = create(ItemType::Lost);
        input.user_email = "not-an-email".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_type_serializes_lowercase_under_type_key() {
        let json = serde_json::to_value(item(None)).unwrap();
        assert_eq!(json["type"], "lost");
        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("item_type").is_none());
    }

    #[test]
    fn test_contact_prefers_department() {
        let details = item(Some(ContactInfo {
            name: "Front desk".into(),
            department: "desk@campus.edu".into(),
        }))
        .contact_details();
        assert_eq!(details.to, "desk@campus.edu");
        assert_eq!(details.subject, "Regarding your lost item: Blue Backpack");
    }

    #[test]
    fn test_contact_falls_back_to_reporter_email() {
        let details = item(Some(ContactInfo {
            name: "Front desk".into(),
            department: "  ".into(),
        }))
        .contact_details();
        assert_eq!(details.to, "a@x.com");
        assert_eq!(item(None).contact_details().to, "a@x.com");
    }

    #[test]
    fn test_actor_ownership_ignores_case() {
        let item = item(None);
        assert!(Actor::new("A@X.com", false).owns(&item));
        assert!(!Actor::new("b@x.com", false).owns(&item));
    }
}
