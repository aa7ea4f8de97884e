use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{Item, ItemFilter, ItemStats, ItemType, NewItem};

/// Repository trait for Item persistence
///
/// Every listing (`list`, `search`) is ordered newest first by
/// `(created_at, id)`, so the order is total even when two reports share a
/// timestamp.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a report and return it with its assigned `id` and `created_at`
    async fn insert(&self, input: NewItem) -> ItemResult<Item>;

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>>;

    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>>;

    /// Case-insensitive substring search over title, description and location.
    /// `query` is matched literally and is never blank.
    async fn search(&self, query: &str) -> ItemResult<Vec<Item>>;

    /// Delete a report. Returns `false` when no row had that id.
    async fn delete(&self, id: Uuid) -> ItemResult<bool>;

    async fn stats(&self) -> ItemResult<ItemStats>;
}

/// In-memory implementation for tests and local development
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut items: Vec<Item>) -> Vec<Item> {
        items.sort_by_key(|item| Reverse((item.created_at, item.id)));
        items
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, input: NewItem) -> ItemResult<Item> {
        let item = Item {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            location: input.location,
            date: input.date,
            item_type: input.item_type,
            image_url: input.image_url,
            claim_requirements: input.claim_requirements,
            reward: input.reward,
            user_email: input.user_email,
            contact_info: input.contact_info,
            created_at: chrono::Utc::now(),
        };

        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        let selected = items
            .values()
            .filter(|item| filter.item_type.is_none_or(|t| item.item_type == t))
            .cloned()
            .collect();

        let mut ordered = Self::newest_first(selected);
        if let Some(limit) = filter.limit {
            ordered.truncate(limit);
        }
        Ok(ordered)
    }

    async fn search(&self, query: &str) -> ItemResult<Vec<Item>> {
        let needle = query.to_lowercase();
        let items = self.items.read().await;
        let matching = items
            .values()
            .filter(|item| item.matches(&needle))
            .cloned()
            .collect();

        Ok(Self::newest_first(matching))
    }

    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let mut items = self.items.write().await;
        Ok(items.remove(&id).is_some())
    }

    async fn stats(&self) -> ItemResult<ItemStats> {
        let items = self.items.read().await;
        let lost = items
            .values()
            .filter(|item| item.item_type == ItemType::Lost)
            .count() as u64;
        let total = items.len() as u64;

        Ok(ItemStats {
            total,
            lost,
            found: total - lost,
        })
    }
}
