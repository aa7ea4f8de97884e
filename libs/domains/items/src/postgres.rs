use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{Item, ItemFilter, ItemStats, ItemType, NewItem},
    repository::ItemRepository,
};

/// Escape `LIKE` wildcards so the query is matched literally.
/// Postgres uses `\` as the default escape character.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn newest_first(query: Select<entity::Entity>) -> Select<entity::Entity> {
    query
        .order_by_desc(entity::Column::CreatedAt)
        .order_by_desc(entity::Column::Id)
}

pub struct PgItemRepository {
    db: DatabaseConnection,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn count_type(&self, item_type: ItemType) -> ItemResult<u64> {
        entity::Entity::find()
            .filter(entity::Column::ItemType.eq(item_type))
            .count(&self.db)
            .await
            .map_err(|e| ItemError::Query(e.to_string()))
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    #[instrument(skip(self, input), fields(item_type = %input.item_type))]
    async fn insert(&self, input: NewItem) -> ItemResult<Item> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| ItemError::Persistence(e.to_string()))?;

        tracing::debug!(item_id = %model.id, "Inserted item row");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ItemResult<Option<Item>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ItemError::Query(e.to_string()))?;

        Ok(model.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let mut query = entity::Entity::find();

        if let Some(item_type) = filter.item_type {
            query = query.filter(entity::Column::ItemType.eq(item_type));
        }

        query = newest_first(query);

        if let Some(limit) = filter.limit {
            query = query.limit(limit as u64);
        }

        let models = query
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Query(e.to_string()))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> ItemResult<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(query));

        let matches_any = Condition::any()
            .add(Expr::col(entity::Column::Title).ilike(pattern.as_str()))
            .add(Expr::col(entity::Column::Description).ilike(pattern.as_str()))
            .add(Expr::col(entity::Column::Location).ilike(pattern.as_str()));

        let models = newest_first(entity::Entity::find().filter(matches_any))
            .all(&self.db)
            .await
            .map_err(|e| ItemError::Query(e.to_string()))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ItemResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ItemError::Delete(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> ItemResult<ItemStats> {
        let lost = self.count_type(ItemType::Lost).await?;
        let found = self.count_type(ItemType::Found).await?;

        Ok(ItemStats {
            total: lost + found,
            lost,
            found,
        })
    }
}
