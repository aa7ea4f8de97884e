//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{
    Actor, ContactDetails, CreateItem, ImageUpload, Item, ItemFilter, ItemStats, UploadedImage,
};
use crate::repository::ItemRepository;
use crate::storage::{DEFAULT_MAX_IMAGE_BYTES, ImageStore, generate_key};

/// Item service: validation, ownership rules and the upload/insert pairing.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    images: Arc<dyn ImageStore>,
    max_image_bytes: usize,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R, images: Arc<dyn ImageStore>) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Store a photo and return its public URL
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    pub async fn upload_image(&self, upload: ImageUpload) -> ItemResult<UploadedImage> {
        if upload.bytes.is_empty() {
            return Err(ItemError::InvalidInput("Image is empty".to_string()));
        }
        if upload.bytes.len() > self.max_image_bytes {
            return Err(ItemError::InvalidInput(format!(
                "Image exceeds the {} byte limit",
                self.max_image_bytes
            )));
        }

        let key = generate_key(&upload.filename);
        let url = self.images.put(&key, upload.bytes).await?;

        tracing::info!(key = %key, "Uploaded item image");
        Ok(UploadedImage { url })
    }

    /// Create a report, uploading its photo first when one is attached.
    ///
    /// A failed upload aborts before anything is written. A failed insert
    /// removes the photo that was just stored.
    #[instrument(skip(self, input, image), fields(item_type = %input.item_type, has_image = image.is_some()))]
    pub async fn create_item(&self, input: CreateItem, image: Option<ImageUpload>) -> ItemResult<Item> {
        input.validate()?;

        let image_url = match image {
            Some(upload) => Some(self.upload_image(upload).await?.url),
            None => None,
        };

        let new_item = input.into_new_item(image_url.clone().unwrap_or_default());

        match self.repository.insert(new_item).await {
            Ok(item) => {
                tracing::info!(item_id = %item.id, "Created item");
                Ok(item)
            }
            Err(err) => {
                if let Some(url) = image_url {
                    self.discard_image(&url).await;
                }
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    /// Newest first, optionally narrowed to one report type
    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        self.repository.list(filter).await
    }

    /// Text search. A blank query lists everything instead.
    #[instrument(skip(self))]
    pub async fn search_items(&self, query: &str) -> ItemResult<Vec<Item>> {
        if query.trim().is_empty() {
            return self.list_items(ItemFilter::default()).await;
        }

        self.repository.search(query).await
    }

    /// Delete a report. Only its reporter or an admin may do this.
    #[instrument(skip(self, actor), fields(actor = %actor.email))]
    pub async fn delete_item(&self, id: Uuid, actor: &Actor) -> ItemResult<()> {
        let item = self.find_for_removal(id).await?;

        if !actor.admin && !actor.owns(&item) {
            return Err(ItemError::Forbidden(
                "Only the reporter or an administrator can delete this item".to_string(),
            ));
        }

        self.remove(item).await
    }

    /// The item was handed back. Retrieval is recorded by deleting the report.
    #[instrument(skip(self, actor), fields(actor = %actor.email))]
    pub async fn mark_retrieved(&self, id: Uuid, actor: &Actor) -> ItemResult<()> {
        if !actor.admin {
            return Err(ItemError::Forbidden(
                "Only administrators can mark items as retrieved".to_string(),
            ));
        }

        let item = self.find_for_removal(id).await?;
        self.remove(item).await
    }

    #[instrument(skip(self))]
    pub async fn item_stats(&self) -> ItemResult<ItemStats> {
        self.repository.stats().await
    }

    /// Recipient and subject line for messaging the reporter
    #[instrument(skip(self))]
    pub async fn contact_for(&self, id: Uuid) -> ItemResult<ContactDetails> {
        Ok(self.get_item(id).await?.contact_details())
    }

    /// Lookup ahead of a delete; storage failures count as failed deletes
    async fn find_for_removal(&self, id: Uuid) -> ItemResult<Item> {
        match self.repository.get_by_id(id).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => Err(ItemError::NotFound(id)),
            Err(e) => Err(ItemError::Delete(e.to_string())),
        }
    }

    async fn remove(&self, item: Item) -> ItemResult<()> {
        // A concurrent delete may win between the lookup and here
        if !self.repository.delete(item.id).await? {
            return Err(ItemError::NotFound(item.id));
        }

        tracing::info!(item_id = %item.id, "Deleted item");

        if !item.image_url.is_empty() {
            self.discard_image(&item.image_url).await;
        }
        Ok(())
    }

    async fn discard_image(&self, url: &str) {
        let Some(key) = self.images.key_from_url(url) else {
            tracing::debug!(url, "Image URL not managed by this store, leaving it");
            return;
        };

        if let Err(e) = self.images.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove item image");
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
            max_image_bytes: self.max_image_bytes,
        }
    }
}
