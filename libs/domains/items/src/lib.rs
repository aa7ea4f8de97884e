//! Items Domain
//!
//! Lost and found reports: create (with an optional photo), list, search and
//! delete. Retrieval of an item is recorded by deleting its report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (multipart create, search, admin retrieve)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │────►│ ImageStore  │  ← photo bytes (local dir / memory)
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Item, DTOs, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_items::{ItemService, LocalImageStore, PgItemRepository, handlers};
//! use std::sync::Arc;
//!
//! let images = Arc::new(LocalImageStore::new("./data/item-images", "/images"));
//! let service = ItemService::new(PgItemRepository::new(db), images);
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{
    Actor, ContactDetails, ContactInfo, CreateItem, CreateItemRequest, ImageUpload, Item,
    ItemFilter, ItemStats, ItemType, NewItem, SearchParams, UploadedImage,
};
pub use postgres::PgItemRepository;
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::ItemService;
pub use storage::{
    DEFAULT_MAX_IMAGE_BYTES, ImageStore, ImageStoreConfig, InMemoryImageStore, LocalImageStore,
    StorageError, generate_key,
};
