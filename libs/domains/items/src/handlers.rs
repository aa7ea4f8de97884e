use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State, multipart::Field, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, AuthUser, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse, UploadFailedResponse,
    },
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ItemError, ItemResult};
use crate::models::{
    Actor, ContactDetails, ContactInfo, CreateItemRequest, ImageUpload, Item, ItemFilter,
    ItemStats, ItemType, SearchParams, UploadedImage,
};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// Room for the JSON part and multipart framing on top of the image itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_items,
        create_item,
        upload_image,
        search_items,
        item_stats,
        get_item,
        delete_item,
        mark_retrieved,
        contact_item,
    ),
    components(
        schemas(
            Item,
            ItemType,
            ContactInfo,
            CreateItemRequest,
            CreateItemForm,
            ImageForm,
            ItemFilter,
            ItemStats,
            ContactDetails,
            UploadedImage
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            UploadFailedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Lost and found reports")
    )
)]
pub struct ApiDoc;

/// Multipart body of `POST /items`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateItemForm {
    /// JSON-encoded report
    item: CreateItemRequest,
    /// Optional photo
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// Multipart body of `POST /items/images`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Create the items router with all HTTP endpoints.
///
/// Handlers that need a caller read it with [`AuthUser`], so the router must
/// sit behind `optional_jwt_auth_middleware`.
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let body_limit = service.max_image_bytes() + MULTIPART_OVERHEAD;
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/images", post(upload_image))
        .route("/search", get(search_items))
        .route("/stats", get(item_stats))
        .route("/{id}", get(get_item).delete(delete_item))
        .route("/{id}/retrieve", post(mark_retrieved))
        .route("/{id}/contact", get(contact_item))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(shared_service)
}

async fn read_image(field: Field<'_>) -> ItemResult<Option<ImageUpload>> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await?;

    // Browsers send an empty part when no file was chosen
    if bytes.is_empty() && filename.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        filename,
        bytes: bytes.to_vec(),
    }))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    params(ItemFilter),
    responses(
        (status = 200, description = "Reports ordered by creation time, newest first", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Query(filter): Query<ItemFilter>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.list_items(filter).await?;
    Ok(Json(items))
}

/// Submit a report with an optional photo
///
/// The reporter's email is taken from the session.
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body(content = CreateItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Report created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 502, response = UploadFailedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ItemResult<impl IntoResponse> {
    let mut multipart = multipart?;
    let mut request: Option<CreateItemRequest> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("item") => {
                let bytes = field.bytes().await?;
                let parsed = serde_json::from_slice(&bytes)
                    .map_err(|e| ItemError::InvalidInput(format!("Invalid item JSON: {}", e)))?;
                request = Some(parsed);
            }
            Some("image") => image = read_image(field).await?,
            _ => {}
        }
    }

    let request =
        request.ok_or_else(|| ItemError::InvalidInput("Missing 'item' part".to_string()))?;

    let item = service
        .create_item(request.into_create(claims.email.clone()), image)
        .await?;

    AuditEvent::new(Some(claims.email), "item.create", AuditOutcome::Success)
        .with_resource(format!("item:{}", item.id))
        .with_request(&headers)
        .with_details(serde_json::json!({ "type": item.item_type, "title": item.title }))
        .log();

    Ok((StatusCode::CREATED, Json(item)))
}

/// Upload a photo on its own and get its public URL
#[utoipa::path(
    post,
    path = "/images",
    tag = "Items",
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = UploadedImage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 502, response = UploadFailedResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn upload_image<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ItemResult<impl IntoResponse> {
    let mut multipart = multipart?;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        if name.as_deref() == Some("image") {
            image = read_image(field).await?;
        }
    }

    let image = image.ok_or_else(|| ItemError::InvalidInput("Missing 'image' part".to_string()))?;
    let uploaded = service.upload_image(image).await?;

    AuditEvent::new(Some(claims.email), "item.image_upload", AuditOutcome::Success)
        .with_resource(uploaded.url.clone())
        .with_request(&headers)
        .log();

    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// Search title, description and location
///
/// A blank query returns the full list.
#[utoipa::path(
    get,
    path = "/search",
    tag = "Items",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching reports, newest first", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Query(params): Query<SearchParams>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.search_items(&params.q).await?;
    Ok(Json(items))
}

/// Report counts by type
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Items",
    responses(
        (status = 200, description = "Counts", body = ItemStats),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn item_stats<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<ItemStats>> {
    let stats = service.item_stats().await?;
    Ok(Json(stats))
}

/// Get a report by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Report found", body = Item),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

/// Delete a report (reporter or admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ItemResult<impl IntoResponse> {
    let actor = Actor::from(&claims);
    let result = service.delete_item(id, &actor).await;
    audit_removal("item.delete", &claims.email, id, &headers, &result);
    result?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mark a report retrieved, which removes it (admin only)
#[utoipa::path(
    post,
    path = "/{id}/retrieve",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Report removed as retrieved"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn mark_retrieved<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    AuthUser(claims): AuthUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ItemResult<impl IntoResponse> {
    let actor = Actor::from(&claims);
    let result = service.mark_retrieved(id, &actor).await;
    audit_removal("item.retrieve", &claims.email, id, &headers, &result);
    result?;

    Ok(StatusCode::NO_CONTENT)
}

/// Where to write to about a report
#[utoipa::path(
    get,
    path = "/{id}/contact",
    tag = "Items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Recipient and subject", body = ContactDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn contact_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    UuidPath(id): UuidPath,
) -> ItemResult<Json<ContactDetails>> {
    let contact = service.contact_for(id).await?;
    Ok(Json(contact))
}

fn audit_removal(
    action: &str,
    actor: &str,
    id: uuid::Uuid,
    headers: &HeaderMap,
    result: &ItemResult<()>,
) {
    let outcome = match result {
        Ok(()) => AuditOutcome::Success,
        Err(ItemError::Forbidden(_)) => AuditOutcome::Denied,
        // 404s and storage failures are already logged by AppError
        Err(_) => return,
    };

    AuditEvent::new(Some(actor.to_string()), action, outcome)
        .with_resource(format!("item:{}", id))
        .with_request(headers)
        .log();
}
