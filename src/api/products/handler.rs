//! Product API Handlers

use std::io::Cursor;
use std::path::PathBuf;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductDetail, ProductPage, ProductUpdate, Review, ReviewCreate};
use crate::db::repository::{product as product_repo, review as review_repo};
use crate::utils::{AppError, AppResult};

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored product images
const JPEG_QUALITY: u8 = 85;

/// Query params for the catalog listing.
///
/// `page` arrives as a raw string so a non-numeric value falls back to
/// page 1 instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub keyword: String,
    pub page: Option<String>,
}

/// GET /api/products - paginated catalog search
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ProductPage>> {
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<i64>().ok())
        .unwrap_or(1);

    let page = product_repo::search_page(state.get_db(), &query.keyword, page).await?;
    Ok(Json(page))
}

/// GET /api/products/top - top five products by rating
pub async fn top_rated(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::top_rated(state.get_db()).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - single product with its reviews
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDetail>> {
    let product = product_repo::find_by_id(state.get_db(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    let reviews = review_repo::find_for_product(state.get_db(), id).await?;
    Ok(Json(ProductDetail { product, reviews }))
}

/// POST /api/products - create placeholder product (staff only)
///
/// Inserts fixed sample values owned by the caller; the client is expected
/// to follow up with a PUT carrying real values.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Product>> {
    user.require_staff()?;

    let product = product_repo::create_sample(state.get_db(), user.id).await?;

    tracing::info!(product_id = product.id, user_id = user.id, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id} - overwrite product fields (staff only)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    user.require_staff()?;

    let product = product_repo::update(state.get_db(), id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - delete product (staff only)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<&'static str>> {
    user.require_staff()?;

    product_repo::delete(state.get_db(), id).await?;

    tracing::info!(product_id = id, user_id = user.id, "Product deleted");
    Ok(Json("Product was deleted"))
}

/// POST /api/products/{id}/reviews - create review (authenticated)
///
/// Lookup, duplicate and rating validation all happen in the repository so
/// their precedence stays in one place.
pub async fn create_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    let review =
        review_repo::add_review(state.get_db(), id, user.id, &user.first_name, payload).await?;

    tracing::info!(product_id = id, user_id = user.id, "Review added");
    Ok(Json(review))
}

// =============================================================================
// Image upload
// =============================================================================

/// Re-encode the upload as JPEG; also proves the payload is a real image.
fn process_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;

    Ok(buffer)
}

fn validate_upload(data: &[u8], filename: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext = PathBuf::from(filename)
        .extension()
        .and_then(|e| e.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {filename}")))?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    Ok(())
}

/// POST /api/products/upload - attach an image to a product
///
/// Multipart form with a file field `image` and a text field `product_id`.
/// Open to any caller, matching the original API surface.
pub async fn upload_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<&'static str>> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut image_filename: Option<String> = None;
    let mut product_id: Option<i64> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                image_filename = field.file_name().map(|s| s.to_string());
                image_data = Some(field.bytes().await?.to_vec());
            }
            Some("product_id") => {
                let text = field.text().await?;
                product_id = Some(
                    text.parse()
                        .map_err(|_| AppError::validation(format!("Invalid product_id: {text}")))?,
                );
            }
            _ => {}
        }
    }

    let product_id =
        product_id.ok_or_else(|| AppError::validation("Missing 'product_id' field"))?;
    let data = image_data.ok_or_else(|| AppError::validation("Missing 'image' field"))?;
    let filename =
        image_filename.ok_or_else(|| AppError::validation("No filename provided in image field"))?;

    // Resolve the product before touching the filesystem
    product_repo::find_by_id(state.get_db(), product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {product_id} not found")))?;

    validate_upload(&data, &filename)?;
    let jpeg = process_image(&data)?;

    let images_dir = state.config.images_dir();
    std::fs::create_dir_all(&images_dir)
        .map_err(|e| AppError::internal(format!("Failed to create images directory: {e}")))?;

    let stored_name = format!("{}.jpg", Uuid::new_v4());
    let file_path = images_dir.join(&stored_name);
    std::fs::write(&file_path, &jpeg)
        .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

    let url = format!("/uploads/images/{stored_name}");
    if let Err(e) = product_repo::set_image(state.get_db(), product_id, &url).await {
        // The product may have been deleted since the lookup above;
        // don't leave the file behind
        let _ = std::fs::remove_file(&file_path);
        return Err(e.into());
    }

    tracing::info!(
        product_id,
        original_name = %filename,
        size = jpeg.len(),
        "Image uploaded"
    );

    Ok(Json("Image was uploaded"))
}
