use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use samstore_model::{
    AttributeValueDetail, AttributeValueId, NewProductImage, ProductImage, ProductImageId,
    ProductLine, ProductLineAttributeValue, ProductLineId, ProductLineUpdate,
};

use super::BindValueRequest;
use crate::{AppState, infra::errors::AppResult};

pub async fn get_product_line(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
) -> AppResult<Json<ProductLine>> {
    Ok(Json(state.products.get_line(id).await?))
}

pub async fn update_product_line(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
    Json(update): Json<ProductLineUpdate>,
) -> AppResult<Json<ProductLine>> {
    Ok(Json(state.products.update_line(id, update).await?))
}

pub async fn delete_product_line(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
) -> AppResult<StatusCode> {
    state.products.delete_line(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
) -> AppResult<Json<Vec<ProductImage>>> {
    Ok(Json(state.products.images(id).await?))
}

pub async fn create_image(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
    Json(input): Json<NewProductImage>,
) -> AppResult<(StatusCode, Json<ProductImage>)> {
    let image = state.products.add_image(id, input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<ProductImageId>,
) -> AppResult<StatusCode> {
    state.products.delete_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn line_values(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
) -> AppResult<Json<Vec<AttributeValueDetail>>> {
    Ok(Json(state.products.line_values(id).await?))
}

/// Rebinding the same value returns the existing binding.
pub async fn bind_line_value(
    State(state): State<AppState>,
    Path(id): Path<ProductLineId>,
    Json(request): Json<BindValueRequest>,
) -> AppResult<Json<ProductLineAttributeValue>> {
    let binding = state
        .products
        .bind_line_value(id, request.attribute_value)
        .await?;
    Ok(Json(binding))
}

pub async fn unbind_line_value(
    State(state): State<AppState>,
    Path((id, value)): Path<(ProductLineId, AttributeValueId)>,
) -> AppResult<StatusCode> {
    state.products.unbind_line_value(id, value).await?;
    Ok(StatusCode::NO_CONTENT)
}
