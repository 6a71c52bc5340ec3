use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use samstore_model::{
    AttributeValueDetail, AttributeValueId, NewProduct, NewProductLine, Product,
    ProductAttributeValue, ProductId, ProductLine, ProductSummary, ProductUpdate, ProductView,
};

use super::BindValueRequest;
use crate::{AppState, infra::errors::AppResult};

/// Active products in their stored shape.
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list_active().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Detail views of the active products with `slug`. Slugs are not unique,
/// so the body is always a list.
pub async fn product_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<ProductView>>> {
    Ok(Json(state.catalog.product_details(&slug).await?))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    Ok(Json(state.catalog.products_by_category(&slug).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.products.get(id).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.products.update(id, update).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<StatusCode> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_product_lines(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<Vec<ProductLine>>> {
    Ok(Json(state.products.lines(id).await?))
}

pub async fn create_product_line(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<NewProductLine>,
) -> AppResult<(StatusCode, Json<ProductLine>)> {
    let line = state.products.add_line(id, input).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn product_values(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<Vec<AttributeValueDetail>>> {
    Ok(Json(state.products.product_values(id).await?))
}

pub async fn bind_product_value(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(request): Json<BindValueRequest>,
) -> AppResult<Json<ProductAttributeValue>> {
    let binding = state
        .products
        .bind_product_value(id, request.attribute_value)
        .await?;
    Ok(Json(binding))
}

pub async fn unbind_product_value(
    State(state): State<AppState>,
    Path((id, value)): Path<(ProductId, AttributeValueId)>,
) -> AppResult<StatusCode> {
    state.products.unbind_product_value(id, value).await?;
    Ok(StatusCode::NO_CONTENT)
}
