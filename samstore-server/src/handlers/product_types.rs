use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use samstore_model::{
    NewProductType, ProductAttribute, ProductAttributeId, ProductType, ProductTypeAttribute,
    ProductTypeId,
};
use serde::Deserialize;

use crate::{AppState, infra::errors::AppResult};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetParentRequest {
    #[serde(default)]
    pub parent: Option<ProductTypeId>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DeclareAttributeRequest {
    pub attribute: ProductAttributeId,
}

pub async fn list_product_types(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductType>>> {
    Ok(Json(state.attributes.list_product_types().await?))
}

pub async fn create_product_type(
    State(state): State<AppState>,
    Json(input): Json<NewProductType>,
) -> AppResult<(StatusCode, Json<ProductType>)> {
    let product_type = state.attributes.create_product_type(input).await?;
    Ok((StatusCode::CREATED, Json(product_type)))
}

pub async fn get_product_type(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
) -> AppResult<Json<ProductType>> {
    Ok(Json(state.attributes.get_product_type(id).await?))
}

/// Re-link a product type; `{"parent": null}` makes it a root.
pub async fn set_product_type_parent(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
    Json(request): Json<SetParentRequest>,
) -> AppResult<Json<ProductType>> {
    let moved = state
        .attributes
        .set_product_type_parent(id, request.parent)
        .await?;
    Ok(Json(moved))
}

pub async fn delete_product_type(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
) -> AppResult<StatusCode> {
    state.attributes.delete_product_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_type_attributes(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
) -> AppResult<Json<Vec<ProductAttribute>>> {
    Ok(Json(state.attributes.type_attributes(id).await?))
}

pub async fn declare_type_attribute(
    State(state): State<AppState>,
    Path(id): Path<ProductTypeId>,
    Json(request): Json<DeclareAttributeRequest>,
) -> AppResult<Json<ProductTypeAttribute>> {
    let declared = state
        .attributes
        .declare_attribute(id, request.attribute)
        .await?;
    Ok(Json(declared))
}
