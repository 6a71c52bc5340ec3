use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, NewAttributeValue,
    NewProductAttribute, ProductAttribute, ProductAttributeId,
};

use crate::{AppState, infra::errors::AppResult};

pub async fn list_attributes(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductAttribute>>> {
    Ok(Json(state.attributes.list_attributes().await?))
}

pub async fn create_attribute(
    State(state): State<AppState>,
    Json(input): Json<NewProductAttribute>,
) -> AppResult<(StatusCode, Json<ProductAttribute>)> {
    let attribute = state.attributes.create_attribute(input).await?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<ProductAttributeId>,
) -> AppResult<StatusCode> {
    state.attributes.delete_attribute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_values(
    State(state): State<AppState>,
    Path(id): Path<ProductAttributeId>,
) -> AppResult<Json<Vec<AttributeValue>>> {
    Ok(Json(state.attributes.values(id).await?))
}

pub async fn create_value(
    State(state): State<AppState>,
    Path(id): Path<ProductAttributeId>,
    Json(input): Json<NewAttributeValue>,
) -> AppResult<(StatusCode, Json<AttributeValue>)> {
    let value = state.attributes.create_value(id, input).await?;
    Ok((StatusCode::CREATED, Json(value)))
}

pub async fn get_value(
    State(state): State<AppState>,
    Path(id): Path<AttributeValueId>,
) -> AppResult<Json<AttributeValueDetail>> {
    Ok(Json(state.attributes.get_value(id).await?))
}
