use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use samstore_model::{Category, CategoryId, CategoryUpdate, CategoryView, NewCategory};

use crate::{AppState, infra::errors::AppResult};

/// Flat `{name, slug, parent}` listing of every category.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryView>>> {
    Ok(Json(state.catalog.category_list().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories.get(id).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(update): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories.update(id, update).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> AppResult<StatusCode> {
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn category_children(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.children(id).await?))
}

/// Root first, excluding the category itself.
pub async fn category_ancestors(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.ancestors(id).await?))
}

pub async fn category_descendants(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.descendants(id).await?))
}
