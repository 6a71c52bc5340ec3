use async_trait::async_trait;
use samstore_model::{Category, CategoryId, CategoryUpdate, NewCategory};

use crate::error::Result;

#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    /// Insert a category. An unknown parent is a validation error.
    async fn create(&self, category: NewCategory) -> Result<Category>;

    async fn get(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Every category, ordered by name.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Direct children of `id`, ordered by name.
    async fn children_of(&self, id: CategoryId) -> Result<Vec<Category>>;

    /// Path from the root down to the parent of `id`.
    async fn ancestors(&self, id: CategoryId) -> Result<Vec<Category>>;

    /// Every category below `id`, depth first with siblings by name.
    async fn descendants(&self, id: CategoryId) -> Result<Vec<Category>>;

    /// Replace the editable fields of `id`. Implementations must reject a
    /// parent that would make the category its own ancestor.
    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category>;

    /// Delete `id`. Fails with a referential integrity error while other
    /// categories still point at it; products in it lose their category.
    async fn delete(&self, id: CategoryId) -> Result<()>;
}
