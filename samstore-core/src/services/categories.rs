use std::{any::type_name_of_val, fmt, sync::Arc};

use samstore_model::{Category, CategoryId, CategoryUpdate, NewCategory};
use tracing::{debug, info};

use crate::database::ports::categories::CategoriesRepository;
use crate::error::{CatalogError, Result};

/// Category tree maintenance.
pub struct CategoryService<R>
where
    R: CategoriesRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> Clone for CategoryService<R>
where
    R: CategoriesRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> fmt::Debug for CategoryService<R>
where
    R: CategoriesRepository + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryService")
            .field("repository", &type_name_of_val(self.repository.as_ref()))
            .finish()
    }
}

impl<R> CategoryService<R>
where
    R: CategoriesRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: NewCategory) -> Result<Category> {
        input.validate()?;
        let category = self.repository.create(input).await?;
        info!(category = %category.id, name = %category, "category created");
        Ok(category)
    }

    pub async fn get(&self, id: CategoryId) -> Result<Category> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        self.repository
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::not_found("category", slug))
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.repository.list().await
    }

    pub async fn children(&self, id: CategoryId) -> Result<Vec<Category>> {
        self.get(id).await?;
        self.repository.children_of(id).await
    }

    pub async fn ancestors(&self, id: CategoryId) -> Result<Vec<Category>> {
        self.get(id).await?;
        self.repository.ancestors(id).await
    }

    pub async fn descendants(&self, id: CategoryId) -> Result<Vec<Category>> {
        self.get(id).await?;
        self.repository.descendants(id).await
    }

    pub async fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        update.validate()?;
        debug!(category = %id, parent = ?update.parent, "updating category");
        self.repository.update(id, update).await
    }

    /// Move a category under `parent`, or to the root with `None`.
    pub async fn reparent(&self, id: CategoryId, parent: Option<CategoryId>) -> Result<Category> {
        let category = self.get(id).await?;
        self.repository
            .update(id, CategoryUpdate::reparent(&category, parent))
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.repository.delete(id).await?;
        info!(category = %id, "category deleted");
        Ok(())
    }
}
