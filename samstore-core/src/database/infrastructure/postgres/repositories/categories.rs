use async_trait::async_trait;
use samstore_model::{Category, CategoryId, CategoryUpdate, NewCategory};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use super::rows::{CATEGORY_COLUMNS, CategoryRow};
use crate::catalog::hierarchy::ensure_acyclic;
use crate::database::infrastructure::postgres::errors::{
    delete_error, storage_error, write_error,
};
use crate::database::ports::categories::CategoriesRepository;
use crate::error::{CatalogError, Result};

/// Serializes parent changes across the whole category tree so two
/// concurrent moves cannot close a loop between them.
const CATEGORY_TREE_LOCK: i64 = 0x5341_4d53_4341_5401;

#[derive(Debug, Clone)]
pub struct PostgresCategoriesRepository {
    pool: PgPool,
}

impl PostgresCategoriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `id` followed by all of its ancestors.
    async fn lineage(
        tx: &mut Transaction<'_, Postgres>,
        id: CategoryId,
    ) -> Result<Vec<CategoryId>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            WITH RECURSIVE lineage AS (
                SELECT id, parent_id FROM categories WHERE id = $1
                UNION
                SELECT c.id, c.parent_id
                FROM categories c
                JOIN lineage l ON c.id = l.parent_id
            )
            SELECT id FROM lineage
            "#,
        )
        .bind(id.get())
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| storage_error(e, "load category lineage"))?;

        Ok(ids.into_iter().map(CategoryId).collect())
    }
}

#[async_trait]
impl CategoriesRepository for PostgresCategoriesRepository {
    async fn create(&self, category: NewCategory) -> Result<Category> {
        let row: CategoryRow = sqlx::query_as(&format!(
            "INSERT INTO categories (name, slug, parent_id, active) \
             VALUES ($1, $2, $3, $4) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent.map(CategoryId::get))
        .bind(category.active)
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error(e, "insert category"))?;

        let created = Category::from(row);
        info!(category = %created.id, slug = %created.slug, "created category");
        Ok(created)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load category"))?;

        Ok(row.map(Category::from))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load category by slug"))?;

        Ok(row.map(Category::from))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list categories"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn children_of(&self, id: CategoryId) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE parent_id = $1 ORDER BY name, id"
        ))
        .bind(id.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list child categories"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn ancestors(&self, id: CategoryId) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            WITH RECURSIVE lineage AS (
                SELECT c.id, c.name, c.slug, c.parent_id, c.active,
                       c.created_at, c.updated_at, 1 AS depth
                FROM categories c
                WHERE c.id = (SELECT parent_id FROM categories WHERE id = $1)
                UNION ALL
                SELECT p.id, p.name, p.slug, p.parent_id, p.active,
                       p.created_at, p.updated_at, l.depth + 1
                FROM categories p
                JOIN lineage l ON p.id = l.parent_id
                WHERE p.id <> $1
            )
            SELECT id, name, slug, parent_id, active, created_at, updated_at
            FROM lineage
            ORDER BY depth DESC
            "#,
        )
        .bind(id.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load category ancestors"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn descendants(&self, id: CategoryId) -> Result<Vec<Category>> {
        // Sorting by the array of names along the path yields a depth-first
        // walk with siblings in name order.
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT c.id, c.name, c.slug, c.parent_id, c.active,
                       c.created_at, c.updated_at, ARRAY[c.name::text] AS path
                FROM categories c
                WHERE c.parent_id = $1
                UNION ALL
                SELECT c.id, c.name, c.slug, c.parent_id, c.active,
                       c.created_at, c.updated_at, s.path || c.name::text
                FROM categories c
                JOIN subtree s ON c.parent_id = s.id
                WHERE c.id <> $1
            )
            SELECT id, name, slug, parent_id, active, created_at, updated_at
            FROM subtree
            ORDER BY path
            "#,
        )
        .bind(id.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load category descendants"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, "begin category update"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CATEGORY_TREE_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "lock category tree"))?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| storage_error(e, "lock category"))?;
        if exists.is_none() {
            return Err(CatalogError::not_found("category", id));
        }

        if let Some(parent) = update.parent {
            let lineage = Self::lineage(&mut tx, parent).await?;
            ensure_acyclic("category", id, lineage)?;
        }

        let row: CategoryRow = sqlx::query_as(&format!(
            "UPDATE categories \
             SET name = $2, slug = $3, parent_id = $4, \
                 active = COALESCE($5, active), updated_at = now() \
             WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id.get())
        .bind(&update.name)
        .bind(&update.slug)
        .bind(update.parent.map(CategoryId::get))
        .bind(update.active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "update category"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit category update"))?;

        info!(category = %id, "updated category");
        Ok(row.into())
    }

    async fn delete(&self, id: CategoryId) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, "begin category delete"))?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| storage_error(e, "lock category"))?;
        if exists.is_none() {
            return Err(CatalogError::not_found("category", id));
        }

        let has_children: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)",
        )
        .bind(id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "check child categories"))?;
        if has_children {
            return Err(CatalogError::ReferentialIntegrity {
                entity: "category",
                key: id.to_string(),
                referenced_by: "categories",
            });
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| delete_error(e, "category", id, "delete category"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit category delete"))?;

        info!(category = %id, "deleted category");
        Ok(())
    }
}
