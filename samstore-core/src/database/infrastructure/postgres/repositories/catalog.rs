use async_trait::async_trait;
use samstore_model::{
    Category, Product, ProductId, ProductImage, ProductLine, ProductLineId, ProductTypeId,
};
use sqlx::PgPool;
use tracing::debug;

use super::rows::{
    CATEGORY_COLUMNS, CategoryRow, LineAttributeValueRow, PRODUCT_IMAGE_COLUMNS,
    PRODUCT_LINE_COLUMNS, ProductImageRow, ProductLineRow, ProductRow, ProductWithCategoryRow,
    TypeAttributeRow,
};
use crate::catalog::aggregate::{LineAttributeValue, ProductWithCategory, TypeAttribute};
use crate::database::infrastructure::postgres::errors::storage_error;
use crate::database::ports::catalog::CatalogReadPort;
use crate::error::Result;

/// Bulk reads for the catalog aggregate. Each call is a single query keyed
/// by `= ANY($1)` over the ids of the level above.
#[derive(Debug, Clone)]
pub struct PostgresCatalogReadRepository {
    pool: PgPool,
}

impl PostgresCatalogReadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn raw_ids<T: Copy>(ids: &[T], get: impl Fn(T) -> i64) -> Vec<i64> {
    ids.iter().copied().map(get).collect()
}

#[async_trait]
impl CatalogReadPort for PostgresCatalogReadRepository {
    async fn active_products_by_slug(&self, slug: &str) -> Result<Vec<ProductWithCategory>> {
        let rows: Vec<ProductWithCategoryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.uuid, p.name, p.slug, p.description, p.active,
                   p.category_id, p.product_type_id, p.created_at, p.updated_at,
                   c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.slug = $1 AND p.active
            ORDER BY p.id
            "#,
        )
        .bind(slug)
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load products by slug"))?;

        debug!(slug, count = rows.len(), "loaded products by slug");
        Ok(rows.into_iter().map(ProductWithCategory::from).collect())
    }

    async fn active_products_in_category(&self, category_slug: &str) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.uuid, p.name, p.slug, p.description, p.active,
                   p.category_id, p.product_type_id, p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE c.slug = $1 AND p.active
            ORDER BY p.name, p.id
            "#,
        )
        .bind(category_slug)
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load products in category"))?;

        debug!(category_slug, count = rows.len(), "loaded products in category");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn lines_for_products(&self, products: &[ProductId]) -> Result<Vec<ProductLine>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ProductLineRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_LINE_COLUMNS} FROM product_lines \
             WHERE product_id = ANY($1) ORDER BY product_id, \"order\", id"
        ))
        .bind(raw_ids(products, ProductId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product lines"))?;

        Ok(rows.into_iter().map(ProductLine::from).collect())
    }

    async fn images_for_lines(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ProductImageRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_IMAGE_COLUMNS} FROM product_images \
             WHERE product_line_id = ANY($1) ORDER BY product_line_id, \"order\", id"
        ))
        .bind(raw_ids(lines, ProductLineId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product images"))?;

        Ok(rows.into_iter().map(ProductImage::from).collect())
    }

    async fn line_values_for_lines(
        &self,
        lines: &[ProductLineId],
    ) -> Result<Vec<LineAttributeValue>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<LineAttributeValueRow> = sqlx::query_as(
            r#"
            SELECT plav.product_line_id,
                   av.id, av.value, av.attribute_id, pa.name AS attribute_name
            FROM product_line_attribute_values plav
            JOIN attribute_values av ON av.id = plav.attribute_value_id
            JOIN product_attributes pa ON pa.id = av.attribute_id
            WHERE plav.product_line_id = ANY($1)
            ORDER BY plav.product_line_id, av.attribute_id
            "#,
        )
        .bind(raw_ids(lines, ProductLineId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product line attribute values"))?;

        Ok(rows.into_iter().map(LineAttributeValue::from).collect())
    }

    async fn type_attributes(&self, types: &[ProductTypeId]) -> Result<Vec<TypeAttribute>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<TypeAttributeRow> = sqlx::query_as(
            r#"
            SELECT pta.product_type_id,
                   pa.id, pa.name, pa.description, pa.created_at, pa.updated_at
            FROM product_type_attributes pta
            JOIN product_attributes pa ON pa.id = pta.attribute_id
            WHERE pta.product_type_id = ANY($1)
            ORDER BY pta.product_type_id, pa.id
            "#,
        )
        .bind(raw_ids(types, ProductTypeId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product type attributes"))?;

        Ok(rows.into_iter().map(TypeAttribute::from).collect())
    }

    async fn lead_lines(&self, products: &[ProductId]) -> Result<Vec<ProductLine>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ProductLineRow> = sqlx::query_as(&format!(
            "SELECT DISTINCT ON (product_id) {PRODUCT_LINE_COLUMNS} FROM product_lines \
             WHERE product_id = ANY($1) ORDER BY product_id, \"order\", id"
        ))
        .bind(raw_ids(products, ProductId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load lead product lines"))?;

        Ok(rows.into_iter().map(ProductLine::from).collect())
    }

    async fn lead_images(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ProductImageRow> = sqlx::query_as(&format!(
            "SELECT DISTINCT ON (product_line_id) {PRODUCT_IMAGE_COLUMNS} FROM product_images \
             WHERE product_line_id = ANY($1) ORDER BY product_line_id, \"order\", id"
        ))
        .bind(raw_ids(lines, ProductLineId::get))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load lead product images"))?;

        Ok(rows.into_iter().map(ProductImage::from).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list categories"))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "reach database"))?;
        Ok(())
    }
}
