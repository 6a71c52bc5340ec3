use async_trait::async_trait;
use samstore_model::{
    BindingId, NewProductType, ProductAttribute, ProductAttributeId, ProductType,
    ProductTypeAttribute, ProductTypeId,
};
use sqlx::PgPool;
use tracing::{debug, info};

use super::rows::{ProductAttributeRow, ProductTypeRow};
use crate::catalog::hierarchy::ensure_acyclic;
use crate::database::infrastructure::postgres::errors::{
    delete_error, storage_error, write_error,
};
use crate::database::ports::product_types::ProductTypesRepository;
use crate::error::{CatalogError, Result};

const PRODUCT_TYPE_TREE_LOCK: i64 = 0x5341_4d53_5459_5001;

#[derive(Debug, Clone)]
pub struct PostgresProductTypesRepository {
    pool: PgPool,
}

impl PostgresProductTypesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductTypesRepository for PostgresProductTypesRepository {
    async fn create(&self, product_type: NewProductType) -> Result<ProductType> {
        let row: ProductTypeRow = sqlx::query_as(
            "INSERT INTO product_types (name, parent_id) VALUES ($1, $2) \
             RETURNING id, name, parent_id",
        )
        .bind(&product_type.name)
        .bind(product_type.parent.map(|id| id.get()))
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error(e, "insert product type"))?;

        let created = ProductType::from(row);
        info!(product_type = %created.id, name = %created.name, "created product type");
        Ok(created)
    }

    async fn get(&self, id: ProductTypeId) -> Result<Option<ProductType>> {
        let row: Option<ProductTypeRow> =
            sqlx::query_as("SELECT id, name, parent_id FROM product_types WHERE id = $1")
                .bind(id.get())
                .fetch_optional(self.pool())
                .await
                .map_err(|e| storage_error(e, "load product type"))?;

        Ok(row.map(ProductType::from))
    }

    async fn list(&self) -> Result<Vec<ProductType>> {
        let rows: Vec<ProductTypeRow> =
            sqlx::query_as("SELECT id, name, parent_id FROM product_types ORDER BY name, id")
                .fetch_all(self.pool())
                .await
                .map_err(|e| storage_error(e, "list product types"))?;

        Ok(rows.into_iter().map(ProductType::from).collect())
    }

    async fn set_parent(
        &self,
        id: ProductTypeId,
        parent: Option<ProductTypeId>,
    ) -> Result<ProductType> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, "begin product type update"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(PRODUCT_TYPE_TREE_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "lock product type tree"))?;

        if let Some(parent) = parent {
            let lineage: Vec<i64> = sqlx::query_scalar(
                r#"
                WITH RECURSIVE lineage AS (
                    SELECT id, parent_id FROM product_types WHERE id = $1
                    UNION
                    SELECT t.id, t.parent_id
                    FROM product_types t
                    JOIN lineage l ON t.id = l.parent_id
                )
                SELECT id FROM lineage
                "#,
            )
            .bind(parent.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "load product type lineage"))?;

            ensure_acyclic(
                "product type",
                id,
                lineage.into_iter().map(ProductTypeId),
            )?;
        }

        let row: Option<ProductTypeRow> = sqlx::query_as(
            "UPDATE product_types SET parent_id = $2 WHERE id = $1 \
             RETURNING id, name, parent_id",
        )
        .bind(id.get())
        .bind(parent.map(|id| id.get()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| write_error(e, "update product type"))?;
        let updated = row.ok_or_else(|| CatalogError::not_found("product type", id))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product type update"))?;

        info!(product_type = %id, "moved product type");
        Ok(updated.into())
    }

    async fn delete(&self, id: ProductTypeId) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, "begin product type delete"))?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM product_types WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| storage_error(e, "lock product type"))?;
        if exists.is_none() {
            return Err(CatalogError::not_found("product type", id));
        }

        let referenced_by: Option<String> = sqlx::query_scalar(
            r#"
            SELECT CASE
                WHEN EXISTS(SELECT 1 FROM products WHERE product_type_id = $1) THEN 'products'
                WHEN EXISTS(SELECT 1 FROM product_lines WHERE product_type_id = $1) THEN 'product lines'
                WHEN EXISTS(SELECT 1 FROM product_types WHERE parent_id = $1) THEN 'product types'
            END
            "#,
        )
        .bind(id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "check product type references"))?;

        if let Some(referenced_by) = referenced_by {
            return Err(CatalogError::ReferentialIntegrity {
                entity: "product type",
                key: id.to_string(),
                referenced_by: match referenced_by.as_str() {
                    "products" => "products",
                    "product lines" => "product lines",
                    _ => "product types",
                },
            });
        }

        sqlx::query("DELETE FROM product_types WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| delete_error(e, "product type", id, "delete product type"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product type delete"))?;

        info!(product_type = %id, "deleted product type");
        Ok(())
    }

    async fn declare_attribute(
        &self,
        product_type: ProductTypeId,
        attribute: ProductAttributeId,
    ) -> Result<ProductTypeAttribute> {
        // ON CONFLICT keeps a repeated declaration idempotent without a
        // separate existence check.
        let inserted: Option<i64> = sqlx::query_scalar(
            "INSERT INTO product_type_attributes (product_type_id, attribute_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT product_type_attributes_pair_key DO NOTHING \
             RETURNING id",
        )
        .bind(product_type.get())
        .bind(attribute.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| write_error(e, "declare product type attribute"))?;

        let id = match inserted {
            Some(id) => {
                info!(%product_type, %attribute, "declared product type attribute");
                id
            }
            None => {
                debug!(%product_type, %attribute, "product type attribute already declared");
                sqlx::query_scalar(
                    "SELECT id FROM product_type_attributes \
                     WHERE product_type_id = $1 AND attribute_id = $2",
                )
                .bind(product_type.get())
                .bind(attribute.get())
                .fetch_one(self.pool())
                .await
                .map_err(|e| storage_error(e, "load product type attribute"))?
            }
        };

        Ok(ProductTypeAttribute {
            id: BindingId(id),
            product_type_id: product_type,
            attribute_id: attribute,
        })
    }

    async fn attributes_for(&self, product_type: ProductTypeId) -> Result<Vec<ProductAttribute>> {
        let rows: Vec<ProductAttributeRow> = sqlx::query_as(
            r#"
            SELECT pa.id, pa.name, pa.description, pa.created_at, pa.updated_at
            FROM product_type_attributes pta
            JOIN product_attributes pa ON pa.id = pta.attribute_id
            WHERE pta.product_type_id = $1
            ORDER BY pa.name, pa.id
            "#,
        )
        .bind(product_type.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product type attributes"))?;

        Ok(rows.into_iter().map(ProductAttribute::from).collect())
    }
}
