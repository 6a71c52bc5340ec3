use async_trait::async_trait;
use samstore_model::{
    AttributeValueDetail, AttributeValueId, BindingId, NewProduct, Product,
    ProductAttributeValue, ProductId, ProductUpdate,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::rows::{AttributeValueDetailRow, BindingRow, PRODUCT_COLUMNS, ProductRow};
use crate::catalog::attributes::{BindingDecision, check_pair_binding};
use crate::database::infrastructure::postgres::errors::{storage_error, write_error};
use crate::database::ports::products::ProductsRepository;
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone)]
pub struct PostgresProductsRepository {
    pool: PgPool,
}

impl PostgresProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn product_binding(row: &BindingRow) -> ProductAttributeValue {
    ProductAttributeValue {
        id: row.binding_id(),
        product_id: ProductId(row.owner_id),
        attribute_value_id: AttributeValueId(row.target_id),
    }
}

#[async_trait]
impl ProductsRepository for PostgresProductsRepository {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products \
             (uuid, name, slug, description, active, category_id, product_type_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.active)
        .bind(product.category.map(|id| id.get()))
        .bind(product.product_type.map(|id| id.get()))
        .fetch_one(self.pool())
        .await
        .map_err(|e| write_error(e, "insert product"))?;

        let created = Product::from(row);
        info!(product = %created.id, uuid = %created.uuid, "created product");
        Ok(created)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product"))?;

        Ok(row.map(Product::from))
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE active ORDER BY name, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list products"))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products \
             SET name = $2, slug = $3, description = $4, active = COALESCE($5, active), \
                 category_id = $6, product_type_id = $7, updated_at = now() \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.get())
        .bind(&update.name)
        .bind(&update.slug)
        .bind(&update.description)
        .bind(update.active)
        .bind(update.category.map(|id| id.get()))
        .bind(update.product_type.map(|id| id.get()))
        .fetch_optional(self.pool())
        .await
        .map_err(|e| write_error(e, "update product"))?;

        let updated = row
            .map(Product::from)
            .ok_or_else(|| CatalogError::not_found("product", id))?;
        info!(product = %id, "updated product");
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "delete product"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("product", id));
        }
        info!(product = %id, "deleted product");
        Ok(())
    }

    async fn bind_value(
        &self,
        product: ProductId,
        value: AttributeValueId,
    ) -> Result<ProductAttributeValue> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, "begin product binding"))?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(product.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| storage_error(e, "lock product"))?;
        if locked.is_none() {
            return Err(CatalogError::not_found("product", product));
        }

        let existing: Vec<BindingRow> = sqlx::query_as(
            "SELECT id, product_id AS owner_id, attribute_value_id AS target_id \
             FROM product_attribute_values WHERE product_id = $1",
        )
        .bind(product.get())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "load product bindings"))?;

        let bound: Vec<AttributeValueId> = existing
            .iter()
            .map(|row| AttributeValueId(row.target_id))
            .collect();
        if check_pair_binding(&bound, &value) == BindingDecision::AlreadyBound {
            debug!(%product, %value, "attribute value already bound to product");
            return existing
                .iter()
                .find(|row| row.target_id == value.get())
                .map(product_binding)
                .ok_or_else(|| CatalogError::Internal("binding vanished under lock".into()));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product_attribute_values (product_id, attribute_value_id) \
             VALUES ($1, $2) RETURNING id",
        )
        .bind(product.get())
        .bind(value.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "bind product attribute value"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product binding"))?;

        info!(%product, %value, "bound attribute value to product");
        Ok(ProductAttributeValue {
            id: BindingId(id),
            product_id: product,
            attribute_value_id: value,
        })
    }

    async fn unbind_value(&self, product: ProductId, value: AttributeValueId) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM product_attribute_values \
             WHERE product_id = $1 AND attribute_value_id = $2",
        )
        .bind(product.get())
        .bind(value.get())
        .execute(self.pool())
        .await
        .map_err(|e| storage_error(e, "unbind product attribute value"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(
                "product attribute value",
                format!("{product}/{value}"),
            ));
        }
        Ok(())
    }

    async fn values_for_product(&self, product: ProductId) -> Result<Vec<AttributeValueDetail>> {
        let rows: Vec<AttributeValueDetailRow> = sqlx::query_as(
            r#"
            SELECT av.id, av.value, av.attribute_id, pa.name AS attribute_name
            FROM product_attribute_values pav
            JOIN attribute_values av ON av.id = pav.attribute_value_id
            JOIN product_attributes pa ON pa.id = av.attribute_id
            WHERE pav.product_id = $1
            ORDER BY pa.name, av.value, av.id
            "#,
        )
        .bind(product.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product attribute values"))?;

        Ok(rows.into_iter().map(AttributeValueDetail::from).collect())
    }
}
