use async_trait::async_trait;
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, BindingId, NewProductImage,
    NewProductLine, ProductId, ProductImage, ProductImageId, ProductLine,
    ProductLineAttributeValue, ProductLineId, ProductLineUpdate,
};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use super::rows::{
    ATTRIBUTE_VALUE_COLUMNS, AttributeValueDetailRow, AttributeValueRow, PRODUCT_IMAGE_COLUMNS,
    PRODUCT_LINE_COLUMNS, ProductImageRow, ProductLineRow,
};
use crate::catalog::attributes::{BindingDecision, check_line_binding};
use crate::catalog::ordering::{
    OrderAttempt, OrderGroup, assign_order, ensure_free, retry_order_conflicts,
};
use crate::database::infrastructure::postgres::errors::{
    PRODUCT_IMAGE_ORDER_KEY, PRODUCT_LINE_ORDER_KEY, is_unique_violation_on, storage_error,
    write_error,
};
use crate::database::ports::product_lines::ProductLinesRepository;
use crate::error::{CatalogError, Result, ValidationError};

#[derive(Debug, sqlx::FromRow)]
struct LineBindingRow {
    binding_id: i64,
    #[sqlx(flatten)]
    value: AttributeValueRow,
}

#[derive(Debug, Clone)]
pub struct PostgresProductLinesRepository {
    pool: PgPool,
}

impl PostgresProductLinesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self, action: &str) -> Result<Transaction<'_, Postgres>> {
        self.pool()
            .begin()
            .await
            .map_err(|e| storage_error(e, action))
    }

    /// Lock the product owning a group of lines. Inserts into the same
    /// product queue up here; other products are unaffected.
    async fn lock_product(
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<()> {
        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(product.get())
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| storage_error(e, "lock product"))?;
        locked
            .map(|_| ())
            .ok_or_else(|| CatalogError::not_found("product", product))
    }

    async fn lock_line(
        tx: &mut Transaction<'_, Postgres>,
        line: ProductLineId,
    ) -> Result<ProductLine> {
        let row: Option<ProductLineRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_LINE_COLUMNS} FROM product_lines WHERE id = $1 FOR UPDATE"
        ))
        .bind(line.get())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| storage_error(e, "lock product line"))?;

        row.map(ProductLine::from)
            .ok_or_else(|| CatalogError::not_found("product line", line))
    }

    async fn try_insert_line(
        &self,
        product: ProductId,
        input: &NewProductLine,
    ) -> Result<OrderAttempt<ProductLine>> {
        let group = OrderGroup::ProductLines(product);
        let mut tx = self.begin("begin product line insert").await?;
        Self::lock_product(&mut tx, product).await?;

        let existing: Vec<i32> =
            sqlx::query_scalar(r#"SELECT "order" FROM product_lines WHERE product_id = $1"#)
                .bind(product.get())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| storage_error(e, "load product line orders"))?;
        let order = assign_order(group, input.order, &existing)?;

        let inserted = sqlx::query_as::<_, ProductLineRow>(&format!(
            "INSERT INTO product_lines \
             (product_id, price, sku, stock_qty, active, \"order\", weight, product_type_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {PRODUCT_LINE_COLUMNS}"
        ))
        .bind(product.get())
        .bind(input.price)
        .bind(&input.sku)
        .bind(input.stock_qty)
        .bind(input.active)
        .bind(order)
        .bind(input.weight)
        .bind(input.product_type.map(|id| id.get()))
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation_on(&e, PRODUCT_LINE_ORDER_KEY) => {
                if input.order.is_none() {
                    return Ok(OrderAttempt::Conflict);
                }
                return Err(ValidationError::DuplicateOrder { group, order }.into());
            }
            Err(e) => return Err(write_error(e, "insert product line")),
        };

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product line insert"))?;

        Ok(OrderAttempt::Settled(row.into()))
    }

    async fn try_insert_image(
        &self,
        line: ProductLineId,
        input: &NewProductImage,
    ) -> Result<OrderAttempt<ProductImage>> {
        let group = OrderGroup::Images(line);
        let mut tx = self.begin("begin product image insert").await?;
        Self::lock_line(&mut tx, line).await?;

        let existing: Vec<i32> = sqlx::query_scalar(
            r#"SELECT "order" FROM product_images WHERE product_line_id = $1"#,
        )
        .bind(line.get())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "load product image orders"))?;
        let order = assign_order(group, input.order, &existing)?;

        let inserted = sqlx::query_as::<_, ProductImageRow>(&format!(
            "INSERT INTO product_images (product_line_id, image_url, alt_text, \"order\") \
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_IMAGE_COLUMNS}"
        ))
        .bind(line.get())
        .bind(&input.image_url)
        .bind(&input.alt_text)
        .bind(order)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation_on(&e, PRODUCT_IMAGE_ORDER_KEY) => {
                if input.order.is_none() {
                    return Ok(OrderAttempt::Conflict);
                }
                return Err(ValidationError::DuplicateOrder { group, order }.into());
            }
            Err(e) => return Err(write_error(e, "insert product image")),
        };

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product image insert"))?;

        Ok(OrderAttempt::Settled(row.into()))
    }
}

#[async_trait]
impl ProductLinesRepository for PostgresProductLinesRepository {
    async fn create(&self, product: ProductId, line: NewProductLine) -> Result<ProductLine> {
        let input = &line;
        let created = retry_order_conflicts(OrderGroup::ProductLines(product), move || {
            self.try_insert_line(product, input)
        })
        .await?;

        info!(
            %product,
            line = %created.id,
            order = created.order,
            "created product line"
        );
        Ok(created)
    }

    async fn get(&self, id: ProductLineId) -> Result<Option<ProductLine>> {
        let row: Option<ProductLineRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_LINE_COLUMNS} FROM product_lines WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product line"))?;

        Ok(row.map(ProductLine::from))
    }

    async fn list_for_product(&self, product: ProductId) -> Result<Vec<ProductLine>> {
        let rows: Vec<ProductLineRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_LINE_COLUMNS} FROM product_lines \
             WHERE product_id = $1 ORDER BY \"order\", id"
        ))
        .bind(product.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list product lines"))?;

        Ok(rows.into_iter().map(ProductLine::from).collect())
    }

    async fn update(&self, id: ProductLineId, update: ProductLineUpdate) -> Result<ProductLine> {
        let mut tx = self.begin("begin product line update").await?;
        let current = Self::lock_line(&mut tx, id).await?;
        let order = update.order.unwrap_or(current.order);
        let group = OrderGroup::ProductLines(current.product_id);

        if order != current.order {
            Self::lock_product(&mut tx, current.product_id).await?;
            let siblings: Vec<i32> = sqlx::query_scalar(
                r#"SELECT "order" FROM product_lines WHERE product_id = $1 AND id <> $2"#,
            )
            .bind(current.product_id.get())
            .bind(id.get())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "load product line orders"))?;
            ensure_free(group, order, &siblings)?;
        }

        let updated = sqlx::query_as::<_, ProductLineRow>(&format!(
            "UPDATE product_lines \
             SET price = $2, sku = $3, stock_qty = $4, active = COALESCE($5, active), \
                 \"order\" = $6, weight = $7, product_type_id = $8, updated_at = now() \
             WHERE id = $1 RETURNING {PRODUCT_LINE_COLUMNS}"
        ))
        .bind(id.get())
        .bind(update.price)
        .bind(&update.sku)
        .bind(update.stock_qty)
        .bind(update.active)
        .bind(order)
        .bind(update.weight)
        .bind(update.product_type.map(|id| id.get()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, PRODUCT_LINE_ORDER_KEY) {
                ValidationError::DuplicateOrder { group, order }.into()
            } else {
                write_error(e, "update product line")
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product line update"))?;

        info!(line = %id, order, "updated product line");
        Ok(updated.into())
    }

    async fn delete(&self, id: ProductLineId) -> Result<()> {
        let result = sqlx::query("DELETE FROM product_lines WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "delete product line"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("product line", id));
        }
        info!(line = %id, "deleted product line");
        Ok(())
    }

    async fn add_image(&self, line: ProductLineId, image: NewProductImage) -> Result<ProductImage> {
        let input = &image;
        let created = retry_order_conflicts(OrderGroup::Images(line), move || {
            self.try_insert_image(line, input)
        })
        .await?;

        info!(%line, image = %created.id, order = created.order, "added product image");
        Ok(created)
    }

    async fn images_for_line(&self, line: ProductLineId) -> Result<Vec<ProductImage>> {
        let rows: Vec<ProductImageRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_IMAGE_COLUMNS} FROM product_images \
             WHERE product_line_id = $1 ORDER BY \"order\", id"
        ))
        .bind(line.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "list product images"))?;

        Ok(rows.into_iter().map(ProductImage::from).collect())
    }

    async fn delete_image(&self, id: ProductImageId) -> Result<()> {
        let result = sqlx::query("DELETE FROM product_images WHERE id = $1")
            .bind(id.get())
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "delete product image"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("product image", id));
        }
        Ok(())
    }

    async fn bind_value(
        &self,
        line: ProductLineId,
        value: AttributeValueId,
    ) -> Result<ProductLineAttributeValue> {
        let mut tx = self.begin("begin product line binding").await?;
        Self::lock_line(&mut tx, line).await?;

        let candidate: Option<AttributeValueRow> = sqlx::query_as(&format!(
            "SELECT {ATTRIBUTE_VALUE_COLUMNS} FROM attribute_values WHERE id = $1"
        ))
        .bind(value.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "load attribute value"))?;
        let candidate: AttributeValue = candidate
            .map(AttributeValue::from)
            .ok_or(ValidationError::UnknownReference {
                entity: "attribute value",
                field: "attribute_value",
            })?;

        let bound: Vec<LineBindingRow> = sqlx::query_as(
            r#"
            SELECT plav.id AS binding_id,
                   av.id, av.value, av.attribute_id, av.created_at, av.updated_at
            FROM product_line_attribute_values plav
            JOIN attribute_values av ON av.id = plav.attribute_value_id
            WHERE plav.product_line_id = $1
            "#,
        )
        .bind(line.get())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "load product line bindings"))?;

        let mut binding_ids = Vec::with_capacity(bound.len());
        let mut existing = Vec::with_capacity(bound.len());
        for row in bound {
            binding_ids.push(row.binding_id);
            existing.push(AttributeValue::from(row.value));
        }

        if check_line_binding(line, &existing, &candidate)? == BindingDecision::AlreadyBound {
            debug!(%line, %value, "attribute value already bound to product line");
            let position = existing
                .iter()
                .position(|bound| bound.id == value)
                .ok_or_else(|| CatalogError::Internal("binding vanished under lock".into()))?;
            return Ok(ProductLineAttributeValue {
                id: BindingId(binding_ids[position]),
                product_line_id: line,
                attribute_value_id: value,
            });
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product_line_attribute_values (product_line_id, attribute_value_id) \
             VALUES ($1, $2) RETURNING id",
        )
        .bind(line.get())
        .bind(value.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "bind product line attribute value"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "commit product line binding"))?;

        info!(%line, %value, "bound attribute value to product line");
        Ok(ProductLineAttributeValue {
            id: BindingId(id),
            product_line_id: line,
            attribute_value_id: value,
        })
    }

    async fn unbind_value(&self, line: ProductLineId, value: AttributeValueId) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM product_line_attribute_values \
             WHERE product_line_id = $1 AND attribute_value_id = $2",
        )
        .bind(line.get())
        .bind(value.get())
        .execute(self.pool())
        .await
        .map_err(|e| storage_error(e, "unbind product line attribute value"))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(
                "product line attribute value",
                format!("{line}/{value}"),
            ));
        }
        Ok(())
    }

    async fn values_for_line(&self, line: ProductLineId) -> Result<Vec<AttributeValueDetail>> {
        let rows: Vec<AttributeValueDetailRow> = sqlx::query_as(
            r#"
            SELECT av.id, av.value, av.attribute_id, pa.name AS attribute_name
            FROM product_line_attribute_values plav
            JOIN attribute_values av ON av.id = plav.attribute_value_id
            JOIN product_attributes pa ON pa.id = av.attribute_id
            WHERE plav.product_line_id = $1
            ORDER BY pa.name, av.id
            "#,
        )
        .bind(line.get())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "load product line attribute values"))?;

        Ok(rows.into_iter().map(AttributeValueDetail::from).collect())
    }
}
