use std::{any::type_name_of_val, fmt, sync::Arc};

use samstore_model::{
    AttributeValueDetail, AttributeValueId, NewProduct, NewProductImage, NewProductLine,
    Product, ProductAttributeValue, ProductId, ProductImage, ProductImageId, ProductLine,
    ProductLineAttributeValue, ProductLineId, ProductLineUpdate, ProductUpdate,
};
use tracing::info;

use crate::database::ports::{
    product_lines::ProductLinesRepository, products::ProductsRepository,
};
use crate::error::{CatalogError, Result};

/// Products, their lines and images, and the values bound to them.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductsRepository>,
    lines: Arc<dyn ProductLinesRepository>,
}

impl fmt::Debug for ProductService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductService")
            .field("products", &type_name_of_val(self.products.as_ref()))
            .field("lines", &type_name_of_val(self.lines.as_ref()))
            .finish()
    }
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductsRepository>,
        lines: Arc<dyn ProductLinesRepository>,
    ) -> Self {
        Self { products, lines }
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product> {
        input.validate()?;
        let product = self.products.create(input).await?;
        info!(product = %product.id, name = %product, "product created");
        Ok(product)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product", id))
    }

    pub async fn list_active(&self) -> Result<Vec<Product>> {
        self.products.list_active().await
    }

    pub async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        update.validate()?;
        self.products.update(id, update).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.products.delete(id).await?;
        info!(product = %id, "product deleted");
        Ok(())
    }

    /// Add a line to `product`. Without an explicit order the line goes
    /// after the product's current last line.
    pub async fn add_line(&self, product: ProductId, input: NewProductLine) -> Result<ProductLine> {
        input.validate()?;
        let line = self.lines.create(product, input).await?;
        info!(%product, line = %line.id, sku = %line, order = line.order, "product line added");
        Ok(line)
    }

    pub async fn lines(&self, product: ProductId) -> Result<Vec<ProductLine>> {
        self.get(product).await?;
        self.lines.list_for_product(product).await
    }

    pub async fn get_line(&self, id: ProductLineId) -> Result<ProductLine> {
        self.lines
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product line", id))
    }

    pub async fn update_line(
        &self,
        id: ProductLineId,
        update: ProductLineUpdate,
    ) -> Result<ProductLine> {
        update.validate()?;
        self.lines.update(id, update).await
    }

    pub async fn delete_line(&self, id: ProductLineId) -> Result<()> {
        self.lines.delete(id).await
    }

    pub async fn add_image(
        &self,
        line: ProductLineId,
        input: NewProductImage,
    ) -> Result<ProductImage> {
        input.validate()?;
        let image = self.lines.add_image(line, input).await?;
        info!(%line, image = %image.id, order = image.order, "product image added");
        Ok(image)
    }

    pub async fn images(&self, line: ProductLineId) -> Result<Vec<ProductImage>> {
        self.get_line(line).await?;
        self.lines.images_for_line(line).await
    }

    pub async fn delete_image(&self, id: ProductImageId) -> Result<()> {
        self.lines.delete_image(id).await
    }

    pub async fn bind_product_value(
        &self,
        product: ProductId,
        value: AttributeValueId,
    ) -> Result<ProductAttributeValue> {
        self.products.bind_value(product, value).await
    }

    pub async fn unbind_product_value(
        &self,
        product: ProductId,
        value: AttributeValueId,
    ) -> Result<()> {
        self.products.unbind_value(product, value).await
    }

    pub async fn product_values(&self, product: ProductId) -> Result<Vec<AttributeValueDetail>> {
        self.get(product).await?;
        self.products.values_for_product(product).await
    }

    /// Bind a value to a line. Rebinding the same value is a no-op; a
    /// second value of an attribute kind the line already has is rejected.
    pub async fn bind_line_value(
        &self,
        line: ProductLineId,
        value: AttributeValueId,
    ) -> Result<ProductLineAttributeValue> {
        self.lines.bind_value(line, value).await
    }

    pub async fn unbind_line_value(&self, line: ProductLineId, value: AttributeValueId) -> Result<()> {
        self.lines.unbind_value(line, value).await
    }

    pub async fn line_values(&self, line: ProductLineId) -> Result<Vec<AttributeValueDetail>> {
        self.get_line(line).await?;
        self.lines.values_for_line(line).await
    }
}
