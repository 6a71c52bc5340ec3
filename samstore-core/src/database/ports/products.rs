use async_trait::async_trait;
use samstore_model::{
    AttributeValueDetail, AttributeValueId, NewProduct, Product, ProductAttributeValue,
    ProductId, ProductUpdate,
};

use crate::error::Result;

#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Insert a product with a freshly generated uuid.
    async fn create(&self, product: NewProduct) -> Result<Product>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Active products ordered by name.
    async fn list_active(&self) -> Result<Vec<Product>>;

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product>;

    /// Delete a product together with its lines, images and bindings.
    async fn delete(&self, id: ProductId) -> Result<()>;

    /// Bind an attribute value to a product. Binding an already bound value
    /// returns the existing row.
    async fn bind_value(
        &self,
        product: ProductId,
        value: AttributeValueId,
    ) -> Result<ProductAttributeValue>;

    async fn unbind_value(&self, product: ProductId, value: AttributeValueId) -> Result<()>;

    async fn values_for_product(&self, product: ProductId) -> Result<Vec<AttributeValueDetail>>;
}
