use async_trait::async_trait;
use samstore_model::{
    AttributeValueDetail, AttributeValueId, NewProductImage, NewProductLine, ProductId,
    ProductImage, ProductImageId, ProductLine, ProductLineAttributeValue, ProductLineId,
    ProductLineUpdate,
};

use crate::error::Result;

#[async_trait]
pub trait ProductLinesRepository: Send + Sync {
    /// Insert a line under `product`, deriving its order when none is given.
    async fn create(&self, product: ProductId, line: NewProductLine) -> Result<ProductLine>;

    async fn get(&self, id: ProductLineId) -> Result<Option<ProductLine>>;

    /// Lines of `product` by order.
    async fn list_for_product(&self, product: ProductId) -> Result<Vec<ProductLine>>;

    /// Replace the editable fields of a line. A changed order must stay
    /// unique among the product's other lines.
    async fn update(&self, id: ProductLineId, update: ProductLineUpdate) -> Result<ProductLine>;

    async fn delete(&self, id: ProductLineId) -> Result<()>;

    /// Attach an image, deriving its order when none is given.
    async fn add_image(&self, line: ProductLineId, image: NewProductImage) -> Result<ProductImage>;

    /// Images of `line` by order.
    async fn images_for_line(&self, line: ProductLineId) -> Result<Vec<ProductImage>>;

    async fn delete_image(&self, id: ProductImageId) -> Result<()>;

    /// Bind a value to a line: the exact pair again is a no-op, a second
    /// value of the same attribute kind is rejected.
    async fn bind_value(
        &self,
        line: ProductLineId,
        value: AttributeValueId,
    ) -> Result<ProductLineAttributeValue>;

    async fn unbind_value(&self, line: ProductLineId, value: AttributeValueId) -> Result<()>;

    async fn values_for_line(&self, line: ProductLineId) -> Result<Vec<AttributeValueDetail>>;
}
