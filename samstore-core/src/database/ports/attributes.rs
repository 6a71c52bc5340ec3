use async_trait::async_trait;
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, NewAttributeValue,
    NewProductAttribute, ProductAttribute, ProductAttributeId,
};

use crate::error::Result;

#[async_trait]
pub trait AttributesRepository: Send + Sync {
    async fn create_attribute(&self, attribute: NewProductAttribute) -> Result<ProductAttribute>;

    async fn get_attribute(&self, id: ProductAttributeId) -> Result<Option<ProductAttribute>>;

    /// All attribute kinds ordered by name.
    async fn list_attributes(&self) -> Result<Vec<ProductAttribute>>;

    /// Delete an attribute kind along with its values and their bindings.
    async fn delete_attribute(&self, id: ProductAttributeId) -> Result<()>;

    async fn create_value(
        &self,
        attribute: ProductAttributeId,
        value: NewAttributeValue,
    ) -> Result<AttributeValue>;

    async fn get_value(&self, id: AttributeValueId) -> Result<Option<AttributeValueDetail>>;

    async fn values_for_attribute(&self, attribute: ProductAttributeId)
    -> Result<Vec<AttributeValue>>;
}
