use async_trait::async_trait;
use samstore_model::{
    NewProductType, ProductAttribute, ProductAttributeId, ProductType, ProductTypeAttribute,
    ProductTypeId,
};

use crate::error::Result;

#[async_trait]
pub trait ProductTypesRepository: Send + Sync {
    async fn create(&self, product_type: NewProductType) -> Result<ProductType>;

    async fn get(&self, id: ProductTypeId) -> Result<Option<ProductType>>;

    /// All product types ordered by name.
    async fn list(&self) -> Result<Vec<ProductType>>;

    /// Move a product type under `parent`, rejecting cycles.
    async fn set_parent(
        &self,
        id: ProductTypeId,
        parent: Option<ProductTypeId>,
    ) -> Result<ProductType>;

    /// Delete a product type. Blocked while products, lines or child types
    /// reference it.
    async fn delete(&self, id: ProductTypeId) -> Result<()>;

    /// Declare that `attribute` applies to `product_type`. Declaring the same
    /// pair again returns the existing row.
    async fn declare_attribute(
        &self,
        product_type: ProductTypeId,
        attribute: ProductAttributeId,
    ) -> Result<ProductTypeAttribute>;

    /// Attribute kinds declared on `product_type`, ordered by name.
    async fn attributes_for(&self, product_type: ProductTypeId) -> Result<Vec<ProductAttribute>>;
}
