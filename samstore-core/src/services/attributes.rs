use std::{any::type_name_of_val, fmt, sync::Arc};

use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, NewAttributeValue,
    NewProductAttribute, NewProductType, ProductAttribute, ProductAttributeId, ProductType,
    ProductTypeAttribute, ProductTypeId,
};
use tracing::info;

use crate::database::ports::{
    attributes::AttributesRepository, product_types::ProductTypesRepository,
};
use crate::error::{CatalogError, Result};

/// Attribute kinds, their values, and the product types that declare them.
#[derive(Clone)]
pub struct AttributeService {
    attributes: Arc<dyn AttributesRepository>,
    product_types: Arc<dyn ProductTypesRepository>,
}

impl fmt::Debug for AttributeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeService")
            .field("attributes", &type_name_of_val(self.attributes.as_ref()))
            .field(
                "product_types",
                &type_name_of_val(self.product_types.as_ref()),
            )
            .finish()
    }
}

impl AttributeService {
    pub fn new(
        attributes: Arc<dyn AttributesRepository>,
        product_types: Arc<dyn ProductTypesRepository>,
    ) -> Self {
        Self {
            attributes,
            product_types,
        }
    }

    pub async fn create_attribute(&self, input: NewProductAttribute) -> Result<ProductAttribute> {
        input.validate()?;
        self.attributes.create_attribute(input).await
    }

    pub async fn get_attribute(&self, id: ProductAttributeId) -> Result<ProductAttribute> {
        self.attributes
            .get_attribute(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("attribute", id))
    }

    pub async fn list_attributes(&self) -> Result<Vec<ProductAttribute>> {
        self.attributes.list_attributes().await
    }

    /// Deleting a kind removes its values and every binding of them.
    pub async fn delete_attribute(&self, id: ProductAttributeId) -> Result<()> {
        self.attributes.delete_attribute(id).await
    }

    pub async fn create_value(
        &self,
        attribute: ProductAttributeId,
        input: NewAttributeValue,
    ) -> Result<AttributeValue> {
        input.validate()?;
        self.attributes.create_value(attribute, input).await
    }

    pub async fn get_value(&self, id: AttributeValueId) -> Result<AttributeValueDetail> {
        self.attributes
            .get_value(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("attribute value", id))
    }

    pub async fn values(&self, attribute: ProductAttributeId) -> Result<Vec<AttributeValue>> {
        self.get_attribute(attribute).await?;
        self.attributes.values_for_attribute(attribute).await
    }

    pub async fn create_product_type(&self, input: NewProductType) -> Result<ProductType> {
        input.validate()?;
        self.product_types.create(input).await
    }

    pub async fn get_product_type(&self, id: ProductTypeId) -> Result<ProductType> {
        self.product_types
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("product type", id))
    }

    pub async fn list_product_types(&self) -> Result<Vec<ProductType>> {
        self.product_types.list().await
    }

    /// Move a product type under `parent`, or to the root with `None`.
    pub async fn set_product_type_parent(
        &self,
        id: ProductTypeId,
        parent: Option<ProductTypeId>,
    ) -> Result<ProductType> {
        let moved = self.product_types.set_parent(id, parent).await?;
        info!(product_type = %id, parent = ?parent.map(|p| p.get()), "product type moved");
        Ok(moved)
    }

    pub async fn delete_product_type(&self, id: ProductTypeId) -> Result<()> {
        self.product_types.delete(id).await
    }

    pub async fn declare_attribute(
        &self,
        product_type: ProductTypeId,
        attribute: ProductAttributeId,
    ) -> Result<ProductTypeAttribute> {
        self.product_types
            .declare_attribute(product_type, attribute)
            .await
    }

    pub async fn type_attributes(&self, product_type: ProductTypeId) -> Result<Vec<ProductAttribute>> {
        self.get_product_type(product_type).await?;
        self.product_types.attributes_for(product_type).await
    }
}
