//! Bulk read port behind the catalog aggregate.
//!
//! Every method takes the full set of owner ids for one request level so a
//! response costs one query per nested collection, never one per row.

use async_trait::async_trait;
use samstore_model::{
    Category, Product, ProductId, ProductImage, ProductLine, ProductLineId, ProductTypeId,
};

use crate::catalog::aggregate::{LineAttributeValue, ProductWithCategory, TypeAttribute};
use crate::error::Result;

#[async_trait]
pub trait CatalogReadPort: Send + Sync {
    /// Active products with this slug, with their category names.
    async fn active_products_by_slug(&self, slug: &str) -> Result<Vec<ProductWithCategory>>;

    /// Active products whose category has this slug, ordered by name.
    async fn active_products_in_category(&self, category_slug: &str) -> Result<Vec<Product>>;

    async fn lines_for_products(&self, products: &[ProductId]) -> Result<Vec<ProductLine>>;

    async fn images_for_lines(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>>;

    async fn line_values_for_lines(
        &self,
        lines: &[ProductLineId],
    ) -> Result<Vec<LineAttributeValue>>;

    async fn type_attributes(&self, types: &[ProductTypeId]) -> Result<Vec<TypeAttribute>>;

    /// The lowest-ordered line of each product that has one.
    async fn lead_lines(&self, products: &[ProductId]) -> Result<Vec<ProductLine>>;

    /// The lowest-ordered image of each line that has one.
    async fn lead_images(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>>;

    /// Every category, ordered by name.
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Round-trip to the store.
    async fn health_check(&self) -> Result<()>;
}
