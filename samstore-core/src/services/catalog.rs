//! Read-side catalog queries.
//!
//! Each request level is fetched in one batch keyed by the ids of the
//! level above, then shaped by [`crate::catalog::aggregate`].

use std::{any::type_name_of_val, fmt, sync::Arc};

use samstore_model::{CategoryView, ProductId, ProductLineId, ProductSummary, ProductTypeId, ProductView};
use tracing::debug;

use crate::catalog::aggregate::{self, DetailRows};
use crate::database::ports::catalog::CatalogReadPort;
use crate::error::{CatalogError, Result};

#[derive(Clone)]
pub struct CatalogService {
    reader: Arc<dyn CatalogReadPort>,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("reader", &type_name_of_val(self.reader.as_ref()))
            .finish()
    }
}

impl CatalogService {
    pub fn new(reader: Arc<dyn CatalogReadPort>) -> Self {
        Self { reader }
    }

    /// Detail views of every active product with `slug`. Slugs are not
    /// unique, so more than one product may match.
    pub async fn product_details(&self, slug: &str) -> Result<Vec<ProductView>> {
        let products = self.reader.active_products_by_slug(slug).await?;
        if products.is_empty() {
            return Err(CatalogError::not_found("product", slug));
        }

        let product_ids: Vec<ProductId> = products.iter().map(|p| p.product.id).collect();
        let mut type_ids: Vec<ProductTypeId> = products
            .iter()
            .filter_map(|p| p.product.product_type_id)
            .collect();
        type_ids.sort_unstable();
        type_ids.dedup();

        let lines = self.reader.lines_for_products(&product_ids).await?;
        let line_ids: Vec<ProductLineId> = lines.iter().map(|line| line.id).collect();
        let images = self.reader.images_for_lines(&line_ids).await?;
        let line_values = self.reader.line_values_for_lines(&line_ids).await?;
        let type_attributes = self.reader.type_attributes(&type_ids).await?;

        debug!(
            slug,
            products = products.len(),
            lines = lines.len(),
            images = images.len(),
            "assembled product detail"
        );

        Ok(aggregate::product_views(&DetailRows {
            products,
            lines,
            images,
            line_values,
            type_attributes,
        }))
    }

    /// The first active product with `slug`.
    pub async fn product_detail(&self, slug: &str) -> Result<ProductView> {
        self.product_details(slug)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found("product", slug))
    }

    /// Listing cards for the active products of a category. An unknown
    /// category yields an empty list.
    pub async fn products_by_category(&self, category_slug: &str) -> Result<Vec<ProductSummary>> {
        let products = self.reader.active_products_in_category(category_slug).await?;
        let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        let lines = self.reader.lead_lines(&product_ids).await?;
        let line_ids: Vec<ProductLineId> = lines.iter().map(|line| line.id).collect();
        let images = self.reader.lead_images(&line_ids).await?;

        debug!(category_slug, products = products.len(), "assembled category listing");
        Ok(aggregate::product_summaries(&products, &lines, &images))
    }

    pub async fn category_list(&self) -> Result<Vec<CategoryView>> {
        let categories = self.reader.categories().await?;
        Ok(aggregate::category_views(&categories))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.reader.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppUnitOfWork;
    use rust_decimal::Decimal;
    use samstore_model::{
        NewAttributeValue, NewCategory, NewProduct, NewProductAttribute, NewProductImage,
        NewProductLine, NewProductType, ProductAttributeId,
    };

    fn catalog(uow: &AppUnitOfWork) -> CatalogService {
        CatalogService::new(uow.catalog.clone())
    }

    async fn active_product(uow: &AppUnitOfWork, input: NewProduct) -> samstore_model::Product {
        let mut input = input;
        input.active = true;
        uow.products.create(input).await.unwrap()
    }

    #[tokio::test]
    async fn specification_keys_follow_bindings_and_declarations() {
        let uow = AppUnitOfWork::in_memory();
        let color = uow
            .attributes
            .create_attribute(NewProductAttribute::new("color"))
            .await
            .unwrap();
        let size = uow
            .attributes
            .create_attribute(NewProductAttribute::new("size"))
            .await
            .unwrap();
        let material = uow
            .attributes
            .create_attribute(NewProductAttribute::new("material"))
            .await
            .unwrap();
        let red = uow
            .attributes
            .create_value(color.id, NewAttributeValue::new("red"))
            .await
            .unwrap();
        let large = uow
            .attributes
            .create_value(size.id, NewAttributeValue::new("L"))
            .await
            .unwrap();

        let boots = uow
            .product_types
            .create(NewProductType::new("boots"))
            .await
            .unwrap();
        uow.product_types
            .declare_attribute(boots.id, color.id)
            .await
            .unwrap();
        uow.product_types
            .declare_attribute(boots.id, material.id)
            .await
            .unwrap();

        let category = uow
            .categories
            .create(NewCategory::new("Shoes", "shoes"))
            .await
            .unwrap();
        let product = active_product(
            &uow,
            NewProduct::new("Boot", "boot")
                .in_category(category.id)
                .of_type(boots.id),
        )
        .await;
        let line = uow
            .product_lines
            .create(product.id, NewProductLine::new(Decimal::new(4999, 2), "BOOT-1", 3))
            .await
            .unwrap();
        uow.product_lines.bind_value(line.id, red.id).await.unwrap();
        uow.product_lines.bind_value(line.id, large.id).await.unwrap();

        let view = catalog(&uow).product_detail("boot").await.unwrap();
        assert_eq!(view.category_name.as_deref(), Some("Shoes"));

        let spec_keys: Vec<ProductAttributeId> =
            view.product_line[0].specification.keys().copied().collect();
        let mut expected = vec![color.id, size.id];
        expected.sort();
        assert_eq!(spec_keys, expected);
        assert_eq!(view.product_line[0].specification[&color.id], "red");

        let type_keys: Vec<ProductAttributeId> =
            view.type_specification.keys().copied().collect();
        let mut expected = vec![color.id, material.id];
        expected.sort();
        assert_eq!(type_keys, expected);
        assert_eq!(view.type_specification[&material.id], "material");
    }

    #[tokio::test]
    async fn detail_orders_lines_and_images() {
        let uow = AppUnitOfWork::in_memory();
        let product = active_product(&uow, NewProduct::new("Boot", "boot")).await;
        let second = uow
            .product_lines
            .create(product.id, NewProductLine::new(Decimal::ONE, "B", 1).with_order(2))
            .await
            .unwrap();
        uow.product_lines
            .create(product.id, NewProductLine::new(Decimal::ONE, "A", 1).with_order(1))
            .await
            .unwrap();
        for url in ["one.jpg", "two.jpg"] {
            uow.product_lines
                .add_image(second.id, NewProductImage::new(url, url))
                .await
                .unwrap();
        }

        let view = catalog(&uow).product_detail("boot").await.unwrap();
        let skus: Vec<&str> = view.product_line.iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, ["A", "B"]);
        assert!(view.product_line[0].images.is_empty());
        let images: Vec<i32> = view.product_line[1].images.iter().map(|i| i.order).collect();
        assert_eq!(images, [1, 2]);
        assert!(view.type_specification.is_empty());
    }

    #[tokio::test]
    async fn inactive_product_is_not_found() {
        let uow = AppUnitOfWork::in_memory();
        let mut draft = NewProduct::new("Boot", "boot");
        draft.active = false;
        uow.products.create(draft).await.unwrap();

        let err = catalog(&uow).product_detail("boot").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn category_cards_use_lead_line_and_image() {
        let uow = AppUnitOfWork::in_memory();
        let category = uow
            .categories
            .create(NewCategory::new("Shoes", "shoes"))
            .await
            .unwrap();
        let boot = active_product(&uow, NewProduct::new("Boot", "boot").in_category(category.id)).await;
        let clog = active_product(&uow, NewProduct::new("Clog", "clog").in_category(category.id)).await;
        active_product(&uow, NewProduct::new("Apron", "apron").in_category(category.id)).await;

        let lead = uow
            .product_lines
            .create(boot.id, NewProductLine::new(Decimal::new(1000, 2), "BOOT-1", 1))
            .await
            .unwrap();
        uow.product_lines
            .create(boot.id, NewProductLine::new(Decimal::new(2000, 2), "BOOT-2", 1))
            .await
            .unwrap();
        uow.product_lines
            .add_image(lead.id, NewProductImage::new("front.jpg", "front"))
            .await
            .unwrap();
        uow.product_lines
            .add_image(lead.id, NewProductImage::new("back.jpg", "back"))
            .await
            .unwrap();
        uow.product_lines
            .create(clog.id, NewProductLine::new(Decimal::new(500, 2), "CLOG-1", 1))
            .await
            .unwrap();

        let cards = catalog(&uow).products_by_category("shoes").await.unwrap();
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Apron", "Boot", "Clog"]);

        assert_eq!(cards[0].price, None);
        assert_eq!(cards[0].image, None);

        assert_eq!(cards[1].price, Some(Decimal::new(1000, 2)));
        let image = cards[1].image.as_ref().unwrap();
        assert_eq!(image.len(), 1);
        assert_eq!(image[0].image_url, "front.jpg");

        assert_eq!(cards[2].image, Some(vec![]));
    }

    #[tokio::test]
    async fn unknown_category_lists_nothing() {
        let uow = AppUnitOfWork::in_memory();
        let cards = catalog(&uow).products_by_category("nope").await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn category_list_is_sorted_by_name() {
        let uow = AppUnitOfWork::in_memory();
        let shoes = uow
            .categories
            .create(NewCategory::new("Shoes", "shoes"))
            .await
            .unwrap();
        uow.categories
            .create(NewCategory::new("Boots", "boots").with_parent(shoes.id))
            .await
            .unwrap();

        let list = catalog(&uow).category_list().await.unwrap();
        assert_eq!(list[0].name, "Boots");
        assert_eq!(list[0].parent, Some(shoes.id));
        assert_eq!(list[1].parent, None);
    }
}
