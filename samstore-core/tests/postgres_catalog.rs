#![cfg(feature = "postgres-tests")]

use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use samstore_core::application::AppUnitOfWork;
use samstore_core::database::PostgresDatabase;
use samstore_core::services::{AttributeService, CatalogService, CategoryService, ProductService};
use samstore_core::{CatalogError, ValidationError};
use samstore_model::{
    NewAttributeValue, NewCategory, NewProduct, NewProductAttribute, NewProductImage,
    NewProductLine, NewProductType,
};
use sqlx::PgPool;

fn unit_of_work(pool: PgPool) -> AppUnitOfWork {
    let db = PostgresDatabase::from_pool(pool);
    AppUnitOfWork::from_postgres(&db)
}

fn active(name: &str, slug: &str) -> NewProduct {
    let mut input = NewProduct::new(name, slug);
    input.active = true;
    input
}

fn line(sku: &str) -> NewProductLine {
    NewProductLine::new(Decimal::new(1999, 2), sku, 5)
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn category_tree_is_protected(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let categories = CategoryService::new(uow.categories.clone());

    let root = categories.create(NewCategory::new("category_0", "category_0")).await?;
    let child = categories
        .create(NewCategory::new("category_1", "category_1").with_parent(root.id))
        .await?;
    let grandchild = categories
        .create(NewCategory::new("category_2", "category_2").with_parent(child.id))
        .await?;

    let ancestors = categories.ancestors(grandchild.id).await?;
    let names: Vec<&str> = ancestors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["category_0", "category_1"]);

    let descendants = categories.descendants(root.id).await?;
    assert_eq!(descendants.len(), 2);

    let err = categories.reparent(root.id, Some(grandchild.id)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Cycle { .. }));

    let err = categories.delete(root.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::ReferentialIntegrity { .. }));

    categories.delete(grandchild.id).await?;
    categories.delete(child.id).await?;
    categories.delete(root.id).await?;
    assert!(categories.list().await?.is_empty());
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn duplicate_category_slug_is_reported(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let categories = CategoryService::new(uow.categories.clone());

    categories.create(NewCategory::new("Shoes", "shoes")).await?;
    let err = categories
        .create(NewCategory::new("Other shoes", "shoes"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::DuplicateValue { field: "slug", .. })
    ));
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn line_orders_are_derived_per_product(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let products = ProductService::new(uow.products.clone(), uow.product_lines.clone());

    let boot = products.create(active("Boot", "boot")).await?;
    let hat = products.create(active("Hat", "hat")).await?;

    let first = products.add_line(boot.id, line("BOOT-1")).await?;
    let second = products.add_line(boot.id, line("BOOT-2")).await?;
    let other = products.add_line(hat.id, line("HAT-1")).await?;
    assert_eq!((first.order, second.order, other.order), (1, 2, 1));

    let err = products
        .add_line(boot.id, line("BOOT-3").with_order(2))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::DuplicateOrder { order: 2, .. })
    ));

    let image_orders = {
        let mut orders = Vec::new();
        for n in 0..3 {
            let image = products
                .add_image(first.id, NewProductImage::new(format!("{n}.jpg"), "boot"))
                .await?;
            orders.push(image.order);
        }
        orders
    };
    assert_eq!(image_orders, [1, 2, 3]);
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn concurrent_line_inserts_get_distinct_orders(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let products = Arc::new(ProductService::new(
        uow.products.clone(),
        uow.product_lines.clone(),
    ));
    let boot = products.create(active("Boot", "boot")).await?;

    let mut handles = Vec::new();
    for n in 0..8 {
        let products = Arc::clone(&products);
        handles.push(tokio::spawn(async move {
            products.add_line(boot.id, line(&format!("BOOT-{n}"))).await
        }));
    }

    let mut orders = Vec::new();
    for handle in handles {
        orders.push(handle.await??.order);
    }
    orders.sort_unstable();
    assert_eq!(orders, (1..=8).collect::<Vec<_>>());
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn line_holds_one_value_per_attribute_kind(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let products = ProductService::new(uow.products.clone(), uow.product_lines.clone());
    let attributes = AttributeService::new(uow.attributes.clone(), uow.product_types.clone());

    let color = attributes.create_attribute(NewProductAttribute::new("color")).await?;
    let red = attributes.create_value(color.id, NewAttributeValue::new("red")).await?;
    let blue = attributes.create_value(color.id, NewAttributeValue::new("blue")).await?;

    let boot = products.create(active("Boot", "boot")).await?;
    let boot_line = products.add_line(boot.id, line("BOOT-1")).await?;

    let first = products.bind_line_value(boot_line.id, red.id).await?;
    let again = products.bind_line_value(boot_line.id, red.id).await?;
    assert_eq!(first, again);

    let err = products
        .bind_line_value(boot_line.id, blue.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::DuplicateAttribute { .. })
    ));
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn product_detail_is_assembled_in_bulk(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let categories = CategoryService::new(uow.categories.clone());
    let products = ProductService::new(uow.products.clone(), uow.product_lines.clone());
    let attributes = AttributeService::new(uow.attributes.clone(), uow.product_types.clone());
    let catalog = CatalogService::new(uow.catalog.clone());

    let shoes = categories.create(NewCategory::new("Shoes", "shoes")).await?;
    let boots = attributes.create_product_type(NewProductType::new("boots")).await?;
    let color = attributes.create_attribute(NewProductAttribute::new("color")).await?;
    let size = attributes.create_attribute(NewProductAttribute::new("size")).await?;
    attributes.declare_attribute(boots.id, color.id).await?;
    attributes.declare_attribute(boots.id, color.id).await?;
    let red = attributes.create_value(color.id, NewAttributeValue::new("red")).await?;

    let boot = products
        .create(active("Boot", "boot").in_category(shoes.id).of_type(boots.id))
        .await?;
    let lead = products.add_line(boot.id, line("BOOT-1")).await?;
    products.add_line(boot.id, line("BOOT-2")).await?;
    products.bind_line_value(lead.id, red.id).await?;
    products
        .add_image(lead.id, NewProductImage::new("front.jpg", "front"))
        .await?;

    let view = catalog.product_detail("boot").await?;
    assert_eq!(view.category_name.as_deref(), Some("Shoes"));
    assert_eq!(view.product_line.len(), 2);
    assert_eq!(view.product_line[0].order, 1);
    assert_eq!(view.product_line[0].images.len(), 1);
    assert_eq!(
        view.product_line[0].specification.keys().copied().collect::<Vec<_>>(),
        [color.id]
    );
    assert_eq!(
        view.type_specification.keys().copied().collect::<Vec<_>>(),
        [color.id]
    );
    assert!(!view.type_specification.contains_key(&size.id));

    let cards = catalog.products_by_category("shoes").await?;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].price, Some(Decimal::new(1999, 2)));
    assert_eq!(cards[0].image.as_ref().map(Vec::len), Some(1));

    assert!(catalog.products_by_category("hats").await?.is_empty());
    catalog.health_check().await?;
    Ok(())
}

#[sqlx::test(migrator = "samstore_core::MIGRATOR")]
async fn deleting_a_product_removes_its_lines(pool: PgPool) -> Result<()> {
    let uow = unit_of_work(pool);
    let products = ProductService::new(uow.products.clone(), uow.product_lines.clone());

    let boot = products.create(active("Boot", "boot")).await?;
    let boot_line = products.add_line(boot.id, line("BOOT-1")).await?;
    products
        .add_image(boot_line.id, NewProductImage::new("front.jpg", "front"))
        .await?;

    products.delete(boot.id).await?;
    assert!(products.get_line(boot_line.id).await.unwrap_err().is_not_found());
    assert!(products.delete(boot.id).await.unwrap_err().is_not_found());
    Ok(())
}
