//! Read-side composition of catalog rows into response views.
//!
//! Stores hand over flat, bulk-fetched rows (one batch per nested
//! collection); the functions here group them by owner and build the
//! nested shapes. Nothing in this module touches storage.

use std::collections::{BTreeMap, HashMap};

use samstore_model::{
    AttributeValueDetail, Category, CategoryView, Product, ProductAttribute,
    ProductId, ProductImage, ProductImageView, ProductLine, ProductLineId,
    ProductLineView, ProductSummary, ProductTypeId, ProductView,
};

/// A product together with the name of its category, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category_name: Option<String>,
}

/// A value bound to a product line, joined with its attribute kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAttributeValue {
    pub product_line_id: ProductLineId,
    pub value: AttributeValueDetail,
}

/// An attribute kind declared on a product type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAttribute {
    pub product_type_id: ProductTypeId,
    pub attribute: ProductAttribute,
}

/// Everything needed to render the detail view of a set of products.
#[derive(Debug, Default)]
pub struct DetailRows {
    pub products: Vec<ProductWithCategory>,
    pub lines: Vec<ProductLine>,
    pub images: Vec<ProductImage>,
    pub line_values: Vec<LineAttributeValue>,
    pub type_attributes: Vec<TypeAttribute>,
}

fn image_views(images: &[&ProductImage]) -> Vec<ProductImageView> {
    let mut sorted = images.to_vec();
    sorted.sort_by_key(|image| (image.order, image.id));
    sorted.into_iter().map(ProductImageView::from).collect()
}

pub fn product_views(rows: &DetailRows) -> Vec<ProductView> {
    let mut lines_by_product: HashMap<ProductId, Vec<&ProductLine>> = HashMap::new();
    for line in &rows.lines {
        lines_by_product.entry(line.product_id).or_default().push(line);
    }

    let mut images_by_line: HashMap<ProductLineId, Vec<&ProductImage>> = HashMap::new();
    for image in &rows.images {
        images_by_line
            .entry(image.product_line_id)
            .or_default()
            .push(image);
    }

    let mut specification_by_line: HashMap<ProductLineId, BTreeMap<_, String>> =
        HashMap::new();
    for bound in &rows.line_values {
        specification_by_line
            .entry(bound.product_line_id)
            .or_default()
            .insert(bound.value.attribute_id, bound.value.value.clone());
    }

    let mut attributes_by_type: HashMap<ProductTypeId, BTreeMap<_, String>> =
        HashMap::new();
    for declared in &rows.type_attributes {
        attributes_by_type
            .entry(declared.product_type_id)
            .or_default()
            .insert(declared.attribute.id, declared.attribute.name.clone());
    }

    let mut products: Vec<&ProductWithCategory> = rows.products.iter().collect();
    products.sort_by_key(|row| row.product.id);

    products
        .into_iter()
        .map(|row| {
            let product = &row.product;
            let mut lines = lines_by_product
                .get(&product.id)
                .cloned()
                .unwrap_or_default();
            lines.sort_by_key(|line| (line.order, line.id));

            let product_line = lines
                .into_iter()
                .map(|line| ProductLineView {
                    price: line.price,
                    sku: line.sku.clone(),
                    stock_qty: line.stock_qty,
                    order: line.order,
                    images: images_by_line
                        .get(&line.id)
                        .map(|images| image_views(images))
                        .unwrap_or_default(),
                    specification: specification_by_line
                        .get(&line.id)
                        .cloned()
                        .unwrap_or_default(),
                })
                .collect();

            let type_specification = product
                .product_type_id
                .and_then(|id| attributes_by_type.get(&id).cloned())
                .unwrap_or_default();

            ProductView {
                name: product.name.clone(),
                slug: product.slug.clone(),
                description: product.description.clone(),
                category_name: row.category_name.clone(),
                product_line,
                type_specification,
            }
        })
        .collect()
}

/// Category listing cards.
///
/// `lines` and `images` may contain every row or only the lead rows; the
/// lowest `order` wins either way. A product without lines gets neither
/// price nor image, a lead line without images gets an empty image list.
pub fn product_summaries(
    products: &[Product],
    lines: &[ProductLine],
    images: &[ProductImage],
) -> Vec<ProductSummary> {
    let mut lead_lines: HashMap<ProductId, &ProductLine> = HashMap::new();
    for line in lines {
        lead_lines
            .entry(line.product_id)
            .and_modify(|lead| {
                if (line.order, line.id) < (lead.order, lead.id) {
                    *lead = line;
                }
            })
            .or_insert(line);
    }

    let mut lead_images: HashMap<ProductLineId, &ProductImage> = HashMap::new();
    for image in images {
        lead_images
            .entry(image.product_line_id)
            .and_modify(|lead| {
                if (image.order, image.id) < (lead.order, lead.id) {
                    *lead = image;
                }
            })
            .or_insert(image);
    }

    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    sorted
        .into_iter()
        .map(|product| {
            let lead = lead_lines.get(&product.id);
            ProductSummary {
                name: product.name.clone(),
                slug: product.slug.clone(),
                uuid: product.uuid,
                created: product.created_at,
                price: lead.map(|line| line.price),
                image: lead.map(|line| {
                    lead_images
                        .get(&line.id)
                        .map(|image| vec![ProductImageView::from(*image)])
                        .unwrap_or_default()
                }),
            }
        })
        .collect()
}

pub fn category_views(categories: &[Category]) -> Vec<CategoryView> {
    let mut sorted: Vec<&Category> = categories.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    sorted.into_iter().map(CategoryView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use samstore_model::{
        AttributeValueId, CategoryId, ProductAttributeId, ProductImageId,
    };
    use uuid::Uuid;

    fn product(id: i64, name: &str, product_type: Option<i64>) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId(id),
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: format!("{name} description"),
            active: true,
            category_id: Some(CategoryId(1)),
            product_type_id: product_type.map(ProductTypeId),
            created_at: now,
            updated_at: now,
        }
    }

    fn line(id: i64, product: i64, order: i32, cents: i64) -> ProductLine {
        let now = Utc::now();
        ProductLine {
            id: ProductLineId(id),
            product_id: ProductId(product),
            price: Decimal::new(cents, 2),
            sku: format!("SKU-{id}"),
            stock_qty: 5,
            active: true,
            order,
            weight: None,
            product_type_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn image(id: i64, line: i64, order: i32) -> ProductImage {
        let now = Utc::now();
        ProductImage {
            id: ProductImageId(id),
            product_line_id: ProductLineId(line),
            image_url: format!("img/{id}.jpg"),
            alt_text: format!("image {id}"),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    fn bound(line: i64, attribute: i64, name: &str, value: &str) -> LineAttributeValue {
        LineAttributeValue {
            product_line_id: ProductLineId(line),
            value: AttributeValueDetail {
                id: AttributeValueId(line * 100 + attribute),
                value: value.to_string(),
                attribute_id: ProductAttributeId(attribute),
                attribute_name: name.to_string(),
            },
        }
    }

    fn declared(product_type: i64, attribute: i64, name: &str) -> TypeAttribute {
        let now = Utc::now();
        TypeAttribute {
            product_type_id: ProductTypeId(product_type),
            attribute: ProductAttribute {
                id: ProductAttributeId(attribute),
                name: name.to_string(),
                description: String::new(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn detail_nests_lines_images_and_specifications() {
        let rows = DetailRows {
            products: vec![ProductWithCategory {
                product: product(1, "Boot", Some(7)),
                category_name: Some("Shoes".into()),
            }],
            lines: vec![line(11, 1, 2, 2000), line(10, 1, 1, 1500)],
            images: vec![image(101, 10, 2), image(100, 10, 1)],
            line_values: vec![
                bound(10, 1, "color", "red"),
                bound(10, 2, "size", "42"),
                bound(11, 1, "color", "black"),
            ],
            type_attributes: vec![declared(7, 1, "color"), declared(7, 2, "size")],
        };

        let views = product_views(&rows);
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.category_name.as_deref(), Some("Shoes"));

        let orders: Vec<i32> = view.product_line.iter().map(|l| l.order).collect();
        assert_eq!(orders, [1, 2]);

        let first = &view.product_line[0];
        let image_orders: Vec<i32> = first.images.iter().map(|i| i.order).collect();
        assert_eq!(image_orders, [1, 2]);
        assert_eq!(
            first.specification.keys().copied().collect::<Vec<_>>(),
            [ProductAttributeId(1), ProductAttributeId(2)]
        );
        assert_eq!(first.specification[&ProductAttributeId(1)], "red");
        assert!(view.product_line[1].images.is_empty());
        assert_eq!(
            view.product_line[1].specification[&ProductAttributeId(1)],
            "black"
        );

        assert_eq!(view.type_specification[&ProductAttributeId(2)], "size");
        assert_eq!(view.type_specification.len(), 2);
    }

    #[test]
    fn product_without_type_has_empty_type_specification() {
        let rows = DetailRows {
            products: vec![ProductWithCategory {
                product: product(1, "Boot", None),
                category_name: None,
            }],
            type_attributes: vec![declared(7, 1, "color")],
            ..Default::default()
        };

        let views = product_views(&rows);
        assert!(views[0].type_specification.is_empty());
        assert!(views[0].product_line.is_empty());
        assert!(views[0].category_name.is_none());
    }

    #[test]
    fn summaries_take_the_first_line_and_its_first_image() {
        let products = vec![product(2, "Sandal", None), product(1, "Boot", None)];
        let lines = vec![line(10, 1, 2, 2000), line(11, 1, 1, 1500)];
        let images = vec![image(100, 11, 3), image(101, 11, 1), image(102, 10, 1)];

        let summaries = product_summaries(&products, &lines, &images);
        assert_eq!(summaries.len(), 2);

        let boot = &summaries[0];
        assert_eq!(boot.name, "Boot");
        assert_eq!(boot.price, Some(Decimal::new(1500, 2)));
        let image = boot.image.as_ref().unwrap();
        assert_eq!(image.len(), 1);
        assert_eq!(image[0].image_url, "img/101.jpg");

        let sandal = &summaries[1];
        assert!(sandal.price.is_none());
        assert!(sandal.image.is_none());
    }

    #[test]
    fn lead_line_without_images_yields_empty_image_list() {
        let products = vec![product(1, "Boot", None)];
        let lines = vec![line(10, 1, 1, 999)];

        let summaries = product_summaries(&products, &lines, &[]);
        assert_eq!(summaries[0].image, Some(vec![]));
    }

    #[test]
    fn categories_are_listed_by_name() {
        let now = Utc::now();
        let make = |id: i64, name: &str, parent: Option<i64>| Category {
            id: CategoryId(id),
            name: name.to_string(),
            slug: name.to_string(),
            parent_id: parent.map(CategoryId),
            active: false,
            created_at: now,
            updated_at: now,
        };
        let categories = vec![make(2, "category_1", Some(1)), make(1, "category_0", None)];

        let views = category_views(&categories);
        assert_eq!(views[0].name, "category_0");
        assert_eq!(views[0].parent, None);
        assert_eq!(views[1].parent, Some(CategoryId(1)));
    }
}
