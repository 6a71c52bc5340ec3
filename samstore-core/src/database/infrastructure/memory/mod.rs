//! In-memory adapter implementing every catalog port.
//!
//! All tables live behind one `tokio::sync::Mutex`, so each call is atomic
//! and the ordering rules need no retries. Foreign keys, unique keys and
//! delete behaviour follow the SQL schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use samstore_model::{
    AttributeValue, AttributeValueDetail, AttributeValueId, BindingId, Category, CategoryId,
    CategoryUpdate, NewAttributeValue, NewCategory, NewProduct, NewProductAttribute,
    NewProductImage, NewProductLine, NewProductType, Product, ProductAttribute,
    ProductAttributeId, ProductAttributeValue, ProductId, ProductImage, ProductImageId,
    ProductLine, ProductLineAttributeValue, ProductLineId, ProductLineUpdate, ProductType,
    ProductTypeAttribute, ProductTypeId, ProductUpdate, validation,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::catalog::aggregate::{LineAttributeValue, ProductWithCategory, TypeAttribute};
use crate::catalog::attributes::{BindingDecision, check_line_binding, check_pair_binding};
use crate::catalog::hierarchy::Tree;
use crate::catalog::ordering::{OrderGroup, assign_order, ensure_free};
use crate::database::ports::{
    attributes::AttributesRepository, catalog::CatalogReadPort,
    categories::CategoriesRepository, product_lines::ProductLinesRepository,
    product_types::ProductTypesRepository, products::ProductsRepository,
};
use crate::error::{CatalogError, Result, ValidationError};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    lines: BTreeMap<ProductLineId, ProductLine>,
    images: BTreeMap<ProductImageId, ProductImage>,
    attributes: BTreeMap<ProductAttributeId, ProductAttribute>,
    values: BTreeMap<AttributeValueId, AttributeValue>,
    product_types: BTreeMap<ProductTypeId, ProductType>,
    product_values: Vec<ProductAttributeValue>,
    line_values: Vec<ProductLineAttributeValue>,
    type_attributes: Vec<ProductTypeAttribute>,
}

fn unknown(entity: &'static str, field: &'static str) -> CatalogError {
    ValidationError::UnknownReference { entity, field }.into()
}

fn duplicate(entity: &'static str, field: &'static str) -> CatalogError {
    ValidationError::DuplicateValue { entity, field }.into()
}

fn by_name<T>(items: &mut [T], name: impl Fn(&T) -> (&str, i64)) {
    items.sort_by(|a, b| name(a).cmp(&name(b)));
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn ensure_category_unique(
        &self,
        name: &str,
        slug: &str,
        except: Option<CategoryId>,
    ) -> Result<()> {
        let others = self
            .categories
            .values()
            .filter(|c| Some(c.id) != except);
        for category in others {
            if category.name == name {
                return Err(duplicate("category", "name"));
            }
            if category.slug == slug {
                return Err(duplicate("category", "slug"));
            }
        }
        Ok(())
    }

    fn ensure_category_ref(&self, id: Option<CategoryId>, field: &'static str) -> Result<()> {
        match id {
            Some(id) if !self.categories.contains_key(&id) => Err(unknown("category", field)),
            _ => Ok(()),
        }
    }

    fn ensure_type_ref(&self, id: Option<ProductTypeId>) -> Result<()> {
        match id {
            Some(id) if !self.product_types.contains_key(&id) => {
                Err(unknown("product type", "product_type"))
            }
            _ => Ok(()),
        }
    }

    fn detail(&self, id: AttributeValueId) -> Option<AttributeValueDetail> {
        let value = self.values.get(&id)?;
        let attribute = self.attributes.get(&value.attribute_id)?;
        Some(AttributeValueDetail {
            id: value.id,
            value: value.value.clone(),
            attribute_id: value.attribute_id,
            attribute_name: attribute.name.clone(),
        })
    }

    fn remove_line(&mut self, id: ProductLineId) {
        self.lines.remove(&id);
        self.images.retain(|_, image| image.product_line_id != id);
        self.line_values.retain(|binding| binding.product_line_id != id);
    }

    fn remove_value(&mut self, id: AttributeValueId) {
        self.values.remove(&id);
        self.product_values.retain(|b| b.attribute_value_id != id);
        self.line_values.retain(|b| b.attribute_value_id != id);
    }

    fn line_orders(&self, product: ProductId, except: Option<ProductLineId>) -> Vec<i32> {
        self.lines
            .values()
            .filter(|l| l.product_id == product && Some(l.id) != except)
            .map(|l| l.order)
            .collect()
    }

    fn sorted_lines(&self, product: ProductId) -> Vec<ProductLine> {
        let mut lines: Vec<ProductLine> = self
            .lines
            .values()
            .filter(|l| l.product_id == product)
            .cloned()
            .collect();
        lines.sort_by_key(|l| (l.order, l.id));
        lines
    }

    fn sorted_images(&self, line: ProductLineId) -> Vec<ProductImage> {
        let mut images: Vec<ProductImage> = self
            .images
            .values()
            .filter(|i| i.product_line_id == line)
            .cloned()
            .collect();
        images.sort_by_key(|i| (i.order, i.id));
        images
    }
}

/// Shared, cloneable in-memory catalog.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoriesRepository for InMemoryCatalogStore {
    async fn create(&self, category: NewCategory) -> Result<Category> {
        let mut state = self.state.lock().await;
        state.ensure_category_unique(&category.name, &category.slug, None)?;
        state.ensure_category_ref(category.parent, "parent")?;

        let now = Utc::now();
        let id = CategoryId(state.next_id());
        let created = Category {
            id,
            name: category.name,
            slug: category.slug,
            parent_id: category.parent,
            active: category.active,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        by_name(&mut categories, |c| (c.name.as_str(), c.id.get()));
        Ok(categories)
    }

    async fn children_of(&self, id: CategoryId) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let tree = Tree::new(state.categories.values());
        Ok(tree.children_of(Some(id)).into_iter().cloned().collect())
    }

    async fn ancestors(&self, id: CategoryId) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let tree = Tree::new(state.categories.values());
        Ok(tree.ancestors(id).into_iter().cloned().collect())
    }

    async fn descendants(&self, id: CategoryId) -> Result<Vec<Category>> {
        let state = self.state.lock().await;
        let tree = Tree::new(state.categories.values());
        Ok(tree.descendants(id).into_iter().cloned().collect())
    }

    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> Result<Category> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&id) {
            return Err(CatalogError::not_found("category", id));
        }
        Tree::new(state.categories.values()).ensure_can_attach(id, update.parent)?;
        state.ensure_category_ref(update.parent, "parent")?;
        state.ensure_category_unique(&update.name, &update.slug, Some(id))?;

        let category = state
            .categories
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("category", id))?;
        category.name = update.name;
        category.slug = update.slug;
        category.parent_id = update.parent;
        if let Some(active) = update.active {
            category.active = active;
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&id) {
            return Err(CatalogError::not_found("category", id));
        }
        if state.categories.values().any(|c| c.parent_id == Some(id)) {
            return Err(CatalogError::ReferentialIntegrity {
                entity: "category",
                key: id.to_string(),
                referenced_by: "categories",
            });
        }

        state.categories.remove(&id);
        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductsRepository for InMemoryCatalogStore {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.lock().await;
        state.ensure_category_ref(product.category, "category")?;
        state.ensure_type_ref(product.product_type)?;

        let now = Utc::now();
        let id = ProductId(state.next_id());
        let created = Product {
            id,
            uuid: Uuid::new_v4(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            active: product.active,
            category_id: product.category,
            product_type_id: product.product_type,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        by_name(&mut products, |p| (p.name.as_str(), p.id.get()));
        Ok(products)
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let mut state = self.state.lock().await;
        state.ensure_category_ref(update.category, "category")?;
        state.ensure_type_ref(update.product_type)?;

        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("product", id))?;
        product.name = update.name;
        product.slug = update.slug;
        product.description = update.description;
        if let Some(active) = update.active {
            product.active = active;
        }
        product.category_id = update.category;
        product.product_type_id = update.product_type;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.products.remove(&id).is_none() {
            return Err(CatalogError::not_found("product", id));
        }
        let owned: Vec<ProductLineId> = state
            .lines
            .values()
            .filter(|l| l.product_id == id)
            .map(|l| l.id)
            .collect();
        for line in owned {
            state.remove_line(line);
        }
        state.product_values.retain(|b| b.product_id != id);
        Ok(())
    }

    async fn bind_value(
        &self,
        product: ProductId,
        value: AttributeValueId,
    ) -> Result<ProductAttributeValue> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&product) {
            return Err(CatalogError::not_found("product", product));
        }
        if !state.values.contains_key(&value) {
            return Err(unknown("attribute value", "attribute_value"));
        }

        let bound: Vec<AttributeValueId> = state
            .product_values
            .iter()
            .filter(|b| b.product_id == product)
            .map(|b| b.attribute_value_id)
            .collect();
        if check_pair_binding(&bound, &value) == BindingDecision::AlreadyBound {
            return state
                .product_values
                .iter()
                .find(|b| b.product_id == product && b.attribute_value_id == value)
                .copied()
                .ok_or_else(|| CatalogError::Internal("binding vanished".into()));
        }

        let binding = ProductAttributeValue {
            id: BindingId(state.next_id()),
            product_id: product,
            attribute_value_id: value,
        };
        state.product_values.push(binding);
        Ok(binding)
    }

    async fn unbind_value(&self, product: ProductId, value: AttributeValueId) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.product_values.len();
        state
            .product_values
            .retain(|b| !(b.product_id == product && b.attribute_value_id == value));
        if state.product_values.len() == before {
            return Err(CatalogError::not_found(
                "product attribute value",
                format!("{product}/{value}"),
            ));
        }
        Ok(())
    }

    async fn values_for_product(&self, product: ProductId) -> Result<Vec<AttributeValueDetail>> {
        let state = self.state.lock().await;
        let mut values: Vec<AttributeValueDetail> = state
            .product_values
            .iter()
            .filter(|b| b.product_id == product)
            .filter_map(|b| state.detail(b.attribute_value_id))
            .collect();
        values.sort_by(|a, b| {
            (a.attribute_name.as_str(), a.value.as_str(), a.id)
                .cmp(&(b.attribute_name.as_str(), b.value.as_str(), b.id))
        });
        Ok(values)
    }
}

#[async_trait]
impl ProductLinesRepository for InMemoryCatalogStore {
    async fn create(&self, product: ProductId, line: NewProductLine) -> Result<ProductLine> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&product) {
            return Err(CatalogError::not_found("product", product));
        }
        state.ensure_type_ref(line.product_type)?;
        let existing = state.line_orders(product, None);
        let order = assign_order(OrderGroup::ProductLines(product), line.order, &existing)?;

        let now = Utc::now();
        let id = ProductLineId(state.next_id());
        let created = ProductLine {
            id,
            product_id: product,
            price: validation::stored_price(line.price),
            sku: line.sku,
            stock_qty: line.stock_qty,
            active: line.active,
            order,
            weight: line.weight,
            product_type_id: line.product_type,
            created_at: now,
            updated_at: now,
        };
        state.lines.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: ProductLineId) -> Result<Option<ProductLine>> {
        Ok(self.state.lock().await.lines.get(&id).cloned())
    }

    async fn list_for_product(&self, product: ProductId) -> Result<Vec<ProductLine>> {
        Ok(self.state.lock().await.sorted_lines(product))
    }

    async fn update(&self, id: ProductLineId, update: ProductLineUpdate) -> Result<ProductLine> {
        let mut state = self.state.lock().await;
        let current = state
            .lines
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("product line", id))?;
        state.ensure_type_ref(update.product_type)?;

        let order = update.order.unwrap_or(current.order);
        if order != current.order {
            let siblings = state.line_orders(current.product_id, Some(id));
            ensure_free(OrderGroup::ProductLines(current.product_id), order, &siblings)?;
        }

        let line = state
            .lines
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("product line", id))?;
        line.price = validation::stored_price(update.price);
        line.sku = update.sku;
        line.stock_qty = update.stock_qty;
        if let Some(active) = update.active {
            line.active = active;
        }
        line.order = order;
        line.weight = update.weight;
        line.product_type_id = update.product_type;
        line.updated_at = Utc::now();
        Ok(line.clone())
    }

    async fn delete(&self, id: ProductLineId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.lines.contains_key(&id) {
            return Err(CatalogError::not_found("product line", id));
        }
        state.remove_line(id);
        Ok(())
    }

    async fn add_image(&self, line: ProductLineId, image: NewProductImage) -> Result<ProductImage> {
        let mut state = self.state.lock().await;
        if !state.lines.contains_key(&line) {
            return Err(CatalogError::not_found("product line", line));
        }
        let existing: Vec<i32> = state
            .images
            .values()
            .filter(|i| i.product_line_id == line)
            .map(|i| i.order)
            .collect();
        let order = assign_order(OrderGroup::Images(line), image.order, &existing)?;

        let now = Utc::now();
        let id = ProductImageId(state.next_id());
        let created = ProductImage {
            id,
            product_line_id: line,
            image_url: image.image_url,
            alt_text: image.alt_text,
            order,
            created_at: now,
            updated_at: now,
        };
        state.images.insert(id, created.clone());
        Ok(created)
    }

    async fn images_for_line(&self, line: ProductLineId) -> Result<Vec<ProductImage>> {
        Ok(self.state.lock().await.sorted_images(line))
    }

    async fn delete_image(&self, id: ProductImageId) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .images
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::not_found("product image", id))
    }

    async fn bind_value(
        &self,
        line: ProductLineId,
        value: AttributeValueId,
    ) -> Result<ProductLineAttributeValue> {
        let mut state = self.state.lock().await;
        if !state.lines.contains_key(&line) {
            return Err(CatalogError::not_found("product line", line));
        }
        let candidate = state
            .values
            .get(&value)
            .cloned()
            .ok_or_else(|| unknown("attribute value", "attribute_value"))?;

        let existing: Vec<AttributeValue> = state
            .line_values
            .iter()
            .filter(|b| b.product_line_id == line)
            .filter_map(|b| state.values.get(&b.attribute_value_id).cloned())
            .collect();

        if check_line_binding(line, &existing, &candidate)? == BindingDecision::AlreadyBound {
            return state
                .line_values
                .iter()
                .find(|b| b.product_line_id == line && b.attribute_value_id == value)
                .copied()
                .ok_or_else(|| CatalogError::Internal("binding vanished".into()));
        }

        let binding = ProductLineAttributeValue {
            id: BindingId(state.next_id()),
            product_line_id: line,
            attribute_value_id: value,
        };
        state.line_values.push(binding);
        Ok(binding)
    }

    async fn unbind_value(&self, line: ProductLineId, value: AttributeValueId) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.line_values.len();
        state
            .line_values
            .retain(|b| !(b.product_line_id == line && b.attribute_value_id == value));
        if state.line_values.len() == before {
            return Err(CatalogError::not_found(
                "product line attribute value",
                format!("{line}/{value}"),
            ));
        }
        Ok(())
    }

    async fn values_for_line(&self, line: ProductLineId) -> Result<Vec<AttributeValueDetail>> {
        let state = self.state.lock().await;
        let mut values: Vec<AttributeValueDetail> = state
            .line_values
            .iter()
            .filter(|b| b.product_line_id == line)
            .filter_map(|b| state.detail(b.attribute_value_id))
            .collect();
        values.sort_by(|a, b| (a.attribute_name.as_str(), a.id).cmp(&(b.attribute_name.as_str(), b.id)));
        Ok(values)
    }
}

#[async_trait]
impl AttributesRepository for InMemoryCatalogStore {
    async fn create_attribute(&self, attribute: NewProductAttribute) -> Result<ProductAttribute> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let id = ProductAttributeId(state.next_id());
        let created = ProductAttribute {
            id,
            name: attribute.name,
            description: attribute.description,
            created_at: now,
            updated_at: now,
        };
        state.attributes.insert(id, created.clone());
        Ok(created)
    }

    async fn get_attribute(&self, id: ProductAttributeId) -> Result<Option<ProductAttribute>> {
        Ok(self.state.lock().await.attributes.get(&id).cloned())
    }

    async fn list_attributes(&self) -> Result<Vec<ProductAttribute>> {
        let state = self.state.lock().await;
        let mut attributes: Vec<ProductAttribute> = state.attributes.values().cloned().collect();
        by_name(&mut attributes, |a| (a.name.as_str(), a.id.get()));
        Ok(attributes)
    }

    async fn delete_attribute(&self, id: ProductAttributeId) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.attributes.remove(&id).is_none() {
            return Err(CatalogError::not_found("attribute", id));
        }
        let owned: Vec<AttributeValueId> = state
            .values
            .values()
            .filter(|v| v.attribute_id == id)
            .map(|v| v.id)
            .collect();
        for value in owned {
            state.remove_value(value);
        }
        state.type_attributes.retain(|d| d.attribute_id != id);
        Ok(())
    }

    async fn create_value(
        &self,
        attribute: ProductAttributeId,
        value: NewAttributeValue,
    ) -> Result<AttributeValue> {
        let mut state = self.state.lock().await;
        if !state.attributes.contains_key(&attribute) {
            return Err(unknown("attribute", "attribute"));
        }
        let now = Utc::now();
        let id = AttributeValueId(state.next_id());
        let created = AttributeValue {
            id,
            value: value.value,
            attribute_id: attribute,
            created_at: now,
            updated_at: now,
        };
        state.values.insert(id, created.clone());
        Ok(created)
    }

    async fn get_value(&self, id: AttributeValueId) -> Result<Option<AttributeValueDetail>> {
        Ok(self.state.lock().await.detail(id))
    }

    async fn values_for_attribute(
        &self,
        attribute: ProductAttributeId,
    ) -> Result<Vec<AttributeValue>> {
        let state = self.state.lock().await;
        let mut values: Vec<AttributeValue> = state
            .values
            .values()
            .filter(|v| v.attribute_id == attribute)
            .cloned()
            .collect();
        by_name(&mut values, |v| (v.value.as_str(), v.id.get()));
        Ok(values)
    }
}

#[async_trait]
impl ProductTypesRepository for InMemoryCatalogStore {
    async fn create(&self, product_type: NewProductType) -> Result<ProductType> {
        let mut state = self.state.lock().await;
        if let Some(parent) = product_type.parent
            && !state.product_types.contains_key(&parent)
        {
            return Err(unknown("product type", "parent"));
        }
        let id = ProductTypeId(state.next_id());
        let created = ProductType {
            id,
            name: product_type.name,
            parent_id: product_type.parent,
        };
        state.product_types.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: ProductTypeId) -> Result<Option<ProductType>> {
        Ok(self.state.lock().await.product_types.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ProductType>> {
        let state = self.state.lock().await;
        let mut types: Vec<ProductType> = state.product_types.values().cloned().collect();
        by_name(&mut types, |t| (t.name.as_str(), t.id.get()));
        Ok(types)
    }

    async fn set_parent(
        &self,
        id: ProductTypeId,
        parent: Option<ProductTypeId>,
    ) -> Result<ProductType> {
        let mut state = self.state.lock().await;
        if !state.product_types.contains_key(&id) {
            return Err(CatalogError::not_found("product type", id));
        }
        Tree::new(state.product_types.values()).ensure_can_attach(id, parent)?;
        if let Some(parent) = parent
            && !state.product_types.contains_key(&parent)
        {
            return Err(unknown("product type", "parent"));
        }

        let product_type = state
            .product_types
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("product type", id))?;
        product_type.parent_id = parent;
        Ok(product_type.clone())
    }

    async fn delete(&self, id: ProductTypeId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.product_types.contains_key(&id) {
            return Err(CatalogError::not_found("product type", id));
        }

        let referenced_by = if state.products.values().any(|p| p.product_type_id == Some(id)) {
            Some("products")
        } else if state.lines.values().any(|l| l.product_type_id == Some(id)) {
            Some("product lines")
        } else if state.product_types.values().any(|t| t.parent_id == Some(id)) {
            Some("product types")
        } else {
            None
        };
        if let Some(referenced_by) = referenced_by {
            return Err(CatalogError::ReferentialIntegrity {
                entity: "product type",
                key: id.to_string(),
                referenced_by,
            });
        }

        state.product_types.remove(&id);
        state.type_attributes.retain(|d| d.product_type_id != id);
        Ok(())
    }

    async fn declare_attribute(
        &self,
        product_type: ProductTypeId,
        attribute: ProductAttributeId,
    ) -> Result<ProductTypeAttribute> {
        let mut state = self.state.lock().await;
        if !state.product_types.contains_key(&product_type) {
            return Err(unknown("product type", "product_type"));
        }
        if !state.attributes.contains_key(&attribute) {
            return Err(unknown("attribute", "attribute"));
        }

        let declared: Vec<ProductAttributeId> = state
            .type_attributes
            .iter()
            .filter(|d| d.product_type_id == product_type)
            .map(|d| d.attribute_id)
            .collect();
        if check_pair_binding(&declared, &attribute) == BindingDecision::AlreadyBound {
            return state
                .type_attributes
                .iter()
                .find(|d| d.product_type_id == product_type && d.attribute_id == attribute)
                .copied()
                .ok_or_else(|| CatalogError::Internal("declaration vanished".into()));
        }

        let declaration = ProductTypeAttribute {
            id: BindingId(state.next_id()),
            product_type_id: product_type,
            attribute_id: attribute,
        };
        state.type_attributes.push(declaration);
        Ok(declaration)
    }

    async fn attributes_for(&self, product_type: ProductTypeId) -> Result<Vec<ProductAttribute>> {
        let state = self.state.lock().await;
        let mut attributes: Vec<ProductAttribute> = state
            .type_attributes
            .iter()
            .filter(|d| d.product_type_id == product_type)
            .filter_map(|d| state.attributes.get(&d.attribute_id).cloned())
            .collect();
        by_name(&mut attributes, |a| (a.name.as_str(), a.id.get()));
        Ok(attributes)
    }
}

#[async_trait]
impl CatalogReadPort for InMemoryCatalogStore {
    async fn active_products_by_slug(&self, slug: &str) -> Result<Vec<ProductWithCategory>> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.active && p.slug == slug)
            .map(|p| ProductWithCategory {
                product: p.clone(),
                category_name: p
                    .category_id
                    .and_then(|id| state.categories.get(&id))
                    .map(|c| c.name.clone()),
            })
            .collect())
    }

    async fn active_products_in_category(&self, category_slug: &str) -> Result<Vec<Product>> {
        let state = self.state.lock().await;
        let Some(category) = state.categories.values().find(|c| c.slug == category_slug) else {
            return Ok(Vec::new());
        };
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.active && p.category_id == Some(category.id))
            .cloned()
            .collect();
        by_name(&mut products, |p| (p.name.as_str(), p.id.get()));
        Ok(products)
    }

    async fn lines_for_products(&self, products: &[ProductId]) -> Result<Vec<ProductLine>> {
        let state = self.state.lock().await;
        Ok(products
            .iter()
            .flat_map(|product| state.sorted_lines(*product))
            .collect())
    }

    async fn images_for_lines(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>> {
        let state = self.state.lock().await;
        Ok(lines
            .iter()
            .flat_map(|line| state.sorted_images(*line))
            .collect())
    }

    async fn line_values_for_lines(
        &self,
        lines: &[ProductLineId],
    ) -> Result<Vec<LineAttributeValue>> {
        let state = self.state.lock().await;
        Ok(state
            .line_values
            .iter()
            .filter(|b| lines.contains(&b.product_line_id))
            .filter_map(|b| {
                state.detail(b.attribute_value_id).map(|value| LineAttributeValue {
                    product_line_id: b.product_line_id,
                    value,
                })
            })
            .collect())
    }

    async fn type_attributes(&self, types: &[ProductTypeId]) -> Result<Vec<TypeAttribute>> {
        let state = self.state.lock().await;
        Ok(state
            .type_attributes
            .iter()
            .filter(|d| types.contains(&d.product_type_id))
            .filter_map(|d| {
                state.attributes.get(&d.attribute_id).map(|attribute| TypeAttribute {
                    product_type_id: d.product_type_id,
                    attribute: attribute.clone(),
                })
            })
            .collect())
    }

    async fn lead_lines(&self, products: &[ProductId]) -> Result<Vec<ProductLine>> {
        let state = self.state.lock().await;
        Ok(products
            .iter()
            .filter_map(|product| state.sorted_lines(*product).into_iter().next())
            .collect())
    }

    async fn lead_images(&self, lines: &[ProductLineId]) -> Result<Vec<ProductImage>> {
        let state = self.state.lock().await;
        Ok(lines
            .iter()
            .filter_map(|line| state.sorted_images(*line).into_iter().next())
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        CategoriesRepository::list(self).await
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
