use axum::{
    Router,
    routing::{delete, get},
};

use crate::{
    AppState,
    handlers::{attributes, categories, product_lines, product_types, products},
};

/// Every catalog route. Paths keep their trailing slash.
pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .merge(create_category_routes())
        .merge(create_product_routes())
        .merge(create_product_line_routes())
        .merge(create_attribute_routes())
        .merge(create_product_type_routes())
}

fn create_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}/",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/children/",
            get(categories::category_children),
        )
        .route(
            "/categories/{id}/ancestors/",
            get(categories::category_ancestors),
        )
        .route(
            "/categories/{id}/descendants/",
            get(categories::category_descendants),
        )
}

fn create_product_routes() -> Router<AppState> {
    Router::new()
        // Read side, addressed by slug
        .route(
            "/product/",
            get(products::list_products).post(products::create_product),
        )
        .route("/product/{slug}/", get(products::product_detail))
        .route(
            "/product/category/{slug}/",
            get(products::products_by_category),
        )
        // Writes, addressed by id
        .route(
            "/products/{id}/",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{id}/lines/",
            get(products::list_product_lines).post(products::create_product_line),
        )
        .route(
            "/products/{id}/attribute-values/",
            get(products::product_values).post(products::bind_product_value),
        )
        .route(
            "/products/{id}/attribute-values/{value_id}/",
            delete(products::unbind_product_value),
        )
}

fn create_product_line_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-lines/{id}/",
            get(product_lines::get_product_line)
                .put(product_lines::update_product_line)
                .delete(product_lines::delete_product_line),
        )
        .route(
            "/product-lines/{id}/images/",
            get(product_lines::list_images).post(product_lines::create_image),
        )
        .route(
            "/product-images/{id}/",
            delete(product_lines::delete_image),
        )
        .route(
            "/product-lines/{id}/attribute-values/",
            get(product_lines::line_values).post(product_lines::bind_line_value),
        )
        .route(
            "/product-lines/{id}/attribute-values/{value_id}/",
            delete(product_lines::unbind_line_value),
        )
}

fn create_attribute_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/attributes/",
            get(attributes::list_attributes).post(attributes::create_attribute),
        )
        .route("/attributes/{id}/", delete(attributes::delete_attribute))
        .route(
            "/attributes/{id}/values/",
            get(attributes::list_values).post(attributes::create_value),
        )
        .route("/attribute-values/{id}/", get(attributes::get_value))
}

fn create_product_type_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product-types/",
            get(product_types::list_product_types).post(product_types::create_product_type),
        )
        .route(
            "/product-types/{id}/",
            get(product_types::get_product_type)
                .put(product_types::set_product_type_parent)
                .delete(product_types::delete_product_type),
        )
        .route(
            "/product-types/{id}/attributes/",
            get(product_types::list_type_attributes)
                .post(product_types::declare_type_attribute),
        )
}
