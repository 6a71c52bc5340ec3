pub(crate) mod errors;
pub mod repositories;

pub use repositories::{
    attributes::PostgresAttributesRepository, catalog::PostgresCatalogReadRepository,
    categories::PostgresCategoriesRepository, product_lines::PostgresProductLinesRepository,
    product_types::PostgresProductTypesRepository, products::PostgresProductsRepository,
};
