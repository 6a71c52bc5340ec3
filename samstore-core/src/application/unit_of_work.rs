use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::postgres::{
    PostgresAttributesRepository, PostgresCatalogReadRepository, PostgresCategoriesRepository,
    PostgresProductLinesRepository, PostgresProductTypesRepository, PostgresProductsRepository,
};
use crate::database::ports::{
    attributes::AttributesRepository, catalog::CatalogReadPort,
    categories::CategoriesRepository, product_lines::ProductLinesRepository,
    product_types::ProductTypesRepository, products::ProductsRepository,
};
use crate::database::postgres::PostgresDatabase;

/// Aggregates all repository ports used by application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub categories: Arc<dyn CategoriesRepository>,
    pub products: Arc<dyn ProductsRepository>,
    pub product_lines: Arc<dyn ProductLinesRepository>,
    pub attributes: Arc<dyn AttributesRepository>,
    pub product_types: Arc<dyn ProductTypesRepository>,
    pub catalog: Arc<dyn CatalogReadPort>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("categories", &type_name_of_val(self.categories.as_ref()))
            .field("products", &type_name_of_val(self.products.as_ref()))
            .field(
                "product_lines",
                &type_name_of_val(self.product_lines.as_ref()),
            )
            .field("attributes", &type_name_of_val(self.attributes.as_ref()))
            .field(
                "product_types",
                &type_name_of_val(self.product_types.as_ref()),
            )
            .field("catalog", &type_name_of_val(self.catalog.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    /// Compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();

        Self {
            categories: Arc::new(PostgresCategoriesRepository::new(pool.clone())),
            products: Arc::new(PostgresProductsRepository::new(pool.clone())),
            product_lines: Arc::new(PostgresProductLinesRepository::new(pool.clone())),
            attributes: Arc::new(PostgresAttributesRepository::new(pool.clone())),
            product_types: Arc::new(PostgresProductTypesRepository::new(pool.clone())),
            catalog: Arc::new(PostgresCatalogReadRepository::new(pool)),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl AppUnitOfWork {
    /// Every port backed by one shared in-memory store.
    pub fn in_memory() -> Self {
        use crate::database::infrastructure::memory::InMemoryCatalogStore;

        let store = Arc::new(InMemoryCatalogStore::new());
        Self {
            categories: store.clone(),
            products: store.clone(),
            product_lines: store.clone(),
            attributes: store.clone(),
            product_types: store.clone(),
            catalog: store,
        }
    }
}
