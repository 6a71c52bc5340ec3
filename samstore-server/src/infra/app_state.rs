use std::{fmt, sync::Arc};

use samstore_core::application::AppUnitOfWork;
use samstore_core::database::ports::categories::CategoriesRepository;
use samstore_core::services::{AttributeService, CatalogService, CategoryService, ProductService};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub config: Arc<Config>,
    pub categories: CategoryService<dyn CategoriesRepository>,
    pub products: ProductService,
    pub attributes: AttributeService,
    pub catalog: CatalogService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service onto the ports of `unit_of_work`.
    pub fn new(config: Config, unit_of_work: Arc<AppUnitOfWork>) -> Self {
        Self {
            categories: CategoryService::new(Arc::clone(&unit_of_work.categories)),
            products: ProductService::new(
                Arc::clone(&unit_of_work.products),
                Arc::clone(&unit_of_work.product_lines),
            ),
            attributes: AttributeService::new(
                Arc::clone(&unit_of_work.attributes),
                Arc::clone(&unit_of_work.product_types),
            ),
            catalog: CatalogService::new(Arc::clone(&unit_of_work.catalog)),
            unit_of_work,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn unit_of_work(&self) -> Arc<AppUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }
}
