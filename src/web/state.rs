use std::sync::Arc;

use crate::catalog::CatalogManager;
use crate::web::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<CatalogManager>,
}
