use crate::store::UserStore;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared
/// through `web::Data`.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn UserStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}
