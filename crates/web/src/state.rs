use std::sync::Arc;

use client::{FunctionGateway, HttpGateway};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<HttpGateway>,
    /// Privileged key for functions the browser must never call directly
    pub service_key: String,
}

impl AppState {
    pub fn new(gateway: HttpGateway, service_key: impl Into<String>) -> Self {
        Self {
            gateway: Arc::new(gateway),
            service_key: service_key.into(),
        }
    }

    pub fn functions(&self) -> Arc<dyn FunctionGateway> {
        self.gateway.clone()
    }
}
