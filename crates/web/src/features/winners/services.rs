use std::sync::Arc;

use client::{FunctionGateway, Result, export::WinnersTable};
use storage::{
    dto::common::{PaginatedResponse, PaginationParams},
    models::Winner,
};

/// One page of the winners table
pub async fn list_winners(
    gateway: Arc<dyn FunctionGateway>,
    params: &PaginationParams,
) -> Result<PaginatedResponse<Winner>> {
    WinnersTable::new(gateway).page(params).await
}

/// Full winners list as CSV text
pub async fn export_winners(gateway: Arc<dyn FunctionGateway>) -> Result<String> {
    WinnersTable::new(gateway).csv().await
}
