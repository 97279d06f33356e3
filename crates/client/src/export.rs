use std::sync::Arc;

use storage::{
    dto::common::{PaginatedResponse, PaginationParams},
    models::Winner,
};

use crate::{Result, gateway::FunctionGateway};

pub const WINNERS_CSV_FILENAME: &str = "gagnants.csv";

pub const WINNERS_CSV_HEADER: [&str; 8] = [
    "Nom",
    "Prénom",
    "Email",
    "Téléphone",
    "Lot gagné",
    "Type de lot",
    "Date attribution",
    "Statut validation",
];

/// Builds the winners export: a header line followed by one line per
/// winner, every field double-quoted and comma-joined, lines joined by `\n`.
pub fn winners_csv(winners: &[Winner]) -> String {
    let mut lines = Vec::with_capacity(winners.len() + 1);
    lines.push(WINNERS_CSV_HEADER.join(","));

    for winner in winners {
        let fields = [
            &winner.last_name,
            &winner.first_name,
            &winner.email,
            &winner.phone,
            &winner.prize_title,
            &winner.prize_type,
            &winner.date_attribution,
            &winner.validation_status,
        ];
        let row: Vec<String> = fields.iter().map(|field| quote(field)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Admin winners table: the whole list is fetched once and paged locally
pub struct WinnersTable {
    gateway: Arc<dyn FunctionGateway>,
}

impl WinnersTable {
    pub fn new(gateway: Arc<dyn FunctionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn fetch(&self) -> Result<Vec<Winner>> {
        let winners = self.gateway.winners().await?;
        tracing::info!("Fetched {} winners", winners.len());
        Ok(winners)
    }

    pub async fn page(&self, params: &PaginationParams) -> Result<PaginatedResponse<Winner>> {
        let winners = self.fetch().await?;
        Ok(PaginatedResponse::from_items(winners, params))
    }

    pub async fn csv(&self) -> Result<String> {
        Ok(winners_csv(&self.fetch().await?))
    }
}
