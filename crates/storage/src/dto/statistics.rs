use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub stats: Option<Statistics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Participation count keyed by ISO date
    #[serde(rename = "participationsParJour", default)]
    pub participations_per_day: BTreeMap<String, u64>,
}
