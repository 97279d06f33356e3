use serde::{Deserialize, Serialize};

use crate::models::Prize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeCheckRequest {
    pub participation_id: String,
}

/// Outcome of the prize-attribution function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeCheckResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub gain: bool,
    #[serde(rename = "lot", default)]
    pub prize: Option<Prize>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl PrizeCheckResponse {
    pub fn won_prize(&self) -> Option<&Prize> {
        if self.gain { self.prize.as_ref() } else { None }
    }
}
