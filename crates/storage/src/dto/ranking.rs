use serde::{Deserialize, Serialize};

use crate::models::{RankedUser, RankingEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingMode {
    /// Short leaderboard preview on the landing page
    #[default]
    #[serde(rename = "accueil")]
    Home,
    /// Complete leaderboard page
    #[serde(rename = "classement")]
    Full,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "accueil",
            Self::Full => "classement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRequest {
    pub mode: RankingMode,
    pub inscription_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub classement: Vec<RankingEntry>,
    #[serde(default)]
    pub utilisateur: Option<RankedUser>,
}
