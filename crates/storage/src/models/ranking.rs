use serde::{Deserialize, Serialize};

/// Derived score and position of one registration, recomputed on every fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "prenom")]
    pub first_name: String,
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "participationsCount", default)]
    pub participations_count: u32,
    #[serde(default)]
    pub score: i64,
    #[serde(rename = "classement", default)]
    pub rank: u32,
    #[serde(rename = "totalInscrits", default)]
    pub total_registrations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "rang")]
    pub rank: u32,
    #[serde(rename = "nom_affiche")]
    pub display_name: String,
    pub score: i64,
}

/// Current user's public leaderboard identity. The wire format carries no
/// identifier, only the display name and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    #[serde(rename = "nom_affiche")]
    pub display_name: String,
    pub score: i64,
}

impl RankedUser {
    pub fn matches(&self, entry: &RankingEntry) -> bool {
        self.display_name == entry.display_name && self.score == entry.score
    }
}
