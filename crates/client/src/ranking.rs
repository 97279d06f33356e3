use std::sync::Arc;

use storage::{
    IdentityCache,
    dto::ranking::{RankingMode, RankingRequest, RankingResponse},
    models::RankedUser,
};

use crate::{
    display::rank_label,
    error::ClientError,
    gateway::FunctionGateway,
    state::ViewState,
};

/// Podium icon for the first three positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Trophy,
    Medal,
    Award,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Self::Trophy),
            2 => Some(Self::Medal),
            3 => Some(Self::Award),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub rank_label: String,
    pub display_name: String,
    pub score: i64,
    pub is_current_user: bool,
    pub medal: Option<Medal>,
}

impl LeaderboardRow {
    /// Name as rendered, with the " (Vous)" marker on the user's own row
    pub fn label(&self) -> String {
        if self.is_current_user {
            format!("{} (Vous)", self.display_name)
        } else {
            self.display_name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub mode: RankingMode,
    pub rows: Vec<LeaderboardRow>,
    pub current_user: Option<RankedUser>,
    /// Row to scroll to; only set in full mode
    pub focus: Option<usize>,
    /// More than one row matched the current user's name and score
    pub ambiguous_match: bool,
}

impl Leaderboard {
    pub fn from_response(mode: RankingMode, response: RankingResponse) -> Self {
        let current_user = response.utilisateur;

        let matches: Vec<usize> = match &current_user {
            Some(user) => response
                .classement
                .iter()
                .enumerate()
                .filter(|(_, entry)| user.matches(entry))
                .map(|(index, _)| index)
                .collect(),
            None => Vec::new(),
        };
        let highlighted = matches.first().copied();
        let ambiguous_match = matches.len() > 1;

        if ambiguous_match {
            tracing::warn!(
                "{} leaderboard rows share the current user's name and score, highlighting the first",
                matches.len()
            );
        }

        let rows = response
            .classement
            .into_iter()
            .enumerate()
            .map(|(index, entry)| LeaderboardRow {
                rank: entry.rank,
                rank_label: rank_label(entry.rank),
                display_name: entry.display_name,
                score: entry.score,
                is_current_user: Some(index) == highlighted,
                medal: Medal::for_rank(entry.rank),
            })
            .collect();

        let focus = match mode {
            RankingMode::Full => highlighted,
            RankingMode::Home => None,
        };

        Self {
            mode,
            rows,
            current_user,
            focus,
            ambiguous_match,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            RankingMode::Home => "Le classement actuel",
            RankingMode::Full => "Classement Général",
        }
    }
}

/// Banner text for a failed ranking fetch
pub fn ranking_error_message(err: &ClientError) -> String {
    match err.status() {
        Some(status) => format!("Erreur HTTP: {}", status),
        None => {
            let message = err.to_string();
            if message.trim().is_empty() {
                "Erreur inconnue".to_string()
            } else {
                message
            }
        }
    }
}

pub struct RankingViewModel {
    gateway: Arc<dyn FunctionGateway>,
    cache: IdentityCache,
}

impl RankingViewModel {
    pub fn new(gateway: Arc<dyn FunctionGateway>, cache: IdentityCache) -> Self {
        Self { gateway, cache }
    }

    /// Fetches the leaderboard for `inscription_id`, falling back to the
    /// cached identifier. Without any identifier nothing is fetched.
    pub async fn load(
        &self,
        mode: RankingMode,
        inscription_id: Option<&str>,
    ) -> ViewState<Leaderboard> {
        let identifier = match inscription_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => match self.cache.get() {
                Ok(Some(id)) => id,
                Ok(None) => return ViewState::Empty,
                Err(e) => {
                    tracing::warn!("Could not read cached identifier: {}", e);
                    return ViewState::Empty;
                }
            },
        };

        let request = RankingRequest {
            mode,
            inscription_id: Some(identifier),
        };

        match self.gateway.ranking(&request).await {
            Ok(response) => ViewState::Ready(Leaderboard::from_response(mode, response)),
            Err(e) => {
                tracing::error!("Failed to load {} ranking: {}", mode.as_str(), e);
                ViewState::Failed(ranking_error_message(&e))
            }
        }
    }
}
