use serde::{Deserialize, Serialize};

use crate::models::{Participation, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationsRequest {
    pub inscription_id: String,
}

/// Response of the participations-by-user function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserParticipations {
    pub user: UserSummary,
    #[serde(default)]
    pub participations: Vec<Participation>,
}
