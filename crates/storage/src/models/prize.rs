use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Instant-win reward (`lot`) attached to a winning participation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Prize {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(default, alias = "photo_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}
