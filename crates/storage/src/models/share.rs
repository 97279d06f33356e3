use serde::{Deserialize, Serialize};

/// Fixed id of the single share configuration row
pub const SHARE_CONFIG_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Analytics record of one share action (`partage`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEvent {
    pub inscription_id: String,
    pub canal: String,
    pub meta: Option<ShareMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Campaign-wide share defaults (`partage_config`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub message_defaut: Option<String>,
}

impl ShareConfig {
    pub fn default_meta(&self) -> ShareMeta {
        ShareMeta {
            description: self.meta_description.clone(),
            image: self.image_url.clone(),
            message: self.message_defaut.clone(),
        }
    }
}
