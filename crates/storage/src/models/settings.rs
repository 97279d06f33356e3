use serde::{Deserialize, Serialize};

/// Site-wide styling settings (`reglage_site`); every field may be unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub texte_color: Option<String>,
    #[serde(default)]
    pub button_background_color: Option<String>,
    #[serde(default)]
    pub button_text_color: Option<String>,
    #[serde(default)]
    pub button_border_radius: Option<u32>,
}
