use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contest participant account (`inscription`) as returned by the gateway.
///
/// Fields the client does not interpret are kept in `extra` so the cached
/// profile snapshot round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    #[serde(rename = "nom", default)]
    pub last_name: String,
    #[serde(rename = "prenom", default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    #[serde(rename = "accepte_reglement", default)]
    pub accepts_rules: bool,
    #[serde(rename = "accepte_marketing", default)]
    pub accepts_marketing: bool,
    #[serde(flatten)]
    pub utm: UtmParams,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Campaign attribution captured from the landing URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
}

impl UtmParams {
    pub const FIELDS: [&'static str; 5] = [
        "utm_source",
        "utm_medium",
        "utm_campaign",
        "utm_term",
        "utm_content",
    ];

    /// Builds the attribution from query-string pairs, ignoring unrelated
    /// keys and blank values.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut utm = Self::default();
        for (key, value) in pairs {
            utm.set(key.as_ref(), value.into());
        }
        utm
    }

    /// Returns false when `key` is not an UTM field.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "utm_source" => &mut self.utm_source,
            "utm_medium" => &mut self.utm_medium,
            "utm_campaign" => &mut self.utm_campaign,
            "utm_term" => &mut self.utm_term,
            "utm_content" => &mut self.utm_content,
            _ => return false,
        };
        let value = value.trim().to_string();
        *slot = if value.is_empty() { None } else { Some(value) };
        true
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
