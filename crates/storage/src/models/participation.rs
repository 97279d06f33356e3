use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Prize;

/// One receipt scan, produced by the external OCR pipeline.
///
/// `registration_id` is omitted by endpoints that already scope the list to
/// a single registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub id: String,
    #[serde(rename = "inscription_id", default)]
    pub registration_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(rename = "ocr_montant", default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "ocr_date_achat", default)]
    pub purchase_date: Option<String>,
    #[serde(rename = "ocr_heure_achat", default)]
    pub purchase_time: Option<String>,
    #[serde(default)]
    pub ocr_restaurant: Option<String>,
    #[serde(default)]
    pub restaurant: Option<Restaurant>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(rename = "statut_validation", default)]
    pub validation_status: String,
    #[serde(rename = "raison_invalide", default)]
    pub invalid_reason: Option<String>,
    #[serde(default)]
    pub has_won: bool,
    #[serde(rename = "lot", default)]
    pub prize: Option<Prize>,
    #[serde(default)]
    pub date_attribution: Option<String>,
    #[serde(rename = "score_ajoute", default)]
    pub score_added: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub nom: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Pending,
    Valid,
    Invalid { reason: Option<String> },
}

impl ValidationStatus {
    /// Maps the gateway's free-form status label. Anything that is neither
    /// a validation nor a rejection is still pending review.
    pub fn from_wire(label: &str, reason: Option<&str>) -> Self {
        let label = label.trim().to_lowercase();

        if label.starts_with("invalid") || label.starts_with("refus") || label.starts_with("rejet")
        {
            Self::Invalid {
                reason: reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(String::from),
            }
        } else if label.starts_with("valid") {
            Self::Valid
        } else {
            Self::Pending
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl Participation {
    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_wire(&self.validation_status, self.invalid_reason.as_deref())
    }

    /// Restaurant name, preferring the matched record over the OCR guess
    pub fn restaurant_name(&self) -> Option<&str> {
        self.restaurant
            .as_ref()
            .map(|r| r.nom.as_str())
            .or(self.ocr_restaurant.as_deref())
    }

    /// Prize awarded to this participation, if any
    pub fn won_prize(&self) -> Option<&Prize> {
        if self.has_won { self.prize.as_ref() } else { None }
    }
}
