use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Row of the admin-facing winners list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Winner {
    #[serde(rename = "nom", default)]
    pub last_name: String,
    #[serde(rename = "prenom", default)]
    pub first_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    #[serde(rename = "lot_titre", default)]
    pub prize_title: String,
    #[serde(rename = "type_lot_nom", default)]
    pub prize_type: String,
    #[serde(default)]
    pub date_attribution: String,
    #[serde(rename = "statut_validation", default)]
    pub validation_status: String,
}
