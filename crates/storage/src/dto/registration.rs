use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{Participation, Registration, UtmParams};

lazy_static! {
    /// French mobile or landline: `0` or `+33`, a non-zero digit, then four
    /// digit pairs optionally separated by a space, dot or dash.
    static ref FRENCH_PHONE: Regex =
        Regex::new(r"^(0|\+33)[1-9]([-. ]?[0-9]{2}){4}$").expect("phone pattern is valid");
}

/// Request payload for the registration function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[serde(rename = "nom")]
    #[validate(length(min = 2, message = "Le nom doit contenir au moins 2 caractères."))]
    pub last_name: String,

    #[serde(rename = "prenom")]
    #[validate(length(min = 2, message = "Le prénom doit contenir au moins 2 caractères."))]
    pub first_name: String,

    #[validate(email(message = "Veuillez saisir une adresse email valide."))]
    pub email: String,

    #[serde(rename = "telephone")]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[serde(rename = "accepte_reglement")]
    pub accepts_rules: bool,

    #[serde(rename = "accepte_marketing", default)]
    pub accepts_marketing: bool,

    #[serde(flatten)]
    pub utm: UtmParams,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if FRENCH_PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("Veuillez saisir un numéro de téléphone valide.".into()))
    }
}

impl RegistrationRequest {
    /// Runs the field rules plus the mandatory rules-acceptance checkbox.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !self.accepts_rules {
            errors.add(
                "accepte_reglement",
                ValidationError::new("required")
                    .with_message("Vous devez accepter le règlement pour participer.".into()),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Prefills a new submission from a cached profile snapshot
    pub fn from_profile(profile: &Registration) -> Self {
        Self {
            last_name: profile.last_name.clone(),
            first_name: profile.first_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            accepts_rules: profile.accepts_rules,
            accepts_marketing: profile.accepts_marketing,
            utm: profile.utm.clone(),
        }
    }
}

/// The registration function answers with either one record or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub data: Option<OneOrMany<Registration>>,
    #[serde(default)]
    pub exists: bool,
}

/// Return-visit lookup of a cached identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationLookupRequest {
    pub inscription_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationLookupResponse {
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub participations: Vec<Participation>,
}
