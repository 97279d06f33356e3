use std::sync::Arc;

use reqwest::Url;
use storage::{
    IdentityCache,
    dto::registration::RegistrationRequest,
    models::{Registration, UtmParams},
};
use validator::ValidationErrors;

use crate::{
    error::{ClientError, Result},
    gateway::FunctionGateway,
};

/// Where the user lands after a flow completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Participation { inscription_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Participation { inscription_id } => {
                format!("/participation?id={}", inscription_id)
            }
        }
    }
}

/// Which confirmation copy to show; both lead to the same route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Registered,
    AlreadyRegistered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub registration: Registration,
    pub confirmation: Confirmation,
    pub next: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// The cached identifier is known to the gateway
    Redirect(Route),
    /// Show the form, prefilled from the cached snapshot when there is one
    Form {
        prefill: Option<RegistrationRequest>,
        has_participated: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flattens validation failures into inline per-field messages
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Notification text for a failed submission
pub fn submission_error_message(err: &ClientError) -> String {
    match err {
        ClientError::HttpStatus { status, .. } => err
            .server_message()
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status)),
        ClientError::UnexpectedResponse(_) => "Réponse inattendue du serveur".to_string(),
        ClientError::ValidationError(_) => {
            "Veuillez corriger les erreurs dans le formulaire".to_string()
        }
        other => other.to_string(),
    }
}

/// Strips the separators the phone grammar tolerates: whitespace, dots, dashes
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .collect()
}

/// Reads UTM attribution from the landing page URL
pub fn utm_from_url(url: &str) -> UtmParams {
    match Url::parse(url) {
        Ok(url) => UtmParams::from_pairs(url.query_pairs().map(|(k, v)| (k, v.into_owned()))),
        Err(e) => {
            tracing::debug!("Ignoring unparsable landing URL {}: {}", url, e);
            UtmParams::default()
        }
    }
}

pub struct RegistrationFlow {
    gateway: Arc<dyn FunctionGateway>,
    cache: IdentityCache,
}

impl RegistrationFlow {
    pub fn new(gateway: Arc<dyn FunctionGateway>, cache: IdentityCache) -> Self {
        Self { gateway, cache }
    }

    /// Validates the form and normalizes it for sending. Nothing touches the
    /// network until this succeeds.
    pub fn prepare(
        form: RegistrationRequest,
    ) -> std::result::Result<RegistrationRequest, ValidationErrors> {
        form.check()?;
        Ok(RegistrationRequest {
            phone: normalize_phone(&form.phone),
            ..form
        })
    }

    /// Submits a registration. Whether the gateway created the account or
    /// found an existing one, the identifier is cached and the user is sent
    /// to the participation page. Failures are not retried.
    pub async fn submit(&self, form: RegistrationRequest) -> Result<RegistrationOutcome> {
        let request = Self::prepare(form)?;

        let response = self.gateway.register(&request).await?;
        let registration = response
            .data
            .and_then(|data| data.into_first())
            .ok_or_else(|| {
                ClientError::UnexpectedResponse("missing registration data".to_string())
            })?;

        self.cache.set(&registration.id, &registration)?;
        tracing::info!(
            "Registration {} cached (existing: {})",
            registration.id,
            response.exists
        );

        let confirmation = if response.exists {
            Confirmation::AlreadyRegistered
        } else {
            Confirmation::Registered
        };
        let next = Route::Participation {
            inscription_id: registration.id.clone(),
        };

        Ok(RegistrationOutcome {
            registration,
            confirmation,
            next,
        })
    }

    /// Return visit: a cached identifier the gateway still knows skips the
    /// form entirely. Lookup failures fall back to the form silently.
    pub async fn resume(&self) -> ResumeOutcome {
        let prefill = match self.cache.profile() {
            Ok(profile) => profile.as_ref().map(RegistrationRequest::from_profile),
            Err(e) => {
                tracing::warn!("Could not read cached profile: {}", e);
                None
            }
        };

        let identifier = match self.cache.get() {
            Ok(Some(id)) => id,
            Ok(None) => {
                return ResumeOutcome::Form {
                    prefill,
                    has_participated: false,
                };
            }
            Err(e) => {
                tracing::warn!("Could not read cached identifier: {}", e);
                return ResumeOutcome::Form {
                    prefill,
                    has_participated: false,
                };
            }
        };

        match self.gateway.lookup_registration(&identifier).await {
            Ok(lookup) if lookup.exists => ResumeOutcome::Redirect(Route::Participation {
                inscription_id: identifier,
            }),
            Ok(lookup) => ResumeOutcome::Form {
                prefill,
                has_participated: !lookup.participations.is_empty(),
            },
            Err(e) => {
                tracing::debug!("Registration lookup failed, showing form: {}", e);
                ResumeOutcome::Form {
                    prefill,
                    has_participated: false,
                }
            }
        }
    }
}
