use std::sync::Arc;
use std::time::Duration;

use storage::{
    IdentityCache,
    dto::participation::UserParticipations,
    models::{Participation, UserSummary},
};

use crate::{
    display::{ParticipationCard, ProfileCard},
    error::Result,
    gateway::FunctionGateway,
    refresh::{RefreshHandle, Refresher},
    state::{ViewState, failure_message},
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

const GENERIC_FAILURE: &str = "Erreur lors de la récupération des données";

/// Everything the participation page renders for one user
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationView {
    pub summary: UserSummary,
    pub card: ProfileCard,
    pub participations: Vec<ParticipationCard>,
    pub raw: Vec<Participation>,
}

impl ParticipationView {
    /// `None` when the user has nothing to show yet
    fn build(data: UserParticipations) -> Option<Self> {
        let card = ProfileCard::from_summary(&data.user)?;
        let participations = data.participations.iter().map(ParticipationCard::from).collect();

        Some(Self {
            summary: data.user,
            card,
            participations,
            raw: data.participations,
        })
    }
}

/// URL parameter wins over the cache; a URL identifier is remembered when
/// nothing is cached yet.
pub fn resolve_identifier(url_id: Option<&str>, cache: &IdentityCache) -> Result<Option<String>> {
    let url_id = url_id.map(str::trim).filter(|id| !id.is_empty());
    let cached = cache.get()?;

    match (url_id, cached) {
        (Some(id), None) => {
            cache.set_identifier(id)?;
            Ok(Some(id.to_string()))
        }
        (Some(id), Some(_)) => Ok(Some(id.to_string())),
        (None, cached) => Ok(cached),
    }
}

#[derive(Clone)]
pub struct ParticipationViewModel {
    gateway: Arc<dyn FunctionGateway>,
}

impl ParticipationViewModel {
    pub fn new(gateway: Arc<dyn FunctionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn load(&self, inscription_id: &str) -> ViewState<ParticipationView> {
        match self.gateway.user_participations(inscription_id).await {
            Ok(data) => match ParticipationView::build(data) {
                Some(view) => ViewState::Ready(view),
                None => ViewState::Empty,
            },
            Err(e) => {
                tracing::error!("Failed to load participations for {}: {}", inscription_id, e);
                ViewState::Failed(failure_message(&e, GENERIC_FAILURE))
            }
        }
    }

    /// Keeps the view fresh until the returned handle is cancelled or dropped
    pub fn watch(
        &self,
        inscription_id: impl Into<String>,
        period: Duration,
    ) -> RefreshHandle<ViewState<ParticipationView>> {
        let inscription_id = inscription_id.into();
        let view_model = self.clone();

        Refresher::spawn(period, ViewState::Loading, move || {
            let view_model = view_model.clone();
            let inscription_id = inscription_id.clone();
            async move { view_model.load(&inscription_id).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use storage::models::ValidationStatus;

    fn user(count: u32, score: i64) -> UserSummary {
        UserSummary {
            first_name: "Léa".to_string(),
            last_name: "Martin".to_string(),
            participations_count: count,
            score,
            rank: 4,
            total_registrations: 120,
        }
    }

    fn participation(id: &str, status: &str) -> Participation {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "ocr_montant": "18.90",
            "ocr_date_achat": "2025-07-14",
            "ocr_heure_achat": "12:31",
            "ocr_restaurant": "MCDO FDF",
            "statut_validation": status,
            "score_ajoute": 125
        }))
        .unwrap()
    }

    fn gateway_with(data: Option<UserParticipations>) -> Arc<FakeGateway> {
        let gateway = Arc::new(FakeGateway::default());
        *gateway.participations.lock().unwrap() = data;
        gateway
    }

    #[tokio::test]
    async fn test_no_participation_renders_nothing() {
        let gateway = gateway_with(Some(UserParticipations {
            user: user(0, 0),
            participations: Vec::new(),
        }));

        let state = ParticipationViewModel::new(gateway).load("abc123").await;
        assert_eq!(state, ViewState::Empty);
    }

    #[tokio::test]
    async fn test_two_participations() {
        let gateway = gateway_with(Some(UserParticipations {
            user: user(2, 250),
            participations: vec![participation("p1", "validé"), participation("p2", "en_attente")],
        }));

        let state = ParticipationViewModel::new(gateway).load("abc123").await;
        let view = state.ready().unwrap();

        assert_eq!(view.card.participation_text, "2 participations enregistrées");
        assert_eq!(view.card.points.to_string(), "250");
        assert_eq!(view.card.position, "4/120");
        assert_eq!(view.participations.len(), 2);
        assert_eq!(view.participations[0].purchased_at, "14/07/2025 à 12:31");
        assert_eq!(view.participations[0].status, ValidationStatus::Valid);
        assert_eq!(view.participations[1].status, ValidationStatus::Pending);
    }

    #[tokio::test]
    async fn test_failure_uses_generic_message() {
        let state = ParticipationViewModel::new(gateway_with(None)).load("abc123").await;
        assert_eq!(state, ViewState::Failed(GENERIC_FAILURE.to_string()));
    }

    #[tokio::test]
    async fn test_failure_carries_server_message() {
        let gateway = gateway_with(None);
        *gateway.error_message.lock().unwrap() = Some("Inscription introuvable".to_string());

        let state = ParticipationViewModel::new(gateway).load("abc123").await;
        assert_eq!(state, ViewState::Failed("Inscription introuvable".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_polls_until_cancelled() {
        let gateway = gateway_with(Some(UserParticipations {
            user: user(1, 100),
            participations: vec![participation("p1", "validé")],
        }));
        let view_model = ParticipationViewModel::new(gateway.clone());

        let handle = view_model.watch("abc123", DEFAULT_REFRESH_INTERVAL);
        let mut updates = handle.subscribe();
        updates.changed().await.unwrap();
        assert!(handle.current().ready().is_some());

        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL * 2 + Duration::from_secs(1)).await;
        let polled = *gateway.participation_calls.lock().unwrap();
        assert!(polled >= 3, "expected periodic polling, got {polled} calls");

        handle.cancel();
        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL * 3).await;
        assert_eq!(*gateway.participation_calls.lock().unwrap(), polled);
    }

    #[test]
    fn test_url_identifier_is_remembered() {
        let cache = IdentityCache::in_memory();

        let resolved = resolve_identifier(Some("abc123"), &cache).unwrap();
        assert_eq!(resolved.as_deref(), Some("abc123"));
        assert_eq!(cache.get().unwrap().as_deref(), Some("abc123"));

        let resolved = resolve_identifier(Some("other"), &cache).unwrap();
        assert_eq!(resolved.as_deref(), Some("other"));
        assert_eq!(cache.get().unwrap().as_deref(), Some("abc123"));

        assert_eq!(resolve_identifier(None, &cache).unwrap().as_deref(), Some("abc123"));
    }
}
