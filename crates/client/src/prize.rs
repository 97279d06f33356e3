use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use storage::{dto::prize::PrizeCheckResponse, models::Prize};
use tokio::task::JoinHandle;

use crate::{display::rank_label, gateway::FunctionGateway, tasks::detach};

/// How many points a validated receipt is worth. The gateway keeps the
/// authoritative score; this only drives the confirmation copy, so the
/// caller picks the rule its campaign uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsFormula {
    Flat { points: i64 },
    /// `ceil(amount) * per_unit`
    AmountScaled { per_unit: i64 },
}

impl PointsFormula {
    pub fn points(&self, amount: Option<Decimal>) -> i64 {
        match self {
            Self::Flat { points } => *points,
            Self::AmountScaled { per_unit } => {
                let Some(amount) = amount else {
                    return 0;
                };
                match amount.ceil().to_i64().and_then(|units| units.checked_mul(*per_unit)) {
                    Some(points) => points,
                    None => {
                        tracing::warn!("Amount {} out of range for points, awarding 0", amount);
                        0
                    }
                }
            }
        }
    }
}

impl FromStr for PointsFormula {
    type Err = String;

    /// Parses `flat:<points>` or `scaled:<points per unit>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected flat:<n> or scaled:<n>, got '{}'", s))?;
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|e| format!("invalid points value '{}': {}", value, e))?;

        match kind.trim() {
            "flat" => Ok(Self::Flat { points: value }),
            "scaled" => Ok(Self::AmountScaled { per_unit: value }),
            other => Err(format!("unknown points formula '{}'", other)),
        }
    }
}

/// Asks the gateway whether a participation won something. Runs detached:
/// a failure is logged and yields `None`.
pub fn check_prize(
    gateway: Arc<dyn FunctionGateway>,
    participation_id: impl Into<String>,
) -> JoinHandle<Option<PrizeCheckResponse>> {
    let participation_id = participation_id.into();
    detach("prize-check", async move {
        let response = gateway.attribute_prize(&participation_id).await?;
        tracing::info!(
            "Prize check for {}: {} (won: {})",
            participation_id,
            response.result,
            response.gain
        );
        Ok::<_, crate::ClientError>(response)
    })
}

/// Post-validation screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationScreen {
    pub points_awarded: i64,
    pub total_score: Option<i64>,
    pub rank_label: Option<String>,
    pub prize: Option<Prize>,
}

impl ConfirmationScreen {
    pub fn with_prize(mut self, check: Option<&PrizeCheckResponse>) -> Self {
        self.prize = check.and_then(|c| c.won_prize()).cloned();
        self
    }

    pub fn headline(&self) -> String {
        format!("+{} points", self.points_awarded)
    }
}

pub struct ConfirmationFlow {
    gateway: Arc<dyn FunctionGateway>,
    formula: PointsFormula,
}

impl ConfirmationFlow {
    pub fn new(gateway: Arc<dyn FunctionGateway>, formula: PointsFormula) -> Self {
        Self { gateway, formula }
    }

    /// Starts the prize check in the background, then builds the screen from
    /// the user's current standing. The screen never waits on the prize
    /// check; merge its result later with [`ConfirmationScreen::with_prize`].
    pub async fn load(
        &self,
        inscription_id: &str,
        participation_id: &str,
    ) -> (ConfirmationScreen, JoinHandle<Option<PrizeCheckResponse>>) {
        let prize = check_prize(self.gateway.clone(), participation_id);

        let screen = match self.gateway.user_participations(inscription_id).await {
            Ok(data) => {
                let amount = data
                    .participations
                    .iter()
                    .find(|p| p.id == participation_id)
                    .and_then(|p| p.amount);
                ConfirmationScreen {
                    points_awarded: self.formula.points(amount),
                    total_score: Some(data.user.score),
                    rank_label: (data.user.rank > 0).then(|| rank_label(data.user.rank)),
                    prize: None,
                }
            }
            Err(e) => {
                tracing::warn!("Could not load standing for {}: {}", inscription_id, e);
                ConfirmationScreen {
                    points_awarded: self.formula.points(None),
                    total_score: None,
                    rank_label: None,
                    prize: None,
                }
            }
        };

        (screen, prize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use storage::dto::participation::UserParticipations;

    fn standing() -> UserParticipations {
        serde_json::from_value(serde_json::json!({
            "user": {
                "prenom": "Léa",
                "nom": "Martin",
                "participationsCount": 1,
                "score": 600,
                "classement": 2,
                "totalInscrits": 40
            },
            "participations": [{"id": "p1", "ocr_montant": "12.30"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_points_formulas() {
        let amount = Some(Decimal::new(1230, 2));
        assert_eq!(PointsFormula::Flat { points: 300 }.points(amount), 300);
        assert_eq!(PointsFormula::AmountScaled { per_unit: 300 }.points(amount), 3900);
        assert_eq!(PointsFormula::AmountScaled { per_unit: 300 }.points(None), 0);
    }

    #[test]
    fn test_out_of_range_amount_awards_nothing() {
        let scaled = PointsFormula::AmountScaled { per_unit: 300 };
        assert_eq!(scaled.points(Some(Decimal::from(100_000_000_000_000_000i64))), 0);
        assert_eq!(scaled.points(Some(Decimal::MAX)), 0);
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!("flat:300".parse(), Ok(PointsFormula::Flat { points: 300 }));
        assert_eq!(
            "scaled:300".parse(),
            Ok(PointsFormula::AmountScaled { per_unit: 300 })
        );
        assert!("300".parse::<PointsFormula>().is_err());
        assert!("bonus:1".parse::<PointsFormula>().is_err());
    }

    #[tokio::test]
    async fn test_prize_failure_is_swallowed() {
        let gateway = Arc::new(FakeGateway::default());
        *gateway.participations.lock().unwrap() = Some(standing());

        let flow = ConfirmationFlow::new(gateway, PointsFormula::AmountScaled { per_unit: 300 });
        let (screen, prize) = flow.load("abc123", "p1").await;

        assert_eq!(screen.points_awarded, 3900);
        assert_eq!(screen.total_score, Some(600));
        assert_eq!(screen.rank_label.as_deref(), Some("2e"));

        let check = prize.await.unwrap();
        assert!(check.is_none());
        assert_eq!(screen.with_prize(check.as_ref()).prize, None);
    }

    #[tokio::test]
    async fn test_won_prize_is_merged() {
        let gateway = Arc::new(FakeGateway::default());
        *gateway.prize.lock().unwrap() = Some(PrizeCheckResponse {
            result: "gagne".to_string(),
            gain: true,
            prize: Some(Prize {
                title: "Menu Best Of".to_string(),
                image: None,
                instructions: Some("Présentez ce message en caisse".to_string()),
            }),
            reason: None,
        });

        let flow = ConfirmationFlow::new(gateway, PointsFormula::Flat { points: 300 });
        let (screen, prize) = flow.load("abc123", "p1").await;

        assert_eq!(screen.total_score, None);
        let screen = screen.with_prize(prize.await.unwrap().as_ref());
        assert_eq!(screen.prize.unwrap().title, "Menu Best Of");
    }
}
