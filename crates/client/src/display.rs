use chrono::NaiveDate;
use rust_decimal::Decimal;
use storage::{
    dto::statistics::Statistics,
    models::{Participation, SiteSettings, UserSummary, ValidationStatus},
};

/// Ordinal shown next to a leaderboard position: "1er", "2e", "3e", "{n}e"
pub fn rank_label(rank: u32) -> String {
    match rank {
        1 => "1er".to_string(),
        n => format!("{}e", n),
    }
}

/// Public short name, e.g. "Léa M."
pub fn short_name(first_name: &str, last_name: &str) -> String {
    match last_name.trim().chars().next() {
        Some(initial) => format!("{} {}.", first_name.trim(), initial),
        None => first_name.trim().to_string(),
    }
}

pub fn participation_count_text(count: u32) -> String {
    if count == 1 {
        "1 participation enregistrée".to_string()
    } else {
        format!("{} participations enregistrées", count)
    }
}

/// Profile summary card shown on the participation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub display_name: String,
    pub participation_text: String,
    pub points: i64,
    /// "{rank}/{total registrations}"
    pub position: String,
}

impl ProfileCard {
    /// `None` when the user has no participation yet: the card is not
    /// rendered at all.
    pub fn from_summary(user: &UserSummary) -> Option<Self> {
        if user.participations_count == 0 {
            return None;
        }

        Some(Self {
            display_name: short_name(&user.first_name, &user.last_name),
            participation_text: participation_count_text(user.participations_count),
            points: user.score,
            position: format!("{}/{}", user.rank, user.total_registrations),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationCard {
    pub id: String,
    pub restaurant: String,
    /// "dd/mm/yyyy à HH:MM"
    pub purchased_at: String,
    pub amount: String,
    pub status: ValidationStatus,
    pub prize_title: Option<String>,
    pub prize_instructions: Option<String>,
    pub score_added: i64,
}

impl From<&Participation> for ParticipationCard {
    fn from(participation: &Participation) -> Self {
        let date = participation
            .purchase_date
            .as_deref()
            .map(format_date)
            .unwrap_or_default();
        let purchased_at = match participation.purchase_time.as_deref() {
            Some(time) if !time.is_empty() => format!("{} à {}", date, time),
            _ => date,
        };
        let prize = participation.won_prize();

        Self {
            id: participation.id.clone(),
            restaurant: participation.restaurant_name().unwrap_or_default().to_string(),
            purchased_at,
            amount: participation.amount.map(format_amount).unwrap_or_default(),
            status: participation.status(),
            prize_title: prize.map(|p| p.title.clone()),
            prize_instructions: prize.and_then(|p| p.instructions.clone()),
            score_added: participation.score_added,
        }
    }
}

/// Formats an ISO date (optionally with a time part) as dd/mm/yyyy; other
/// inputs are returned unchanged.
pub fn format_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{}€", amount.normalize())
}

/// Site colors with the campaign defaults filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTheme {
    pub text_color: String,
    pub button_background_color: String,
    pub button_text_color: String,
    pub button_border_radius: String,
}

impl SiteTheme {
    pub fn resolve(settings: Option<&SiteSettings>) -> Self {
        let pick = |value: Option<&String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            text_color: pick(settings.and_then(|s| s.texte_color.as_ref()), "#000000"),
            button_background_color: pick(
                settings.and_then(|s| s.button_background_color.as_ref()),
                "#01C9E7",
            ),
            button_text_color: pick(
                settings.and_then(|s| s.button_text_color.as_ref()),
                "#FFFFFF",
            ),
            button_border_radius: settings
                .and_then(|s| s.button_border_radius)
                .filter(|radius| *radius > 0)
                .map(|radius| format!("{}px", radius))
                .unwrap_or_else(|| "4px".to_string()),
        }
    }

    pub fn css_variables(&self) -> String {
        format!(
            ":root {{\n  --texte-color: {};\n  --button-background-color: {};\n  --button-text-color: {};\n  --button-border-radius: {};\n}}",
            self.text_color,
            self.button_background_color,
            self.button_text_color,
            self.button_border_radius
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub participations: u64,
}

/// Chart series sorted by calendar date; unparseable keys go last
pub fn daily_participations(stats: &Statistics) -> Vec<DailyCount> {
    let mut series: Vec<(Option<NaiveDate>, DailyCount)> = stats
        .participations_per_day
        .iter()
        .map(|(date, count)| {
            (
                date.get(..10)
                    .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
                DailyCount {
                    date: date.clone(),
                    participations: *count,
                },
            )
        })
        .collect();

    series.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    series.into_iter().map(|(_, count)| count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn summary(count: u32, score: i64) -> UserSummary {
        UserSummary {
            first_name: "Léa".to_string(),
            last_name: "Martin".to_string(),
            participations_count: count,
            score,
            rank: 4,
            total_registrations: 120,
        }
    }

    #[test]
    fn test_rank_labels() {
        assert_eq!(rank_label(1), "1er");
        assert_eq!(rank_label(2), "2e");
        assert_eq!(rank_label(3), "3e");
        assert_eq!(rank_label(4), "4e");
        assert_eq!(rank_label(21), "21e");
    }

    #[test]
    fn test_no_card_without_participations() {
        assert_eq!(ProfileCard::from_summary(&summary(0, 0)), None);
    }

    #[test]
    fn test_card_with_two_participations() {
        let card = ProfileCard::from_summary(&summary(2, 250)).unwrap();
        assert_eq!(card.display_name, "Léa M.");
        assert_eq!(card.participation_text, "2 participations enregistrées");
        assert_eq!(card.points, 250);
        assert_eq!(card.position, "4/120");
    }

    #[test]
    fn test_single_participation_text() {
        assert_eq!(participation_count_text(1), "1 participation enregistrée");
    }

    #[test]
    fn test_participation_card_formatting() {
        let participation: Participation = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "ocr_montant": "12.50",
            "ocr_date_achat": "2025-08-09",
            "ocr_heure_achat": "12:34",
            "ocr_restaurant": "MCDO DILLON",
            "statut_validation": "validé",
            "has_won": true,
            "lot": {"titre": "Un sundae offert", "instructions": "Présentez ce message en caisse"},
            "score_ajoute": 300
        }))
        .unwrap();

        let card = ParticipationCard::from(&participation);
        assert_eq!(card.restaurant, "MCDO DILLON");
        assert_eq!(card.purchased_at, "09/08/2025 à 12:34");
        assert_eq!(card.amount, "12.5€");
        assert_eq!(card.status, ValidationStatus::Valid);
        assert_eq!(card.prize_title.as_deref(), Some("Un sundae offert"));
        assert_eq!(card.score_added, 300);
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("2025-08-09T10:00:00Z"), "09/08/2025");
        assert_eq!(format_date("hier"), "hier");
        assert_eq!(format_amount(Decimal::from_str("8").unwrap()), "8€");
    }

    #[test]
    fn test_theme_defaults() {
        let theme = SiteTheme::resolve(None);
        assert_eq!(theme.button_background_color, "#01C9E7");
        assert_eq!(theme.button_border_radius, "4px");

        let settings = SiteSettings {
            texte_color: Some("#111111".to_string()),
            button_border_radius: Some(12),
            ..SiteSettings::default()
        };
        let theme = SiteTheme::resolve(Some(&settings));
        assert_eq!(theme.text_color, "#111111");
        assert_eq!(theme.button_text_color, "#FFFFFF");
        assert!(theme.css_variables().contains("--button-border-radius: 12px;"));
    }

    #[test]
    fn test_daily_series_sorted_by_date() {
        let mut stats = Statistics::default();
        stats.participations_per_day.insert("2025-08-10".to_string(), 4);
        stats.participations_per_day.insert("unknown".to_string(), 1);
        stats.participations_per_day.insert("2025-08-07".to_string(), 9);

        let series = daily_participations(&stats);
        let dates: Vec<&str> = series.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-07", "2025-08-10", "unknown"]);
        assert_eq!(series[0].participations, 9);
    }
}
