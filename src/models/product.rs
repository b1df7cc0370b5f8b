use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Seasonal availability tag carried by every product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
    /// Matches every season
    YearRound,
}

impl Season {
    /// Fixed month→season table, southern hemisphere:
    /// Dec,Jan,Feb→Summer; Mar,Apr,May→Autumn; Jun,Jul,Aug→Winter;
    /// Sep,Oct,Nov→Spring.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    /// The season of today's calendar month
    pub fn current() -> Self {
        Season::from_month(Utc::now().month())
    }

    /// Whether a product tagged `self` is available during `season`
    pub fn available_in(self, season: Season) -> bool {
        self == Season::YearRound || self == season
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::YearRound => "year_round",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "year_round" => Ok(Season::YearRound),
            other => Err(format!("unknown season tag: {other}")),
        }
    }
}

/// A catalog product offered by producers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    /// Unique; matched case-insensitively by the preference filter
    pub name: String,
    pub seasonality: Season,
    pub description: Option<String>,
}

/// One producer↔product stock link; a pair appears at most once
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct InventoryEntry {
    pub producer_id: i64,
    pub product_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_table() {
        assert_eq!(Season::from_month(12), Season::Summer);
        assert_eq!(Season::from_month(1), Season::Summer);
        assert_eq!(Season::from_month(2), Season::Summer);
        assert_eq!(Season::from_month(3), Season::Autumn);
        assert_eq!(Season::from_month(5), Season::Autumn);
        assert_eq!(Season::from_month(6), Season::Winter);
        assert_eq!(Season::from_month(8), Season::Winter);
        assert_eq!(Season::from_month(9), Season::Spring);
        assert_eq!(Season::from_month(11), Season::Spring);
    }

    #[test]
    fn test_year_round_matches_any_season() {
        for season in [
            Season::Summer,
            Season::Autumn,
            Season::Winter,
            Season::Spring,
        ] {
            assert!(Season::YearRound.available_in(season));
        }
    }

    #[test]
    fn test_season_only_matches_itself() {
        assert!(Season::Winter.available_in(Season::Winter));
        assert!(!Season::Winter.available_in(Season::Summer));
    }

    #[test]
    fn test_round_trip_str() {
        for season in [
            Season::Summer,
            Season::Autumn,
            Season::Winter,
            Season::Spring,
            Season::YearRound,
        ] {
            assert_eq!(season.as_str().parse::<Season>(), Ok(season));
        }
        assert!("carnival".parse::<Season>().is_err());
    }
}
