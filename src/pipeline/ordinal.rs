//! Ordinal scales for categorical survey answers
//!
//! Each scale is a closed enumeration with an explicit rank. Ranking is
//! independent of how a value is spelled in the source data or labelled for
//! display, so the same enum serves sorting, scoring and grouping.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Client age bracket. `Unknown` is the catch-all and always ranks last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "18-54")]
    From18To54,
    #[serde(rename = "55-69")]
    From55To69,
    #[serde(rename = "70-85")]
    From70To85,
    #[serde(rename = "85+")]
    Over85,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AgeBracket {
    /// The two youngest brackets
    pub const YOUNGER: [AgeBracket; 2] = [AgeBracket::From18To54, AgeBracket::From55To69];

    /// The two oldest known brackets
    pub const OLDER: [AgeBracket; 2] = [AgeBracket::From70To85, AgeBracket::Over85];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "18-54" => Some(AgeBracket::From18To54),
            "55-69" => Some(AgeBracket::From55To69),
            "70-85" => Some(AgeBracket::From70To85),
            "85+" => Some(AgeBracket::Over85),
            s if s.eq_ignore_ascii_case("unknown") => Some(AgeBracket::Unknown),
            _ => None,
        }
    }

    pub fn rank(self) -> usize {
        self as usize
    }
}

/// How long a client has been receiving programme services
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProgramDuration {
    #[serde(rename = "1-3 months")]
    OneToThreeMonths,
    #[serde(rename = "3-6 months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12 months")]
    SixToTwelveMonths,
    #[serde(rename = "1-2 years")]
    OneToTwoYears,
    #[serde(rename = "more than 2 years")]
    MoreThanTwoYears,
}

impl ProgramDuration {
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "1-3 months" => Some(ProgramDuration::OneToThreeMonths),
            "3-6 months" => Some(ProgramDuration::ThreeToSixMonths),
            "6-12 months" => Some(ProgramDuration::SixToTwelveMonths),
            "1-2 years" => Some(ProgramDuration::OneToTwoYears),
            "more than 2 years" => Some(ProgramDuration::MoreThanTwoYears),
            _ => None,
        }
    }

    /// Ordinal position, 1 for the shortest bucket through 5 for the longest
    pub fn position(self) -> u8 {
        self as u8 + 1
    }

    /// Raw answers for the newest clients contain the `1-3` marker
    pub fn is_new_client_answer(raw: &str) -> bool {
        raw.contains("1-3")
    }
}

/// General health self-assessment on a five point scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthRating {
    Excellent,
    VeryGood,
    Good,
    Satisfactory,
    Bad,
}

impl HealthRating {
    /// Parse either the English or the Russian coding of the questionnaire
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1. Excellent" | "1. Отличное" => Some(HealthRating::Excellent),
            "2. Very good" | "2. Очень хорошее" => Some(HealthRating::VeryGood),
            "3. Good" | "3. Хорошее" => Some(HealthRating::Good),
            "4. Satisfactory" | "4. Удовлетворительное" => Some(HealthRating::Satisfactory),
            "5. Bad" | "5. Плохое" => Some(HealthRating::Bad),
            _ => None,
        }
    }

    /// Questionnaire order, 1 (excellent) through 5 (bad)
    pub fn order(self) -> u8 {
        self as u8 + 1
    }

    /// Health score, 5 (best) through 1 (worst)
    pub fn score(self) -> u8 {
        6 - self.order()
    }
}

/// How the categories of a distribution are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Descending count, ties broken by label
    Frequency,
    AgeBracket,
    ProgramDuration,
    HealthRating,
    /// Ascending numeric value of the label, for rating scales
    Numeric,
}

impl CategoryOrder {
    /// Rank of a raw label under this ordering, `None` for unmapped values
    pub fn rank(self, raw: &str) -> Option<f64> {
        match self {
            CategoryOrder::Frequency => None,
            CategoryOrder::AgeBracket => AgeBracket::parse(raw).map(|a| a.rank() as f64),
            CategoryOrder::ProgramDuration => {
                ProgramDuration::parse(raw).map(|d| d.position() as f64)
            }
            CategoryOrder::HealthRating => HealthRating::parse(raw).map(|h| h.order() as f64),
            CategoryOrder::Numeric => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Compare two `(label, count)` entries. Unmapped labels sort after every
    /// ranked label and among themselves by label.
    pub fn compare(self, a: (&str, usize), b: (&str, usize)) -> Ordering {
        if self == CategoryOrder::Frequency {
            return b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0));
        }
        match (self.rank(a.0), self.rank(b.0)) {
            (Some(ra), Some(rb)) => ra.partial_cmp(&rb).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.0.cmp(b.0),
        }
    }

    /// Sort a list of labels in place
    pub fn sort_labels(self, labels: &mut [String]) {
        labels.sort_by(|a, b| self.compare((a, 0), (b, 0)));
    }
}
