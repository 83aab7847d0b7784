//! Research hypothesis evaluation
//!
//! Three fixed hypotheses, each a pure function of the filtered table:
//!
//! - H1: younger clients prefer physical activities, older clients prefer
//!   social and psychological support
//! - H2: new clients (1-3 months) rate the help lower than existing clients
//! - H3: longer participation goes with better self-assessed health
//!
//! Each evaluation returns `None` when the columns it needs are absent.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::debug;

use super::columns::{Dimension, ScalarField};
use super::correlation::pearson;
use super::frame::{indicator_values, mean, numeric_values, string_values};
use super::loader::SurveyTable;
use super::ordinal::{AgeBracket, HealthRating, ProgramDuration};

/// |r| below this is treated as no correlation
pub const CORRELATION_THRESHOLD: f64 = 0.1;

/// Participation rates of one age bracket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupPreference {
    pub age_range: String,
    /// Mean share of physical activities attended, in percent
    pub physical_percent: f64,
    /// Mean share of psychosocial activities attended, in percent
    pub psychosocial_percent: f64,
    pub clients: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePreferenceVerdict {
    Supported,
    PartiallySupportedPhysical,
    PartiallySupportedPsychosocial,
    NotSupported,
}

impl AgePreferenceVerdict {
    pub fn summary(self) -> &'static str {
        match self {
            Self::Supported => "hypothesis supported",
            Self::PartiallySupportedPhysical => "partially supported (physical leg only)",
            Self::PartiallySupportedPsychosocial => "partially supported (psychosocial leg only)",
            Self::NotSupported => "not supported",
        }
    }

    pub fn conclusion(self) -> &'static str {
        match self {
            Self::Supported => {
                "The data supports the hypothesis. Younger clients tend to participate more in physical activities, while older clients prefer psychosocial activities."
            }
            Self::PartiallySupportedPhysical => {
                "The data partially supports the hypothesis. Younger clients do participate more in physical activities, but there's no clear preference for psychosocial activities among older clients."
            }
            Self::PartiallySupportedPsychosocial => {
                "The data partially supports the hypothesis. Older clients do prefer psychosocial activities, but there's no clear preference for physical activities among younger clients."
            }
            Self::NotSupported => {
                "The data does not support the hypothesis. The observed preferences don't align with the expected pattern."
            }
        }
    }
}

/// H1 result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgePreferenceResult {
    pub physical_columns: Vec<String>,
    pub psychosocial_columns: Vec<String>,
    /// Per bracket, in age order, `unknown` excluded
    pub groups: Vec<AgeGroupPreference>,
    pub younger_physical: Option<f64>,
    pub older_physical: Option<f64>,
    pub younger_psychosocial: Option<f64>,
    pub older_psychosocial: Option<f64>,
    pub verdict: AgePreferenceVerdict,
}

/// H1: activity type preference by age bracket
pub fn evaluate_age_preference(table: &SurveyTable) -> Option<AgePreferenceResult> {
    let caps = table.capabilities();
    let physical = caps.physical_activities();
    let psychosocial = caps.psychosocial_activities();
    if !caps.has_dimension(Dimension::AgeRange) || (physical.is_empty() && psychosocial.is_empty())
    {
        return None;
    }

    let df = table.frame();
    let ages = string_values(df, Dimension::AgeRange.column())?;
    let physical_share = row_share(df, &physical);
    let psychosocial_share = row_share(df, &psychosocial);

    // Keyed by the raw label so unmapped brackets still form their own group
    let mut groups: BTreeMap<String, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for (row, age) in ages.iter().enumerate() {
        let Some(age) = age else { continue };
        if AgeBracket::parse(age) == Some(AgeBracket::Unknown) {
            continue;
        }
        let entry = groups.entry(age.clone()).or_default();
        entry.0.push(physical_share[row]);
        entry.1.push(psychosocial_share[row]);
    }

    let mut groups: Vec<AgeGroupPreference> = groups
        .into_iter()
        .map(|(age_range, (phys, psycho))| AgeGroupPreference {
            age_range,
            physical_percent: mean(&phys).unwrap_or(0.0) * 100.0,
            psychosocial_percent: mean(&psycho).unwrap_or(0.0) * 100.0,
            clients: phys.len(),
        })
        .collect();
    groups.sort_by_key(|g| AgeBracket::parse(&g.age_range).map_or(usize::MAX, AgeBracket::rank));

    let younger_physical = bracket_mean(&groups, &AgeBracket::YOUNGER, |g| g.physical_percent);
    let older_physical = bracket_mean(&groups, &AgeBracket::OLDER, |g| g.physical_percent);
    let younger_psychosocial =
        bracket_mean(&groups, &AgeBracket::YOUNGER, |g| g.psychosocial_percent);
    let older_psychosocial = bracket_mean(&groups, &AgeBracket::OLDER, |g| g.psychosocial_percent);

    let physical_leg = greater(younger_physical, older_physical);
    let psychosocial_leg = greater(older_psychosocial, younger_psychosocial);
    let verdict = match (physical_leg, psychosocial_leg) {
        (true, true) => AgePreferenceVerdict::Supported,
        (true, false) => AgePreferenceVerdict::PartiallySupportedPhysical,
        (false, true) => AgePreferenceVerdict::PartiallySupportedPsychosocial,
        (false, false) => AgePreferenceVerdict::NotSupported,
    };
    debug!(?verdict, groups = groups.len(), "evaluated age preference");

    Some(AgePreferenceResult {
        physical_columns: physical,
        psychosocial_columns: psychosocial,
        groups,
        younger_physical,
        older_physical,
        younger_psychosocial,
        older_psychosocial,
        verdict,
    })
}

/// Mean of a group metric over the brackets present in `groups`
fn bracket_mean(
    groups: &[AgeGroupPreference],
    brackets: &[AgeBracket],
    pick: fn(&AgeGroupPreference) -> f64,
) -> Option<f64> {
    let values: Vec<f64> = groups
        .iter()
        .filter(|g| AgeBracket::parse(&g.age_range).is_some_and(|b| brackets.contains(&b)))
        .map(pick)
        .collect();
    mean(&values)
}

/// Per-row share of ticked indicators among `columns`, 0 when `columns` is empty
fn row_share(df: &DataFrame, columns: &[String]) -> Vec<f64> {
    let mut sums = vec![0.0; df.height()];
    if columns.is_empty() {
        return sums;
    }
    for name in columns {
        if let Some(values) = indicator_values(df, name) {
            for (sum, v) in sums.iter_mut().zip(values) {
                *sum += v;
            }
        }
    }
    let width = columns.len() as f64;
    sums.iter_mut().for_each(|s| *s /= width);
    sums
}

/// `a > b`, false when either side is undefined
fn greater(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Mean rating and number of ratings in one partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingGroup {
    pub mean: f64,
    pub count: usize,
}

impl RatingGroup {
    fn from_ratings(ratings: &[f64]) -> Self {
        Self {
            mean: mean(ratings).unwrap_or(0.0),
            count: ratings.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionVerdict {
    Supported,
    NotSupported,
}

impl SatisfactionVerdict {
    pub fn summary(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::NotSupported => "not supported",
        }
    }

    pub fn conclusion(self) -> &'static str {
        match self {
            Self::Supported => {
                "The hypothesis is supported. New clients (1-3 months) show lower satisfaction levels compared to existing clients."
            }
            Self::NotSupported => {
                "The hypothesis is not supported. New clients (1-3 months) do not show lower satisfaction levels compared to existing clients."
            }
        }
    }
}

/// H2 result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionResult {
    pub new_clients: RatingGroup,
    pub existing_clients: RatingGroup,
    pub verdict: SatisfactionVerdict,
}

/// H2: satisfaction of new versus existing clients
pub fn evaluate_new_client_satisfaction(table: &SurveyTable) -> Option<SatisfactionResult> {
    let caps = table.capabilities();
    if !caps.has_dimension(Dimension::Duration) || !caps.has_scalar(ScalarField::OverallHelpRating)
    {
        return None;
    }

    let df = table.frame();
    let durations = string_values(df, Dimension::Duration.column())?;
    let ratings = numeric_values(df, ScalarField::OverallHelpRating.column())?;

    let mut new_ratings = Vec::new();
    let mut existing_ratings = Vec::new();
    for (duration, rating) in durations.iter().zip(ratings) {
        let (Some(duration), Some(rating)) = (duration, rating) else {
            continue;
        };
        if ProgramDuration::is_new_client_answer(duration) {
            new_ratings.push(rating);
        } else {
            existing_ratings.push(rating);
        }
    }

    let new_clients = RatingGroup::from_ratings(&new_ratings);
    let existing_clients = RatingGroup::from_ratings(&existing_ratings);
    let verdict = if new_clients.mean < existing_clients.mean {
        SatisfactionVerdict::Supported
    } else {
        SatisfactionVerdict::NotSupported
    };
    debug!(?verdict, "evaluated new client satisfaction");

    Some(SatisfactionResult {
        new_clients,
        existing_clients,
        verdict,
    })
}

/// Mean health score of one duration bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationHealth {
    pub duration: String,
    /// Ordinal position 1..=5, `None` for unmapped answers
    pub position: Option<u8>,
    pub mean_health_score: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationHealthVerdict {
    NoCorrelation,
    PositiveCorrelation,
    NegativeCorrelation,
}

impl DurationHealthVerdict {
    /// Three-way rule on the correlation coefficient. An undefined
    /// coefficient counts as no correlation. Exactly 0.1 is not positive.
    pub fn from_correlation(r: Option<f64>) -> Self {
        match r {
            None => Self::NoCorrelation,
            Some(r) if r.abs() < CORRELATION_THRESHOLD => Self::NoCorrelation,
            Some(r) if r > CORRELATION_THRESHOLD => Self::PositiveCorrelation,
            Some(_) => Self::NegativeCorrelation,
        }
    }

    pub fn is_supported(self) -> bool {
        self == Self::PositiveCorrelation
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::NoCorrelation => "not supported (no significant correlation)",
            Self::PositiveCorrelation => "supported (positive correlation)",
            Self::NegativeCorrelation => "not supported (negative correlation)",
        }
    }

    pub fn conclusion(self) -> &'static str {
        match self {
            Self::NoCorrelation => {
                "The hypothesis is not supported. There is no significant correlation between program duration and self-assessed health status."
            }
            Self::PositiveCorrelation => {
                "The hypothesis is supported. There is a positive correlation between program duration and self-assessed health status."
            }
            Self::NegativeCorrelation => {
                "The hypothesis is not supported. There is a slight negative correlation between program duration and self-assessed health status."
            }
        }
    }
}

/// H3 result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationHealthResult {
    /// Buckets in duration order, unmapped answers last
    pub buckets: Vec<DurationHealth>,
    pub correlation: Option<f64>,
    /// Rows with both a mapped duration and a mapped health answer
    pub paired_rows: usize,
    pub verdict: DurationHealthVerdict,
}

/// H3: programme duration against self-assessed health
pub fn evaluate_duration_health(table: &SurveyTable) -> Option<DurationHealthResult> {
    let caps = table.capabilities();
    if !caps.has_dimension(Dimension::Duration) || !caps.has_scalar(ScalarField::GeneralHealth) {
        return None;
    }

    let df = table.frame();
    let durations = string_values(df, Dimension::Duration.column())?;
    let health = string_values(df, ScalarField::GeneralHealth.column())?;

    let scores: Vec<Option<f64>> = health
        .iter()
        .map(|h| {
            h.as_deref()
                .and_then(HealthRating::parse)
                .map(|r| r.score() as f64)
        })
        .collect();
    let positions: Vec<Option<f64>> = durations
        .iter()
        .map(|d| {
            d.as_deref()
                .and_then(ProgramDuration::parse)
                .map(|p| p.position() as f64)
        })
        .collect();

    let mut by_bucket: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (duration, score) in durations.iter().zip(&scores) {
        if let Some(duration) = duration {
            let entry = by_bucket.entry(duration.clone()).or_default();
            if let Some(score) = score {
                entry.push(*score);
            }
        }
    }

    let mut buckets: Vec<DurationHealth> = by_bucket
        .into_iter()
        .map(|(duration, scores)| DurationHealth {
            position: ProgramDuration::parse(&duration).map(ProgramDuration::position),
            mean_health_score: mean(&scores).unwrap_or(0.0),
            count: scores.len(),
            duration,
        })
        .collect();
    buckets.sort_by_key(|b| b.position.unwrap_or(u8::MAX));

    let paired_rows = positions
        .iter()
        .zip(&scores)
        .filter(|(p, s)| p.is_some() && s.is_some())
        .count();
    let correlation = pearson(&positions, &scores);
    let verdict = DurationHealthVerdict::from_correlation(correlation);
    debug!(?correlation, ?verdict, "evaluated duration against health");

    Some(DurationHealthResult {
        buckets,
        correlation,
        paired_rows,
        verdict,
    })
}

/// All three hypotheses for one table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HypothesisReport {
    pub age_preference: Option<AgePreferenceResult>,
    pub new_client_satisfaction: Option<SatisfactionResult>,
    pub duration_health: Option<DurationHealthResult>,
}

pub fn evaluate_hypotheses(table: &SurveyTable) -> HypothesisReport {
    HypothesisReport {
        age_preference: evaluate_age_preference(table),
        new_client_satisfaction: evaluate_new_client_satisfaction(table),
        duration_health: evaluate_duration_health(table),
    }
}
