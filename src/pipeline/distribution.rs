//! Categorical distributions and rating summaries

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::frame::{numeric_values, percentage, round1, string_values};
use super::ordinal::CategoryOrder;

/// Ratings at or above this mean read as positive feedback
pub const POSITIVE_FEEDBACK_THRESHOLD: f64 = 3.5;

/// Count and share of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    /// Share of the non-missing total, rounded to one decimal
    pub percentage: f64,
}

/// Value distribution of a categorical column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

impl Distribution {
    /// Count observed values, ignoring missing cells
    pub fn from_values<I, S>(values: I, order: CategoryOrder) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values.into_iter().flatten() {
            *counts.entry(value.as_ref().to_string()).or_insert(0) += 1;
        }

        let total: usize = counts.values().sum();
        let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| order.compare((&a.0, a.1), (&b.0, b.1)));

        let categories = entries
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count,
                percentage: round1(percentage(count as f64, total as f64)),
            })
            .collect();

        Self { total, categories }
    }

    /// Category with the highest count, first in label order on ties
    pub fn most_common(&self) -> Option<&CategoryCount> {
        self.categories
            .iter()
            .min_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)))
    }

    pub fn get(&self, category: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.category.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Distribution of a column, `None` when the column is absent
pub fn categorical_distribution(
    df: &DataFrame,
    column: &str,
    order: CategoryOrder,
) -> Option<Distribution> {
    let values = string_values(df, column)?;
    Some(Distribution::from_values(values, order))
}

/// Mean and distribution of a numeric rating scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean over answered rows, 0 when nobody answered
    pub mean: f64,
    pub responses: usize,
    pub scale_max: u8,
    pub distribution: Distribution,
}

impl RatingSummary {
    pub fn sentiment(&self) -> &'static str {
        if self.mean >= POSITIVE_FEEDBACK_THRESHOLD {
            "generally positive feedback"
        } else {
            "mixed feedback"
        }
    }
}

/// Summarize a rating column on a `1..=scale_max` scale
pub fn rating_summary(df: &DataFrame, column: &str, scale_max: u8) -> Option<RatingSummary> {
    let values = numeric_values(df, column)?;
    let answered: Vec<f64> = values.iter().flatten().copied().collect();
    let mean = if answered.is_empty() {
        0.0
    } else {
        answered.iter().sum::<f64>() / answered.len() as f64
    };

    let labels = string_values(df, column)?;
    Some(RatingSummary {
        mean,
        responses: answered.len(),
        scale_max,
        distribution: Distribution::from_values(labels, CategoryOrder::Numeric),
    })
}
