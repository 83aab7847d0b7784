//! Row-normalized cross-tabulation of two categorical columns

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::columns::{Dimension, ScalarField};
use super::frame::{percentage, string_values};
use super::loader::SurveyTable;
use super::ordinal::CategoryOrder;

/// Frequency answer used to pick the most active age group
pub const SEVERAL_TIMES_A_WEEK: &str = "Several times a week";

/// Contingency table with row percentages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    /// Each row sums to 100, or is all zeros when the row total is zero
    pub percentages: Vec<Vec<f64>>,
}

impl CrossTab {
    pub fn row_total(&self, row: usize) -> usize {
        self.counts.get(row).map_or(0, |r| r.iter().sum())
    }

    /// Row percentage of a cell by labels
    pub fn percentage(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.percentages[i][j])
    }

    /// Remove a row by label, returning whether it was present
    pub fn drop_row(&mut self, label: &str) -> bool {
        match self.rows.iter().position(|r| r == label) {
            Some(i) => {
                self.rows.remove(i);
                self.counts.remove(i);
                self.percentages.remove(i);
                true
            }
            None => false,
        }
    }

    /// Row with the highest share in `column`, first row wins on ties
    pub fn row_maximizing(&self, column: &str) -> Option<(&str, f64)> {
        let j = self.columns.iter().position(|c| c == column)?;
        let mut best: Option<(&str, f64)> = None;
        for (row, shares) in self.rows.iter().zip(&self.percentages) {
            if best.map_or(true, |(_, b)| shares[j] > b) {
                best = Some((row.as_str(), shares[j]));
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Divide each cell by its row total and scale to 100
pub fn normalize_rows(counts: &[Vec<usize>]) -> Vec<Vec<f64>> {
    counts
        .iter()
        .map(|row| {
            let total: usize = row.iter().sum();
            row.iter()
                .map(|&c| percentage(c as f64, total as f64))
                .collect()
        })
        .collect()
}

/// Cross-tabulate two columns over the rows where both are present.
/// `None` when either column is absent.
pub fn crosstab(
    df: &DataFrame,
    row_column: &str,
    column_column: &str,
    row_order: CategoryOrder,
    column_order: CategoryOrder,
) -> Option<CrossTab> {
    let row_values = string_values(df, row_column)?;
    let col_values = string_values(df, column_column)?;

    let mut cells: HashMap<(String, String), usize> = HashMap::new();
    let mut row_totals: HashMap<String, usize> = HashMap::new();
    let mut col_totals: HashMap<String, usize> = HashMap::new();
    for (r, c) in row_values.into_iter().zip(col_values) {
        let (Some(r), Some(c)) = (r, c) else {
            continue;
        };
        *row_totals.entry(r.clone()).or_insert(0) += 1;
        *col_totals.entry(c.clone()).or_insert(0) += 1;
        *cells.entry((r, c)).or_insert(0) += 1;
    }

    let rows = ordered_labels(row_totals, row_order);
    let columns = ordered_labels(col_totals, column_order);

    let counts: Vec<Vec<usize>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| cells.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect();
    let percentages = normalize_rows(&counts);

    Some(CrossTab {
        rows,
        columns,
        counts,
        percentages,
    })
}

fn ordered_labels(totals: HashMap<String, usize>, order: CategoryOrder) -> Vec<String> {
    let mut entries: Vec<(String, usize)> = totals.into_iter().collect();
    entries.sort_by(|a, b| order.compare((&a.0, a.1), (&b.0, b.1)));
    entries.into_iter().map(|(label, _)| label).collect()
}

/// Physical-activity frequency by age bracket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityFrequencyByAge {
    pub table: CrossTab,
    /// Age bracket with the highest share of several-times-a-week answers
    pub most_active: Option<(String, f64)>,
}

pub fn activity_frequency_by_age(table: &SurveyTable) -> Option<ActivityFrequencyByAge> {
    let caps = table.capabilities();
    if !caps.has_dimension(Dimension::AgeRange)
        || !caps.has_scalar(ScalarField::PhysicalActivityFrequency)
    {
        return None;
    }
    let tab = crosstab(
        table.frame(),
        Dimension::AgeRange.column(),
        ScalarField::PhysicalActivityFrequency.column(),
        CategoryOrder::AgeBracket,
        CategoryOrder::Frequency,
    )?;
    let most_active = tab
        .row_maximizing(SEVERAL_TIMES_A_WEEK)
        .map(|(row, share)| (row.to_string(), share));
    Some(ActivityFrequencyByAge {
        table: tab,
        most_active,
    })
}

/// Social-connection impact by gender, without the `unknown` gender row
pub fn social_impact_by_gender(table: &SurveyTable) -> Option<CrossTab> {
    let caps = table.capabilities();
    if !caps.has_dimension(Dimension::Gender)
        || !caps.has_scalar(ScalarField::SocialConnectionImpact)
    {
        return None;
    }
    let mut tab = crosstab(
        table.frame(),
        Dimension::Gender.column(),
        ScalarField::SocialConnectionImpact.column(),
        CategoryOrder::Frequency,
        CategoryOrder::Frequency,
    )?;
    tab.drop_row("unknown");
    Some(tab)
}
