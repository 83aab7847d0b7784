//! Multi-select indicator aggregation
//!
//! Every option of a multi-select question is a 0/1 column. Missing cells
//! count as 0 in sums, while the denominator is always the number of
//! respondents in the table.

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::capabilities::Capabilities;
use super::columns::IndicatorGroup;
use super::frame::{indicator_values, percentage};

/// How many respondents ticked one option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorCount {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

/// Summary of one indicator group, sorted by descending count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSummary {
    pub respondents: usize,
    pub items: Vec<IndicatorCount>,
}

impl IndicatorSummary {
    pub fn top(&self) -> Option<&IndicatorCount> {
        self.items.first().filter(|item| item.count > 0)
    }

    pub fn get(&self, column: &str) -> Option<&IndicatorCount> {
        self.items.iter().find(|item| item.column == column)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Count and share per column. Ties keep the order the columns were given in.
pub fn summarize_indicators<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> IndicatorSummary {
    let respondents = df.height();
    let mut items: Vec<IndicatorCount> = columns
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let values = indicator_values(df, name)?;
            let count = values.iter().filter(|v| **v == 1.0).count();
            Some(IndicatorCount {
                column: name.to_string(),
                count,
                percentage: percentage(count as f64, respondents as f64),
            })
        })
        .collect();

    items.sort_by(|a, b| b.count.cmp(&a.count));

    IndicatorSummary { respondents, items }
}

/// Summary over the available members of a group
pub fn summarize_group(
    df: &DataFrame,
    capabilities: &Capabilities,
    group: IndicatorGroup,
) -> IndicatorSummary {
    summarize_indicators(df, &capabilities.group(group).available)
}

/// Co-occurrence counts between two indicator sets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `counts[i][j]` respondents flagged for both `rows[i]` and `columns[j]`
    pub counts: Vec<Vec<usize>>,
}

impl IntersectionMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<usize> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.counts[i][j])
    }

    /// The largest non-zero cell as (row, column, count)
    pub fn strongest(&self) -> Option<(&str, &str, usize)> {
        let mut best: Option<(&str, &str, usize)> = None;
        for (i, row) in self.rows.iter().enumerate() {
            for (j, column) in self.columns.iter().enumerate() {
                let count = self.counts[i][j];
                if count > 0 && best.map_or(true, |(_, _, b)| count > b) {
                    best = Some((row.as_str(), column.as_str(), count));
                }
            }
        }
        best
    }
}

/// Respondents flagged for both members of every (row, column) pair,
/// computed as `R^T * C` over the 0/1 indicator matrices.
pub fn intersection_matrix<S: AsRef<str>>(
    df: &DataFrame,
    rows: &[S],
    columns: &[S],
) -> IntersectionMatrix {
    let row_data = indicator_matrix(df, rows);
    let col_data = indicator_matrix(df, columns);
    let row_names: Vec<String> = row_data.iter().map(|(n, _)| n.clone()).collect();
    let col_names: Vec<String> = col_data.iter().map(|(n, _)| n.clone()).collect();

    let n = df.height();
    let mut counts = vec![vec![0usize; col_names.len()]; row_names.len()];
    if n > 0 && !row_names.is_empty() && !col_names.is_empty() {
        let r = to_mat(&row_data, n);
        let c = to_mat(&col_data, n);
        let product = r.transpose() * &c;
        for (i, row) in counts.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = product[(i, j)].round() as usize;
            }
        }
    }

    IntersectionMatrix {
        rows: row_names,
        columns: col_names,
        counts,
    }
}

/// Services received against activities attended
pub fn service_activity_intersection(
    df: &DataFrame,
    capabilities: &Capabilities,
) -> Option<IntersectionMatrix> {
    if capabilities.services.is_empty() || capabilities.activities.is_empty() {
        return None;
    }
    Some(intersection_matrix(
        df,
        &capabilities.services.available,
        &capabilities.activities.available,
    ))
}

fn indicator_matrix<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Vec<(String, Vec<f64>)> {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            let values = indicator_values(df, name)?
                .into_iter()
                .map(|v| if v == 1.0 { 1.0 } else { 0.0 })
                .collect();
            Some((name.to_string(), values))
        })
        .collect()
}

fn to_mat(columns: &[(String, Vec<f64>)], n_rows: usize) -> Mat<f64> {
    let mut m = Mat::<f64>::zeros(n_rows, columns.len());
    for (j, (_, values)) in columns.iter().enumerate() {
        for (i, &v) in values.iter().enumerate() {
            m[(i, j)] = v;
        }
    }
    m
}
