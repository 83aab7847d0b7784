//! Multi-criterion row filtering
//!
//! Criteria map each dimension to a list of accepted values. An empty list
//! means "no restriction", and so does a list that covers every value the
//! dimension took when the survey was loaded. The second rule is what makes the
//! default "everything selected" state reproduce the full table, rows with a
//! missing cell included. It is judged against the loaded table, never the
//! current subset, so filtering twice gives the same rows as filtering once.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::columns::Dimension;
use super::error::{SurveyError, SurveyResult};
use super::frame::string_values;
use super::loader::SurveyTable;

/// Accepted values per dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    selections: BTreeMap<Dimension, Vec<String>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria selecting every available option of every present dimension
    pub fn select_all(table: &SurveyTable) -> Self {
        let mut criteria = Self::new();
        for dim in Dimension::ALL {
            if table.capabilities().has_dimension(dim) {
                criteria.set(dim, available_options(table, dim));
            }
        }
        criteria
    }

    /// Replace the accepted values for a dimension
    pub fn set(&mut self, dimension: Dimension, values: Vec<String>) -> &mut Self {
        self.selections.insert(dimension, values);
        self
    }

    pub fn with(mut self, dimension: Dimension, values: &[&str]) -> Self {
        self.set(dimension, values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn get(&self, dimension: Dimension) -> &[String] {
        self.selections
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Overlay another set of criteria; non-empty entries in `other` win
    pub fn merge(&mut self, other: &FilterCriteria) {
        for (dim, values) in &other.selections {
            if !values.is_empty() {
                self.selections.insert(*dim, values.clone());
            }
        }
    }

    /// Number of dimensions with a non-empty selection
    pub fn active_dimensions(&self) -> usize {
        self.selections.values().filter(|v| !v.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &[String])> {
        self.selections.iter().map(|(d, v)| (*d, v.as_slice()))
    }

    /// Read criteria from a JSON file such as
    /// `{"country": ["Ukraine"], "age_range": ["70-85", "85+"]}`
    pub fn from_json_file(path: &Path) -> SurveyResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| SurveyError::InvalidCriteria {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Apply criteria to a table. Pure: the input is never modified and the
/// result is always a row subset of it.
pub fn filter_table(table: &SurveyTable, criteria: &FilterCriteria) -> SurveyResult<SurveyTable> {
    let df = table.frame();
    let mut keep = vec![true; df.height()];

    for (dim, accepted) in criteria.iter() {
        if accepted.is_empty() || !table.capabilities().has_dimension(dim) {
            continue;
        }
        let Some(values) = string_values(df, dim.column()) else {
            continue;
        };

        let accepted: HashSet<&str> = accepted.iter().map(String::as_str).collect();
        if table.capabilities().covers_all_options(dim, &accepted) {
            continue;
        }

        for (flag, value) in keep.iter_mut().zip(values.iter()) {
            if *flag {
                *flag = matches!(value, Some(v) if accepted.contains(v.as_str()));
            }
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!(
        input_rows = df.height(),
        output_rows = filtered.height(),
        active = criteria.active_dimensions(),
        "filter applied"
    );
    Ok(table.with_rows(filtered))
}

/// Sorted distinct non-missing values of a dimension
pub fn available_options(table: &SurveyTable, dimension: Dimension) -> Vec<String> {
    options_where(table, dimension, |_| true)
}

/// Options for the filter panel, where region depends on the country
/// selection and partner on both country and region.
pub fn cascading_options(
    table: &SurveyTable,
    dimension: Dimension,
    criteria: &FilterCriteria,
) -> Vec<String> {
    let parents: &[Dimension] = match dimension {
        Dimension::Region => &[Dimension::Country],
        Dimension::Partner => &[Dimension::Country, Dimension::Region],
        _ => &[],
    };

    let df = table.frame();
    let restrictions: Vec<(Vec<Option<String>>, HashSet<&str>)> = parents
        .iter()
        .filter(|p| !criteria.get(**p).is_empty())
        .filter_map(|p| {
            let values = string_values(df, p.column())?;
            let accepted = criteria.get(*p).iter().map(String::as_str).collect();
            Some((values, accepted))
        })
        .collect();

    options_where(table, dimension, |row| {
        restrictions.iter().all(|(values, accepted)| {
            matches!(&values[row], Some(v) if accepted.contains(v.as_str()))
        })
    })
}

fn options_where<F>(table: &SurveyTable, dimension: Dimension, include_row: F) -> Vec<String>
where
    F: Fn(usize) -> bool,
{
    if !table.capabilities().has_dimension(dimension) {
        return Vec::new();
    }
    let Some(values) = string_values(table.frame(), dimension.column()) else {
        return Vec::new();
    };
    values
        .into_iter()
        .enumerate()
        .filter(|(row, _)| include_row(*row))
        .filter_map(|(_, v)| v)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
