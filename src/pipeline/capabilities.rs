//! Which parts of the survey schema are present in a loaded table
//!
//! Computed once at load time. Downstream code asks this descriptor instead of
//! probing headers, and a feature whose columns are absent is simply skipped.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use polars::prelude::*;
use serde::Serialize;

use super::columns::{
    Dimension, IndicatorGroup, ScalarField, PHYSICAL_ACTIVITY_COLUMNS,
    PSYCHOSOCIAL_ACTIVITY_COLUMNS,
};
use super::frame::{has_column, string_values};

/// Availability of one indicator group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupCapability {
    /// Member columns found in the table, in declared order
    pub available: Vec<String>,
    /// True when every member column is present and the composite was derived
    pub composite: bool,
}

impl GroupCapability {
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// Capability descriptor for a survey table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub dimensions: BTreeSet<Dimension>,
    /// Distinct non-missing values of each present dimension in the loaded table.
    /// Row subsets keep these, so "every option selected" means the same thing
    /// before and after filtering.
    #[serde(skip)]
    pub dimension_options: BTreeMap<Dimension, BTreeSet<String>>,
    pub chronic: GroupCapability,
    pub activities: GroupCapability,
    pub services: GroupCapability,
    pub scalars: Vec<ScalarField>,
}

impl Capabilities {
    /// Inspect the headers of a table
    pub fn detect(df: &DataFrame) -> Self {
        let dimensions: BTreeSet<Dimension> = Dimension::ALL
            .into_iter()
            .filter(|d| has_column(df, d.column()))
            .collect();

        let dimension_options = dimensions
            .iter()
            .map(|d| {
                let values: BTreeSet<String> = string_values(df, d.column())
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .collect();
                (*d, values)
            })
            .collect();

        let group = |g: IndicatorGroup| {
            let available: Vec<String> = g
                .columns()
                .iter()
                .filter(|c| has_column(df, c))
                .map(|c| c.to_string())
                .collect();
            let composite = available.len() == g.columns().len();
            GroupCapability {
                available,
                composite,
            }
        };

        let scalars = ScalarField::ALL
            .into_iter()
            .filter(|f| has_column(df, f.column()))
            .collect();

        Self {
            dimensions,
            dimension_options,
            chronic: group(IndicatorGroup::ChronicConditions),
            activities: group(IndicatorGroup::Activities),
            services: group(IndicatorGroup::Services),
            scalars,
        }
    }

    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.dimensions.contains(&dimension)
    }

    /// True when `accepted` includes every value the dimension took at load
    /// time. A dimension with no loaded values is never covered.
    pub fn covers_all_options(&self, dimension: Dimension, accepted: &HashSet<&str>) -> bool {
        self.dimension_options
            .get(&dimension)
            .is_some_and(|options| {
                !options.is_empty() && options.iter().all(|o| accepted.contains(o.as_str()))
            })
    }

    pub fn has_scalar(&self, field: ScalarField) -> bool {
        self.scalars.contains(&field)
    }

    pub fn group(&self, group: IndicatorGroup) -> &GroupCapability {
        match group {
            IndicatorGroup::ChronicConditions => &self.chronic,
            IndicatorGroup::Activities => &self.activities,
            IndicatorGroup::Services => &self.services,
        }
    }

    /// Available physical-activity indicators
    pub fn physical_activities(&self) -> Vec<String> {
        self.activity_subset(&PHYSICAL_ACTIVITY_COLUMNS)
    }

    /// Available social and psychological support indicators
    pub fn psychosocial_activities(&self) -> Vec<String> {
        self.activity_subset(&PSYCHOSOCIAL_ACTIVITY_COLUMNS)
    }

    fn activity_subset(&self, subset: &[&str]) -> Vec<String> {
        subset
            .iter()
            .filter(|c| self.activities.available.iter().any(|a| a == *c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Names of disabled features, for logging and the report
    pub fn disabled_features(&self) -> BTreeMap<&'static str, &'static str> {
        let mut disabled = BTreeMap::new();
        for dim in Dimension::ALL {
            if !self.has_dimension(dim) {
                disabled.insert(dim.key(), "dimension column missing");
            }
        }
        for (name, cap) in [
            ("chronic_count", &self.chronic),
            ("activity_count", &self.activities),
            ("service_count", &self.services),
        ] {
            if cap.is_empty() {
                disabled.insert(name, "no indicator columns present");
            } else if !cap.composite {
                disabled.insert(name, "indicator group incomplete");
            }
        }
        disabled
    }
}
