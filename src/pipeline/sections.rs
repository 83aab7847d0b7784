//! Analysis sections over a filtered table
//!
//! Groups the aggregations the way the dashboard presents them. Every field
//! is optional and stays `None` when the capability descriptor says its
//! columns are absent.

use serde::Serialize;
use tracing::info;

use super::columns::{Dimension, IndicatorGroup, ScalarField};
use super::correlation::{chronic_condition_correlation, CorrelationMatrix};
use super::crosstab::{
    activity_frequency_by_age, social_impact_by_gender, ActivityFrequencyByAge, CrossTab,
};
use super::distribution::{categorical_distribution, rating_summary, Distribution, RatingSummary};
use super::hypothesis::{evaluate_hypotheses, HypothesisReport};
use super::indicators::{
    service_activity_intersection, summarize_group, IndicatorSummary, IntersectionMatrix,
};
use super::loader::SurveyTable;
use super::ordinal::CategoryOrder;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemographicsSection {
    pub gender: Option<Distribution>,
    pub age: Option<Distribution>,
    pub chronic_conditions: Option<IndicatorSummary>,
    pub comorbidity: Option<CorrelationMatrix>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramImpactSection {
    pub activities: Option<IndicatorSummary>,
    pub services: Option<IndicatorSummary>,
    pub service_activity: Option<IntersectionMatrix>,
    pub help_rating: Option<RatingSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PsychologicalSection {
    pub activity_frequency: Option<Distribution>,
    pub activity_frequency_by_age: Option<ActivityFrequencyByAge>,
    pub social_impact: Option<Distribution>,
    pub social_impact_by_gender: Option<CrossTab>,
    pub made_friends: Option<Distribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhysicalSection {
    pub support_rating: Option<RatingSummary>,
    pub health_control: Option<Distribution>,
    pub general_health: Option<Distribution>,
}

/// Every section for one filtered table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurveyAnalysis {
    pub respondents: usize,
    pub demographics: DemographicsSection,
    pub program_impact: ProgramImpactSection,
    pub psychological: PsychologicalSection,
    pub physical: PhysicalSection,
    pub hypotheses: HypothesisReport,
}

/// Run every aggregation and hypothesis over the table
pub fn analyze(table: &SurveyTable) -> SurveyAnalysis {
    let analysis = SurveyAnalysis {
        respondents: table.height(),
        demographics: demographics(table),
        program_impact: program_impact(table),
        psychological: psychological(table),
        physical: physical(table),
        hypotheses: evaluate_hypotheses(table),
    };
    info!(respondents = analysis.respondents, "analysis complete");
    analysis
}

pub fn demographics(table: &SurveyTable) -> DemographicsSection {
    let df = table.frame();
    let caps = table.capabilities();
    DemographicsSection {
        gender: dimension_distribution(table, Dimension::Gender, CategoryOrder::Frequency),
        age: dimension_distribution(table, Dimension::AgeRange, CategoryOrder::AgeBracket),
        chronic_conditions: group_summary(table, IndicatorGroup::ChronicConditions),
        comorbidity: chronic_condition_correlation(df, caps),
    }
}

pub fn program_impact(table: &SurveyTable) -> ProgramImpactSection {
    ProgramImpactSection {
        activities: group_summary(table, IndicatorGroup::Activities),
        services: group_summary(table, IndicatorGroup::Services),
        service_activity: service_activity_intersection(table.frame(), table.capabilities()),
        help_rating: scalar_rating(table, ScalarField::OverallHelpRating, 5),
    }
}

pub fn psychological(table: &SurveyTable) -> PsychologicalSection {
    PsychologicalSection {
        activity_frequency: scalar_distribution(
            table,
            ScalarField::PhysicalActivityFrequency,
            CategoryOrder::Frequency,
        ),
        activity_frequency_by_age: activity_frequency_by_age(table),
        social_impact: scalar_distribution(
            table,
            ScalarField::SocialConnectionImpact,
            CategoryOrder::Frequency,
        ),
        social_impact_by_gender: social_impact_by_gender(table),
        made_friends: scalar_distribution(table, ScalarField::MadeFriends, CategoryOrder::Frequency),
    }
}

pub fn physical(table: &SurveyTable) -> PhysicalSection {
    PhysicalSection {
        support_rating: scalar_rating(table, ScalarField::PhysicalSupportRating, 10),
        health_control: scalar_distribution(
            table,
            ScalarField::HealthControl,
            CategoryOrder::Frequency,
        ),
        general_health: scalar_distribution(
            table,
            ScalarField::GeneralHealth,
            CategoryOrder::HealthRating,
        ),
    }
}

fn dimension_distribution(
    table: &SurveyTable,
    dimension: Dimension,
    order: CategoryOrder,
) -> Option<Distribution> {
    if !table.capabilities().has_dimension(dimension) {
        return None;
    }
    categorical_distribution(table.frame(), dimension.column(), order)
}

fn scalar_distribution(
    table: &SurveyTable,
    field: ScalarField,
    order: CategoryOrder,
) -> Option<Distribution> {
    if !table.capabilities().has_scalar(field) {
        return None;
    }
    categorical_distribution(table.frame(), field.column(), order)
}

fn scalar_rating(table: &SurveyTable, field: ScalarField, scale_max: u8) -> Option<RatingSummary> {
    if !table.capabilities().has_scalar(field) {
        return None;
    }
    rating_summary(table.frame(), field.column(), scale_max)
}

fn group_summary(table: &SurveyTable, group: IndicatorGroup) -> Option<IndicatorSummary> {
    let caps = table.capabilities();
    if caps.group(group).is_empty() {
        return None;
    }
    Some(summarize_group(table.frame(), caps, group))
}
