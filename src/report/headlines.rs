//! One-sentence summaries of the main charts

use crate::pipeline::{Distribution, IndicatorSummary, RatingSummary, SurveyAnalysis};

pub fn gender_headline(distribution: &Distribution) -> String {
    match distribution.most_common() {
        Some(top) if distribution.total > 0 => format!(
            "The majority of respondents ({:.1}%) identify as {}.",
            top.percentage, top.category
        ),
        _ => "No data available for gender distribution.".to_string(),
    }
}

pub fn age_headline(distribution: &Distribution) -> String {
    match distribution.most_common() {
        Some(top) if distribution.total > 0 => format!(
            "The largest age group is {}, representing {:.1}% of respondents.",
            top.category, top.percentage
        ),
        _ => "No data available for age distribution.".to_string(),
    }
}

pub fn chronic_headline(summary: &IndicatorSummary) -> String {
    match summary.top() {
        Some(top) => format!(
            "The most common chronic condition is {}, affecting {:.1}% of respondents.",
            top.column, top.percentage
        ),
        None => "No data available for chronic conditions.".to_string(),
    }
}

pub fn activity_headline(summary: &IndicatorSummary) -> String {
    match summary.top() {
        Some(top) => format!(
            "The most popular activity is {}, with {:.1}% participation rate.",
            top.column, top.percentage
        ),
        None => "No data available for activities.".to_string(),
    }
}

pub fn service_headline(summary: &IndicatorSummary) -> String {
    match summary.top() {
        Some(top) => format!(
            "The most utilized service is {}, used by {:.1}% of respondents.",
            top.column, top.percentage
        ),
        None => "No data available for services.".to_string(),
    }
}

pub fn rating_headline(summary: &RatingSummary) -> String {
    if summary.responses == 0 {
        return "No data available for ratings.".to_string();
    }
    format!(
        "The average rating is {:.1} out of {}, indicating {}.",
        summary.mean,
        summary.scale_max,
        summary.sentiment()
    )
}

pub fn most_active_headline(age_range: &str, share: f64) -> String {
    format!(
        "The {} age group shows the highest frequency of multiple weekly activities ({:.1}%).",
        age_range, share
    )
}

/// Headlines for every chart the analysis could fill
pub fn headlines(analysis: &SurveyAnalysis) -> Vec<String> {
    let mut lines = Vec::new();
    let demo = &analysis.demographics;
    let impact = &analysis.program_impact;

    if let Some(gender) = &demo.gender {
        lines.push(gender_headline(gender));
    }
    if let Some(age) = &demo.age {
        lines.push(age_headline(age));
    }
    if let Some(chronic) = &demo.chronic_conditions {
        lines.push(chronic_headline(chronic));
    }
    if let Some(activities) = &impact.activities {
        lines.push(activity_headline(activities));
    }
    if let Some(services) = &impact.services {
        lines.push(service_headline(services));
    }
    if let Some(rating) = &impact.help_rating {
        lines.push(rating_headline(rating));
    }
    if let Some((age, share)) = analysis
        .psychological
        .activity_frequency_by_age
        .as_ref()
        .and_then(|a| a.most_active.as_ref())
    {
        lines.push(most_active_headline(age, *share));
    }
    lines
}
