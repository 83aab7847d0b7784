//! Aggregation engine tests over the sample survey

mod common;

use agelens::pipeline::{
    analyze, categorical_distribution, correlation_matrix, crosstab, filter_table,
    intersection_matrix, load_survey_from_bytes, normalize_rows, pearson, summarize_indicators,
    CategoryOrder, Dimension, FilterCriteria, IndicatorGroup, ScalarField,
    PHYSICAL_ACTIVITY_COLUMNS,
};
use common::{random_respondents, sample_table, survey_csv};
use polars::prelude::*;

#[test]
fn test_gender_distribution() {
    let analysis = analyze(&sample_table());
    let gender = analysis.demographics.gender.unwrap();

    assert_eq!(gender.total, 8);
    assert_eq!(gender.labels(), vec!["female", "male", "unknown"]);
    assert_eq!(gender.get("female").unwrap().count, 5);
    assert_eq!(gender.get("female").unwrap().percentage, 62.5);
    assert_eq!(gender.most_common().unwrap().category, "female");
}

#[test]
fn test_age_distribution_uses_bracket_order() {
    let analysis = analyze(&sample_table());
    let age = analysis.demographics.age.unwrap();

    assert_eq!(age.labels(), vec!["18-54", "55-69", "70-85", "85+", "unknown"]);
    let sum: f64 = age.categories.iter().map(|c| c.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_age_sort_with_unmapped_value() {
    let df = df! {
        "client_age_range" => [Some("70-85"), Some("18-54"), Some("unknown"), Some("55-69"), Some("60-65")],
    }
    .unwrap();
    let dist = categorical_distribution(&df, "client_age_range", CategoryOrder::AgeBracket).unwrap();

    assert_eq!(
        dist.labels(),
        vec!["18-54", "55-69", "70-85", "unknown", "60-65"]
    );
}

#[test]
fn test_distribution_percentages_sum_to_hundred() {
    let table = load_survey_from_bytes(survey_csv(&random_respondents(317, 11)).into_bytes())
        .unwrap();
    for (dim, order) in [
        (Dimension::Gender, CategoryOrder::Frequency),
        (Dimension::AgeRange, CategoryOrder::AgeBracket),
        (Dimension::Duration, CategoryOrder::ProgramDuration),
        (Dimension::Country, CategoryOrder::Frequency),
    ] {
        let dist = categorical_distribution(table.frame(), dim.column(), order).unwrap();
        let sum: f64 = dist.categories.iter().map(|c| c.percentage).sum();
        let tolerance = 0.05 * dist.categories.len() as f64 + 1e-9;
        assert!(
            (sum - 100.0).abs() <= tolerance,
            "{:?} percentages sum to {}",
            dim,
            sum
        );
        let counted: usize = dist.categories.iter().map(|c| c.count).sum();
        assert_eq!(counted, dist.total);
    }
}

#[test]
fn test_indicator_summaries() {
    let analysis = analyze(&sample_table());

    let chronic = analysis.demographics.chronic_conditions.unwrap();
    assert_eq!(chronic.respondents, 8);
    assert_eq!(chronic.items.len(), IndicatorGroup::ChronicConditions.columns().len());
    // Ties keep declared order
    assert_eq!(chronic.top().unwrap().column, "chronic cardiovascular");
    assert_eq!(chronic.items[1].column, "Diabetes");
    assert_eq!(chronic.top().unwrap().percentage, 37.5);

    let activities = analysis.program_impact.activities.unwrap();
    assert_eq!(activities.top().unwrap().column, "Social events");
    assert_eq!(activities.top().unwrap().percentage, 50.0);
    assert_eq!(activities.get("Physical activities").unwrap().count, 3);

    let services = analysis.program_impact.services.unwrap();
    assert_eq!(services.top().unwrap().column, "Medical support");
    assert_eq!(services.get("Winter assistance").unwrap().count, 4);
}

#[test]
fn test_indicator_summary_counts_sorted_descending() {
    let df = df! {
        "A" => [1.0, 1.0, 1.0, 0.0],
        "B" => [0.0, 1.0, 0.0, 0.0],
        "C" => [1.0, 0.0, 1.0, 0.0],
    }
    .unwrap();
    let summary = summarize_indicators(&df, &["A", "B", "C"]);

    let order: Vec<&str> = summary.items.iter().map(|i| i.column.as_str()).collect();
    assert_eq!(order, vec!["A", "C", "B"]);
    let shares: Vec<f64> = summary.items.iter().map(|i| i.percentage).collect();
    assert_eq!(shares, vec![75.0, 50.0, 25.0]);
}

#[test]
fn test_service_activity_intersection() {
    let analysis = analyze(&sample_table());
    let matrix = analysis.program_impact.service_activity.unwrap();

    assert_eq!(matrix.get("Medical support", "Physical activities"), Some(3));
    assert_eq!(matrix.get("Winter assistance", "Social events"), Some(2));
    assert_eq!(matrix.get("Medical devices", "Physical activities"), Some(0));
    assert_eq!(
        matrix.strongest(),
        Some(("Medical support", "Physical activities", 3))
    );
}

#[test]
fn test_intersection_of_empty_table_is_zero() {
    let df = df! {
        "S" => Vec::<f64>::new(),
        "A" => Vec::<f64>::new(),
    }
    .unwrap();
    let matrix = intersection_matrix(&df, &["S"], &["A"]);

    assert_eq!(matrix.counts, vec![vec![0]]);
    assert_eq!(matrix.strongest(), None);
}

#[test]
fn test_help_rating_summary() {
    let analysis = analyze(&sample_table());
    let rating = analysis.program_impact.help_rating.unwrap();

    assert_eq!(rating.responses, 7);
    assert!((rating.mean - 26.0 / 7.0).abs() < 1e-9);
    assert_eq!(rating.scale_max, 5);
    assert_eq!(rating.sentiment(), "generally positive feedback");
    assert_eq!(rating.distribution.labels(), vec!["2", "3", "4", "5"]);

    let support = analysis.physical.support_rating.unwrap();
    assert_eq!(support.responses, 7);
    assert_eq!(support.scale_max, 10);
}

#[test]
fn test_activity_frequency_by_age() {
    let analysis = analyze(&sample_table());
    let by_age = analysis.psychological.activity_frequency_by_age.unwrap();

    assert_eq!(
        by_age.table.rows,
        vec!["18-54", "55-69", "70-85", "85+", "unknown"]
    );
    assert_eq!(
        by_age.table.columns,
        vec!["Several times a week", "Once a week", "Rarely"]
    );
    assert_eq!(by_age.table.percentage("70-85", "Once a week"), Some(50.0));
    // 18-54 and 55-69 both reach 100%; the first row wins
    assert_eq!(by_age.most_active, Some(("18-54".to_string(), 100.0)));
}

#[test]
fn test_social_impact_by_gender_drops_unknown() {
    let analysis = analyze(&sample_table());
    let tab = analysis.psychological.social_impact_by_gender.unwrap();

    assert_eq!(tab.rows, vec!["female", "male"]);
    assert_eq!(tab.percentage("female", "Improved"), Some(75.0));
    assert_eq!(tab.percentage("female", "No change"), Some(25.0));
    assert_eq!(tab.percentage("male", "Improved"), Some(100.0));
    for row in &tab.percentages {
        assert!((row.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_crosstab_counts_only_complete_pairs() {
    let df = df! {
        "g" => [Some("F"), Some("F"), None, Some("M")],
        "x" => [Some("a"), None, Some("a"), Some("b")],
    }
    .unwrap();
    let tab = crosstab(&df, "g", "x", CategoryOrder::Frequency, CategoryOrder::Frequency).unwrap();

    let total: usize = tab.counts.iter().flatten().sum();
    assert_eq!(total, 2);
    assert!(crosstab(&df, "g", "absent", CategoryOrder::Frequency, CategoryOrder::Frequency)
        .is_none());
}

#[test]
fn test_zero_row_normalizes_to_zero() {
    let normalized = normalize_rows(&[vec![0, 0], vec![1, 3]]);
    assert_eq!(normalized, vec![vec![0.0, 0.0], vec![25.0, 75.0]]);
}

#[test]
fn test_general_health_uses_questionnaire_order() {
    let analysis = analyze(&sample_table());
    let health = analysis.physical.general_health.unwrap();
    let labels = health.labels();

    assert_eq!(labels[0], "2. Very good");
    assert_eq!(labels[1], "3. Good");
    assert_eq!(labels.last(), Some(&"5. Bad"));
    assert_eq!(health.total, 7);
}

#[test]
fn test_empty_selection_yields_empty_aggregates() {
    let table = sample_table();
    let criteria = FilterCriteria::new().with(Dimension::Country, &["Atlantis"]);
    let empty = filter_table(&table, &criteria).unwrap();
    let analysis = analyze(&empty);

    assert_eq!(analysis.respondents, 0);
    let gender = analysis.demographics.gender.unwrap();
    assert!(gender.is_empty());
    assert!(gender.categories.is_empty());

    let activities = analysis.program_impact.activities.unwrap();
    assert!(activities.top().is_none());
    assert!(activities.items.iter().all(|i| i.count == 0 && i.percentage == 0.0));

    let rating = analysis.program_impact.help_rating.unwrap();
    assert_eq!(rating.responses, 0);
    assert_eq!(rating.mean, 0.0);

    let by_age = analysis.psychological.activity_frequency_by_age.unwrap();
    assert!(by_age.table.is_empty());
    assert_eq!(by_age.most_active, None);
}

#[test]
fn test_sections_skip_absent_columns() {
    let csv = "country,client_gender,Diabetes\nUkraine,female,1\nMoldova,male,0\n";
    let table = load_survey_from_bytes(csv.as_bytes().to_vec()).unwrap();
    let analysis = analyze(&table);

    assert!(analysis.demographics.gender.is_some());
    assert!(analysis.demographics.age.is_none());
    assert!(analysis.program_impact.services.is_none());
    assert!(analysis.program_impact.help_rating.is_none());
    assert!(analysis.program_impact.service_activity.is_none());
    assert!(analysis.demographics.comorbidity.is_none());
    assert!(analysis.hypotheses.age_preference.is_none());
    assert!(analysis.hypotheses.new_client_satisfaction.is_none());
    assert!(analysis.hypotheses.duration_health.is_none());
    assert_eq!(
        analysis.demographics.chronic_conditions.unwrap().items[0].column,
        "Diabetes"
    );
}

#[test]
fn test_correlation_matrix_symmetry_and_diagonal() {
    let table = sample_table();
    let columns = IndicatorGroup::ChronicConditions.columns();
    let matrix = correlation_matrix(table.frame(), columns);

    assert_eq!(matrix.columns.len(), columns.len());
    for a in &matrix.columns {
        for b in &matrix.columns {
            assert_eq!(matrix.get(a, b), matrix.get(b, a));
        }
    }
    assert_eq!(matrix.get("Diabetes", "Diabetes"), Some(1.0));
    // Nobody reported respiratory disease, so it has no variance
    assert_eq!(matrix.get("Respiratory diseases", "Respiratory diseases"), None);
    assert_eq!(matrix.get("Respiratory diseases", "Diabetes"), None);
}

#[test]
fn test_correlation_matrix_bounds_on_random_data() {
    let table = load_survey_from_bytes(survey_csv(&random_respondents(150, 3)).into_bytes())
        .unwrap();
    let matrix = correlation_matrix(table.frame(), &PHYSICAL_ACTIVITY_COLUMNS);

    for row in &matrix.values {
        for r in row.iter().flatten() {
            assert!((-1.0..=1.0).contains(r));
        }
    }
    for pair in matrix.pairs_above(0.0) {
        assert_ne!(pair.feature1, pair.feature2);
    }
}

#[test]
fn test_pearson_known_values() {
    let xs = [Some(1.0), Some(2.0), Some(3.0), None];
    let up = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
    let down = [Some(3.0), Some(2.0), Some(1.0), Some(0.0)];

    assert!((pearson(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
    assert!((pearson(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
    assert_eq!(pearson(&xs[..1], &up[..1]), None);
    assert_eq!(pearson(&[Some(1.0), Some(1.0)], &[Some(2.0), Some(3.0)]), None);
}

#[test]
fn test_scalar_field_headers_are_distinct() {
    let mut headers: Vec<&str> = ScalarField::ALL.iter().map(|f| f.column()).collect();
    headers.sort();
    headers.dedup();
    assert_eq!(headers.len(), ScalarField::ALL.len());
}
