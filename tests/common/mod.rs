//! Shared test utilities and survey fixture builders

#![allow(dead_code)]

use std::path::PathBuf;

use agelens::pipeline::{
    load_survey_from_bytes, Dimension, IndicatorGroup, ScalarField, SurveyTable,
};
use tempfile::TempDir;

/// One respondent of a fixture survey. Unset fields are written as blank cells.
#[derive(Debug, Clone, Default)]
pub struct Respondent {
    pub country: Option<&'static str>,
    pub region: Option<&'static str>,
    pub partner: Option<&'static str>,
    pub age: Option<&'static str>,
    pub gender: Option<&'static str>,
    pub new_client: Option<&'static str>,
    pub duration: Option<&'static str>,
    pub victim: Option<&'static str>,
    /// Indicator columns ticked with 1; every other indicator is written as 0
    pub ticked: Vec<&'static str>,
    pub help_rating: Option<&'static str>,
    pub support_rating: Option<&'static str>,
    pub health: Option<&'static str>,
    pub social: Option<&'static str>,
    pub frequency: Option<&'static str>,
    pub friends: Option<&'static str>,
    pub control: Option<&'static str>,
}

impl Respondent {
    fn dimension(&self, dim: Dimension) -> Option<&'static str> {
        match dim {
            Dimension::Country => self.country,
            Dimension::Region => self.region,
            Dimension::Partner => self.partner,
            Dimension::AgeRange => self.age,
            Dimension::Gender => self.gender,
            Dimension::NewClient => self.new_client,
            Dimension::Duration => self.duration,
            Dimension::VictimStatus => self.victim,
        }
    }

    fn scalar(&self, field: ScalarField) -> Option<&'static str> {
        match field {
            ScalarField::OverallHelpRating => self.help_rating,
            ScalarField::PhysicalSupportRating => self.support_rating,
            ScalarField::GeneralHealth => self.health,
            ScalarField::SocialConnectionImpact => self.social,
            ScalarField::PhysicalActivityFrequency => self.frequency,
            ScalarField::MadeFriends => self.friends,
            ScalarField::HealthControl => self.control,
        }
    }
}

/// Every header of the full survey schema, in export order
pub fn full_headers() -> Vec<&'static str> {
    let mut headers: Vec<&'static str> = Dimension::ALL.iter().map(|d| d.column()).collect();
    headers.extend(IndicatorGroup::all_columns());
    headers.extend(ScalarField::ALL.iter().map(|f| f.column()));
    headers
}

/// Quote a CSV field
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render respondents as CSV restricted to `headers`
pub fn survey_csv_with_headers(rows: &[Respondent], headers: &[&str]) -> String {
    let mut out = headers.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| {
                if let Some(dim) = Dimension::ALL.iter().find(|d| d.column() == *header) {
                    return row.dimension(*dim).map(quote).unwrap_or_default();
                }
                if let Some(field) = ScalarField::ALL.iter().find(|f| f.column() == *header) {
                    return row.scalar(*field).map(quote).unwrap_or_default();
                }
                if row.ticked.iter().any(|t| t == header) {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Render respondents as CSV with the full schema
pub fn survey_csv(rows: &[Respondent]) -> String {
    survey_csv_with_headers(rows, &full_headers())
}

/// Load respondents through the regular loader
pub fn load_table(rows: &[Respondent]) -> SurveyTable {
    load_survey_from_bytes(survey_csv(rows).into_bytes()).unwrap()
}

/// Write a survey CSV into a temporary directory
pub fn write_survey_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("survey.csv");
    std::fs::write(&csv_path, contents).unwrap();
    (temp_dir, csv_path)
}

/// Eight respondents with hand-checked aggregates.
///
/// - gender: female 5, male 2, unknown 1
/// - UA 5 rows (Kyiv 2, Lviv 2, one blank region), MD 3 rows
/// - new clients (1-3 months) rate 2, 4, 3; existing clients rate 5, 5, 3, 4
/// - younger brackets attend physical activities, older brackets psychosocial ones
/// - longer duration goes with worse health
pub fn sample_respondents() -> Vec<Respondent> {
    vec![
        Respondent {
            country: Some("Ukraine"),
            region: Some("Kyiv"),
            partner: Some("Hesed A"),
            age: Some("18-54"),
            gender: Some("female"),
            new_client: Some("yes"),
            duration: Some("1-3 months"),
            victim: Some("no"),
            ticked: vec![
                "Physical activities",
                "Physical rehabilitation",
                "Diabetes",
                "Medical support",
            ],
            help_rating: Some("2"),
            support_rating: Some("7"),
            health: Some("3. Good"),
            social: Some("Improved"),
            frequency: Some("Several times a week"),
            friends: Some("Yes"),
            control: Some("Yes"),
        },
        Respondent {
            country: Some("Ukraine"),
            region: Some("Kyiv"),
            partner: Some("Hesed A"),
            age: Some("55-69"),
            gender: Some("male"),
            new_client: Some("yes"),
            duration: Some("1-3 months"),
            victim: Some("no"),
            ticked: vec![
                "Physical activities",
                "Diabetes",
                "chronic cardiovascular",
                "Medical support",
                "Winter assistance",
            ],
            help_rating: Some("4"),
            support_rating: Some("6"),
            health: Some("2. Very good"),
            social: Some("Improved"),
            frequency: Some("Several times a week"),
            friends: Some("Yes"),
            control: Some("Yes"),
        },
        Respondent {
            country: Some("Ukraine"),
            region: Some("Lviv"),
            partner: Some("Hesed B"),
            age: Some("70-85"),
            gender: Some("female"),
            new_client: Some("no"),
            duration: Some("1-2 years"),
            victim: Some("yes"),
            ticked: vec![
                "Social events",
                "Psychological support (group)",
                "chronic cardiovascular",
                "Winter assistance",
            ],
            help_rating: Some("5"),
            support_rating: Some("9"),
            health: Some("4. Satisfactory"),
            social: Some("No change"),
            frequency: Some("Once a week"),
            friends: Some("No"),
            control: Some("Partly"),
        },
        Respondent {
            country: Some("Moldova"),
            region: Some("Chisinau"),
            partner: Some("Hesed C"),
            age: Some("85+"),
            gender: Some("female"),
            new_client: Some("no"),
            duration: Some("More than 2 years"),
            victim: Some("yes"),
            ticked: vec![
                "Social events",
                "Psychological support (individual)",
                "Home care",
                "Dementia",
                "chronic cardiovascular",
                "Medical devices",
                "Winter assistance",
            ],
            help_rating: Some("5"),
            support_rating: Some("10"),
            health: Some("5. Bad"),
            social: Some("Improved"),
            frequency: Some("Rarely"),
            friends: Some("Yes"),
            control: Some("No"),
        },
        Respondent {
            country: Some("Moldova"),
            region: Some("Chisinau"),
            partner: Some("Hesed C"),
            age: Some("unknown"),
            gender: Some("unknown"),
            new_client: Some("no"),
            duration: Some("6-12 months"),
            victim: Some("no"),
            ticked: vec![
                "Interest-based clubs",
                "No chronic diseases or physical limitations",
                "None of the above",
            ],
            help_rating: Some("3"),
            support_rating: None,
            health: Some("3. Good"),
            social: Some("No change"),
            frequency: Some("Once a week"),
            friends: Some("No"),
            control: Some("Yes"),
        },
        Respondent {
            country: Some("Ukraine"),
            region: Some("Lviv"),
            partner: Some("Hesed B"),
            age: Some("70-85"),
            gender: Some("male"),
            new_client: Some("no"),
            duration: Some("3-6 months"),
            victim: Some("no"),
            ticked: vec![
                "Social events",
                "Musculoskeletal disorders",
                "Medical support",
            ],
            help_rating: Some("4"),
            support_rating: Some("8"),
            health: Some("4. Удовлетворительное"),
            social: Some("Improved"),
            frequency: Some("Rarely"),
            friends: Some("Yes"),
            control: Some("Partly"),
        },
        Respondent {
            country: Some("Ukraine"),
            region: None,
            partner: Some("Hesed A"),
            age: Some("85+"),
            gender: Some("female"),
            new_client: Some("no"),
            duration: None,
            victim: Some("yes"),
            ticked: vec!["Vision or hearing impairments", "Winter assistance"],
            help_rating: None,
            support_rating: Some("5"),
            health: None,
            social: None,
            frequency: None,
            friends: None,
            control: None,
        },
        Respondent {
            country: Some("Moldova"),
            region: Some("Chisinau"),
            partner: Some("Hesed C"),
            age: Some("55-69"),
            gender: Some("female"),
            new_client: Some("yes"),
            duration: Some("1-3 months"),
            victim: Some("no"),
            ticked: vec![
                "Physical activities",
                "Social events",
                "Diabetes",
                "Medical support",
            ],
            help_rating: Some("3"),
            support_rating: Some("6"),
            health: Some("2. Very good"),
            social: Some("Improved"),
            frequency: Some("Several times a week"),
            friends: Some("Yes"),
            control: Some("Yes"),
        },
    ]
}

/// The sample survey, loaded
pub fn sample_table() -> SurveyTable {
    load_table(&sample_respondents())
}

/// Randomly generated respondents for property-style tests
pub fn random_respondents(n: usize, seed: u64) -> Vec<Respondent> {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const COUNTRIES: [&str; 3] = ["Ukraine", "Moldova", "Belarus"];
    const REGIONS: [&str; 4] = ["Kyiv", "Lviv", "Chisinau", "Minsk"];
    const AGES: [&str; 5] = ["18-54", "55-69", "70-85", "85+", "unknown"];
    const GENDERS: [&str; 3] = ["female", "male", "unknown"];
    const DURATIONS: [&str; 5] = [
        "1-3 months",
        "3-6 months",
        "6-12 months",
        "1-2 years",
        "more than 2 years",
    ];
    const HEALTH: [&str; 5] = ["1. Excellent", "2. Very good", "3. Good", "4. Satisfactory", "5. Bad"];
    const RATINGS: [&str; 5] = ["1", "2", "3", "4", "5"];

    let mut rng = StdRng::seed_from_u64(seed);
    let indicators: Vec<&'static str> = IndicatorGroup::all_columns().collect();

    (0..n)
        .map(|_| {
            let mut pick = |values: &[&'static str]| -> Option<&'static str> {
                if rng.gen_bool(0.1) {
                    None
                } else {
                    values.choose(&mut rng).copied()
                }
            };
            let country = pick(&COUNTRIES[..]);
            let region = pick(&REGIONS[..]);
            let age = pick(&AGES[..]);
            let gender = pick(&GENDERS[..]);
            let duration = pick(&DURATIONS[..]);
            let health = pick(&HEALTH[..]);
            let help_rating = pick(&RATINGS[..]);
            let ticked = indicators
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(0.3))
                .collect();
            Respondent {
                country,
                region,
                age,
                gender,
                duration,
                health,
                help_rating,
                ticked,
                ..Default::default()
            }
        })
        .collect()
}
