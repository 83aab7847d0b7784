//! Survey schema: filter dimensions, indicator groups and scalar response fields
//!
//! Headers are kept verbatim from the survey export, including the trailing
//! spaces some questions carry.

use serde::{Deserialize, Serialize};

/// A filterable demographic dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Country,
    Region,
    Partner,
    AgeRange,
    Gender,
    NewClient,
    Duration,
    VictimStatus,
}

impl Dimension {
    /// All dimensions in filter-panel order
    pub const ALL: [Dimension; 8] = [
        Dimension::Country,
        Dimension::Region,
        Dimension::Partner,
        Dimension::AgeRange,
        Dimension::Gender,
        Dimension::NewClient,
        Dimension::Duration,
        Dimension::VictimStatus,
    ];

    /// Header of the column backing this dimension
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Country => "country",
            Dimension::Region => "region",
            Dimension::Partner => "Partner",
            Dimension::AgeRange => "client_age_range",
            Dimension::Gender => "client_gender",
            Dimension::NewClient => "client_new",
            Dimension::Duration => {
                "How long does a client receive services funded by World Jewish Relief?"
            }
            Dimension::VictimStatus => "client_victim_of_nazism_status",
        }
    }

    /// Inverse of [`Dimension::key`]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }

    /// Short key used in criteria files and CLI output
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Country => "country",
            Dimension::Region => "region",
            Dimension::Partner => "partner",
            Dimension::AgeRange => "age_range",
            Dimension::Gender => "gender",
            Dimension::NewClient => "new_client",
            Dimension::Duration => "duration",
            Dimension::VictimStatus => "victim_status",
        }
    }
}

/// A multi-select question stored as one 0/1 column per option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorGroup {
    ChronicConditions,
    Activities,
    Services,
}

pub const CHRONIC_COLUMNS: [&str; 11] = [
    "chronic cardiovascular",
    "Diabetes",
    "Respiratory diseases",
    "Musculoskeletal disorders",
    "Neurological disorders",
    "Dementia",
    "Oncological diseases",
    "Vision or hearing impairments",
    "Physical limitations due to injuries or disability",
    "Other (please specify)",
    "No chronic diseases or physical limitations",
];

pub const ACTIVITY_COLUMNS: [&str; 9] = [
    "activity volunteers social",
    "Social events",
    "Interest-based clubs",
    "Home care",
    "Psychological support (group)",
    "Psychological support (individual)",
    "Warm ome / Welcoming space",
    "Physical rehabilitation",
    "Physical activities",
];

pub const SERVICE_COLUMNS: [&str; 10] = [
    "None of the above",
    "Purchase of tablets or phones",
    "Mobility or exercise equipment",
    "Medical treatment",
    "Medical devices",
    "Delivery of food packages/hot meals",
    "Medical support",
    "Delivery of blood pressure/oximeters",
    "Winter assistance",
    "Other material assistance",
];

/// Activities counted as physical when comparing age groups
pub const PHYSICAL_ACTIVITY_COLUMNS: [&str; 2] = ["Physical rehabilitation", "Physical activities"];

/// Activities counted as social or psychological support
pub const PSYCHOSOCIAL_ACTIVITY_COLUMNS: [&str; 3] = [
    "Social events",
    "Psychological support (group)",
    "Psychological support (individual)",
];

impl IndicatorGroup {
    pub const ALL: [IndicatorGroup; 3] = [
        IndicatorGroup::ChronicConditions,
        IndicatorGroup::Activities,
        IndicatorGroup::Services,
    ];

    /// Member columns in declared order
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            IndicatorGroup::ChronicConditions => &CHRONIC_COLUMNS,
            IndicatorGroup::Activities => &ACTIVITY_COLUMNS,
            IndicatorGroup::Services => &SERVICE_COLUMNS,
        }
    }

    /// Name of the derived row-wise sum column
    pub fn composite_column(self) -> &'static str {
        match self {
            IndicatorGroup::ChronicConditions => "chronic_count",
            IndicatorGroup::Activities => "activity_count",
            IndicatorGroup::Services => "service_count",
        }
    }

    /// Every indicator column across all groups
    pub fn all_columns() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().flat_map(|g| g.columns().iter().copied())
    }

    pub fn is_indicator(column: &str) -> bool {
        Self::all_columns().any(|c| c == column)
    }
}

/// Single-answer response fields used by the section summaries and hypotheses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    OverallHelpRating,
    PhysicalSupportRating,
    GeneralHealth,
    SocialConnectionImpact,
    PhysicalActivityFrequency,
    MadeFriends,
    HealthControl,
}

impl ScalarField {
    pub const ALL: [ScalarField; 7] = [
        ScalarField::OverallHelpRating,
        ScalarField::PhysicalSupportRating,
        ScalarField::GeneralHealth,
        ScalarField::SocialConnectionImpact,
        ScalarField::PhysicalActivityFrequency,
        ScalarField::MadeFriends,
        ScalarField::HealthControl,
    ];

    pub fn column(self) -> &'static str {
        match self {
            ScalarField::OverallHelpRating => {
                "How would you rate the help you receive (1 - it's not enough, 5 - everything is perfect)?"
            }
            ScalarField::PhysicalSupportRating => {
                "Если вы получали оборудование, лекарства или другую медицинскую помощь, как вы думаете, это повлияло на ваше физическое состояние и уровень жизни по шкале от 1 до 10 (1 — не повлияло вообще, 10 — максимальный эффект)? "
            }
            ScalarField::GeneralHealth => "В целом, как бы Вы охарактеризовали своё здоровье?",
            ScalarField::SocialConnectionImpact => {
                "Как программа повлияла на ваши социальные связи или сеть контактов? "
            }
            ScalarField::PhysicalActivityFrequency => {
                "Как часто вы участвуете в мероприятиях, которые касаються улучшения физического здоровья, организуемых нашими партнерами?"
            }
            ScalarField::MadeFriends => "Вы завели друзей или контакты, посещая занятия? ",
            ScalarField::HealthControl => {
                "Чувствуете ли вы, что контролируете свое физическое здоровье благодаря нашей программе?"
            }
        }
    }

    /// Numeric rating fields are coerced to Float64 at load time
    pub fn is_rating(self) -> bool {
        matches!(
            self,
            ScalarField::OverallHelpRating | ScalarField::PhysicalSupportRating
        )
    }
}
