use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::location::LocationSet;

/// One sheet row: field name to free text.
///
/// Field presence is never guaranteed. `get` treats missing and blank values
/// alike, and `field` normalises both to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures and ingestion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// The field's text, or `None` when absent or blank
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// The field's text with absent fields normalised to `""`
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Build a record from a JSON object. Scalars become text and `null`
    /// fields are left out.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .filter_map(|(key, value)| value_text(value).map(|text| (key.as_str(), text)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Text form of a loosely typed JSON value, `None` for `null`
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Column names of the scheme sheet
pub mod scheme_fields {
    pub const NAME: &str = "Govt Scheme Name";
    pub const DESCRIPTION: &str = "Scheme Description";
    pub const MINISTRY: &str = "Ministry / Department Name";
    pub const BENEFITS: &str = "Benefits Provided";
    pub const ELIGIBILITY: &str = "Eligibility Requirements";
    pub const HOW_TO_APPLY: &str = "How To Apply";
    pub const DOCUMENTS: &str = "Required Documents";
    pub const AI_OVERVIEW: &str = "AI Overview";
    pub const WEBSITE: &str = "Website Link";
    pub const DOCUMENT_LINK: &str = "Document Link";
    pub const PDF_LINK: &str = "PDF Link";
}

/// Column names of the outbreak sheet
pub mod outbreak_fields {
    pub const ID: &str = "OBTID";
    pub const TYPE: &str = "Type";
    pub const DISEASE: &str = "DiseaseName";
    pub const OVERVIEW: &str = "Disease Overview";
    pub const LOCATIONS: &str = "Locations";
    pub const YOUR_LOCATIONS: &str = "Your Locations Effected";
    pub const OTHER_LOCATIONS: &str = "Other Locations Effected";
    pub const MEASURES: &str = "Possible Preventive Measure";
    pub const MONTH_YEAR: &str = "MonthYear";
    pub const UPDATED_DATE: &str = "UpdatedDate";
    pub const UPDATED_ON: &str = "UpdatedOn";
}

/// A government scheme row with every known column made explicit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    #[serde(rename = "Govt Scheme Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Scheme Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Ministry / Department Name", default)]
    pub ministry: Option<String>,
    #[serde(rename = "Benefits Provided", default)]
    pub benefits: Option<String>,
    #[serde(rename = "Eligibility Requirements", default)]
    pub eligibility: Option<String>,
    #[serde(rename = "How To Apply", default)]
    pub how_to_apply: Option<String>,
    #[serde(rename = "Required Documents", default)]
    pub documents: Option<String>,
    #[serde(rename = "AI Overview", default)]
    pub ai_overview: Option<String>,
    #[serde(rename = "Website Link", default)]
    pub website: Option<String>,
    #[serde(rename = "Document Link", default)]
    pub document_link: Option<String>,
    #[serde(rename = "PDF Link", default)]
    pub pdf_link: Option<String>,
}

impl From<&Record> for SchemeRecord {
    fn from(record: &Record) -> Self {
        use scheme_fields::*;
        Self {
            name: record.owned(NAME),
            description: record.owned(DESCRIPTION),
            ministry: record.owned(MINISTRY),
            benefits: record.owned(BENEFITS),
            eligibility: record.owned(ELIGIBILITY),
            how_to_apply: record.owned(HOW_TO_APPLY),
            documents: record.owned(DOCUMENTS),
            ai_overview: record.owned(AI_OVERVIEW),
            website: record.owned(WEBSITE),
            document_link: record.owned(DOCUMENT_LINK),
            pdf_link: record.owned(PDF_LINK),
        }
    }
}

/// A disease alert row from the outbreak sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    #[serde(rename = "OBTID", default)]
    pub obt_id: Option<String>,
    #[serde(rename = "Type", default)]
    pub alert_type: Option<String>,
    #[serde(rename = "DiseaseName", default)]
    pub disease: Option<String>,
    #[serde(rename = "Disease Overview", default)]
    pub overview: Option<String>,
    #[serde(rename = "Locations", default)]
    pub locations: Option<String>,
    #[serde(rename = "Your Locations Effected", default)]
    pub your_locations: Option<String>,
    #[serde(rename = "Other Locations Effected", default)]
    pub other_locations: Option<String>,
    #[serde(rename = "Possible Preventive Measure", default)]
    pub measures: Option<String>,
    #[serde(rename = "MonthYear", default)]
    pub month_year: Option<String>,
    #[serde(rename = "UpdatedDate", default)]
    pub updated_date: Option<String>,
    #[serde(rename = "UpdatedOn", default)]
    pub updated_on: Option<String>,
}

impl From<&Record> for OutbreakRecord {
    fn from(record: &Record) -> Self {
        use outbreak_fields::*;
        Self {
            obt_id: record.owned(ID),
            alert_type: record.owned(TYPE),
            disease: record.owned(DISEASE),
            overview: record.owned(OVERVIEW),
            locations: record.owned(LOCATIONS),
            your_locations: record.owned(YOUR_LOCATIONS),
            other_locations: record.owned(OTHER_LOCATIONS),
            measures: record.owned(MEASURES),
            month_year: record.owned(MONTH_YEAR),
            updated_date: record.owned(UPDATED_DATE),
            updated_on: record.owned(UPDATED_ON),
        }
    }
}

/// Classification label derived from keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryTag {
    #[serde(rename = "Pig Farming")]
    PigFarming,
    #[serde(rename = "Poultry Farming")]
    PoultryFarming,
    #[serde(rename = "General Agriculture")]
    GeneralAgriculture,
    #[serde(rename = "Fisheries")]
    Fisheries,
    #[serde(rename = "Dairy Farming")]
    DairyFarming,
    #[serde(rename = "Scheduled Caste")]
    ScheduledCaste,
    #[serde(rename = "Scheduled Tribe")]
    ScheduledTribe,
    #[serde(rename = "Women Farmers")]
    WomenFarmers,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 8] = [
        CategoryTag::PigFarming,
        CategoryTag::PoultryFarming,
        CategoryTag::GeneralAgriculture,
        CategoryTag::Fisheries,
        CategoryTag::DairyFarming,
        CategoryTag::ScheduledCaste,
        CategoryTag::ScheduledTribe,
        CategoryTag::WomenFarmers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::PigFarming => "Pig Farming",
            CategoryTag::PoultryFarming => "Poultry Farming",
            CategoryTag::GeneralAgriculture => "General Agriculture",
            CategoryTag::Fisheries => "Fisheries",
            CategoryTag::DairyFarming => "Dairy Farming",
            CategoryTag::ScheduledCaste => "Scheduled Caste",
            CategoryTag::ScheduledTribe => "Scheduled Tribe",
            CategoryTag::WomenFarmers => "Women Farmers",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the display label or its kebab-case form, ignoring case
/// ("Pig Farming", "pig-farming").
impl FromStr for CategoryTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', " ");
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.label().to_lowercase() == wanted)
            .ok_or_else(|| Error::Config(format!("Unknown category '{}'", s)))
    }
}

/// Alert severity derived from the outbreak `Type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Unknown,
    Info,
    Warning,
    Alert,
    Outbreak,
}

impl Severity {
    pub fn level(&self) -> u8 {
        match self {
            Severity::Outbreak => 4,
            Severity::Alert => 3,
            Severity::Warning => 2,
            Severity::Info => 1,
            Severity::Unknown => 0,
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "outbreak" => Severity::Outbreak,
            "alert" => Severity::Alert,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            _ => Severity::Unknown,
        }
    }
}

/// Derived view of a scheme that survived the domain filter
#[derive(Debug, Clone, Serialize)]
pub struct SchemeView {
    #[serde(flatten)]
    pub record: SchemeRecord,
    pub categories: Vec<CategoryTag>,
    pub card_tags: Vec<String>,
    pub benefits: Vec<String>,
}

/// Derived view of an outbreak alert
#[derive(Debug, Clone, Serialize)]
pub struct OutbreakView {
    pub id: usize,
    #[serde(flatten)]
    pub record: OutbreakRecord,
    pub your_locations: LocationSet,
    pub other_locations: LocationSet,
    pub preventive_measures: Vec<String>,
    pub is_near_you: bool,
    pub severity: Severity,
    pub severity_level: u8,
    pub current: bool,
}
