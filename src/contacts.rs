//! Veterinary contact directory: webhook payload parsing and list filters.

use crate::error::{Error, Result};
use crate::types::value_text;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Rating as sent by the directory service: a number, or free text such as
/// "4.5" or "Not applicable"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(f64),
    Text(String),
}

impl Rating {
    /// Numeric value read from the leading number of the rating, if any
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Number(n) => Some(*n),
            Rating::Text(s) => leading_number(s),
        }
    }
}

fn leading_number(s: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").unwrap()
    });
    re.find(s).and_then(|m| m.as_str().trim().parse().ok())
}

/// One directory entry. Every field is optional in the payload; `null`
/// reads as absent and numbers or booleans are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VetContact {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub contact_type: Option<String>,
    #[serde(rename = "Active", default, deserialize_with = "lenient_text")]
    pub active: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<Rating>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub animal_types: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub additional_info: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(other) => value_text(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(Rating::Number),
        Some(other) => value_text(&other).map(Rating::Text),
        None => None,
    })
}

impl VetContact {
    pub fn is_government(&self) -> bool {
        matches!(self.contact_type.as_deref(), Some("Govt") | Some("Non-Govt/NGO"))
    }

    pub fn is_local(&self) -> bool {
        self.contact_type.as_deref() == Some("Local")
    }

    /// Open right now or around the clock
    pub fn is_open_now(&self) -> bool {
        self.active
            .as_deref()
            .map(str::to_lowercase)
            .is_some_and(|a| a.contains("now") || a.contains("24/7"))
    }

    pub fn rating_value(&self) -> Option<f64> {
        self.rating.as_ref().and_then(Rating::value)
    }
}

/// Unwrap the `output` string from the directory webhook's JSON body
pub fn parse_webhook_response(body: &str) -> Result<Vec<VetContact>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::Payload(format!("Invalid response from server: {e}")))?;
    let output = value
        .get("output")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Payload("Invalid response format from server".to_string()))?;
    parse_webhook_output(output)
}

/// Parse the model-written contact list, which may be wrapped in a
/// ```` ```json ```` fence and carry escaped quotes and newlines
pub fn parse_webhook_output(output: &str) -> Result<Vec<VetContact>> {
    let mut text = output.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    let cleaned = text.replace("\\\"", "\"").replace("\\n", "");

    let value: Value = serde_json::from_str(cleaned.trim())
        .map_err(|e| Error::Payload(format!("Invalid data format received: {e}")))?;
    if !value.is_array() {
        return Err(Error::Payload("Invalid data format received".to_string()));
    }
    serde_json::from_value(value)
        .map_err(|e| Error::Payload(format!("Invalid contact record: {e}")))
}

/// Directory tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactTab {
    #[default]
    All,
    Saved,
    Contacted,
    Government,
    Local,
}

impl From<&str> for ContactTab {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "saved" => ContactTab::Saved,
            "contacted" => ContactTab::Contacted,
            "government" | "govt" => ContactTab::Government,
            "local" => ContactTab::Local,
            _ => ContactTab::All,
        }
    }
}

/// Toggle filters, only honoured on the `All` tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFilters {
    pub emergency: bool,
    pub open_now: bool,
    pub high_rating: bool,
}

#[derive(Debug, Clone)]
pub struct ContactQuery {
    pub tab: ContactTab,
    pub filters: ContactFilters,
    pub high_rating_threshold: f64,
}

impl Default for ContactQuery {
    fn default() -> Self {
        Self {
            tab: ContactTab::All,
            filters: ContactFilters::default(),
            high_rating_threshold: 4.0,
        }
    }
}

impl ContactQuery {
    /// `saved` and `contacted` are bookmarked contact names
    pub fn matches(&self, contact: &VetContact, saved: &[String], contacted: &[String]) -> bool {
        match self.tab {
            ContactTab::Saved => return saved.iter().any(|n| *n == contact.name),
            ContactTab::Contacted => return contacted.iter().any(|n| *n == contact.name),
            ContactTab::Government => return contact.is_government(),
            ContactTab::Local => return contact.is_local(),
            ContactTab::All => {}
        }

        if self.filters.emergency && contact.active.as_deref() != Some("24/7") {
            return false;
        }
        if self.filters.open_now
            && !contact
                .active
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains("now"))
        {
            return false;
        }
        if self.filters.high_rating
            && !contact
                .rating_value()
                .is_some_and(|r| r >= self.high_rating_threshold)
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(
        &self,
        contacts: &'a [VetContact],
        saved: &[String],
        contacted: &[String],
    ) -> Vec<&'a VetContact> {
        contacts
            .iter()
            .filter(|c| self.matches(c, saved, contacted))
            .collect()
    }
}

/// Split contacts into government/NGO and local lists, dropping other types
pub fn partition_by_type<'a>(
    contacts: &[&'a VetContact],
) -> (Vec<&'a VetContact>, Vec<&'a VetContact>) {
    let government = contacts.iter().copied().filter(|c| c.is_government()).collect();
    let local = contacts.iter().copied().filter(|c| c.is_local()).collect();
    (government, local)
}
