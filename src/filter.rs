use crate::config::{contains_any, Config};
use crate::selectors::classification_text;
use crate::types::SchemeRecord;

/// Filter alias type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAlias {
    Default,
    None,
}

impl From<&str> for FilterAlias {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "default" => FilterAlias::Default,
            "none" => FilterAlias::None,
            _ => FilterAlias::Default, // Default fallback
        }
    }
}

/// Filter result indicating whether a record should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl FilterResult {
    pub fn is_keep(&self) -> bool {
        matches!(self, FilterResult::Keep)
    }
}

/// Filter trait for scheme records
pub trait RecordFilter {
    fn should_keep(&self, scheme: &SchemeRecord) -> FilterResult;
}

/// Drops schemes about out-of-domain animals.
///
/// The allow list is checked first and wins outright, so a scheme naming both
/// poultry and fish is kept. Schemes naming neither list are general and kept.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    allow: Vec<String>,
    exclude: Vec<String>,
}

impl DomainFilter {
    pub fn new(allow: Vec<String>, exclude: Vec<String>) -> Self {
        Self { allow, exclude }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allow.clone(), config.exclude.clone())
    }

    /// Decide on title and description, either possibly missing
    pub fn check(&self, title: Option<&str>, description: Option<&str>) -> FilterResult {
        let text = classification_text(title, description);

        if contains_any(&text, &self.allow) {
            return FilterResult::Keep;
        }
        if contains_any(&text, &self.exclude) {
            return FilterResult::FilterOut;
        }
        FilterResult::Keep
    }
}

impl RecordFilter for DomainFilter {
    fn should_keep(&self, scheme: &SchemeRecord) -> FilterResult {
        self.check(scheme.name.as_deref(), scheme.description.as_deref())
    }
}

/// Filter manager that handles different filter aliases
pub struct FilterManager {
    alias: FilterAlias,
    domain: DomainFilter,
}

impl FilterManager {
    pub fn new(alias: FilterAlias, config: &Config) -> Self {
        Self {
            alias,
            domain: DomainFilter::from_config(config),
        }
    }

    pub fn alias(&self) -> FilterAlias {
        self.alias
    }
}

impl RecordFilter for FilterManager {
    fn should_keep(&self, scheme: &SchemeRecord) -> FilterResult {
        match self.alias {
            FilterAlias::Default => self.domain.should_keep(scheme),
            // No filtering - keep all records
            FilterAlias::None => FilterResult::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> DomainFilter {
        DomainFilter::from_config(&Config::default())
    }

    #[test]
    fn allowed_keyword_wins_over_excluded() {
        assert_eq!(
            filter().check(Some("Poultry and Fish Integrated Farming"), None),
            FilterResult::Keep
        );
        assert_eq!(
            filter().check(Some("Fishery support"), Some("for backyard chicken units")),
            FilterResult::Keep
        );
    }

    #[test]
    fn excluded_animal_is_dropped() {
        assert_eq!(
            filter().check(Some("National Dairy Plan"), None),
            FilterResult::FilterOut
        );
        assert_eq!(
            filter().check(None, Some("Sheep and goat development")),
            FilterResult::FilterOut
        );
    }

    #[test]
    fn general_scheme_is_kept() {
        assert_eq!(
            filter().check(Some("Kisan Credit Card"), Some("Short term crop loans")),
            FilterResult::Keep
        );
        assert_eq!(filter().check(None, None), FilterResult::Keep);
    }

    #[test]
    fn alias_none_keeps_everything() {
        let scheme = SchemeRecord {
            name: Some("National Dairy Plan".to_string()),
            ..Default::default()
        };
        let config = Config::default();

        let default = FilterManager::new(FilterAlias::from("DEFAULT"), &config);
        assert_eq!(default.should_keep(&scheme), FilterResult::FilterOut);

        let none = FilterManager::new(FilterAlias::from("none"), &config);
        assert_eq!(none.should_keep(&scheme), FilterResult::Keep);

        assert_eq!(FilterAlias::from("anything"), FilterAlias::Default);
    }
}
