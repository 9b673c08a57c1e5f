use crate::error::{Error, Result};
use crate::types::CategoryTag;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A category tag and the keywords that trigger it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub tag: CategoryTag,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(tag: CategoryTag, keywords: &[&str]) -> Self {
        Self {
            tag,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True when any keyword is a substring of the already lower-cased text
    pub fn matches(&self, lowered: &str) -> bool {
        contains_any(lowered, &self.keywords)
    }
}

/// Which part of a scheme a card rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Title,
    TitleOrDescription,
}

/// Display-tag rule used on scheme cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRule {
    pub tag: CategoryTag,
    pub keywords: Vec<String>,
    pub scope: RuleScope,
}

impl CardRule {
    pub fn new(tag: CategoryTag, keywords: &[&str], scope: RuleScope) -> Self {
        Self {
            tag,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            scope,
        }
    }
}

pub(crate) fn contains_any(lowered: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

/// Keyword lists and limits driving classification and views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub categories: Vec<KeywordGroup>,
    pub fallback: CategoryTag,
    pub allow: Vec<String>,
    pub exclude: Vec<String>,
    pub card_rules: Vec<CardRule>,
    pub max_card_tags: usize,
    pub current_alert_count: usize,
    pub max_preventive_measures: usize,
    pub header_rows: usize,
    pub high_rating_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        use CategoryTag::*;
        Self {
            categories: vec![
                KeywordGroup::new(PigFarming, &["pig", "swine"]),
                KeywordGroup::new(PoultryFarming, &["poultry", "chicken", "hen", "duck"]),
            ],
            fallback: GeneralAgriculture,
            allow: ["pig", "swine", "poultry", "chicken", "hen", "duck"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: [
                "dairy",
                "cattle",
                "cow",
                "buffalo",
                "fish",
                "fishery",
                "aquaculture",
                "sheep",
                "goat",
                "silk",
                "bee",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            card_rules: vec![
                CardRule::new(ScheduledCaste, &["sc", "st"], RuleScope::Title),
                CardRule::new(ScheduledTribe, &["tribe"], RuleScope::Title),
                CardRule::new(WomenFarmers, &["woman", "women", "female"], RuleScope::Title),
                CardRule::new(PigFarming, &["pig"], RuleScope::TitleOrDescription),
                CardRule::new(PoultryFarming, &["poultry"], RuleScope::TitleOrDescription),
                CardRule::new(Fisheries, &["fish"], RuleScope::TitleOrDescription),
                CardRule::new(DairyFarming, &["dairy"], RuleScope::TitleOrDescription),
            ],
            max_card_tags: 4,
            current_alert_count: 9,
            max_preventive_measures: 8,
            header_rows: 2,
            high_rating_threshold: 4.0,
        }
    }
}

impl Config {
    /// Load a configuration override from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse YAML; keys left out keep their defaults
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Lower-case and trim every keyword so matching can stay a plain `contains`
    fn normalize(&mut self) {
        fn clean(keywords: &mut Vec<String>) {
            for keyword in keywords.iter_mut() {
                *keyword = keyword.trim().to_lowercase();
            }
        }
        for group in &mut self.categories {
            clean(&mut group.keywords);
        }
        for rule in &mut self.card_rules {
            clean(&mut rule.keywords);
        }
        clean(&mut self.allow);
        clean(&mut self.exclude);
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for group in &self.categories {
            if group.keywords.is_empty() {
                return Err(Error::Config(format!(
                    "Category '{}' has no keywords",
                    group.tag
                )));
            }
            if group.keywords.iter().any(|k| k.is_empty()) {
                return Err(Error::Config(format!(
                    "Category '{}' has a blank keyword",
                    group.tag
                )));
            }
        }

        for rule in &self.card_rules {
            if rule.keywords.iter().any(|k| k.is_empty()) {
                return Err(Error::Config(format!(
                    "Card rule '{}' has a blank keyword",
                    rule.tag
                )));
            }
        }

        // a blank keyword is a substring of everything
        if self.allow.iter().chain(&self.exclude).any(|k| k.is_empty()) {
            return Err(Error::Config(
                "Allow and exclude lists must not contain blank keywords".to_string(),
            ));
        }

        if self.max_card_tags == 0 {
            return Err(Error::Config("max_card_tags must be at least 1".to_string()));
        }

        if !self.high_rating_threshold.is_finite() {
            return Err(Error::Config(
                "high_rating_threshold must be a finite number".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Replace the category keyword groups
    pub fn categories(mut self, groups: Vec<KeywordGroup>) -> Self {
        self.config.categories = groups;
        self
    }

    /// Add a category keyword group after the existing ones
    pub fn add_category(mut self, group: KeywordGroup) -> Self {
        self.config.categories.push(group);
        self
    }

    pub fn fallback(mut self, tag: CategoryTag) -> Self {
        self.config.fallback = tag;
        self
    }

    pub fn allow(mut self, keywords: Vec<String>) -> Self {
        self.config.allow = keywords;
        self
    }

    pub fn exclude(mut self, keywords: Vec<String>) -> Self {
        self.config.exclude = keywords;
        self
    }

    /// Set exclude keywords from comma-separated string
    pub fn exclude_str(mut self, keywords: &str) -> Result<Self> {
        self.config.exclude = split_keywords(keywords)?;
        Ok(self)
    }

    /// Set allow keywords from comma-separated string
    pub fn allow_str(mut self, keywords: &str) -> Result<Self> {
        self.config.allow = split_keywords(keywords)?;
        Ok(self)
    }

    pub fn card_rules(mut self, rules: Vec<CardRule>) -> Self {
        self.config.card_rules = rules;
        self
    }

    pub fn max_card_tags(mut self, limit: usize) -> Self {
        self.config.max_card_tags = limit;
        self
    }

    pub fn current_alert_count(mut self, count: usize) -> Self {
        self.config.current_alert_count = count;
        self
    }

    pub fn max_preventive_measures(mut self, limit: usize) -> Self {
        self.config.max_preventive_measures = limit;
        self
    }

    pub fn header_rows(mut self, rows: usize) -> Self {
        self.config.header_rows = rows;
        self
    }

    pub fn high_rating_threshold(mut self, threshold: f64) -> Self {
        self.config.high_rating_threshold = threshold;
        self
    }

    /// Build the final configuration
    pub fn build(mut self) -> Result<Config> {
        self.config.normalize();
        self.config.validate()?;
        Ok(self.config)
    }
}

fn split_keywords(keywords: &str) -> Result<Vec<String>> {
    if keywords.trim().is_empty() {
        return Ok(vec![]);
    }

    keywords
        .split(',')
        .map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(Error::Config("Empty keyword".to_string()));
            }
            Ok(trimmed.to_lowercase())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.fallback, CategoryTag::GeneralAgriculture);
        assert_eq!(config.max_card_tags, 4);
        assert!(config.allow.contains(&"duck".to_string()));
        assert!(config.exclude.contains(&"aquaculture".to_string()));
    }

    #[test]
    fn builder_lowercases_keywords() {
        let config = ConfigBuilder::new()
            .exclude_str("Goat, SHEEP ")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.exclude, vec!["goat", "sheep"]);
    }

    #[test]
    fn empty_keyword_is_rejected() {
        assert!(ConfigBuilder::new().allow_str("pig,,hen").is_err());

        let err = ConfigBuilder::new()
            .add_category(KeywordGroup::new(CategoryTag::Fisheries, &[]))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Fisheries"));
    }

    #[test]
    fn zero_card_limit_is_rejected() {
        assert!(ConfigBuilder::new().max_card_tags(0).build().is_err());
    }

    #[test]
    fn yaml_overrides_keep_defaults() {
        let yaml = r#"
categories:
  - tag: Fisheries
    keywords: [Fish, Aquaculture]
current_alert_count: 3
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].tag, CategoryTag::Fisheries);
        assert_eq!(config.categories[0].keywords, vec!["fish", "aquaculture"]);
        assert_eq!(config.current_alert_count, 3);
        assert_eq!(config.max_card_tags, 4);
        assert_eq!(config.allow, Config::default().allow);
    }

    #[test]
    fn yaml_rejects_unknown_tag() {
        let yaml = "fallback: Goat Farming\n";
        assert!(Config::from_yaml_str(yaml).is_err());
    }
}
