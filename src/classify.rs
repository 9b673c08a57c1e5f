//! Keyword classification of scheme records.
//!
//! Matching is plain substring search over lower-cased text, so a keyword can
//! hit inside a longer word ("hen" in "then"). That over-matching is accepted.

use crate::config::{contains_any, Config, RuleScope};
use crate::selectors::{classification_text, scheme_text};
use crate::types::{CategoryTag, SchemeRecord};

/// Maps title and description text to category tags
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    config: Config,
}

impl KeywordClassifier {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tags of every matching keyword group, in configured order.
    /// When nothing matches the result is exactly the fallback tag.
    pub fn classify(&self, title: Option<&str>, description: Option<&str>) -> Vec<CategoryTag> {
        self.classify_text(&classification_text(title, description))
    }

    /// Same as [`classify`](Self::classify) over text already produced by
    /// [`classification_text`]
    pub fn classify_text(&self, lowered: &str) -> Vec<CategoryTag> {
        let mut tags = Vec::new();
        for group in &self.config.categories {
            if group.matches(lowered) && !tags.contains(&group.tag) {
                tags.push(group.tag);
            }
        }

        if tags.is_empty() {
            tags.push(self.config.fallback);
        }
        tags
    }

    pub fn classify_scheme(&self, scheme: &SchemeRecord) -> Vec<CategoryTag> {
        self.classify_text(&scheme_text(scheme))
    }

    /// True when the scheme carries any of the selected tags.
    /// An empty selection matches everything.
    pub fn matches_category(&self, scheme: &SchemeRecord, selected: &[CategoryTag]) -> bool {
        if selected.is_empty() {
            return true;
        }
        let tags = self.classify_scheme(scheme);
        selected.iter().any(|tag| tags.contains(tag))
    }

    /// Category tags present across the given schemes, in configured order,
    /// always followed by the fallback tag
    pub fn available_categories<'a, I>(&self, schemes: I) -> Vec<CategoryTag>
    where
        I: IntoIterator<Item = &'a SchemeRecord>,
    {
        let texts: Vec<String> = schemes.into_iter().map(scheme_text).collect();

        let mut found: Vec<CategoryTag> = Vec::new();
        for group in &self.config.categories {
            if found.contains(&group.tag) {
                continue;
            }
            if texts.iter().any(|text| group.matches(text)) {
                found.push(group.tag);
            }
        }

        if !found.contains(&self.config.fallback) {
            found.push(self.config.fallback);
        }
        found
    }

    /// Display tags for a scheme card.
    ///
    /// Card rules run in order; the fallback label is used when none hit, the
    /// ministry name is appended when present, and the list is cut to
    /// `max_card_tags`.
    pub fn card_tags(&self, scheme: &SchemeRecord) -> Vec<String> {
        let title = scheme.name.as_deref().unwrap_or("").to_lowercase();
        let description = scheme.description.as_deref().unwrap_or("").to_lowercase();

        let mut tags: Vec<String> = self
            .config
            .card_rules
            .iter()
            .filter(|rule| match rule.scope {
                RuleScope::Title => contains_any(&title, &rule.keywords),
                RuleScope::TitleOrDescription => {
                    contains_any(&title, &rule.keywords)
                        || contains_any(&description, &rule.keywords)
                }
            })
            .map(|rule| rule.tag.label().to_string())
            .collect();

        if tags.is_empty() {
            tags.push(self.config.fallback.label().to_string());
        }
        if let Some(ministry) = scheme.ministry.as_deref() {
            tags.push(ministry.trim().to_string());
        }

        tags.truncate(self.config.max_card_tags);
        tags
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, KeywordGroup};

    fn scheme(name: &str, description: &str) -> SchemeRecord {
        SchemeRecord {
            name: Some(name.to_string()).filter(|s| !s.is_empty()),
            description: Some(description.to_string()).filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    #[test]
    fn no_keyword_falls_back_to_general() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify(Some("Soil Health Card"), Some("Testing of soil nutrients")),
            vec![CategoryTag::GeneralAgriculture]
        );
        assert_eq!(
            classifier.classify(None, None),
            vec![CategoryTag::GeneralAgriculture]
        );
    }

    #[test]
    fn pig_in_any_case_is_tagged() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify(Some("PIG Rearing Subsidy"), None),
            vec![CategoryTag::PigFarming]
        );
        assert_eq!(
            classifier.classify(None, Some("Support for Pig farmers")),
            vec![CategoryTag::PigFarming]
        );
    }

    #[test]
    fn multiple_groups_keep_configured_order() {
        let classifier = KeywordClassifier::default();
        let tags = classifier.classify(Some("Duck and swine units"), None);
        assert_eq!(tags, vec![CategoryTag::PigFarming, CategoryTag::PoultryFarming]);
    }

    #[test]
    fn substring_over_match_is_kept() {
        let classifier = KeywordClassifier::default();
        // "then" contains "hen"
        assert_eq!(
            classifier.classify(Some("Apply online, then wait"), None),
            vec![CategoryTag::PoultryFarming]
        );
    }

    #[test]
    fn repeated_calls_are_identical() {
        let classifier = KeywordClassifier::default();
        let first = classifier.classify(Some("Chicken feed"), Some("for layers"));
        let second = classifier.classify(Some("Chicken feed"), Some("for layers"));
        assert_eq!(first, second);
    }

    #[test]
    fn general_category_means_no_group_matched() {
        let classifier = KeywordClassifier::default();
        let general = [CategoryTag::GeneralAgriculture];
        assert!(classifier.matches_category(&scheme("Crop Insurance", ""), &general));
        assert!(!classifier.matches_category(&scheme("Poultry Venture", ""), &general));
        assert!(classifier.matches_category(&scheme("Poultry Venture", ""), &[]));
        assert!(classifier.matches_category(
            &scheme("Poultry Venture", ""),
            &[CategoryTag::PigFarming, CategoryTag::PoultryFarming]
        ));
    }

    #[test]
    fn available_categories_end_with_fallback() {
        let classifier = KeywordClassifier::default();
        let schemes = vec![
            scheme("Backyard Poultry", ""),
            scheme("Crop Loan", ""),
            scheme("Backyard Poultry II", ""),
        ];
        assert_eq!(
            classifier.available_categories(&schemes),
            vec![CategoryTag::PoultryFarming, CategoryTag::GeneralAgriculture]
        );
        assert_eq!(
            classifier.available_categories(&[]),
            vec![CategoryTag::GeneralAgriculture]
        );
    }

    #[test]
    fn custom_groups_drive_classification() {
        let config = ConfigBuilder::new()
            .add_category(KeywordGroup::new(CategoryTag::Fisheries, &["Fish"]))
            .build()
            .unwrap();
        let classifier = KeywordClassifier::new(config);
        assert_eq!(
            classifier.classify(Some("Inland fisheries"), None),
            vec![CategoryTag::Fisheries]
        );
    }

    #[test]
    fn card_tags_follow_rules_and_limit() {
        let classifier = KeywordClassifier::default();

        let mut record = scheme("Scheme for Women in Pig Farming", "Dairy and fish ponds");
        record.ministry = Some("Ministry of Agriculture".to_string());
        // "scheme" carries "sc"; limit cuts the ministry and the dairy tag
        assert_eq!(
            classifier.card_tags(&record),
            vec!["Scheduled Caste", "Women Farmers", "Pig Farming", "Fisheries"]
        );

        let mut plain = scheme("Kisan Credit Card", "");
        plain.ministry = Some("Department of Finance".to_string());
        assert_eq!(
            classifier.card_tags(&plain),
            vec!["General Agriculture", "Department of Finance"]
        );
    }

    #[test]
    fn title_rules_ignore_description() {
        let classifier = KeywordClassifier::default();
        let record = scheme("Kisan Maan Dhan", "open to tribe members");
        assert_eq!(classifier.card_tags(&record), vec!["General Agriculture"]);
    }
}
