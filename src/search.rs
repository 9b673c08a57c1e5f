use crate::classify::KeywordClassifier;
use crate::selectors::{outbreak_search_fields, scheme_search_fields};
use crate::types::{CategoryTag, OutbreakView, SchemeView};

/// Case-insensitive substring search over any of the fields.
/// A blank query matches everything.
pub fn matches_search(fields: &[Option<&str>], query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Filters applied to the scheme list
#[derive(Debug, Clone, Default)]
pub struct SchemeQuery {
    pub search: String,
    pub categories: Vec<CategoryTag>,
}

impl SchemeQuery {
    pub fn matches(&self, classifier: &KeywordClassifier, view: &SchemeView) -> bool {
        matches_search(&scheme_search_fields(&view.record), &self.search)
            && classifier.matches_category(&view.record, &self.categories)
    }

    /// Run the query over views, keeping their order
    pub fn apply<'a>(
        &self,
        classifier: &KeywordClassifier,
        views: &'a [SchemeView],
    ) -> Vec<&'a SchemeView> {
        views
            .iter()
            .filter(|view| self.matches(classifier, view))
            .collect()
    }
}

/// Which slice of the outbreak list is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertTab {
    #[default]
    Current,
    History,
}

impl From<&str> for AlertTab {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "history" | "historical" => AlertTab::History,
            _ => AlertTab::Current,
        }
    }
}

/// Filters applied to the outbreak list
#[derive(Debug, Clone)]
pub struct OutbreakQuery {
    pub search: String,
    /// `all` or an alert type compared without case
    pub alert_type: String,
    pub tab: AlertTab,
}

impl Default for OutbreakQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            alert_type: "all".to_string(),
            tab: AlertTab::Current,
        }
    }
}

impl OutbreakQuery {
    pub fn matches(&self, view: &OutbreakView) -> bool {
        let in_tab = match self.tab {
            AlertTab::Current => view.current,
            AlertTab::History => !view.current,
        };
        in_tab
            && matches_search(&outbreak_search_fields(&view.record), &self.search)
            && self.matches_type(view.record.alert_type.as_deref())
    }

    fn matches_type(&self, alert_type: Option<&str>) -> bool {
        let wanted = self.alert_type.trim();
        if wanted.is_empty() || wanted.eq_ignore_ascii_case("all") {
            return true;
        }
        alert_type.is_some_and(|t| t.trim().to_lowercase() == wanted.to_lowercase())
    }

    pub fn apply<'a>(&self, views: &'a [OutbreakView]) -> Vec<&'a OutbreakView> {
        views.iter().filter(|view| self.matches(view)).collect()
    }
}

/// Distinct alert types in first-seen order, preceded by `all`
pub fn alert_types(views: &[OutbreakView]) -> Vec<String> {
    let mut types = vec!["all".to_string()];
    for t in views.iter().filter_map(|v| v.record.alert_type.as_deref()) {
        if !types.iter().any(|seen| seen == t) {
            types.push(t.to_string());
        }
    }
    types
}
