use crate::classify::KeywordClassifier;
use crate::config::Config;
use crate::filter::{FilterAlias, FilterManager, RecordFilter};
use crate::lists::{parse_list, parse_measures};
use crate::location::LocationSet;
use crate::types::{OutbreakRecord, OutbreakView, Record, SchemeRecord, SchemeView, Severity};
use tracing::debug;

/// Turns raw sheet rows into derived scheme and outbreak views.
///
/// Every call recomputes from its inputs; nothing from an earlier pass (such
/// as a previous user location) is carried over.
pub struct Processor {
    config: Config,
    classifier: KeywordClassifier,
    filter: FilterManager,
}

impl Processor {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self::with_filter(config, FilterAlias::Default)
    }

    pub fn with_filter(config: Config, alias: FilterAlias) -> Self {
        let filter = FilterManager::new(alias, &config);
        Self {
            classifier: KeywordClassifier::new(config.clone()),
            config,
            filter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &KeywordClassifier {
        &self.classifier
    }

    /// Scheme rows that pass the domain filter, with tags and benefits derived
    pub fn schemes(&self, records: &[Record]) -> Vec<SchemeView> {
        let views: Vec<SchemeView> = records
            .iter()
            .map(SchemeRecord::from)
            .filter(|scheme| self.filter.should_keep(scheme).is_keep())
            .map(|scheme| self.scheme_view(scheme))
            .collect();

        debug!(
            total = records.len(),
            kept = views.len(),
            filter = ?self.filter.alias(),
            "prepared scheme views"
        );
        views
    }

    fn scheme_view(&self, record: SchemeRecord) -> SchemeView {
        SchemeView {
            categories: self.classifier.classify_scheme(&record),
            card_tags: self.classifier.card_tags(&record),
            benefits: parse_list(record.benefits.as_deref()),
            record,
        }
    }

    /// Outbreak rows with a type and disease name, flagged against `location`.
    ///
    /// Ids count kept rows from 1; the first `current_alert_count` rows are
    /// current and the rest are history.
    pub fn outbreaks(&self, records: &[Record], location: Option<&str>) -> Vec<OutbreakView> {
        let views: Vec<OutbreakView> = records
            .iter()
            .map(OutbreakRecord::from)
            .filter(|o| o.alert_type.is_some() && o.disease.is_some())
            .enumerate()
            .map(|(index, record)| self.outbreak_view(index, record, location))
            .collect();

        debug!(
            total = records.len(),
            kept = views.len(),
            near = views.iter().filter(|v| v.is_near_you).count(),
            "prepared outbreak views"
        );
        views
    }

    fn outbreak_view(
        &self,
        index: usize,
        record: OutbreakRecord,
        location: Option<&str>,
    ) -> OutbreakView {
        let your_locations = LocationSet::parse(record.your_locations.as_deref());
        let other_locations = LocationSet::parse(record.other_locations.as_deref());
        let severity = record
            .alert_type
            .as_deref()
            .map(Severity::from)
            .unwrap_or(Severity::Unknown);

        OutbreakView {
            id: index + 1,
            is_near_you: your_locations.matches(location),
            preventive_measures: parse_measures(
                record.measures.as_deref(),
                self.config.max_preventive_measures,
            ),
            your_locations,
            other_locations,
            severity,
            severity_level: severity.level(),
            current: index < self.config.current_alert_count,
            record,
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
