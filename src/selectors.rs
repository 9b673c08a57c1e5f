use crate::types::{OutbreakRecord, SchemeRecord};

/// Text scanned by every keyword rule: lower-cased `title + " " + description`.
/// Missing parts count as empty strings.
pub fn classification_text(title: Option<&str>, description: Option<&str>) -> String {
    format!("{} {}", title.unwrap_or(""), description.unwrap_or("")).to_lowercase()
}

/// Classification text of a scheme (name and description)
pub fn scheme_text(scheme: &SchemeRecord) -> String {
    classification_text(scheme.name.as_deref(), scheme.description.as_deref())
}

/// Fields the scheme search box looks at
pub fn scheme_search_fields(scheme: &SchemeRecord) -> [Option<&str>; 3] {
    [
        scheme.name.as_deref(),
        scheme.description.as_deref(),
        scheme.ministry.as_deref(),
    ]
}

/// Fields the outbreak search box looks at
pub fn outbreak_search_fields(outbreak: &OutbreakRecord) -> [Option<&str>; 4] {
    [
        outbreak.disease.as_deref(),
        outbreak.locations.as_deref(),
        outbreak.overview.as_deref(),
        outbreak.your_locations.as_deref(),
    ]
}
