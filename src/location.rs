use serde::{Deserialize, Serialize};

/// Place names parsed from a comma-delimited field.
///
/// Tokens are trimmed, empty tokens dropped and duplicates (compared without
/// case) removed, keeping the first spelling and the original order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSet {
    places: Vec<String>,
}

impl LocationSet {
    pub fn parse(field: Option<&str>) -> Self {
        let mut places: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for token in field.unwrap_or("").split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let key = token.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            places.push(token.to_string());
        }

        Self { places }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// True when the query is a case-insensitive substring of any place.
    /// A blank query never matches.
    pub fn matches(&self, query: Option<&str>) -> bool {
        let Some(query) = normalize_query(query) else {
            return false;
        };
        self.places
            .iter()
            .any(|place| place.to_lowercase().contains(&query))
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}

fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Whether a record's raw location field is relevant to the user's location.
///
/// Containment is one-directional: the query must sit inside a location
/// token. "Mumbai" matches "Greater Mumbai" but "Greater Mumbai" does not
/// match a "Mumbai" token.
pub fn is_relevant(location_field: Option<&str>, query: Option<&str>) -> bool {
    LocationSet::parse(location_field).matches(query)
}
