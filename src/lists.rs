use regex::Regex;
use std::sync::OnceLock;

fn numbering() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+\.\s").unwrap())
}

fn sentence_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\s+").unwrap())
}

fn measure_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+\.|\n|•|--| - ").unwrap())
}

fn leading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[•\-]\s*").unwrap())
}

/// Split an enumeration field such as "1. Do X. 2. Do Y." into its items.
///
/// Numbered items are tried first. If that yields at most one item the text
/// is split into sentences instead, each ending in a period.
pub fn parse_list(text: Option<&str>) -> Vec<String> {
    let text = text.unwrap_or("");
    if text.trim().is_empty() {
        return Vec::new();
    }

    let numbered = split_trimmed(numbering(), text);
    if numbered.len() > 1 {
        return numbered;
    }

    split_trimmed(sentence_break(), text)
        .into_iter()
        .map(|item| {
            if item.ends_with('.') {
                item
            } else {
                format!("{}.", item)
            }
        })
        .collect()
}

fn split_trimmed(re: &Regex, text: &str) -> Vec<String> {
    re.split(text)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a preventive-measures field on numbering, newlines, bullets and
/// dashes. Items of five characters or fewer are noise and dropped; at most
/// `limit` items are returned. An empty result stays empty.
pub fn parse_measures(text: Option<&str>, limit: usize) -> Vec<String> {
    let text = text.unwrap_or("");

    measure_break()
        .split(text)
        .map(|piece| leading_marker().replace(piece.trim(), "").trim().to_string())
        .filter(|item| item.chars().count() > 5)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_items_are_split() {
        assert_eq!(
            parse_list(Some("1. Wash hands. 2. Isolate sick birds.")),
            vec!["Wash hands.", "Isolate sick birds."]
        );
        assert_eq!(
            parse_list(Some("1. Subsidy of 25%\n2. Free training 3. Insurance cover")),
            vec!["Subsidy of 25%", "Free training", "Insurance cover"]
        );
    }

    #[test]
    fn unnumbered_text_falls_back_to_sentences() {
        assert_eq!(
            parse_list(Some("Wash hands. Isolate sick birds.")),
            vec!["Wash hands.", "Isolate sick birds."]
        );
        assert_eq!(
            parse_list(Some("Capital subsidy for sheds.  Interest waiver")),
            vec!["Capital subsidy for sheds.", "Interest waiver."]
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_list(Some("")).is_empty());
        assert!(parse_list(Some("   ")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn decimals_are_not_numbering() {
        assert_eq!(
            parse_list(Some("Loan up to 2.5 lakh")),
            vec!["Loan up to 2.5 lakh."]
        );
    }

    #[test]
    fn measures_split_on_bullets_and_dashes() {
        let text = "1. Vaccinate flock\n2. Restrict visitors • Disinfect footwear -- Cull infected birds - Burn";
        assert_eq!(
            parse_measures(Some(text), 8),
            vec![
                "Vaccinate flock",
                "Restrict visitors",
                "Disinfect footwear",
                "Cull infected birds",
            ]
        );
    }

    #[test]
    fn measures_respect_limit_and_emptiness() {
        let text = "1. Clean sheds 2. Isolate pigs 3. Report deaths";
        assert_eq!(parse_measures(Some(text), 2), vec!["Clean sheds", "Isolate pigs"]);
        assert!(parse_measures(None, 8).is_empty());
        assert!(parse_measures(Some("1. ok 2. no"), 8).is_empty());
    }
}
