//! Helper utilities and common functions

use crate::common::constants::{SUGGESTION_THRESHOLD, WILDCARD};

/// True when the name is empty or only whitespace
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// True when the name is the `*` wildcard marker
pub fn is_wildcard(name: &str) -> bool {
    name == WILDCARD
}

/// Find the candidate most similar to `name`, if any is close enough
///
/// Used to attach "did you mean" hints to resolution errors. Exact matches are
/// never returned since the caller only asks after a lookup already failed.
pub fn closest_match<'a, I>(name: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered = name.to_lowercase();
    let mut best: Option<(&str, f64)> = None;

    for candidate in candidates {
        if candidate == name {
            continue;
        }
        let score = strsim::jaro_winkler(&lowered, &candidate.to_lowercase());
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(!is_blank("t1"));
    }

    #[test]
    fn test_closest_match() {
        let fields = ["id", "name", "age"];
        assert_eq!(closest_match("nmae", fields), Some("name".to_string()));
        assert_eq!(closest_match("NAME", fields), Some("name".to_string()));
        assert_eq!(closest_match("salary", fields), None);
        assert_eq!(closest_match("id", ["id"]), None);
    }
}
