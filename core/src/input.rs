use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::model::task::Category;

/// Metadata keys accepted in free-text entry (e.g. "cat:shopping").
pub const ENTRY_KEYS: [&str; 1] = ["category"];

#[derive(Debug, PartialEq)]
pub struct ParsedEntry {
    pub description: String,
    pub metadata: HashMap<String, String>,
}

/// Splits a raw entry line into description words and `key:value`
/// metadata tokens. Keys are expanded/validated separately.
pub fn parse_entry(input: &str) -> ParsedEntry {
    let mut description_parts = Vec::new();
    let mut metadata = HashMap::new();

    for token in input.split_whitespace() {
        if let Some((key, value)) = token.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        description_parts.push(token);
    }

    ParsedEntry {
        description: description_parts.join(" "),
        metadata,
    }
}

/// Expands an abbreviated key against the candidate list: exact match
/// first, then unique-prefix match.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Resolves a category value by exact or unique-prefix match against
/// the fixed category keys ("sh" -> shopping).
pub fn parse_category(value: &str) -> Result<Category> {
    let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
    let expanded = expand_key(&value.to_lowercase(), &keys)
        .map_err(|_| anyhow!("Unknown category: '{}'", value))?;
    Category::from_key(&expanded).ok_or_else(|| anyhow!("Unknown category: '{}'", value))
}

/// Pulls the category (if any) out of parsed entry metadata.
/// Unknown or ambiguous keys are reported, not silently dropped.
pub fn entry_category(entry: &ParsedEntry) -> Result<Option<Category>> {
    for (key, value) in &entry.metadata {
        let full_key = expand_key(key, &ENTRY_KEYS)?;
        if full_key == "category" {
            return parse_category(value).map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_simple() {
        let parsed = parse_entry("Buy milk cat:shopping");
        assert_eq!(parsed.description, "Buy milk");
        assert_eq!(parsed.metadata.get("cat"), Some(&"shopping".to_string()));
    }

    #[test]
    fn test_parse_entry_without_metadata() {
        let parsed = parse_entry("  Call bank  ");
        assert_eq!(parsed.description, "Call bank");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("c", &ENTRY_KEYS).unwrap(), "category");
        assert_eq!(expand_key("cat", &ENTRY_KEYS).unwrap(), "category");
        assert_eq!(expand_key("category", &ENTRY_KEYS).unwrap(), "category");
        assert!(expand_key("due", &ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_parse_category_prefixes() {
        assert_eq!(parse_category("shopping").unwrap(), Category::Shopping);
        assert_eq!(parse_category("sh").unwrap(), Category::Shopping);
        assert_eq!(parse_category("W").unwrap(), Category::Work);
        assert_eq!(parse_category("p").unwrap(), Category::Personal);
        assert!(parse_category("x").is_err());
    }

    #[test]
    fn test_entry_category() {
        let parsed = parse_entry("Buy milk c:sh");
        assert_eq!(entry_category(&parsed).unwrap(), Some(Category::Shopping));

        let parsed = parse_entry("Call bank");
        assert_eq!(entry_category(&parsed).unwrap(), None);

        let parsed = parse_entry("Buy milk cat:groceries");
        assert!(entry_category(&parsed).is_err());
    }
}
