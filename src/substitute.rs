//! Search and replace over text extracted from show-text operands
//!
//! Search keys are regular expressions. Replacement values are always inserted
//! literally: backslashes and `$` signs in a value never act as escapes or
//! group references.

use regex::{NoExpand, Regex};
use crate::error::{Error, Result};

/// A compiled set of search-replace pairs
///
/// Pairs are applied one after the other, ordered by descending key length and
/// then lexicographically, so the result does not depend on insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReplacementSet {
    entries: Vec<Replacement>,
}

#[derive(Debug, Clone)]
struct Replacement {
    key: String,
    pattern: Regex,
    value: String,
}

impl ReplacementSet {
    /// Create an empty replacement set
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a set from (key, value) pairs
    ///
    /// A `None` value removes every match of its key. Later duplicates of a key
    /// overwrite earlier ones.
    pub fn compile<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            set.insert(key, value)?;
        }
        Ok(set)
    }

    /// Add or overwrite a single pair
    pub fn insert(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::InvalidSearchKey(
                "The search key must not be empty".to_string(),
            ));
        }

        let pattern = Regex::new(&key).map_err(|source| Error::InvalidPattern {
            key: key.clone(),
            source,
        })?;
        let value = value.map(Into::into).unwrap_or_default();

        self.entries.retain(|entry| entry.key != key);
        let position = self
            .entries
            .iter()
            .position(|entry| application_order(&key, &entry.key).is_lt())
            .unwrap_or(self.entries.len());
        self.entries.insert(position, Replacement { key, pattern, value });

        Ok(())
    }

    /// Number of pairs in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the replacement value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Keys in the order they are applied
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }
}

/// Longer keys first, ties broken lexicographically
fn application_order(a: &str, b: &str) -> std::cmp::Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

/// Apply every pair of `replacements` to `text`
pub fn substitute(text: &str, replacements: &ReplacementSet) -> String {
    let mut result = text.to_string();

    for entry in &replacements.entries {
        if entry.pattern.is_match(&result) {
            result = entry
                .pattern
                .replace_all(&result, NoExpand(&entry.value))
                .into_owned();
        }
    }

    result
}

/// Decode ISO-8859-1 bytes into a string
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode a string as ISO-8859-1
///
/// Characters above U+00FF are written as `?`. Returns the bytes and the number
/// of characters that could not be represented.
pub fn latin1_encode(text: &str) -> (Vec<u8>, usize) {
    let mut lost = 0;
    let bytes = text
        .chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) => b,
            Err(_) => {
                lost += 1;
                b'?'
            }
        })
        .collect();
    (bytes, lost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> ReplacementSet {
        ReplacementSet::compile(pairs.iter().map(|(k, v)| (*k, Some(*v)))).unwrap()
    }

    #[test]
    fn test_simple_replacement() {
        let replacements = set(&[("@name@", "Jane Doe")]);
        assert_eq!(substitute("Name: @name@", &replacements), "Name: Jane Doe");
    }

    #[test]
    fn test_identity_without_matches() {
        let replacements = set(&[("@name@", "Jane"), ("@mail@", "jane@example.org")]);
        let text = "Nothing to see here (really)";
        assert_eq!(substitute(text, &replacements), text);
        assert_eq!(substitute("", &replacements), "");
    }

    #[test]
    fn test_keys_are_patterns() {
        let replacements = set(&[("@id[0-9]+@", "X")]);
        assert_eq!(substitute("@id1@ and @id42@", &replacements), "X and X");
    }

    #[test]
    fn test_backslashes_in_value_are_literal() {
        let replacements = set(&[("@path@", r"C:\temp\")]);
        assert_eq!(substitute("dir=@path@", &replacements), r"dir=C:\temp\");
    }

    #[test]
    fn test_dollar_in_value_is_literal() {
        let replacements = set(&[("@amount@", "$100 and $1")]);
        assert_eq!(substitute("@amount@", &replacements), "$100 and $1");
    }

    #[test]
    fn test_none_value_removes_match() {
        let replacements =
            ReplacementSet::compile(vec![("@gone@", None::<String>), ("@kept@", Some("x".to_string()))])
                .unwrap();
        assert_eq!(substitute("a@gone@b@kept@", &replacements), "abx");
        assert_eq!(replacements.get("@gone@"), Some(""));
    }

    #[test]
    fn test_longer_keys_applied_first() {
        let replacements = set(&[("@a@", "short"), ("@a@b", "long")]);
        assert_eq!(replacements.keys().collect::<Vec<_>>(), vec!["@a@b", "@a@"]);
        assert_eq!(substitute("@a@b @a@", &replacements), "long short");
    }

    #[test]
    fn test_order_independent_of_insertion() {
        let forward = set(&[("ab", "1"), ("cd", "2"), ("x", "3")]);
        let backward = set(&[("x", "3"), ("cd", "2"), ("ab", "1")]);
        assert_eq!(
            forward.keys().collect::<Vec<_>>(),
            backward.keys().collect::<Vec<_>>()
        );
        assert_eq!(forward.keys().collect::<Vec<_>>(), vec!["ab", "cd", "x"]);
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let replacements = set(&[("@k@", "first"), ("@k@", "second")]);
        assert_eq!(replacements.len(), 1);
        assert_eq!(substitute("@k@", &replacements), "second");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = ReplacementSet::compile(vec![("(unclosed", Some("x"))]);
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = b"Gr\xfc\xdfe \xe0 Stra\xdfe";
        let text = latin1_decode(bytes);
        assert_eq!(text, "Grüße à Straße");
        assert_eq!(latin1_encode(&text), (bytes.to_vec(), 0));
    }

    #[test]
    fn test_latin1_unrepresentable() {
        let (bytes, lost) = latin1_encode("5 €");
        assert_eq!(bytes, b"5 ?".to_vec());
        assert_eq!(lost, 1);
    }
}
