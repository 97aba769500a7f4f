//! FCS TEXT segment: the delimited keyword/value dictionary.
//!
//! The first byte of the segment is the delimiter. Keys and values alternate,
//! each terminated by the delimiter; a doubled delimiter is a literal delimiter
//! inside a key or value. Keys are case-insensitive and stored upper-cased.

use std::collections::BTreeMap;
use std::str::FromStr;

use log::warn;

use super::FcsError;

/// Keyword dictionary from a TEXT segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    entries: BTreeMap<String, String>,
}

impl Keywords {
    /// Parse a raw TEXT segment (delimiter byte included)
    pub fn parse(segment: &[u8]) -> Result<Self, FcsError> {
        let Some((&delimiter, body)) = segment.split_first() else {
            return Err(FcsError::InvalidText("segment is empty".to_string()));
        };

        let tokens = tokenize(body, delimiter);
        if tokens.len() % 2 != 0 {
            return Err(FcsError::InvalidText(format!(
                "odd number of tokens ({}); keyword without value",
                tokens.len()
            )));
        }

        let mut keywords = Keywords::default();
        for pair in tokens.chunks_exact(2) {
            let key = String::from_utf8_lossy(&pair[0]).trim().to_uppercase();
            if key.is_empty() {
                return Err(FcsError::InvalidText("empty keyword".to_string()));
            }
            let value = String::from_utf8_lossy(&pair[1]).into_owned();
            if let Some(previous) = keywords.entries.insert(key.clone(), value) {
                warn!("Keyword {} repeated; replacing {:?}", key, previous);
            }
        }

        Ok(keywords)
    }

    /// Look up a keyword (case-insensitive)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_uppercase()).map(String::as_str)
    }

    /// Look up a keyword that must be present
    pub fn require(&self, key: &str) -> Result<&str, FcsError> {
        self.get(key)
            .ok_or_else(|| FcsError::MissingKeyword(key.to_uppercase()))
    }

    /// Parse an optional numeric keyword
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>, FcsError> {
        self.get(key)
            .map(|value| parse_value(key, value))
            .transpose()
    }

    /// Parse a required numeric keyword
    pub fn parse_required<T: FromStr>(&self, key: &str) -> Result<T, FcsError> {
        parse_value(key, self.require(key)?)
    }

    /// Per-parameter keyword `$P{n}{suffix}`, e.g. `parameter(3, 'N')` for `$P3N`
    pub fn parameter(&self, n: usize, suffix: char) -> Option<&str> {
        self.get(&parameter_key(n, suffix))
    }

    /// Insert or replace a keyword
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_uppercase(), value.into());
    }

    /// Iterate keywords in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no keywords
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back into TEXT segment bytes using `delimiter`
    pub fn to_segment(&self, delimiter: u8) -> Vec<u8> {
        let mut out = vec![delimiter];
        for (key, value) in &self.entries {
            push_escaped(&mut out, key.as_bytes(), delimiter);
            out.push(delimiter);
            push_escaped(&mut out, value.as_bytes(), delimiter);
            out.push(delimiter);
        }
        out
    }
}

/// Build `$P{n}{suffix}`
pub fn parameter_key(n: usize, suffix: char) -> String {
    format!("$P{}{}", n, suffix)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, FcsError> {
    value.trim().parse().map_err(|_| FcsError::InvalidKeyword {
        key: key.to_uppercase(),
        value: value.to_string(),
    })
}

fn tokenize(body: &[u8], delimiter: u8) -> Vec<Vec<u8>> {
    let mut tokens = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;

    while i < body.len() {
        let byte = body[i];
        if byte == delimiter {
            if body.get(i + 1) == Some(&delimiter) {
                current.push(delimiter);
                i += 2;
                continue;
            }
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(byte);
        }
        i += 1;
    }

    // Some writers omit the closing delimiter; trailing padding is not a token
    if !current.iter().all(u8::is_ascii_whitespace) {
        tokens.push(current);
    }

    tokens
}

fn push_escaped(out: &mut Vec<u8>, bytes: &[u8], delimiter: u8) {
    for &b in bytes {
        out.push(b);
        if b == delimiter {
            out.push(delimiter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        let keywords = Keywords::parse(b"/$PAR/2/$P1N/FL1/$p1s/CD4/").unwrap();

        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords.get("$PAR"), Some("2"));
        assert_eq!(keywords.get("$P1S"), Some("CD4"));
        assert_eq!(keywords.parameter(1, 'N'), Some("FL1"));
        assert_eq!(keywords.parameter(2, 'N'), None);
    }

    #[test]
    fn test_escaped_delimiter() {
        let keywords = Keywords::parse(b"|$P1N|FL1||A|$PAR|1|").unwrap();
        assert_eq!(keywords.get("$P1N"), Some("FL1|A"));
    }

    #[test]
    fn test_missing_final_delimiter() {
        let keywords = Keywords::parse(b"/$PAR/2/$TOT/10").unwrap();
        assert_eq!(keywords.parse_required::<usize>("$TOT").unwrap(), 10);
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let keywords = Keywords::parse(b"/$PAR/2/   ").unwrap();
        assert_eq!(keywords.len(), 1);
    }

    #[test]
    fn test_odd_tokens_rejected() {
        assert!(matches!(
            Keywords::parse(b"/$PAR/2/$TOT/"),
            Err(FcsError::InvalidText(_))
        ));
        assert!(matches!(Keywords::parse(b""), Err(FcsError::InvalidText(_))));
    }

    #[test]
    fn test_repeated_key_keeps_last() {
        let keywords = Keywords::parse(b"/$TOT/1/$TOT/2/").unwrap();
        assert_eq!(keywords.get("$TOT"), Some("2"));
    }

    #[test]
    fn test_numeric_parsing() {
        let keywords = Keywords::parse(b"/$PAR/ 3 /$TOT/many/").unwrap();

        assert_eq!(keywords.parse_required::<usize>("$PAR").unwrap(), 3);
        assert!(matches!(
            keywords.parse_required::<usize>("$TOT"),
            Err(FcsError::InvalidKeyword { .. })
        ));
        assert_eq!(keywords.parse_opt::<usize>("$NEXTDATA").unwrap(), None);
        assert!(matches!(
            keywords.require("$DATATYPE"),
            Err(FcsError::MissingKeyword(k)) if k == "$DATATYPE"
        ));
    }

    #[test]
    fn test_segment_roundtrip_escapes() {
        let mut keywords = Keywords::default();
        keywords.insert("$P1N", "a/b");
        keywords.insert("$PAR", "1");

        let bytes = keywords.to_segment(b'/');
        assert_eq!(bytes, b"/$P1N/a//b/$PAR/1/".to_vec());
        assert_eq!(Keywords::parse(&bytes).unwrap(), keywords);
    }
}
