//! Ignore-path filter.

use regex::Regex;

use super::error::DiffError;

/// IgnoreFilter prunes every path that fully matches one of its patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<(String, Regex)>,
}

impl IgnoreFilter {
    /// Compiles the given patterns. Each one must match the whole path.
    pub fn new<I, S>(patterns: I) -> Result<Self, DiffError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.into();
                match Regex::new(&format!("^(?:{})$", pattern)) {
                    Ok(regex) => Ok((pattern, regex)),
                    Err(source) => Err(DiffError::invalid_ignore_pattern(pattern, source)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IgnoreFilter { patterns })
    }

    /// Returns true if `path` is ignored. The root path `""` is eligible.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|(_, regex)| regex.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates the patterns as they were configured.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(pattern, _)| pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_only() {
        let filter = IgnoreFilter::new(["/itemList/0/modifiedAt"]).unwrap();
        assert!(filter.is_ignored("/itemList/0/modifiedAt"));
        assert!(!filter.is_ignored("/itemList/0/modifiedAt/x"));
        assert!(!filter.is_ignored("/a/itemList/0/modifiedAt"));
    }

    #[test]
    fn test_regex_patterns() {
        let filter = IgnoreFilter::new(["/itemList/\\d+/modifiedAt", "/id|/name"]).unwrap();
        assert!(filter.is_ignored("/itemList/12/modifiedAt"));
        assert!(filter.is_ignored("/name"));
        assert!(!filter.is_ignored("/identity"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_root_is_eligible() {
        let filter = IgnoreFilter::new([""]).unwrap();
        assert!(filter.is_ignored(""));
        assert!(!filter.is_ignored("/id"));
        assert!(!IgnoreFilter::default().is_ignored(""));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = IgnoreFilter::new(["/ok", "/items/("]).unwrap_err();
        match err {
            DiffError::InvalidIgnorePattern { pattern, .. } => assert_eq!(pattern, "/items/("),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
