//! Ignore-list: field names excluded from reporting for one run

use std::collections::BTreeSet;

/// Field names whose violations are never recorded.
///
/// Names the schema does not declare are accepted and have no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    names: BTreeSet<String>,
}

impl IgnoreList {
    /// An empty ignore-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list, trimming names and dropping empties.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Returns true if `name` is ignored
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Ignored names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns true if nothing is ignored
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_empties() {
        let list = IgnoreList::parse(" Age, Outcome,,  ,ID ");
        let names: Vec<_> = list.iter().collect();
        assert_eq!(names, vec!["Age", "ID", "Outcome"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(IgnoreList::parse("").is_empty());
        assert!(IgnoreList::parse(" , ").is_empty());
    }

    #[test]
    fn test_contains_is_exact() {
        let list: IgnoreList = ["case_id"].into_iter().collect();
        assert!(list.contains("case_id"));
        assert!(!list.contains("Case_id"));
    }
}
