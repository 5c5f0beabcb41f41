//! Back-of-book index ordering.

use std::cmp::Ordering;

use folio_model::IndexEntry;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary collation key: accents stripped, case folded
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Primary comparison first, then the raw key so the order is total
pub fn compare_sort_keys(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Entries sorted by sort key; equal keys keep insertion order
pub fn sorted_entries(entries: &[IndexEntry]) -> Vec<IndexEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| compare_sort_keys(&a.sort_key, &b.sort_key));
    sorted
}

/// Sorted entries sharing the first letter of their primary term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexGroup {
    pub letter: String,
    pub entries: Vec<IndexEntry>,
}

/// Group entries under the uppercased first character of the primary
/// term. Groups are ordered by letter; entries keep sort key order inside
/// their group.
pub fn group_entries(entries: &[IndexEntry]) -> Vec<IndexGroup> {
    let mut groups: Vec<IndexGroup> = Vec::new();
    for entry in sorted_entries(entries) {
        let letter: String = entry
            .primary_term()
            .chars()
            .next()
            .map(|c| collation_key(&c.to_string()).to_uppercase())
            .unwrap_or_default();
        match groups.iter_mut().find(|group| group.letter == letter) {
            Some(group) => group.entries.push(entry),
            None => groups.push(IndexGroup {
                letter,
                entries: vec![entry],
            }),
        }
    }
    groups.sort_by(|a, b| compare_sort_keys(&a.letter, &b.letter));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, term: &str) -> IndexEntry {
        IndexEntry::new(id, vec![term.to_string()], 1)
    }

    #[test]
    fn test_case_and_accent_insensitive_order() {
        let entries = vec![entry("1", "zebra"), entry("2", "Émile"), entry("3", "apple"), entry("4", "eagle")];
        let ids: Vec<String> = sorted_entries(&entries).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["3", "4", "2", "1"]);
    }

    #[test]
    fn test_equal_keys_keep_insertion_order() {
        let entries = vec![entry("first", "Frame"), entry("second", "Frame")];
        let ids: Vec<String> = sorted_entries(&entries).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_grouping_by_letter() {
        let entries = vec![entry("1", "banana"), entry("2", "Apple"), entry("3", "avocado"), entry("4", "Éclair")];
        let groups = group_entries(&entries);
        let letters: Vec<&str> = groups.iter().map(|g| g.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "B", "E"]);
        assert_eq!(groups[0].entries.len(), 2);
    }

    #[test]
    fn test_custom_sort_keys_keep_one_group_per_letter() {
        let mut apple = entry("apple", "apple");
        apple.sort_key = "a".to_string();
        let mut avocado = entry("avocado", "avocado");
        avocado.sort_key = "c".to_string();
        let entries = vec![avocado, entry("banana", "banana"), apple];

        let groups = group_entries(&entries);
        let letters: Vec<&str> = groups.iter().map(|g| g.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "B"]);
        let ids: Vec<&str> = groups[0].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["apple", "avocado"]);
    }
}
