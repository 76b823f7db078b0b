//! Inverted indexes over record tags
//!
//! Each index maps a tag (symptom or effect) to the positions of the
//! records carrying it. Positions are pushed while walking the catalog front
//! to back, so every posting list is already in catalog order and lookups
//! give the same answer as a linear scan.

use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone)]
pub struct FieldIndex {
    /// Tag -> record positions (ascending, no repeats)
    postings: FxHashMap<String, Vec<usize>>,
    /// Distinct tags, sorted lexicographically
    sorted_keys: Vec<String>,
}

impl FieldIndex {
    /// Build from `(position, tags)` pairs. Positions must be visited in ascending order.
    pub fn build<'a, I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
        T: IntoIterator<Item = &'a str>,
    {
        let mut postings: FxHashMap<String, Vec<usize>> = FxHashMap::default();

        for (pos, tags) in entries {
            for tag in tags {
                let list = postings.entry(tag.to_string()).or_default();
                // A record listing the same tag twice still appears once
                if list.last() != Some(&pos) {
                    list.push(pos);
                }
            }
        }

        let mut sorted_keys: Vec<String> = postings.keys().cloned().collect();
        sorted_keys.sort();

        Self { postings, sorted_keys }
    }

    /// Positions of records carrying `key`, in catalog order
    pub fn positions(&self, key: &str) -> &[usize] {
        self.postings.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn sorted_keys(&self) -> &[String] {
        &self.sorted_keys
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.sorted_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postings_follow_insertion_order() {
        let index = FieldIndex::build(vec![
            (0, vec!["Husten", "Fieber"]),
            (1, vec!["Fieber"]),
            (2, vec!["Husten", "Husten"]),
        ]);

        assert_eq!(index.positions("Husten"), &[0, 2]);
        assert_eq!(index.positions("Fieber"), &[0, 1]);
        assert_eq!(index.positions("husten"), &[] as &[usize]);
        assert!(index.positions("").is_empty());
    }

    #[test]
    fn test_sorted_keys_are_distinct() {
        let index = FieldIndex::build(vec![
            (0, vec!["b", "a"]),
            (1, vec!["c", "a"]),
            (2, vec!["B"]),
        ]);

        assert_eq!(index.sorted_keys(), &["B", "a", "b", "c"]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_empty_index() {
        let index = FieldIndex::build(Vec::<(usize, Vec<&str>)>::new());
        assert!(index.is_empty());
        assert!(index.positions("anything").is_empty());
    }
}
