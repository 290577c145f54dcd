use std::collections::HashMap;
use std::hash::Hash;

/// Key → count table that remembers when each key was first seen.
///
/// Rankings break count ties by discovery order, so the same input always
/// yields the same report.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    entries: HashMap<K, (usize, usize)>,
    total: usize,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            total: 0,
        }
    }

    pub fn increment(&mut self, key: K) {
        let next = self.entries.len();
        self.entries.entry(key).or_insert((0, next)).0 += 1;
        self.total += 1;
    }

    pub fn count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, |&(count, _)| count)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of increments
    pub fn total(&self) -> usize {
        self.total
    }

    /// The `n` most frequent keys, highest count first
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut ranked: Vec<(&K, usize, usize)> = self
            .entries
            .iter()
            .map(|(key, &(count, seen))| (key, count, seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked
            .into_iter()
            .take(n)
            .map(|(key, count, _)| (key.clone(), count))
            .collect()
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.increment(key);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_ranking() {
        let table: FrequencyTable<&str> = ["b", "a", "b", "c", "a", "b"].into_iter().collect();
        assert_eq!(table.count(&"b"), 3);
        assert_eq!(table.count(&"z"), 0);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        assert_eq!(table.most_common(2), vec![("b", 3), ("a", 2)]);
    }

    #[test]
    fn test_ties_follow_discovery_order() {
        let table: FrequencyTable<&str> = ["z", "y", "x", "y", "z", "x"].into_iter().collect();
        assert_eq!(table.most_common(10), vec![("z", 2), ("y", 2), ("x", 2)]);
    }

    #[test]
    fn test_empty_table() {
        let table: FrequencyTable<String> = FrequencyTable::new();
        assert!(table.is_empty());
        assert!(table.most_common(20).is_empty());
    }
}
