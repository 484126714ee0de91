use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;

/// Frequency distribution.
///
/// Ties are broken by the order in which keys were first added.
#[derive(Clone, Debug)]
pub struct FreqDist<K> {
    ids: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
    total: usize,
}

impl<K> Default for FreqDist<K> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            entries: vec![],
            total: 0,
        }
    }
}

impl<K> FreqDist<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count of `key` by one.
    pub fn add<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            self.entries[id].1 += 1;
        } else {
            self.ids.insert(key.to_owned(), self.entries.len());
            self.entries.push((key.to_owned(), 1));
        }
        self.total += 1;
    }

    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.ids.get(key).map_or(0, |&id| self.entries[id].1)
    }

    /// Number of samples.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most frequent key.
    pub fn max(&self) -> Option<&K> {
        let mut best: Option<&(K, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k)
    }

    /// Returns up to `n` keys with their counts in descending order of frequency.
    pub fn most_common(&self, n: usize) -> Vec<(&K, usize)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(k, c)| (k, *c)).collect();
        // stable
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

/// Frequency distributions grouped by a condition.
#[derive(Clone, Debug)]
pub struct ConditionalFreqDist<C, K> {
    dists: HashMap<C, FreqDist<K>>,
}

impl<C, K> Default for ConditionalFreqDist<C, K> {
    fn default() -> Self {
        Self {
            dists: HashMap::new(),
        }
    }
}

impl<C, K> ConditionalFreqDist<C, K>
where
    C: Eq + Hash,
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<Q>(&mut self, condition: C, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        self.dists.entry(condition).or_default().add(key);
    }

    pub fn get<D>(&self, condition: &D) -> Option<&FreqDist<K>>
    where
        C: Borrow<D>,
        D: ?Sized + Eq + Hash,
    {
        self.dists.get(condition)
    }

    pub fn len(&self) -> usize {
        self.dists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }

    pub fn into_conditions(self) -> impl Iterator<Item = (C, FreqDist<K>)> {
        self.dists.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freq_dist_counts() {
        let mut fd = FreqDist::<String>::new();
        for w in ["a", "b", "a", "c", "a", "b"] {
            fd.add(w);
        }
        assert_eq!(3, fd.get("a"));
        assert_eq!(2, fd.get("b"));
        assert_eq!(0, fd.get("z"));
        assert_eq!(6, fd.total());
        assert_eq!(3, fd.len());
        assert_eq!(Some(&"a".to_string()), fd.max());
    }

    #[test]
    fn test_freq_dist_tie_first_seen() {
        let mut fd = FreqDist::<String>::new();
        for w in ["Det", "Noun", "Verb", "Punc"] {
            fd.add(w);
        }
        assert_eq!("Det", fd.max().unwrap());
        let common: Vec<_> = fd.most_common(2).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(vec!["Det", "Noun"], common);
    }

    #[test]
    fn test_freq_dist_most_common_order() {
        let mut fd = FreqDist::<String>::new();
        for w in ["x", "y", "y", "z", "z", "z"] {
            fd.add(w);
        }
        let common: Vec<_> = fd
            .most_common(10)
            .into_iter()
            .map(|(k, c)| (k.as_str(), c))
            .collect();
        assert_eq!(vec![("z", 3), ("y", 2), ("x", 1)], common);
    }

    #[test]
    fn test_freq_dist_empty() {
        let fd = FreqDist::<String>::new();
        assert!(fd.is_empty());
        assert_eq!(None, fd.max());
    }

    #[test]
    fn test_conditional_freq_dist() {
        let mut cfd = ConditionalFreqDist::<String, String>::new();
        assert!(cfd.is_empty());
        cfd.add("run".to_string(), "Verb");
        cfd.add("run".to_string(), "Noun");
        cfd.add("run".to_string(), "Verb");
        cfd.add("dog".to_string(), "Noun");
        assert_eq!(2, cfd.len());
        assert_eq!("Verb", cfd.get("run").unwrap().max().unwrap());
        assert!(cfd.get("cat").is_none());
    }
}
