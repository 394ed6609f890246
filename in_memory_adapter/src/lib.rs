use std::{collections::HashMap, hash::Hash};

#[derive(Debug)]
pub struct InMemoryRepo<T, Id> {
    storage: HashMap<Id, T>,
}

impl<T, Id> Default for InMemoryRepo<T, Id> {
    fn default() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }
}

impl<T, Id> InMemoryRepo<T, Id>
where
    Id: Clone + Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item, returning the one previously stored under `id`
    pub fn insert(&mut self, id: Id, item: T) -> Option<T> {
        self.storage.insert(id, item)
    }

    pub fn get(&self, id: &Id) -> Option<&T> {
        self.storage.get(id)
    }

    pub fn remove(&mut self, id: &Id) -> Option<T> {
        self.storage.remove(id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.storage.contains_key(id)
    }

    /// Removes every item matching `evict` and hands them back
    pub fn drain_where<F>(&mut self, mut evict: F) -> Vec<(Id, T)>
    where
        F: FnMut(&Id, &T) -> bool,
    {
        let ids: Vec<Id> = self
            .storage
            .iter()
            .filter(|(id, item)| evict(id, item))
            .map(|(id, _)| id.clone())
            .collect();

        ids.into_iter()
            .filter_map(|id| self.storage.remove(&id).map(|item| (id, item)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut repo = InMemoryRepo::new();
        assert_eq!(repo.insert(1, "a"), None);
        assert_eq!(repo.insert(1, "b"), Some("a"));
        assert_eq!(repo.get(&1), Some(&"b"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn drain_where_evicts_only_matching_items() {
        let mut repo = InMemoryRepo::new();
        for i in 0..6 {
            repo.insert(i, i * 10);
        }

        let mut evicted = repo.drain_where(|_, value| *value >= 30);
        evicted.sort_unstable();

        assert_eq!(evicted, vec![(3, 30), (4, 40), (5, 50)]);
        assert_eq!(repo.len(), 3);
        assert!(repo.contains(&2));
        assert!(!repo.contains(&3));
    }

    #[test]
    fn remove_empties_the_repo() {
        let mut repo = InMemoryRepo::new();
        repo.insert("k", 1);
        assert_eq!(repo.remove(&"k"), Some(1));
        assert!(repo.is_empty());
        assert_eq!(repo.remove(&"k"), None);
    }
}
