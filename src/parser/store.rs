//! Storage of the probabilities read for each chain.

/// The value of a slot that has not been assigned a probability.
pub const UNSET: f64 = -1.0;

/// A flat, growable store of probabilities indexed by chain slot.
///
/// Slots start out [unset](UNSET). The store only ever grows, and growing it
/// preserves every slot that was already written.
#[derive(Clone, Debug, PartialEq)]
pub struct Store(Vec<f64>);

impl Store {
    /// Creates a store of `len` unset slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::parser::Store;
    ///
    /// let store = Store::new(4);
    /// assert_eq!(store.len(), 4);
    /// assert_eq!(store.get(0), None);
    /// ```
    pub fn new(len: usize) -> Self {
        Self(vec![UNSET; len])
    }

    /// Gets the number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the probability in a slot, if one was set.
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.0.get(slot).copied().filter(|value| *value != UNSET)
    }

    /// Returns whether a slot was set.
    pub fn is_set(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Sets the probability of a slot.
    ///
    /// Slots beyond the end of the store are ignored.
    pub fn set(&mut self, slot: usize, value: f64) {
        if let Some(entry) = self.0.get_mut(slot) {
            *entry = value;
        }
    }

    /// Appends `additional` unset slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::parser::Store;
    ///
    /// let mut store = Store::new(2);
    /// store.set(1, 0.5);
    /// store.grow(4);
    ///
    /// assert_eq!(store.len(), 6);
    /// assert_eq!(store.get(1), Some(0.5));
    /// assert_eq!(store.get(5), None);
    /// ```
    pub fn grow(&mut self, additional: usize) {
        self.0.resize(self.0.len() + additional, UNSET);
    }

    /// Gets the unset slots from `start` to the end of the store.
    pub fn missing(&self, start: usize) -> Vec<usize> {
        (start..self.len()).filter(|slot| !self.is_set(*slot)).collect()
    }

    /// Sums the set slots from `start` to the end of the store.
    pub fn sum(&self, start: usize) -> f64 {
        (start..self.len()).filter_map(|slot| self.get(slot)).sum()
    }

    /// Builds a new store from the given slots of this one.
    pub fn select(&self, slots: impl IntoIterator<Item = usize>) -> Store {
        Store(
            slots
                .into_iter()
                .map(|slot| self.0.get(slot).copied().unwrap_or(UNSET))
                .collect(),
        )
    }

    /// Gets the raw slot values, with [`UNSET`] marking unassigned slots.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_sum() {
        let mut store = Store::new(6);
        store.set(0, 0.5);
        store.set(2, 0.25);
        store.set(4, 0.125);

        assert_eq!(store.missing(0), vec![1, 3, 5]);
        assert_eq!(store.missing(4), vec![5]);
        assert_eq!(store.sum(0), 0.875);
        assert_eq!(store.sum(3), 0.125);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut store = Store::new(1);
        store.set(7, 0.5);
        assert_eq!(store.len(), 1);
        assert!(!store.is_set(7));
    }

    #[test]
    fn test_zero_is_set() {
        let mut store = Store::new(1);
        store.set(0, 0.0);
        assert_eq!(store.get(0), Some(0.0));
    }

    #[test]
    fn test_select() {
        let mut store = Store::new(4);
        store.set(1, 0.1);
        store.set(3, 0.3);

        let selected = store.select([3, 0, 1, 9]);
        assert_eq!(selected.as_slice(), &[0.3, UNSET, 0.1, UNSET]);
    }
}
