//! `VSet`: an insertion-ordered bag of unique `ValueCell`s, backed by the same
//! flat vector `VList` uses rather than a hashed index, so uniqueness is
//! checked with the crate's one numeric-coercion equality rule instead of a
//! separate hashing scheme.

use crate::cell::{cells_equal, ValueCell};
use crate::shared::Handle;
use crate::vlist::{IntoCell, VList};

const INITIAL_CAPACITY: usize = 8;

#[derive(Clone)]
pub struct VSet {
    values: Handle<Vec<ValueCell>>,
}

impl VSet {
    pub fn new() -> Self {
        VSet {
            values: Handle::new(Vec::with_capacity(INITIAL_CAPACITY)),
        }
    }

    pub fn from_list(list: &VList) -> VSet {
        let set = VSet::new();
        for cell in list.snapshot_cells() {
            set.put_cell(cell);
        }
        set
    }

    pub(crate) fn snapshot_values(&self) -> Vec<ValueCell> {
        self.values.read(|v| v.iter().map(|c| c.duplicate()).collect())
    }

    pub fn duplicate(&self) -> VSet {
        VSet {
            values: Handle::new(self.snapshot_values()),
        }
    }

    pub fn length(&self) -> usize {
        self.values.read(|v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Nested containers have no equality defined here, so they're appended
    /// as an unconditional "bag"; only comparable primitives/Strings dedup.
    fn is_comparable(cell: &ValueCell) -> bool {
        !matches!(cell, ValueCell::List(_) | ValueCell::Map(_) | ValueCell::Set(_))
    }

    fn put_cell(&self, cell: ValueCell) {
        self.values.write(|v| {
            if !Self::is_comparable(&cell) || !v.iter().any(|existing| cells_equal(existing, &cell)) {
                v.push(cell);
            }
        });
    }

    /// Inserts `value`. Comparable primitives/Strings are deduped via
    /// numeric-coerced equality; nested containers are always appended.
    pub fn put<T: IntoCell>(&self, value: T) -> VSet {
        self.put_cell(value.into_cell());
        self.clone()
    }

    pub fn contains<T: IntoCell>(&self, value: T) -> bool {
        let needle = value.into_cell();
        self.values.read(|v| v.iter().any(|c| cells_equal(c, &needle)))
    }

    pub fn remove<T: IntoCell>(&self, value: T) -> VSet {
        let needle = value.into_cell();
        self.values.write(|v| {
            if let Some(idx) = v.iter().position(|c| cells_equal(c, &needle)) {
                v.remove(idx);
            }
        });
        self.clone()
    }

    pub fn clear(&self) -> VSet {
        self.values.write(|v| v.clear());
        self.clone()
    }

    pub fn to_list(&self) -> VList {
        VList::from_cells(self.snapshot_values())
    }

    /// Adds every element of `other`. Returns the receiver.
    pub fn union(&self, other: &VSet) -> VSet {
        for cell in other.snapshot_values() {
            self.put_cell(cell);
        }
        self.clone()
    }

    /// Keeps only the comparable primitives also present in `other`;
    /// nested-container elements are discarded (container equality is
    /// undefined here). Returns the receiver.
    pub fn intersect(&self, other: &VSet) -> VSet {
        let current = self.snapshot_values();
        self.clear();
        for cell in current {
            if Self::is_comparable(&cell) && other.contains_cell(&cell) {
                self.put_cell(cell);
            }
        }
        self.clone()
    }

    /// Removes every comparable primitive also present in `other`;
    /// nested-container elements of `self` are never removed this way.
    /// Returns the receiver.
    pub fn subtract(&self, other: &VSet) -> VSet {
        for cell in other.snapshot_values().into_iter().filter(Self::is_comparable) {
            self.values.write(|v| {
                if let Some(idx) = v.iter().position(|c| cells_equal(c, &cell)) {
                    v.remove(idx);
                }
            });
        }
        self.clone()
    }

    fn contains_cell(&self, needle: &ValueCell) -> bool {
        self.values.read(|v| v.iter().any(|c| cells_equal(c, needle)))
    }

    /// Order-independent: same length, and every comparable-primitive
    /// element of one set has an equal counterpart in the other.
    pub fn equals(&self, other: &VSet) -> bool {
        let a = self.snapshot_values();
        let b = other.snapshot_values();
        a.len() == b.len()
            && a.iter()
                .filter(|x| Self::is_comparable(x))
                .all(|x| b.iter().any(|y| cells_equal(x, y)))
    }

    pub fn to_json(&self) -> String {
        crate::json::encode_set(self)
    }

    pub fn from_json(text: &str) -> VSet {
        crate::json::parse_set(text)
    }
}

impl Default for VSet {
    fn default() -> Self {
        VSet::new()
    }
}

impl std::fmt::Debug for VSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VSet({})", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_deduplicates_via_numeric_coercion() {
        let s = VSet::new();
        s.put(1);
        s.put(true); // coerces to 1.0, already present
        s.put(2);
        assert_eq!(s.length(), 2);
    }

    #[test]
    fn union_intersect_subtract() {
        let a = VSet::new();
        a.put(1);
        a.put(2);
        a.put(3);
        let b = VSet::new();
        b.put(2);
        b.put(3);
        b.put(4);

        let u = a.duplicate().union(&b);
        assert_eq!(u.length(), 4);

        let i = a.duplicate().intersect(&b);
        assert_eq!(i.length(), 2);
        assert!(i.contains(2));
        assert!(i.contains(3));

        let d = a.duplicate().subtract(&b);
        assert_eq!(d.length(), 1);
        assert!(d.contains(1));
    }

    #[test]
    fn nested_containers_are_appended_without_dedup() {
        let s = VSet::new();
        s.put(VList::new().append(1));
        s.put(VList::new().append(1));
        // container equality is undefined here: both inserts land unconditionally
        assert_eq!(s.length(), 2);
    }

    #[test]
    fn intersect_discards_nested_containers() {
        let a = VSet::new();
        a.put(1);
        a.put(VList::new().append(1));
        let b = VSet::new();
        b.put(1);
        b.put(VList::new().append(1));
        let i = a.duplicate().intersect(&b);
        // only the comparable primitive survives; both container elements drop
        assert_eq!(i.length(), 1);
        assert!(i.contains(1));
    }

    #[test]
    fn equals_is_order_independent() {
        let a = VSet::new();
        a.put(1);
        a.put(2);
        let b = VSet::new();
        b.put(2);
        b.put(1);
        assert!(a.equals(&b));
    }
}
