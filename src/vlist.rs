//! `VList`: an ordered, heterogeneous sequence of `ValueCell`s.

use crate::cell::{cells_compare, cells_equal, CellType, FromCell, ValueCell};
use crate::shared::Handle;
use crate::vmap::VMap;
use crate::vset::VSet;
use crate::vstring::VString;
use std::cmp::Ordering;

const INITIAL_CAPACITY: usize = 8;

/// Anything that can become a `ValueCell` when appended, prepended, inserted,
/// or set into a `VList`. The Rust rendering of the teacher's per-type
/// overloaded appenders.
pub trait IntoCell {
    fn into_cell(self) -> ValueCell;
}

impl IntoCell for ValueCell {
    fn into_cell(self) -> ValueCell {
        self
    }
}
impl IntoCell for bool {
    fn into_cell(self) -> ValueCell {
        ValueCell::Bool(self)
    }
}
impl IntoCell for i32 {
    fn into_cell(self) -> ValueCell {
        ValueCell::Int(self)
    }
}
impl IntoCell for f32 {
    fn into_cell(self) -> ValueCell {
        ValueCell::Float(self)
    }
}
impl IntoCell for &str {
    fn into_cell(self) -> ValueCell {
        ValueCell::String(VString::from(self))
    }
}
impl IntoCell for VString {
    fn into_cell(self) -> ValueCell {
        ValueCell::String(self)
    }
}
impl IntoCell for VList {
    fn into_cell(self) -> ValueCell {
        ValueCell::List(self.duplicate())
    }
}
impl IntoCell for VMap {
    fn into_cell(self) -> ValueCell {
        ValueCell::Map(self.duplicate())
    }
}
impl IntoCell for VSet {
    fn into_cell(self) -> ValueCell {
        ValueCell::Set(self.duplicate())
    }
}

/// Anything `VList::concat` can drain into itself (a `VList` or a `VSet`).
pub trait Concatenable {
    fn items_snapshot(&self) -> Vec<ValueCell>;
}

impl Concatenable for VList {
    fn items_snapshot(&self) -> Vec<ValueCell> {
        self.snapshot_cells()
    }
}
impl Concatenable for VSet {
    fn items_snapshot(&self) -> Vec<ValueCell> {
        self.snapshot_values()
    }
}

#[derive(Clone)]
pub struct VList {
    items: Handle<Vec<ValueCell>>,
}

impl VList {
    pub fn new() -> Self {
        VList {
            items: Handle::new(Vec::with_capacity(INITIAL_CAPACITY)),
        }
    }

    pub fn from_cells(cells: Vec<ValueCell>) -> Self {
        VList {
            items: Handle::new(cells),
        }
    }

    pub(crate) fn snapshot_cells(&self) -> Vec<ValueCell> {
        self.items.read(|items| items.iter().map(|c| c.duplicate()).collect())
    }

    pub fn duplicate(&self) -> VList {
        VList::from_cells(self.snapshot_cells())
    }

    pub fn length(&self) -> usize {
        self.items.read(|items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Appends `value`; returns a clone of the receiver for chaining.
    pub fn append<T: IntoCell>(&self, value: T) -> VList {
        self.items.write(|items| items.push(value.into_cell()));
        self.clone()
    }

    /// Inserts at character index 0; returns a clone of the receiver for chaining.
    pub fn prepend<T: IntoCell>(&self, value: T) -> VList {
        self.items.write(|items| items.insert(0, value.into_cell()));
        self.clone()
    }

    /// `index < 0` prepends; `index >= length` appends; otherwise inserts in place.
    pub fn insert<T: IntoCell>(&self, index: isize, value: T) -> VList {
        self.items.write(|items| {
            let idx = if index < 0 {
                0
            } else {
                (index as usize).min(items.len())
            };
            items.insert(idx, value.into_cell());
        });
        self.clone()
    }

    /// On an empty list, appends. Otherwise clamps `index` to `[0, len-1]` and replaces.
    pub fn set<T: IntoCell>(&self, index: isize, value: T) -> VList {
        self.items.write(|items| {
            if items.is_empty() {
                items.push(value.into_cell());
                return;
            }
            let idx = clamp_index(index, items.len());
            items[idx] = value.into_cell();
        });
        self.clone()
    }

    /// Clamps `index` to `[0, len-1]` and shifts left; a no-op on an empty list.
    pub fn remove(&self, index: isize) -> VList {
        self.items.write(|items| {
            if items.is_empty() {
                return;
            }
            let idx = clamp_index(index, items.len());
            items.remove(idx);
        });
        self.clone()
    }

    /// Returns the last element coerced to `T` (the zero value if empty or
    /// wrong-typed) and shrinks the list.
    pub fn pop<T: FromCell>(&self) -> T {
        self.items.write(|items| match items.pop() {
            Some(cell) => T::from_cell(&cell),
            None => T::from_cell(&ValueCell::Invalid),
        })
    }

    /// Clamps `i` and coerces the element to `T` via numeric-coercion rules
    /// (the zero value of `T` on an empty list or a tag mismatch).
    pub fn at<T: FromCell>(&self, i: isize) -> T {
        self.items.read(|items| {
            if items.is_empty() {
                return T::from_cell(&ValueCell::Invalid);
            }
            let idx = clamp_index(i, items.len());
            T::from_cell(&items[idx])
        })
    }

    /// `Invalid` for any index outside `[0, length)` — unlike `at`, this never clamps.
    pub fn type_at(&self, i: isize) -> CellType {
        self.items.read(|items| {
            if i < 0 || i as usize >= items.len() {
                CellType::Invalid
            } else {
                items[i as usize].type_of()
            }
        })
    }

    /// First index whose stored cell equals `value` under numeric-coerced
    /// `ValueCell` equality, or -1.
    pub fn find<T: IntoCell>(&self, value: T) -> isize {
        let needle = value.into_cell();
        self.items.read(|items| {
            items
                .iter()
                .position(|c| cells_equal(c, &needle))
                .map(|i| i as isize)
                .unwrap_or(-1)
        })
    }

    pub fn contains<T: IntoCell>(&self, value: T) -> bool {
        self.find(value) >= 0
    }

    pub fn reverse(&self) -> VList {
        self.items.write(|items| items.reverse());
        self.clone()
    }

    /// Appends every element of `other` (deep-copying container elements). A
    /// `VSet` contributes its values in its own iteration order.
    pub fn concat<C: Concatenable>(&self, other: &C) -> VList {
        let incoming = other.items_snapshot();
        self.items.write(|items| items.extend(incoming));
        self.clone()
    }

    /// Deep-copied sub-list over `[start, end)`. Negative `start` clamps to 0;
    /// `end` beyond length clamps; `start >= end` returns an empty list.
    pub fn slice(&self, start: isize, end: isize) -> VList {
        self.items.read(|items| {
            let len = items.len() as isize;
            let start = start.max(0).min(len);
            let end = end.min(len);
            if start >= end {
                return VList::new();
            }
            let slice = items[start as usize..end as usize]
                .iter()
                .map(|c| c.duplicate())
                .collect();
            VList::from_cells(slice)
        })
    }

    /// Ascending by default. Both numeric -> numeric; both String -> byte-wise;
    /// mixed numeric/parseable-string -> numeric; otherwise by tag ordinal.
    pub fn sort(&self, ascending: bool) -> VList {
        self.items.write(|items| {
            items.sort_by(|a, b| {
                let ord = cells_compare(a, b);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        });
        self.clone()
    }

    pub fn equals(&self, other: &VList) -> bool {
        self.items.read(|a| {
            other.items.read(|b| {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| cells_equal(x, y))
            })
        })
    }

    pub fn to_csv(&self) -> String {
        crate::csv::encode(self)
    }

    pub fn from_csv(text: &str) -> VList {
        crate::csv::decode(text)
    }

    pub fn to_json(&self) -> String {
        crate::json::encode_list(self)
    }

    pub fn from_json(text: &str) -> VList {
        crate::json::parse_list(text)
    }
}

impl Default for VList {
    fn default() -> Self {
        VList::new()
    }
}

impl std::fmt::Debug for VList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VList({})", self.to_json())
    }
}

fn clamp_index(index: isize, len: usize) -> usize {
    if index < 0 {
        0
    } else if index as usize >= len {
        len - 1
    } else {
        index as usize
    }
}

/// Ordering helper exposed for callers that want `Ordering` directly instead
/// of sorting a whole list (e.g. the formatter's numeric-vs-string fallback).
pub(crate) fn compare(a: &ValueCell, b: &ValueCell) -> Ordering {
    cells_compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_insert_prepends() {
        let l = VList::new();
        l.append(2);
        l.append(3);
        l.insert(-1, 1);
        assert_eq!(l.length(), 3);
        assert_eq!(l.at::<i32>(0), 1);
        assert_eq!(l.at::<i32>(1), 2);
        assert_eq!(l.at::<i32>(2), 3);
    }

    #[test]
    fn set_on_empty_list_appends() {
        let l = VList::new();
        l.set(5, 42);
        assert_eq!(l.length(), 1);
        assert_eq!(l.at::<i32>(0), 42);
    }

    #[test]
    fn at_clamps_and_returns_zero_on_type_mismatch() {
        let l = VList::new();
        l.append(1);
        l.append("two");
        assert_eq!(l.at::<i32>(-5), 1);
        assert_eq!(l.at::<i32>(99), 0); // clamps to last element, which is a string
        assert_eq!(l.type_at(99), CellType::Invalid);
    }

    #[test]
    fn duplicate_is_independent_of_source() {
        let l = VList::new();
        l.append(1);
        let dup = l.duplicate();
        dup.append(2);
        assert_eq!(l.length(), 1);
        assert_eq!(dup.length(), 2);
    }

    #[test]
    fn slice_bounds() {
        let l = VList::new();
        for i in 0..5 {
            l.append(i);
        }
        assert_eq!(l.slice(1, 3).length(), 2);
        assert_eq!(l.slice(-10, 100).length(), 5);
        assert_eq!(l.slice(4, 1).length(), 0);
    }

    #[test]
    fn sort_mixed_numeric_types_ascending() {
        let l = VList::new();
        l.append(3.5f32);
        l.append(1);
        l.append(2.2f32);
        l.append(4);
        l.sort(true);
        assert_eq!(l.at::<f32>(0), 1.0);
        assert_eq!(l.at::<f32>(1), 2.2);
        assert_eq!(l.at::<f32>(2), 3.5);
        assert_eq!(l.at::<f32>(3), 4.0);
    }

    #[test]
    fn sort_is_idempotent() {
        let l = VList::new();
        l.append(3);
        l.append(1);
        l.append(2);
        l.sort(true);
        let once = l.to_json();
        l.sort(true);
        assert_eq!(l.to_json(), once);
    }

    #[test]
    fn find_and_contains_use_numeric_coercion() {
        let l = VList::new();
        l.append(5);
        assert_eq!(l.find(5.0f32), 0);
        assert!(!l.contains(true)); // true coerces to 1.0, not present in [5]
        assert!(l.contains(5.0f32));
    }
}
