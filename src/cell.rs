//! `ValueCell`: the tagged union stored in every `VList` slot, every `VMap` key
//! and value, and every `VSet` element.
//!
//! Numeric coercion, structural equality, and sort ordering are all defined once
//! here and reused by every container that needs them (find, contains, sort, map
//! keys), per the single coercion rule the rest of the crate relies on.

use crate::vlist::VList;
use crate::vmap::VMap;
use crate::vset::VSet;
use crate::vstring::VString;
use std::cmp::Ordering;

/// The tag of a `ValueCell`, observable via `typeOf`-style queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Set,
    Invalid,
}

/// A tagged value: the atomic unit of storage in a `VList`.
#[derive(Debug, Clone)]
pub enum ValueCell {
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(VString),
    List(VList),
    Map(VMap),
    Set(VSet),
    /// Sentinel returned from out-of-bounds typed queries (never stored).
    Invalid,
}

impl ValueCell {
    pub fn type_of(&self) -> CellType {
        match self {
            ValueCell::Null => CellType::Null,
            ValueCell::Bool(_) => CellType::Bool,
            ValueCell::Int(_) => CellType::Int,
            ValueCell::Float(_) => CellType::Float,
            ValueCell::String(_) => CellType::String,
            ValueCell::List(_) => CellType::List,
            ValueCell::Map(_) => CellType::Map,
            ValueCell::Set(_) => CellType::Set,
            ValueCell::Invalid => CellType::Invalid,
        }
    }

    /// Deep-copy boundary: clone a cell the way insertion into / retrieval from a
    /// container must, so nested containers never alias their parent.
    pub(crate) fn duplicate(&self) -> ValueCell {
        match self {
            ValueCell::Null => ValueCell::Null,
            ValueCell::Bool(b) => ValueCell::Bool(*b),
            ValueCell::Int(i) => ValueCell::Int(*i),
            ValueCell::Float(v) => ValueCell::Float(*v),
            ValueCell::String(s) => ValueCell::String(s.duplicate()),
            ValueCell::List(l) => ValueCell::List(l.duplicate()),
            ValueCell::Map(m) => ValueCell::Map(m.duplicate()),
            ValueCell::Set(s) => ValueCell::Set(s.duplicate()),
            ValueCell::Invalid => ValueCell::Invalid,
        }
    }

    /// Double-precision coercion key for Bool/Int/Float; `None` for every other tag.
    pub(crate) fn numeric_key(&self) -> Option<f64> {
        match self {
            ValueCell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ValueCell::Int(i) => Some(*i as f64),
            ValueCell::Float(f) => Some(*f as f64),
            _ => None,
        }
    }

    /// The "natural" stringification rule shared by CSV, the formatter, and
    /// non-string JSON map keys: Null -> "null", Bool -> "true"/"false", Int ->
    /// decimal, Float -> trimmed six-fractional-digit decimal, String -> its
    /// content, containers -> their canonical JSON text.
    pub fn stringify(&self) -> String {
        match self {
            ValueCell::Null => "null".to_string(),
            ValueCell::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            ValueCell::Int(i) => i.to_string(),
            ValueCell::Float(f) => format_float(*f),
            ValueCell::String(s) => s.as_str(),
            ValueCell::List(l) => crate::json::encode_list(l),
            ValueCell::Map(m) => crate::json::encode_map(m),
            ValueCell::Set(s) => crate::json::encode_set(s),
            ValueCell::Invalid => String::new(),
        }
    }
}

/// Float-to-decimal with six fractional digits, trailing zeros stripped but at
/// least one digit kept (so `3.0`, never `3`).
pub(crate) fn format_float(value: f32) -> String {
    let mut s = format!("{:.6}", value);
    if let Some(dot) = s.find('.') {
        let mut last_nonzero = s.len() - 1;
        while last_nonzero > dot + 1 && s.as_bytes()[last_nonzero] == b'0' {
            last_nonzero -= 1;
        }
        s.truncate(last_nonzero + 1);
    }
    s
}

/// Numeric-coerced equality with same-tag-required fallback for non-numeric
/// kinds. Containers delegate to their own `.equals()` (Map is position-wise,
/// Set is order-independent over primitives).
pub(crate) fn cells_equal(a: &ValueCell, b: &ValueCell) -> bool {
    if let (Some(x), Some(y)) = (a.numeric_key(), b.numeric_key()) {
        return x == y;
    }
    match (a, b) {
        (ValueCell::Null, ValueCell::Null) => true,
        (ValueCell::String(x), ValueCell::String(y)) => x.equals(y),
        (ValueCell::List(x), ValueCell::List(y)) => x.equals(y),
        (ValueCell::Map(x), ValueCell::Map(y)) => x.equals(y),
        (ValueCell::Set(x), ValueCell::Set(y)) => x.equals(y),
        _ => false,
    }
}

/// Sort ordering: numeric-vs-numeric ascending; String-vs-String byte-wise;
/// numeric-vs-lenient-numeric-string numeric; otherwise by tag ordinal.
pub(crate) fn cells_compare(a: &ValueCell, b: &ValueCell) -> Ordering {
    if let (Some(x), Some(y)) = (a.numeric_key(), b.numeric_key()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (ValueCell::String(x), ValueCell::String(y)) = (a, b) {
        return x.compare(y);
    }
    // mixed numeric / string-that-parses-as-number -> numeric comparison
    let a_numeric = a.numeric_key().or_else(|| string_as_number(a));
    let b_numeric = b.numeric_key().or_else(|| string_as_number(b));
    if let (Some(x), Some(y)) = (a_numeric, b_numeric) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    tag_ordinal(a).cmp(&tag_ordinal(b))
}

fn string_as_number(cell: &ValueCell) -> Option<f64> {
    match cell {
        ValueCell::String(s) if s.is_number() => s.as_str().trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn tag_ordinal(cell: &ValueCell) -> u8 {
    match cell {
        ValueCell::Null => 0,
        ValueCell::Bool(_) => 1,
        ValueCell::Int(_) => 2,
        ValueCell::Float(_) => 3,
        ValueCell::String(_) => 4,
        ValueCell::List(_) => 5,
        ValueCell::Map(_) => 6,
        ValueCell::Set(_) => 7,
        ValueCell::Invalid => 8,
    }
}

/// Turns a `ValueCell` into `T`, returning `T`'s zero value on a tag mismatch.
/// The Rust rendering of the teacher's template-specialized typed getters.
pub trait FromCell: Sized {
    fn from_cell(cell: &ValueCell) -> Self;
}

impl FromCell for bool {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::Bool(b) => *b,
            ValueCell::Int(i) => *i != 0,
            ValueCell::Float(f) => *f != 0.0,
            _ => false,
        }
    }
}

impl FromCell for i32 {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::Int(i) => *i,
            ValueCell::Float(f) => *f as i32,
            ValueCell::Bool(b) => {
                if *b {
                    1
                } else {
                    0
                }
            }
            _ => 0,
        }
    }
}

impl FromCell for f32 {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::Float(f) => *f,
            ValueCell::Int(i) => *i as f32,
            ValueCell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

impl FromCell for VString {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::String(s) => s.duplicate(),
            _ => VString::new(),
        }
    }
}

impl FromCell for VList {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::List(l) => l.duplicate(),
            _ => VList::new(),
        }
    }
}

impl FromCell for VMap {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::Map(m) => m.duplicate(),
            _ => VMap::new(),
        }
    }
}

impl FromCell for VSet {
    fn from_cell(cell: &ValueCell) -> Self {
        match cell {
            ValueCell::Set(s) => s.duplicate(),
            _ => VSet::new(),
        }
    }
}

impl FromCell for ValueCell {
    fn from_cell(cell: &ValueCell) -> Self {
        cell.duplicate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting_strips_zeros_but_keeps_one_digit() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(3.5), "3.5");
        assert_eq!(format_float(-2.25), "-2.25");
    }

    #[test]
    fn numeric_coercion_treats_bool_int_float_as_equal() {
        assert!(cells_equal(&ValueCell::Bool(true), &ValueCell::Int(1)));
        assert!(cells_equal(&ValueCell::Int(5), &ValueCell::Float(5.0)));
        assert!(!cells_equal(&ValueCell::Int(5), &ValueCell::String(VString::from("5"))));
    }

    #[test]
    fn sort_order_mixed_numeric_and_parseable_string() {
        use std::cmp::Ordering;
        let a = ValueCell::Int(2);
        let b = ValueCell::String(VString::from("10"));
        assert_eq!(cells_compare(&a, &b), Ordering::Less);
    }
}
