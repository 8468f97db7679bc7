//! `VMap`: parallel key/value sequences rather than a hashed index, so map
//! keys may be any `ValueCell` (bools and numbers included) under the same
//! numeric-coercion rule the rest of the crate uses.

use crate::cell::{cells_equal, CellType, FromCell, ValueCell};
use crate::shared::Handle;
use crate::vlist::{IntoCell, VList};

const INITIAL_CAPACITY: usize = 8;

struct MapData {
    keys: Vec<ValueCell>,
    values: Vec<ValueCell>,
}

#[derive(Clone)]
pub struct VMap {
    data: Handle<MapData>,
}

impl VMap {
    pub fn new() -> Self {
        VMap {
            data: Handle::new(MapData {
                keys: Vec::with_capacity(INITIAL_CAPACITY),
                values: Vec::with_capacity(INITIAL_CAPACITY),
            }),
        }
    }

    pub fn duplicate(&self) -> VMap {
        self.data.read(|d| {
            VMap {
                data: Handle::new(MapData {
                    keys: d.keys.iter().map(|c| c.duplicate()).collect(),
                    values: d.values.iter().map(|c| c.duplicate()).collect(),
                }),
            }
        })
    }

    pub fn length(&self) -> usize {
        self.data.read(|d| d.keys.len())
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Overwrites the value of an existing key (found via numeric-coerced
    /// equality) or appends a new key/value pair. Returns the receiver.
    pub fn set<K: IntoCell, V: IntoCell>(&self, key: K, value: V) -> VMap {
        let key = key.into_cell();
        let value = value.into_cell();
        self.data.write(|d| match d.keys.iter().position(|k| cells_equal(k, &key)) {
            Some(idx) => d.values[idx] = value,
            None => {
                d.keys.push(key);
                d.values.push(value);
            }
        });
        self.clone()
    }

    pub fn get<K: IntoCell, V: FromCell>(&self, key: K) -> V {
        let key = key.into_cell();
        self.data.read(|d| {
            match d.keys.iter().position(|k| cells_equal(k, &key)) {
                Some(idx) => V::from_cell(&d.values[idx]),
                None => V::from_cell(&ValueCell::Invalid),
            }
        })
    }

    pub fn has_key<K: IntoCell>(&self, key: K) -> bool {
        let key = key.into_cell();
        self.data.read(|d| d.keys.iter().any(|k| cells_equal(k, &key)))
    }

    /// The type tag of the value stored at `key`, or `Invalid` if `key` is absent.
    pub fn type_at<K: IntoCell>(&self, key: K) -> CellType {
        let key = key.into_cell();
        self.data.read(|d| match d.keys.iter().position(|k| cells_equal(k, &key)) {
            Some(idx) => d.values[idx].type_of(),
            None => CellType::Invalid,
        })
    }

    /// Reverse lookup: the first key whose value equals `value` under
    /// numeric-coerced equality, or `K`'s zero value if none matches.
    pub fn find_value<K: FromCell, V: IntoCell>(&self, value: V) -> K {
        let value = value.into_cell();
        self.data.read(|d| match d.values.iter().position(|v| cells_equal(v, &value)) {
            Some(idx) => K::from_cell(&d.keys[idx]),
            None => K::from_cell(&ValueCell::Invalid),
        })
    }

    pub fn remove<K: IntoCell>(&self, key: K) -> VMap {
        let key = key.into_cell();
        self.data.write(|d| {
            if let Some(idx) = d.keys.iter().position(|k| cells_equal(k, &key)) {
                d.keys.remove(idx);
                d.values.remove(idx);
            }
        });
        self.clone()
    }

    pub fn clear(&self) -> VMap {
        self.data.write(|d| {
            d.keys.clear();
            d.values.clear();
        });
        self.clone()
    }

    pub fn keys(&self) -> VList {
        self.data.read(|d| VList::from_cells(d.keys.iter().map(|c| c.duplicate()).collect()))
    }

    pub fn values(&self) -> VList {
        self.data.read(|d| VList::from_cells(d.values.iter().map(|c| c.duplicate()).collect()))
    }

    /// Upserts every key/value pair of `other` into the receiver; `other`'s
    /// value wins on a key collision. Returns the receiver.
    pub fn merge(&self, other: &VMap) -> VMap {
        let (other_keys, other_values) = other.data.read(|d| {
            (
                d.keys.iter().map(|c| c.duplicate()).collect::<Vec<_>>(),
                d.values.iter().map(|c| c.duplicate()).collect::<Vec<_>>(),
            )
        });
        self.data.write(|d| {
            for (key, value) in other_keys.into_iter().zip(other_values.into_iter()) {
                match d.keys.iter().position(|k| cells_equal(k, &key)) {
                    Some(idx) => d.values[idx] = value,
                    None => {
                        d.keys.push(key);
                        d.values.push(value);
                    }
                }
            }
        });
        self.clone()
    }

    /// Position-wise: same length, keys equal pairwise in insertion order,
    /// and values equal pairwise in insertion order.
    pub fn equals(&self, other: &VMap) -> bool {
        self.data.read(|a| {
            other.data.read(|b| {
                a.keys.len() == b.keys.len()
                    && a.keys.iter().zip(b.keys.iter()).all(|(x, y)| cells_equal(x, y))
                    && a.values.iter().zip(b.values.iter()).all(|(x, y)| cells_equal(x, y))
            })
        })
    }

    pub fn to_json(&self) -> String {
        crate::json::encode_map(self)
    }

    pub fn from_json(text: &str) -> VMap {
        crate::json::parse_map(text)
    }

    pub(crate) fn snapshot_pairs(&self) -> Vec<(ValueCell, ValueCell)> {
        self.data.read(|d| {
            d.keys
                .iter()
                .zip(d.values.iter())
                .map(|(k, v)| (k.duplicate(), v.duplicate()))
                .collect()
        })
    }
}

impl Default for VMap {
    fn default() -> Self {
        VMap::new()
    }
}

impl std::fmt::Debug for VMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VMap({})", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vstring::VString;

    #[test]
    fn set_upserts_existing_key() {
        let m = VMap::new();
        m.set("a", 1);
        m.set("a", 2);
        assert_eq!(m.length(), 1);
        assert_eq!(m.get::<_, i32>("a"), 2);
    }

    #[test]
    fn numeric_keys_coerce() {
        let m = VMap::new();
        m.set(1, "one");
        assert!(m.has_key(true)); // true coerces to 1
        assert!(m.has_key(1.0f32));
    }

    #[test]
    fn missing_key_returns_zero_value() {
        let m = VMap::new();
        assert_eq!(m.get::<_, i32>("missing"), 0);
    }

    #[test]
    fn merge_overwrites_on_collision() {
        let a = VMap::new();
        a.set("x", 1);
        a.set("y", 2);
        let b = VMap::new();
        b.set("x", 99);
        b.set("z", 3);
        a.merge(&b);
        assert_eq!(a.length(), 3);
        assert_eq!(a.get::<_, i32>("x"), 99);
        assert_eq!(a.get::<_, i32>("z"), 3);
    }

    #[test]
    fn remove_drops_key_and_value_together() {
        let m = VMap::new();
        m.set("a", 1);
        m.set("b", 2);
        m.remove("a");
        assert_eq!(m.length(), 1);
        assert!(!m.has_key("a"));
        assert!(m.has_key("b"));
    }

    #[test]
    fn type_at_reports_value_type_or_invalid() {
        let m = VMap::new();
        m.set("a", 1);
        assert_eq!(m.type_at("a"), crate::cell::CellType::Int);
        assert_eq!(m.type_at("missing"), crate::cell::CellType::Invalid);
    }

    #[test]
    fn find_value_reverse_looks_up_key() {
        let m = VMap::new();
        m.set("a", 1);
        m.set("b", 2);
        assert_eq!(m.find_value::<VString, _>(2).as_str(), "b".to_string());
        // zero-value when no key maps to the given value
        assert_eq!(m.find_value::<VString, _>(99).as_str(), "".to_string());
    }

    #[test]
    fn equality_is_position_wise() {
        let a = VMap::new();
        a.set("a", 1);
        a.set("b", 2);
        let b = VMap::new();
        b.set("b", 2);
        b.set("a", 1);
        // same pairs, different insertion order -> not equal
        assert!(!a.equals(&b));
        let c = a.duplicate();
        assert!(a.equals(&c));
    }
}
