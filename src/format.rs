//! `{token}` interpolation against a `VList` (digit-only tokens -> index) or a
//! `VMap` (non-digit tokens -> key). Any token whose shape is valid but whose
//! index/key can't be resolved is emitted back verbatim, braces included.

use crate::cell::{CellType, ValueCell};
use crate::vlist::VList;
use crate::vmap::VMap;

/// A thing `VString::format` can pull values out of.
pub trait FormatSource {
    /// Whether a token's body must be composed entirely of ASCII digits
    /// (`VList`) or may be any run of non-`}` characters (`VMap`).
    fn digits_only(&self) -> bool;
    /// Resolve one token body to its stringified replacement, or `None` if
    /// the index/key doesn't exist.
    fn resolve(&self, token: &str) -> Option<String>;
}

impl FormatSource for VList {
    fn digits_only(&self) -> bool {
        true
    }

    fn resolve(&self, token: &str) -> Option<String> {
        let index: usize = token.parse().ok()?;
        if index >= self.length() {
            return None;
        }
        Some(stringify_for_format(self.type_at(index as isize), || list_value_cell(self, index)))
    }
}

impl FormatSource for VMap {
    fn digits_only(&self) -> bool {
        false
    }

    fn resolve(&self, token: &str) -> Option<String> {
        if !self.has_key(token) {
            return None;
        }
        let cell_type = map_value_type(self, token);
        Some(stringify_for_format(cell_type, || self.get::<_, ValueCell>(token)))
    }
}

fn list_value_cell(list: &VList, index: usize) -> ValueCell {
    match list.type_at(index as isize) {
        CellType::Bool => ValueCell::Bool(list.at(index as isize)),
        CellType::Int => ValueCell::Int(list.at(index as isize)),
        CellType::Float => ValueCell::Float(list.at(index as isize)),
        CellType::String => ValueCell::String(list.at(index as isize)),
        CellType::List => ValueCell::List(list.at(index as isize)),
        CellType::Map => ValueCell::Map(list.at(index as isize)),
        _ => ValueCell::Null,
    }
}

fn map_value_type(map: &VMap, key: &str) -> CellType {
    map.snapshot_pairs()
        .into_iter()
        .find(|(k, _)| matches!(k, ValueCell::String(s) if s.as_str() == key))
        .map(|(_, v)| v.type_of())
        .unwrap_or(CellType::Invalid)
}

/// Mirrors the per-type switch the original formatter used: `Null` stringifies
/// to the literal text "null"; a `Set` (not handled by the original formatter)
/// stringifies to empty text; everything else uses the shared `stringify` rule.
fn stringify_for_format(cell_type: CellType, cell: impl FnOnce() -> ValueCell) -> String {
    match cell_type {
        CellType::Set | CellType::Invalid => String::new(),
        _ => cell().stringify(),
    }
}

pub fn interpolate<S: FormatSource>(text: &str, source: &S) -> String {
    let chars: Vec<char> = text.chars().collect();
    let digits_only = source.digits_only();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{' {
            let start = i + 1;
            let mut end = start;
            if digits_only {
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
            } else {
                while end < chars.len() && chars[end] != '}' {
                    end += 1;
                }
            }

            if end > start && end < chars.len() && chars[end] == '}' {
                let token: String = chars[start..end].iter().collect();
                match source.resolve(&token) {
                    Some(replacement) => out.push_str(&replacement),
                    None => {
                        out.push('{');
                        out.push_str(&token);
                        out.push('}');
                    }
                }
                i = end + 1;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vstring::VString;

    #[test]
    fn list_digit_tokens_resolve_by_index() {
        let list = VList::new();
        list.append("world");
        let result = interpolate("hello {0}!", &list);
        assert_eq!(result, "hello world!");
    }

    #[test]
    fn out_of_range_index_is_preserved_verbatim() {
        let list = VList::new();
        let result = interpolate("{5}", &list);
        assert_eq!(result, "{5}");
    }

    #[test]
    fn malformed_token_emits_single_brace() {
        let list = VList::new();
        let result = interpolate("{abc}", &list);
        assert_eq!(result, "{abc}");
    }

    #[test]
    fn map_key_tokens_resolve_by_name() {
        let map = VMap::new();
        map.set("name", "ferris");
        let result = interpolate("hi {name}", &map);
        assert_eq!(result, "hi ferris");
    }

    #[test]
    fn missing_map_key_is_preserved_verbatim() {
        let map = VMap::new();
        let result = interpolate("hi {missing}", &map);
        assert_eq!(result, "hi {missing}");
    }

    #[test]
    fn unterminated_brace_is_literal() {
        let map = VMap::new();
        let result = interpolate("{unterminated", &map);
        assert_eq!(result, "{unterminated");
        let _ = VString::new();
    }
}
