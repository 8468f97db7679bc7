//! `VString`: an owned UTF-8 byte sequence with character-level indexing.
//!
//! Every mutation is functional — it returns a new `VString` and leaves the
//! receiver untouched. Like every other container in this crate, `VString` is a
//! cheap-to-clone handle around a heap-allocated control block guarded by a
//! reader/writer lock, so a `.trim()` call racing a concurrent reader of the
//! same handle never tears: the reader keeps reading the old bytes, the writer
//! of `.trim()` never actually writes to this handle at all — it allocates a
//! fresh one.

use crate::cell::format_float;
use crate::format::{self, FormatSource};
use crate::shared::Handle;
use crate::utf8;
use crate::vlist::VList;
use crate::vmap::VMap;
use crate::vset::VSet;
use std::cmp::Ordering;
use std::ops::Add;

/// An owned, character-indexed UTF-8 string handle.
#[derive(Clone)]
pub struct VString {
    bytes: Handle<Vec<u8>>,
}

impl VString {
    pub fn new() -> Self {
        VString {
            bytes: Handle::new(Vec::new()),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        VString {
            bytes: Handle::new(text.into_bytes()),
        }
    }

    /// From a C-style, NUL-terminated UTF-8 buffer: bytes up to the first `\0`.
    pub fn from_cstr(bytes: &[u8]) -> Self {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Self::from_bytes(&bytes[..end])
    }

    pub fn from_bool(value: bool) -> Self {
        VString::from(if value { "true" } else { "false" })
    }

    pub fn from_int(value: i32) -> Self {
        VString::from(value.to_string().as_str())
    }

    pub fn from_float(value: f32) -> Self {
        VString::from(format_float(value).as_str())
    }

    pub fn from_list(list: &VList) -> Self {
        VString::from(crate::json::encode_list(list).as_str())
    }

    pub fn from_map(map: &VMap) -> Self {
        VString::from(crate::json::encode_map(map).as_str())
    }

    pub fn from_set(set: &VSet) -> Self {
        VString::from(crate::json::encode_set(set).as_str())
    }

    pub(crate) fn duplicate(&self) -> VString {
        VString {
            bytes: Handle::new(self.bytes.snapshot()),
        }
    }

    // -- read operations --------------------------------------------------

    pub fn as_str(&self) -> String {
        self.bytes.read(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn length(&self) -> usize {
        self.bytes.read(|b| utf8::count_characters(b))
    }

    pub fn byte_length(&self) -> usize {
        self.bytes.read(|b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.byte_length() == 0
    }

    /// Single-character string at character index `i`; negative counts from
    /// the end; out of range returns an empty string.
    pub fn at(&self, i: isize) -> VString {
        self.bytes.read(|b| {
            let len = utf8::count_characters(b) as isize;
            let idx = if i < 0 { len + i } else { i };
            if idx < 0 || idx >= len {
                return VString::new();
            }
            let start = utf8::char_to_byte(b, idx as usize);
            if start < 0 {
                return VString::new();
            }
            let start = start as usize;
            let char_len = utf8::char_len_at_byte(b, start);
            VString::from_bytes(&b[start..(start + char_len).min(b.len())])
        })
    }

    /// Character-indexed half-open range. `end == -1` means "to the end of the
    /// string"; any other negative counts from the end.
    pub fn substring(&self, start: isize, end: isize) -> VString {
        self.bytes.read(|b| {
            let len = utf8::count_characters(b) as isize;
            let mut start = if start < 0 { len + start } else { start };
            start = start.clamp(0, len);

            let mut actual_end = if end == -1 {
                len
            } else if end < 0 {
                len + end
            } else {
                end
            };
            if actual_end < start {
                actual_end = start;
            }
            actual_end = actual_end.min(len);

            if actual_end <= start {
                return VString::new();
            }
            let byte_start = utf8::char_to_byte(b, start as usize).max(0) as usize;
            let byte_end = utf8::char_to_byte(b, actual_end as usize);
            let byte_end = if byte_end < 0 { b.len() } else { byte_end as usize };
            VString::from_bytes(&b[byte_start..byte_end])
        })
    }

    pub fn contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.as_str().contains(needle)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_str().starts_with(prefix)
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.as_str().ends_with(suffix)
    }

    /// Number of non-overlapping occurrences of `needle`.
    pub fn count(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        self.as_str().matches(needle).count()
    }

    /// Character position of the first occurrence of `needle`, or -1.
    pub fn get_position_of(&self, needle: &str) -> isize {
        if needle.is_empty() {
            return -1;
        }
        let text = self.as_str();
        match text.find(needle) {
            Some(byte_pos) => utf8::byte_to_char(text.as_bytes(), byte_pos) as isize,
            None => -1,
        }
    }

    /// Accepts an optional leading sign, at most one decimal point, and
    /// requires at least one digit.
    pub fn is_number(&self) -> bool {
        let text = self.as_str();
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let mut chars = text.chars().peekable();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut saw_digit = false;
        let mut saw_dot = false;
        for c in chars {
            if c.is_ascii_digit() {
                saw_digit = true;
            } else if c == '.' && !saw_dot {
                saw_dot = true;
            } else {
                return false;
            }
        }
        saw_digit
    }

    /// Case-insensitive "true"/"t"/"1"/"yes"/"on" -> true; everything else false.
    pub fn to_bool(&self) -> bool {
        matches!(
            self.as_str().trim().to_ascii_lowercase().as_str(),
            "true" | "t" | "1" | "yes" | "on"
        )
    }

    pub fn to_integer(&self) -> i32 {
        lenient_parse_int(&self.as_str())
    }

    pub fn to_float(&self) -> f32 {
        lenient_parse_float(&self.as_str())
    }

    pub fn equals(&self, other: &VString) -> bool {
        self.bytes.read(|a| other.bytes.read(|b| a == b))
    }

    /// Byte-wise comparison; a shorter string that is a prefix of a longer one
    /// compares less.
    pub fn compare(&self, other: &VString) -> Ordering {
        self.bytes.read(|a| other.bytes.read(|b| a.cmp(b)))
    }

    /// djb2 over the UTF-8 bytes; the empty string hashes to 0.
    pub fn hash(&self) -> u64 {
        self.bytes.read(|b| djb2(b))
    }

    // -- functional mutations ----------------------------------------------

    pub fn append(&self, other: &VString) -> VString {
        let mut combined = self.bytes.snapshot();
        other.bytes.read(|b| combined.extend_from_slice(b));
        VString {
            bytes: Handle::new(combined),
        }
    }

    pub fn prepend(&self, other: &VString) -> VString {
        other.append(self)
    }

    pub fn insert(&self, index: isize, other: &VString) -> VString {
        self.bytes.read(|b| {
            let len = utf8::count_characters(b) as isize;
            let idx = if index < 0 { index + len } else { index };
            let idx = idx.clamp(0, len) as usize;
            let byte_idx = utf8::char_to_byte(b, idx).max(0) as usize;
            let mut combined = Vec::with_capacity(b.len() + other.byte_length());
            combined.extend_from_slice(&b[..byte_idx]);
            other.bytes.read(|ob| combined.extend_from_slice(ob));
            combined.extend_from_slice(&b[byte_idx..]);
            VString {
                bytes: Handle::new(combined),
            }
        })
    }

    /// Removes the character range `[start, end)` and returns what remains.
    pub fn remove(&self, start: isize, end: isize) -> VString {
        self.bytes.read(|b| {
            let len = utf8::count_characters(b) as isize;
            let start = if start < 0 { start + len } else { start };
            let start = start.clamp(0, len);
            let end = if end < 0 { end + len } else { end };
            let end = end.clamp(start, len);
            let byte_start = utf8::char_to_byte(b, start as usize).max(0) as usize;
            let byte_end = utf8::char_to_byte(b, end as usize);
            let byte_end = if byte_end < 0 { b.len() } else { byte_end as usize };
            let mut out = Vec::with_capacity(b.len() - (byte_end - byte_start));
            out.extend_from_slice(&b[..byte_start]);
            out.extend_from_slice(&b[byte_end..]);
            VString {
                bytes: Handle::new(out),
            }
        })
    }

    /// Replaces all non-overlapping occurrences of `target`, scanning left to right.
    pub fn replace(&self, target: &VString, replacement: &VString) -> VString {
        if target.is_empty() {
            return self.duplicate();
        }
        let text = self.as_str();
        let target_str = target.as_str();
        let replacement_str = replacement.as_str();
        VString::from(text.replace(&target_str, &replacement_str).as_str())
    }

    /// Strips code units <= space from both ends.
    pub fn trim(&self) -> VString {
        VString::from(self.as_str().trim_matches(|c: char| c as u32 <= 0x20).as_str())
    }

    pub fn upper(&self) -> VString {
        VString::from(self.as_str().to_uppercase().as_str())
    }

    pub fn lower(&self) -> VString {
        VString::from(self.as_str().to_lowercase().as_str())
    }

    /// Code-point-aware reversal (never splits a multi-byte character).
    pub fn reverse(&self) -> VString {
        VString::from(self.as_str().chars().rev().collect::<String>().as_str())
    }

    /// `n == 0` -> empty string; `n < 0` -> the receiver unchanged.
    pub fn repeat(&self, n: isize) -> VString {
        if n < 0 {
            return self.duplicate();
        }
        VString::from(self.as_str().repeat(n as usize).as_str())
    }

    // -- split / join --------------------------------------------------------

    /// At most `max` splits on `sep`. Empty input yields a one-element list
    /// containing the empty string; an empty separator yields a one-element
    /// list containing the full string.
    pub fn split(&self, sep: &str, max: usize) -> VList {
        let text = self.as_str();
        let list = VList::new();
        if text.is_empty() || sep.is_empty() {
            list.append(VString::from(text.as_str()));
            return list;
        }
        let parts: Vec<&str> = if max == usize::MAX {
            text.split(sep).collect()
        } else {
            text.splitn(max + 1, sep).collect()
        };
        for part in parts {
            list.append(VString::from(part));
        }
        list
    }

    /// Splits on runs of ASCII whitespace; empty input returns an empty list.
    pub fn split_whitespace(&self) -> VList {
        let text = self.as_str();
        let list = VList::new();
        if text.is_empty() {
            return list;
        }
        for part in text.split_ascii_whitespace() {
            list.append(VString::from(part));
        }
        list
    }

    /// Splits on `\n` or `\r\n`; a trailing terminator produces an empty final
    /// element; no terminators returns a single element.
    pub fn lines(&self) -> VList {
        let text = self.as_str();
        let normalized = text.replace("\r\n", "\n");
        let list = VList::new();
        for part in normalized.split('\n') {
            list.append(VString::from(part));
        }
        list
    }

    /// Interpolates the receiver between stringifications of `list`'s items.
    pub fn join(&self, list: &VList) -> VString {
        let sep = self.as_str();
        let pieces: Vec<String> = list.snapshot_cells().iter().map(|c| c.stringify()).collect();
        VString::from(pieces.join(&sep).as_str())
    }

    /// Interpolates `{n}`/`{key}` tokens against a `VList` or `VMap`.
    pub fn format<S: FormatSource>(&self, source: &S) -> VString {
        VString::from(format::interpolate(&self.as_str(), source).as_str())
    }
}

impl Default for VString {
    fn default() -> Self {
        VString::new()
    }
}

impl From<&str> for VString {
    fn from(text: &str) -> Self {
        VString {
            bytes: Handle::new(text.as_bytes().to_vec()),
        }
    }
}

impl From<String> for VString {
    fn from(text: String) -> Self {
        VString {
            bytes: Handle::new(text.into_bytes()),
        }
    }
}

impl Add for &VString {
    type Output = VString;
    fn add(self, rhs: &VString) -> VString {
        self.append(rhs)
    }
}

impl std::fmt::Debug for VString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VString({:?})", self.as_str())
    }
}

pub(crate) fn djb2(bytes: &[u8]) -> u64 {
    if bytes.is_empty() {
        return 0;
    }
    let mut hash: u64 = 5381;
    for &b in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(b as u64);
    }
    hash
}

/// Lenient leading-whitespace, sign, integer parse; non-numeric input is 0.
fn lenient_parse_int(text: &str) -> i32 {
    let trimmed = text.trim_start();
    let mut end = 0;
    let bytes = trimmed.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    trimmed[..end].parse().unwrap_or(0)
}

/// Lenient leading-whitespace, sign, integer, optional `.fraction` parse.
fn lenient_parse_float(text: &str) -> f32 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start {
        return 0.0;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters_not_bytes() {
        let s = VString::from("héllo");
        assert_eq!(s.length(), 5);
        assert!(s.byte_length() > 5);
    }

    #[test]
    fn mutations_are_functional() {
        let s = VString::from("  hi  ");
        let trimmed = s.trim();
        assert_eq!(trimmed.as_str(), "hi");
        assert_eq!(s.as_str(), "  hi  ");
    }

    #[test]
    fn at_negative_index_counts_from_end() {
        let s = VString::from("abc");
        assert_eq!(s.at(-1).as_str(), "c");
        assert_eq!(s.at(10).as_str(), "");
    }

    #[test]
    fn substring_default_end_means_to_end() {
        let s = VString::from("hello world");
        assert_eq!(s.substring(6, -1).as_str(), "world");
        assert_eq!(s.substring(5, 2).as_str(), "");
    }

    #[test]
    fn split_respects_max_and_empty_separator() {
        let s = VString::from("a,b,c,d");
        let parts = s.split(",", 1);
        assert_eq!(parts.length(), 2);
        let whole = VString::from("abc").split("", usize::MAX);
        assert_eq!(whole.length(), 1);
    }

    #[test]
    fn lines_trailing_terminator_yields_empty_final_element() {
        let s = VString::from("a\nb\n");
        let lines = s.lines();
        assert_eq!(lines.length(), 3);
    }

    #[test]
    fn is_number_and_lenient_parsing() {
        assert!(VString::from("-12.5").is_number());
        assert!(!VString::from("12.5.6").is_number());
        assert_eq!(VString::from("  42abc").to_integer(), 42);
        assert_eq!(VString::from("3.14xyz").to_float(), 3.14);
    }

    #[test]
    fn to_bool_accepts_truthy_words_case_insensitively() {
        assert!(VString::from("YES").to_bool());
        assert!(VString::from("1").to_bool());
        assert!(!VString::from("nope").to_bool());
    }

    #[test]
    fn hash_of_empty_string_is_zero() {
        assert_eq!(VString::new().hash(), 0);
    }

    #[test]
    fn insert_negative_index_counts_from_end() {
        let s = VString::from("abc");
        // -1 counts back from len(3) to 2, so the insertion lands before 'c'
        assert_eq!(s.insert(-1, &VString::from("X")).as_str(), "abXc");
        // an index more negative than the string is long clamps to 0
        assert_eq!(s.insert(-99, &VString::from("X")).as_str(), "Xabc");
    }

    #[test]
    fn remove_negative_indices_count_from_end() {
        let s = VString::from("abcdef");
        // -3..-1 -> characters [3,5) -> "de"
        assert_eq!(s.remove(-3, -1).as_str(), "abcf");
        assert_eq!(s.remove(-99, 2).as_str(), "cdef");
    }
}
