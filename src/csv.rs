//! A hand-rolled CSV codec: a `VList` of row `VList`s round-trips through
//! RFC-4180-ish text, comma-separated with a `\r\n` row terminator on output
//! and lenient acceptance of `\n`/`\r\n` on input.

use crate::cell::CellType;
use crate::vlist::VList;
use crate::vstring::VString;

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn escape_field(field: &str) -> String {
    if !needs_quotes(field) {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
    out
}

fn value_to_csv(row: &VList, index: usize) -> String {
    match row.type_at(index as isize) {
        CellType::Bool => row.at::<bool>(index as isize).to_string(),
        CellType::Int => row.at::<i32>(index as isize).to_string(),
        CellType::Float => crate::cell::format_float(row.at::<f32>(index as isize)),
        CellType::String => escape_field(&row.at::<VString>(index as isize).as_str()),
        CellType::List => escape_field(&row.at::<VList>(index as isize).to_json()),
        CellType::Map => escape_field(&row.at::<crate::vmap::VMap>(index as isize).to_json()),
        CellType::Set => escape_field(&row.at::<crate::vset::VSet>(index as isize).to_json()),
        _ => String::new(),
    }
}

/// Every row that isn't itself a list is skipped.
pub fn encode(list: &VList) -> String {
    let mut out = String::new();
    let row_count = list.length();
    let mut first_row = true;

    for i in 0..row_count {
        if list.type_at(i as isize) != CellType::List {
            continue;
        }
        let row = list.at::<VList>(i as isize);
        if !first_row {
            out.push_str("\r\n");
        }
        first_row = false;

        let col_count = row.length();
        for j in 0..col_count {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&value_to_csv(&row, j));
        }
    }
    out
}

fn parse_line(line: &str) -> VList {
    let row = VList::new();
    if line.is_empty() {
        return row;
    }

    let mut current = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if in_quotes {
            if ch == '"' {
                if chars.get(i + 1) == Some(&'"') {
                    current.push('"');
                    i += 2;
                    continue;
                } else {
                    in_quotes = false;
                    i += 1;
                    continue;
                }
            } else {
                current.push(ch);
                i += 1;
            }
        } else if ch == '"' {
            in_quotes = true;
            i += 1;
        } else if ch == ',' {
            row.append(VString::from(current.as_str()));
            current = String::new();
            i += 1;
        } else {
            current.push(ch);
            i += 1;
        }
    }
    row.append(VString::from(current.as_str()));
    row
}

/// Blank lines (including a trailing terminator) are skipped.
pub fn decode(text: &str) -> VList {
    let result = VList::new();
    if text.is_empty() {
        return result;
    }
    for line in text.replace("\r\n", "\n").split('\n') {
        if line.is_empty() {
            continue;
        }
        result.append(parse_line(line));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_fields_containing_commas_and_quotes() {
        let rows = VList::new();
        let row = VList::new();
        row.append("hello, world");
        row.append("she said \"hi\"");
        rows.append(row);
        let text = encode(&rows);
        assert_eq!(text, "\"hello, world\",\"she said \"\"hi\"\"\"");
    }

    #[test]
    fn round_trips_multi_row() {
        let rows = VList::new();
        let r1 = VList::new();
        r1.append("a");
        r1.append(1);
        let r2 = VList::new();
        r2.append("b");
        r2.append(2);
        rows.append(r1);
        rows.append(r2);

        let text = encode(&rows);
        assert_eq!(text, "a,1\r\nb,2");

        let parsed = decode(&text);
        assert_eq!(parsed.length(), 2);
        let first = parsed.at::<VList>(0);
        assert_eq!(first.at::<VString>(0).as_str(), "a");
    }

    #[test]
    fn blank_lines_are_skipped_on_decode() {
        let parsed = decode("a,b\n\nc,d\n");
        assert_eq!(parsed.length(), 2);
    }
}
