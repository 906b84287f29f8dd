use std::fmt::Write as _;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::CookieQueryError;
use crate::results::{ResultRow, ResultSet};
use crate::types::CellValue;

/// How fetched rows are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
pub enum OutputFormat {
    /// `[('a.com',), ('b.org',)]`
    #[default]
    Tuples,
    /// One row per line, columns separated by tabs.
    Lines,
    /// A JSON array of row arrays.
    Json,
}

/// Render a whole result set in `format`.
///
/// `lines` ends every row with a newline, so an empty set renders as `""` and a set
/// holding one NULL row as `"\n"`. The other formats have no trailing newline.
///
/// # Errors
/// Returns `CookieQueryError::Output` if JSON serialization fails.
pub fn render(result_set: &ResultSet, format: OutputFormat) -> Result<String, CookieQueryError> {
    match format {
        OutputFormat::Tuples => Ok(render_tuples(result_set)),
        OutputFormat::Lines => Ok(render_lines(result_set)),
        OutputFormat::Json => {
            let rows: Vec<&[CellValue]> =
                result_set.iter().map(|row| row.values.as_slice()).collect();
            serde_json::to_string(&rows).map_err(|e| CookieQueryError::Output(e.into()))
        }
    }
}

/// Render and write `result_set` in one write, newline-terminated.
///
/// # Errors
/// Returns `CookieQueryError::Output` if rendering or writing fails.
pub fn write_result_set<W: Write>(
    out: &mut W,
    result_set: &ResultSet,
    format: OutputFormat,
) -> Result<(), CookieQueryError> {
    let mut text = render(result_set, format)?;
    if format != OutputFormat::Lines {
        text.push('\n');
    }
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn render_tuples(result_set: &ResultSet) -> String {
    let mut out = String::from("[");
    for (i, row) in result_set.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&tuple_repr(row));
    }
    out.push(']');
    out
}

fn tuple_repr(row: &ResultRow) -> String {
    let mut out = String::from("(");
    for (i, value) in row.values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&value_repr(value));
    }
    // one-element tuples keep their trailing comma
    if row.values.len() == 1 {
        out.push(',');
    }
    out.push(')');
    out
}

fn render_lines(result_set: &ResultSet) -> String {
    let mut out = String::new();
    for row in result_set {
        let fields: Vec<String> = row.values.iter().map(plain_text).collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

fn plain_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Text(s) => s.clone(),
        other => value_repr(other),
    }
}

/// Literal form of one value: `None`, `42`, `1.5`, `'text'`, `b'\x00'`.
#[must_use]
pub fn value_repr(value: &CellValue) -> String {
    match value {
        CellValue::Null => "None".to_string(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Float(f) => float_repr(*f),
        CellValue::Text(s) => text_repr(s),
        CellValue::Blob(bytes) => blob_repr(bytes),
    }
}

fn float_repr(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        exponent_repr(&format!("{f:?}"))
    }
}

/// `1e20` → `1e+20`, `1.5e-5` → `1.5e-05`: signed exponent, at least two digits.
fn exponent_repr(debug: &str) -> String {
    let Some((mantissa, exponent)) = debug.split_once('e') else {
        return debug.to_string();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn text_repr(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn blob_repr(bytes: &[u8]) -> String {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(b)),
            b => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(values: &[CellValue]) -> ResultSet {
        let mut rs = ResultSet::with_columns(vec!["host_key".to_string()], values.len());
        for v in values {
            rs.add_row_values(vec![v.clone()]);
        }
        rs
    }

    #[test]
    fn tuples_single_column() {
        let rs = hosts(&["a.com".into(), ".b.org".into()]);
        assert_eq!(
            render(&rs, OutputFormat::Tuples).unwrap(),
            "[('a.com',), ('.b.org',)]"
        );
    }

    #[test]
    fn tuples_empty_set() {
        let rs = hosts(&[]);
        assert_eq!(render(&rs, OutputFormat::Tuples).unwrap(), "[]");
    }

    #[test]
    fn tuples_multi_column() {
        let mut rs = ResultSet::with_columns(vec!["a".into(), "b".into()], 1);
        rs.add_row_values(vec![CellValue::Int(1), CellValue::Null]);
        assert_eq!(render(&rs, OutputFormat::Tuples).unwrap(), "[(1, None)]");
    }

    #[test]
    fn text_quoting() {
        assert_eq!(value_repr(&"it's".into()), "\"it's\"");
        assert_eq!(value_repr(&"say \"hi\"".into()), "'say \"hi\"'");
        assert_eq!(value_repr(&"both ' \"".into()), "'both \\' \"'");
        assert_eq!(value_repr(&"a\\b\n".into()), "'a\\\\b\\n'");
    }

    #[test]
    fn scalar_reprs() {
        assert_eq!(value_repr(&CellValue::Float(1.0)), "1.0");
        assert_eq!(value_repr(&CellValue::Int(-7)), "-7");
        assert_eq!(value_repr(&CellValue::Blob(vec![0, b'a', 0xff])), "b'\\x00a\\xff'");
    }

    #[test]
    fn float_exponents() {
        assert_eq!(value_repr(&CellValue::Float(1e20)), "1e+20");
        assert_eq!(value_repr(&CellValue::Float(1.5e-5)), "1.5e-05");
        assert_eq!(value_repr(&CellValue::Float(-2.5e100)), "-2.5e+100");
        assert_eq!(value_repr(&CellValue::Float(0.25)), "0.25");
    }

    #[test]
    fn lines_keep_null_rows() {
        assert_eq!(render(&hosts(&[]), OutputFormat::Lines).unwrap(), "");
        assert_eq!(render(&hosts(&[CellValue::Null]), OutputFormat::Lines).unwrap(), "\n");

        let mut buf = Vec::new();
        write_result_set(&mut buf, &hosts(&[CellValue::Null]), OutputFormat::Lines).unwrap();
        assert_eq!(buf, b"\n");

        let mut buf = Vec::new();
        write_result_set(&mut buf, &hosts(&[]), OutputFormat::Lines).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn lines_and_json() {
        let rs = hosts(&["a.com".into(), CellValue::Null]);
        assert_eq!(render(&rs, OutputFormat::Lines).unwrap(), "a.com\n\n");
        assert_eq!(
            render(&rs, OutputFormat::Json).unwrap(),
            "[[\"a.com\"],[null]]"
        );
    }

    #[test]
    fn write_appends_newline() {
        let rs = hosts(&["a.com".into()]);
        let mut buf = Vec::new();
        write_result_set(&mut buf, &rs, OutputFormat::Tuples).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[('a.com',)]\n");
    }
}
