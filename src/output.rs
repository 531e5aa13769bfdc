//! YAML output serialization for Y values.
//!
//! This module renders a [`Value`] tree back to YAML block style. The
//! shape of the output is configurable through [`EmitOptions`], mirroring
//! the command surface's indentation flags: how far mapping children
//! indent, how far sequence items indent, and at which column within that
//! indent the dash sits.
//!
//! Output is plain block YAML: no anchors, no aliases, no tags. Strings
//! are written unquoted when that is unambiguous and double-quoted
//! otherwise.
//!
//! # Examples
//!
//! ```
//! use y_lang::output::to_yaml;
//! use y_lang::Value;
//!
//! assert_eq!(to_yaml(&Value::Number(42.0)), "42\n");
//! ```

use crate::value::Value;
use indexmap::IndexMap;

/// Formatting parameters for YAML emission.
///
/// The defaults match the command surface's defaults: mappings indent by
/// 2, sequences by 4 with the dash at column offset 2 inside that indent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitOptions {
    /// Indentation added for the children of a mapping
    pub indent_mapping: usize,
    /// Indentation added for the items of a sequence
    pub indent_sequence: usize,
    /// Column of the dash within a sequence's indentation
    pub indent_offset: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent_mapping: 2,
            indent_sequence: 4,
            indent_offset: 2,
        }
    }
}

pub struct YamlPrinter {
    options: EmitOptions,
}

impl YamlPrinter {
    pub fn new(options: EmitOptions) -> Self {
        YamlPrinter { options }
    }

    pub fn print(&self, value: &Value) -> String {
        let mut text = match value {
            Value::Mapping(entries) if !entries.is_empty() => {
                self.mapping_lines(entries, 0).join("\n")
            }
            Value::Sequence(items) if !items.is_empty() => {
                self.sequence_lines(items, 0).join("\n")
            }
            other => self.scalar(other),
        };
        text.push('\n');
        text
    }

    fn mapping_lines(&self, entries: &IndexMap<String, Value>, col: usize) -> Vec<String> {
        let pad = " ".repeat(col);
        let mut lines = Vec::new();

        for (key, value) in entries {
            let key_text = self.string_scalar(key);
            match value {
                Value::Mapping(children) if !children.is_empty() => {
                    lines.push(format!("{}{}:", pad, key_text));
                    lines.extend(self.mapping_lines(children, col + self.options.indent_mapping));
                }
                Value::Sequence(items) if !items.is_empty() => {
                    lines.push(format!("{}{}:", pad, key_text));
                    lines.extend(self.sequence_lines(items, col));
                }
                other => {
                    lines.push(format!("{}{}: {}", pad, key_text, self.scalar(other)));
                }
            }
        }
        lines
    }

    fn sequence_lines(&self, items: &[Value], col: usize) -> Vec<String> {
        let dash_col = col + self.options.indent_offset;
        // the dash and one space always fit before the item content
        let content_col = (col + self.options.indent_sequence).max(dash_col + 2);
        let dash_pad = " ".repeat(dash_col);
        let gap = " ".repeat(content_col - dash_col - 1);
        let mut lines = Vec::new();

        for item in items {
            match item {
                Value::Mapping(children) if !children.is_empty() => {
                    let mut block = self.mapping_lines(children, content_col);
                    splice_dash(&mut block[0], dash_col);
                    lines.extend(block);
                }
                Value::Sequence(children) if !children.is_empty() => {
                    let mut block = self.sequence_lines(children, content_col);
                    splice_dash(&mut block[0], dash_col);
                    lines.extend(block);
                }
                other => {
                    lines.push(format!("{}-{}{}", dash_pad, gap, self.scalar(other)));
                }
            }
        }
        lines
    }

    fn scalar(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => self.string_scalar(s),
            Value::Sequence(_) => "[]".to_string(),
            Value::Mapping(_) => "{}".to_string(),
        }
    }

    fn string_scalar(&self, s: &str) -> String {
        if needs_quotes(s) {
            format!("\"{}\"", self.escape_string(s))
        } else {
            s.to_string()
        }
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
                c => vec![c],
            })
            .collect()
    }
}

/// Overwrite the indentation of a block's first line with the item dash.
fn splice_dash(line: &mut String, dash_col: usize) {
    line.replace_range(dash_col..dash_col + 1, "-");
}

/// Whether a string must be double-quoted to survive a YAML round trip.
fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    const AMBIGUOUS: [&str; 8] = ["true", "false", "null", "~", "yes", "no", "on", "off"];
    if AMBIGUOUS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return true;
    }
    if s.parse::<f64>().is_ok() {
        return true;
    }
    if s == "-" || s.starts_with("- ") {
        return true;
    }
    !s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '/'))
}

// Convenience functions

/// Serialize a value to YAML with the default indentation.
pub fn to_yaml(value: &Value) -> String {
    YamlPrinter::new(EmitOptions::default()).print(value)
}

/// Serialize a value to YAML with explicit indentation options.
pub fn to_yaml_with(value: &Value, options: EmitOptions) -> String {
    YamlPrinter::new(options).print(value)
}
