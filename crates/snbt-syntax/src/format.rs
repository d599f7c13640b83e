//! SNBT output
//!
//! Indent 0 writes the most compact text. A positive indent puts each
//! compound entry, and each element of a list holding containers, on its
//! own line; lists of scalars and typed arrays stay on one line.

use crate::tag::{CompoundTag, ListTag, OperationTag, Tag};
use snbt_core::{JDouble, JFloat};
use snbt_grammar::reader::is_allowed_in_unquoted_string;
use std::fmt;

impl Tag {
    /// Render as SNBT with `indent` spaces per nesting level.
    pub fn as_string(&self, indent: usize) -> String {
        let mut writer = TagWriter::new(indent);
        writer.write_tag(self, 0);
        writer.finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string(0))
    }
}

struct TagWriter {
    indent: usize,
    out: String,
}

impl TagWriter {
    fn new(indent: usize) -> Self {
        Self {
            indent,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn pretty(&self) -> bool {
        self.indent > 0
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        self.out.extend(std::iter::repeat_n(' ', self.indent * depth));
    }

    /// `,` compact, `, ` pretty
    fn inline_separator(&mut self) {
        self.out.push(',');
        if self.pretty() {
            self.out.push(' ');
        }
    }

    fn write_tag(&mut self, tag: &Tag, depth: usize) {
        match tag {
            Tag::End => self.out.push_str("END"),
            Tag::Byte(value) => self.push_display(format_args!("{value}b")),
            Tag::Short(value) => self.push_display(format_args!("{value}s")),
            Tag::Int(value) => self.push_display(format_args!("{value}")),
            Tag::Long(value) => self.push_display(format_args!("{value}L")),
            Tag::Float(value) => self.push_display(format_args!("{}f", JFloat::new(*value))),
            Tag::Double(value) => self.push_display(format_args!("{}d", JDouble::new(*value))),
            Tag::Boolean(value) => self.out.push_str(if *value { "true" } else { "false" }),
            Tag::String(value) => self.out.push_str(&quote_and_escape(value)),
            Tag::ByteArray(values) => self.write_array('B', values.iter().map(|v| format!("{v}B"))),
            Tag::IntArray(values) => self.write_array('I', values.iter().map(ToString::to_string)),
            Tag::LongArray(values) => self.write_array('L', values.iter().map(|v| format!("{v}L"))),
            Tag::List(list) => self.write_list(list, depth),
            Tag::Compound(compound) => self.write_compound(compound, depth),
            Tag::Operation(operation) => self.write_operation(operation, depth),
        }
    }

    fn push_display(&mut self, args: fmt::Arguments<'_>) {
        use std::fmt::Write;
        // Writing into a String cannot fail
        let _ = self.out.write_fmt(args);
    }

    fn write_array(&mut self, prefix: char, values: impl Iterator<Item = String>) {
        self.out.push('[');
        self.out.push(prefix);
        self.out.push(';');
        for (i, value) in values.enumerate() {
            if i == 0 {
                if self.pretty() {
                    self.out.push(' ');
                }
            } else {
                self.inline_separator();
            }
            self.out.push_str(&value);
        }
        self.out.push(']');
    }

    fn write_list(&mut self, list: &ListTag, depth: usize) {
        if list.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        if !self.pretty() || list.iter().all(is_inline) {
            for (i, element) in list.iter().enumerate() {
                if i > 0 {
                    self.inline_separator();
                }
                self.write_tag(element, depth);
            }
        } else {
            for (i, element) in list.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.newline(depth + 1);
                self.write_tag(element, depth + 1);
            }
            self.newline(depth);
        }
        self.out.push(']');
    }

    fn write_compound(&mut self, compound: &CompoundTag, depth: usize) {
        if compound.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        for (i, (key, value)) in compound.sorted_entries().into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            if self.pretty() {
                self.newline(depth + 1);
            }
            self.out.push_str(&escape_key(key));
            self.out.push(':');
            if self.pretty() {
                self.out.push(' ');
            }
            self.write_tag(value, depth + 1);
        }
        if self.pretty() {
            self.newline(depth);
        }
        self.out.push('}');
    }

    fn write_operation(&mut self, operation: &OperationTag, depth: usize) {
        self.out.push_str(&operation.name);
        self.out.push('(');
        for (i, argument) in operation.arguments.iter().enumerate() {
            if i > 0 {
                self.inline_separator();
            }
            self.write_tag(argument, depth);
        }
        self.out.push(')');
    }
}

/// Tags that never need a line of their own
fn is_inline(tag: &Tag) -> bool {
    match tag {
        Tag::List(list) => list.is_empty(),
        Tag::Compound(compound) => compound.is_empty(),
        Tag::Operation(operation) => operation.arguments.iter().all(is_inline),
        _ => true,
    }
}

fn escape_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(is_allowed_in_unquoted_string) {
        key.to_string()
    } else {
        quote_and_escape(key)
    }
}

/// Quote `value` for SNBT.
///
/// Double quotes are used unless a `"` comes before any `'`; only the
/// chosen quote is escaped. Control characters use their short escapes.
pub fn quote_and_escape(value: &str) -> String {
    let quote = match value.chars().find(|&c| c == '"' || c == '\'') {
        Some('"') => '\'',
        _ => '"',
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if c < ' ' => out.push_str(&format!("\\x{:02X}", u32::from(c))),
            c => {
                if c == quote {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
    out.push(quote);
    out
}
