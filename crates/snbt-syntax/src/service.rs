//! Parse-then-format requests with timings

use crate::error::SnbtResult;
use crate::grammar::parse_snbt;
use crate::operations::Operations;
use crate::options::FormatOptions;
use std::time::{Duration, Instant};
use tracing::debug;

/// Output of one format request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub output: String,
    /// Indent after clamping
    pub indent: usize,
    /// Parsing, plus operation resolution when requested
    pub parse_time: Duration,
    pub format_time: Duration,
    pub total_time: Duration,
}

impl Formatted {
    /// Response headers: the three timings in nanoseconds and the indent.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Parsing-Time", self.parse_time.as_nanos().to_string()),
            ("Format-Time", self.format_time.as_nanos().to_string()),
            ("Total-Time", self.total_time.as_nanos().to_string()),
            ("Indent", self.indent.to_string()),
        ]
    }
}

/// Parse `text`, optionally resolve its operations, and print it again.
pub fn format_snbt(text: &str, options: &FormatOptions) -> SnbtResult<Formatted> {
    let indent = options.indent();
    let start = Instant::now();

    let mut tag = parse_snbt(text)?;
    if options.resolve {
        tag = tag.resolve(&Operations::new())?;
    }
    let parse_time = start.elapsed();

    let format_start = Instant::now();
    let output = tag.as_string(indent);
    let format_time = format_start.elapsed();
    let total_time = start.elapsed();

    debug!(
        input_len = text.len(),
        output_len = output.len(),
        indent,
        parse_ns = parse_time.as_nanos() as u64,
        format_ns = format_time.as_nanos() as u64,
        "formatted snbt"
    );
    Ok(Formatted {
        output,
        indent,
        parse_time,
        format_time,
        total_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_request() {
        let formatted = format_snbt("{b:1,a:[1b,2b]}", &FormatOptions::with_indent(0)).unwrap();
        assert_eq!(formatted.output, "{a:[1b,2b],b:1}");
        assert_eq!(formatted.indent, 0);
        assert!(formatted.total_time >= formatted.parse_time);
    }

    #[test]
    fn test_headers() {
        let formatted = format_snbt("1", &FormatOptions::with_indent(99)).unwrap();
        let headers = formatted.headers();
        let names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["Parsing-Time", "Format-Time", "Total-Time", "Indent"]);
        assert_eq!(headers[3].1, "10");
        assert!(headers[2].1.parse::<u128>().is_ok());
    }

    #[test]
    fn test_resolve_on_request() {
        let options = FormatOptions {
            indent: 0,
            resolve: true,
        };
        assert_eq!(format_snbt("[bool(1), bool(0)]", &options).unwrap().output, "[true,false]");
        let kept = format_snbt("bool(1)", &FormatOptions::with_indent(0)).unwrap();
        assert_eq!(kept.output, "bool(1)");
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let error = format_snbt("{a:}", &FormatOptions::default()).unwrap_err();
        assert!(error.cursor().is_some());
    }
}
