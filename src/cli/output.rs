//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{FieldprobeArgs, OutputFormat};
use crate::demo::write_report;
use crate::error::Result;
use crate::search::QueryReport;

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &FieldprobeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output a query report: the demo transcript format for humans.
pub fn output_report(report: &QueryReport, args: &FieldprobeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            let mut out = io::stdout().lock();
            write_report(report, &mut out)?;
            if args.verbosity() > 1 && !report.is_error() {
                writeln!(out, "Total hits: {}", report.total_hits)?;
            }
            Ok(())
        }
        OutputFormat::Json => output_json(report, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &FieldprobeArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    print!("{}", render_human(&value));
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &FieldprobeArgs) -> Result<()> {
    println!("{}", render_json(result, args.pretty)?);
    Ok(())
}

/// Serialize a result, optionally pretty-printed.
pub fn render_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

/// Render a value as `key: value` lines; arrays of objects get one block per
/// element separated by blank lines.
pub fn render_human(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                out.push_str(&format!("{key}: {}\n", format_value(val)));
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if i > 0 && item.is_object() {
                    out.push('\n');
                }
                out.push_str(&render_human(item));
            }
        }
        other => {
            out.push_str(&format_value(other));
            out.push('\n');
        }
    }
    out
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        // Keep trailing spaces of meta values visible.
        Value::String(s) if s.ends_with(' ') => format!("{s:?}"),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::String("test".to_string())), "test");
        assert_eq!(
            format_value(&Value::String("title source ".to_string())),
            "\"title source \""
        );
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&Value::Bool(false)), "false");
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&json!(["a", 1])), "[a, 1]");
    }

    #[test]
    fn test_render_human() {
        let value = json!([
            {"doc_id": 0, "field_names": "title source author "},
            {"doc_id": 1, "field_names": "title origin author "}
        ]);
        assert_eq!(
            render_human(&value),
            "doc_id: 0\nfield_names: \"title source author \"\n\ndoc_id: 1\nfield_names: \"title origin author \"\n"
        );
    }

    #[test]
    fn test_render_json() {
        let value = json!({"total_hits": 1});
        assert_eq!(render_json(&value, false).unwrap(), r#"{"total_hits":1}"#);
        assert_eq!(
            render_json(&value, true).unwrap(),
            "{\n  \"total_hits\": 1\n}"
        );
    }
}
