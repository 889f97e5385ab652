use std::error::Error;
use std::fmt;
use std::panic::Location;

use super::builder::IncompleteError;
use super::structured::{Props, StructuredError};
use crate::config::TraceOptions;

/// Render `err` and every cause below it.
///
/// Nothing is cached: each call reads the current state of the whole chain.
pub fn format_trace(err: &(dyn Error + 'static), options: &TraceOptions) -> String {
    Trace { err, options }.to_string()
}

struct Trace<'a> {
    err: &'a (dyn Error + 'static),
    options: &'a TraceOptions,
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut next = Some(self.err);
        let mut first = true;

        while let Some(current) = next {
            if !first {
                f.write_str("\nCaused by ")?;
            }
            first = false;
            next = write_frame(f, current, self.options)?;
        }

        Ok(())
    }
}

/// Writes one section and returns the error to render after it
fn write_frame<'a>(
    f: &mut fmt::Formatter<'_>,
    err: &'a (dyn Error + 'static),
    options: &TraceOptions,
) -> Result<Option<&'a (dyn Error + 'static)>, fmt::Error> {
    if let Some(structured) = err.downcast_ref::<StructuredError>() {
        write!(f, "{}: {}", structured.name(), structured.message())?;
        write_details(f, structured.props(), structured.location(), options)?;
        return Ok(err.source());
    }

    if let Some(attempt) = err.downcast_ref::<IncompleteError>() {
        write!(f, "{}", attempt)?;
        write_details(f, attempt.props(), attempt.location(), options)?;
        return Ok(err.source());
    }

    // Foreign errors carry no type name at runtime
    write!(f, "Error: {}", err)?;
    Ok(err.source())
}

fn write_details(
    f: &mut fmt::Formatter<'_>,
    props: Option<&Props>,
    location: &'static Location<'static>,
    options: &TraceOptions,
) -> fmt::Result {
    if let Some(props) = props {
        write!(f, "\n    code: {}", props_json(props))?;
    }
    if options.locations {
        write!(
            f,
            "\n    at {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        )?;
    }
    Ok(())
}

/// Compact JSON for the props line, keys in insertion order
pub(crate) fn props_json(props: &Props) -> String {
    serde_json::to_string(props).unwrap_or_else(|_| String::from("{}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Wrapped {
        inner: std::io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrapped failure")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    fn no_locations() -> TraceOptions {
        TraceOptions { locations: false }
    }

    #[test]
    fn test_plain_trace() {
        let err = StructuredError::new("code", "message");
        assert_eq!(
            format_trace(&err, &no_locations()),
            "StructuredError: message"
        );
    }

    #[test]
    fn test_props_on_second_line() {
        let props = json!({ "foo": "bar" }).as_object().cloned().unwrap();
        let err = StructuredError::with_props("code", "message", props);
        let trace = format_trace(&err, &no_locations());
        assert_eq!(trace, "StructuredError: message\n    code: {\"foo\":\"bar\"}");
    }

    #[test]
    fn test_location_line_follows_props() {
        let props = json!({ "n": 1 }).as_object().cloned().unwrap();
        let line = line!() + 1;
        let err = StructuredError::with_props("code", "message", props);
        let trace = err.trace();
        let lines: Vec<&str> = trace.lines().collect();

        assert_eq!(lines[0], "StructuredError: message");
        assert_eq!(lines[1], "    code: {\"n\":1}");
        assert!(lines[2].starts_with(&format!("    at {}:{}:", file!(), line)));
    }

    #[test]
    fn test_foreign_chain_follows_source() {
        let cause = Wrapped {
            inner: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let err = StructuredError::caused_by(cause, "config.load", "could not load config");
        let trace = format_trace(&err, &no_locations());
        assert_eq!(
            trace,
            "StructuredError: could not load config\n\
             Caused by Error: wrapped failure\n\
             Caused by Error: no such file"
        );
    }

    #[test]
    fn test_every_hop_is_rendered() {
        let root = StructuredError::new("root", "root message");
        let middle = StructuredError::caused_by(root, "middle", "middle message");
        let top = StructuredError::caused_by(middle, "top", "top message");

        let trace = format_trace(&top, &no_locations());
        assert_eq!(
            trace,
            "StructuredError: top message\n\
             Caused by StructuredError: middle message\n\
             Caused by StructuredError: root message"
        );
    }

    #[test]
    fn test_validation_failure_trace() {
        let err = StructuredError::builder().code("code").build();
        let trace = format_trace(&err, &no_locations());
        assert_eq!(
            trace,
            "StructuredError: BaseError must be thrown with a message\n\
             Caused by StructuredError"
        );
    }

    #[test]
    fn test_props_keep_insertion_order() {
        let props = json!({ "zeta": 1, "alpha": 2, "mid": { "y": true, "b": null } })
            .as_object()
            .cloned()
            .unwrap();
        let err = StructuredError::with_props("c", "m", props);
        assert_eq!(
            format_trace(&err, &no_locations()),
            "StructuredError: m\n    code: {\"zeta\":1,\"alpha\":2,\"mid\":{\"y\":true,\"b\":null}}"
        );

        let keys: Vec<&str> = err.props().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_props_line_sits_before_cause() {
        let root = StructuredError::with_props(
            "db.timeout",
            "query timed out",
            json!({ "table": "cards" }).as_object().cloned().unwrap(),
        );
        let err = StructuredError::caused_by_with_props(
            root,
            "sync.fetch",
            "fetch failed",
            json!({ "page": 3, "attempt": 1 }).as_object().cloned().unwrap(),
        );

        assert_eq!(
            format_trace(&err, &no_locations()),
            "StructuredError: fetch failed\n    code: {\"page\":3,\"attempt\":1}\n\
             Caused by StructuredError: query timed out\n    code: {\"table\":\"cards\"}"
        );
    }
}
