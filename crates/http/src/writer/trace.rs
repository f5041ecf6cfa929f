use std::error::Error;
use std::fmt::Write;

/// Renders an error and its `source()` chain as the body of a 500 response.
///
/// The first line is the `Debug` form of the error, which names its type, and
/// every cause follows on a `Caused by:` line.
pub(crate) fn render_trace(error: &(dyn Error + 'static)) -> String {
    let mut trace = String::new();
    // writing into a String cannot fail
    let _ = writeln!(trace, "{error:?}");

    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(trace, "Caused by: {cause:?}");
        source = cause.source();
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct NullReferenceError(String);

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct RequestFailed {
        #[source]
        cause: io::Error,
    }

    #[test]
    fn names_the_error() {
        let trace = render_trace(&NullReferenceError("x".into()));
        assert_eq!(trace, "NullReferenceError(\"x\")\n");
    }

    #[test]
    fn includes_the_cause_chain() {
        let error = RequestFailed { cause: io::Error::new(io::ErrorKind::NotFound, "missing row") };
        let trace = render_trace(&error);

        let lines: Vec<_> = trace.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("RequestFailed"));
        assert!(lines[1].starts_with("Caused by: "));
        assert!(lines[1].contains("missing row"));
    }
}
