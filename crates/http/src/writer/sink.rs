//! Out-of-band error reporting.
//!
//! A [`ResponseWriter`](crate::writer::ResponseWriter) knows two independent
//! failure channels, both supplied by whoever builds the writer:
//!
//! - the **application** sink receives the error a handler passed to `fail`,
//!   after the 500 response has been written;
//! - the **transport** sink receives failures of the connection itself while
//!   encoding, writing or closing.
//!
//! A failure is only ever reported to one of them.

use std::fmt;
use std::sync::Arc;

use tokio::task;
use tracing::error;

use crate::protocol::BoxError;

/// Where and on which task an error was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    thread: Option<String>,
    task: Option<task::Id>,
}

impl ReportContext {
    /// Captures the current thread name and tokio task id.
    pub fn current() -> Self {
        Self { thread: std::thread::current().name().map(ToOwned::to_owned), task: task::try_id() }
    }

    pub fn thread(&self) -> Option<&str> {
        self.thread.as_deref()
    }

    pub fn task(&self) -> Option<task::Id> {
        self.task
    }
}

/// Receives errors that cannot be turned into a response.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorSink: Send + Sync {
    fn report(&self, context: &ReportContext, error: BoxError);
}

impl<F> ErrorSink for F
where
    F: Fn(&ReportContext, BoxError) + Send + Sync,
{
    fn report(&self, context: &ReportContext, error: BoxError) {
        (self)(context, error);
    }
}

/// An [`ErrorSink`] that logs through `tracing` under a fixed channel name.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    channel: &'static str,
}

impl LogSink {
    pub const fn new(channel: &'static str) -> Self {
        Self { channel }
    }

    pub const fn application() -> Self {
        Self::new("application")
    }

    pub const fn transport() -> Self {
        Self::new("transport")
    }
}

impl ErrorSink for LogSink {
    fn report(&self, context: &ReportContext, error: BoxError) {
        error!(
            channel = self.channel,
            thread = context.thread(),
            task = ?context.task(),
            cause = %error,
            "uncaught error while handling response"
        );
    }
}

/// The two sinks a writer reports to.
#[derive(Clone)]
pub struct ErrorSinks {
    application: Arc<dyn ErrorSink>,
    transport: Arc<dyn ErrorSink>,
}

impl ErrorSinks {
    pub fn new(application: Arc<dyn ErrorSink>, transport: Arc<dyn ErrorSink>) -> Self {
        Self { application, transport }
    }

    pub fn with_application(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.application = sink;
        self
    }

    pub fn with_transport(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.transport = sink;
        self
    }

    pub(crate) fn report_application(&self, error: BoxError) {
        self.application.report(&ReportContext::current(), error);
    }

    pub(crate) fn report_transport(&self, error: BoxError) {
        self.transport.report(&ReportContext::current(), error);
    }
}

impl Default for ErrorSinks {
    fn default() -> Self {
        Self::new(Arc::new(LogSink::application()), Arc::new(LogSink::transport()))
    }
}

impl fmt::Debug for ErrorSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSinks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let sink = move |_: &ReportContext, error: BoxError| recorder.lock().unwrap().push(error.to_string());

        let sinks = ErrorSinks::default().with_application(Arc::new(sink));
        sinks.report_application("boom".into());

        assert_eq!(*seen.lock().unwrap(), vec!["boom".to_string()]);
    }

    #[test]
    fn channels_are_separate() {
        let mut application = MockErrorSink::new();
        application.expect_report().never();

        let mut transport = MockErrorSink::new();
        transport
            .expect_report()
            .times(1)
            .withf(|_, error| error.to_string() == "broken pipe")
            .return_const(());

        let sinks = ErrorSinks::new(Arc::new(application), Arc::new(transport));
        sinks.report_transport(Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")));
    }

    #[test]
    fn context_outside_runtime_has_no_task() {
        let context = ReportContext::current();
        assert!(context.task().is_none());
    }

    #[tokio::test]
    async fn context_inside_task_has_id() {
        let context = tokio::spawn(async { ReportContext::current() }).await.unwrap();
        assert!(context.task().is_some());
    }
}
