//! Serves one response per connection on 127.0.0.1:8080.
//!
//! - `GET /` answers with a greeting and a cookie
//! - `GET /fail` answers with the trace of a handler error
//! - anything else is a 404
//!
//! ```text
//! curl -v http://127.0.0.1:8080/fail
//! ```

use std::sync::Arc;

use http::StatusCode;
use oneshot_http::protocol::{BoxError, Cookie, SameSite};
use oneshot_http::writer::{ErrorSinks, LogSink, ReportContext, ResponseWriter};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Error)]
#[error("no user with id {0}")]
struct UserNotFound(u64);

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    let application = |context: &ReportContext, error: BoxError| {
        error!(task = ?context.task(), cause = %error, "handler failed");
    };
    let sinks = ErrorSinks::new(Arc::new(application), Arc::new(LogSink::transport()));

    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let sinks = sinks.clone();
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let mut request_line = String::new();
            if let Err(e) = BufReader::new(reader).read_line(&mut request_line).await {
                warn!(cause = %e, "can't read request line");
                return;
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_owned();
            let response = ResponseWriter::new(writer, sinks);
            handle(&path, response).await;
        });
    }
}

async fn handle<W>(path: &str, mut response: ResponseWriter<W>)
where
    W: AsyncWrite + Unpin,
{
    match path {
        "/" => {
            let cookie = Cookie::new("visited", "yes").path("/").http_only(true).same_site(SameSite::Lax);
            if let Some(e) = response.cookie(&cookie).err() {
                response.fail(e).await;
                return;
            }
            response.append_content("Hello World!\r\n").end().await;
        }
        "/fail" => {
            response.fail(UserNotFound(7)).await;
        }
        _ => {
            let typed = response.set_status(StatusCode::NOT_FOUND).header("content-type", "text/plain").map(|_| ());
            match typed {
                Ok(()) => response.append_content("not found\r\n").end().await,
                Err(e) => response.fail(e).await,
            };
        }
    }
}
