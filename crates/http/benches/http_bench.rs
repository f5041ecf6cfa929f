use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use http::StatusCode;
use oneshot_http::{
    codec::ResponseEncoder,
    protocol::{Charset, Cookie, PendingResponse},
    writer::{ErrorSinks, ResponseWriter},
};
use std::{
    hint::black_box,
    io,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::io::AsyncWrite;
use tokio_util::codec::Encoder;

// Mock IO for testing
#[derive(Clone, Default)]
struct MockIO {
    write_data: Vec<u8>,
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn bench_response_encoder(c: &mut Criterion) {
    let mut response = PendingResponse::new();
    response.append_text("Hello World!");

    c.bench_function("encode_simple_response", |b| {
        b.iter(|| {
            let mut bytes = BytesMut::new();
            black_box(ResponseEncoder::new().encode(&response, &mut bytes).unwrap());
        });
    });
}

fn bench_charset(c: &mut Criterion) {
    let text = "caf\u{e9} ".repeat(256);

    c.bench_function("encode_windows_1252", |b| {
        b.iter(|| black_box(Charset::WINDOWS_1252.encode(&text)));
    });
}

fn bench_response_writer(c: &mut Criterion) {
    let sinks = ErrorSinks::default();
    let cookie = Cookie::new("session", "abc").path("/").http_only(true);

    c.bench_function("write_simple_response", |b| {
        b.iter(|| {
            let mut writer = ResponseWriter::new(MockIO::default(), sinks.clone());
            writer.set_status(StatusCode::OK).header("x-request-id", "42").unwrap();
            writer.cookie(&cookie).unwrap().append_content("Hello World!");
            block_on(writer.end());
            black_box(writer.into_inner());
        });
    });
}

criterion_group!(benches, bench_response_encoder, bench_charset, bench_response_writer);
criterion_main!(benches);
