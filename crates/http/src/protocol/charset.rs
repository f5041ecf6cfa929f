//! Text encodings used to turn string content into body bytes.
//!
//! [`Charset`] is a thin wrapper over an [`encoding_rs::Encoding`]. Labels are
//! resolved with the WHATWG rules, so `"latin1"` and `"iso-8859-1"` both name
//! `windows-1252`. encoding_rs only decodes UTF-16, so the two UTF-16 variants
//! are encoded here directly, without a byte order mark.
//!
//! Characters the target encoding cannot represent are written as `?`.

use std::fmt;

use bytes::{BufMut, BytesMut};
use encoding_rs::{EncoderResult, Encoding};

/// Scratch space for one round of the incremental encoder.
const ENCODE_CHUNK_SIZE: usize = 1024;

const UNMAPPABLE_REPLACEMENT: u8 = b'?';

/// The encoding used for text written into a response body.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    pub const UTF_8: Charset = Charset { encoding: encoding_rs::UTF_8 };
    pub const UTF_16BE: Charset = Charset { encoding: encoding_rs::UTF_16BE };
    pub const UTF_16LE: Charset = Charset { encoding: encoding_rs::UTF_16LE };
    pub const WINDOWS_1252: Charset = Charset { encoding: encoding_rs::WINDOWS_1252 };

    /// Wraps `encoding`, or returns `None` when it can only be decoded, such as
    /// `replacement`, which every ISO-2022-KR style label maps to.
    pub fn from_encoding(encoding: &'static Encoding) -> Option<Self> {
        let native_utf16 = encoding == encoding_rs::UTF_16BE || encoding == encoding_rs::UTF_16LE;
        (native_utf16 || encoding.output_encoding() == encoding).then_some(Self { encoding })
    }

    /// Looks up a charset by label, e.g. `"utf-8"` or `"Shift_JIS"`.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).and_then(Self::from_encoding)
    }

    /// The canonical name, suitable for a `charset=` parameter.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Encodes `text` and appends the bytes to `dst`.
    pub fn encode_into(&self, text: &str, dst: &mut BytesMut) {
        if self.encoding == encoding_rs::UTF_8 {
            dst.extend_from_slice(text.as_bytes());
        } else if self.encoding == encoding_rs::UTF_16BE {
            dst.reserve(text.len() * 2);
            text.encode_utf16().for_each(|unit| dst.put_u16(unit));
        } else if self.encoding == encoding_rs::UTF_16LE {
            dst.reserve(text.len() * 2);
            text.encode_utf16().for_each(|unit| dst.put_u16_le(unit));
        } else {
            encode_lossy(self.encoding, text, dst);
        }
    }

    /// Encodes `text` into a fresh buffer.
    pub fn encode(&self, text: &str) -> BytesMut {
        let mut dst = BytesMut::with_capacity(text.len());
        self.encode_into(text, &mut dst);
        dst
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::UTF_8
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn encode_lossy(encoding: &'static Encoding, text: &str, dst: &mut BytesMut) {
    let mut encoder = encoding.new_encoder();
    let mut chunk = [0u8; ENCODE_CHUNK_SIZE];
    let mut src = text;

    loop {
        let (result, read, written) = encoder.encode_from_utf8_without_replacement(src, &mut chunk, true);
        dst.extend_from_slice(&chunk[..written]);
        src = &src[read..];

        match result {
            EncoderResult::InputEmpty => return,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => dst.put_u8(UNMAPPABLE_REPLACEMENT),
        }
    }
}
