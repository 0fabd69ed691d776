// Copyright (C) 2019, Cloudflare, Inc.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright notice,
//       this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above copyright
//       notice, this list of conditions and the following disclaimer in the
//       documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS
// IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO,
// THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR
// PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR
// CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL,
// EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO,
// PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR
// PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF
// LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING
// NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS
// SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.


//! 🗜️ SPDY Name/Value header block compression.
//!
//! This crate implements the header compression scheme used by SPDY control
//! frames: header lists are serialized into the single-occurrence
//! Name/Value wire layout and run through DEFLATE streams that are primed
//! with a protocol dictionary and persist for the lifetime of a
//! connection. It performs no I/O and manages no frame boundaries; the
//! session layer hands in one opaque header block at a time.
//!
//! ## Connection setup
//!
//! A [`HeaderCodec`] is created from a [`Config`] when a connection
//! negotiates SPDY, and dropped when the connection closes:
//!
//! ```
//! let config = spdy_deflate::Config::new(spdy_deflate::Version::Spdy3);
//!
//! let mut local = spdy_deflate::HeaderCodec::new(&config);
//! let mut peer = spdy_deflate::HeaderCodec::new(&config);
//!
//! let mut headers = vec![
//!     spdy_deflate::Header::new(b"host", b"example.org"),
//!     spdy_deflate::Header::new(b"accept", b"*/*"),
//! ];
//!
//! let block = local.encode(&mut headers);
//!
//! let mut b = octets::Octets::with_slice(&block);
//! let decoded = peer.decode(&mut b, block.len())?;
//! assert_eq!(decoded.pieces.len(), 4);
//! # Ok::<(), spdy_deflate::Error>(())
//! ```
//!
//! ## Stream ordering
//!
//! Both DEFLATE windows live as long as the codec, so the sequence of
//! [`encode()`] calls and the sequence of [`decode()`] calls each
//! correspond one-to-one, in order, with the connection's outgoing and
//! incoming header frames. Reordering or dropping a block desynchronizes
//! the peer permanently; any [`decode()`] error is fatal to the
//! connection.
//!
//! ## Decoded pieces
//!
//! [`decode()`] yields [`HeaderPiece`]s that borrow the codec's internal
//! decompression buffer, alternating name, value, name, value. Headers
//! that were joined on the wire come back expanded into repeated pairs
//! flagged as multi-valued. The pieces stay valid until the next call on
//! the codec, which the borrow checker enforces.
//!
//! [`encode()`]: HeaderCodec::encode
//! [`decode()`]: HeaderCodec::decode

#![warn(missing_docs)]
#![warn(unused_qualifications)]

#[macro_use]
extern crate log;

use std::borrow::Cow;

use std::fmt;

use std::rc::Rc;

/// Cap on the decompressed size of a single header block, unless
/// overridden with [`Config::set_max_uncompressed()`].
pub const DEFAULT_MAX_UNCOMPRESSED: usize = 128 * 1024;

/// A specialized [`Result`] type for header codec operations.
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
pub type Result<T> = std::result::Result<T, Error>;

/// A header block decoding error.
///
/// Every variant is fatal to the connection: the inflate stream is left in
/// an undefined state and the session must tear the connection down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The stream requested its preset dictionary and installing it
    /// failed.
    InflateDictionary,

    /// The block is not a valid continuation of the connection's
    /// compressed stream, or its decompressed framing was malformed.
    BadEncoding,

    /// The decompressed block exceeded the configured cap, or the expanded
    /// header lines exceeded their fixed ceiling.
    HeadersTooLarge,

    /// A name of length zero appeared at a name slot.
    EmptyHeaderName,

    /// A value, or one of the NUL-joined segments of a value, was empty.
    EmptyHeaderValue,

    /// A header name contained a byte outside printable ASCII, or an
    /// uppercase letter.
    InvalidHeaderValue,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<octets::BufferTooShortError> for Error {
    fn from(_err: octets::BufferTooShortError) -> Self {
        Error::BadEncoding
    }
}

/// A trait for types with associated string name and value.
pub trait NameValue {
    /// Returns the object's name.
    fn name(&self) -> &[u8];

    /// Returns the object's value.
    fn value(&self) -> &[u8];
}

/// An owned name-value pair representing a raw HTTP header.
///
/// The classification code of well-known names is computed once at
/// construction, so the encoder's sort mostly compares integers instead of
/// names.
#[derive(Clone, PartialEq, Eq)]
pub struct Header {
    code: u8,
    name: Vec<u8>,
    value: Vec<u8>,
}

impl Header {
    /// Creates a new header.
    ///
    /// Both `name` and `value` will be cloned.
    pub fn new(name: &[u8], value: &[u8]) -> Self {
        Self {
            code: static_table::classify(name),
            name: name.to_vec(),
            value: value.to_vec(),
        }
    }

    pub(crate) fn code(&self) -> u8 {
        self.code
    }
}

impl NameValue for Header {
    fn name(&self) -> &[u8] {
        &self.name
    }

    fn value(&self) -> &[u8] {
        &self.value
    }
}

fn try_print_as_readable(hdr: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    match std::str::from_utf8(hdr) {
        Ok(s) => f.write_str(&s.escape_default().to_string()),
        Err(_) => write!(f, "{hdr:?}"),
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        try_print_as_readable(&self.name, f)?;
        f.write_str(": ")?;
        try_print_as_readable(&self.value, f)?;
        f.write_str("\"")
    }
}

/// A decoded header name or value.
///
/// Pieces normally borrow the codec's decompression buffer and stay valid
/// until the next call on the codec; a piece the parser had to copy owns
/// its bytes instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderPiece<'a> {
    bytes: Cow<'a, [u8]>,

    multi_valued: bool,
}

impl<'a> HeaderPiece<'a> {
    pub(crate) fn new(bytes: &'a [u8], multi_valued: bool) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            multi_valued,
        }
    }

    /// Returns the piece's bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `true` when the piece owns its storage instead of borrowing
    /// the codec's buffer.
    pub fn is_owned(&self) -> bool {
        matches!(self.bytes, Cow::Owned(_))
    }

    /// Returns `true` when the piece came from re-expanding a NUL-joined
    /// multi-value header, so downstream code can reconstruct the repeated
    /// headers.
    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }
}

impl AsRef<[u8]> for HeaderPiece<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// The codec family a stats record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecType {
    /// Dictionary-primed DEFLATE, as used for SPDY header blocks.
    Gzip,
}

/// Compressed and uncompressed sizes of one header block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodedSize {
    /// Bytes on the wire.
    pub compressed: usize,

    /// Bytes of the serialized uncompressed image.
    pub uncompressed: usize,
}

/// A sink for per-block codec statistics.
pub trait StatsSink {
    /// Records the sizes of a block produced by an encode.
    fn record_encode(&self, codec: CodecType, size: EncodedSize);

    /// Records the sizes of a block consumed by a decode.
    fn record_decode(&self, codec: CodecType, size: EncodedSize);
}

/// Codec configuration.
pub struct Config {
    version: Version,
    compression_level: i32,
    max_uncompressed: usize,
    encode_headroom: usize,
}

impl Config {
    /// Creates a config for the given SPDY version with default settings.
    pub fn new(version: Version) -> Config {
        Config {
            version,
            compression_level: DEFAULT_COMPRESSION,
            max_uncompressed: DEFAULT_MAX_UNCOMPRESSED,
            encode_headroom: 0,
        }
    }

    /// Sets the zlib compression level.
    ///
    /// Levels run from `0` to `9`; the default is [`DEFAULT_COMPRESSION`],
    /// and [`NO_COMPRESSION`] disables compression entirely.
    pub fn set_compression_level(&mut self, v: i32) {
        self.compression_level = v;
    }

    /// Sets the cap on the decompressed size of a single header block.
    ///
    /// The default is [`DEFAULT_MAX_UNCOMPRESSED`].
    pub fn set_max_uncompressed(&mut self, v: usize) {
        self.max_uncompressed = v;
    }

    /// Reserves bytes at the front of every encoded block for the caller
    /// to fill with framing.
    ///
    /// The default is `0`.
    pub fn set_encode_headroom(&mut self, v: usize) {
        self.encode_headroom = v;
    }
}

/// A SPDY Name/Value header block codec bound to one connection.
///
/// The codec owns one deflate and one inflate stream cloned from
/// per-thread templates; both windows persist across calls, so blocks must
/// be encoded and decoded in connection order. Instances are not `Send`
/// and belong to the connection's owning thread.
pub struct HeaderCodec {
    encoder: Encoder,
    decoder: Decoder,
}

impl HeaderCodec {
    /// Creates a codec for a freshly negotiated connection.
    pub fn new(config: &Config) -> HeaderCodec {
        HeaderCodec {
            encoder: Encoder::new(
                config.version,
                config.compression_level,
                config.encode_headroom,
            ),
            decoder: Decoder::new(
                config.version,
                config.compression_level,
                config.max_uncompressed,
            ),
        }
    }

    /// Serializes and compresses a header list into one contiguous block.
    ///
    /// See [`Encoder::encode()`].
    pub fn encode(&mut self, headers: &mut [Header]) -> Vec<u8> {
        self.encoder.encode(headers)
    }

    /// Decompresses and parses one header block of `length` bytes read
    /// from `b`.
    ///
    /// See [`Decoder::decode()`].
    pub fn decode<'a>(
        &'a mut self, b: &mut octets::Octets, length: usize,
    ) -> Result<HeaderDecodeResult<'a>> {
        self.decoder.decode(b, length)
    }

    /// Sizes observed by the most recent [`encode()`](Self::encode) call.
    pub fn encoded_size(&self) -> EncodedSize {
        self.encoder.encoded_size()
    }

    /// Sizes observed by the most recent [`decode()`](Self::decode) call.
    pub fn decoded_size(&self) -> EncodedSize {
        self.decoder.decoded_size()
    }

    /// Installs a sink that receives the sizes of every block the codec
    /// processes.
    pub fn set_stats_sink(&mut self, stats: Rc<dyn StatsSink>) {
        self.encoder.set_stats_sink(Rc::clone(&stats));
        self.decoder.set_stats_sink(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;

    fn codec(version: Version) -> HeaderCodec {
        HeaderCodec::new(&Config::new(version))
    }

    fn decode_pairs(
        codec: &mut HeaderCodec, block: &[u8],
    ) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut b = octets::Octets::with_slice(block);
        let decoded = codec.decode(&mut b, block.len()).unwrap();

        decoded
            .pieces
            .chunks(2)
            .map(|c| (c[0].as_slice().to_vec(), c[1].as_slice().to_vec()))
            .collect()
    }

    /// Deterministic NUL-free filler that only ever matches itself.
    fn noise(len: usize, mut seed: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);

        for _ in 0..len {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            out.push(((seed >> 24) as u8).max(1));
        }

        out
    }

    #[test]
    fn encode_decode() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let mut headers = vec![
            Header::new(b":method", b"GET"),
            Header::new(b":path", b"/index.html"),
            Header::new(b"host", b"example.org"),
            Header::new(b"accept-encoding", b"gzip, deflate"),
            Header::new(b"user-agent", b"Mozilla/5.0 (X11; Linux x86_64)"),
        ];

        let block = tx.encode(&mut headers);

        let pairs = decode_pairs(&mut rx, &block);

        assert_eq!(pairs.len(), 5);

        // Unknown pseudo-headers sort ahead of the classified names.
        assert_eq!(pairs[0].0, b":method");
        assert_eq!(pairs[0].1, b"GET");
        assert_eq!(pairs[1].0, b":path");
        assert_eq!(pairs[2].0, b"accept-encoding");
        assert_eq!(pairs[3].0, b"host");
        assert_eq!(pairs[3].1, b"example.org");
        assert_eq!(pairs[4].0, b"user-agent");
    }

    #[test]
    fn combine_duplicate_headers() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let mut headers = vec![
            Header::new(b"host", b"a"),
            Header::new(b"host", b"b"),
            Header::new(b"accept", b"*/*"),
        ];

        let block = tx.encode(&mut headers);

        // Two unique names on the wire.
        assert_eq!(tx.encoded_size().uncompressed, 36);

        let mut b = octets::Octets::with_slice(&block);
        let decoded = rx.decode(&mut b, block.len()).unwrap();

        assert_eq!(decoded.consumed, block.len());
        assert_eq!(decoded.pieces.len(), 6);

        let values: Vec<&[u8]> =
            decoded.pieces.iter().map(|p| p.as_slice()).collect();
        assert_eq!(values, [
            &b"accept"[..],
            b"*/*",
            b"host",
            b"a",
            b"host",
            b"b"
        ]);

        assert!(!decoded.pieces[0].is_multi_valued());
        assert!(!decoded.pieces[1].is_multi_valued());
        assert!(!decoded.pieces[2].is_multi_valued());
        assert!(decoded.pieces[3].is_multi_valued());
        assert!(decoded.pieces[4].is_multi_valued());
        assert!(decoded.pieces[5].is_multi_valued());
    }

    #[test]
    fn empty_header_list() {
        let mut tx = codec(Version::Spdy2);
        let mut rx = codec(Version::Spdy2);

        let block = tx.encode(&mut []);

        // The uncompressed image is just the two-byte zero count.
        assert_eq!(tx.encoded_size().uncompressed, 2);
        assert!(!block.is_empty());

        let mut b = octets::Octets::with_slice(&block);
        let decoded = rx.decode(&mut b, block.len()).unwrap();

        assert_eq!(decoded.pieces.len(), 0);
        assert_eq!(decoded.consumed, block.len());
    }

    #[test]
    fn empty_block() {
        let mut rx = codec(Version::Spdy3);

        let mut b = octets::Octets::with_slice(&[]);
        let decoded = rx.decode(&mut b, 0).unwrap();

        assert_eq!(decoded.pieces.len(), 0);
        assert_eq!(decoded.consumed, 0);
    }

    #[test]
    fn lower_case() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let mut headers = vec![Header::new(b"X-Foo", b"1")];
        let block = tx.encode(&mut headers);

        let pairs = decode_pairs(&mut rx, &block);
        assert_eq!(pairs, [(b"x-foo".to_vec(), b"1".to_vec())]);
    }

    #[test]
    fn round_trip_all_versions() {
        for version in [Version::Spdy2, Version::Spdy3, Version::Spdy31] {
            let mut tx = codec(version);
            let mut rx = codec(version);

            let mut headers = vec![
                Header::new(b"content-type", b"text/html"),
                Header::new(b"set-cookie", b"a=1"),
                Header::new(b"set-cookie", b"b=2"),
            ];

            let block = tx.encode(&mut headers);

            let pairs = decode_pairs(&mut rx, &block);
            assert_eq!(pairs, [
                (b"content-type".to_vec(), b"text/html".to_vec()),
                (b"set-cookie".to_vec(), b"a=1".to_vec()),
                (b"set-cookie".to_vec(), b"b=2".to_vec()),
            ]);
        }
    }

    #[test]
    fn garbage_block() {
        let mut rx = codec(Version::Spdy3);

        let garbage = b"garbage!";

        let mut b = octets::Octets::with_slice(garbage);
        assert_eq!(
            rx.decode(&mut b, garbage.len()).err(),
            Some(Error::BadEncoding)
        );
    }

    #[test]
    fn inflate_size_cap() {
        // The uncompressed image is exactly 117 bytes: count, one name of
        // five bytes, one value of a hundred, and three length fields.
        let mut headers = vec![Header::new(b"x-pad", &[b'a'; 100][..])];

        let mut tx = codec(Version::Spdy3);
        let block = tx.encode(&mut headers);
        assert_eq!(tx.encoded_size().uncompressed, 117);

        let mut config = Config::new(Version::Spdy3);
        config.set_max_uncompressed(117);
        let mut rx = HeaderCodec::new(&config);

        let mut b = octets::Octets::with_slice(&block);
        assert!(rx.decode(&mut b, block.len()).is_ok());

        let mut config = Config::new(Version::Spdy3);
        config.set_max_uncompressed(116);
        let mut rx = HeaderCodec::new(&config);

        let mut b = octets::Octets::with_slice(&block);
        assert_eq!(
            rx.decode(&mut b, block.len()).err(),
            Some(Error::HeadersTooLarge)
        );
    }

    #[test]
    fn expanded_size_cap() {
        // 5000 copies of one name: the expansion re-creates the name for
        // every extra value and blows past the 80 KiB line ceiling while
        // the decompressed image stays well under the block cap.
        let mut headers: Vec<Header> = (0..5000)
            .map(|i| {
                Header::new(b"x", format!("value{i:014}").as_bytes())
            })
            .collect();

        let mut tx = codec(Version::Spdy3);
        let block = tx.encode(&mut headers);

        let mut rx = codec(Version::Spdy3);
        let mut b = octets::Octets::with_slice(&block);
        assert_eq!(
            rx.decode(&mut b, block.len()).err(),
            Some(Error::HeadersTooLarge)
        );
    }

    #[test]
    fn smuggled_empty_name() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        // The encoder does not police names; the decoder must.
        let block = tx.encode(&mut [Header::new(b"", b"v")]);

        let mut b = octets::Octets::with_slice(&block);
        assert_eq!(
            rx.decode(&mut b, block.len()).err(),
            Some(Error::EmptyHeaderName)
        );
    }

    #[test]
    fn smuggled_invalid_name() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let block = tx.encode(&mut [Header::new(b"\x7ffoo", b"v")]);

        let mut b = octets::Octets::with_slice(&block);
        assert_eq!(
            rx.decode(&mut b, block.len()).err(),
            Some(Error::InvalidHeaderValue)
        );
    }

    #[test]
    fn smuggled_empty_value_segment() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let block = tx.encode(&mut [Header::new(b"x", b"\x00a")]);

        let mut b = octets::Octets::with_slice(&block);
        assert_eq!(
            rx.decode(&mut b, block.len()).err(),
            Some(Error::EmptyHeaderValue)
        );
    }

    #[test]
    fn out_of_order_block_fails() {
        let mut tx = codec(Version::Spdy3);

        let e1 = tx.encode(&mut [Header::new(b"host", b"a")]);
        let e2 = tx.encode(&mut [Header::new(b"host", b"b")]);

        assert!(!e1.is_empty());

        // A continuation block on a fresh stream is missing the zlib
        // header and must be rejected.
        let mut rx = codec(Version::Spdy3);
        let mut b = octets::Octets::with_slice(&e2);
        assert_eq!(
            rx.decode(&mut b, e2.len()).err(),
            Some(Error::BadEncoding)
        );
    }

    #[test]
    fn dropped_block_fails() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let e1 = tx.encode(&mut [Header::new(b"via", b"a")]);

        // A block bigger than what the decoder has ever seen, so the
        // follow-up block's back-references reach beyond the history the
        // decoder holds once this one goes missing.
        let payload = noise(1600, 7);
        let e2 = tx.encode(&mut [Header::new(b"x-blob", &payload)]);
        assert!(!e2.is_empty());

        let e3 = tx.encode(&mut [Header::new(b"x-blob", &payload)]);

        let mut b = octets::Octets::with_slice(&e1);
        assert!(rx.decode(&mut b, e1.len()).is_ok());

        // e2 is never delivered.
        let mut b = octets::Octets::with_slice(&e3);
        assert_eq!(
            rx.decode(&mut b, e3.len()).err(),
            Some(Error::BadEncoding)
        );
    }

    #[test]
    fn window_carries_across_blocks() {
        let mut tx = codec(Version::Spdy3);

        let headers = vec![
            Header::new(b"user-agent", b"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)"),
            Header::new(b"accept", b"text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            Header::new(b"accept-language", b"en-US,en;q=0.5"),
        ];

        let e1 = tx.encode(&mut headers.clone());
        let e2 = tx.encode(&mut headers.clone());

        // The second block is nothing but back-references into the window
        // the first one left behind.
        assert!(e2.len() < e1.len());
    }

    #[test]
    fn first_block_loads_dictionary() {
        // A fresh inflate stream must survive the deferred-dictionary
        // handshake on the very first block of the connection.
        let mut tx = codec(Version::Spdy2);
        let mut rx = codec(Version::Spdy2);

        let mut headers = vec![Header::new(b"method", b"get")];
        let block = tx.encode(&mut headers);

        let pairs = decode_pairs(&mut rx, &block);
        assert_eq!(pairs, [(b"method".to_vec(), b"get".to_vec())]);
    }

    #[test]
    fn no_compression_level() {
        let mut config = Config::new(Version::Spdy3);
        config.set_compression_level(NO_COMPRESSION);

        let mut tx = HeaderCodec::new(&config);
        let mut rx = HeaderCodec::new(&config);

        let mut headers = vec![Header::new(b"host", b"example.org")];
        let block = tx.encode(&mut headers);

        let pairs = decode_pairs(&mut rx, &block);
        assert_eq!(pairs, [(b"host".to_vec(), b"example.org".to_vec())]);
    }

    #[test]
    fn encode_headroom() {
        let mut config = Config::new(Version::Spdy3);
        config.set_encode_headroom(8);

        let mut tx = HeaderCodec::new(&config);
        let mut rx = codec(Version::Spdy3);

        let mut headers = vec![Header::new(b"host", b"x")];
        let block = tx.encode(&mut headers);

        assert!(block.len() > 8);
        assert_eq!(&block[..8], &[0; 8]);

        let mut b = octets::Octets::with_slice(&block[8..]);
        let decoded = rx.decode(&mut b, block.len() - 8).unwrap();
        assert_eq!(decoded.pieces.len(), 2);
    }

    #[test]
    fn consumes_exactly_the_block() {
        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);

        let mut block = tx.encode(&mut [Header::new(b"host", b"x")]);
        let mark = block.len();
        block.extend_from_slice(b"NEXT FRAME");

        let mut b = octets::Octets::with_slice(&block);
        let decoded = rx.decode(&mut b, mark).unwrap();

        assert_eq!(decoded.consumed, mark);
        assert_eq!(b.off(), mark);
    }

    #[derive(Default)]
    struct RecordingSink {
        encodes: RefCell<Vec<(CodecType, EncodedSize)>>,
        decodes: RefCell<Vec<(CodecType, EncodedSize)>>,
    }

    impl StatsSink for RecordingSink {
        fn record_encode(&self, codec: CodecType, size: EncodedSize) {
            self.encodes.borrow_mut().push((codec, size));
        }

        fn record_decode(&self, codec: CodecType, size: EncodedSize) {
            self.decodes.borrow_mut().push((codec, size));
        }
    }

    #[test]
    fn stats_sink() {
        let sink = Rc::new(RecordingSink::default());

        let mut tx = codec(Version::Spdy3);
        let mut rx = codec(Version::Spdy3);
        tx.set_stats_sink(sink.clone());
        rx.set_stats_sink(sink.clone());

        let mut headers = vec![Header::new(b"host", b"example.org")];
        let block = tx.encode(&mut headers);

        {
            let mut b = octets::Octets::with_slice(&block);
            rx.decode(&mut b, block.len()).unwrap();
        }

        let encodes = sink.encodes.borrow();
        assert_eq!(encodes.len(), 1);
        assert_eq!(encodes[0].0, CodecType::Gzip);
        assert_eq!(encodes[0].1, tx.encoded_size());
        assert_eq!(encodes[0].1.compressed, block.len());

        let decodes = sink.decodes.borrow();
        assert_eq!(decodes.len(), 1);
        assert_eq!(decodes[0].0, CodecType::Gzip);
        assert_eq!(decodes[0].1.compressed, block.len());
        assert_eq!(
            decodes[0].1.uncompressed,
            tx.encoded_size().uncompressed
        );
    }
}

pub use crate::decoder::Decoder;
pub use crate::decoder::HeaderDecodeResult;
pub use crate::encoder::Encoder;
pub use crate::settings::IntWidth;
pub use crate::settings::Version;
pub use crate::settings::VersionSettings;
pub use crate::settings::MAX_FRAME_LENGTH;
pub use crate::zlib::DEFAULT_COMPRESSION;
pub use crate::zlib::NO_COMPRESSION;

mod decoder;
mod dictionary;
mod encoder;
mod settings;
mod static_table;
mod zlib;
