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


use std::rc::Rc;

use crate::settings;
use crate::settings::Version;
use crate::settings::VersionSettings;
use crate::zlib;
use crate::zlib::InflateStatus;
use crate::CodecType;
use crate::EncodedSize;
use crate::Error;
use crate::HeaderPiece;
use crate::Result;
use crate::StatsSink;

/// Maximum size of header names plus values after expanding multi-value
/// headers.
const MAX_EXPANDED_HEADER_LINE_BYTES: usize = 80 * 1024;

/// A SPDY Name/Value header block decoder.
///
/// The INFLATE stream persists across [`decode()`] calls, so blocks must be
/// fed in the order the peer produced them. Any decode error leaves the
/// stream in an undefined state and is fatal to the connection.
///
/// [`decode()`]: Decoder::decode
pub struct Decoder {
    settings: &'static VersionSettings,

    inflater: zlib::Inflater,

    max_uncompressed: usize,

    scratch: Vec<u8>,

    decoded_size: EncodedSize,

    stats: Option<Rc<dyn StatsSink>>,
}

/// The outcome of decoding one header block.
pub struct HeaderDecodeResult<'a> {
    /// The decoded name and value pieces, alternating, with multi-value
    /// headers expanded back into repeated pairs.
    pub pieces: Vec<HeaderPiece<'a>>,

    /// Input bytes consumed, always the full block length on success.
    pub consumed: usize,
}

impl Decoder {
    /// Creates a decoder for one direction of a freshly negotiated
    /// connection.
    ///
    /// `max_uncompressed` caps the decompressed size of a single block.
    pub fn new(
        version: Version, compression_level: i32, max_uncompressed: usize,
    ) -> Decoder {
        Decoder {
            settings: version.settings(),
            inflater: zlib::clone_inflater(version, compression_level),
            max_uncompressed,
            scratch: Vec::new(),
            decoded_size: EncodedSize::default(),
            stats: None,
        }
    }

    /// Decompresses and parses one header block of `length` bytes read
    /// from `b`.
    ///
    /// The returned pieces borrow the decoder's decompression buffer and
    /// are valid until the next call on this decoder.
    pub fn decode<'a>(
        &'a mut self, b: &mut octets::Octets, length: usize,
    ) -> Result<HeaderDecodeResult<'a>> {
        // An empty block decodes to an empty header list.
        if length == 0 {
            return Ok(HeaderDecodeResult {
                pieces: Vec::new(),
                consumed: 0,
            });
        }

        let input = b.get_bytes(length)?.buf();

        if self.scratch.len() <= self.max_uncompressed {
            // One byte past the cap, so a block that inflates beyond it is
            // caught without retaining any more of the buffer.
            self.scratch.resize(self.max_uncompressed + 1, 0);
        }

        let mut filled = 0;
        let mut pos = 0;

        loop {
            let res = self
                .inflater
                .inflate(&input[pos..], &mut self.scratch[filled..]);

            pos += res.consumed;
            filled += res.produced;

            match res.status {
                InflateStatus::NeedsDictionary => {
                    // The dictionary cannot be installed before inflate asks
                    // for it, as installation verifies the dictionary's
                    // adler-32 against the one in the stream.
                    if let Err(rc) =
                        self.inflater.set_dictionary(self.settings.dict)
                    {
                        error!("inflate set dictionary failed with error={rc}");
                        return Err(Error::InflateDictionary);
                    }

                    continue;
                },

                InflateStatus::Error(rc) => {
                    error!("inflate failed with error={rc}");
                    return Err(Error::BadEncoding);
                },

                InflateStatus::Ok => (),
            }

            if filled > self.max_uncompressed {
                error!("decompressed headers too large");
                return Err(Error::HeadersTooLarge);
            }

            if pos >= input.len() {
                break;
            }
        }

        self.decoded_size = EncodedSize {
            compressed: length,
            uncompressed: filled,
        };

        if let Some(stats) = &self.stats {
            stats.record_decode(CodecType::Gzip, self.decoded_size);
        }

        let (pieces, expanded) =
            parse_name_values(self.settings, &self.scratch[..filled])?;

        if expanded > MAX_EXPANDED_HEADER_LINE_BYTES {
            error!("expanded headers too large");
            return Err(Error::HeadersTooLarge);
        }

        Ok(HeaderDecodeResult {
            pieces,
            consumed: length,
        })
    }

    /// Sizes observed by the most recent [`decode()`](Self::decode) call.
    pub fn decoded_size(&self) -> EncodedSize {
        self.decoded_size
    }

    /// Installs a sink that receives the sizes of every decoded block.
    pub fn set_stats_sink(&mut self, stats: Rc<dyn StatsSink>) {
        self.stats = Some(stats);
    }
}

/// Walks the decompressed image and expands multi-value headers, returning
/// the pieces and the number of bytes the expansion added.
fn parse_name_values<'a>(
    settings: &VersionSettings, buf: &'a [u8],
) -> Result<(Vec<HeaderPiece<'a>>, usize)> {
    let mut b = octets::Octets::with_slice(buf);
    let w = settings.int_width;

    let num_nv = settings::get_size(&mut b, w)?;

    let mut out = Vec::new();
    let mut expanded = 0;

    for _ in 0..num_nv {
        let len = settings::get_size(&mut b, w)? as usize;
        if len == 0 {
            error!("empty header name");
            return Err(Error::EmptyHeaderName);
        }

        let name = b.get_bytes(len)?.buf();

        for &c in name {
            if !(0x20..=0x7e).contains(&c) || c.is_ascii_uppercase() {
                error!("invalid header value");
                return Err(Error::InvalidHeaderValue);
            }
        }

        out.push(HeaderPiece::new(name, false));

        let len = settings::get_size(&mut b, w)? as usize;
        let value = b.get_bytes(len)?.buf();

        if !value.contains(&0) {
            out.push(HeaderPiece::new(value, false));
            continue;
        }

        // The value joins several headers of this name; split it back
        // apart, duplicating the name for each extra piece.
        let mut first = true;

        for segment in value.split(|&c| c == 0) {
            if segment.is_empty() {
                error!("empty header value");
                return Err(Error::EmptyHeaderValue);
            }

            if first {
                out.push(HeaderPiece::new(segment, true));
                first = false;
            } else {
                out.push(HeaderPiece::new(name, true));
                out.push(HeaderPiece::new(segment, true));

                expanded += name.len() + segment.len();
            }
        }
    }

    Ok((out, expanded))
}
