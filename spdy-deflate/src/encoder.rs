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
use crate::CodecType;
use crate::EncodedSize;
use crate::Header;
use crate::NameValue;
use crate::StatsSink;

/// A SPDY Name/Value header block encoder.
///
/// The DEFLATE stream persists across [`encode()`] calls, so blocks must be
/// delivered to the peer in the order they were produced.
///
/// [`encode()`]: Encoder::encode
pub struct Encoder {
    settings: &'static VersionSettings,

    deflater: zlib::Deflater,

    headroom: usize,

    uncompressed: Vec<u8>,

    encoded_size: EncodedSize,

    stats: Option<Rc<dyn StatsSink>>,
}

impl Encoder {
    /// Creates an encoder for one direction of a freshly negotiated
    /// connection.
    ///
    /// `headroom` bytes are reserved at the front of every encoded block
    /// for the caller's frame header.
    pub fn new(
        version: Version, compression_level: i32, headroom: usize,
    ) -> Encoder {
        Encoder {
            settings: version.settings(),
            deflater: zlib::clone_deflater(version, compression_level),
            headroom,
            uncompressed: Vec::new(),
            encoded_size: EncodedSize::default(),
            stats: None,
        }
    }

    /// Serializes and compresses a header list into one contiguous block.
    ///
    /// `headers` is sorted in place to group duplicate names; values of
    /// repeated headers are joined with NUL separators on the wire. The
    /// first `headroom` bytes of the returned buffer are left zeroed for
    /// the caller to fill with framing.
    pub fn encode(&mut self, headers: &mut [Header]) -> Vec<u8> {
        let uncompressed_len = self.serialize(headers);

        let bound = self.deflater.bound(uncompressed_len);

        let mut out = vec![0; self.headroom + bound];

        let written = self.deflater.compress(
            &self.uncompressed[..uncompressed_len],
            &mut out[self.headroom..],
        );

        out.truncate(self.headroom + written);

        trace!(
            "header block orig={} max deflated={} actual deflated={}",
            uncompressed_len,
            bound,
            written
        );

        self.encoded_size = EncodedSize {
            compressed: written,
            uncompressed: uncompressed_len,
        };

        if let Some(stats) = &self.stats {
            stats.record_encode(CodecType::Gzip, self.encoded_size);
        }

        out
    }

    /// Sizes observed by the most recent [`encode()`](Self::encode) call.
    pub fn encoded_size(&self) -> EncodedSize {
        self.encoded_size
    }

    /// Installs a sink that receives the sizes of every encoded block.
    pub fn set_stats_sink(&mut self, stats: Rc<dyn StatsSink>) {
        self.stats = Some(stats);
    }

    /// Writes the uncompressed Name/Value image of `headers` into the
    /// scratch buffer and returns its length.
    fn serialize(&mut self, headers: &mut [Header]) -> usize {
        // Group duplicate names together so their values can be joined.
        // The sort is stable: repeated headers keep the order the caller
        // gave them.
        headers.sort_by(|a, b| {
            a.code().cmp(&b.code()).then_with(|| a.name().cmp(b.name()))
        });

        let w = self.settings.int_width;

        // Upper bound on the image size; joining values only ever shrinks
        // it.
        let mut max = w.size();
        for h in headers.iter() {
            max += 2 * w.size() + h.name().len() + h.value().len();
        }

        if self.uncompressed.len() < max {
            self.uncompressed.resize(max, 0);
        }

        let buf = &mut self.uncompressed[..];

        // The unique-name count goes in front once it is known.
        let mut off = w.size();
        let mut num_headers: u32 = 0;

        let mut prev: Option<usize> = None;
        let mut value_len_off = 0;
        let mut value_len = 0u32;

        for i in 0..headers.len() {
            let merge = prev.map_or(false, |p| {
                headers[p].code() == headers[i].code() &&
                    headers[p].name() == headers[i].name()
            });

            let name = headers[i].name();
            let value = headers[i].value();

            if !merge {
                num_headers += 1;

                off = settings::put_size_at(buf, off, w, name.len() as u32);

                let dst = &mut buf[off..off + name.len()];
                dst.copy_from_slice(name);
                dst.make_ascii_lowercase();
                off += name.len();

                value_len_off = off;
                value_len = value.len() as u32;

                off = settings::put_size_at(buf, off, w, value_len);
                buf[off..off + value.len()].copy_from_slice(value);
                off += value.len();
            } else {
                buf[off] = 0;
                off += 1;

                buf[off..off + value.len()].copy_from_slice(value);
                off += value.len();

                // Stretch the joined value's length field in place.
                value_len += 1 + value.len() as u32;
                settings::put_size_at(buf, value_len_off, w, value_len);
            }

            prev = Some(i);
        }

        settings::put_size_at(buf, 0, w, num_headers);

        off
    }
}
