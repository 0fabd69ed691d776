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


//! Per-version SPDY wire constants.

use crate::dictionary;

/// Largest legal SPDY control frame, as bounded by the 24-bit length field.
pub const MAX_FRAME_LENGTH: u32 = (1 << 24) - 1;

/// A SPDY protocol version.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Version {
    /// SPDY/2.
    Spdy2,

    /// SPDY/3.
    Spdy3,

    /// SPDY/3.1.
    Spdy31,
}

impl Version {
    /// Returns the wire constants for this version.
    pub fn settings(self) -> &'static VersionSettings {
        match self {
            Version::Spdy2 => &SPDY2_SETTINGS,
            Version::Spdy3 => &SPDY3_SETTINGS,
            Version::Spdy31 => &SPDY31_SETTINGS,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Version::Spdy2 => write!(f, "SPDY/2"),
            Version::Spdy3 => write!(f, "SPDY/3"),
            Version::Spdy31 => write!(f, "SPDY/3.1"),
        }
    }
}

/// Width of the integer fields of a Name/Value block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntWidth {
    /// 16-bit lengths and counts (SPDY/2).
    Two,

    /// 32-bit lengths and counts (SPDY/3.x).
    Four,
}

impl IntWidth {
    /// Returns the width in bytes.
    pub const fn size(self) -> usize {
        match self {
            IntWidth::Two => 2,
            IntWidth::Four => 4,
        }
    }
}

/// Wire constants for one SPDY version.
pub struct VersionSettings {
    /// The version the constants belong to.
    pub version: Version,

    /// DEFLATE preload dictionary for Name/Value blocks.
    pub dict: &'static [u8],

    /// Width of the length and count fields inside a block.
    pub int_width: IntWidth,

    /// Largest frame the framing layer will accept.
    pub max_frame_len: u32,
}

const SPDY2_SETTINGS: VersionSettings = VersionSettings {
    version: Version::Spdy2,
    dict: dictionary::SPDY2_DICTIONARY,
    int_width: IntWidth::Two,
    max_frame_len: MAX_FRAME_LENGTH,
};

const SPDY3_SETTINGS: VersionSettings = VersionSettings {
    version: Version::Spdy3,
    dict: dictionary::SPDY3_DICTIONARY,
    int_width: IntWidth::Four,
    max_frame_len: MAX_FRAME_LENGTH,
};

const SPDY31_SETTINGS: VersionSettings = VersionSettings {
    version: Version::Spdy31,
    dict: dictionary::SPDY3_DICTIONARY,
    int_width: IntWidth::Four,
    max_frame_len: MAX_FRAME_LENGTH,
};

/// Reads a width-`w` big-endian integer from the current offset and advances
/// the buffer.
pub(crate) fn get_size(
    b: &mut octets::Octets, w: IntWidth,
) -> octets::Result<u32> {
    match w {
        IntWidth::Two => Ok(u32::from(b.get_u16()?)),
        IntWidth::Four => b.get_u32(),
    }
}

/// Writes a width-`w` big-endian integer at the given offset and returns the
/// offset just past it.
pub(crate) fn put_size_at(
    buf: &mut [u8], off: usize, w: IntWidth, v: u32,
) -> usize {
    match w {
        IntWidth::Two =>
            buf[off..off + 2].copy_from_slice(&(v as u16).to_be_bytes()),

        IntWidth::Four => buf[off..off + 4].copy_from_slice(&v.to_be_bytes()),
    }

    off + w.size()
}
