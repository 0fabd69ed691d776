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


//! Thin safe wrapper around the zlib streams backing the codec.
//!
//! Setting up a compression stream is dominated by installing the preload
//! dictionary into the DEFLATE window, so fully initialized template
//! streams are kept in a per-thread cache and cloned into each codec
//! instance with `deflateCopy`/`inflateCopy`. Templates are never mutated
//! after construction and live for the lifetime of their thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::mem;
use std::os::raw::c_int;

use libz_sys as ffi;

use crate::settings::Version;

/// The zlib default compression level.
pub const DEFAULT_COMPRESSION: i32 = ffi::Z_DEFAULT_COMPRESSION;

/// The compression level that disables compression entirely.
pub const NO_COMPRESSION: i32 = ffi::Z_NO_COMPRESSION;

/// Memory level for the deflate state, the smallest zlib allows.
const MEM_LEVEL: c_int = 1;

/// Outcome of one inflate call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InflateStatus {
    /// The stream made progress.
    Ok,

    /// The stream wants its preset dictionary before it can continue.
    NeedsDictionary,

    /// The input is not a valid continuation of the stream.
    Error(i32),
}

/// Result of one inflate call.
pub struct InflateResult {
    /// Input bytes consumed.
    pub consumed: usize,

    /// Output bytes produced.
    pub produced: usize,

    /// What the stream reported.
    pub status: InflateStatus,
}

fn new_stream() -> Box<ffi::z_stream> {
    // A zeroed stream is the documented starting state: zlib swaps in its
    // default allocators for the Z_NULL ones on init. `mem::zeroed` itself
    // asserts against zero-initializing types with non-nullable fields (the
    // zalloc/zfree function pointers here), so the all-zero bytes are
    // written directly instead of going through that validity check.
    let mut strm = Box::new(mem::MaybeUninit::<ffi::z_stream>::uninit());
    unsafe {
        std::ptr::write_bytes(strm.as_mut_ptr(), 0, 1);
        mem::transmute::<Box<mem::MaybeUninit<ffi::z_stream>>, Box<ffi::z_stream>>(strm)
    }
}

/// A compression stream with a persistent window.
pub struct Deflater {
    strm: Box<ffi::z_stream>,
}

impl Deflater {
    fn new(level: i32) -> Deflater {
        let mut strm = new_stream();

        // Positive window bits select the zlib wrapper, which is what SPDY
        // peers expect. A 256-byte window is enough when nothing is being
        // compressed.
        let window_bits = if level == NO_COMPRESSION { 8 } else { 11 };

        let rc = unsafe {
            ffi::deflateInit2_(
                &mut *strm,
                level,
                ffi::Z_DEFLATED,
                window_bits,
                MEM_LEVEL,
                ffi::Z_DEFAULT_STRATEGY,
                ffi::zlibVersion(),
                mem::size_of::<ffi::z_stream>() as c_int,
            )
        };
        assert_eq!(rc, ffi::Z_OK, "deflateInit2 failed: {rc}");

        Deflater { strm }
    }

    fn set_dictionary(&mut self, dict: &[u8]) {
        let rc = unsafe {
            ffi::deflateSetDictionary(
                &mut *self.strm,
                dict.as_ptr(),
                dict.len() as ffi::uInt,
            )
        };
        assert_eq!(rc, ffi::Z_OK, "deflateSetDictionary failed: {rc}");
    }

    /// Clones the stream, window and all.
    pub fn duplicate(&mut self) -> Deflater {
        let mut strm = new_stream();

        let rc = unsafe { ffi::deflateCopy(&mut *strm, &mut *self.strm) };
        assert_eq!(rc, ffi::Z_OK, "deflateCopy failed: {rc}");

        Deflater { strm }
    }

    /// Upper bound on the compressed size of `len` input bytes.
    pub fn bound(&mut self, len: usize) -> usize {
        unsafe { ffi::deflateBound(&mut *self.strm, len as ffi::uLong) as usize }
    }

    /// Compresses all of `input` into `output` with a sync flush, so the
    /// produced bytes end on a byte boundary and the peer can consume them
    /// without waiting for more. Returns the number of bytes written.
    ///
    /// `output` must have room for [`bound()`](Self::bound) bytes; running
    /// out of space or failing to compress is a programming fault.
    pub fn compress(&mut self, input: &[u8], output: &mut [u8]) -> usize {
        self.strm.next_in = input.as_ptr() as *mut _;
        self.strm.avail_in = input.len() as ffi::uInt;
        self.strm.next_out = output.as_mut_ptr();
        self.strm.avail_out = output.len() as ffi::uInt;

        let rc = unsafe { ffi::deflate(&mut *self.strm, ffi::Z_SYNC_FLUSH) };
        assert_eq!(rc, ffi::Z_OK, "deflate failed: {rc}");
        assert_eq!(self.strm.avail_in, 0, "deflate left input unconsumed");

        output.len() - self.strm.avail_out as usize
    }
}

impl Drop for Deflater {
    fn drop(&mut self) {
        unsafe {
            ffi::deflateEnd(&mut *self.strm);
        }
    }
}

/// A decompression stream with a persistent window.
pub struct Inflater {
    strm: Box<ffi::z_stream>,
}

impl Inflater {
    fn new() -> Inflater {
        let mut strm = new_stream();

        let rc = unsafe {
            ffi::inflateInit_(
                &mut *strm,
                ffi::zlibVersion(),
                mem::size_of::<ffi::z_stream>() as c_int,
            )
        };
        assert_eq!(rc, ffi::Z_OK, "inflateInit failed: {rc}");

        Inflater { strm }
    }

    /// Clones the stream, window and all.
    pub fn duplicate(&mut self) -> Inflater {
        let mut strm = new_stream();

        let rc = unsafe { ffi::inflateCopy(&mut *strm, &mut *self.strm) };
        assert_eq!(rc, ffi::Z_OK, "inflateCopy failed: {rc}");

        Inflater { strm }
    }

    /// Installs the preset dictionary the stream just asked for.
    pub fn set_dictionary(&mut self, dict: &[u8]) -> Result<(), i32> {
        let rc = unsafe {
            ffi::inflateSetDictionary(
                &mut *self.strm,
                dict.as_ptr(),
                dict.len() as ffi::uInt,
            )
        };

        if rc == ffi::Z_OK {
            Ok(())
        } else {
            Err(rc)
        }
    }

    /// Decompresses as much of `input` into `output` as fits, without
    /// flushing.
    pub fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> InflateResult {
        self.strm.next_in = input.as_ptr() as *mut _;
        self.strm.avail_in = input.len() as ffi::uInt;
        self.strm.next_out = output.as_mut_ptr();
        self.strm.avail_out = output.len() as ffi::uInt;

        let rc = unsafe { ffi::inflate(&mut *self.strm, ffi::Z_NO_FLUSH) };

        let status = match rc {
            ffi::Z_OK => InflateStatus::Ok,

            ffi::Z_NEED_DICT => InflateStatus::NeedsDictionary,

            rc => InflateStatus::Error(rc),
        };

        InflateResult {
            consumed: input.len() - self.strm.avail_in as usize,
            produced: output.len() - self.strm.avail_out as usize,
            status,
        }
    }
}

impl Drop for Inflater {
    fn drop(&mut self) {
        unsafe {
            ffi::inflateEnd(&mut *self.strm);
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
struct TemplateKey {
    version: Version,
    level: i32,
}

struct ZlibContext {
    deflater: Deflater,
    inflater: Inflater,
}

impl ZlibContext {
    fn new(version: Version, level: i32) -> ZlibContext {
        let mut deflater = Deflater::new(level);

        // A stream that emits stored blocks only will never reference the
        // dictionary.
        if level != NO_COMPRESSION {
            deflater.set_dictionary(version.settings().dict);
        }

        ZlibContext {
            deflater,
            inflater: Inflater::new(),
        }
    }
}

std::thread_local! {
    static TEMPLATES: RefCell<HashMap<TemplateKey, ZlibContext>> =
        RefCell::new(HashMap::new());
}

fn with_template<F, R>(version: Version, level: i32, f: F) -> R
where
    F: FnOnce(&mut ZlibContext) -> R,
{
    TEMPLATES.with(|cache| {
        let mut cache = cache.borrow_mut();

        let ctx = cache
            .entry(TemplateKey { version, level })
            .or_insert_with(|| ZlibContext::new(version, level));

        f(ctx)
    })
}

/// Clones this thread's template compression stream for `(version, level)`,
/// building the template first if the thread has never seen the pair.
pub fn clone_deflater(version: Version, level: i32) -> Deflater {
    with_template(version, level, |ctx| ctx.deflater.duplicate())
}

/// Clones this thread's template decompression stream for `(version,
/// level)`, building the template first if the thread has never seen the
/// pair.
pub fn clone_inflater(version: Version, level: i32) -> Inflater {
    with_template(version, level, |ctx| ctx.inflater.duplicate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump(inf: &mut Inflater, dict: &[u8], input: &[u8]) -> Vec<u8> {
        let mut out = vec![0; 4096];
        let mut filled = 0;
        let mut pos = 0;

        loop {
            let res = inf.inflate(&input[pos..], &mut out[filled..]);
            pos += res.consumed;
            filled += res.produced;

            match res.status {
                InflateStatus::Ok => (),

                InflateStatus::NeedsDictionary =>
                    inf.set_dictionary(dict).unwrap(),

                InflateStatus::Error(rc) => panic!("inflate failed: {rc}"),
            }

            if pos >= input.len() {
                break;
            }
        }

        out.truncate(filled);
        out
    }

    #[test]
    fn roundtrip_with_dictionary() {
        let dict = Version::Spdy3.settings().dict;

        let mut def = clone_deflater(Version::Spdy3, DEFAULT_COMPRESSION);
        let mut inf = clone_inflater(Version::Spdy3, DEFAULT_COMPRESSION);

        let input = b"host: example.org, accept-encoding: gzip, deflate";
        let mut compressed = vec![0; def.bound(input.len())];
        let n = def.compress(input, &mut compressed);
        compressed.truncate(n);

        assert_eq!(pump(&mut inf, dict, &compressed), input);
    }

    #[test]
    fn roundtrip_without_compression() {
        let dict = Version::Spdy3.settings().dict;

        let mut def = clone_deflater(Version::Spdy3, NO_COMPRESSION);
        let mut inf = clone_inflater(Version::Spdy3, NO_COMPRESSION);

        let input = b"stored blocks only";
        let mut compressed = vec![0; def.bound(input.len())];
        let n = def.compress(input, &mut compressed);
        compressed.truncate(n);

        assert_eq!(pump(&mut inf, dict, &compressed), input);
    }

    #[test]
    fn bound_is_an_upper_bound() {
        let mut def = clone_deflater(Version::Spdy2, DEFAULT_COMPRESSION);

        for len in [0, 1, 100, 10_000] {
            assert!(def.bound(len) >= len.max(1));
        }
    }

    #[test]
    fn clones_are_independent() {
        let dict = Version::Spdy3.settings().dict;

        let mut a = clone_deflater(Version::Spdy3, DEFAULT_COMPRESSION);
        let mut b = clone_deflater(Version::Spdy3, DEFAULT_COMPRESSION);

        let input = b"identical streams compress identically";

        let mut out_a = vec![0; a.bound(input.len())];
        let n_a = a.compress(input, &mut out_a);

        // Drive `a` some more before using `b`. The clones must not share
        // window state.
        let mut scratch = vec![0; a.bound(input.len())];
        a.compress(input, &mut scratch);

        let mut out_b = vec![0; b.bound(input.len())];
        let n_b = b.compress(input, &mut out_b);

        assert_eq!(&out_a[..n_a], &out_b[..n_b]);

        let mut inf = clone_inflater(Version::Spdy3, DEFAULT_COMPRESSION);
        assert_eq!(pump(&mut inf, dict, &out_b[..n_b]), input);
    }
}
