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


//! Classification of well-known header names.
//!
//! The encoder sorts headers by classification code before merging
//! duplicates, so most name comparisons collapse to a single integer
//! compare. Unknown names take code 0 and sort ahead of every known name.

use std::cmp::Ordering;

/// Well-known header names, sorted by their byte representation.
///
/// A name's classification code is its position in this table plus one, so
/// codes order exactly the way the names do.
const KNOWN_HEADERS: [&[u8]; 53] = [
    b"accept",
    b"accept-charset",
    b"accept-encoding",
    b"accept-language",
    b"accept-ranges",
    b"age",
    b"allow",
    b"authorization",
    b"cache-control",
    b"connection",
    b"content-base",
    b"content-disposition",
    b"content-encoding",
    b"content-language",
    b"content-length",
    b"content-location",
    b"content-md5",
    b"content-range",
    b"content-type",
    b"cookie",
    b"date",
    b"etag",
    b"expect",
    b"expires",
    b"from",
    b"host",
    b"if-match",
    b"if-modified-since",
    b"if-none-match",
    b"if-range",
    b"if-unmodified-since",
    b"keep-alive",
    b"last-modified",
    b"location",
    b"max-forwards",
    b"origin",
    b"pragma",
    b"proxy-authenticate",
    b"proxy-authorization",
    b"range",
    b"referer",
    b"retry-after",
    b"server",
    b"set-cookie",
    b"te",
    b"trailer",
    b"transfer-encoding",
    b"upgrade",
    b"user-agent",
    b"vary",
    b"via",
    b"warning",
    b"www-authenticate",
];

/// Returns the classification code for a header name, ignoring ASCII case.
pub(crate) fn classify(name: &[u8]) -> u8 {
    match KNOWN_HEADERS.binary_search_by(|probe| cmp_lower(probe, name)) {
        Ok(idx) => (idx + 1) as u8,

        Err(_) => 0,
    }
}

/// Compares a lowercase table entry against a name of any case.
fn cmp_lower(probe: &[u8], name: &[u8]) -> Ordering {
    let len = std::cmp::min(probe.len(), name.len());

    for i in 0..len {
        match probe[i].cmp(&name[i].to_ascii_lowercase()) {
            Ordering::Equal => (),

            other => return other,
        }
    }

    probe.len().cmp(&name.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for pair in KNOWN_HEADERS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn known_names() {
        assert_eq!(classify(b"accept"), 1);
        assert_eq!(classify(b"www-authenticate"), KNOWN_HEADERS.len() as u8);
        assert_ne!(classify(b"host"), 0);
        assert_ne!(classify(b"set-cookie"), 0);
    }

    #[test]
    fn unknown_names() {
        assert_eq!(classify(b"x-forwarded-for"), 0);
        assert_eq!(classify(b""), 0);
        assert_eq!(classify(b"hos"), 0);
        assert_eq!(classify(b"hostt"), 0);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify(b"Host"), classify(b"host"));
        assert_eq!(classify(b"ACCEPT-ENCODING"), classify(b"accept-encoding"));
    }

    #[test]
    fn codes_order_like_names() {
        let mut prev = 0;

        for name in KNOWN_HEADERS {
            let code = classify(name);
            assert!(code > prev);
            prev = code;
        }
    }
}
