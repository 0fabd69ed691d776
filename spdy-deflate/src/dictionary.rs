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

//! SPDY compression dictionaries.
//!
//! Every SPDY version seeds the DEFLATE sliding window with a fixed
//! dictionary of common HTTP tokens before the first header block is
//! written, so the very first frame of a connection already compresses
//! down to a few bytes per field.

/// Preload dictionary for SPDY/2 Name/Value blocks.
///
/// The trailing NUL is part of the dictionary: the protocol inherited it
/// from the original C string definition, typos and all.
pub const SPDY2_DICTIONARY: &[u8] = b"optionsgetheadpostputdeletetraceacceptaccept-charsetaccept-encodinga\
    ccept-languageauthorizationexpectfromhostif-modified-sinceif-matchif\
    -none-matchif-rangeif-unmodifiedsincemax-forwardsproxy-authorization\
    rangerefererteuser-agent10010120020120220320420520630030130230330430\
    53063074004014024034044054064074084094104114124134144154164175005015\
    02503504505accept-rangesageetaglocationproxy-authenticatepublicretry\
    -afterservervarywarningwww-authenticateallowcontent-basecontent-enco\
    dingcache-controlconnectiondatetrailertransfer-encodingupgradeviawar\
    ningcontent-languagecontent-lengthcontent-locationcontent-md5content\
    -rangecontent-typeetagexpireslast-modifiedset-cookieMondayTuesdayWed\
    nesdayThursdayFridaySaturdaySundayJanFebMarAprMayJunJulAugSepOctNovD\
    ecchunkedtext/htmlimage/pngimage/jpgimage/gifapplication/xmlapplicat\
    ion/xhtmltext/plainpublicmax-agecharset=iso-8859-1utf-8gzipdeflateHT\
    TP/1.1statusversionurl\x00";

/// Preload dictionary for SPDY/3 and SPDY/3.1 Name/Value blocks.
///
/// A run of length-prefixed common tokens followed by a blob of common
/// literal strings, 1423 bytes in total.
pub const SPDY3_DICTIONARY: &[u8] = b"\x00\x00\x00\x07options\x00\x00\x00\x04head\x00\x00\x00\x04post\x00\
    \x00\x00\x03put\x00\x00\x00\x06delete\x00\x00\x00\x05trace\x00\x00\
    \x00\x06accept\x00\x00\x00\x0eaccept-charset\x00\x00\x00\x0faccept-e\
    ncoding\x00\x00\x00\x0faccept-language\x00\x00\x00\x0daccept-ranges\
    \x00\x00\x00\x03age\x00\x00\x00\x05allow\x00\x00\x00\x0dauthorizatio\
    n\x00\x00\x00\x0dcache-control\x00\x00\x00\x0aconnection\x00\x00\x00\
    \x0ccontent-base\x00\x00\x00\x10content-encoding\x00\x00\x00\x10cont\
    ent-language\x00\x00\x00\x0econtent-length\x00\x00\x00\x10content-lo\
    cation\x00\x00\x00\x0bcontent-md5\x00\x00\x00\x0dcontent-range\x00\
    \x00\x00\x0ccontent-type\x00\x00\x00\x04date\x00\x00\x00\x04etag\x00\
    \x00\x00\x06expect\x00\x00\x00\x07expires\x00\x00\x00\x04from\x00\
    \x00\x00\x04host\x00\x00\x00\x08if-match\x00\x00\x00\x11if-modified-\
    since\x00\x00\x00\x0dif-none-match\x00\x00\x00\x08if-range\x00\x00\
    \x00\x13if-unmodified-since\x00\x00\x00\x0dlast-modified\x00\x00\x00\
    \x08location\x00\x00\x00\x0cmax-forwards\x00\x00\x00\x06pragma\x00\
    \x00\x00\x12proxy-authenticate\x00\x00\x00\x13proxy-authorization\
    \x00\x00\x00\x05range\x00\x00\x00\x07referer\x00\x00\x00\x0bretry-af\
    ter\x00\x00\x00\x06server\x00\x00\x00\x02te\x00\x00\x00\x07trailer\
    \x00\x00\x00\x11transfer-encoding\x00\x00\x00\x07upgrade\x00\x00\x00\
    \x0auser-agent\x00\x00\x00\x04vary\x00\x00\x00\x03via\x00\x00\x00\
    \x07warning\x00\x00\x00\x10www-authenticate\x00\x00\x00\x06method\
    \x00\x00\x00\x03get\x00\x00\x00\x06status\x00\x00\x00\x06200 OK\x00\
    \x00\x00\x07version\x00\x00\x00\x08HTTP/1.1\x00\x00\x00\x03url\x00\
    \x00\x00\x06public\x00\x00\x00\x0aset-cookie\x00\x00\x00\x0akeep-ali\
    ve\x00\x00\x00\x06origin10010120120220520630030230330430530630740240\
    5406407408409410411412413414415416417502504505203 Non-Authoritative \
    Information204 No Content301 Moved Permanently400 Bad Request401 Una\
    uthorized403 Forbidden404 Not Found500 Internal Server Error501 Not \
    Implemented503 Service UnavailableJan Feb Mar Apr May Jun Jul Aug Se\
    pt Oct Nov Dec 00:00:00 Mon, Tue, Wed, Thu, Fri, Sat, Sun, GMTchunke\
    d,text/html,image/png,image/jpg,image/gif,application/xml,applicatio\
    n/xhtml+xml,text/plain,text/javascript,publicprivatemax-age=gzip,def\
    late,sdchcharset=utf-8charset=iso-8859-1,utf-,*,enq=0.";
