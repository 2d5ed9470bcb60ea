// src/core/charset.rs
//! Page bytes → text.
//!
//! Timetable exports are often served without a charset, or with a bogus
//! `iso-8859-1`, while the bytes are UTF-8 or ISO-8859-2. Order of trust:
//! 1. a charset from the `Content-Type` header, unless legacy;
//! 2. `<meta charset>` / `http-equiv` in the document head, unless legacy;
//! 3. UTF-8 when the bytes validate;
//! 4. statistical detection (`chardetng`), hinted by the host's TLD.
//!
//! A byte-order mark beats all of the above (`encoding_rs` handles it).

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// How far into the document to look for a `<meta>` charset.
const META_SCAN_BYTES: usize = 4096;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:\-]+)"#).unwrap()
});

/// `charset` parameter of a `Content-Type` value, lowercased.
pub fn charset_of(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, v)| v.trim().trim_matches('"').to_ascii_lowercase())
        .filter(|v| !v.is_empty())
}

/// Labels servers emit by default without meaning them.
pub fn is_legacy_charset(cs: &str) -> bool {
    matches!(cs, "iso-8859-1" | "latin-1" | "latin1" | "ascii" | "us-ascii")
}

/// Charset named by a `<meta>` tag near the top of the document.
pub fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SCAN_BYTES)];
    let caps = META_CHARSET.captures(head)?;
    let label = String::from_utf8_lossy(&caps[1]).to_ascii_lowercase();
    Some(label).filter(|l| !l.is_empty())
}

/// Last label of a host name, when it looks like a TLD (`pl`, `com`).
pub fn tld_of(host: &str) -> Option<&str> {
    host.rsplit('.')
        .next()
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_alphabetic()))
}

fn trusted(label: Option<&str>) -> Option<&'static Encoding> {
    let label = label.map(str::trim).filter(|l| !is_legacy_charset(l))?;
    Encoding::for_label(label.as_bytes())
}

/// Encoding for bytes that do not say what they are.
pub fn detect(bytes: &[u8], tld: Option<&str>) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(tld.map(str::as_bytes), true)
}

/// Decode an HTML document. `declared` is the header charset, if any.
pub fn decode_html(bytes: &[u8], declared: Option<&str>, tld: Option<&str>) -> String {
    let encoding = trusted(declared)
        .or_else(|| trusted(meta_charset(bytes).as_deref()))
        .unwrap_or_else(|| detect(bytes, tld));

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        logd!("malformed {} sequences replaced while decoding page", used.name());
    }
    text.into_owned()
}
