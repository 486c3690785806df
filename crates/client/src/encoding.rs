//! URL-escaping of the JSON payload, reconciled with .NET `UrlEncode`.
//!
//! The vendor backend was built against .NET, whose `UrlEncode` leaves
//! `-_.!*()` unescaped. Our host escaper escapes every non-alphanumeric byte
//! (space becomes `+`), so [`to_net_compatible`] turns those seven escapes
//! back into literals before the text is encrypted.
//!
//! The receiving side only ever needs standard percent-decoding: a decoder
//! reconstructs the same bytes whichever table produced the escapes.

use std::borrow::Cow;

use percent_encoding::{percent_decode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes the host escaper leaves alone: alphanumerics and space (which is
/// rewritten to `+` afterwards).
const HOST_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b' ');

/// Escapes that .NET leaves as literals, keyed by upper-case hex.
const NET_LITERALS: [(&str, char); 7] = [
    ("2D", '-'),
    ("5F", '_'),
    ("2E", '.'),
    ("21", '!'),
    ("2A", '*'),
    ("28", '('),
    ("29", ')'),
];

/// Form-style URL escaping: every non-alphanumeric byte of the UTF-8 input
/// becomes `%XX` (upper-case hex), space becomes `+`.
pub fn url_escape(input: &str) -> String {
    utf8_percent_encode(input, HOST_ESCAPE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Replace the seven escapes .NET does not produce with their literal
/// characters. Hex digits match case-insensitively; every other `%XX`
/// triplet and all other text pass through unchanged.
pub fn to_net_compatible(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tail.get(1..3).and_then(net_literal) {
            Some(c) => {
                out.push(c);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn net_literal(hex: &str) -> Option<char> {
    NET_LITERALS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(hex))
        .map(|&(_, c)| c)
}

/// Standard form decoding: `+` becomes space, then `%XX` triplets are
/// decoded. Malformed triplets are kept verbatim. Works on raw bytes because
/// decrypted input is not guaranteed to be UTF-8.
pub fn url_unescape(input: &[u8]) -> Vec<u8> {
    let spaced: Cow<'_, [u8]> = if input.contains(&b'+') {
        Cow::Owned(
            input
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    };
    percent_decode(&spaced).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_everything_but_alphanumerics() {
        assert_eq!(url_escape("a b"), "a+b");
        assert_eq!(url_escape("a+b"), "a%2Bb");
        assert_eq!(url_escape("-_.!*()"), "%2D%5F%2E%21%2A%28%29");
        assert_eq!(url_escape(r#"{"k":"v"}"#), "%7B%22k%22%3A%22v%22%7D");
    }

    #[test]
    fn escapes_vendor_payload() {
        let json = r#"{"MerchantID":"2000132","RelateNumber":"TEST1"}"#;
        assert_eq!(
            to_net_compatible(&url_escape(json)),
            "%7B%22MerchantID%22%3A%222000132%22%2C%22RelateNumber%22%3A%22TEST1%22%7D"
        );
    }

    #[test]
    fn escapes_utf8_bytes() {
        assert_eq!(url_escape("測"), "%E6%B8%AC");
    }

    #[test]
    fn net_table_restores_literals() {
        assert_eq!(
            to_net_compatible("%2D%5F%2E%21%2A%28%29"),
            "-_.!*()"
        );
    }

    #[test]
    fn net_table_is_case_insensitive() {
        assert_eq!(to_net_compatible("%2d%5f%2e%21%2a%28%29"), "-_.!*()");
        assert_eq!(to_net_compatible("%2a%2A"), "**");
    }

    #[test]
    fn other_escapes_untouched() {
        assert_eq!(to_net_compatible("%7B%22k%22%3A%22v%22%7D"), "%7B%22k%22%3A%22v%22%7D");
        assert_eq!(to_net_compatible("%E6%B8%AC+x"), "%E6%B8%AC+x");
    }

    #[test]
    fn noop_without_table_escapes() {
        let canonical = url_escape(r#"{"Name":"ABC 123","Tag":"x"}"#);
        assert_eq!(to_net_compatible(&canonical), canonical);
    }

    #[test]
    fn dangling_percent_is_kept() {
        assert_eq!(to_net_compatible("100%"), "100%");
        assert_eq!(to_net_compatible("%2"), "%2");
        assert_eq!(to_net_compatible("%%2D"), "%-");
    }

    #[test]
    fn adjacent_triplets_do_not_overlap() {
        // "%2%2D": the first '%' has no valid hex pair, the second does.
        assert_eq!(to_net_compatible("%2%2D"), "%2-");
    }

    #[test]
    fn unescape_inverts_both_tables() {
        let json = r#"{"Item_Name":"a-b (c)! *","Price":1.5}"#;
        let host = url_escape(json);
        let net = to_net_compatible(&host);
        assert_eq!(url_unescape(host.as_bytes()), json.as_bytes());
        assert_eq!(url_unescape(net.as_bytes()), json.as_bytes());
    }

    #[test]
    fn unescape_handles_plus_and_malformed() {
        assert_eq!(url_unescape(b"a+b%20c"), b"a b c");
        assert_eq!(url_unescape(b"100%zz"), b"100%zz");
    }

    #[test]
    fn unescape_cjk() {
        let text = "統一發票 測試";
        let escaped = to_net_compatible(&url_escape(text));
        assert_eq!(url_unescape(escaped.as_bytes()), text.as_bytes());
    }

    proptest! {
        #[test]
        fn unescape_inverts_escape(text in any::<String>()) {
            let escaped = to_net_compatible(&url_escape(&text));
            prop_assert_eq!(url_unescape(escaped.as_bytes()), text.as_bytes());
        }

        #[test]
        fn net_table_is_idempotent(text in any::<String>()) {
            let once = to_net_compatible(&url_escape(&text));
            prop_assert_eq!(to_net_compatible(&once), once.clone());
        }

        #[test]
        fn net_table_noop_on_canonical_text(text in "[^-_.!*()]*") {
            let canonical = url_escape(&text);
            prop_assert_eq!(to_net_compatible(&canonical), canonical.clone());
        }
    }
}
