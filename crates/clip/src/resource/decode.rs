// ABOUTME: Turns fetched body bytes into text.
// ABOUTME: Honors the Content-Type charset, otherwise guesses the encoding with chardetng.

use encoding_rs::Encoding;

/// Decodes `body`, preferring the charset named in `content_type`.
///
/// Unknown or missing charsets fall back to detection. Malformed sequences
/// become U+FFFD rather than failing.
pub(crate) fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(body, true);
        detector.guess(None, true)
    });
    encoding.decode(body).0.into_owned()
}

/// The `charset` parameter of a Content-Type value, lowercased and unquoted.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase())
    })
}
