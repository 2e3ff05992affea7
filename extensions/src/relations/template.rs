use once_cell::sync::Lazy;
use regex::Regex;
use trellis_core::vault::{value_display, MetadataRecord};

/// Substituted for tokens whose field is absent from the metadata. This is
/// the host surface's missing-value representation, reproduced as-is.
pub const MISSING_VALUE: &str = "undefined";

// A `$`, an optional `{`, a field name, an optional `}`. Unbalanced braces
// are tolerated: the braces are independent of each other.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{?([A-Za-z0-9-]+)\}?").expect("token pattern is valid"));

/// Renders a status format string against a metadata record.
///
/// Tokens reference metadata fields by name: `${status}` or `$status`. Each
/// token occurrence is replaced, left to right, with the string form of the
/// named field. The pass is single and bounded: substituted output is never
/// re-scanned, so a field value containing token syntax stays literal.
pub fn render(format: &str, metadata: &MetadataRecord) -> String {
    let mut out = String::with_capacity(format.len());
    let mut last = 0;

    for captures in TOKEN_PATTERN.captures_iter(format) {
        let token = captures.get(0).expect("regex match has a group 0");
        out.push_str(&format[last..token.start()]);

        let field = &captures[1];
        match metadata.get(field) {
            Some(value) => out.push_str(&value_display(value)),
            None => out.push_str(MISSING_VALUE),
        }
        last = token.end();
    }

    out.push_str(&format[last..]);
    out
}
