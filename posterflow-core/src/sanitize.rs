//! HTML stripping for user-entered text.
//!
//! Poster fields render straight into the composed poster, so markup is
//! removed at intake rather than escaped at display time. The `image` field
//! is a URI, not display text, and must never pass through here.

/// Remove `<...>` tag spans from `input`, keeping all other text verbatim.
///
/// An unterminated `<` drops the rest of the string: a half-typed tag is
/// treated as markup, not content.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '<' {
            for t in chars.by_ref() {
                if t == '>' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }

    out
}
