//! Input sanitizers for post fields.
//!
//! - [`sanitize_text_field`] -- plain text: every tag removed, whitespace
//!   collapsed. Used for the title and the SEO meta fields.
//! - [`sanitize_post_html`] -- rich text: an allowlist of formatting tags is
//!   kept, executable markup is dropped. Used for the post body.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `<script>` and `<style>` elements together with their content.
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</\s*(?:script|style)\s*>")
        .expect("valid regex")
});

/// Anything that opens like a tag, comment, or processing instruction.
/// An unterminated tag at the end of the input is also matched.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[a-zA-Z/!?][^>]*(?:>|$)").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid regex"));

static PERCENT_OCTET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("valid regex"));

/// URL schemes allowed in `href`/`src` attributes of post bodies.
const ALLOWED_URL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Reduce user input to a single line of plain text.
///
/// Script and style blocks are dropped with their content, other tags are
/// stripped, a `<` that does not start a tag is escaped, runs of whitespace
/// become one space, and percent-encoded octets are removed.
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = input.to_string();

    if text.contains('<') {
        text = SCRIPT_STYLE_RE.replace_all(&text, "").into_owned();
        text = TAG_RE.replace_all(&text, "").into_owned();
        text = text.replace('<', "&lt;");
    }

    text = WHITESPACE_RE.replace_all(&text, " ").into_owned();

    // Removing one octet can splice together another ("%2%200" -> "%20").
    while PERCENT_OCTET_RE.is_match(&text) {
        text = PERCENT_OCTET_RE.replace_all(&text, "").into_owned();
    }

    text.trim().to_string()
}

/// Clean a post body down to safe HTML.
///
/// Keeps common formatting and structural tags (paragraphs, headings, lists,
/// links, images, tables, inline emphasis). Removes `<script>`/`<style>`
/// with their content, every event-handler attribute, and any URL whose
/// scheme is not http, https, or mailto. Links get
/// `rel="noopener noreferrer"`.
pub fn sanitize_post_html(input: &str) -> String {
    let schemes: HashSet<&str> = ALLOWED_URL_SCHEMES.into_iter().collect();
    ammonia::Builder::default()
        .url_schemes(schemes)
        .clean(input)
        .to_string()
}
