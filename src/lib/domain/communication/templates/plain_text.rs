//! HTML to plain text extraction

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HIDDEN_BLOCKS: Regex = Regex::new(concat!(
        r"(?is)<style[^>]*>.*?</style>",
        r"|<script[^>]*>.*?</script>",
        r"|<head(\s[^>]*)?>.*?</head>",
    ))
    .unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref BLOCK_ENDS: Regex =
        Regex::new(r"(?i)</(p|div|h[1-6]|li|tr|table|blockquote)\s*>").unwrap();
    static ref TAGS: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref TRAILING_SPACES: Regex = Regex::new(r"[ \t]+\n").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Converts an HTML fragment or document to plain text.
///
/// Markup is stripped, `<br>` and closing block tags become line breaks and
/// HTML entities are decoded.
pub fn html_to_plain(html: &str) -> String {
    let text = HIDDEN_BLOCKS.replace_all(html, "");
    let text = LINE_BREAKS.replace_all(&text, "\n");
    let text = BLOCK_ENDS.replace_all(&text, "\n\n");
    let text = TAGS.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text).replace('\u{a0}', " ");
    let text = TRAILING_SPACES.replace_all(&text, "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");

    text.trim().to_string()
}
