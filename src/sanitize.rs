use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z][^>]*>|</?[A-Za-z][^>]*$").expect("tag pattern must compile")
});

/// Escape HTML markup in user-supplied text before it is served.
///
/// Every tag-shaped fragment is entity-escaped, so `<script>` payloads come
/// back inert (`&lt;script&gt;...`). A tag left unterminated at the end of
/// the text is escaped too; a browser would close it with the next `>` in
/// surrounding markup. Text without markup, including bare `&` and a `<`
/// that starts no tag, passes through unchanged. Stored rows keep the
/// original text; this runs on every read.
pub fn clean(input: &str) -> String {
    TAG_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            html_escape::encode_text(&caps[0]).into_owned()
        })
        .into_owned()
}
