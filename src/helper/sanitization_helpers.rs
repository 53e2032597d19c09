use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Renders a post body into safe HTML. Bodies that open with a tag are HTML
/// already and are only cleaned; anything else is treated as Markdown first.
/// Either way scripting attributes and unknown tags never reach the page.
pub fn render_post_body(input: &str) -> String {
    if input.trim_start().starts_with('<') {
        return clean_body_html(input);
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, parser);
    clean_body_html(&unsafe_html)
}

fn clean_body_html(unsafe_html: &str) -> String {
    let tags_to_allow = [
        "h1", "h2", "h3", "h4", "h5", "h6", "b", "strong", "i", "em", "p", "br",
        "a", "ul", "ol", "li", "blockquote", "code", "pre", "hr", "img", "table",
        "thead", "tbody", "tr", "th", "td", "s", "del", "span", "div", "figure", "figcaption",
    ];
    let safe_attributes = ["src", "href", "alt", "title", "class", "width", "height"];

    Builder::new()
        .tags(tags_to_allow.iter().cloned().collect::<HashSet<_>>())
        .generic_attributes(safe_attributes.iter().cloned().collect::<HashSet<_>>())
        .link_rel(Some("nofollow ugc"))
        .clean(unsafe_html)
        .to_string()
}

/// Strips all HTML tags from input (for titles/excerpts)
pub fn strip_all_html(input: &str) -> String {
    Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string()
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"))
}

fn whitespace_regex() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Plain-text teaser for cards whose excerpt was left empty.
/// Cuts on a character boundary and appends an ellipsis when shortened.
pub fn plain_text_teaser(content: &str, max_chars: usize) -> String {
    let without_tags = tag_regex().replace_all(content, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    let collapsed = whitespace_regex().replace_all(decoded.trim(), " ").to_string();

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
