//! Markdown rendering with syntax highlighting and anchor post-processing

use std::collections::HashMap;

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::helpers::html::html_escape;

lazy_static! {
    /// Trailing attribute list: `Some text {#id .class key=value}`
    static ref ATTR_LIST_RE: Regex = Regex::new(r"\{([^{}\r\n]+)\}\s*$").unwrap();
    /// Valid id/class/attribute names
    static ref ATTR_NAME_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").unwrap();
}

/// Markdown renderer with syntax highlighting.
///
/// Built once at startup and shared read-only across requests; rendering the
/// same input twice yields byte-identical output.
pub struct MarkdownRenderer {
    options: Options,
    syntax_set: SyntaxSet,
}

/// The block construct currently being buffered for rewriting.
enum Block<'a> {
    Code {
        lang: Option<String>,
        content: String,
    },
    Heading {
        heading: Tag<'a>,
        inner: Vec<Event<'a>>,
        text: String,
    },
    Paragraph {
        inner: Vec<Event<'a>>,
    },
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;

        Self {
            options,
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Render markdown to HTML.
    ///
    /// Code fences are replaced with highlighted (or escaped) markup,
    /// headings get deterministic anchor ids, and trailing `{...}` attribute
    /// lists are attached to headings and paragraphs.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut block: Option<Block> = None;
        // anchors handed out so far, for duplicate heading text
        let mut anchors: HashMap<String, usize> = HashMap::new();

        for event in parser {
            block = match (block, event) {
                (None, Event::Start(Tag::CodeBlock(kind))) => Some(Block::Code {
                    lang: fence_language(kind),
                    content: String::new(),
                }),
                (Some(Block::Code { lang, content }), Event::End(TagEnd::CodeBlock)) => {
                    let highlighted = self.highlight_code(&content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    None
                }
                (Some(Block::Code { lang, mut content }), Event::Text(text)) => {
                    content.push_str(&text);
                    Some(Block::Code { lang, content })
                }
                // fences only ever carry text; drop anything else
                (Some(block @ Block::Code { .. }), _) => Some(block),

                (None, Event::Start(heading @ Tag::Heading { .. })) => Some(Block::Heading {
                    heading,
                    inner: Vec::new(),
                    text: String::new(),
                }),
                (
                    Some(Block::Heading {
                        heading:
                            Tag::Heading {
                                level,
                                id,
                                classes,
                                attrs,
                            },
                        inner,
                        text,
                    }),
                    Event::End(TagEnd::Heading(_)),
                ) => {
                    // an explicit {#id} from the source wins over the derived anchor
                    let anchor = match id {
                        Some(explicit) => {
                            anchors.entry(explicit.to_string()).or_insert(0);
                            explicit.to_string()
                        }
                        None => unique_anchor(&mut anchors, &slug::slugify(&text)),
                    };
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id: Some(CowStr::from(anchor)),
                        classes,
                        attrs,
                    }));
                    events.extend(inner);
                    events.push(Event::End(TagEnd::Heading(level)));
                    None
                }
                (
                    Some(Block::Heading {
                        heading,
                        mut inner,
                        mut text,
                    }),
                    event,
                ) => {
                    match &event {
                        Event::Text(t) | Event::Code(t) => text.push_str(t),
                        _ => {}
                    }
                    inner.push(event);
                    Some(Block::Heading {
                        heading,
                        inner,
                        text,
                    })
                }

                (None, Event::Start(Tag::Paragraph)) => Some(Block::Paragraph { inner: Vec::new() }),
                (Some(Block::Paragraph { inner }), Event::End(TagEnd::Paragraph)) => {
                    finish_paragraph(&mut events, inner);
                    None
                }
                (Some(Block::Paragraph { mut inner }), event) => {
                    inner.push(event);
                    Some(Block::Paragraph { inner })
                }

                (None, event) => {
                    events.push(event);
                    None
                }
            };
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a fenced code block.
    ///
    /// Unknown languages and highlighter errors fall back to escaped plain
    /// text; no source text ever reaches the output unescaped.
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        if let Some(lang) = lang {
            if let Some(syntax) = self.syntax_set.find_syntax_by_token(lang) {
                match self.classed_html(syntax, code) {
                    Ok(body) => {
                        return format!(
                            "<pre><code class=\"highlight language-{}\">{}</code></pre>\n",
                            html_escape(lang),
                            body
                        );
                    }
                    Err(e) => {
                        tracing::debug!("highlighting failed for `{}` fence: {}", lang, e);
                    }
                }
            }
        }

        let class = lang
            .map(|l| format!(" class=\"language-{}\"", html_escape(l)))
            .unwrap_or_default();
        format!("<pre><code{}>{}</code></pre>\n", class, html_escape(code))
    }

    fn classed_html(&self, syntax: &SyntaxReference, code: &str) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token of a fenced block, if any
fn fence_language(kind: CodeBlockKind) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => {
            // the info string may carry extra words after the language
            let lang = info.split_whitespace().next().unwrap_or("").to_string();
            if lang.is_empty() {
                None
            } else {
                Some(lang)
            }
        }
        CodeBlockKind::Indented => None,
    }
}

/// Allocate an anchor id, suffixing duplicates with -1, -2, ...
fn unique_anchor(anchors: &mut HashMap<String, usize>, base: &str) -> String {
    let base = if base.is_empty() { "section" } else { base };
    let n = anchors
        .entry(base.to_string())
        .and_modify(|n| *n += 1)
        .or_insert(0);
    if *n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

/// Emit a buffered paragraph, honoring a trailing `{...}` attribute list.
fn finish_paragraph<'a>(events: &mut Vec<Event<'a>>, mut inner: Vec<Event<'a>>) {
    let attrs = match inner.last_mut() {
        Some(Event::Text(text)) => match split_trailing_attrs(text) {
            Some((stripped, list)) => {
                *text = CowStr::from(stripped);
                Some(list)
            }
            None => None,
        },
        _ => None,
    };

    let Some(list) = attrs else {
        events.push(Event::Start(Tag::Paragraph));
        events.extend(inner);
        events.push(Event::End(TagEnd::Paragraph));
        return;
    };

    if matches!(inner.last(), Some(Event::Text(t)) if t.is_empty()) {
        inner.pop();
    }

    let mut fragment = String::new();
    html::push_html(&mut fragment, inner.into_iter());
    events.push(Event::Html(CowStr::from(format!(
        "<p{}>{}</p>\n",
        list.to_html(),
        fragment.trim_end()
    ))));
}

/// Inline attributes parsed from a `{#id .class key=value}` list
#[derive(Debug, Default, PartialEq, Eq)]
struct AttrList {
    id: Option<String>,
    classes: Vec<String>,
    pairs: Vec<(String, String)>,
}

impl AttrList {
    /// Parse the inside of an attribute list. Returns None if any token is
    /// not attribute-shaped, in which case the braces are literal text.
    fn parse(input: &str) -> Option<Self> {
        let mut list = AttrList::default();

        for token in input.split_whitespace() {
            if let Some(id) = token.strip_prefix('#') {
                if !ATTR_NAME_RE.is_match(id) {
                    return None;
                }
                list.id = Some(id.to_string());
            } else if let Some(class) = token.strip_prefix('.') {
                if !ATTR_NAME_RE.is_match(class) {
                    return None;
                }
                list.classes.push(class.to_string());
            } else if let Some((key, value)) = token.split_once('=') {
                if !ATTR_NAME_RE.is_match(key) {
                    return None;
                }
                let value = value.trim_matches('"').trim_matches('\'');
                list.pairs.push((key.to_string(), value.to_string()));
            } else {
                return None;
            }
        }

        if list == AttrList::default() {
            None
        } else {
            Some(list)
        }
    }

    fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{}\"", html_escape(id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", html_escape(&self.classes.join(" "))));
        }
        for (key, value) in &self.pairs {
            out.push_str(&format!(" {}=\"{}\"", key, html_escape(value)));
        }
        out
    }
}

/// Split `"Some text {.note}"` into `("Some text "-trimmed, attrs)`
fn split_trailing_attrs(text: &str) -> Option<(String, AttrList)> {
    let captures = ATTR_LIST_RE.captures(text)?;
    let list = AttrList::parse(captures.get(1)?.as_str())?;
    let stripped = text[..captures.get(0)?.start()].trim_end().to_string();
    Some((stripped, list))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new()
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer().render("Hello *World*.\n\n- one\n- two\n");
        assert!(html.contains("<em>World</em>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_heading_anchor_derived_from_text() {
        let html = renderer().render("## Example Heading\n");
        assert!(html.contains(r##"<h2 id="example-heading">Example Heading</h2>"##));
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let html = renderer().render("## Setup\n\ntext\n\n## Setup\n");
        assert!(html.contains(r##"id="setup""##));
        assert!(html.contains(r##"id="setup-1""##));
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let html = renderer().render("## Example Heading {#custom .note}\n");
        assert!(html.contains(r##"id="custom""##));
        assert!(html.contains(r##"class="note""##));
        assert!(!html.contains("example-heading"));
    }

    #[test]
    fn test_code_block_highlighted_with_classes() {
        let html = renderer().render("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"class="highlight language-rust""#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_escaped_text() {
        let html = renderer().render("```nosuchlang\n<b>&\n```\n");
        assert!(html.contains(r#"class="language-nosuchlang""#));
        assert!(html.contains("&lt;b&gt;&amp;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_bare_fence_escapes_markup() {
        let html = renderer().render("```\n<script>alert(1)</script>\n```\n");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let source = "# One\n\nText with `code`.\n\n```js\nconsole.log(1)\n```\n";
        let r = renderer();
        assert_eq!(r.render(source), r.render(source));
    }

    #[test]
    fn test_paragraph_attribute_list() {
        let html = renderer().render("Some text {.lead #intro}\n");
        assert!(html.contains(r#"<p id="intro" class="lead">Some text</p>"#));
    }

    #[test]
    fn test_literal_braces_left_alone() {
        let html = renderer().render("Use {braces} sometimes\n");
        assert!(html.contains("{braces}"));
    }

    #[test]
    fn test_title_and_js_fence_end_to_end() {
        let html = renderer().render("# Title\n\n```js\nconsole.log(1)\n```");
        assert!(html.contains(r##"<h1 id="title">Title</h1>"##));
        assert!(html.contains(r#"<code class="highlight language-js""#));
        assert!(html.contains("console"));
    }

    #[test]
    fn test_attr_list_parsing() {
        let list = AttrList::parse("#id .a .b data-x=1").unwrap();
        assert_eq!(list.id.as_deref(), Some("id"));
        assert_eq!(list.classes, vec!["a", "b"]);
        assert_eq!(list.pairs, vec![("data-x".to_string(), "1".to_string())]);

        // not attribute-shaped: braces stay literal
        assert!(AttrList::parse("just words").is_none());
    }
}
