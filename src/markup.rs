//! Tag-level scanning over raw SVG text.
//!
//! Nothing here builds a tree. Rules locate opening tags with regexes, read their
//! attributes through quick-xml's attribute tokenizer, and find the end of an
//! element by counting same-name open/close tags. Anything that doesn't scan
//! cleanly is reported as `None` so callers can leave the fragment alone.

use std::ops::Range;
use std::sync::LazyLock;

use quick_xml::events::BytesStart;
use regex::Regex;

/// A JSX expression attribute value, `{...}`, with one level of nested braces.
/// A `>` inside it does not end the tag.
const JSX_EXPRESSION: &str = r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}";

/// An opening (or self-closing) tag: `<name attrs/>`.
pub(crate) static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"<([A-Za-z][\w:.-]*)((?:\s(?:{JSX_EXPRESSION}|[^>])*?)?)(/?)>");
    Regex::new(&pattern).unwrap()
});

static ROOT_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<svg\b(?:{JSX_EXPRESSION}|[^>])*>")).unwrap()
});

/// An opening tag found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Byte range of the whole tag, `<` through `>`.
    pub span: Range<usize>,
    pub name: String,
    /// Raw attribute text between the name and the closing `>` or `/>`.
    pub attrs: String,
    pub self_closing: bool,
}

impl Tag {
    /// Parsed `(name, value)` pairs in source order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        parse_attributes(&self.name, &self.attrs)
    }

    pub fn get_attr(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Scan the opening tag starting exactly at `pos`.
pub fn tag_at(svg: &str, pos: usize) -> Option<Tag> {
    let caps = OPEN_TAG.captures_at(svg, pos)?;
    let whole = caps.get(0)?;
    if whole.start() != pos {
        return None;
    }
    Some(Tag {
        span: whole.range(),
        name: caps[1].to_string(),
        attrs: caps[2].to_string(),
        self_closing: !caps[3].is_empty(),
    })
}

/// All opening tags in document order.
pub fn tags(svg: &str) -> Vec<Tag> {
    OPEN_TAG
        .captures_iter(svg)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Tag {
                span: whole.range(),
                name: caps[1].to_string(),
                attrs: caps[2].to_string(),
                self_closing: !caps[3].is_empty(),
            })
        })
        .collect()
}

/// Tokenize an attribute list with quick-xml. Stops at the first malformed
/// attribute and returns what was read so far.
pub fn parse_attributes(name: &str, attrs: &str) -> Vec<(String, String)> {
    let content = format!("{name}{}", attrs.trim_end_matches('/'));
    let start = BytesStart::from_content(content, name.len());
    let mut iter = start.attributes();
    iter.with_checks(false);

    let mut out = Vec::new();
    for attr in iter {
        let Ok(attr) = attr else { break };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        out.push((key, value));
    }
    out
}

/// Byte offset just past the element whose opening tag starts at `pos`.
///
/// Returns `None` when there is no tag at `pos` or its closing tag is missing.
pub fn element_end(svg: &str, pos: usize) -> Option<usize> {
    let tag = tag_at(svg, pos)?;
    if tag.self_closing {
        return Some(tag.span.end);
    }

    let pattern = format!(
        r"<(/?){}(?:\s(?:{JSX_EXPRESSION}|[^>])*?)?(/?)>",
        regex::escape(&tag.name)
    );
    let same_name = Regex::new(&pattern).ok()?;

    let mut depth = 1usize;
    for caps in same_name.captures_iter(&svg[tag.span.end..]) {
        let closing = !caps[1].is_empty();
        let self_closing = !caps[2].is_empty();
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some(tag.span.end + caps.get(0)?.end());
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    None
}

/// An element located by [`child_elements`].
#[derive(Debug, Clone)]
pub struct ElementSpan {
    pub tag: Tag,
    /// Range of the whole element, opening tag through closing tag.
    pub span: Range<usize>,
}

/// Direct child elements of a fragment, in order. Scanning stops at the first
/// element whose end can't be found.
pub fn child_elements(content: &str) -> Vec<ElementSpan> {
    let mut children = Vec::new();
    let mut pos = 0;
    while let Some(m) = OPEN_TAG.find_at(content, pos) {
        let Some(tag) = tag_at(content, m.start()) else { break };
        let Some(end) = element_end(content, m.start()) else { break };
        children.push(ElementSpan {
            span: m.start()..end,
            tag,
        });
        pos = end;
    }
    children
}

/// Drop every element whose opening tag satisfies `matches`, subtree included.
/// Elements nested in an already removed one are not visited; elements whose
/// end can't be found are kept.
pub fn remove_elements(svg: &str, mut matches: impl FnMut(&Tag) -> bool) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for tag in tags(svg) {
        if tag.span.start < cursor || !matches(&tag) {
            continue;
        }
        let Some(end) = element_end(svg, tag.span.start) else {
            continue;
        };
        out.push_str(&svg[cursor..tag.span.start]);
        cursor = end;
    }
    out.push_str(&svg[cursor..]);
    out
}

/// Byte range of the closing tag of the element spanning `span`, or `None`
/// for a self-closing element.
pub fn closing_tag(svg: &str, span: &Range<usize>) -> Option<Range<usize>> {
    if tag_at(svg, span.start)?.self_closing {
        return None;
    }
    let start = svg[span.clone()].rfind("</")?;
    Some(span.start + start..span.end)
}

/// Render a `name="value"` pair, switching to single quotes when the value
/// contains a double quote.
pub fn render_attr(name: &str, value: &str) -> String {
    if value.contains('"') {
        format!(" {name}='{value}'")
    } else {
        format!(" {name}=\"{value}\"")
    }
}

/// Byte range of the root `<svg ...>` opening tag.
pub fn root_open_tag(svg: &str) -> Option<Range<usize>> {
    ROOT_OPEN_TAG.find(svg).map(|m| m.range())
}

/// Insert `text` at the end of the attribute list of the tag in `span`,
/// keeping any whitespace before `/>`.
pub fn append_to_tag(svg: &mut String, span: Range<usize>, text: &str) {
    let tag = &svg[span.clone()];
    let close_len = if tag.ends_with("/>") { 2 } else { 1 };
    let body = &tag[..tag.len() - close_len];
    let insert_at = span.start + body.trim_end().len();
    svg.insert_str(insert_at, text);
}

/// Insert `text` right after the tag name of the tag in `span`.
pub fn prepend_to_tag(svg: &mut String, span: Range<usize>, name: &str, text: &str) {
    svg.insert_str(span.start + 1 + name.len(), text);
}

/// Remove every `name="..."` attribute (with its leading whitespace) from `tag`.
pub fn strip_attr(tag: &str, name: &str) -> String {
    let pattern = format!(r#"\s+{}="[^"]*""#, regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(tag, "").into_owned(),
        Err(_) => tag.to_string(),
    }
}
