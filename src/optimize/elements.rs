//! Element removal rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::attributes::referenced_ids;
use crate::markup::{Tag, child_elements, closing_tag, element_end, remove_elements, tags};

/// Elements that only exist to hold other elements.
pub const CONTAINER_ELEMENTS: &[&str] = &["g", "defs", "pattern", "clipPath", "mask", "symbol"];

pub fn remove_title(svg: &str) -> String {
    remove_elements(svg, |tag| tag.name == "title")
}

pub fn remove_desc(svg: &str) -> String {
    remove_elements(svg, |tag| tag.name == "desc")
}

/// Remove elements hidden by `display`, `visibility` or a zero `opacity`,
/// whether set as attributes or inside `style`. The root is never removed.
pub fn remove_hidden_elems(svg: &str) -> String {
    remove_elements(svg, |tag| tag.name != "svg" && is_hidden(tag))
}

fn is_hidden(tag: &Tag) -> bool {
    static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden|opacity\s*:\s*(?:0+\.?0*|\.0+))\s*(?:;|$)",
        )
        .unwrap()
    });

    tag.attributes().iter().any(|(name, value)| {
        let value = value.trim();
        match name.as_str() {
            "display" => value.eq_ignore_ascii_case("none"),
            "visibility" => value.eq_ignore_ascii_case("hidden"),
            "opacity" => value.parse::<f64>().is_ok_and(|o| o == 0.0),
            "style" => HIDDEN_STYLE.is_match(value),
            _ => false,
        }
    })
}

/// Remove containers with no element content, repeating until nothing changes
/// because removing a container can empty its parent.
pub fn remove_empty_containers(svg: &str) -> String {
    static EMPTY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        CONTAINER_ELEMENTS
            .iter()
            .map(|name| {
                Regex::new(&format!(
                    r"<{name}(?:\s*|\s[^>]*[^/>])>\s*</{name}\s*>|<{name}(?:\s[^>]*?)?/>"
                ))
                .unwrap()
            })
            .collect()
    });

    let mut svg = svg.to_string();
    let mut iterations = 0;
    loop {
        iterations += 1;
        let next = EMPTY
            .iter()
            .fold(svg.clone(), |acc, re| re.replace_all(&acc, "").into_owned());
        if next == svg {
            break;
        }
        svg = next;
    }
    debug!(iterations, "empty containers settled");
    svg
}

pub fn remove_empty_text(svg: &str) -> String {
    static EMPTY_TEXT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<text(?:\s*|\s[^>]*[^/>])>\s*</text\s*>|<text(?:\s[^>]*?)?/>").unwrap()
    });
    EMPTY_TEXT.replace_all(svg, "").into_owned()
}

/// Remove children of `<defs>` that carry an id nothing references. Repeats
/// until stable since a removed element may hold the only reference to another.
pub fn remove_useless_defs(svg: &str) -> String {
    let mut svg = svg.to_string();
    loop {
        let next = remove_unreferenced_defs_once(&svg);
        if next == svg {
            return svg;
        }
        svg = next;
    }
}

fn remove_unreferenced_defs_once(svg: &str) -> String {
    let referenced = referenced_ids(svg);
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;

    for defs in tags(svg).into_iter().filter(|t| t.name == "defs" && !t.self_closing) {
        if defs.span.start < cursor {
            continue;
        }
        let Some(end) = element_end(svg, defs.span.start) else {
            continue;
        };
        let Some(close) = closing_tag(svg, &(defs.span.start..end)) else {
            continue;
        };

        let content = &svg[defs.span.end..close.start];
        out.push_str(&svg[cursor..defs.span.end]);
        let mut inner_cursor = 0;
        for child in child_elements(content) {
            let unreferenced = child
                .tag
                .get_attr("id")
                .is_some_and(|id| !referenced.contains(&id));
            if unreferenced {
                out.push_str(&content[inner_cursor..child.span.start]);
                inner_cursor = child.span.end;
            }
        }
        out.push_str(&content[inner_cursor..]);
        cursor = close.start;
    }
    out.push_str(&svg[cursor..]);
    out
}
