//! Root-element injections applied between optimization and translation.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::markup::{append_to_tag, prepend_to_tag, root_open_tag, tag_at};
use crate::{ExpandProps, Replacement, SvgProp};

/// The props spread marker.
pub const SPREAD_PROPS: &str = "{...props}";

const TITLE_ELEMENT: &str = "{title ? <title id={titleId}>{title}</title> : null}";
const DESC_ELEMENT: &str = "{desc ? <desc id={descId}>{desc}</desc> : null}";

/// Rewrite every attribute whose value is exactly a replacement's `from`. The
/// first matching entry wins, and a replaced value is not looked up again.
pub fn replace_attr_values(svg: &str, replacements: &[Replacement]) -> String {
    static ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(\s[\w:.-]+)="([^"]*)""#).unwrap());

    let replacements: Vec<&Replacement> =
        replacements.iter().filter(|r| !r.from.is_empty()).collect();
    if replacements.is_empty() {
        return svg.to_string();
    }
    ATTR.replace_all(svg, |caps: &Captures| {
        match replacements.iter().find(|r| r.from == caps[2]) {
            Some(r) => format!("{}=\"{}\"", &caps[1], r.to),
            None => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// Drop every `fill` and set `fill="currentColor"` on the root element.
pub fn fill_current_color(svg: &str) -> String {
    static FILL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s+fill="[^"]*""#).unwrap());

    let mut svg = FILL.replace_all(svg, "").into_owned();
    if let Some(root) = root_open_tag(&svg) {
        prepend_to_tag(&mut svg, root, "svg", r#" fill="currentColor""#);
    }
    svg
}

/// Append each prop to the root element, in order. Entries without a name are
/// skipped.
pub fn add_svg_props(svg: &str, props: &[SvgProp]) -> String {
    let added: String = props
        .iter()
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| {
            let value = p.value.trim();
            if value.starts_with('{') && value.ends_with('}') {
                format!(" {}={value}", p.name.trim())
            } else {
                format!(" {}=\"{}\"", p.name.trim(), p.value)
            }
        })
        .collect();
    append_to_root(svg, &added)
}

/// Point the root element at the generated title and desc ids.
pub fn add_aria_attributes(svg: &str, title: bool, desc: bool) -> String {
    let mut added = String::new();
    if title {
        added.push_str(" aria-labelledby={titleId}");
    }
    if desc {
        added.push_str(" aria-describedby={descId}");
    }
    append_to_root(svg, &added)
}

/// Put `{...props}` on the root element unless it is already there.
pub fn expand_props(svg: &str, placement: ExpandProps) -> String {
    if placement == ExpandProps::None || svg.contains(SPREAD_PROPS) {
        return svg.to_string();
    }
    let Some(root) = root_open_tag(svg) else {
        return svg.to_string();
    };
    let mut svg = svg.to_string();
    match placement {
        ExpandProps::Start => prepend_to_tag(&mut svg, root, "svg", &format!(" {SPREAD_PROPS}")),
        _ => append_to_tag(&mut svg, root, &format!(" {SPREAD_PROPS}")),
    }
    svg
}

pub fn add_ref(svg: &str) -> String {
    let Some(root) = root_open_tag(svg) else {
        return svg.to_string();
    };
    if svg[root].contains("ref={ref}") {
        return svg.to_string();
    }
    append_to_root(svg, " ref={ref}")
}

/// Insert the conditional `<title>` and `<desc>` right after the root opening
/// tag, each on a line of its own. A self-closing root is opened up first.
pub fn add_title_desc_elements(svg: &str, title: bool, desc: bool) -> String {
    let mut elements = String::new();
    if title {
        elements.push('\n');
        elements.push_str(TITLE_ELEMENT);
    }
    if desc {
        elements.push('\n');
        elements.push_str(DESC_ELEMENT);
    }
    let Some(root) = root_open_tag(svg) else {
        return svg.to_string();
    };
    if elements.is_empty() {
        return svg.to_string();
    }

    let self_closing = tag_at(svg, root.start).is_some_and(|t| t.self_closing);
    let mut out = String::with_capacity(svg.len() + elements.len());
    if self_closing {
        let open = svg[root.clone()].trim_end_matches("/>").trim_end();
        out.push_str(&svg[..root.start]);
        out.push_str(open);
        out.push('>');
        out.push_str(&elements);
        out.push_str("\n</svg>");
    } else {
        out.push_str(&svg[..root.end]);
        out.push_str(&elements);
        out.push('\n');
    }
    out.push_str(&svg[root.end..]);
    out
}

fn append_to_root(svg: &str, text: &str) -> String {
    if text.is_empty() {
        return svg.to_string();
    }
    let mut svg = svg.to_string();
    if let Some(root) = root_open_tag(&svg) {
        append_to_tag(&mut svg, root, text);
    }
    svg
}
