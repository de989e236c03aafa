//! Attribute cleanup, id handling and the legacy attribute strippers.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::markup::root_open_tag;

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\s)id="([^"]*)""#).unwrap());
static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s)class="([^"]*)""#).unwrap());
static URL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(\s*['"]?#([^)'"\s]+)['"]?\s*\)"#).unwrap());
static HREF_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"([\s:])href="#([^"]*)""##).unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<style\b[^>]*>)(.*?)(</style>)").unwrap());

/// Every id referenced through `url(#id)`, `href="#id"` or `xlink:href="#id"`.
pub fn referenced_ids(svg: &str) -> HashSet<String> {
    let urls = URL_REF.captures_iter(svg).map(|c| c[1].to_string());
    let hrefs = HREF_REF.captures_iter(svg).map(|c| c[2].to_string());
    urls.chain(hrefs).collect()
}

/// Collapse whitespace runs inside attribute values and trim them.
pub fn cleanup_attrs(svg: &str) -> String {
    static ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"([\w:-]+)="([^"]*)""#).unwrap());
    static WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

    ATTR.replace_all(svg, |caps: &Captures| {
        let value = WS.replace_all(&caps[2], " ");
        format!("{}=\"{}\"", &caps[1], value.trim())
    })
    .into_owned()
}

/// Drop `id` attributes that nothing references.
pub fn cleanup_ids(svg: &str) -> String {
    let referenced = referenced_ids(svg);
    ID_ATTR
        .replace_all(svg, |caps: &Captures| {
            if referenced.contains(&caps[2]) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

pub fn remove_empty_attrs(svg: &str) -> String {
    static EMPTY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s+[\w:-]+="""#).unwrap());
    EMPTY.replace_all(svg, "").into_owned()
}

/// Drop the default namespace declaration, and any prefixed namespace
/// declaration whose prefix is never used by an element or attribute.
pub fn remove_unused_ns(svg: &str) -> String {
    static DEFAULT_NS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+xmlns="[^"]*""#).unwrap());
    static PREFIXED_NS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+xmlns:([\w.-]+)="[^"]*""#).unwrap());

    let svg = DEFAULT_NS.replace_all(svg, "").into_owned();
    let prefixes: Vec<String> = PREFIXED_NS
        .captures_iter(&svg)
        .map(|c| c[1].to_string())
        .collect();

    let unused: HashSet<String> = prefixes
        .into_iter()
        .filter(|prefix| !namespace_in_use(&svg, prefix))
        .collect();
    if unused.is_empty() {
        return svg;
    }

    PREFIXED_NS
        .replace_all(&svg, |caps: &Captures| {
            if unused.contains(&caps[1]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn namespace_in_use(svg: &str, prefix: &str) -> bool {
    let pattern = format!(r"[<\s/]{}:[\w.-]", regex::escape(prefix));
    let in_use = Regex::new(&pattern).map_or(true, |re| re.is_match(svg));
    in_use || (prefix == "xlink" && svg.contains("xlinkHref"))
}

/// Prefix every id and class token with `prefix`, rewriting references and
/// simple selectors in `<style>` blocks to match. Names already carrying the
/// prefix are left alone.
pub fn prefix_ids(svg: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return svg.to_string();
    }
    let add = |name: &str| {
        if name.starts_with(prefix) {
            name.to_string()
        } else {
            format!("{prefix}{name}")
        }
    };

    let ids: HashSet<String> = ID_ATTR.captures_iter(svg).map(|c| c[2].to_string()).collect();
    let classes: HashSet<String> = CLASS_ATTR
        .captures_iter(svg)
        .flat_map(|c| {
            c[2].split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    let svg = ID_ATTR.replace_all(svg, |c: &Captures| format!("{}id=\"{}\"", &c[1], add(&c[2])));
    let svg = URL_REF.replace_all(&svg, |c: &Captures| format!("url(#{})", add(&c[1])));
    let svg = HREF_REF.replace_all(&svg, |c: &Captures| {
        format!("{}href=\"#{}\"", &c[1], add(&c[2]))
    });
    let svg = CLASS_ATTR.replace_all(&svg, |c: &Captures| {
        let tokens: Vec<String> = c[2].split_whitespace().map(|t| add(t)).collect();
        format!("{}class=\"{}\"", &c[1], tokens.join(" "))
    });
    STYLE_BLOCK
        .replace_all(&svg, |c: &Captures| {
            let css = prefix_selectors(&c[2], &ids, &classes, &add);
            format!("{}{}{}", &c[1], css, &c[3])
        })
        .into_owned()
}

/// Rewrite `.class` and `#id` selectors outside declaration blocks.
fn prefix_selectors(
    css: &str,
    ids: &HashSet<String>,
    classes: &HashSet<String>,
    add: &dyn Fn(&str) -> String,
) -> String {
    static SELECTOR_NAME: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([.#])([A-Za-z_][\w-]*)").unwrap());

    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while !rest.is_empty() {
        let (selectors, block) = match rest.find('{') {
            Some(open) => {
                let close = rest[open..].find('}').map_or(rest.len(), |i| open + i + 1);
                (&rest[..open], &rest[open..close])
            }
            None => (rest, ""),
        };
        let prefixed = SELECTOR_NAME.replace_all(selectors, |c: &Captures| {
            let known = match &c[1] {
                "." => classes.contains(&c[2]),
                _ => ids.contains(&c[2]),
            };
            if known {
                format!("{}{}", &c[1], add(&c[2]))
            } else {
                c[0].to_string()
            }
        });
        out.push_str(&prefixed);
        out.push_str(block);
        rest = &rest[selectors.len() + block.len()..];
    }
    out
}

pub fn remove_style_attr(svg: &str) -> String {
    static STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s+style="[^"]*""#).unwrap());
    STYLE.replace_all(svg, "").into_owned()
}

pub fn remove_shape_rendering(svg: &str) -> String {
    static SHAPE_RENDERING: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+(?:shape-rendering|shapeRendering)="[^"]*""#).unwrap());
    SHAPE_RENDERING.replace_all(svg, "").into_owned()
}

/// Strip `width` and `height` from the root element.
pub fn remove_dimensions(svg: &str) -> String {
    static DIMENSION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+(?:width|height)="[^"]*""#).unwrap());
    rewrite_root_tag(svg, |tag| DIMENSION.replace_all(tag, "").into_owned())
}

/// Strip `viewBox` from the root element.
pub fn remove_view_box(svg: &str) -> String {
    static VIEW_BOX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+viewBox="[^"]*""#).unwrap());
    rewrite_root_tag(svg, |tag| VIEW_BOX.replace_all(tag, "").into_owned())
}

fn rewrite_root_tag(svg: &str, rewrite: impl FnOnce(&str) -> String) -> String {
    let Some(span) = root_open_tag(svg) else {
        return svg.to_string();
    };
    let mut out = String::with_capacity(svg.len());
    out.push_str(&svg[..span.start]);
    out.push_str(&rewrite(&svg[span.clone()]));
    out.push_str(&svg[span.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_attrs() {
        let svg = "<svg viewBox=\"0   0\n  24   24 \"><circle /></svg>";
        assert_eq!(cleanup_attrs(svg), "<svg viewBox=\"0 0 24 24\"><circle /></svg>");
    }

    #[test]
    fn test_cleanup_ids_keeps_referenced() {
        let svg = r##"<svg><rect id="unused" /><circle id="used" /><linearGradient id="g" /><use href="#used" fill="url(#g)" /></svg>"##;
        assert_eq!(
            cleanup_ids(svg),
            r##"<svg><rect /><circle id="used" /><linearGradient id="g" /><use href="#used" fill="url(#g)" /></svg>"##
        );
    }

    #[test]
    fn test_cleanup_ids_ignores_data_id() {
        let svg = r#"<svg><rect data-id="x" /></svg>"#;
        assert_eq!(cleanup_ids(svg), svg);
    }

    #[test]
    fn test_remove_empty_attrs() {
        let svg = r#"<svg class="" id=""><circle fill="" r="1" /></svg>"#;
        assert_eq!(remove_empty_attrs(svg), r#"<svg><circle r="1" /></svg>"#);
    }

    #[test]
    fn test_remove_unused_ns() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><circle /></svg>"#;
        assert_eq!(remove_unused_ns(svg), "<svg><circle /></svg>");
    }

    #[test]
    fn test_remove_unused_ns_keeps_xlink_in_use() {
        let svg = r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" /></svg>"##;
        assert_eq!(remove_unused_ns(svg), svg);
    }

    #[test]
    fn test_prefix_ids() {
        let svg = r#"<svg><defs><linearGradient id="grad1" /></defs><circle fill="url(#grad1)" class="cls-1 cls-2" /></svg>"#;
        let out = prefix_ids(svg, "icon_");
        assert!(out.contains(r#"id="icon_grad1""#), "{out}");
        assert!(out.contains("url(#icon_grad1)"), "{out}");
        assert!(out.contains(r#"class="icon_cls-1 icon_cls-2""#), "{out}");
    }

    #[test]
    fn test_prefix_ids_rewrites_href_once() {
        let svg = r##"<svg><path id="p" /><use xlink:href="#p" /><use href="#p" /></svg>"##;
        assert_eq!(
            prefix_ids(svg, "a_"),
            r##"<svg><path id="a_p" /><use xlink:href="#a_p" /><use href="#a_p" /></svg>"##
        );
    }

    #[test]
    fn test_prefix_ids_rewrites_selectors() {
        let svg = r#"<svg><style>.cls{fill:#fff}#dot{stroke:red}.other{}</style><circle id="dot" class="cls" /></svg>"#;
        let out = prefix_ids(svg, "x_");
        assert!(out.contains(".x_cls{fill:#fff}#x_dot{stroke:red}.other{}"), "{out}");
    }

    #[test]
    fn test_prefix_ids_is_idempotent() {
        let svg = r##"<svg><circle id="a" class="b" fill="url(#a)" /><use href="#a" /></svg>"##;
        let once = prefix_ids(svg, "svgr_");
        assert_eq!(prefix_ids(&once, "svgr_"), once);
    }

    #[test]
    fn test_remove_dimensions_only_on_root() {
        let svg = r#"<svg width="24" height="24" viewBox="0 0 24 24"><rect width="10" height="10" /></svg>"#;
        assert_eq!(
            remove_dimensions(svg),
            r#"<svg viewBox="0 0 24 24"><rect width="10" height="10" /></svg>"#
        );
    }

    #[test]
    fn test_remove_view_box() {
        let svg = r#"<svg viewBox="0 0 24 24"><circle /></svg>"#;
        assert_eq!(remove_view_box(svg), "<svg><circle /></svg>");
    }

    #[test]
    fn test_remove_style_and_shape_rendering() {
        let svg = r#"<svg style="background: red" shape-rendering="geometricPrecision"><circle shapeRendering="auto" /></svg>"#;
        let svg = remove_style_attr(svg);
        assert_eq!(remove_shape_rendering(&svg), "<svg><circle /></svg>");
    }
}
