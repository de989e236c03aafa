//! Shape, path and transform rules.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::markup::{Tag, closing_tag, element_end, render_attr, tags};
use crate::path::{compress_path_data, ellipse_path, line_path, points_path, rect_path};

const SHAPES: &[&str] = &["rect", "circle", "ellipse", "line", "polygon", "polyline"];

const RECT_GEOMETRY: &[&str] = &["x", "y", "width", "height", "rx", "ry"];
const CIRCLE_GEOMETRY: &[&str] = &["cx", "cy", "r"];
const ELLIPSE_GEOMETRY: &[&str] = &["cx", "cy", "rx", "ry"];
const LINE_GEOMETRY: &[&str] = &["x1", "y1", "x2", "y2"];
const POINTS_GEOMETRY: &[&str] = &["points"];

/// Rewrite basic shapes as `<path>` elements with an equivalent `d`, keeping
/// every non-geometry attribute. Shapes with unparseable or degenerate
/// geometry, or with child content, stay as they are.
pub fn convert_shape_to_path(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for tag in tags(svg) {
        if tag.span.start < cursor || !SHAPES.contains(&tag.name.as_str()) {
            continue;
        }
        let Some(end) = element_end(svg, tag.span.start) else {
            continue;
        };
        if let Some(close) = closing_tag(svg, &(tag.span.start..end)) {
            if !svg[tag.span.end..close.start].trim().is_empty() {
                continue;
            }
        }
        let Some(path) = shape_to_path(&tag) else {
            continue;
        };
        out.push_str(&svg[cursor..tag.span.start]);
        out.push_str(&path);
        cursor = end;
    }
    out.push_str(&svg[cursor..]);
    out
}

fn shape_to_path(tag: &Tag) -> Option<String> {
    let attrs = tag.attributes();
    let get = |name: &str| attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
    let num = |name: &str, default: f64| -> Option<f64> {
        match get(name) {
            Some(v) => plain_number(v),
            None => Some(default),
        }
    };

    let (d, geometry) = match tag.name.as_str() {
        "rect" => {
            let (x, y) = (num("x", 0.0)?, num("y", 0.0)?);
            let (width, height) = (num("width", 0.0)?, num("height", 0.0)?);
            if width <= 0.0 || height <= 0.0 {
                return None;
            }
            let rx = get("rx").map(plain_number);
            let ry = get("ry").map(plain_number);
            let (rx, ry) = match (rx, ry) {
                (Some(rx), Some(ry)) => (rx?, ry?),
                (Some(r), None) | (None, Some(r)) => (r?, r?),
                (None, None) => (0.0, 0.0),
            };
            let r = rx.min(ry).min(width / 2.0).min(height / 2.0).max(0.0);
            (rect_path(x, y, width, height, r), RECT_GEOMETRY)
        }
        "circle" => {
            let r = num("r", 0.0)?;
            if r <= 0.0 {
                return None;
            }
            (
                ellipse_path(num("cx", 0.0)?, num("cy", 0.0)?, r, r),
                CIRCLE_GEOMETRY,
            )
        }
        "ellipse" => {
            let (rx, ry) = (num("rx", 0.0)?, num("ry", 0.0)?);
            if rx <= 0.0 || ry <= 0.0 {
                return None;
            }
            (
                ellipse_path(num("cx", 0.0)?, num("cy", 0.0)?, rx, ry),
                ELLIPSE_GEOMETRY,
            )
        }
        "line" => (
            line_path(
                num("x1", 0.0)?,
                num("y1", 0.0)?,
                num("x2", 0.0)?,
                num("y2", 0.0)?,
            ),
            LINE_GEOMETRY,
        ),
        "polygon" => (points_path(get("points")?, true)?, POINTS_GEOMETRY),
        "polyline" => (points_path(get("points")?, false)?, POINTS_GEOMETRY),
        _ => return None,
    };

    let kept: String = attrs
        .iter()
        .filter(|(name, _)| !geometry.contains(&name.as_str()))
        .map(|(name, value)| render_attr(name, value))
        .collect();
    Some(format!("<path{kept} d=\"{d}\"/>"))
}

/// A bare number, optionally in `px`.
fn plain_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.parse().ok().filter(|n: &f64| n.is_finite())
}

/// Compress the syntax of every `d` attribute.
pub fn convert_path_data(svg: &str) -> String {
    static D_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\s)d="([^"]*)""#).unwrap());
    D_ATTR
        .replace_all(svg, |caps: &Captures| {
            format!("{}d=\"{}\"", &caps[1], compress_path_data(&caps[2]))
        })
        .into_owned()
}

/// Drop identity transform functions, removing the attribute when nothing
/// is left. Lists that don't parse as transform functions are left alone.
pub fn convert_transform(svg: &str) -> String {
    static TRANSFORM_ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+transform="([^"]*)""#).unwrap());
    static FUNCTION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").unwrap());

    TRANSFORM_ATTR
        .replace_all(svg, |caps: &Captures| {
            let list = &caps[1];
            let mut kept = Vec::new();
            let mut last = 0;
            for f in FUNCTION.captures_iter(list) {
                let Some(whole) = f.get(0) else { continue };
                if !is_separator(&list[last..whole.start()]) {
                    return caps[0].to_string();
                }
                last = whole.end();
                if !is_identity(&f[1], &f[2]) {
                    kept.push(whole.as_str().trim().to_string());
                }
            }
            if !is_separator(&list[last..]) {
                return caps[0].to_string();
            }
            if kept.is_empty() {
                String::new()
            } else {
                format!(" transform=\"{}\"", kept.join(" "))
            }
        })
        .into_owned()
}

fn is_separator(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == ',')
}

fn is_identity(name: &str, args: &str) -> bool {
    let args: Option<Vec<f64>> = args
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect();
    let Some(args) = args else { return false };

    match (name, args.as_slice()) {
        ("translate", [x]) => *x == 0.0,
        ("translate", [x, y]) => *x == 0.0 && *y == 0.0,
        ("rotate", [a]) | ("rotate", [a, _, _]) => *a == 0.0,
        ("scale", [s]) => *s == 1.0,
        ("scale", [sx, sy]) => *sx == 1.0 && *sy == 1.0,
        ("skewX", [a]) | ("skewY", [a]) => *a == 0.0,
        _ => false,
    }
}

/// Merge runs of adjacent self-closing `<path>` elements whose attributes
/// other than `d` are identical.
pub fn merge_paths(svg: &str) -> String {
    struct Run {
        start: usize,
        end: usize,
        /// Attributes of the first path, in source order.
        attrs: Vec<(String, String)>,
        /// Whitespace kept before `/>`.
        tail: &'static str,
        others: Vec<(String, String)>,
        d: Vec<String>,
    }

    let mut runs: Vec<Run> = Vec::new();
    for tag in tags(svg).into_iter().filter(|t| t.name == "path" && t.self_closing) {
        let attrs = tag.attributes();
        let Some(d) = attrs.iter().find(|(k, _)| k == "d").map(|(_, v)| v.clone()) else {
            continue;
        };
        let others: Vec<(String, String)> =
            attrs.iter().filter(|(k, _)| k != "d").cloned().collect();

        if let Some(run) = runs.last_mut() {
            let adjacent =
                run.end <= tag.span.start && svg[run.end..tag.span.start].trim().is_empty();
            if adjacent && run.others == others {
                run.end = tag.span.end;
                run.d.push(d);
                continue;
            }
        }
        runs.push(Run {
            start: tag.span.start,
            end: tag.span.end,
            attrs,
            tail: if tag.attrs.ends_with(char::is_whitespace) { " " } else { "" },
            others,
            d: vec![d],
        });
    }

    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for run in runs.into_iter().filter(|r| r.d.len() > 1) {
        let merged = run.d.join(" ");
        out.push_str(&svg[cursor..run.start]);
        out.push_str("<path");
        for (name, value) in &run.attrs {
            let value = if name == "d" { merged.as_str() } else { value.as_str() };
            out.push_str(&render_attr(name, value));
        }
        out.push_str(run.tail);
        out.push_str("/>");
        cursor = run.end;
    }
    out.push_str(&svg[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_to_path() {
        let svg = r#"<svg><rect x="0" y="0" width="10" height="10" fill="red" /></svg>"#;
        assert_eq!(
            convert_shape_to_path(svg),
            r#"<svg><path fill="red" d="M0,0h10v10h-10z"/></svg>"#
        );
    }

    #[test]
    fn test_rounded_rect_uses_smallest_radius() {
        let svg = r#"<rect width="10" height="20" rx="8" ry="2" />"#;
        assert_eq!(
            convert_shape_to_path(svg),
            r#"<path d="M2,0h6a2,2 0 0 1 2,2v16a2,2 0 0 1 -2,2h-6a2,2 0 0 1 -2,-2v-16a2,2 0 0 1 2,-2z"/>"#
        );
    }

    #[test]
    fn test_circle_and_line_to_path() {
        let svg = r#"<svg><circle cx="10" cy="10" r="5"></circle><line x1="0" y1="0" x2="10" y2="10" stroke="red" /></svg>"#;
        assert_eq!(
            convert_shape_to_path(svg),
            r#"<svg><path d="M5,10a5,5 0 1 0 10,0a5,5 0 1 0 -10,0"/><path stroke="red" d="M0,0L10,10"/></svg>"#
        );
    }

    #[test]
    fn test_polygon_and_polyline_to_path() {
        let svg = r#"<polygon points="0,0 10,0 10,10" /><polyline points="0 0 5 5" />"#;
        assert_eq!(
            convert_shape_to_path(svg),
            r#"<path d="M0,0L10,0L10,10z"/><path d="M0,0L5,5"/>"#
        );
    }

    #[test]
    fn test_shapes_with_unusable_geometry_are_kept() {
        let svg = r#"<svg><rect width="0" height="10" /><rect width="50%" height="10" /><circle r="0" /><polygon points="1,2" /></svg>"#;
        assert_eq!(convert_shape_to_path(svg), svg);
    }

    #[test]
    fn test_convert_path_data() {
        let svg = r#"<svg><path d="M 0 0 L 10 10 L 20 20" /></svg>"#;
        assert_eq!(convert_path_data(svg), r#"<svg><path d="M0 0L10 10L20 20" /></svg>"#);
    }

    #[test]
    fn test_convert_transform() {
        let svg = r#"<svg><rect transform="translate(0,0)" /><g transform="rotate(0 12 12), scale(2) skewX(0)"><path transform="scale(1 1)"/></g></svg>"#;
        assert_eq!(
            convert_transform(svg),
            r#"<svg><rect /><g transform="scale(2)"><path/></g></svg>"#
        );
    }

    #[test]
    fn test_convert_transform_leaves_unparseable_lists() {
        let svg = r#"<g transform="translate(0) garbage" />"#;
        assert_eq!(convert_transform(svg), svg);
    }

    #[test]
    fn test_merge_paths() {
        let svg = r#"<svg><path d="M0,0L10,10" fill="red"/><path d="M20,20L30,30" fill="red"/> <path d="M1 1" fill="red"/><path d="M2 2" fill="blue"/></svg>"#;
        assert_eq!(
            merge_paths(svg),
            r#"<svg><path d="M0,0L10,10 M20,20L30,30 M1 1" fill="red"/><path d="M2 2" fill="blue"/></svg>"#
        );
    }

    #[test]
    fn test_merge_paths_is_idempotent() {
        let svg = r#"<svg><path d="M0 0" /><path d="M1 1" /><circle /><path d="M2 2" /></svg>"#;
        let once = merge_paths(svg);
        assert_eq!(once, r#"<svg><path d="M0 0 M1 1" /><circle /><path d="M2 2" /></svg>"#);
        assert_eq!(merge_paths(&once), once);
    }

    #[test]
    fn test_merge_paths_single_quoted() {
        let svg = "<svg><path d='M0 0L1 1' fill='red'/><path d='M5 5L6 6' fill='red'/></svg>";
        assert_eq!(
            merge_paths(svg),
            r#"<svg><path d="M0 0L1 1 M5 5L6 6" fill="red"/></svg>"#
        );
    }
}
