//! Path data helpers: number formatting, `d` string builders for basic shapes,
//! and textual compression of existing `d` attributes.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html

use std::sync::LazyLock;

use regex::Regex;

/// Format a number the way a script engine prints it: shortest round-trip
/// representation, no trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    if !n.is_finite() {
        return "0".into();
    }

    let mut buf = ryu::Buffer::new();
    let s = buf.format_finite(n);
    match s.strip_suffix(".0") {
        Some(int) => int.to_string(),
        None => s.to_string(),
    }
}

/// Parse the leading numeric part of an attribute value (`"10px"` -> 10).
pub fn parse_leading_number(value: &str) -> Option<f64> {
    static NUMBER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\s*[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").unwrap());

    NUMBER
        .find(value)
        .and_then(|m| m.as_str().trim().parse().ok())
}

/// `d` for a rectangle, with rounded corners when `r > 0`.
pub fn rect_path(x: f64, y: f64, width: f64, height: f64, r: f64) -> String {
    let n = format_number;
    if r > 0.0 {
        let start_x = n(x + r);
        let inner_w = n(width - 2.0 * r);
        let inner_h = n(height - 2.0 * r);
        let r = n(r);
        format!(
            "M{start_x},{}h{inner_w}a{r},{r} 0 0 1 {r},{r}v{inner_h}a{r},{r} 0 0 1 -{r},{r}h-{inner_w}a{r},{r} 0 0 1 -{r},-{r}v-{inner_h}a{r},{r} 0 0 1 {r},-{r}z",
            n(y),
        )
    } else {
        format!(
            "M{},{}h{}v{}h-{}z",
            n(x),
            n(y),
            n(width),
            n(height),
            n(width)
        )
    }
}

/// `d` for an ellipse (a circle when `rx == ry`) drawn as two half arcs.
pub fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    let n = format_number;
    let (rx_s, ry_s, dx) = (n(rx), n(ry), n(2.0 * rx));
    format!(
        "M{},{}a{rx_s},{ry_s} 0 1 0 {dx},0a{rx_s},{ry_s} 0 1 0 -{dx},0",
        n(cx - rx),
        n(cy)
    )
}

/// `d` for a straight line.
pub fn line_path(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    let n = format_number;
    format!("M{},{}L{},{}", n(x1), n(y1), n(x2), n(y2))
}

/// `d` for a `points` list. Coordinates are copied verbatim; a trailing odd
/// coordinate is dropped. `None` when there are fewer than two points.
pub fn points_path(points: &str, close: bool) -> Option<String> {
    let coords: Vec<&str> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if coords.len() < 4 {
        return None;
    }

    let mut d = String::new();
    for (i, pair) in coords.chunks_exact(2).enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(pair[0]);
        d.push(',');
        d.push_str(pair[1]);
    }
    if close {
        d.push('z');
    }
    Some(d)
}

/// Compress the syntax of a `d` attribute without changing its commands.
pub fn compress_path_data(d: &str) -> String {
    static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
    static AFTER_COMMAND: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"([MLHVCSQTAZmlhvcsqtaz])\s+").unwrap());
    static BEFORE_COMMAND: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+([MLHVCSQTAZmlhvcsqtaz])").unwrap());
    static BEFORE_MINUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)\s+-").unwrap());
    static COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").unwrap());
    static LEADING_ZERO: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(^|[^\d._])0+\.(\d)").unwrap());
    static TRAILING_ZEROS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\.\d*?)0+(\s|$|[A-Za-z])").unwrap());
    static BARE_POINT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.(\s|$|[A-Za-z])").unwrap());

    let d = WHITESPACE.replace_all(d, " ");
    let d = AFTER_COMMAND.replace_all(&d, "$1");
    let d = BEFORE_COMMAND.replace_all(&d, "$1");
    let d = BEFORE_MINUS.replace_all(&d, "$1-");
    let d = COMMA.replace_all(&d, " ");
    let d = WHITESPACE.replace_all(&d, " ");
    let d = d.trim();
    let d = LEADING_ZERO.replace_all(d, "${1}.${2}");
    let d = TRAILING_ZEROS.replace_all(&d, "${1}${2}");
    BARE_POINT.replace_all(&d, "$1").into_owned()
}
