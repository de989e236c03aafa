//! Color and stylesheet rules.

use std::sync::LazyLock;

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use regex::{Captures, Regex};
use tracing::debug;

use crate::markup::{Tag, append_to_tag, root_open_tag, tags};

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").unwrap());
static CDATA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Six-digit colors with a shorter keyword or three-digit spelling.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("000000", "#000"),
    ("ffffff", "#fff"),
    ("ff0000", "red"),
    ("00ff00", "lime"),
    ("0000ff", "blue"),
    ("ffff00", "yellow"),
    ("00ffff", "cyan"),
    ("ff00ff", "magenta"),
];

/// `rgb(r, g, b)` to hex, then known hex values to keywords, then `#aabbcc`
/// to `#abc`. Fragment references such as `url(#ff0000)` are left alone.
pub fn convert_colors(svg: &str) -> String {
    static RGB: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)rgb\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)").unwrap()
    });
    static HEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(url\([^)]*\)|href="[^"]*")|#([0-9a-fA-F]{6})([\w-]*)"#).unwrap()
    });

    let svg = RGB.replace_all(svg, |caps: &Captures| {
        let channel = |i: usize| caps[i].parse::<u32>().map_or(255, |v| v.min(255));
        format!("#{:02x}{:02x}{:02x}", channel(1), channel(2), channel(3))
    });

    HEX.replace_all(&svg, |caps: &Captures| {
        if caps.get(1).is_some() || !caps[3].is_empty() {
            return caps[0].to_string();
        }
        let hex = caps[2].to_ascii_lowercase();
        if let Some((_, short)) = NAMED_COLORS.iter().find(|(long, _)| *long == hex) {
            return short.to_string();
        }
        let digits = caps[2].as_bytes();
        if digits[0] == digits[1] && digits[2] == digits[3] && digits[4] == digits[5] {
            format!(
                "#{}{}{}",
                digits[0] as char, digits[2] as char, digits[4] as char
            )
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

fn minified() -> PrinterOptions<'static> {
    PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    }
}

/// Minify the contents of every `<style>` block. A block that doesn't parse
/// as CSS is left as it is.
pub fn minify_styles(svg: &str) -> String {
    STYLE_BLOCK
        .replace_all(svg, |caps: &Captures| match minify_css(&caps[1]) {
            Some(css) => format!("<style>{css}</style>"),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn minify_css(css: &str) -> Option<String> {
    let css = CDATA.replace_all(css, "$1");
    let stylesheet = StyleSheet::parse(&css, ParserOptions::default()).ok()?;
    let result = stylesheet.to_css(minified()).ok()?;
    Some(result.code)
}

/// Concatenate all `<style>` blocks into one, placed as the first child of
/// the root element.
pub fn merge_styles(svg: &str) -> String {
    let blocks: Vec<String> = STYLE_BLOCK
        .captures_iter(svg)
        .map(|c| c[1].trim().to_string())
        .collect();
    if blocks.len() <= 1 {
        return svg.to_string();
    }

    let stripped = STYLE_BLOCK.replace_all(svg, "").into_owned();
    let Some(root) = root_open_tag(&stripped) else {
        return svg.to_string();
    };
    let mut out = stripped;
    out.insert_str(root.end, &format!("<style>{}</style>", blocks.concat()));
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Element(String),
    Class(String),
    Id(String),
}

impl Selector {
    fn parse(text: &str) -> Option<Self> {
        static SIMPLE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^([.#]?)([A-Za-z_][\w-]*)$").unwrap());
        let caps = SIMPLE.captures(text.trim())?;
        let name = caps[2].to_string();
        Some(match &caps[1] {
            "." => Self::Class(name),
            "#" => Self::Id(name),
            _ => Self::Element(name),
        })
    }

    fn specificity(&self) -> u8 {
        match self {
            Self::Element(_) => 0,
            Self::Class(_) => 1,
            Self::Id(_) => 2,
        }
    }

    fn matches(&self, tag: &Tag) -> bool {
        match self {
            Self::Element(name) => tag.name == *name,
            Self::Class(name) => tag
                .get_attr("class")
                .is_some_and(|c| c.split_whitespace().any(|t| t == name)),
            Self::Id(name) => tag.get_attr("id").as_deref() == Some(name.as_str()),
        }
    }
}

#[derive(Debug)]
struct SimpleRule {
    selector: Selector,
    declarations: String,
}

/// Parse a stylesheet made only of simple selector rules. `None` when it
/// doesn't parse or any rule uses something else (combinators,
/// pseudo-classes, at-rules).
fn parse_simple_rules(css: &str) -> Option<Vec<SimpleRule>> {
    let css = CDATA.replace_all(css, "$1");
    let stylesheet = StyleSheet::parse(&css, ParserOptions::default()).ok()?;

    let mut rules = Vec::new();
    for rule in &stylesheet.rules.0 {
        let CssRule::Style(style_rule) = rule else {
            return None;
        };
        let selectors = style_rule.selectors.to_css_string(minified()).ok()?;
        let declarations = style_rule.declarations.to_css_string(minified()).ok()?;
        for selector in selectors.split(',') {
            let selector = Selector::parse(selector)?;
            if !declarations.is_empty() {
                rules.push(SimpleRule {
                    selector,
                    declarations: declarations.clone(),
                });
            }
        }
    }
    rules.sort_by_key(|r| r.selector.specificity());
    Some(rules)
}

/// Move simple `.class`, `#id` and `element` rules into `style` attributes
/// and drop the `<style>` blocks. Existing inline declarations stay last so
/// they keep winning.
pub fn inline_styles(svg: &str) -> String {
    if !STYLE_BLOCK.is_match(svg) {
        return svg.to_string();
    }
    let css: String = STYLE_BLOCK.captures_iter(svg).map(|c| c[1].to_string()).collect();
    let Some(rules) = parse_simple_rules(&css) else {
        debug!("stylesheet uses complex selectors, leaving it in place");
        return svg.to_string();
    };

    let svg = STYLE_BLOCK.replace_all(svg, "").into_owned();
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for tag in tags(&svg) {
        let matched: Vec<&str> = rules
            .iter()
            .filter(|r| r.selector.matches(&tag))
            .map(|r| r.declarations.as_str())
            .collect();
        if matched.is_empty() {
            continue;
        }
        out.push_str(&svg[cursor..tag.span.start]);
        out.push_str(&with_style(&svg[tag.span.clone()], &tag, &matched.join(";")));
        cursor = tag.span.end;
    }
    out.push_str(&svg[cursor..]);
    out
}

fn with_style(tag_text: &str, tag: &Tag, declarations: &str) -> String {
    static STYLE_ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(\s)style="([^"]*)""#).unwrap());

    match tag.get_attr("style") {
        Some(existing) if STYLE_ATTR.is_match(tag_text) => {
            let existing = existing.trim().trim_end_matches(';');
            let merged = if existing.is_empty() {
                declarations.to_string()
            } else {
                format!("{declarations};{existing}")
            };
            STYLE_ATTR
                .replace(tag_text, |c: &Captures| format!("{}style=\"{merged}\"", &c[1]))
                .into_owned()
        }
        _ => {
            let mut text = tag_text.to_string();
            append_to_tag(&mut text, 0..tag_text.len(), &format!(" style=\"{declarations}\""));
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_colors_keywords_and_short_hex() {
        let svg = r##"<svg><circle fill="#ff0000" stroke="#00FF00" /><rect fill="#ffffff" stroke="#000000" /><path fill="#aabbcc" stroke="#abcdef" /></svg>"##;
        assert_eq!(
            convert_colors(svg),
            r##"<svg><circle fill="red" stroke="lime" /><rect fill="#fff" stroke="#000" /><path fill="#abc" stroke="#abcdef" /></svg>"##
        );
    }

    #[test]
    fn test_convert_colors_rgb() {
        assert_eq!(
            convert_colors(r#"<circle fill="rgb(255, 0, 0)" stroke="rgb(17,34,300)" />"#),
            r##"<circle fill="red" stroke="#12f" />"##
        );
    }

    #[test]
    fn test_convert_colors_skips_references() {
        let svg = r##"<svg><rect fill="url(#ff0000)" /><use href="#aabbcc" /><rect fill="#ff0000aa" /></svg>"##;
        assert_eq!(convert_colors(svg), svg);
    }

    #[test]
    fn test_minify_styles() {
        let svg = "<svg><style type=\"text/css\">  .cls-1 {   fill: red;   } /* note */ </style><circle /></svg>";
        assert_eq!(minify_styles(svg), "<svg><style>.cls-1{fill:red}</style><circle /></svg>");
        let once = minify_styles(svg);
        assert_eq!(minify_styles(&once), once);
    }

    #[test]
    fn test_merge_styles() {
        let svg = "<svg><style>.a{fill:red;}</style><circle /><style>.b{fill:blue;}</style></svg>";
        assert_eq!(
            merge_styles(svg),
            "<svg><style>.a{fill:red;}.b{fill:blue;}</style><circle /></svg>"
        );
    }

    #[test]
    fn test_inline_styles() {
        let svg = r#"<svg><style>.cls{fill:red;}</style><circle class="cls" /></svg>"#;
        assert_eq!(
            inline_styles(svg),
            r#"<svg><circle class="cls" style="fill:red" /></svg>"#
        );
    }

    #[test]
    fn test_inline_styles_orders_by_specificity() {
        let svg = r#"<svg><style>#dot{fill:none}.c{fill:red}circle{stroke:red}</style><circle id="dot" class="c" style="opacity:.5;" /></svg>"#;
        assert_eq!(
            inline_styles(svg),
            r#"<svg><circle id="dot" class="c" style="stroke:red;fill:red;fill:none;opacity:.5" /></svg>"#
        );
    }

    #[test]
    fn test_inline_styles_leaves_complex_sheets() {
        let svg = r#"<svg><style>g > circle{fill:red}</style><g><circle /></g></svg>"#;
        assert_eq!(inline_styles(svg), svg);

        let media = r#"<svg><style>@media print{.a{fill:red}}</style><circle class="a" /></svg>"#;
        assert_eq!(inline_styles(media), media);
    }
}
