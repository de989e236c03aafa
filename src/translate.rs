//! SVG attribute and element names to their JSX spelling.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::Platform;
use crate::markup::tags;

/// Markup attribute names and their JSX props.
pub const ATTRIBUTE_MAP: &[(&str, &str)] = &[
    ("class", "className"),
    ("for", "htmlFor"),
    ("stroke-width", "strokeWidth"),
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-miterlimit", "strokeMiterlimit"),
    ("stroke-dasharray", "strokeDasharray"),
    ("stroke-dashoffset", "strokeDashoffset"),
    ("stroke-opacity", "strokeOpacity"),
    ("fill-rule", "fillRule"),
    ("fill-opacity", "fillOpacity"),
    ("clip-path", "clipPath"),
    ("clip-rule", "clipRule"),
    ("font-family", "fontFamily"),
    ("font-size", "fontSize"),
    ("font-weight", "fontWeight"),
    ("font-style", "fontStyle"),
    ("text-anchor", "textAnchor"),
    ("text-decoration", "textDecoration"),
    ("dominant-baseline", "dominantBaseline"),
    ("alignment-baseline", "alignmentBaseline"),
    ("letter-spacing", "letterSpacing"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("flood-color", "floodColor"),
    ("flood-opacity", "floodOpacity"),
    ("color-interpolation-filters", "colorInterpolationFilters"),
    ("marker-start", "markerStart"),
    ("marker-mid", "markerMid"),
    ("marker-end", "markerEnd"),
    ("paint-order", "paintOrder"),
    ("vector-effect", "vectorEffect"),
    ("shape-rendering", "shapeRendering"),
    ("xlink:href", "xlinkHref"),
    ("xml:space", "xmlSpace"),
    ("xmlns:xlink", "xmlnsXlink"),
];

/// SVG elements and their react-native-svg components.
pub const NATIVE_ELEMENT_MAP: &[(&str, &str)] = &[
    ("svg", "Svg"),
    ("circle", "Circle"),
    ("clipPath", "ClipPath"),
    ("defs", "Defs"),
    ("ellipse", "Ellipse"),
    ("foreignObject", "ForeignObject"),
    ("g", "G"),
    ("image", "Image"),
    ("line", "Line"),
    ("linearGradient", "LinearGradient"),
    ("marker", "Marker"),
    ("mask", "Mask"),
    ("path", "Path"),
    ("pattern", "Pattern"),
    ("polygon", "Polygon"),
    ("polyline", "Polyline"),
    ("radialGradient", "RadialGradient"),
    ("rect", "Rect"),
    ("stop", "Stop"),
    ("symbol", "Symbol"),
    ("text", "Text"),
    ("textPath", "TextPath"),
    ("tspan", "TSpan"),
    ("use", "Use"),
];

/// Translated markup plus what the native import list needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub markup: String,
    /// Sorted component names used by the markup; empty on the web.
    pub native_components: Vec<&'static str>,
}

pub fn translate(svg: &str, platform: Platform) -> Translation {
    let markup = translate_attributes(svg);
    match platform {
        Platform::Web => Translation {
            markup,
            native_components: Vec::new(),
        },
        Platform::Native => {
            let markup = remap_native_elements(&markup);
            let native_components = native_components_used(&markup);
            debug!(?native_components, "native components used");
            Translation {
                markup,
                native_components,
            }
        }
    }
}

/// Rename mapped attributes and turn `style="..."` into a style object, inside
/// opening tags only.
pub fn translate_attributes(svg: &str) -> String {
    static ATTR_NAME: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\s)([A-Za-z][\w:.-]*)=").unwrap());
    static STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(\s)style="([^"]*)""#).unwrap());

    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for tag in tags(svg) {
        let text = &svg[tag.span.clone()];
        let renamed = ATTR_NAME.replace_all(text, |caps: &Captures| {
            match ATTRIBUTE_MAP.iter().find(|(name, _)| *name == &caps[2]) {
                Some((_, prop)) => format!("{}{prop}=", &caps[1]),
                None => caps[0].to_string(),
            }
        });
        let styled = STYLE.replace_all(&renamed, |caps: &Captures| {
            format!("{}style={}", &caps[1], style_to_object(&caps[2]))
        });
        out.push_str(&svg[cursor..tag.span.start]);
        out.push_str(&styled);
        cursor = tag.span.end;
    }
    out.push_str(&svg[cursor..]);
    out
}

/// `fill: red; stroke-width: 2` to `{{ fill: "red", strokeWidth: "2" }}`.
pub fn style_to_object(css: &str) -> String {
    let entries: Vec<String> = css
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() {
                return None;
            }
            let value = value.replace('\\', "\\\\").replace('"', "\\\"");
            Some(format!("{}: \"{value}\"", style_key(name)))
        })
        .collect();
    if entries.is_empty() {
        "{{}}".to_string()
    } else {
        format!("{{{{ {} }}}}", entries.join(", "))
    }
}

/// CSS property name to an object key. Custom properties stay quoted,
/// vendor prefixes other than `-ms-` are capitalized.
fn style_key(name: &str) -> String {
    if name.starts_with("--") {
        return format!("\"{name}\"");
    }
    let (name, capitalize_first) = match name.strip_prefix('-') {
        Some(rest) if rest.starts_with("ms-") => (rest, false),
        Some(rest) => (rest, true),
        None => (name, false),
    };

    let mut key = String::with_capacity(name.len());
    let mut upper = capitalize_first;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    key
}

/// Rename every mapped element's opening and closing tags.
pub fn remap_native_elements(svg: &str) -> String {
    static ELEMENT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][\w.-]*)([\s/>])").unwrap());

    ELEMENT
        .replace_all(svg, |caps: &Captures| {
            match NATIVE_ELEMENT_MAP.iter().find(|(name, _)| *name == &caps[2]) {
                Some((_, component)) => format!("<{}{component}{}", &caps[1], &caps[3]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Sorted, de-duplicated native components that appear in the markup.
pub fn native_components_used(svg: &str) -> Vec<&'static str> {
    let found: BTreeSet<&'static str> = tags(svg)
        .iter()
        .filter_map(|tag| {
            NATIVE_ELEMENT_MAP
                .iter()
                .find(|(_, component)| *component == tag.name)
                .map(|(_, component)| *component)
        })
        .collect();
    found.into_iter().collect()
}
