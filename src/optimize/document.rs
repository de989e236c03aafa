//! Document cleanup: prolog, comments, metadata and editor leftovers.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup::remove_elements;

/// Namespace prefixes written by design tools (Inkscape, Sodipodi, Sketch,
/// Illustrator, Affinity).
pub const EDITOR_NAMESPACES: &[&str] = &["inkscape", "sodipodi", "sketch", "i", "x", "serif"];

pub fn remove_doctype(svg: &str) -> String {
    static DOCTYPE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE[^>\[]*(?:\[[^\]]*\])?[^>]*>\s*").unwrap());
    DOCTYPE.replace_all(svg, "").into_owned()
}

pub fn remove_xml_proc_inst(svg: &str) -> String {
    static PROC_INST: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<\?xml(?:\s[^?]*)?\?>\s*").unwrap());
    PROC_INST.replace_all(svg, "").into_owned()
}

pub fn remove_comments(svg: &str) -> String {
    static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
    COMMENT.replace_all(svg, "").into_owned()
}

pub fn remove_metadata(svg: &str) -> String {
    remove_elements(svg, |tag| tag.name == "metadata")
}

/// Strip editor namespace declarations, their prefixed attributes and
/// elements, and vendor data attributes.
pub fn remove_editors_ns_data(svg: &str) -> String {
    static NS_DECL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r#"\s+xmlns:(?:{})="[^"]*""#,
            EDITOR_NAMESPACES.join("|")
        ))
        .unwrap()
    });
    static NS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r#"\s+(?:{}):[\w.-]+="[^"]*""#,
            EDITOR_NAMESPACES.join("|")
        ))
        .unwrap()
    });
    static VENDOR_DATA: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"\s+data-(?:figma[\w-]*|name)="[^"]*""#).unwrap());

    let svg = remove_elements(svg, |tag| {
        tag.name
            .split_once(':')
            .is_some_and(|(prefix, _)| EDITOR_NAMESPACES.contains(&prefix))
    });
    let svg = NS_DECL.replace_all(&svg, "");
    let svg = NS_ATTR.replace_all(&svg, "");
    VENDOR_DATA.replace_all(&svg, "").into_owned()
}
