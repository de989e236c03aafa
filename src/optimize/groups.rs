//! Group rules: collapsing bare groups and moving presentation attributes
//! between a group and its children.

use std::ops::Range;

use tracing::debug;

use crate::markup::{
    Tag, append_to_tag, child_elements, closing_tag, element_end, render_attr, strip_attr, tags,
};

/// Attributes that inherit from a group to its children.
pub const PRESENTATION_ATTRS: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "fill-opacity",
    "fill-rule",
    "opacity",
    "font-family",
    "font-size",
    "font-weight",
    "text-anchor",
    "dominant-baseline",
];

/// Replace every attribute-less `<g>` by its children until none is left.
/// Groups with any attribute, `id` included, are kept.
pub fn collapse_groups(svg: &str) -> String {
    let mut svg = svg.to_string();
    let mut iterations = 0;
    loop {
        iterations += 1;
        let next = unwrap_bare_groups(&svg);
        if next == svg {
            break;
        }
        svg = next;
    }
    debug!(iterations, "groups collapsed");
    svg
}

fn unwrap_bare_groups(svg: &str) -> String {
    let mut cuts: Vec<Range<usize>> = Vec::new();
    for tag in tags(svg) {
        if tag.name != "g" || !tag.attrs.trim().is_empty() {
            continue;
        }
        let Some(end) = element_end(svg, tag.span.start) else {
            continue;
        };
        let Some(close) = closing_tag(svg, &(tag.span.start..end)) else {
            cuts.push(tag.span.clone());
            continue;
        };

        let content = &svg[tag.span.end..close.start];
        let leading = content.len() - content.trim_start().len();
        let trailing = content.len() - content.trim_end().len();
        if leading == content.len() {
            cuts.push(tag.span.start..end);
        } else {
            cuts.push(tag.span.start..tag.span.end + leading);
            cuts.push(close.start - trailing..end);
        }
    }
    if cuts.is_empty() {
        return svg.to_string();
    }

    cuts.sort_by_key(|r| r.start);
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for cut in cuts {
        let start = cut.start.max(cursor);
        out.push_str(&svg[cursor..start]);
        cursor = cursor.max(cut.end);
    }
    out.push_str(&svg[cursor..]);
    out
}

/// Hoist presentation attributes shared with the same value by every direct
/// child of an innermost group up onto the group.
pub fn move_elems_attrs_to_group(svg: &str) -> String {
    rewrite_innermost_groups(svg, |group, group_text, content| {
        let children = child_elements(content);
        if children.len() < 2 {
            return None;
        }
        let group_attrs = group.attributes();
        let child_attrs: Vec<Vec<(String, String)>> =
            children.iter().map(|c| c.tag.attributes()).collect();

        let common: Vec<(&str, String)> = PRESENTATION_ATTRS
            .iter()
            .filter(|attr| lookup(&group_attrs, attr).is_none())
            .filter_map(|attr| {
                let first = lookup(&child_attrs[0], attr)?;
                child_attrs[1..]
                    .iter()
                    .all(|attrs| lookup(attrs, attr) == Some(first))
                    .then(|| (*attr, first.to_string()))
            })
            .collect();
        if common.is_empty() {
            return None;
        }

        let mut new_content = String::with_capacity(content.len());
        let mut cursor = 0;
        for child in &children {
            let span = child.tag.span.clone();
            let stripped = common
                .iter()
                .fold(content[span.clone()].to_string(), |text, (name, _)| strip_attr(&text, name));
            new_content.push_str(&content[cursor..span.start]);
            new_content.push_str(&stripped);
            cursor = span.end;
        }
        new_content.push_str(&content[cursor..]);

        let added: String = common.iter().map(|(name, value)| render_attr(name, value)).collect();
        let mut open = group_text.to_string();
        let len = open.len();
        append_to_tag(&mut open, 0..len, &added);
        Some((open, new_content))
    })
}

/// Push an innermost group's presentation attributes down onto each direct
/// child that doesn't set them, then drop them from the group.
pub fn move_group_attrs_to_elems(svg: &str) -> String {
    rewrite_innermost_groups(svg, |group, group_text, content| {
        let moved: Vec<(String, String)> = group
            .attributes()
            .into_iter()
            .filter(|(name, _)| PRESENTATION_ATTRS.contains(&name.as_str()))
            .collect();
        let children = child_elements(content);
        if moved.is_empty() || children.is_empty() {
            return None;
        }

        let mut new_content = String::with_capacity(content.len());
        let mut cursor = 0;
        for child in &children {
            let span = child.tag.span.clone();
            let own = child.tag.attributes();
            let added: String = moved
                .iter()
                .filter(|(name, _)| lookup(&own, name).is_none())
                .map(|(name, value)| render_attr(name, value))
                .collect();
            let mut text = content[span.clone()].to_string();
            let len = text.len();
            append_to_tag(&mut text, 0..len, &added);
            new_content.push_str(&content[cursor..span.start]);
            new_content.push_str(&text);
            cursor = span.end;
        }
        new_content.push_str(&content[cursor..]);

        let open = moved
            .iter()
            .fold(group_text.to_string(), |text, (name, _)| strip_attr(&text, name));
        Some((open, new_content))
    })
}

fn lookup<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Apply `rewrite` to every group that contains no other group. It gets the
/// parsed opening tag, its text and the content, and returns a replacement
/// opening tag and content.
fn rewrite_innermost_groups(
    svg: &str,
    rewrite: impl Fn(&Tag, &str, &str) -> Option<(String, String)>,
) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut cursor = 0;
    for tag in tags(svg) {
        if tag.name != "g" || tag.self_closing || tag.span.start < cursor {
            continue;
        }
        let Some(end) = element_end(svg, tag.span.start) else {
            continue;
        };
        let Some(close) = closing_tag(svg, &(tag.span.start..end)) else {
            continue;
        };
        let content = &svg[tag.span.end..close.start];
        if tags(content).iter().any(|t| t.name == "g") {
            continue;
        }
        let Some((open, new_content)) = rewrite(&tag, &svg[tag.span.clone()], content) else {
            continue;
        };
        out.push_str(&svg[cursor..tag.span.start]);
        out.push_str(&open);
        out.push_str(&new_content);
        out.push_str(&svg[close.start..end]);
        cursor = end;
    }
    out.push_str(&svg[cursor..]);
    out
}
