//! SVG optimization passes.
//!
//! Every rule is a pure `&str -> String` rewrite gated by one flag in
//! [`OptimizeOptions`]. [`optimize`] runs the enabled rules in a fixed order:
//! document cleanup, attribute cleanup, element removal, styles, numbers,
//! groups, shapes and paths, then the legacy attribute strippers.

mod attributes;
mod document;
mod elements;
mod groups;
mod numeric;
mod shapes;
mod styles;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use attributes::*;
pub use document::*;
pub use elements::*;
pub use groups::*;
pub use numeric::*;
pub use shapes::*;
pub use styles::*;

/// Prefix used when `prefixIds` is `true` rather than a string.
pub const DEFAULT_ID_PREFIX: &str = "svgr_";

/// `prefixIds` accepts either a flag or the prefix itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefixIds {
    Enabled(bool),
    Prefix(String),
}

impl PrefixIds {
    /// The prefix to apply, if prefixing is on. An empty string counts as off.
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Self::Enabled(true) => Some(DEFAULT_ID_PREFIX),
            Self::Enabled(false) => None,
            Self::Prefix(p) if p.is_empty() => None,
            Self::Prefix(p) => Some(p),
        }
    }
}

impl Default for PrefixIds {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

/// Optimizer options. One flag per rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeOptions {
    /// Remove DOCTYPE
    pub remove_doctype: bool,
    /// Remove XML declaration
    #[serde(rename = "removeXMLProcInst")]
    pub remove_xml_proc_inst: bool,
    /// Remove comments
    pub remove_comments: bool,
    /// Remove metadata elements
    pub remove_metadata: bool,
    /// Remove editor namespaces, their elements and attributes
    #[serde(rename = "removeEditorsNSData")]
    pub remove_editors_ns_data: bool,

    /// Collapse whitespace in attribute values
    pub cleanup_attrs: bool,
    /// Remove ids nothing references
    pub cleanup_ids: bool,
    /// Remove attributes with empty values
    pub remove_empty_attrs: bool,
    /// Remove unused namespace declarations
    #[serde(rename = "removeUnusedNS")]
    pub remove_unused_ns: bool,
    /// Prefix ids and class names (`true` uses the default prefix)
    pub prefix_ids: PrefixIds,

    /// Remove title elements
    pub remove_title: bool,
    /// Remove desc elements
    pub remove_desc: bool,
    /// Remove hidden elements
    pub remove_hidden_elems: bool,
    /// Remove empty containers
    pub remove_empty_containers: bool,
    /// Remove empty text elements
    pub remove_empty_text: bool,
    /// Remove unreferenced elements inside defs
    pub remove_useless_defs: bool,

    /// Minify colors (rgb() -> hex, #ffffff -> #fff, #ff0000 -> red)
    pub convert_colors: bool,
    /// Minify styles
    pub minify_styles: bool,
    /// Move simple stylesheet rules into style attributes
    pub inline_styles: bool,
    /// Merge style elements into one
    pub merge_styles: bool,

    /// Drop redundant zeros and zero units from numbers
    pub cleanup_numeric_values: bool,

    /// Collapse unnecessary groups
    pub collapse_groups: bool,
    /// Hoist attributes shared by every child to the group
    pub move_elems_attrs_to_group: bool,
    /// Push group attributes down to the children
    pub move_group_attrs_to_elems: bool,

    /// Minify path data
    pub convert_path_data: bool,
    /// Remove identity transforms
    pub convert_transform: bool,
    /// Convert basic shapes to paths
    pub convert_shape_to_path: bool,
    /// Merge adjacent paths with same attributes
    pub merge_paths: bool,

    /// Remove style attributes
    pub remove_style_attr: bool,
    /// Remove shape-rendering attributes
    pub remove_shape_rendering: bool,
    /// Remove width and height from the root
    pub remove_dimensions: bool,
    /// Remove viewBox from the root
    pub remove_view_box: bool,
}
impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            remove_doctype: true,
            remove_xml_proc_inst: true,
            remove_comments: true,
            remove_metadata: true,
            remove_editors_ns_data: true,
            cleanup_attrs: true,
            cleanup_ids: false,
            remove_empty_attrs: true,
            remove_unused_ns: true,
            prefix_ids: PrefixIds::default(),
            remove_title: false,
            remove_desc: false,
            remove_hidden_elems: true,
            remove_empty_containers: true,
            remove_empty_text: true,
            remove_useless_defs: false,
            convert_colors: true,
            minify_styles: true,
            inline_styles: false,
            merge_styles: false,
            cleanup_numeric_values: true,
            collapse_groups: true,
            move_elems_attrs_to_group: false,
            move_group_attrs_to_elems: false,
            convert_path_data: false,
            convert_transform: false,
            convert_shape_to_path: false,
            merge_paths: false,
            remove_style_attr: true,
            remove_shape_rendering: true,
            remove_dimensions: false,
            remove_view_box: false,
        }
    }
}

impl OptimizeOptions {
    /// Every rule switched off.
    pub fn none() -> Self {
        Self {
            remove_doctype: false,
            remove_xml_proc_inst: false,
            remove_comments: false,
            remove_metadata: false,
            remove_editors_ns_data: false,
            cleanup_attrs: false,
            cleanup_ids: false,
            remove_empty_attrs: false,
            remove_unused_ns: false,
            prefix_ids: PrefixIds::Enabled(false),
            remove_title: false,
            remove_desc: false,
            remove_hidden_elems: false,
            remove_empty_containers: false,
            remove_empty_text: false,
            remove_useless_defs: false,
            convert_colors: false,
            minify_styles: false,
            inline_styles: false,
            merge_styles: false,
            cleanup_numeric_values: false,
            collapse_groups: false,
            move_elems_attrs_to_group: false,
            move_group_attrs_to_elems: false,
            convert_path_data: false,
            convert_transform: false,
            convert_shape_to_path: false,
            merge_paths: false,
            remove_style_attr: false,
            remove_shape_rendering: false,
            remove_dimensions: false,
            remove_view_box: false,
        }
    }
}

/// The narrow option set of the original transformer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicOptions {
    pub icon: bool,
    pub dimensions: bool,
    pub remove_view_box: bool,
    /// Accepted for compatibility; the fill override happens in code generation.
    pub add_fill_current_color: bool,
}

/// Optimize with the legacy preset: document cleanup, namespace removal and the
/// attribute strippers, nothing structural.
pub fn optimize_basic(svg: &str, options: &BasicOptions) -> String {
    let preset = OptimizeOptions {
        remove_doctype: true,
        remove_xml_proc_inst: true,
        remove_comments: true,
        remove_metadata: true,
        remove_editors_ns_data: true,
        remove_unused_ns: true,
        remove_style_attr: true,
        remove_shape_rendering: true,
        remove_dimensions: options.icon || !options.dimensions,
        remove_view_box: options.remove_view_box,
        ..OptimizeOptions::none()
    };
    optimize(svg, &preset)
}

/// Apply all enabled rules to the document.
pub fn optimize(svg: &str, options: &OptimizeOptions) -> String {
    let mut svg = svg.trim().to_string();
    if svg.is_empty() {
        return svg;
    }

    let mut apply = |enabled: bool, name: &str, rule: &dyn Fn(&str) -> String| {
        if enabled {
            let next = rule(&svg);
            if next != svg {
                debug!(
                    rule = name,
                    before = svg.len(),
                    after = next.len(),
                    "rule rewrote document"
                );
            }
            svg = next;
        }
    };

    // Document cleanup
    apply(options.remove_doctype, "removeDoctype", &remove_doctype);
    apply(options.remove_xml_proc_inst, "removeXMLProcInst", &remove_xml_proc_inst);
    apply(options.remove_comments, "removeComments", &remove_comments);
    apply(options.remove_metadata, "removeMetadata", &remove_metadata);
    apply(options.remove_editors_ns_data, "removeEditorsNSData", &remove_editors_ns_data);

    // Attribute cleanup
    apply(options.cleanup_attrs, "cleanupAttrs", &cleanup_attrs);
    apply(options.cleanup_ids, "cleanupIds", &cleanup_ids);
    apply(options.remove_empty_attrs, "removeEmptyAttrs", &remove_empty_attrs);
    apply(options.remove_unused_ns, "removeUnusedNS", &remove_unused_ns);
    if let Some(prefix) = options.prefix_ids.prefix() {
        apply(true, "prefixIds", &|s: &str| prefix_ids(s, prefix));
    }

    // Element removal
    apply(options.remove_title, "removeTitle", &remove_title);
    apply(options.remove_desc, "removeDesc", &remove_desc);
    apply(options.remove_hidden_elems, "removeHiddenElems", &remove_hidden_elems);
    apply(options.remove_empty_containers, "removeEmptyContainers", &remove_empty_containers);
    apply(options.remove_empty_text, "removeEmptyText", &remove_empty_text);
    apply(options.remove_useless_defs, "removeUselessDefs", &remove_useless_defs);

    // Styles
    apply(options.convert_colors, "convertColors", &convert_colors);
    apply(options.merge_styles, "mergeStyles", &merge_styles);
    apply(options.minify_styles, "minifyStyles", &minify_styles);
    apply(options.inline_styles, "inlineStyles", &inline_styles);

    // Numbers
    apply(options.cleanup_numeric_values, "cleanupNumericValues", &cleanup_numeric_values);

    // Groups. Hoisting and pushing down run before collapsing so a bare group
    // that gains attributes is kept.
    apply(options.move_elems_attrs_to_group, "moveElemsAttrsToGroup", &move_elems_attrs_to_group);
    apply(options.move_group_attrs_to_elems, "moveGroupAttrsToElems", &move_group_attrs_to_elems);
    apply(options.collapse_groups, "collapseGroups", &collapse_groups);
    apply(options.remove_empty_containers, "removeEmptyContainers", &remove_empty_containers);

    // Shapes, paths and transforms
    apply(options.convert_shape_to_path, "convertShapeToPath", &convert_shape_to_path);
    apply(options.convert_path_data, "convertPathData", &convert_path_data);
    apply(options.convert_transform, "convertTransform", &convert_transform);
    apply(options.merge_paths, "mergePaths", &merge_paths);

    // Inlined styles live in style attributes; keep them.
    apply(
        options.remove_style_attr && !options.inline_styles,
        "removeStyleAttr",
        &remove_style_attr,
    );
    apply(options.remove_shape_rendering, "removeShapeRendering", &remove_shape_rendering);
    apply(options.remove_dimensions, "removeDimensions", &remove_dimensions);
    apply(options.remove_view_box, "removeViewBox", &remove_view_box);

    svg
}
