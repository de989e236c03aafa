//! svgr - turn SVG markup into React and React Native components
//!
//! The pipeline is plain text rewriting: optimize the markup, inject props and
//! accessibility hooks on the root element, translate attribute names to JSX,
//! wrap the result in a component template and re-indent it.

mod codegen;
mod config;
mod error;
mod format;
mod host;
mod inject;
mod markup;
mod optimize;
mod path;
mod translate;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use codegen::*;
pub use config::*;
pub use error::*;
pub use format::*;
pub use host::*;
pub use inject::*;
pub use markup::*;
pub use optimize::*;
pub use path::*;
pub use translate::*;

/// Component name used when none is given.
pub const DEFAULT_COMPONENT_NAME: &str = "SvgComponent";

/// Convert SVG markup into component source code.
///
/// Never fails: malformed markup is carried through as best it can be.
pub fn transform(svg: &str, options: &TransformOptions) -> String {
    // JSX can carry neither of these.
    let svg = remove_comments(&remove_xml_proc_inst(svg.trim()));
    let svg = svg.trim();

    let mut svg = if !options.svgo {
        svg.to_string()
    } else if let Some(config) = &options.svgo_config {
        optimize(svg, config)
    } else {
        optimize_basic(svg, &options.basic())
    };

    svg = replace_attr_values(&svg, &options.replace_attr_values);
    if options.add_fill_current_color {
        svg = fill_current_color(&svg);
    }
    svg = add_svg_props(&svg, &options.svg_props);

    let a11y = options.platform != Platform::Native && options.accessible();
    if a11y {
        svg = add_aria_attributes(&svg, options.title_prop, options.desc_prop);
    }
    svg = expand_props(&svg, options.expand_props);
    if options.forward_ref {
        svg = add_ref(&svg);
    }
    if a11y {
        svg = add_title_desc_elements(&svg, options.title_prop, options.desc_prop);
    }

    let translation = translate(&svg, options.platform);
    debug!(
        platform = ?options.platform,
        components = translation.native_components.len(),
        "markup translated"
    );

    let code = generate(&translation.markup, options, &translation.native_components);
    format_code(&code, options.prettier)
}

/// Classic runtime needs `React` in scope; automatic imports nothing for JSX.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsxRuntime {
    #[default]
    Classic,
    Automatic,
}

/// Where `{...props}` goes on the root element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandProps {
    Start,
    #[default]
    End,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportType {
    #[default]
    Default,
    Named,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Web,
    Native,
}

/// One entry of `replaceAttrValues`: every attribute whose value is exactly
/// `from` gets `to` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// One entry of `svgProps`, added to the root element. A value wrapped in
/// braces is emitted as a JSX expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgProp {
    pub name: String,
    pub value: String,
}

/// Everything that shapes the generated component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    pub component_name: String,
    /// Drop width and height so the icon scales with its container.
    pub icon: bool,
    pub typescript: bool,
    /// Re-indent the generated code.
    pub prettier: bool,
    /// Keep width and height on the root element.
    pub dimensions: bool,
    pub add_fill_current_color: bool,
    /// Run the optimizer at all.
    pub svgo: bool,
    pub remove_view_box: bool,
    pub jsx_runtime: JsxRuntime,
    #[serde(rename = "ref")]
    pub forward_ref: bool,
    pub memo: bool,
    pub expand_props: ExpandProps,
    pub title_prop: bool,
    pub desc_prop: bool,
    pub platform: Platform,
    pub export_type: ExportType,
    pub replace_attr_values: Vec<Replacement>,
    pub svg_props: Vec<SvgProp>,
    /// Full optimizer configuration. Without it the basic preset runs.
    pub svgo_config: Option<OptimizeOptions>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            component_name: DEFAULT_COMPONENT_NAME.to_string(),
            icon: true,
            typescript: false,
            prettier: true,
            dimensions: false,
            add_fill_current_color: false,
            svgo: true,
            remove_view_box: false,
            jsx_runtime: JsxRuntime::Classic,
            forward_ref: false,
            memo: false,
            expand_props: ExpandProps::End,
            title_prop: false,
            desc_prop: false,
            platform: Platform::Web,
            export_type: ExportType::Default,
            replace_attr_values: Vec::new(),
            svg_props: Vec::new(),
            svgo_config: None,
        }
    }
}

impl TransformOptions {
    /// The options the basic optimizer preset reads.
    pub fn basic(&self) -> BasicOptions {
        BasicOptions {
            icon: self.icon,
            dimensions: self.dimensions,
            remove_view_box: self.remove_view_box,
            add_fill_current_color: self.add_fill_current_color,
        }
    }

    /// Whether the component takes `title`/`desc` props.
    pub fn accessible(&self) -> bool {
        self.title_prop || self.desc_prop
    }
}
