//! Component source around translated markup.

use crate::markup::tag_at;
use crate::{ExportType, JsxRuntime, Platform, TransformOptions};

const MARKUP_INDENT: &str = "    ";

/// Build the component module: imports, props interface, component, export.
pub fn generate(markup: &str, options: &TransformOptions, native_components: &[&str]) -> String {
    let segments = [
        imports(options, native_components),
        props_interface(options),
        component(markup, options),
        export(options),
    ];
    segments
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn imports(options: &TransformOptions, native_components: &[&str]) -> String {
    let mut helpers = Vec::new();
    if options.forward_ref {
        helpers.push("forwardRef");
    }
    if options.memo {
        helpers.push("memo");
    }

    let mut lines = Vec::new();
    if options.jsx_runtime == JsxRuntime::Classic && helpers.is_empty() {
        lines.push(r#"import * as React from "react";"#.to_string());
    }
    if !helpers.is_empty() {
        lines.push(format!(r#"import {{ {} }} from "react";"#, helpers.join(", ")));
    }

    let native = options.platform == Platform::Native;
    if options.typescript {
        let mut types = Vec::new();
        if !native {
            types.push("SVGProps");
        }
        if options.forward_ref {
            types.push("Ref");
        }
        if !types.is_empty() {
            lines.push(format!(r#"import type {{ {} }} from "react";"#, types.join(", ")));
        }
    }

    if native {
        let mut components: Vec<&str> = native_components.to_vec();
        if !components.contains(&"Svg") {
            components.push("Svg");
        }
        components.sort_unstable();
        components.dedup();
        lines.push(format!(
            r#"import {{ {} }} from "react-native-svg";"#,
            components.join(", ")
        ));
        if options.typescript {
            lines.push(r#"import type { SvgProps } from "react-native-svg";"#.to_string());
        }
    }
    lines.join("\n")
}

fn base_props_type(options: &TransformOptions) -> &'static str {
    match options.platform {
        Platform::Web => "SVGProps<SVGSVGElement>",
        Platform::Native => "SvgProps",
    }
}

fn ref_type(options: &TransformOptions) -> &'static str {
    match options.platform {
        Platform::Web => "Ref<SVGSVGElement>",
        Platform::Native => "Ref<Svg>",
    }
}

fn props_interface(options: &TransformOptions) -> String {
    if !options.typescript || !options.accessible() {
        return String::new();
    }
    let mut lines = vec![format!("interface SVGRProps extends {} {{", base_props_type(options))];
    if options.title_prop {
        lines.push("title?: string;".to_string());
        lines.push("titleId?: string;".to_string());
    }
    if options.desc_prop {
        lines.push("desc?: string;".to_string());
        lines.push("descId?: string;".to_string());
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn params(options: &TransformOptions) -> String {
    let props = if options.accessible() {
        let mut names = Vec::new();
        if options.title_prop {
            names.extend(["title", "titleId"]);
        }
        if options.desc_prop {
            names.extend(["desc", "descId"]);
        }
        let pattern = format!("{{ {}, ...props }}", names.join(", "));
        if options.typescript {
            format!("{pattern}: SVGRProps")
        } else {
            pattern
        }
    } else if options.typescript {
        format!("props: {}", base_props_type(options))
    } else {
        "props".to_string()
    };

    if !options.forward_ref {
        return props;
    }
    if options.typescript {
        format!("{props}, ref: {}", ref_type(options))
    } else {
        format!("{props}, ref")
    }
}

fn component(markup: &str, options: &TransformOptions) -> String {
    let body = format!(
        "({}) => {{\n  return (\n{}\n  );\n}}",
        params(options),
        layout_markup(markup)
    );
    let body = match (options.memo, options.forward_ref) {
        (false, false) => body,
        (false, true) => format!("forwardRef({body})"),
        (true, false) => format!("memo({body})"),
        (true, true) => format!("memo(forwardRef({body}))"),
    };
    format!("const {} = {body};", options.component_name)
}

fn export(options: &TransformOptions) -> String {
    match options.export_type {
        ExportType::Default => format!("export default {};", options.component_name),
        ExportType::Named => format!("export {{ {} }};", options.component_name),
    }
}

/// One markup line per source line, with the root opening and closing tags
/// on lines of their own.
pub fn layout_markup(markup: &str) -> String {
    let markup = markup.trim();
    let mut lines: Vec<&str> = Vec::new();
    match tag_at(markup, 0) {
        Some(root) if !root.self_closing => {
            let rest = &markup[root.span.end..];
            let (inner, close) = match rest.rfind("</") {
                Some(i) => (&rest[..i], &rest[i..]),
                None => (rest, ""),
            };
            lines.push(&markup[root.span.clone()]);
            lines.extend(inner.lines());
            lines.push(close);
        }
        _ => lines.extend(markup.lines()),
    }
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| format!("{MARKUP_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TransformOptions {
        TransformOptions::default()
    }

    #[test]
    fn test_plain_component() {
        let code = generate("<svg {...props}><path /></svg>", &options(), &[]);
        assert_eq!(
            code,
            "import * as React from \"react\";\n\
             const SvgComponent = (props) => {\n  return (\n    <svg {...props}>\n    <path />\n    </svg>\n  );\n};\n\
             export default SvgComponent;"
        );
    }

    #[test]
    fn test_memo_and_ref_wrapping() {
        let opts = TransformOptions {
            memo: true,
            forward_ref: true,
            ..options()
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(code.starts_with("import { forwardRef, memo } from \"react\";\n"));
        assert!(!code.contains("import * as React"));
        assert!(code.contains("const SvgComponent = memo(forwardRef((props, ref) => {"));
        assert!(code.contains("}));"));
    }

    #[test]
    fn test_typed_automatic_imports() {
        let opts = TransformOptions {
            typescript: true,
            jsx_runtime: JsxRuntime::Automatic,
            ..options()
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(code.starts_with("import type { SVGProps } from \"react\";\n"));
        assert!(code.contains("(props: SVGProps<SVGSVGElement>) => {"));

        let opts = TransformOptions {
            forward_ref: true,
            ..opts
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(code.contains("import { forwardRef } from \"react\";"));
        assert!(code.contains("import type { SVGProps, Ref } from \"react\";"));
        assert!(code.contains("(props: SVGProps<SVGSVGElement>, ref: Ref<SVGSVGElement>) => {"));
    }

    #[test]
    fn test_accessible_props() {
        let opts = TransformOptions {
            typescript: true,
            title_prop: true,
            desc_prop: true,
            ..options()
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(code.contains(
            "interface SVGRProps extends SVGProps<SVGSVGElement> {\ntitle?: string;\ntitleId?: string;\ndesc?: string;\ndescId?: string;\n}"
        ));
        assert!(code.contains("({ title, titleId, desc, descId, ...props }: SVGRProps) => {"));
    }

    #[test]
    fn test_untyped_accessible_props_have_no_interface() {
        let opts = TransformOptions {
            title_prop: true,
            ..options()
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(!code.contains("interface"));
        assert!(code.contains("({ title, titleId, ...props }) => {"));
    }

    #[test]
    fn test_native_imports() {
        let opts = TransformOptions {
            platform: Platform::Native,
            typescript: true,
            forward_ref: true,
            ..options()
        };
        let code = generate("<Svg />", &opts, &["Circle", "Path", "Svg"]);
        assert!(code.contains("import { Circle, Path, Svg } from \"react-native-svg\";"));
        assert!(code.contains("import type { SvgProps } from \"react-native-svg\";"));
        assert!(code.contains("import type { Ref } from \"react\";"));
        assert!(code.contains("(props: SvgProps, ref: Ref<Svg>) => {"));
        assert!(!code.contains("SVGProps"));
    }

    #[test]
    fn test_named_export() {
        let opts = TransformOptions {
            component_name: "Icon".into(),
            export_type: ExportType::Named,
            ..options()
        };
        let code = generate("<svg />", &opts, &[]);
        assert!(code.contains("const Icon = (props) => {"));
        assert!(code.ends_with("export { Icon };"));
    }

    #[test]
    fn test_layout_markup() {
        assert_eq!(
            layout_markup("<svg a=\"1\"><g>\n  <path/>\n</g></svg>"),
            "    <svg a=\"1\">\n    <g>\n    <path/>\n    </g>\n    </svg>"
        );
        assert_eq!(layout_markup("<svg/>"), "    <svg/>");
    }
}
