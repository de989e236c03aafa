//! Optimizer behavior on whole documents.

use svgr::{
    OptimizeOptions, PrefixIds, cleanup_attrs, cleanup_ids, cleanup_numeric_values, collapse_groups,
    convert_colors, convert_path_data, convert_shape_to_path, convert_transform, inline_styles,
    merge_paths, merge_styles, minify_styles, optimize, prefix_ids, remove_comments,
    remove_doctype, remove_editors_ns_data, remove_empty_attrs, remove_empty_containers,
    remove_empty_text, remove_hidden_elems, remove_metadata, remove_unused_ns,
    remove_useless_defs, remove_xml_proc_inst,
};

const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- Generator: hand -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="24" height="24" viewBox="0 0 24 24">
  <metadata>made by hand</metadata>
  <defs>
    <linearGradient id="grad"><stop offset="0%" stop-color="rgb(255, 0, 0)"/></linearGradient>
    <linearGradient id="unused"><stop offset="1"/></linearGradient>
  </defs>
  <style>.a { fill: #ffffff; }</style>
  <g><g fill="#ff0000"><rect x="0" y="0" width="10" height="10" class="a"/><circle cx="5" cy="5" r="0.50"/></g></g>
  <path d="M 0 0 L 10 10" transform="translate(0)" fill="url(#grad)"/>
  <path d="M 1 1 L 2 2" transform="translate(0)" fill="url(#grad)"/>
  <text> </text>
  <g style="display:none"><path d="M0 0"/></g>
  <g></g>
</svg>"##;

/// Test that every rule is a no-op on its own output.
#[test]
fn test_rules_are_idempotent() {
    let rules: &[(&str, fn(&str) -> String)] = &[
        ("removeDoctype", remove_doctype),
        ("removeXMLProcInst", remove_xml_proc_inst),
        ("removeComments", remove_comments),
        ("removeMetadata", remove_metadata),
        ("removeEditorsNSData", remove_editors_ns_data),
        ("cleanupAttrs", cleanup_attrs),
        ("cleanupIds", cleanup_ids),
        ("removeEmptyAttrs", remove_empty_attrs),
        ("removeUnusedNS", remove_unused_ns),
        ("removeHiddenElems", remove_hidden_elems),
        ("removeEmptyContainers", remove_empty_containers),
        ("removeEmptyText", remove_empty_text),
        ("removeUselessDefs", remove_useless_defs),
        ("convertColors", convert_colors),
        ("mergeStyles", merge_styles),
        ("minifyStyles", minify_styles),
        ("inlineStyles", inline_styles),
        ("cleanupNumericValues", cleanup_numeric_values),
        ("collapseGroups", collapse_groups),
        ("convertShapeToPath", convert_shape_to_path),
        ("convertPathData", convert_path_data),
        ("convertTransform", convert_transform),
        ("mergePaths", merge_paths),
    ];

    for (name, rule) in rules {
        let once = rule(ICON);
        let twice = rule(&once);
        assert_eq!(once, twice, "{name} is not idempotent");
    }

    let once = prefix_ids(ICON, "icon_");
    assert_eq!(prefix_ids(&once, "icon_"), once, "prefixIds is not idempotent");
}

/// Test that document cleanup removes prologue text only when asked.
#[test]
fn test_document_cleanup_toggles() {
    let out = optimize(ICON, &OptimizeOptions::default());
    assert!(!out.contains("<!DOCTYPE"), "DOCTYPE not removed");
    assert!(!out.contains("<?xml"), "XML declaration not removed");
    assert!(!out.contains("<!--"), "comment not removed");

    let kept = optimize(ICON, &OptimizeOptions::none());
    assert!(kept.contains(r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN""#));
    assert!(kept.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(kept.contains("<!-- Generator: hand -->"));
}

/// Test that editor namespaces, their elements and their attributes go away.
#[test]
fn test_inkscape_cleanup() {
    let inkscape_svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     inkscape:version="1.0"
     sodipodi:docname="test.svg">
  <sodipodi:namedview inkscape:zoom="1"/>
  <g inkscape:label="Layer 1">
    <rect x="0" y="0" width="100" height="100"/>
  </g>
</svg>"#;

    let out = optimize(inkscape_svg, &OptimizeOptions::default());

    assert!(!out.contains("inkscape"), "inkscape data not removed: {out}");
    assert!(!out.contains("sodipodi"), "sodipodi data not removed: {out}");
    assert!(!out.contains("<g"), "bare group not collapsed: {out}");
    assert!(out.starts_with("<svg>"), "default namespace not removed: {out}");
    assert!(out.contains(r#"<rect x="0" y="0" width="100" height="100"/>"#));
}

/// Test that only referenced ids survive unused-id cleanup.
#[test]
fn test_unused_ids() {
    let svg = r##"<svg><linearGradient id="used"/><linearGradient id="lonely"/><rect fill="url(#used)"/><use href="#used"/></svg>"##;
    let options = OptimizeOptions {
        cleanup_ids: true,
        ..OptimizeOptions::none()
    };
    let out = optimize(svg, &options);
    assert!(out.contains(r#"id="used""#), "referenced id removed: {out}");
    assert!(!out.contains("lonely"), "unreferenced id kept: {out}");
}

/// Test color minification through the pipeline.
#[test]
fn test_color_minification() {
    let svg = r##"<svg>
        <rect fill="#ff0000"/>
        <rect fill="#ffffff"/>
        <rect fill="#aabbcc"/>
    </svg>"##;

    let out = optimize(svg, &OptimizeOptions::default());

    assert!(out.contains(r#"fill="red""#), "red color not shortened");
    assert!(out.contains(r##"fill="#fff""##), "#ffffff not shortened to #fff");
    assert!(out.contains(r##"fill="#abc""##), "#aabbcc not shortened to #abc");
}

/// Test that basic shapes become paths with their other attributes kept.
#[test]
fn test_shapes_become_compact_paths() {
    let svg = r#"<svg><rect x="0" y="0" width="10" height="10"/><line x1="0" y1="0" x2="5" y2="5" stroke="red"/></svg>"#;
    let options = OptimizeOptions {
        convert_shape_to_path: true,
        ..OptimizeOptions::none()
    };
    let out = optimize(svg, &options);
    assert!(out.contains(r#"<path d="M0,0h10v10h-10z"/>"#), "{out}");
    assert!(!out.contains("<rect"), "{out}");
    assert!(!out.contains("<line"), "{out}");
    assert!(out.contains(r#"stroke="red""#), "{out}");
}

/// Test that ids and their references get the same prefix.
#[test]
fn test_prefix_ids_through_options() {
    let svg = r##"<svg><defs><linearGradient id="g"/></defs><rect class="a b" fill="url(#g)"/></svg>"##;
    let options = OptimizeOptions {
        prefix_ids: PrefixIds::Prefix("star_".into()),
        ..OptimizeOptions::none()
    };
    assert_eq!(
        optimize(svg, &options),
        r##"<svg><defs><linearGradient id="star_g"/></defs><rect class="star_a star_b" fill="url(#star_g)"/></svg>"##
    );
}

/// Test that groups emptied by earlier rules are removed afterwards.
#[test]
fn test_groups_emptied_by_hidden_removal() {
    let svg = r#"<svg><g fill="red"><g><rect style="display:none"/></g></g><circle r="1"/></svg>"#;
    let out = optimize(svg, &OptimizeOptions::default());
    assert_eq!(out, r#"<svg><circle r="1"/></svg>"#);
}
