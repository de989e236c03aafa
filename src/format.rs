//! Line-based re-indentation of generated code.
//!
//! This is not a JavaScript parser. It tracks one indent level and adjusts it
//! from how each line starts and ends, which is enough for the shapes
//! [`generate`](crate::generate) produces and for hand-written SVG markup.

const INDENT: &str = "  ";

/// Re-indent `code`, dropping blank lines. Returns it unchanged when disabled.
pub fn format_code(code: &str, enabled: bool) -> String {
    if !enabled {
        return code.to_string();
    }

    let mut out = Vec::new();
    let mut level = 0usize;
    let mut in_open_tag = false;
    for line in code.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if closes_block(line) {
            level = level.saturating_sub(1);
        }
        out.push(format!("{}{line}", INDENT.repeat(level)));

        if in_open_tag {
            // Attribute lines of a tag spread over several lines.
            if line.ends_with("/>") {
                level = level.saturating_sub(1);
                in_open_tag = false;
            } else if line.ends_with('>') {
                in_open_tag = false;
            }
        } else if opens_block(line) {
            level += 1;
        } else if starts_open_tag(line) {
            level += 1;
            in_open_tag = !line.contains('>');
        } else if ends_with_close_tag(line) {
            level = level.saturating_sub(1);
        }
    }
    out.join("\n")
}

fn closes_block(line: &str) -> bool {
    line.starts_with('}') || line.starts_with(')') || line.starts_with("</")
}

fn opens_block(line: &str) -> bool {
    line.ends_with('{') || line.ends_with('(') || line.contains("=> {")
}

/// `<g ...>` or the first line of a multi-line opening tag. A line that also
/// closes the element it opens leaves the level alone.
fn starts_open_tag(line: &str) -> bool {
    line.starts_with('<')
        && !line.starts_with("</")
        && !line.ends_with("/>")
        && !line.contains("</")
}

/// Text followed by the closing tag of an element opened on an earlier line.
fn ends_with_close_tag(line: &str) -> bool {
    !line.starts_with('<') && line.contains("</") && line.ends_with('>') && !line.ends_with("/>")
}
