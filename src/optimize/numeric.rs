use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Shorten numbers in attribute values: `1.0` to `1`, `0.5` to `.5`, and
/// `0px`/`0%`/... to `0`.
pub fn cleanup_numeric_values(svg: &str) -> String {
    static VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"="([^"]*)""#).unwrap());
    static TRAILING_ZERO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)\.0+\b").unwrap());
    static LEADING_ZERO: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(^|[^\d._])0+\.(\d)").unwrap());
    static ZERO_UNIT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\b0(?:px|em|ex|pt|pc|cm|mm|in|%)([^\w%]|$)").unwrap()
    });
    static WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

    VALUE
        .replace_all(svg, |caps: &Captures| {
            let value = TRAILING_ZERO.replace_all(&caps[1], "$1");
            let value = LEADING_ZERO.replace_all(&value, "${1}.${2}");
            let value = ZERO_UNIT.replace_all(&value, "0$1");
            let value = WS.replace_all(&value, " ");
            format!("=\"{value}\"")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_and_trailing_zeros() {
        let svg = r#"<svg opacity="0.5" stroke-width="1.0"><rect x="-0.25" y="10.5" width="0.0" /></svg>"#;
        assert_eq!(
            cleanup_numeric_values(svg),
            r#"<svg opacity=".5" stroke-width="1"><rect x="-.25" y="10.5" width="0" /></svg>"#
        );
    }

    #[test]
    fn test_leading_zero_after_command_letter() {
        assert_eq!(
            cleanup_numeric_values(r#"<path d="M0.5 0.5L1.0 2" />"#),
            r#"<path d="M.5 .5L1 2" />"#
        );
    }

    #[test]
    fn test_zero_units() {
        let svg = r#"<rect x="0px" y="0em" offset="0%" width="10px" height="0.5in" />"#;
        assert_eq!(
            cleanup_numeric_values(svg),
            r#"<rect x="0" y="0" offset="0" width="10px" height=".5in" />"#
        );
    }

    #[test]
    fn test_is_idempotent() {
        let svg = r#"<svg viewBox="0.0 0.50 24.000 24"><path d="M0.5 1.0L2 0.0" /></svg>"#;
        let once = cleanup_numeric_values(svg);
        assert_eq!(cleanup_numeric_values(&once), once);
    }
}
