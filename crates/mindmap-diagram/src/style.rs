//! Branch palette and the stylesheet inlined into exported drawings.

/// d3 `schemeCategory10`.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub const FONT_FAMILY: &str =
    "-apple-system, 'Segoe UI', 'PingFang SC', 'Noto Sans CJK SC', 'Microsoft YaHei', sans-serif";

pub fn branch_color(branch: usize) -> &'static str {
    CATEGORY10[branch % CATEGORY10.len()]
}

/// Stylesheet shared by every element class the renderer emits.
pub fn stylesheet(font_size: f64) -> String {
    format!(
        ".markmap {{ background: #ffffff; }}\n\
         .markmap-link {{ fill: none; stroke-width: 1.5; }}\n\
         .markmap-line {{ stroke-width: 1.5; }}\n\
         .markmap-dot {{ fill: #ffffff; stroke-width: 1.5; }}\n\
         .markmap-label {{ font-family: {FONT_FAMILY}; font-size: {font_size}px; fill: #333333; }}\n\
         .markmap-root > .markmap-label {{ font-weight: 600; }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_color_wraps() {
        assert_eq!(branch_color(0), "#1f77b4");
        assert_eq!(branch_color(10), branch_color(0));
    }

    #[test]
    fn test_stylesheet_uses_font_size() {
        let css = stylesheet(18.0);
        assert!(css.contains("font-size: 18px"));
        assert!(css.contains(".markmap-link"));
    }
}
