//! Horizontal tidy-tree layout.
//!
//! The root sits at the left edge; every level is placed one column to the
//! right of its parent's label, and each parent is centred vertically on the
//! block of its children.

use crate::node::DiagramNode;
use crate::svg::ViewBox;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub font_size: f64,
    /// Label box height as a multiple of the font size.
    pub line_height: f64,
    /// Width of one terminal column as a multiple of the font size.
    pub column_width: f64,
    pub padding_x: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::with_font_size(16.0)
    }
}

impl LayoutOptions {
    pub fn with_font_size(font_size: f64) -> Self {
        Self {
            font_size,
            line_height: 1.5,
            column_width: 0.55,
            padding_x: 8.0,
            horizontal_spacing: 80.0,
            vertical_spacing: 8.0,
            margin: 20.0,
        }
    }

    pub fn node_height(&self) -> f64 {
        self.font_size * self.line_height
    }

    pub fn label_width(&self, label: &str) -> f64 {
        UnicodeWidthStr::width(label) as f64 * self.font_size * self.column_width
            + self.padding_x * 2.0
    }
}

/// A node with its label box in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: usize,
    pub parent: Option<usize>,
    pub label: String,
    pub depth: usize,
    /// Index of the first-level subtree this node belongs to (0 for the root).
    pub branch: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub has_children: bool,
}

impl PositionedNode {
    /// Left end of the underline.
    pub fn anchor_in(&self) -> (f64, f64) {
        (self.x, self.y + self.height)
    }

    /// Right end of the underline, where links to children start.
    pub fn anchor_out(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    /// Pre-order; `nodes[0]` is the root.
    pub nodes: Vec<PositionedNode>,
    pub view_box: ViewBox,
}

impl DiagramLayout {
    pub fn compute(root: &DiagramNode, options: &LayoutOptions) -> Self {
        let measured = Measured::build(root, options);
        let mut nodes = Vec::with_capacity(root.count());
        place(&measured, options, 0.0, 0.0, None, 0, &mut nodes);

        let view_box = bounds(&nodes, options.margin);
        Self { nodes, view_box }
    }

    pub fn get(&self, id: usize) -> Option<&PositionedNode> {
        self.nodes.get(id)
    }
}

struct Measured<'a> {
    node: &'a DiagramNode,
    width: f64,
    subtree_height: f64,
    children: Vec<Measured<'a>>,
}

impl<'a> Measured<'a> {
    fn build(node: &'a DiagramNode, options: &LayoutOptions) -> Self {
        let children: Vec<_> = node
            .children
            .iter()
            .map(|child| Measured::build(child, options))
            .collect();
        let block = children_block_height(&children, options);

        Self {
            node,
            width: options.label_width(&node.label),
            subtree_height: options.node_height().max(block),
            children,
        }
    }
}

fn children_block_height(children: &[Measured<'_>], options: &LayoutOptions) -> f64 {
    if children.is_empty() {
        return 0.0;
    }
    children.iter().map(|c| c.subtree_height).sum::<f64>()
        + options.vertical_spacing * (children.len() - 1) as f64
}

fn place(
    measured: &Measured<'_>,
    options: &LayoutOptions,
    x: f64,
    top: f64,
    parent: Option<usize>,
    branch: usize,
    out: &mut Vec<PositionedNode>,
) {
    let id = out.len();
    let height = options.node_height();
    let center = top + measured.subtree_height / 2.0;

    out.push(PositionedNode {
        id,
        parent,
        label: measured.node.label.clone(),
        depth: measured.node.depth,
        branch,
        x,
        y: center - height / 2.0,
        width: measured.width,
        height,
        has_children: !measured.children.is_empty(),
    });

    let child_x = x + measured.width + options.horizontal_spacing;
    let mut child_top = center - children_block_height(&measured.children, options) / 2.0;
    for (index, child) in measured.children.iter().enumerate() {
        let child_branch = if parent.is_none() { index } else { branch };
        place(child, options, child_x, child_top, Some(id), child_branch, out);
        child_top += child.subtree_height + options.vertical_spacing;
    }
}

fn bounds(nodes: &[PositionedNode], margin: f64) -> ViewBox {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for node in nodes {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    if nodes.is_empty() {
        (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
    }

    ViewBox {
        min_x: min_x - margin,
        min_y: min_y - margin,
        width: max_x - min_x + margin * 2.0,
        height: max_y - min_y + margin * 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(markdown: &str) -> DiagramLayout {
        DiagramLayout::compute(
            &DiagramNode::parse(markdown).unwrap(),
            &LayoutOptions::default(),
        )
    }

    #[test]
    fn test_label_width_counts_wide_characters() {
        let options = LayoutOptions::default();
        let ascii = options.label_width("ab");
        let cjk = options.label_width("思维");
        assert!(cjk > ascii);
        assert_eq!(options.label_width(""), options.padding_x * 2.0);
    }

    #[test]
    fn test_children_are_right_of_parent() {
        let layout = layout("# Root\n## A\n### A1\n## B");
        let options = LayoutOptions::default();

        for node in &layout.nodes[1..] {
            let parent = layout.get(node.parent.unwrap()).unwrap();
            assert!(
                (node.x - (parent.x + parent.width + options.horizontal_spacing)).abs() < 1e-9
            );
            assert_eq!(node.depth, parent.depth + 1);
        }
    }

    #[test]
    fn test_parent_centred_on_children() {
        let layout = layout("# Root\n## A\n## B\n## C");
        let root = &layout.nodes[0];
        let first = &layout.nodes[1];
        let last = &layout.nodes[3];

        let root_center = root.y + root.height / 2.0;
        let children_center = (first.y + last.y + last.height) / 2.0;
        assert!((root_center - children_center).abs() < 1e-9);
    }

    #[test]
    fn test_siblings_do_not_overlap() {
        let layout = layout("# R\n## A\n- a1\n- a2\n- a3\n## B\n- b1\n- b2");
        let mut same_column: Vec<_> = layout.nodes.iter().filter(|n| n.depth == 2).collect();
        same_column.sort_by(|a, b| a.y.total_cmp(&b.y));
        for pair in same_column.windows(2) {
            assert!(pair[0].y + pair[0].height <= pair[1].y);
        }
    }

    #[test]
    fn test_branch_follows_first_level_ancestor() {
        let layout = layout("# R\n## A\n### A1\n## B\n### B1");
        let branches: Vec<_> = layout.nodes.iter().map(|n| (n.label.as_str(), n.branch)).collect();
        assert_eq!(
            branches,
            vec![("R", 0), ("A", 0), ("A1", 0), ("B", 1), ("B1", 1)]
        );
    }

    #[test]
    fn test_view_box_contains_all_nodes_with_margin() {
        let layout = layout("# R\n## A\n## B");
        let vb = layout.view_box;
        for node in &layout.nodes {
            assert!(node.x >= vb.min_x + 20.0 - 1e-9);
            assert!(node.y >= vb.min_y + 20.0 - 1e-9);
            assert!(node.x + node.width <= vb.min_x + vb.width - 20.0 + 1e-9);
            assert!(node.y + node.height <= vb.min_y + vb.height - 20.0 + 1e-9);
        }
    }
}
