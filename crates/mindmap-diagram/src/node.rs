//! Outline markdown to a typed node tree.

use mindmap_core::error::{MindmapError, Result};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Serialize;

/// List items rank below every heading level.
const ITEM_RANK_BASE: usize = 10;

/// Deepest nesting accepted below the root. Tree building, layout and
/// drawing all recurse once per level.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "level")]
pub enum NodeKind {
    /// Synthesized when the outline has several top-level nodes.
    Root,
    Heading(u8),
    ListItem,
    Paragraph,
}

/// A node of the mind-map tree. Children keep document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramNode {
    pub label: String,
    pub depth: usize,
    pub kind: NodeKind,
    pub children: Vec<DiagramNode>,
}

impl DiagramNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            label: String::new(),
            depth: 0,
            kind,
            children: Vec::new(),
        }
    }

    /// Parses an outline into a tree.
    ///
    /// Headings nest by level, list items nest under the nearest heading or
    /// enclosing item, and stray paragraphs become leaves of whatever is
    /// open. A single top-level node becomes the root; several are adopted
    /// by a synthesized `Root` with an empty label. Outlines nesting deeper
    /// than [`MAX_NESTING`] are rejected as a render failure.
    pub fn parse(markdown: &str) -> Result<Self> {
        let mut builder = TreeBuilder::new();
        for event in Parser::new(markdown) {
            builder.handle(event)?;
        }
        builder.finish()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(DiagramNode::count).sum::<usize>()
    }

    /// Deepest `depth` in this subtree.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(DiagramNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    fn assign_depth(&mut self, depth: usize) {
        self.depth = depth;
        for child in &mut self.children {
            child.assign_depth(depth + 1);
        }
    }
}

struct Frame {
    rank: usize,
    node: DiagramNode,
}

enum Capture {
    Idle,
    /// Inline text goes to the label of the top frame.
    Label,
    Paragraph(String),
}

struct TreeBuilder {
    stack: Vec<Frame>,
    list_depth: usize,
    capture: Capture,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                rank: 0,
                node: DiagramNode::new(NodeKind::Root),
            }],
            list_depth: 0,
            capture: Capture::Idle,
        }
    }

    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let level = level as usize;
                self.open(level, NodeKind::Heading(level as u8))?;
            }
            Event::End(TagEnd::Heading(_)) => self.capture = Capture::Idle,
            Event::Start(Tag::List(_)) => {
                self.list_depth += 1;
                self.capture = Capture::Idle;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                self.open(ITEM_RANK_BASE + self.list_depth, NodeKind::ListItem)?;
            }
            Event::End(TagEnd::Item) => {
                self.close_to(ITEM_RANK_BASE + self.list_depth);
                self.capture = Capture::Idle;
            }
            Event::Start(Tag::Paragraph) => {
                // Loose list items wrap their text in a paragraph.
                let item_label_pending = matches!(self.capture, Capture::Label)
                    && self.top().kind == NodeKind::ListItem
                    && self.top().label.is_empty();
                if !item_label_pending {
                    self.capture = Capture::Paragraph(String::new());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if let Capture::Paragraph(text) = std::mem::replace(&mut self.capture, Capture::Idle) {
                    let label = normalize(&text);
                    if !label.is_empty() {
                        let mut leaf = DiagramNode::new(NodeKind::Paragraph);
                        leaf.label = label;
                        self.top_mut().children.push(leaf);
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text(" "),
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, rank: usize, kind: NodeKind) -> Result<()> {
        self.close_to(rank);
        // The virtual root frame does not count as a level.
        if self.stack.len() > MAX_NESTING {
            return Err(MindmapError::render(format!(
                "Outline nests too deeply (more than {MAX_NESTING} levels)"
            )));
        }
        self.stack.push(Frame {
            rank,
            node: DiagramNode::new(kind),
        });
        self.capture = Capture::Label;
        Ok(())
    }

    /// Pops every frame ranked at or below `rank` into its parent.
    fn close_to(&mut self, rank: usize) {
        while self.stack.len() > 1 && self.stack.last().is_some_and(|f| f.rank >= rank) {
            if let Some(mut frame) = self.stack.pop() {
                frame.node.label = normalize(&frame.node.label);
                self.top_mut().children.push(frame.node);
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        match &mut self.capture {
            Capture::Idle => {}
            Capture::Label => self.top_mut().label.push_str(text),
            Capture::Paragraph(buffer) => buffer.push_str(text),
        }
    }

    fn top(&self) -> &DiagramNode {
        // The virtual root frame is never popped.
        &self.stack[self.stack.len() - 1].node
    }

    fn top_mut(&mut self) -> &mut DiagramNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last].node
    }

    fn finish(mut self) -> Result<DiagramNode> {
        self.close_to(1);
        let mut forest = match self.stack.pop() {
            Some(frame) => frame.node,
            None => return Err(MindmapError::render("Outline produced no nodes")),
        };

        let mut root = match forest.children.len() {
            0 => return Err(MindmapError::render("Outline produced no nodes")),
            1 => forest.children.remove(0),
            _ => forest,
        };
        root.assign_depth(0);
        Ok(root)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(node: &DiagramNode) -> Vec<&str> {
        node.children.iter().map(|c| c.label.as_str()).collect()
    }

    fn assert_depth_increases(node: &DiagramNode) {
        for child in &node.children {
            assert_eq!(child.depth, node.depth + 1);
            assert_depth_increases(child);
        }
    }

    #[test]
    fn test_single_top_heading_is_root() {
        let root = DiagramNode::parse(
            "# 对话分析\n## 背景\n### 起因\n#### 细节\n## 结论\n### 建议",
        )
        .unwrap();

        assert_eq!(root.label, "对话分析");
        assert_eq!(root.kind, NodeKind::Heading(1));
        assert_eq!(root.depth, 0);
        assert_eq!(labels(&root), vec!["背景", "结论"]);
        assert_eq!(labels(&root.children[0]), vec!["起因"]);
        assert_eq!(labels(&root.children[0].children[0]), vec!["细节"]);
        assert_eq!(root.count(), 6);
        assert_eq!(root.max_depth(), 3);
        assert_depth_increases(&root);
    }

    #[test]
    fn test_multiple_top_nodes_get_synthesized_root() {
        let root = DiagramNode::parse("## A\n## B\n### B1").unwrap();

        assert_eq!(root.kind, NodeKind::Root);
        assert_eq!(root.label, "");
        assert_eq!(labels(&root), vec!["A", "B"]);
        assert_eq!(root.children[1].children[0].depth, 2);
    }

    #[test]
    fn test_list_items_nest_under_heading() {
        let root = DiagramNode::parse(
            "# Rust\n## Traits\n- Send\n- Sync\n  - auto trait\n- Copy\n## Ownership",
        )
        .unwrap();

        let traits = &root.children[0];
        assert_eq!(labels(traits), vec!["Send", "Sync", "Copy"]);
        assert_eq!(traits.children[1].kind, NodeKind::ListItem);
        assert_eq!(labels(&traits.children[1]), vec!["auto trait"]);
        assert_eq!(labels(&root), vec!["Traits", "Ownership"]);
        assert_depth_increases(&root);
    }

    #[test]
    fn test_skipped_level_attaches_to_nearest_heading() {
        let root = DiagramNode::parse("# A\n### C\n## B").unwrap();

        assert_eq!(labels(&root), vec!["C", "B"]);
        assert_eq!(root.children[0].kind, NodeKind::Heading(3));
        assert_eq!(root.children[0].depth, 1);
    }

    #[test]
    fn test_paragraph_becomes_leaf() {
        let root = DiagramNode::parse("# 主题\n\n一段说明\n跨两行\n\n## 子主题").unwrap();

        assert_eq!(root.children[0].kind, NodeKind::Paragraph);
        assert_eq!(root.children[0].label, "一段说明 跨两行");
        assert_eq!(root.children[1].label, "子主题");
    }

    #[test]
    fn test_inline_markup_is_flattened() {
        let root = DiagramNode::parse("# Use `tokio` with **care**\n- a *b* c").unwrap();

        assert_eq!(root.label, "Use tokio with care");
        assert_eq!(root.children[0].label, "a b c");
    }

    #[test]
    fn test_loose_list_item_takes_paragraph_text() {
        let root = DiagramNode::parse("# T\n\n- one\n\n- two\n").unwrap();

        assert_eq!(labels(&root), vec!["one", "two"]);
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("# R\n{}x", "- ".repeat(MAX_NESTING - 1));
        let root = DiagramNode::parse(&at_limit).unwrap();
        assert_eq!(root.max_depth(), MAX_NESTING - 1);

        let too_deep = format!("# R\n{}x", "- ".repeat(MAX_NESTING));
        assert!(matches!(
            DiagramNode::parse(&too_deep),
            Err(MindmapError::RenderFailure(_))
        ));
    }

    #[test]
    fn test_runaway_nesting_is_render_failure() {
        let markdown = format!("# R\n{}x", "- ".repeat(5000));

        let err = DiagramNode::parse(&markdown).unwrap_err();

        assert!(matches!(err, MindmapError::RenderFailure(_)));
    }

    #[test]
    fn test_empty_outline_is_render_failure() {
        assert!(matches!(
            DiagramNode::parse(""),
            Err(MindmapError::RenderFailure(_))
        ));
        assert!(DiagramNode::parse("   \n\n").is_err());
    }
}
