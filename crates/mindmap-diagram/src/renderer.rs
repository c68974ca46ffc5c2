//! Outline to SVG drawing.

use crate::layout::{DiagramLayout, LayoutOptions, PositionedNode};
use crate::node::DiagramNode;
use crate::style::{branch_color, stylesheet};
use crate::surface::DiagramSurface;
use crate::svg::{SvgDocument, SvgElement, ViewBox, num};
use mindmap_core::config::RenderConfig;
use mindmap_core::error::{MindmapError, Result};
use mindmap_core::outline::Outline;

const DOT_RADIUS: f64 = 4.0;

/// Summary of what the last render drew.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramHandle {
    pub root_label: String,
    pub node_count: usize,
    pub max_depth: usize,
    pub view_box: ViewBox,
}

/// Renders outlines onto a [`DiagramSurface`].
///
/// One renderer is created per session and passed to whoever draws.
#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    options: LayoutOptions,
}

impl DiagramRenderer {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(LayoutOptions::with_font_size(config.font_size))
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Draws `outline` onto `surface`, replacing whatever was there.
    pub fn render(&self, surface: &mut DiagramSurface, outline: &Outline) -> Result<DiagramHandle> {
        if outline.as_str().trim().is_empty() {
            return Err(MindmapError::render("Outline is empty"));
        }

        let tree = DiagramNode::parse(outline.as_str())?;
        let layout = DiagramLayout::compute(&tree, &self.options);
        let document = self.draw(&layout);

        let handle = DiagramHandle {
            root_label: tree.label.clone(),
            node_count: layout.nodes.len(),
            max_depth: tree.max_depth(),
            view_box: layout.view_box,
        };
        tracing::debug!(
            "[Renderer] Drew {} nodes (depth {}) into {}",
            handle.node_count,
            handle.max_depth,
            handle.view_box
        );

        surface.replace(document, stylesheet(self.options.font_size), handle.clone());
        Ok(handle)
    }

    fn draw(&self, layout: &DiagramLayout) -> SvgDocument {
        let mut document = SvgDocument::new(layout.view_box).with_class("markmap");

        // Links first so node labels paint over them.
        let mut links = SvgElement::new("g").attr("class", "markmap-links");
        for node in &layout.nodes {
            if let Some(parent) = node.parent.and_then(|id| layout.get(id)) {
                links = links.child(link(parent, node));
            }
        }
        document.push(links);

        let mut nodes = SvgElement::new("g").attr("class", "markmap-nodes");
        for node in &layout.nodes {
            nodes = nodes.child(self.node_group(node));
        }
        document.push(nodes);
        document
    }

    fn node_group(&self, node: &PositionedNode) -> SvgElement {
        let color = branch_color(node.branch);
        let class = if node.parent.is_none() {
            "markmap-node markmap-root"
        } else {
            "markmap-node"
        };
        let (x1, y) = node.anchor_in();
        let (x2, _) = node.anchor_out();
        // Baseline sits a quarter line above the underline.
        let baseline = y - self.options.font_size * 0.25 - 2.0;

        let mut group = SvgElement::new("g")
            .attr("class", class)
            .attr("data-depth", node.depth)
            .child(
                SvgElement::new("line")
                    .attr("class", "markmap-line")
                    .attr("x1", num(x1))
                    .attr("y1", num(y))
                    .attr("x2", num(x2))
                    .attr("y2", num(y))
                    .attr("stroke", color),
            )
            .child(
                SvgElement::new("text")
                    .attr("class", "markmap-label")
                    .attr("x", num(x1 + self.options.padding_x))
                    .attr("y", num(baseline))
                    .text(node.label.as_str()),
            );

        if node.has_children {
            group = group.child(
                SvgElement::new("circle")
                    .attr("class", "markmap-dot")
                    .attr("cx", num(x2))
                    .attr("cy", num(y))
                    .attr("r", num(DOT_RADIUS))
                    .attr("stroke", color),
            );
        }
        group
    }
}

fn link(parent: &PositionedNode, child: &PositionedNode) -> SvgElement {
    let (sx, sy) = parent.anchor_out();
    let (tx, ty) = child.anchor_in();
    let mx = (sx + tx) / 2.0;
    let d = format!(
        "M{},{} C{},{} {},{} {},{}",
        num(sx),
        num(sy),
        num(mx),
        num(sy),
        num(mx),
        num(ty),
        num(tx),
        num(ty)
    );
    SvgElement::new("path")
        .attr("class", "markmap-link")
        .attr("d", d)
        .attr("stroke", branch_color(child.branch))
}
