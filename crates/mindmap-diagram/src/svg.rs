//! Minimal SVG document model and serializer.

use quick_xml::escape::escape;
use std::fmt::{self, Write};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The user-space rectangle a drawing occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            num(self.min_x),
            num(self.min_y),
            num(self.width),
            num(self.height)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn child(mut self, child: SvgElement) -> Self {
        self.children.push(SvgNode::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(SvgNode::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn write_to(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape(value.as_str()));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(element) => element.write_to(out),
                SvgNode::Text(text) => out.push_str(&escape(text.as_str())),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// A standalone SVG drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    view_box: ViewBox,
    width: Option<f64>,
    height: Option<f64>,
    class: Option<String>,
    children: Vec<SvgNode>,
}

impl SvgDocument {
    pub fn new(view_box: ViewBox) -> Self {
        Self {
            view_box,
            width: None,
            height: None,
            class: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    pub fn size(&self) -> Option<(f64, f64)> {
        self.width.zip(self.height)
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = Some(width);
        self.height = Some(height);
    }

    pub fn push(&mut self, element: SvgElement) {
        self.children.push(SvgNode::Element(element));
    }

    /// Inserts a `<style>` element as the first child.
    pub fn prepend_style(&mut self, css: &str) {
        let style = SvgElement::new("style").text(css);
        self.children.insert(0, SvgNode::Element(style));
    }

    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        let _ = write!(
            out,
            "<svg xmlns=\"{SVG_NS}\" viewBox=\"{}\"",
            self.view_box
        );
        if let Some((width, height)) = self.size() {
            let _ = write!(out, " width=\"{}\" height=\"{}\"", num(width), num(height));
        }
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{}\"", escape(class.as_str()));
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(element) => element.write_to(&mut out),
                SvgNode::Text(text) => out.push_str(&escape(text.as_str())),
            }
        }
        out.push_str("</svg>");
        out
    }
}

/// Formats a coordinate with at most two decimals.
pub fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_box() -> ViewBox {
        ViewBox {
            min_x: -20.0,
            min_y: -10.5,
            width: 300.0,
            height: 120.25,
        }
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(-10.5), "-10.5");
        assert_eq!(num(1.23456), "1.23");
        assert_eq!(num(0.001), "0");
    }

    #[test]
    fn test_document_serialization() {
        let mut doc = SvgDocument::new(view_box()).with_class("markmap");
        doc.push(
            SvgElement::new("g")
                .attr("class", "markmap-node")
                .child(SvgElement::new("text").text("A & <B>"))
                .child(SvgElement::new("circle").attr("r", 4)),
        );

        assert_eq!(
            doc.to_xml(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"-20 -10.5 300 120.25\" \
             class=\"markmap\"><g class=\"markmap-node\"><text>A &amp; &lt;B&gt;</text>\
             <circle r=\"4\"/></g></svg>"
        );
    }

    #[test]
    fn test_prepend_style_and_size() {
        let mut doc = SvgDocument::new(view_box());
        doc.push(SvgElement::new("g"));
        doc.prepend_style(".a { fill: none; }");
        doc.set_size(640.0, 256.5);

        let xml = doc.to_xml();
        assert!(xml.contains("width=\"640\" height=\"256.5\""));
        match &doc.children()[0] {
            SvgNode::Element(element) => assert_eq!(element.name(), "style"),
            other => panic!("Expected style element, got {other:?}"),
        }
        assert!(xml.contains("<style>.a { fill: none; }</style><g/>"));
    }

    #[test]
    fn test_attribute_values_escaped() {
        let element = SvgElement::new("text").attr("data-label", "\"quoted\"");
        assert_eq!(element.get_attr("data-label"), Some("\"quoted\""));

        let mut out = String::new();
        element.write_to(&mut out);
        assert_eq!(out, "<text data-label=\"&quot;quoted&quot;\"/>");
    }
}
