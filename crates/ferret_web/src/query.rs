use std::collections::BTreeMap;
use std::fmt;

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::types::ScrapeError;

/// Parsed HTML document exposing the toolkit's query surface.
#[derive(Debug)]
pub struct PageDocument {
    doc: Html,
}

/// One interactive element found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub text: String,
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    Button,
    Input { input_type: String },
    Select,
    TextArea,
    Link,
    Form,
    ClickHandler,
    ButtonRole,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::Button => write!(f, "button"),
            InteractionKind::Input { input_type } => write!(f, "input[{input_type}]"),
            InteractionKind::Select => write!(f, "select"),
            InteractionKind::TextArea => write!(f, "textarea"),
            InteractionKind::Link => write!(f, "link"),
            InteractionKind::Form => write!(f, "form"),
            InteractionKind::ClickHandler => write!(f, "onclick"),
            InteractionKind::ButtonRole => write!(f, "role=button"),
        }
    }
}

impl Serialize for InteractionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// Outer HTML of every element matching the CSS selector.
    pub fn select(&self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        let parsed = Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector {
            selector: selector.to_string(),
        })?;
        Ok(self.doc.select(&parsed).map(|el| el.html()).collect())
    }

    /// Outer HTML of every element carrying the class `class`.
    pub fn by_class(&self, class: &str) -> Vec<String> {
        self.elements()
            .filter(|el| el.value().classes().any(|c| c == class))
            .map(|el| el.html())
            .collect()
    }

    /// Outer HTML of the first element with the given id, if any.
    pub fn by_id(&self, id: &str) -> Option<String> {
        self.elements()
            .find(|el| el.value().id() == Some(id))
            .map(|el| el.html())
    }

    /// Visible page text; script/style/noscript subtrees are skipped.
    ///
    /// With `collapse_whitespace` the result is a single line with runs of
    /// whitespace squeezed to one space; otherwise text nodes are joined
    /// with newlines.
    pub fn visible_text(&self, collapse_whitespace: bool) -> String {
        let mut chunks: Vec<String> = Vec::new();
        collect_visible_text(*self.doc.root_element(), &mut chunks);
        if collapse_whitespace {
            chunks
                .iter()
                .flat_map(|chunk| chunk.split_whitespace())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            chunks.join("\n")
        }
    }

    /// Interactive elements, category-major: buttons, inputs, selects,
    /// textareas, links, forms, onclick carriers, explicit button roles.
    /// An element matching several categories is reported once per category.
    pub fn interactions(&self) -> Vec<Interaction> {
        let mut out = Vec::new();
        self.collect_matching("button", &mut out, |_| InteractionKind::Button);
        self.collect_matching("input", &mut out, |el| InteractionKind::Input {
            input_type: el.value().attr("type").unwrap_or("text").to_string(),
        });
        self.collect_matching("select", &mut out, |_| InteractionKind::Select);
        self.collect_matching("textarea", &mut out, |_| InteractionKind::TextArea);
        self.collect_matching("a[href]", &mut out, |_| InteractionKind::Link);
        self.collect_matching("form", &mut out, |_| InteractionKind::Form);
        self.collect_matching("[onclick]", &mut out, |_| InteractionKind::ClickHandler);
        self.collect_matching(r#"[role="button"]"#, &mut out, |_| InteractionKind::ButtonRole);
        out
    }

    fn collect_matching<K>(&self, selector: &str, out: &mut Vec<Interaction>, kind: K)
    where
        K: Fn(&ElementRef<'_>) -> InteractionKind,
    {
        // Fixed selector strings; a failed parse yields an empty category.
        let Ok(parsed) = Selector::parse(selector) else {
            return;
        };
        for el in self.doc.select(&parsed) {
            out.push(Interaction {
                kind: kind(&el),
                text: element_text(&el),
                attrs: el
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            });
        }
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_visible_text(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        }
        Node::Element(element) => {
            if matches!(element.name(), "script" | "style" | "noscript") {
                return;
            }
        }
        _ => {}
    }
    for child in node.children() {
        collect_visible_text(child, out);
    }
}
