use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::{Html, Selector};

/// Where an injected snippet lands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Head,
    BodyStart,
    BodyEnd,
}

/// Inject a raw HTML snippet into `html` at the requested placement and
/// return the serialized document.
///
/// The HTML5 parser synthesizes any missing html/head/body wrappers while
/// parsing, so fragment-only input gains the full scaffold before insertion.
pub fn inject_html(html: &str, snippet: &str, placement: Placement) -> String {
    let mut doc = Html::parse_document(html);
    let fragment = Html::parse_fragment(snippet);

    let target = match placement {
        Placement::Head => element_id(&doc, "head"),
        Placement::BodyStart | Placement::BodyEnd => element_id(&doc, "body"),
    };
    let Some(target) = target else {
        return doc.root_element().html();
    };

    match placement {
        Placement::Head | Placement::BodyEnd => {
            for child in fragment.root_element().children() {
                graft_last(&mut doc.tree, target, child);
            }
        }
        Placement::BodyStart => {
            let anchor = doc
                .tree
                .get(target)
                .and_then(|node| node.first_child())
                .map(|first| first.id());
            for child in fragment.root_element().children() {
                match anchor {
                    Some(anchor) => graft_before(&mut doc.tree, anchor, child),
                    None => graft_last(&mut doc.tree, target, child),
                }
            }
        }
    }

    doc.root_element().html()
}

/// Wrap raw CSS in a style element and inject it into the document head.
pub fn inject_css(html: &str, css: &str) -> String {
    let snippet = format!("<style>{css}</style>");
    inject_html(html, &snippet, Placement::Head)
}

fn element_id(doc: &Html, name: &str) -> Option<NodeId> {
    let selector = Selector::parse(name).ok()?;
    doc.select(&selector).next().map(|el| el.id())
}

// Grafting clones node values across trees; ego_tree offers no direct splice
// between two trees.
fn graft_last(tree: &mut Tree<Node>, parent_id: NodeId, source: NodeRef<'_, Node>) {
    let appended = match tree.get_mut(parent_id) {
        Some(mut parent) => parent.append(source.value().clone()).id(),
        None => return,
    };
    for child in source.children() {
        graft_last(tree, appended, child);
    }
}

fn graft_before(tree: &mut Tree<Node>, anchor_id: NodeId, source: NodeRef<'_, Node>) {
    let inserted = match tree.get_mut(anchor_id) {
        Some(mut anchor) => anchor.insert_before(source.value().clone()).id(),
        None => return,
    };
    for child in source.children() {
        graft_last(tree, inserted, child);
    }
}
