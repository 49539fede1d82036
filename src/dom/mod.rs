//! Mutable arena document tree.
//!
//! The engine does not run inside a browser, so this module supplies the
//! document substrate detectors operate on: an arena of element and text
//! nodes addressed by opaque [`NodeId`] handles. The host environment owns
//! mutation (appending parsed HTML fragments, removing subtrees) and the
//! engine observes structural changes through a registered channel, the way
//! a childList mutation observer would report them.
//!
//! Node ids are never reused. A removed node leaves an empty slot behind, so
//! a stale handle held by an old finding is detectably absent rather than
//! silently pointing at unrelated content.

pub mod style;

use anyhow::{bail, Result};
use scraper::Html;
use tokio::sync::mpsc::UnboundedSender;

/// Opaque handle to one node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Viewport dimensions in CSS pixels, used by geometry-sensitive detectors.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Page lifecycle state, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// One structural mutation report: how many nodes were added and removed.
#[derive(Debug, Clone, Copy)]
pub struct MutationRecord {
    pub added: usize,
    pub removed: usize,
}

/// Events delivered to the registered observer channel.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent {
    /// The page reached an interactive or complete lifecycle state.
    Ready,
    /// At least one node was added to or removed from the tree.
    Mutation(MutationRecord),
}

#[derive(Debug, Clone)]
enum NodeData {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A mutable document tree shared between the host environment and the engine.
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    location: String,
    viewport: Viewport,
    ready_state: ReadyState,
    observer: Option<UnboundedSender<PageEvent>>,
    scanner_installed: bool,
}

impl Document {
    /// Parse a full HTML document into a fresh arena.
    pub fn parse(html: &str, location: &str, viewport: Viewport) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            location: location.to_string(),
            viewport,
            ready_state: ReadyState::Loading,
            observer: None,
            scanner_installed: false,
        };

        let parsed = Html::parse_document(html);
        let scraper_root = parsed
            .tree
            .root()
            .children()
            .find(|c| matches!(c.value(), scraper::Node::Element(_)));

        match scraper_root {
            Some(html_el) => {
                let root = doc.copy_subtree(&html_el, None);
                doc.root = root.unwrap_or_else(|| doc.alloc_element("html", Vec::new(), None));
            }
            None => {
                doc.root = doc.alloc_element("html", Vec::new(), None);
            }
        }
        doc
    }

    fn copy_subtree(
        &mut self,
        node: &ego_tree::NodeRef<'_, scraper::Node>,
        parent: Option<NodeId>,
    ) -> Option<NodeId> {
        let id = match node.value() {
            scraper::Node::Element(el) => {
                let attrs = el
                    .attrs()
                    .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                    .collect();
                self.alloc_element(el.name(), attrs, parent)
            }
            scraper::Node::Text(t) => self.alloc_text(&t, parent),
            _ => return None,
        };
        for child in node.children() {
            if let Some(child_id) = self.copy_subtree(&child, Some(id)) {
                self.attach(id, child_id);
            }
        }
        Some(id)
    }

    fn alloc_element(&mut self, tag: &str, attrs: Vec<(String, String)>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            parent,
            children: Vec::new(),
            data: NodeData::Element {
                tag: tag.to_lowercase(),
                attrs,
            },
        }));
        id
    }

    fn alloc_text(&mut self, value: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            parent,
            children: Vec::new(),
            data: NodeData::Text(value.to_string()),
        }));
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(Some(node)) = self.nodes.get_mut(parent.0 as usize) {
            node.children.push(child);
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(|n| n.as_ref())
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Whether the node is still attached to the arena.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        const EMPTY: &[NodeId] = &[];
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(EMPTY)
    }

    /// Element tag name, or `None` for text nodes and stale handles.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id)?.data {
            NodeData::Element { ref tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some()
    }

    /// Text node content, or `None` for elements and stale handles.
    pub fn text_value(&self, id: NodeId) -> Option<&str> {
        match self.node(id)?.data {
            NodeData::Text(ref value) => Some(value),
            NodeData::Element { .. } => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.node(id)?.data {
            NodeData::Element { ref attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// All nodes of the subtree rooted at `id` in document (pre-order) order,
    /// excluding `id` itself. Stale handles yield an empty walk.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if self.node(next).is_none() {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// All live elements in document order, root included.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.is_element(self.root) {
            out.push(self.root);
        }
        out.extend(self.descendants(self.root).into_iter().filter(|&d| self.is_element(d)));
        out
    }

    /// First element whose `id` attribute equals `html_id`, in document order.
    pub fn element_by_id(&self, html_id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&el| self.attr(el, "id") == Some(html_id))
    }

    /// Concatenated text content of the subtree, unnormalized.
    pub fn raw_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        for d in self.descendants(id) {
            if let Some(value) = self.text_value(d) {
                parts.push(value);
            }
        }
        parts.join(" ")
    }

    // ── Host mutation API ────────────────────────────────────────────────────

    /// Set or replace an attribute. Attribute changes are presentation-level
    /// and do not produce mutation records.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(Some(node)) = self.nodes.get_mut(id.0 as usize) {
            if let NodeData::Element { ref mut attrs, .. } = node.data {
                let name = name.to_lowercase();
                match attrs.iter_mut().find(|(k, _)| *k == name) {
                    Some(entry) => entry.1 = value.to_string(),
                    None => attrs.push((name, value.to_string())),
                }
            }
        }
    }

    /// Drop an attribute if present. Like [`Self::set_attr`], attribute
    /// changes are not reported to the observer.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(Some(node)) = self.nodes.get_mut(id.0 as usize) {
            if let NodeData::Element { ref mut attrs, .. } = node.data {
                let name = name.to_lowercase();
                attrs.retain(|(k, _)| *k != name);
            }
        }
    }

    /// Parse an HTML fragment and graft its top-level nodes under `parent`.
    ///
    /// Returns the grafted top-level node ids, and reports the addition to
    /// the observer channel.
    pub fn append_html(&mut self, parent: NodeId, fragment: &str) -> Result<Vec<NodeId>> {
        if !self.contains(parent) {
            bail!("append target is no longer attached");
        }
        let parsed = Html::parse_fragment(fragment);
        let root = parsed.tree.root();
        // html5ever wraps fragment contents in a synthetic <html> element.
        let wrapper = root
            .children()
            .find(|c| matches!(c.value(), scraper::Node::Element(el) if el.name() == "html"));

        let mut added = Vec::new();
        match wrapper {
            Some(html_el) => {
                for child in html_el.children() {
                    if let Some(id) = self.copy_subtree(&child, Some(parent)) {
                        self.attach(parent, id);
                        added.push(id);
                    }
                }
            }
            None => {
                for child in root.children() {
                    if let Some(id) = self.copy_subtree(&child, Some(parent)) {
                        self.attach(parent, id);
                        added.push(id);
                    }
                }
            }
        }

        if !added.is_empty() {
            self.emit(PageEvent::Mutation(MutationRecord {
                added: added.len(),
                removed: 0,
            }));
        }
        Ok(added)
    }

    /// Detach a subtree. The slots are cleared so stale handles stay stale.
    /// Returns false for the root node and for handles already removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(Some(node)) = self.nodes.get_mut(parent.0 as usize) {
                node.children.retain(|&c| c != id);
            }
        }
        for d in self.descendants(id) {
            self.nodes[d.0 as usize] = None;
        }
        self.nodes[id.0 as usize] = None;
        self.emit(PageEvent::Mutation(MutationRecord { added: 0, removed: 1 }));
        true
    }

    /// Advance the lifecycle state. Reaching interactive or complete notifies
    /// the observer once per call, which is what schedules the initial scan.
    pub fn mark_ready(&mut self, state: ReadyState) {
        self.ready_state = state;
        if matches!(state, ReadyState::Interactive | ReadyState::Complete) {
            self.emit(PageEvent::Ready);
        }
    }

    // ── Observation ──────────────────────────────────────────────────────────

    /// Register the engine's observer channel. A single observer is supported.
    pub fn observe(&mut self, sender: UnboundedSender<PageEvent>) {
        self.observer = Some(sender);
    }

    /// Tear down observation. Subsequent mutations are no longer reported.
    pub fn disconnect_observer(&mut self) {
        self.observer = None;
    }

    fn emit(&self, event: PageEvent) {
        if let Some(ref tx) = self.observer {
            let _ = tx.send(event);
        }
    }

    /// Load-time guard against installing a second engine in the same page.
    pub fn scanner_installed(&self) -> bool {
        self.scanner_installed
    }

    pub(crate) fn set_scanner_installed(&mut self) {
        self.scanner_installed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Document {
        Document::parse(html, "https://example.com/", Viewport::default())
    }

    #[test]
    fn test_parse_basic_tree() {
        let d = doc("<html><body><p id=\"intro\">Hello <b>world</b></p></body></html>");
        let p = d.element_by_id("intro").expect("p exists");
        assert_eq!(d.tag(p), Some("p"));
        assert_eq!(d.raw_text(p).split_whitespace().collect::<Vec<_>>(), ["Hello", "world"]);
    }

    #[test]
    fn test_elements_document_order() {
        let d = doc("<body><div id=\"a\"><span id=\"b\"></span></div><p id=\"c\"></p></body>");
        let tags: Vec<&str> = d.elements().iter().filter_map(|&e| d.tag(e)).collect();
        let a = tags.iter().position(|&t| t == "div").unwrap();
        let b = tags.iter().position(|&t| t == "span").unwrap();
        let c = tags.iter().position(|&t| t == "p").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_remove_leaves_stale_handles() {
        let mut d = doc("<body><div id=\"gone\"><span>inner</span></div></body>");
        let div = d.element_by_id("gone").unwrap();
        let span = d.descendants(div)[0];
        assert!(d.remove(div));
        assert!(!d.contains(div));
        assert!(!d.contains(span));
        assert!(!d.remove(div));
        assert!(d.descendants(div).is_empty());
        assert_eq!(d.raw_text(div), "");
    }

    #[test]
    fn test_append_html_and_mutation_record() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut d = doc("<body><div id=\"host\"></div></body>");
        d.observe(tx);
        let host = d.element_by_id("host").unwrap();
        let added = d.append_html(host, "<button>Ok</button><p>hi</p>").unwrap();
        assert_eq!(added.len(), 2);
        match rx.try_recv().unwrap() {
            PageEvent::Mutation(rec) => {
                assert_eq!(rec.added, 2);
                assert_eq!(rec.removed, 0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_set_attr_does_not_report() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut d = doc("<body><div id=\"host\"></div></body>");
        d.observe(tx);
        let host = d.element_by_id("host").unwrap();
        d.set_attr(host, "style", "outline: 2px solid red");
        assert!(rx.try_recv().is_err());
        assert_eq!(d.attr(host, "style"), Some("outline: 2px solid red"));
        d.remove_attr(host, "style");
        assert!(rx.try_recv().is_err());
        assert_eq!(d.attr(host, "style"), None);
    }

    #[test]
    fn test_mark_ready_emits_once_per_call() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut d = doc("<body></body>");
        d.observe(tx);
        d.mark_ready(ReadyState::Interactive);
        assert!(matches!(rx.try_recv().unwrap(), PageEvent::Ready));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_append_to_removed_parent_fails() {
        let mut d = doc("<body><div id=\"x\"></div></body>");
        let x = d.element_by_id("x").unwrap();
        d.remove(x);
        assert!(d.append_html(x, "<p>nope</p>").is_err());
    }
}
