// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Arena-backed tree holding one pasted fragment.
//!
//! All nodes live in a single `Vec` owned by the [FragmentDom] and refer to
//! each other through [FragmentHandle]s. Detaching a node only unlinks it: the
//! node stays in the arena, so a handle is never reused for a different node
//! while the fragment is alive. The list converters rely on that to key side
//! tables by handle.

use html5ever::{LocalName, Namespace, QualName};

use super::element_node::ElementNode;

pub(crate) const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Build a qualified name in the HTML namespace.
pub fn html_qual_name(local: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub enum FragmentNode {
    Document,
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentNode {
    pub content: String,
}

#[derive(Clone, Debug)]
struct Slot {
    node: FragmentNode,
    parent: Option<FragmentHandle>,
    /// Position in the parent's children. Stale while detached.
    index: usize,
    children: Vec<FragmentHandle>,
}

impl Slot {
    fn new(node: FragmentNode) -> Self {
        Self {
            node,
            parent: None,
            index: 0,
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FragmentDom {
    slots: Vec<Slot>,
    document: FragmentHandle,
}

impl Default for FragmentDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentDom {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::new(FragmentNode::Document)],
            document: FragmentHandle(0),
        }
    }

    pub fn document_handle(&self) -> FragmentHandle {
        self.document
    }

    /// The node whose children are the pasted top-level nodes.
    ///
    /// html5ever wraps fragments in an `<html>` element; trees built by hand
    /// hang their content off the document directly.
    pub fn root(&self) -> FragmentHandle {
        match self.first_child(self.document) {
            Some(html) if self.has_tag(html, "html") => html,
            _ => self.document,
        }
    }

    pub fn node(&self, handle: FragmentHandle) -> &FragmentNode {
        &self.slots[handle.0].node
    }

    pub fn node_mut(&mut self, handle: FragmentHandle) -> &mut FragmentNode {
        &mut self.slots[handle.0].node
    }

    pub fn element(&self, handle: FragmentHandle) -> Option<&ElementNode> {
        match self.node(handle) {
            FragmentNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(
        &mut self,
        handle: FragmentHandle,
    ) -> Option<&mut ElementNode> {
        match self.node_mut(handle) {
            FragmentNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Lower-case local name of an element, `None` for other node kinds.
    pub fn tag(&self, handle: FragmentHandle) -> Option<&str> {
        self.element(handle).map(|e| e.tag())
    }

    pub fn has_tag(&self, handle: FragmentHandle, tag: &str) -> bool {
        self.tag(handle) == Some(tag)
    }

    pub fn is_element(&self, handle: FragmentHandle) -> bool {
        matches!(self.node(handle), FragmentNode::Element(_))
    }

    pub fn is_comment(&self, handle: FragmentHandle) -> bool {
        matches!(self.node(handle), FragmentNode::Comment(_))
    }

    pub fn text(&self, handle: FragmentHandle) -> Option<&str> {
        match self.node(handle) {
            FragmentNode::Text(text) => Some(&text.content),
            _ => None,
        }
    }

    pub fn comment(&self, handle: FragmentHandle) -> Option<&str> {
        match self.node(handle) {
            FragmentNode::Comment(comment) => Some(&comment.content),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self, handle: FragmentHandle) -> bool {
        self.text(handle).is_some_and(|t| t.trim().is_empty())
    }

    /// Whitespace-only text and comments carry no visible content.
    pub fn is_insignificant(&self, handle: FragmentHandle) -> bool {
        self.is_whitespace_text(handle) || self.is_comment(handle)
    }

    pub fn parent(&self, handle: FragmentHandle) -> Option<FragmentHandle> {
        self.slots[handle.0].parent
    }

    pub fn children(&self, handle: FragmentHandle) -> &[FragmentHandle] {
        &self.slots[handle.0].children
    }

    pub fn first_child(&self, handle: FragmentHandle) -> Option<FragmentHandle> {
        self.children(handle).first().copied()
    }

    pub fn last_child(&self, handle: FragmentHandle) -> Option<FragmentHandle> {
        self.children(handle).last().copied()
    }

    pub fn last_element_child(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        self.children(handle)
            .iter()
            .rev()
            .copied()
            .find(|c| self.is_element(*c))
    }

    pub fn index_in_parent(&self, handle: FragmentHandle) -> Option<usize> {
        let parent = self.parent(handle)?;
        let index = self.slots[handle.0].index;
        (self.children(parent).get(index) == Some(&handle)).then_some(index)
    }

    pub fn next_sibling(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let parent = self.parent(handle)?;
        let index = self.index_in_parent(handle)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let parent = self.parent(handle)?;
        let index = self.index_in_parent(handle)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Previous sibling, skipping whitespace-only text and comments.
    pub fn real_previous_sibling(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let mut sibling = self.previous_sibling(handle);
        while let Some(s) = sibling {
            if !self.is_insignificant(s) {
                break;
            }
            sibling = self.previous_sibling(s);
        }
        sibling
    }

    /// Next sibling, skipping whitespace-only text.
    pub fn real_next_sibling(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let mut sibling = self.next_sibling(handle);
        while let Some(s) = sibling {
            if !self.is_whitespace_text(s) {
                break;
            }
            sibling = self.next_sibling(s);
        }
        sibling
    }

    pub fn contains(
        &self,
        ancestor: FragmentHandle,
        node: FragmentHandle,
    ) -> bool {
        let mut current = Some(node);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    pub fn is_attached(&self, handle: FragmentHandle) -> bool {
        self.contains(self.document, handle)
    }

    pub(crate) fn add_node(&mut self, node: FragmentNode) -> FragmentHandle {
        self.slots.push(Slot::new(node));
        FragmentHandle(self.slots.len() - 1)
    }

    pub fn create_element(&mut self, tag: &str) -> FragmentHandle {
        self.add_node(FragmentNode::Element(ElementNode::new(tag)))
    }

    pub fn create_text(&mut self, content: &str) -> FragmentHandle {
        self.add_node(FragmentNode::Text(TextNode {
            content: content.to_owned(),
        }))
    }

    pub fn create_comment(&mut self, content: &str) -> FragmentHandle {
        self.add_node(FragmentNode::Comment(CommentNode {
            content: content.to_owned(),
        }))
    }

    /// Unlink a node from its parent. The node and its subtree stay in the
    /// arena and can be re-inserted.
    pub fn detach(&mut self, handle: FragmentHandle) {
        if let Some(parent) = self.slots[handle.0].parent.take() {
            let index = self.slots[handle.0].index;
            let children = &mut self.slots[parent.0].children;
            if children.get(index) == Some(&handle) {
                children.remove(index);
                self.reindex_children(parent, index);
            }
        }
    }

    /// Refresh the stored position of the children of `parent` from `from`
    /// onwards.
    fn reindex_children(&mut self, parent: FragmentHandle, from: usize) {
        for index in from..self.slots[parent.0].children.len() {
            let child = self.slots[parent.0].children[index];
            self.slots[child.0].index = index;
        }
    }

    fn insert_at(
        &mut self,
        parent: FragmentHandle,
        index: usize,
        child: FragmentHandle,
    ) {
        self.slots[child.0].parent = Some(parent);
        let children = &mut self.slots[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.reindex_children(parent, index);
    }

    pub fn append_child(&mut self, parent: FragmentHandle, child: FragmentHandle) {
        self.detach(child);
        let len = self.children(parent).len();
        self.insert_at(parent, len, child);
    }

    /// Insert `new_node` right before `reference`. Does nothing when
    /// `reference` has no parent.
    pub fn insert_before(
        &mut self,
        reference: FragmentHandle,
        new_node: FragmentHandle,
    ) {
        if reference == new_node {
            return;
        }
        self.detach(new_node);
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if let Some(index) = self.index_in_parent(reference) {
            self.insert_at(parent, index, new_node);
        }
    }

    /// Insert `new_node` right after `reference`. Does nothing when
    /// `reference` has no parent.
    pub fn insert_after(
        &mut self,
        reference: FragmentHandle,
        new_node: FragmentHandle,
    ) {
        if reference == new_node {
            return;
        }
        self.detach(new_node);
        let Some(parent) = self.parent(reference) else {
            return;
        };
        if let Some(index) = self.index_in_parent(reference) {
            self.insert_at(parent, index + 1, new_node);
        }
    }

    /// Move every child of `from` to the end of `to`, keeping their order.
    pub fn move_children(&mut self, from: FragmentHandle, to: FragmentHandle) {
        let children = std::mem::take(&mut self.slots[from.0].children);
        for child in children {
            self.slots[child.0].parent = None;
            self.append_child(to, child);
        }
    }

    /// Replace a node by its children.
    pub fn unwrap(&mut self, handle: FragmentHandle) {
        let (Some(parent), Some(index)) =
            (self.parent(handle), self.index_in_parent(handle))
        else {
            return;
        };
        let children = std::mem::take(&mut self.slots[handle.0].children);
        for child in &children {
            self.slots[child.0].parent = Some(parent);
        }
        self.slots[parent.0]
            .children
            .splice(index..=index, children);
        self.reindex_children(parent, index);
        self.slots[handle.0].parent = None;
    }

    pub fn replace_node(&mut self, old: FragmentHandle, new: FragmentHandle) {
        self.insert_before(old, new);
        self.detach(old);
    }

    /// Copy a node without its children. The copy is detached.
    pub fn clone_shallow(&mut self, handle: FragmentHandle) -> FragmentHandle {
        let node = self.node(handle).clone();
        self.add_node(node)
    }

    /// Copy a node and its whole subtree. The copy is detached.
    pub fn clone_deep(&mut self, handle: FragmentHandle) -> FragmentHandle {
        let copy = self.clone_shallow(handle);
        for child in self.children(handle).to_vec() {
            let child_copy = self.clone_deep(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Split the parent of `node` in two.
    ///
    /// With `split_before`, the siblings before `node` move to a shallow clone
    /// of the parent inserted before it; otherwise the siblings after `node`
    /// move to a clone inserted after it. Returns the clone, or `None` when
    /// there was nothing to move.
    pub fn split_parent_node(
        &mut self,
        node: FragmentHandle,
        split_before: bool,
    ) -> Option<FragmentHandle> {
        let parent = self.parent(node)?;
        self.parent(parent)?;
        let index = self.index_in_parent(node)?;
        let siblings = self.children(parent);
        let to_move: Vec<FragmentHandle> = if split_before {
            siblings[..index].to_vec()
        } else {
            siblings[index + 1..].to_vec()
        };
        if to_move.is_empty() {
            return None;
        }

        let new_parent = self.clone_shallow(parent);
        for sibling in to_move {
            self.append_child(new_parent, sibling);
        }
        if split_before {
            self.insert_before(parent, new_parent);
        } else {
            self.insert_after(parent, new_parent);
        }
        Some(new_parent)
    }

    /// Rearrange the tree so that `start` and `end` end up inside a run of
    /// siblings under their closest common ancestor, splitting intermediate
    /// ancestors so that no content outside the range is carried along.
    /// Blank text and comments next to the range may stay with it.
    ///
    /// Returns that run of siblings, empty when `start` is after `end` or
    /// either node is outside `root`.
    pub fn collapse_nodes(
        &mut self,
        root: FragmentHandle,
        start: FragmentHandle,
        end: FragmentHandle,
    ) -> Vec<FragmentHandle> {
        if !self.contains(root, start) || !self.contains(root, end) {
            return Vec::new();
        }

        let start = self.collapse_towards(root, start, end, true);
        let end = self.collapse_towards(root, end, start, false);

        if start == end {
            return vec![start];
        }
        match (self.parent(start), self.parent(end)) {
            (Some(a), Some(b)) if a == b => {
                let siblings = self.children(a);
                let from = siblings.iter().position(|c| *c == start);
                let to = siblings.iter().position(|c| *c == end);
                match (from, to) {
                    (Some(from), Some(to)) if from <= to => {
                        siblings[from..=to].to_vec()
                    }
                    _ => Vec::new(),
                }
            }
            _ => vec![start],
        }
    }

    fn collapse_towards(
        &mut self,
        root: FragmentHandle,
        mut node: FragmentHandle,
        trace: FragmentHandle,
        is_start: bool,
    ) -> FragmentHandle {
        while let Some(parent) = self.parent(node) {
            if parent == root || self.contains(parent, trace) {
                break;
            }
            if is_start {
                if self.real_previous_sibling(node).is_some() {
                    self.split_parent_node(node, true);
                }
            } else if self.real_next_sibling(node).is_some() {
                self.split_parent_node(node, false);
            }
            node = parent;
        }
        node
    }

    /// Every node below `handle` in document order, `handle` excluded.
    pub fn descendants(&self, handle: FragmentHandle) -> Vec<FragmentHandle> {
        let mut ret = Vec::new();
        let mut stack: Vec<FragmentHandle> =
            self.children(handle).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            ret.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        ret
    }

    pub fn find_descendants(
        &self,
        handle: FragmentHandle,
        predicate: impl Fn(&Self, FragmentHandle) -> bool,
    ) -> Vec<FragmentHandle> {
        self.descendants(handle)
            .into_iter()
            .filter(|h| predicate(self, *h))
            .collect()
    }

    pub fn any_descendant(
        &self,
        handle: FragmentHandle,
        predicate: impl Fn(&Self, FragmentHandle) -> bool,
    ) -> bool {
        self.descendants(handle)
            .into_iter()
            .any(|h| predicate(self, h))
    }

    /// Concatenated text of every text node below `handle`.
    pub fn text_content(&self, handle: FragmentHandle) -> String {
        if let Some(text) = self.text(handle) {
            return text.to_owned();
        }
        self.descendants(handle)
            .into_iter()
            .filter_map(|h| self.text(h))
            .collect()
    }

    pub fn first_leaf(&self, handle: FragmentHandle) -> FragmentHandle {
        let mut current = handle;
        while let Some(child) = self.first_child(current) {
            current = child;
        }
        current
    }

    /// The first leaf after `handle` in document order, not entering
    /// `handle`'s own subtree and never leaving `root`.
    pub fn next_leaf(
        &self,
        handle: FragmentHandle,
        root: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let mut current = handle;
        loop {
            if current == root {
                return None;
            }
            if let Some(next) = self.next_sibling(current) {
                return Some(self.first_leaf(next));
            }
            current = self.parent(current)?;
        }
    }

    /// First leaf of `handle` that is not whitespace-only text or a comment.
    pub fn first_meaningful_leaf(
        &self,
        handle: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let mut leaf = self.first_leaf(handle);
        while self.is_insignificant(leaf) {
            leaf = self.next_leaf(leaf, handle)?;
        }
        Some(leaf)
    }

    /// Next leaf after `handle` that is not whitespace-only text or a comment.
    pub fn next_meaningful_leaf(
        &self,
        handle: FragmentHandle,
        root: FragmentHandle,
    ) -> Option<FragmentHandle> {
        let mut leaf = self.next_leaf(handle, root)?;
        while self.is_insignificant(leaf) {
            leaf = self.next_leaf(leaf, root)?;
        }
        Some(leaf)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::parser::parse_fragment;
    use crate::ToHtml;

    fn parse(html: &str) -> FragmentDom {
        parse_fragment(html).unwrap_or_else(|e| e.into_dom())
    }

    fn by_id(dom: &FragmentDom, id: &str) -> FragmentHandle {
        dom.find_descendants(dom.root(), |d, h| {
            d.element(h).and_then(|e| e.get_attr("id")) == Some(id)
        })[0]
    }

    #[test]
    fn root_is_the_html_element_of_a_parsed_fragment() {
        let dom = parse("<p>a</p>");
        assert_eq!(dom.tag(dom.root()), Some("html"));
        assert_eq!(dom.to_html(), "<p>a</p>");
    }

    #[test]
    fn root_is_the_document_for_an_empty_tree() {
        let dom = FragmentDom::new();
        assert_eq!(dom.root(), dom.document_handle());
    }

    #[test]
    fn siblings_skip_whitespace_when_asked() {
        let dom = parse("<p id='a'></p> <!--c--> <p id='b'></p>");
        let a = by_id(&dom, "a");
        let b = by_id(&dom, "b");
        assert_ne!(dom.previous_sibling(b), Some(a));
        assert_eq!(dom.real_previous_sibling(b), Some(a));
    }

    #[test]
    fn insert_before_and_after_place_nodes() {
        let mut dom = parse("<b id='x'>x</b>");
        let x = by_id(&dom, "x");
        let before = dom.create_text("1");
        let after = dom.create_text("2");
        dom.insert_before(x, before);
        dom.insert_after(x, after);
        assert_eq!(dom.to_html(), r#"1<b id="x">x</b>2"#);
    }

    #[test]
    fn unwrap_promotes_children_in_place() {
        let mut dom = parse("a<div id='d'><i>b</i>c</div>d");
        let d = by_id(&dom, "d");
        dom.unwrap(d);
        assert_eq!(dom.to_html(), "a<i>b</i>cd");
        assert!(!dom.is_attached(d));
    }

    #[test]
    fn sibling_positions_follow_every_edit() {
        let mut dom = parse("a<div id='d'><i>b</i>c</div><b id='x'>x</b>e");
        let d = by_id(&dom, "d");
        let x = by_id(&dom, "x");
        let root = dom.root();
        let first = dom.first_child(root).unwrap();

        let y = dom.create_element("u");
        dom.insert_before(d, y);
        dom.detach(first);
        dom.unwrap(d);
        dom.insert_after(x, first);
        let z = dom.create_text("z");
        dom.append_child(root, z);

        assert_eq!(dom.to_html(), "<u></u><i>b</i>c<b id=\"x\">x</b>aez");
        for (index, child) in dom.children(root).to_vec().into_iter().enumerate()
        {
            assert_eq!(dom.index_in_parent(child), Some(index));
        }
        assert_eq!(dom.index_in_parent(d), None);
        assert_eq!(dom.next_sibling(x), Some(first));
        assert_eq!(dom.previous_sibling(first), Some(x));
    }

    #[test]
    fn split_parent_before_moves_earlier_siblings_to_a_clone() {
        let mut dom = parse("<div class='w'>a<b id='b'>b</b>c</div>");
        let b = by_id(&dom, "b");
        let clone = dom.split_parent_node(b, true);
        assert!(clone.is_some());
        assert_eq!(
            dom.to_html(),
            r#"<div class="w">a</div><div class="w"><b id="b">b</b>c</div>"#
        );
    }

    #[test]
    fn split_parent_after_with_nothing_to_move_returns_none() {
        let mut dom = parse("<div>a<b id='b'>b</b></div>");
        let b = by_id(&dom, "b");
        assert_eq!(dom.split_parent_node(b, false), None);
        assert_eq!(dom.to_html(), r#"<div>a<b id="b">b</b></div>"#);
    }

    #[test]
    fn collapse_nodes_splits_ancestors_around_the_range() {
        let mut dom = parse(
            "<div>x<div id='s'>s</div></div><div><div id='e'>e</div>y</div>",
        );
        let root = dom.root();
        let s = by_id(&dom, "s");
        let e = by_id(&dom, "e");
        let run = dom.collapse_nodes(root, s, e);
        assert_eq!(run.len(), 2);
        assert_eq!(
            dom.to_html(),
            r#"<div>x</div><div><div id="s">s</div></div><div><div id="e">e</div></div><div>y</div>"#
        );
    }

    #[test]
    fn collapse_nodes_of_siblings_returns_the_run() {
        let mut dom = parse("<i id='a'>a</i><b>b</b><u id='c'>c</u>");
        let root = dom.root();
        let a = by_id(&dom, "a");
        let c = by_id(&dom, "c");
        assert_eq!(dom.collapse_nodes(root, a, c).len(), 3);
        assert!(dom.collapse_nodes(root, c, a).is_empty());
    }

    #[test]
    fn next_meaningful_leaf_skips_whitespace_across_parents() {
        let dom = parse("<div><i id='a'>a</i> </div>\n<div><b id='b'>b</b></div>");
        let a = by_id(&dom, "a");
        let b = by_id(&dom, "b");
        let leaf = dom.next_meaningful_leaf(a, dom.root());
        assert_eq!(leaf, dom.first_meaningful_leaf(b));
    }

    #[test]
    fn clone_deep_copies_the_subtree_detached() {
        let mut dom = parse("<p id='p'>a<b>b</b></p>");
        let p = by_id(&dom, "p");
        let copy = dom.clone_deep(p);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.text_content(copy), "ab");
    }
}
