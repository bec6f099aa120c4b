// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::HtmlParseError;
use crate::dom::element_node::ElementNode;
use crate::dom::fragment_dom::{
    html_qual_name, FragmentDom, FragmentHandle, FragmentNode,
};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use once_cell::sync::Lazy;
use std::cell::{Ref, RefCell};

pub(crate) type FragmentCreationResult = Result<FragmentDom, HtmlParseError>;

static NO_NAME: Lazy<QualName> = Lazy::new(|| html_qual_name(""));

#[derive(Default)]
struct CreationState {
    dom: FragmentDom,
    parse_errors: Vec<String>,
}

pub(crate) struct FragmentCreator {
    state: RefCell<CreationState>,
}

impl FragmentCreator {
    pub fn parse(html: &str) -> FragmentCreationResult {
        parse_fragment(
            FragmentCreator::default(),
            Default::default(),
            html_qual_name("body"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    /// Add text to `parent`, merging with a text node right before
    /// `before` (or the last child when `before` is `None`).
    fn add_text(
        dom: &mut FragmentDom,
        parent: FragmentHandle,
        before: Option<FragmentHandle>,
        text: &str,
    ) {
        let previous = match before {
            Some(b) => dom.previous_sibling(b),
            None => dom.last_child(parent),
        };
        if let Some(FragmentNode::Text(t)) =
            previous.map(|p| dom.node_mut(p))
        {
            t.content += text;
            return;
        }

        let text_handle = dom.create_text(text);
        match before {
            Some(b) => dom.insert_before(b, text_handle),
            None => dom.append_child(parent, text_handle),
        }
    }
}

impl Default for FragmentCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(CreationState::default()),
        }
    }
}

impl TreeSink for FragmentCreator {
    type Handle = FragmentHandle;
    type Output = FragmentCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let CreationState { dom, parse_errors } = self.state.into_inner();
        if parse_errors.is_empty() {
            Ok(dom)
        } else {
            Err(HtmlParseError { dom, parse_errors })
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| {
            state
                .dom
                .element(*target)
                .map(|e| e.name())
                .unwrap_or(&*NO_NAME)
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect();
        self.state
            .borrow_mut()
            .dom
            .add_node(FragmentNode::Element(ElementNode::from_parts(
                name, attrs,
            )))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.create_comment(text.as_ref())
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only exist in XML
        self.state.borrow_mut().dom.create_comment(data.as_ref())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => dom.append_child(*parent, child),
            NodeOrText::AppendText(tendril) => {
                Self::add_text(dom, *parent, None, tendril.as_ref())
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing worth keeping in a pasted fragment
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {
        // Nothing to do here, but html5ever calls it for every closed element
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content is kept inline as ordinary children
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Nothing to do here for now
    }

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let Some(parent) = dom.parent(*sibling) else {
            return;
        };
        match new_node {
            NodeOrText::AppendNode(node) => dom.insert_before(*sibling, node),
            NodeOrText::AppendText(tendril) => {
                Self::add_text(dom, parent, Some(*sibling), tendril.as_ref())
            }
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let Some(node) = dom.element_mut(*target) {
            for attr in attrs {
                let name = attr.name.local.as_ref();
                if node.get_attr(name).is_none() {
                    node.set_attr(name, attr.value.as_ref());
                }
            }
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(*target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        self.state.borrow_mut().dom.move_children(*node, *new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {
        // Nothing to do here for now, but this is called on tests with new lines
    }

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("Shadow roots are not supported in pasted content"))
    }
}
