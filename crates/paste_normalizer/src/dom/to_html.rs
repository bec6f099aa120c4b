// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use super::fragment_dom::{FragmentDom, FragmentHandle, FragmentNode};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

pub trait ToHtml {
    fn fmt_html(&self, buf: &mut String);

    fn to_html(&self) -> String {
        let mut buf = String::new();
        self.fmt_html(&mut buf);
        buf
    }
}

impl ToHtml for FragmentDom {
    /// Serializes the pasted content, i.e. the children of [FragmentDom::root].
    fn fmt_html(&self, buf: &mut String) {
        self.fmt_children(self.root(), buf);
    }
}

impl FragmentDom {
    pub fn inner_html(&self, handle: FragmentHandle) -> String {
        let mut buf = String::new();
        self.fmt_children(handle, &mut buf);
        buf
    }

    pub fn outer_html(&self, handle: FragmentHandle) -> String {
        let mut buf = String::new();
        self.fmt_node(handle, &mut buf);
        buf
    }

    fn fmt_children(&self, handle: FragmentHandle, buf: &mut String) {
        let raw = self
            .tag(handle)
            .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
        for child in self.children(handle) {
            match self.node(*child) {
                FragmentNode::Text(text) if raw => buf.push_str(&text.content),
                _ => self.fmt_node(*child, buf),
            }
        }
    }

    fn fmt_node(&self, handle: FragmentHandle, buf: &mut String) {
        match self.node(handle) {
            FragmentNode::Document => self.fmt_children(handle, buf),
            FragmentNode::Text(text) => {
                encode_text_to_string(&text.content, buf);
            }
            FragmentNode::Comment(comment) => {
                buf.push_str("<!--");
                buf.push_str(&comment.content);
                buf.push_str("-->");
            }
            FragmentNode::Element(element) => {
                let tag = element.tag();
                buf.push('<');
                buf.push_str(tag);
                for (name, value) in element.attrs() {
                    buf.push(' ');
                    buf.push_str(name);
                    buf.push_str("=\"");
                    encode_double_quoted_attribute_to_string(value, buf);
                    buf.push('"');
                }
                buf.push('>');
                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                self.fmt_children(handle, buf);
                buf.push_str("</");
                buf.push_str(tag);
                buf.push('>');
            }
        }
    }
}
