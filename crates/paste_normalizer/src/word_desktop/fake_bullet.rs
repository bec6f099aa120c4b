// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The text Word renders in place of a bullet, and the markup around it.
//!
//! ```html
//! <p style="mso-list:l1 level1 lfo2">
//!   <span style="mso-list:Ignore">1.<span>&nbsp;&nbsp;&nbsp;</span></span>
//!   Content
//! </p>
//! ```
//!
//! Depending on the paste path, the `mso-list:Ignore` span may instead be a
//! `[if !supportLists]` ... `[endif]` comment pair around the same content.

use crate::dom::{FragmentDom, FragmentHandle};
use crate::list_type::ListType;

pub(crate) const MSO_LIST_STYLE_NAME: &str = "mso-list";
const MSO_LIST_IGNORE: &str = "ignore";
const SUPPORT_LISTS_COMMENT: &str = "[if !supportlists]";
const END_IF_COMMENT: &str = "[endif]";

/// Fake bullets that mean an unordered list. Anything else is a number.
const WORD_FAKE_BULLET_TO_UL: [&str; 4] = ["o", "·", "§", "-"];

/// Bullets made of an image have no text.
const IMAGE_BULLET: &str = "o";

pub(crate) fn fake_bullet_list_type(bullet: &str) -> ListType {
    if WORD_FAKE_BULLET_TO_UL.contains(&bullet) {
        ListType::Unordered
    } else {
        ListType::Ordered
    }
}

pub(crate) fn is_ignore_node(dom: &FragmentDom, node: FragmentHandle) -> bool {
    dom.element(node)
        .and_then(|e| e.style_value(MSO_LIST_STYLE_NAME))
        .is_some_and(|v| v.eq_ignore_ascii_case(MSO_LIST_IGNORE))
}

fn is_empty_span(dom: &FragmentDom, node: FragmentHandle) -> bool {
    dom.has_tag(node, "span") && dom.children(node).is_empty()
}

fn is_comment_with(dom: &FragmentDom, node: FragmentHandle, text: &str) -> bool {
    dom.comment(node)
        .is_some_and(|c| c.trim().eq_ignore_ascii_case(text))
}

/// Turn a `[if !supportLists]` comment and its `[endif]` partner (at most
/// `lookahead` siblings later) into a `mso-list:ignore` span around what
/// they enclose. The comments are removed.
///
/// Returns the span, or `child` when it does not open such a pair.
pub(crate) fn fix_word_list_comments(
    dom: &mut FragmentDom,
    child: FragmentHandle,
    lookahead: usize,
) -> FragmentHandle {
    if !is_comment_with(dom, child, SUPPORT_LISTS_COMMENT) {
        return child;
    }

    let mut end = None;
    let mut next = dom.next_sibling(child);
    for _ in 0..lookahead {
        let Some(n) = next else {
            break;
        };
        if is_comment_with(dom, n, END_IF_COMMENT) {
            end = Some(n);
            break;
        }
        next = dom.next_sibling(n);
    }
    let Some(end) = end else {
        return child;
    };

    let span = dom.create_element("span");
    if let Some(e) = dom.element_mut(span) {
        e.set_attr("style", "mso-list:ignore");
    }
    dom.insert_before(child, span);
    while let Some(n) = dom.next_sibling(child) {
        if n == end {
            break;
        }
        dom.append_child(span, n);
    }
    dom.detach(child);
    dom.detach(end);
    span
}

/// The fake bullet of a list paragraph, searched `levels` elements deep.
pub(crate) fn get_fake_bullet_text(
    dom: &mut FragmentDom,
    node: FragmentHandle,
    levels: usize,
    lookahead: usize,
) -> Option<String> {
    let mut child = dom.first_child(node);
    while let Some(c) = child {
        let c = fix_word_list_comments(dom, c, lookahead);
        if is_ignore_node(dom, c) {
            let text = dom.text_content(c);
            let text = text.trim();
            return Some(if text.is_empty() {
                String::from(IMAGE_BULLET)
            } else {
                text.to_owned()
            });
        }
        if dom.is_element(c) && levels > 1 {
            if let Some(text) = get_fake_bullet_text(dom, c, levels - 1, lookahead)
            {
                return Some(text);
            }
        }
        child = dom.next_sibling(c);
    }
    None
}

/// Remove the fake bullet and the empty spans around it from a list
/// paragraph, `levels` elements deep.
pub(crate) fn cleanup_list_ignore(
    dom: &mut FragmentDom,
    node: FragmentHandle,
    levels: usize,
    lookahead: usize,
) {
    let mut to_remove = Vec::new();
    let mut child = dom.first_child(node);
    while let Some(c) = child {
        if dom.is_element(c) && levels > 1 {
            cleanup_list_ignore(dom, c, levels - 1, lookahead);
        }
        let c = fix_word_list_comments(dom, c, lookahead);
        if is_empty_span(dom, c) || is_ignore_node(dom, c) {
            to_remove.push(c);
        }
        child = dom.next_sibling(c);
    }
    for c in to_remove {
        dom.detach(c);
    }
}
