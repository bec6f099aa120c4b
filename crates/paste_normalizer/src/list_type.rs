// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display};

use crate::dom::{FragmentDom, FragmentHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum ListType {
    Ordered,
    Unordered,
}

impl ListType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "ol" => Some(Self::Ordered),
            "ul" => Some(Self::Unordered),
            _ => None,
        }
    }

    pub fn of_node(dom: &FragmentDom, handle: FragmentHandle) -> Option<Self> {
        dom.tag(handle).and_then(Self::from_tag)
    }
}

pub(crate) fn is_list(dom: &FragmentDom, handle: FragmentHandle) -> bool {
    ListType::of_node(dom, handle).is_some()
}

/// Where a sub-list of `list` belongs: inside its last `<li>` when the list
/// ends with one, otherwise directly in the list.
pub(crate) fn nested_list_slot(
    dom: &FragmentDom,
    list: FragmentHandle,
) -> FragmentHandle {
    match dom.last_element_child(list) {
        Some(last) if dom.has_tag(last, "li") => last,
        _ => list,
    }
}

/// The sub-list that continues `list` one level deeper, if there is one.
pub(crate) fn last_nested_list(
    dom: &FragmentDom,
    list: FragmentHandle,
) -> Option<FragmentHandle> {
    let slot = nested_list_slot(dom, list);
    dom.last_element_child(slot)
        .filter(|last| is_list(dom, *last))
}

/// The sub-list one level below `list`, creating an empty one of
/// `list_type` in [nested_list_slot] when it does not exist yet.
pub(crate) fn get_or_create_nested_list(
    dom: &mut FragmentDom,
    list: FragmentHandle,
    list_type: ListType,
) -> FragmentHandle {
    if let Some(existing) = last_nested_list(dom, list) {
        return existing;
    }
    let slot = nested_list_slot(dom, list);
    let new_list = dom.create_element(list_type.tag());
    dom.append_child(slot, new_list);
    new_list
}
