// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use crate::dom::{FragmentDom, FragmentHandle};
use crate::list_type::ListType;

use super::fake_bullet::{fake_bullet_list_type, MSO_LIST_STYLE_NAME};

/// Index of a [ListMetadata] in [super::WordConverter]'s list table. Unique
/// across the whole fragment.
pub(crate) type UniqueListId = usize;

/// What a paragraph's `mso-list` style says about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListItemMetadata {
    pub level: usize,
    /// The whole `mso-list` value. Only meaningful within one level.
    pub word_list_id: String,
    pub original_node: FragmentHandle,
    pub unique_list_id: UniqueListId,
}

impl ListItemMetadata {
    /// Word writes `mso-list:l0 level1 lfo1`: the list definition, the
    /// nesting level and the list instance. Anything else means `node` is
    /// not a list item. Levels past `max_level` are clamped to it.
    pub fn from_node(
        dom: &FragmentDom,
        node: FragmentHandle,
        max_level: usize,
    ) -> Option<Self> {
        let value = dom.element(node)?.style_value(MSO_LIST_STYLE_NAME)?;
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let [_list, level, _instance] = tokens.as_slice() else {
            return None;
        };
        let level = level
            .to_ascii_lowercase()
            .strip_prefix("level")?
            .parse::<usize>()
            .ok()
            .filter(|l| *l > 0)?;
        Some(Self {
            level: level.min(max_level.max(1)),
            word_list_id: value,
            original_node: node,
            unique_list_id: 0,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListMetadata {
    pub number_of_items: usize,
    pub first_fake_bullet: Option<String>,
    pub list_type: ListType,
    /// Once set, never cleared.
    pub ignore: bool,
}

impl ListMetadata {
    pub fn new(first_fake_bullet: Option<String>) -> Self {
        let list_type = first_fake_bullet
            .as_deref()
            .map(fake_bullet_list_type)
            .unwrap_or(ListType::Ordered);
        Self {
            number_of_items: 0,
            ignore: first_fake_bullet.is_none(),
            first_fake_bullet,
            list_type,
        }
    }

    /// Two items with the same bullet are bullets, "1." then "2." is a
    /// numbered list.
    pub fn disambiguate(&mut self, second_fake_bullet: Option<&str>) {
        self.list_type =
            if self.first_fake_bullet.as_deref() == second_fake_bullet {
                ListType::Unordered
            } else {
                ListType::Ordered
            };
    }

    pub fn mark_ignored(&mut self) {
        self.ignore = true;
    }
}

/// Lists open at one nesting level during discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LevelLists {
    pub lists_by_word_id: HashMap<String, UniqueListId>,
    /// The list the previous item at this level went to.
    pub current_unique_list_id: Option<UniqueListId>,
}
