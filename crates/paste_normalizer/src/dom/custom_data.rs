// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Small per-node records that live next to a [FragmentDom] for the duration
//! of one conversion.
//!
//! Handles are never reused within a fragment, so the store keys records by
//! [FragmentHandle] instead of stamping an id attribute onto the element.
//! Nothing is written into the tree and nothing outlives the store.

use std::collections::HashMap;

use super::fragment_dom::{FragmentDom, FragmentHandle};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustomValue {
    Number(i64),
    Text(String),
}

impl From<i64> for CustomValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for CustomValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for CustomValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl CustomValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => t.parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CustomData {
    dict: HashMap<FragmentHandle, HashMap<String, CustomValue>>,
}

impl CustomData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `key` for an element. Other node kinds are
    /// ignored.
    pub fn set(
        &mut self,
        dom: &FragmentDom,
        node: FragmentHandle,
        key: &str,
        value: impl Into<CustomValue>,
    ) {
        if !dom.is_element(node) {
            return;
        }
        self.dict
            .entry(node)
            .or_default()
            .insert(key.to_owned(), value.into());
    }

    /// The value recorded under `key` for an element, `None` for unknown
    /// keys and for anything that is not an element.
    pub fn get(
        &self,
        dom: &FragmentDom,
        node: FragmentHandle,
        key: &str,
    ) -> Option<&CustomValue> {
        if !dom.is_element(node) {
            return None;
        }
        self.dict.get(&node).and_then(|values| values.get(key))
    }
}
