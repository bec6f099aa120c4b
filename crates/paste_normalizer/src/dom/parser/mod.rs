// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Parse pasted HTML into a [FragmentDom] with html5ever.

mod fragment_creator;

use crate::dom::fragment_dom::FragmentDom;
use fragment_creator::FragmentCreator;

/// html5ever reported problems with the input.
///
/// HTML produced by Office is rarely valid, so the tree html5ever recovered is
/// kept alongside the messages and can be used regardless.
#[derive(Clone, Debug, thiserror::Error)]
#[error("failed to parse pasted html: {}", .parse_errors.join("; "))]
pub struct HtmlParseError {
    pub(crate) dom: FragmentDom,
    pub parse_errors: Vec<String>,
}

impl HtmlParseError {
    /// The tree html5ever recovered despite the errors.
    pub fn into_dom(self) -> FragmentDom {
        self.dom
    }
}

/// Parse an HTML fragment, as if it were the content of a `<body>`.
pub fn parse_fragment(html: &str) -> Result<FragmentDom, HtmlParseError> {
    FragmentCreator::parse(html)
}

/// Parse an HTML fragment, keeping whatever html5ever recovered from
/// invalid markup.
pub fn parse_fragment_lossy(html: &str) -> FragmentDom {
    match parse_fragment(html) {
        Ok(dom) => dom,
        Err(err) => {
            tracing::debug!(
                errors = err.parse_errors.len(),
                first = ?err.parse_errors.first(),
                "recovered from html parse errors"
            );
            err.into_dom()
        }
    }
}
