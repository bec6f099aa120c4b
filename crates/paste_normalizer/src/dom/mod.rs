// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod custom_data;
pub mod element_node;
pub mod fragment_dom;
pub mod parser;
pub mod to_html;

pub use custom_data::{CustomData, CustomValue};
pub use element_node::ElementNode;
pub use fragment_dom::{
    html_qual_name, CommentNode, FragmentDom, FragmentHandle, FragmentNode,
    TextNode,
};
pub use parser::{parse_fragment, parse_fragment_lossy, HtmlParseError};
pub use to_html::ToHtml;
