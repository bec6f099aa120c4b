// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Knobs for one call to [crate::normalize_paste].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasteOptions {
    /// Treat a payload made of a single `<img>` as an image paste.
    pub convert_single_image: bool,
    /// How many element levels below a Word paragraph are searched for the
    /// fake bullet and for the nodes that only exist to render it.
    pub lookup_depth: usize,
    /// How many siblings after `[if !supportLists]` may hold the closing
    /// `[endif]` comment.
    pub comment_lookahead: usize,
    /// Deepest list nesting rebuilt from Word or Online markup. Deeper items
    /// are placed at this level.
    pub max_list_level: usize,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            convert_single_image: false,
            lookup_depth: 5,
            comment_lookahead: 4,
            max_list_level: 9,
        }
    }
}

impl PasteOptions {
    pub fn with_single_image_conversion(mut self, enabled: bool) -> Self {
        self.convert_single_image = enabled;
        self
    }
}
