// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Clean up HTML pasted from Office desktop apps and the web office
//! renderers before the composer sees it.
//!
//! [normalize_paste] parses the clipboard HTML, works out which application
//! produced it ([PasteSource]) and, for Word and Word Online, rebuilds real
//! `<ul>`/`<ol>` lists from the markup those applications use instead.

pub mod clipboard;
pub mod dom;
pub mod list_type;
pub mod options;
mod paste;
pub mod paste_source;
pub mod word_desktop;
pub mod word_online;

pub use crate::clipboard::ClipboardData;
pub use crate::clipboard::ExtractedHtml;
pub use crate::dom::parse_fragment;
pub use crate::dom::parse_fragment_lossy;
pub use crate::dom::FragmentDom;
pub use crate::dom::FragmentHandle;
pub use crate::dom::HtmlParseError;
pub use crate::dom::ToHtml;
pub use crate::list_type::ListType;
pub use crate::options::PasteOptions;
pub use crate::paste::normalize_paste;
pub use crate::paste::NormalizedPaste;
pub use crate::paste::SanitizerRequests;
pub use crate::paste_source::classify;
pub use crate::paste_source::ClassifierInput;
pub use crate::paste_source::PasteSource;
pub use crate::word_desktop::convert_pasted_content_from_word;
pub use crate::word_desktop::ListsConverted;
pub use crate::word_online::convert_pasted_content_from_word_online;
pub use crate::word_online::is_word_online_with_list;
