// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use crate::clipboard::{first_level_child_tags, ClipboardData, ExtractedHtml};
use crate::dom::{parse_fragment_lossy, FragmentDom, ToHtml};
use crate::options::PasteOptions;
use crate::paste_source::{
    classify, ClassifierInput, PasteSource, GOOGLE_SHEET_NODE_NAME,
};
use crate::word_desktop::{convert_pasted_content_from_word, ListsConverted};
use crate::word_online::{
    convert_pasted_content_from_word_online, is_word_online_with_list,
    remove_table_temp_elements,
};

/// Exceptions the host's sanitizer has to make for this paste.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizerRequests {
    /// Tags to let through even though they are not HTML.
    pub additional_allowed_tags: Vec<String>,
    /// Drop `border: none` from the inline style of images.
    pub drop_image_border_none: bool,
}

impl SanitizerRequests {
    /// The CSS callback for `<img>` styles: whether `property: value` may
    /// stay.
    pub fn keep_image_style(&self, property: &str, value: &str) -> bool {
        !(self.drop_image_border_none
            && property.trim().eq_ignore_ascii_case("border")
            && value.trim().eq_ignore_ascii_case("none"))
    }
}

/// One paste event after normalization.
#[derive(Clone, Debug)]
pub struct NormalizedPaste {
    pub source: PasteSource,
    /// The parsed content, rewritten in place for the detected source.
    pub fragment: FragmentDom,
    pub html_attributes: HashMap<String, String>,
    pub sanitizer: SanitizerRequests,
    pub lists_converted: ListsConverted,
}

impl NormalizedPaste {
    pub fn html(&self) -> String {
        self.fragment.to_html()
    }
}

/// Parse the HTML on the clipboard, work out where it came from and rewrite
/// the markup that application is known for.
pub fn normalize_paste(
    data: &ClipboardData,
    options: &PasteOptions,
) -> NormalizedPaste {
    let extracted =
        ExtractedHtml::extract(data.raw_html.as_deref().unwrap_or_default());
    let mut fragment = parse_fragment_lossy(&extracted.fragment_html);

    let computed_tags;
    let html_first_level_child_tags =
        if data.html_first_level_child_tags.is_empty() {
            computed_tags = first_level_child_tags(&fragment);
            &computed_tags
        } else {
            &data.html_first_level_child_tags
        };

    let source = classify(&ClassifierInput {
        html_attributes: &extracted.html_attributes,
        dom: &fragment,
        convert_single_image: options.convert_single_image,
        html_first_level_child_tags,
    });

    let mut sanitizer = SanitizerRequests::default();
    let mut lists_converted = ListsConverted::default();
    match source {
        PasteSource::WordDesktop => {
            lists_converted =
                convert_pasted_content_from_word(&mut fragment, options);
        }
        PasteSource::WebAppComponents => {
            let removed = remove_table_temp_elements(&mut fragment);
            if removed > 0 {
                tracing::debug!(removed, "removed online table handles");
            }
            if is_word_online_with_list(&fragment) {
                convert_pasted_content_from_word_online(
                    &mut fragment,
                    options,
                );
            }
        }
        PasteSource::SpreadsheetWeb => {
            sanitizer
                .additional_allowed_tags
                .push(String::from(GOOGLE_SHEET_NODE_NAME));
        }
        PasteSource::SingleImage => {
            sanitizer.drop_image_border_none = true;
        }
        PasteSource::ExcelDesktop
        | PasteSource::ExcelOnline
        | PasteSource::PowerPointDesktop
        | PasteSource::Default => {}
    }

    NormalizedPaste {
        source,
        fragment,
        html_attributes: extracted.html_attributes,
        sanitizer,
        lists_converted,
    }
}
