// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Work out which application produced a pasted fragment.

use std::collections::HashMap;

use strum_macros::{AsRefStr, Display, EnumIter};

use crate::dom::{FragmentDom, FragmentHandle};
use crate::word_online::{
    BULLET_LIST_STYLE, IMAGE_CONTAINER, NUMBER_LIST_STYLE, OUTLINE_ELEMENT,
    TABLE_TEMP_ELEMENT_CLASSES,
};

pub const WORD_ATTRIBUTE_NAME: &str = "xmlns:w";
pub const WORD_ATTRIBUTE_VALUE: &str = "urn:schemas-microsoft-com:office:word";
pub const WORD_PROG_ID: &str = "Word.Document";
pub const EXCEL_ATTRIBUTE_NAME: &str = "xmlns:x";
pub const EXCEL_ATTRIBUTE_VALUE: &str = "urn:schemas-microsoft-com:office:excel";
pub const EXCEL_ONLINE_PROG_ID: &str = "Excel.Sheet";
pub const POWERPOINT_PROG_ID: &str = "PowerPoint.Slide";
pub const PROG_ID_NAME: &str = "ProgId";
pub const GOOGLE_SHEET_NODE_NAME: &str = "google-sheets-html-origin";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter,
)]
pub enum PasteSource {
    WordDesktop,
    ExcelDesktop,
    ExcelOnline,
    PowerPointDesktop,
    WebAppComponents,
    SpreadsheetWeb,
    SingleImage,
    Default,
}

/// Everything the detectors look at. Nothing here is mutated.
#[derive(Clone, Copy, Debug)]
pub struct ClassifierInput<'a> {
    /// Attributes of the outer `<html>` tag and `<meta>` name/content pairs.
    pub html_attributes: &'a HashMap<String, String>,
    pub dom: &'a FragmentDom,
    pub convert_single_image: bool,
    /// Upper-cased tag names of the top-level elements of the fragment.
    pub html_first_level_child_tags: &'a [String],
}

impl ClassifierInput<'_> {
    /// Attribute names are matched ignoring case, values exactly.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.html_attributes
            .iter()
            .find(|(k, _v)| k.eq_ignore_ascii_case(name))
            .map(|(_k, v)| v.as_str())
    }

    fn attribute_is(&self, name: &str, value: &str) -> bool {
        self.attribute(name) == Some(value)
    }
}

type Detector = fn(&ClassifierInput) -> bool;

/// Evaluated in order; the first detector that matches wins.
const DETECTORS: [(PasteSource, Detector); 7] = [
    (PasteSource::WordDesktop, is_word_desktop),
    (PasteSource::ExcelDesktop, is_excel_desktop),
    (PasteSource::ExcelOnline, is_excel_online),
    (PasteSource::PowerPointDesktop, is_powerpoint_desktop),
    (PasteSource::WebAppComponents, is_web_app_components),
    (PasteSource::SpreadsheetWeb, is_spreadsheet_web),
    (PasteSource::SingleImage, is_single_image),
];

pub fn classify(input: &ClassifierInput) -> PasteSource {
    let source = DETECTORS
        .iter()
        .find(|(_source, detect)| detect(input))
        .map(|(source, _detect)| *source)
        .unwrap_or(PasteSource::Default);
    tracing::debug!(%source, "classified pasted content");
    source
}

fn is_word_desktop(input: &ClassifierInput) -> bool {
    input.attribute_is(WORD_ATTRIBUTE_NAME, WORD_ATTRIBUTE_VALUE)
        || input.attribute_is(PROG_ID_NAME, WORD_PROG_ID)
}

fn is_excel_desktop(input: &ClassifierInput) -> bool {
    input.attribute_is(EXCEL_ATTRIBUTE_NAME, EXCEL_ATTRIBUTE_VALUE)
}

/// Excel Online only announces itself through the program id; a payload that
/// also declares the Excel namespace came from the desktop app.
fn is_excel_online(input: &ClassifierInput) -> bool {
    input.attribute_is(PROG_ID_NAME, EXCEL_ONLINE_PROG_ID)
        && input.attribute(EXCEL_ATTRIBUTE_NAME) != Some(EXCEL_ATTRIBUTE_VALUE)
}

fn is_powerpoint_desktop(input: &ClassifierInput) -> bool {
    input.attribute_is(PROG_ID_NAME, POWERPOINT_PROG_ID)
}

fn is_web_app_components(input: &ClassifierInput) -> bool {
    input
        .dom
        .any_descendant(input.dom.root(), is_web_app_component_node)
}

fn is_web_app_component_node(dom: &FragmentDom, handle: FragmentHandle) -> bool {
    let Some(element) = dom.element(handle) else {
        return false;
    };
    if element.has_class(IMAGE_CONTAINER) && element.tag() == "span" {
        return true;
    }
    if TABLE_TEMP_ELEMENT_CLASSES
        .iter()
        .any(|class| element.has_class(class))
    {
        return true;
    }
    element.has_class(OUTLINE_ELEMENT)
        && dom
            .parent(handle)
            .and_then(|p| dom.element(p))
            .is_some_and(|list| match list.tag() {
                "ul" => list.class_starts_with(BULLET_LIST_STYLE),
                "ol" => list.class_starts_with(NUMBER_LIST_STYLE),
                _ => false,
            })
}

fn is_spreadsheet_web(input: &ClassifierInput) -> bool {
    input.dom.any_descendant(input.dom.root(), |dom, h| {
        dom.has_tag(h, GOOGLE_SHEET_NODE_NAME)
    })
}

fn is_single_image(input: &ClassifierInput) -> bool {
    input.convert_single_image
        && matches!(
            input.html_first_level_child_tags,
            [only] if only.eq_ignore_ascii_case("IMG")
        )
}
