// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Normalize the HTML of one paste event. `convert_single_image` turns on
/// the single image path.
#[wasm_bindgen(js_name = normalizePaste)]
pub fn normalize_paste(html: &str, convert_single_image: bool) -> NormalizedPaste {
    let data = paste_normalizer::ClipboardData::from_html(html);
    let options = paste_normalizer::PasteOptions::default()
        .with_single_image_conversion(convert_single_image);
    NormalizedPaste::from(paste_normalizer::normalize_paste(&data, &options))
}

#[wasm_bindgen]
pub struct NormalizedPaste {
    source: String,
    html: String,
    additional_allowed_tags: Vec<String>,
    drop_image_border_none: bool,
    bullets: usize,
    numbers: usize,
}

#[wasm_bindgen]
impl NormalizedPaste {
    #[wasm_bindgen(getter)]
    pub fn source(&self) -> String {
        self.source.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn html(&self) -> String {
        self.html.clone()
    }

    #[wasm_bindgen(getter, js_name = additionalAllowedTags)]
    pub fn additional_allowed_tags(&self) -> Box<[JsValue]> {
        self.additional_allowed_tags
            .iter()
            .map(|tag| JsValue::from_str(tag))
            .collect()
    }

    #[wasm_bindgen(getter, js_name = dropImageBorderNone)]
    pub fn drop_image_border_none(&self) -> bool {
        self.drop_image_border_none
    }

    #[wasm_bindgen(getter, js_name = bulletItems)]
    pub fn bullet_items(&self) -> usize {
        self.bullets
    }

    #[wasm_bindgen(getter, js_name = numberedItems)]
    pub fn numbered_items(&self) -> usize {
        self.numbers
    }
}

impl From<paste_normalizer::NormalizedPaste> for NormalizedPaste {
    fn from(inner: paste_normalizer::NormalizedPaste) -> Self {
        Self {
            source: inner.source.to_string(),
            html: inner.html(),
            additional_allowed_tags: inner.sanitizer.additional_allowed_tags,
            drop_image_border_none: inner.sanitizer.drop_image_border_none,
            bullets: inner.lists_converted.bullets,
            numbers: inner.lists_converted.numbers,
        }
    }
}
