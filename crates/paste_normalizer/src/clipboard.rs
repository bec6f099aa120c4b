// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! What the host read from the clipboard, and the metadata the classifier
//! derives from the raw HTML payload.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::FragmentDom;

const START_FRAGMENT: &str = "<!--StartFragment-->";
const END_FRAGMENT: &str = "<!--EndFragment-->";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<html\b([^>]*)>").expect("valid html tag regex")
});
static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\b([^>]*)>").expect("valid meta regex"));
static BODY_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body\b[^>]*>").expect("valid body regex"));
static BODY_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body regex"));
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
    )
    .expect("valid attribute regex")
});

/// One paste event as the host saw it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    /// The raw `text/html` payload, possibly a whole CF_HTML document.
    pub raw_html: Option<String>,
    pub text: Option<String>,
    pub has_image: bool,
    /// Upper-cased tag names of the top-level elements of the pasted HTML.
    /// Left empty, they are computed from the parsed fragment.
    pub html_first_level_child_tags: Vec<String>,
}

impl ClipboardData {
    pub fn from_html(html: &str) -> Self {
        Self {
            raw_html: Some(html.to_owned()),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    pub fn with_image(mut self) -> Self {
        self.has_image = true;
        self
    }

    pub fn has_html(&self) -> bool {
        self.raw_html.is_some()
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_html_and_image(&self) -> bool {
        self.has_html() && self.has_image
    }
}

/// The parts of the raw payload the paste pipeline works with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedHtml {
    /// Attributes of the outer `<html>` tag plus `<meta name content>` pairs.
    pub html_attributes: HashMap<String, String>,
    /// The HTML to parse, with `<meta>` tags removed.
    pub fragment_html: String,
}

impl ExtractedHtml {
    pub fn extract(raw_html: &str) -> Self {
        let mut html_attributes = HashMap::new();
        if let Some(captures) = HTML_TAG.captures(raw_html) {
            if let Some(attrs) = captures.get(1) {
                html_attributes.extend(parse_attributes(attrs.as_str()));
            }
        }
        for captures in META_TAG.captures_iter(raw_html) {
            let Some(attrs) = captures.get(1) else {
                continue;
            };
            let attrs: HashMap<String, String> =
                parse_attributes(attrs.as_str()).collect();
            if let (Some(name), Some(content)) =
                (attrs.get("name"), attrs.get("content"))
            {
                html_attributes.insert(name.clone(), content.clone());
            }
        }

        // Remove meta tags from the HTML which caused errors in html5ever
        let fragment_html = META_TAG
            .replace_all(fragment_body(raw_html), "")
            .into_owned();

        Self {
            html_attributes,
            fragment_html,
        }
    }
}

fn parse_attributes(source: &str) -> impl Iterator<Item = (String, String)> + '_ {
    ATTRIBUTE.captures_iter(source).filter_map(|c| {
        let name = c.get(1)?.as_str().to_owned();
        let value = c
            .get(2)
            .or_else(|| c.get(3))
            .or_else(|| c.get(4))
            .map(|v| v.as_str().to_owned())
            .unwrap_or_default();
        Some((name, value))
    })
}

/// Text between the fragment markers when both exist, otherwise the content
/// of `<body>`, otherwise the whole payload.
fn fragment_body(raw_html: &str) -> &str {
    if let Some(start) = raw_html.find(START_FRAGMENT) {
        let from = start + START_FRAGMENT.len();
        if let Some(len) = raw_html[from..].find(END_FRAGMENT) {
            return &raw_html[from..from + len];
        }
    }
    if let Some(body) = BODY_START.find(raw_html) {
        let rest = &raw_html[body.end()..];
        return match BODY_END.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        };
    }
    raw_html
}

/// Upper-cased tag names of the top-level elements of a parsed fragment.
pub fn first_level_child_tags(dom: &FragmentDom) -> Vec<String> {
    dom.children(dom.root())
        .iter()
        .filter_map(|c| dom.tag(*c))
        .map(|t| t.to_ascii_uppercase())
        .collect()
}
