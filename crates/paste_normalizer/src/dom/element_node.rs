// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;

use super::fragment_dom::html_qual_name;

#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
}

impl ElementNode {
    pub fn new(tag: &str) -> Self {
        Self {
            name: html_qual_name(&tag.to_ascii_lowercase()),
            attrs: Vec::new(),
        }
    }

    pub(crate) fn from_parts(name: QualName, attrs: Vec<(String, String)>) -> Self {
        Self { name, attrs }
    }

    pub fn name(&self) -> &QualName {
        &self.name
    }

    pub fn tag(&self) -> &str {
        self.name.local.as_ref()
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _v)| n == name) {
            Some((_n, v)) => *v = value.to_owned(),
            None => self.attrs.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _v)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class))
    }

    /// Matches the `[class^="prefix"]` attribute selector: the raw class
    /// attribute starts with `prefix`.
    pub fn class_starts_with(&self, prefix: &str) -> bool {
        self.get_attr("class").is_some_and(|c| c.starts_with(prefix))
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(current) = self.get_attr("class") {
            let remaining: Vec<&str> =
                current.split_whitespace().filter(|t| *t != class).collect();
            if remaining.is_empty() {
                self.remove_attr("class");
            } else {
                self.set_attr("class", &remaining.join(" "));
            }
        }
    }

    /// The `property: value` pairs of the inline style, in source order.
    /// Property names are lower-cased, values trimmed.
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        self.get_attr("style")
            .map(|style| {
                style
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(k, v)| {
                        (k.trim().to_ascii_lowercase(), v.trim().to_owned())
                    })
                    .filter(|(k, _v)| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn style_value(&self, property: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(k, _v)| k.eq_ignore_ascii_case(property))
            .map(|(_k, v)| v)
    }

    pub fn contains_style(&self, name: &str, value: &str) -> bool {
        self.style_value(name)
            .is_some_and(|v| v.eq_ignore_ascii_case(value))
    }

    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut declarations = self.style_declarations();
        match declarations
            .iter_mut()
            .find(|(k, _v)| k.eq_ignore_ascii_case(property))
        {
            Some((_k, v)) => *v = value.to_owned(),
            None => declarations
                .push((property.to_ascii_lowercase(), value.to_owned())),
        }
        self.write_style(declarations);
    }

    pub fn remove_style(&mut self, property: &str) {
        if self.get_attr("style").is_none() {
            return;
        }
        let mut declarations = self.style_declarations();
        declarations.retain(|(k, _v)| !k.eq_ignore_ascii_case(property));
        self.write_style(declarations);
    }

    fn write_style(&mut self, declarations: Vec<(String, String)>) {
        if declarations.is_empty() {
            self.remove_attr("style");
        } else {
            let style = declarations
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_attr("style", &style);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn element(attrs: &[(&str, &str)]) -> ElementNode {
        let mut node = ElementNode::new("DIV");
        for (k, v) in attrs {
            node.set_attr(k, v);
        }
        node
    }

    #[test]
    fn new_lower_cases_the_tag() {
        assert_eq!(ElementNode::new("UL").tag(), "ul");
    }

    #[test]
    fn test_contains_style() {
        let node = element(&[("style", "font-weight:bold;")]);
        assert!(node.contains_style("font-weight", "bold"));
        assert!(!node.contains_style("font-weight", "normal"));
    }

    #[test]
    fn style_value_reads_word_list_properties() {
        let node = element(&[(
            "style",
            "margin-left:.5in;text-indent:-.25in;\nmso-list:l0 level1 lfo1",
        )]);
        assert_eq!(
            node.style_value("mso-list").as_deref(),
            Some("l0 level1 lfo1")
        );
        assert_eq!(node.style_value("color"), None);
    }

    #[test]
    fn remove_style_drops_the_attribute_when_empty() {
        let mut node = element(&[("style", "margin-left: 1in")]);
        node.remove_style("margin-left");
        assert_eq!(node.get_attr("style"), None);
    }

    #[test]
    fn set_style_replaces_or_appends() {
        let mut node = element(&[("style", "color:red")]);
        node.set_style("list-style-type", "\"o \"");
        node.set_style("COLOR", "blue");
        assert_eq!(
            node.get_attr("style"),
            Some("color: blue; list-style-type: \"o \"")
        );
    }

    #[test]
    fn class_helpers_work_on_tokens() {
        let mut node =
            element(&[("class", "BulletListStyle1 ListContainerWrapper x")]);
        assert!(node.has_class("ListContainerWrapper"));
        assert!(!node.has_class("ListContainer"));
        assert!(node.class_starts_with("BulletListStyle"));
        node.remove_class("ListContainerWrapper");
        assert_eq!(node.get_attr("class"), Some("BulletListStyle1 x"));
    }
}
