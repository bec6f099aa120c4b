// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Turn the paragraphs desktop Word exports for list items back into lists.
//!
//! Word never writes `<ul>` or `<ol>`. Each item is a `<p>` (or heading)
//! with an `mso-list` style naming its list and level, and the bullet is
//! literal text inside an `mso-list:Ignore` span. Conversion runs in two
//! passes over the paragraphs: discovery decides which list every item
//! belongs to, whether that list is bulleted or numbered and whether it can
//! be rebuilt safely at all; conversion then moves the items into real
//! lists.

mod converter_arguments;
mod fake_bullet;

use crate::dom::{CustomData, CustomValue, FragmentDom, FragmentHandle};
use crate::list_type::{is_list, last_nested_list, nested_list_slot, ListType};
use crate::options::PasteOptions;
use converter_arguments::{LevelLists, ListItemMetadata, ListMetadata};
use fake_bullet::{cleanup_list_ignore, get_fake_bullet_text};

const UNIQUE_LIST_ID_CUSTOM_DATA: &str = "UniqueListId";
const LIST_ITEM_TAGS: [&str; 7] = ["p", "h1", "h2", "h3", "h4", "h5", "h6"];
const HEADING_INDENT_STYLES: [&str; 3] =
    ["text-indent", "margin-left", "margin-right"];

/// How many Word paragraphs became list items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListsConverted {
    pub bullets: usize,
    pub numbers: usize,
}

impl ListsConverted {
    pub fn any(&self) -> bool {
        self.bullets != 0 || self.numbers != 0
    }
}

pub fn convert_pasted_content_from_word(
    dom: &mut FragmentDom,
    options: &PasteOptions,
) -> ListsConverted {
    let nodes = dom.find_descendants(dom.root(), |dom, handle| {
        dom.tag(handle).is_some_and(|t| LIST_ITEM_TAGS.contains(&t))
    });
    if nodes.is_empty() {
        return ListsConverted::default();
    }

    let mut converter = WordConverter::new(options);
    if converter.process_nodes_discovery(dom, &nodes) {
        converter.process_nodes_convert(dom);
    }
    tracing::debug!(
        bullets = converter.converted.bullets,
        numbers = converter.converted.numbers,
        "converted word lists"
    );
    converter.converted
}

/// State threaded through both passes of one conversion.
struct WordConverter {
    lookup_depth: usize,
    comment_lookahead: usize,
    max_list_level: usize,
    /// Every list seen, indexed by unique list id.
    lists: Vec<ListMetadata>,
    /// Index 0 is level 1. Deeper levels are dropped as soon as a shallower
    /// item ends them.
    levels: Vec<LevelLists>,
    list_items: Vec<ListItemMetadata>,
    last_processed_item: Option<FragmentHandle>,
    custom_data: CustomData,
    converted: ListsConverted,
}

impl WordConverter {
    fn new(options: &PasteOptions) -> Self {
        Self {
            lookup_depth: options.lookup_depth,
            comment_lookahead: options.comment_lookahead,
            max_list_level: options.max_list_level,
            lists: Vec::new(),
            levels: Vec::new(),
            list_items: Vec::new(),
            last_processed_item: None,
            custom_data: CustomData::new(),
            converted: ListsConverted::default(),
        }
    }

    /// Returns whether any item is left to convert.
    fn process_nodes_discovery(
        &mut self,
        dom: &mut FragmentDom,
        nodes: &[FragmentHandle],
    ) -> bool {
        for &node in nodes {
            if !dom.is_attached(node) {
                continue;
            }
            let item =
                ListItemMetadata::from_node(dom, node, self.max_list_level);
            match item {
                Some(item) => self.discover_list_item(dom, item),
                None => self.merge_continuation_paragraph(dom, node),
            }
        }
        !self.list_items.is_empty()
    }

    fn discover_list_item(
        &mut self,
        dom: &mut FragmentDom,
        mut item: ListItemMetadata,
    ) {
        let node = item.original_node;
        if let Some(last) = self.last_processed_item {
            if dom.real_previous_sibling(node) != Some(last) {
                // Something sits between this item and the previous one
                self.reset_current_lists();
            }
        }

        let level_index = item.level - 1;
        if self.levels.len() < item.level {
            self.levels.resize_with(item.level, LevelLists::default);
        }

        let known = self.levels[level_index]
            .lists_by_word_id
            .get(&item.word_list_id)
            .copied();
        let unique_list_id = match known {
            Some(id) => {
                let list = &self.lists[id];
                if !list.ignore && list.number_of_items == 1 {
                    let second = self.fake_bullet_text(dom, node);
                    self.lists[id].disambiguate(second.as_deref());
                }
                id
            }
            None => {
                let first = self.fake_bullet_text(dom, node);
                let id = self.lists.len();
                let list = ListMetadata::new(first);
                tracing::trace!(
                    id,
                    word_list_id = %item.word_list_id,
                    bullet = ?list.first_fake_bullet,
                    list_type = %list.list_type,
                    "discovered word list"
                );
                self.lists.push(list);
                self.levels[level_index]
                    .lists_by_word_id
                    .insert(item.word_list_id.clone(), id);
                id
            }
        };
        item.unique_list_id = unique_list_id;

        let current = self.levels[level_index].current_unique_list_id;
        let list = &mut self.lists[unique_list_id];
        let intruded = list.list_type == ListType::Ordered
            && list.number_of_items > 0
            && current != Some(unique_list_id);
        if list.ignore || intruded {
            // Numbering that was interrupted cannot be rebuilt without
            // getting it wrong
            if !list.ignore {
                tracing::trace!(id = unique_list_id, "ignoring word list");
            }
            list.mark_ignored();
            self.levels[0].current_unique_list_id = None;
            self.levels.truncate(1);
        } else {
            list.number_of_items += 1;
            self.levels.truncate(item.level);
            self.levels[level_index].current_unique_list_id =
                Some(unique_list_id);
            self.list_items.push(item);
        }
        self.last_processed_item = Some(node);
    }

    /// Forget which lists are active, keeping what is known about them.
    fn reset_current_lists(&mut self) {
        for level in &mut self.levels {
            level.current_unique_list_id = None;
        }
        self.levels.truncate(1);
    }

    /// A paragraph right after a list item, looking just like it but without
    /// `mso-list`, is the rest of that item after a line break.
    fn merge_continuation_paragraph(
        &mut self,
        dom: &mut FragmentDom,
        node: FragmentHandle,
    ) {
        let Some(last) = self.last_processed_item else {
            return;
        };
        if dom.real_previous_sibling(node) != Some(last) {
            return;
        }
        let (Some(current), Some(previous)) = (dom.element(node), dom.element(last))
        else {
            return;
        };
        if current.tag() != previous.tag()
            || current.get_attr("class") != previous.get_attr("class")
            || dom.children(node).is_empty()
        {
            return;
        }

        for _ in 0..2 {
            let br = dom.create_element("br");
            dom.append_child(last, br);
        }
        dom.move_children(node, last);
        dom.detach(node);
        tracing::trace!("merged continuation paragraph into list item");
    }

    fn process_nodes_convert(&mut self, dom: &mut FragmentDom) {
        let items = std::mem::take(&mut self.list_items);
        for item in &items {
            let list_metadata = &self.lists[item.unique_list_id];
            if list_metadata.ignore {
                continue;
            }
            let list_type = list_metadata.list_type;
            let node = item.original_node;
            if !dom.is_attached(node) {
                continue;
            }

            let list = self.get_or_create_list_for_node(dom, item, list_type);
            cleanup_list_ignore(
                dom,
                node,
                self.lookup_depth,
                self.comment_lookahead,
            );

            let li = dom.create_element("li");
            if dom.tag(node).is_some_and(|t| t.starts_with('h')) {
                let clone = dom.clone_deep(node);
                if let Some(heading) = dom.element_mut(clone) {
                    for style in HEADING_INDENT_STYLES {
                        heading.remove_style(style);
                    }
                }
                dom.append_child(li, clone);
            } else {
                dom.move_children(node, li);
            }
            dom.append_child(list, li);
            dom.detach(node);

            match list_type {
                ListType::Unordered => self.converted.bullets += 1,
                ListType::Ordered => self.converted.numbers += 1,
            }
        }
    }

    fn get_or_create_list_for_node(
        &mut self,
        dom: &mut FragmentDom,
        item: &ListItemMetadata,
        list_type: ListType,
    ) -> FragmentHandle {
        let node = item.original_node;
        let list = list_at_level(dom, node, item.level).unwrap_or_else(|| {
            create_list_at_level(dom, node, item.level, list_type)
        });

        // Adjacent lists of the same type must not be merged
        let unique_list_id = item.unique_list_id as i64;
        let list_id = self
            .custom_data
            .get(dom, list, UNIQUE_LIST_ID_CUSTOM_DATA)
            .and_then(CustomValue::as_number);
        let belongs_elsewhere = match list_id {
            Some(id) => id != unique_list_id,
            None => !dom.children(list).is_empty(),
        };
        let list = if belongs_elsewhere {
            let new_list = dom.create_element(list_type.tag());
            dom.insert_after(list, new_list);
            new_list
        } else {
            list
        };

        self.custom_data
            .set(dom, list, UNIQUE_LIST_ID_CUSTOM_DATA, unique_list_id);
        self.convert_list_if_needed(dom, list, list_type)
    }

    /// Lists created before the second item settled the type may have the
    /// wrong tag.
    fn convert_list_if_needed(
        &mut self,
        dom: &mut FragmentDom,
        list: FragmentHandle,
        list_type: ListType,
    ) -> FragmentHandle {
        if ListType::of_node(dom, list) == Some(list_type) {
            return list;
        }
        let new_list = dom.create_element(list_type.tag());
        dom.move_children(list, new_list);
        if let Some(id) = self
            .custom_data
            .get(dom, list, UNIQUE_LIST_ID_CUSTOM_DATA)
            .cloned()
        {
            self.custom_data
                .set(dom, new_list, UNIQUE_LIST_ID_CUSTOM_DATA, id);
        }
        dom.replace_node(list, new_list);
        new_list
    }

    fn fake_bullet_text(
        &self,
        dom: &mut FragmentDom,
        node: FragmentHandle,
    ) -> Option<String> {
        get_fake_bullet_text(dom, node, self.lookup_depth, self.comment_lookahead)
    }
}

/// The list an item at `level` would join: the list right before it for
/// level 1, otherwise the last sub-list of the list one level up.
fn list_at_level(
    dom: &FragmentDom,
    node: FragmentHandle,
    level: usize,
) -> Option<FragmentHandle> {
    if level <= 1 {
        dom.real_previous_sibling(node)
            .filter(|previous| is_list(dom, *previous))
    } else {
        list_at_level(dom, node, level - 1)
            .and_then(|parent| last_nested_list(dom, parent))
    }
}

fn create_list_at_level(
    dom: &mut FragmentDom,
    node: FragmentHandle,
    level: usize,
    list_type: ListType,
) -> FragmentHandle {
    let list = dom.create_element(list_type.tag());
    if level <= 1 {
        dom.insert_before(node, list);
    } else {
        let parent = list_at_level(dom, node, level - 1).unwrap_or_else(|| {
            create_list_at_level(dom, node, level - 1, list_type)
        });
        let slot = nested_list_slot(dom, parent);
        dom.append_child(slot, list);
    }
    list
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::parse_fragment_lossy;
    use crate::ToHtml;

    fn convert(html: &str) -> (String, ListsConverted) {
        let mut dom = parse_fragment_lossy(html);
        let converted =
            convert_pasted_content_from_word(&mut dom, &PasteOptions::default());
        (dom.to_html(), converted)
    }

    fn item(style: &str, bullet: &str, text: &str) -> String {
        format!(
            r#"<p class="MsoListParagraph" style="{style}"><span style="mso-list:Ignore">{bullet}<span>&nbsp;&nbsp;</span></span>{text}</p>"#
        )
    }

    #[test]
    fn a_single_bullet_item_becomes_a_list() {
        let (html, converted) = convert(
            r#"<p style="mso-list:l1 level1 lfo1"><span style="mso-list:Ignore">·<span>&nbsp;</span></span>Hello</p>"#,
        );
        assert_eq!(html, "<ul><li>Hello</li></ul>");
        assert_eq!(
            converted,
            ListsConverted {
                bullets: 1,
                numbers: 0
            }
        );
    }

    #[test]
    fn a_single_o_item_stays_bulleted() {
        let (html, _) = convert(&item("mso-list:l0 level1 lfo1", "o", "A"));
        assert_eq!(html, "<ul><li>A</li></ul>");
    }

    #[test]
    fn differing_bullets_make_a_numbered_list() {
        let html = [
            item("mso-list:l0 level1 lfo1", "1.", "One"),
            item("mso-list:l0 level1 lfo1", "2.", "Two"),
        ]
        .join("\n");
        let (html, converted) = convert(&html);
        assert_eq!(html, "<ol><li>One</li><li>Two</li></ol>\n");
        assert_eq!(converted.numbers, 2);
    }

    #[test]
    fn identical_bullets_make_a_bulleted_list() {
        let html = [
            item("mso-list:l0 level1 lfo1", "§", "One"),
            item("mso-list:l0 level1 lfo1", "§", "Two"),
        ]
        .concat();
        assert_eq!(convert(&html).0, "<ul><li>One</li><li>Two</li></ul>");
    }

    #[test]
    fn deeper_levels_nest_in_the_last_item() {
        let html = [
            item("mso-list:l0 level1 lfo1", "·", "A"),
            item("mso-list:l0 level2 lfo1", "o", "B"),
            item("mso-list:l0 level3 lfo1", "§", "C"),
            item("mso-list:l0 level1 lfo1", "·", "D"),
        ]
        .concat();
        assert_eq!(
            convert(&html).0,
            "<ul><li>A<ul><li>B<ul><li>C</li></ul></li></ul></li><li>D</li></ul>"
        );
    }

    #[test]
    fn interrupted_numbering_is_left_as_paragraphs() {
        let html = [
            item("mso-list:l0 level1 lfo1", "1.", "One"),
            String::from("<p>Unrelated</p>"),
            item("mso-list:l0 level1 lfo1", "2.", "Two"),
        ]
        .concat();
        let (output, converted) = convert(&html);
        assert!(!converted.any());
        assert_that(&output.as_str()).does_not_contain("<ol>");
        assert_that(&output.as_str()).contains("<p>Unrelated</p>");
    }

    #[test]
    fn interrupted_bullets_become_separate_lists() {
        let html = [
            item("mso-list:l0 level1 lfo1", "·", "One"),
            String::from("<p>Unrelated</p>"),
            item("mso-list:l0 level1 lfo1", "·", "Two"),
        ]
        .concat();
        assert_eq!(
            convert(&html).0,
            "<ul><li>One</li></ul><p>Unrelated</p><ul><li>Two</li></ul>"
        );
    }

    #[test]
    fn adjacent_lists_of_the_same_type_stay_apart() {
        let html = [
            item("mso-list:l0 level1 lfo1", "·", "A"),
            item("mso-list:l1 level1 lfo2", "-", "B"),
        ]
        .concat();
        assert_eq!(
            convert(&html).0,
            "<ul><li>A</li></ul><ul><li>B</li></ul>"
        );
    }

    #[test]
    fn items_without_a_bullet_are_left_alone() {
        let html = r#"<p style="mso-list:l0 level1 lfo1">No bullet</p>"#;
        let (output, converted) = convert(html);
        assert_eq!(output, html);
        assert!(!converted.any());
    }

    #[test]
    fn continuation_paragraphs_join_their_item() {
        let html = [
            item("mso-list:l0 level1 lfo1", "·", "First line"),
            String::from(r#"<p class="MsoListParagraph">second line</p>"#),
            item("mso-list:l0 level1 lfo1", "·", "Next"),
        ]
        .concat();
        assert_eq!(
            convert(&html).0,
            "<ul><li>First line<br><br>second line</li><li>Next</li></ul>"
        );
    }

    #[test]
    fn headings_are_kept_inside_the_item() {
        let html = indoc! {r#"
            <h1 style="margin-left:.25in;text-indent:-.25in;color:red;mso-list:l0 level1 lfo1"><span style="mso-list:Ignore">1.<span> </span></span>Title</h1>"#};
        assert_eq!(
            convert(html).0,
            r#"<ol><li><h1 style="color: red; mso-list: l0 level1 lfo1">Title</h1></li></ol>"#
        );
    }

    #[test]
    fn comment_encoded_bullets_are_converted() {
        let html = indoc! {r#"
            <p style="mso-list:l0 level1 lfo1"><!--[if !supportLists]--><span>1.<span> </span></span><!--[endif]-->One</p>
            <p style="mso-list:l0 level1 lfo1"><!--[if !supportLists]--><span>2.<span> </span></span><!--[endif]-->Two</p>"#};
        assert_eq!(convert(html).0, "<ol><li>One</li><li>Two</li></ol>\n");
    }

    #[test]
    fn paragraphs_that_are_not_lists_are_untouched() {
        let html = "<p>a</p><h2>b</h2>";
        assert_eq!(convert(html), (String::from(html), ListsConverted::default()));
    }

    #[test]
    fn a_list_with_the_wrong_tag_is_replaced() {
        let html = r#"<ol></ol><p style="mso-list:l0 level1 lfo1"><span style="mso-list:Ignore">·</span>A</p>"#;
        let (output, converted) = convert(html);
        assert_eq!(output, "<ul><li>A</li></ul>");
        assert_eq!(converted.bullets, 1);
    }

    #[test]
    fn absurd_levels_nest_no_deeper_than_the_limit() {
        let html = r#"<p style="mso-list:l0 level200000 lfo1"><span style="mso-list:Ignore">o</span>B</p>"#;
        let (output, _) = convert(html);
        assert_eq!(
            output.matches("<ul>").count(),
            PasteOptions::default().max_list_level
        );
        assert_that(&output.as_str()).contains("<li>B</li>");
    }
}
