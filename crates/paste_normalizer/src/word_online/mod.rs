// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Rebuild real lists from the markup Word Online and OneNote Online put on
//! the clipboard.
//!
//! The online renderers emit every list item in its own wrapper:
//!
//! ```html
//! <div class="ListContainerWrapper">
//!   <ul class="BulletListStyle1">
//!     <li class="OutlineElement" data-aria-level="2" data-leveltext="o">B</li>
//!   </ul>
//! </div>
//! ```
//!
//! Consecutive wrappers are grouped into a [ListItemBlock], brought under a
//! single parent and replaced by one nested `<ul>`/`<ol>` tree built from
//! the `data-aria-level` of each item.

mod list_item_block;

use crate::dom::{FragmentDom, FragmentHandle};
use crate::list_type::{get_or_create_nested_list, ListType};
use crate::PasteOptions;
use list_item_block::{get_list_item_blocks, ListItemBlock};

pub const LIST_CONTAINER_WRAPPER: &str = "ListContainerWrapper";
pub const BULLET_LIST_STYLE: &str = "BulletListStyle";
pub const NUMBER_LIST_STYLE: &str = "NumberListStyle";
pub const OUTLINE_ELEMENT: &str = "OutlineElement";
pub const IMAGE_CONTAINER: &str = "WACImageContainer";

pub const TABLE_TEMP_ELEMENT_CLASSES: [&str; 6] = [
    "TableInsertRowGapBlank",
    "TableColumnResizeHandle",
    "TableCellTopBorderHandle",
    "TableCellLeftBorderHandle",
    "TableHoverColumnHandle",
    "TableHoverRowHandle",
];

const LEVEL_ATTRIBUTE: &str = "data-aria-level";
const POSITION_ATTRIBUTE: &str = "data-aria-posinset";
const LEVEL_TEXT_ATTRIBUTE: &str = "data-leveltext";

/// Marker glyphs that render the same in any font. Anything else in
/// `data-leveltext` is usually a private-use symbol-font character.
const REUSABLE_BULLET_GLYPHS: [&str; 18] = [
    "•", "◦", "▪", "▫", "■", "□", "●", "○", "◆", "◇", "➢", "➤", "✓", "✔", "–",
    "-", "*", ">",
];

/// Whether the fragment holds Online list wrappers or images worth running
/// [convert_pasted_content_from_word_online] for.
pub fn is_word_online_with_list(dom: &FragmentDom) -> bool {
    dom.any_descendant(dom.root(), |dom, handle| {
        if is_styled_list(dom, handle) {
            return dom
                .parent(handle)
                .and_then(|p| dom.element(p))
                .is_some_and(|p| {
                    p.tag() == "div" && p.has_class(LIST_CONTAINER_WRAPPER)
                });
        }
        dom.has_tag(handle, "img")
            && dom
                .parent(handle)
                .and_then(|p| dom.element(p))
                .is_some_and(|p| {
                    p.tag() == "span" && p.has_class(IMAGE_CONTAINER)
                })
    })
}

/// Rewrite every run of list container wrappers into a nested list and tidy
/// Online image containers. Returns the number of lists inserted.
pub fn convert_pasted_content_from_word_online(
    dom: &mut FragmentDom,
    options: &PasteOptions,
) -> usize {
    sanitize_list_item_containers(dom);

    let root = dom.root();
    let blocks = get_list_item_blocks(dom);
    let block_count = blocks.len();
    let mut lists = 0;
    for mut block in blocks {
        block.flatten(dom, root);
        lists += convert_list_if_needed(dom, &block, options.max_list_level);
    }

    remove_image_container_decorations(dom);
    tracing::debug!(blocks = block_count, lists, "rebuilt online lists");
    lists
}

/// Remove the resize and hover handles the Online table editor leaves in
/// copied tables. Returns how many were removed.
pub fn remove_table_temp_elements(dom: &mut FragmentDom) -> usize {
    let temp_elements = dom.find_descendants(dom.root(), |dom, handle| {
        dom.element(handle).is_some_and(|e| {
            TABLE_TEMP_ELEMENT_CLASSES.iter().any(|c| e.has_class(c))
        })
    });
    let mut removed = 0;
    for element in temp_elements {
        if dom.is_attached(element) {
            dom.detach(element);
            removed += 1;
        }
    }
    removed
}

fn is_styled_list(dom: &FragmentDom, handle: FragmentHandle) -> bool {
    dom.element(handle).is_some_and(|e| match e.tag() {
        "ul" => e.class_starts_with(BULLET_LIST_STYLE),
        "ol" => e.class_starts_with(NUMBER_LIST_STYLE),
        _ => false,
    })
}

/// Move anything that shares a wrapper with its styled list out into a
/// copy of the wrapper that no longer counts as one.
fn sanitize_list_item_containers(dom: &mut FragmentDom) {
    let lists = dom.find_descendants(dom.root(), |dom, handle| {
        is_styled_list(dom, handle)
            && dom
                .parent(handle)
                .and_then(|p| dom.element(p))
                .is_some_and(|p| p.has_class(LIST_CONTAINER_WRAPPER))
    });

    for list in lists {
        if dom.real_previous_sibling(list).is_some() {
            if let Some(before) = dom.split_parent_node(list, true) {
                if let Some(e) = dom.element_mut(before) {
                    e.remove_class(LIST_CONTAINER_WRAPPER);
                }
            }
        }
        if dom.real_next_sibling(list).is_some() {
            if let Some(after) = dom.split_parent_node(list, false) {
                if let Some(e) = dom.element_mut(after) {
                    e.remove_class(LIST_CONTAINER_WRAPPER);
                }
            }
        }
    }
}

/// The type of the list a wrapper holds, read from its first element.
fn container_list_type(
    dom: &FragmentDom,
    container: FragmentHandle,
) -> Option<ListType> {
    dom.children(container)
        .iter()
        .copied()
        .find(|c| dom.is_element(*c))
        .and_then(|first| ListType::of_node(dom, first))
}

fn item_level(
    dom: &FragmentDom,
    item: FragmentHandle,
    max_level: usize,
) -> usize {
    dom.element(item)
        .and_then(|e| e.get_attr(LEVEL_ATTRIBUTE))
        .and_then(|l| l.trim().parse::<usize>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(1)
        .min(max_level.max(1))
}

fn convert_list_if_needed(
    dom: &mut FragmentDom,
    block: &ListItemBlock,
    max_level: usize,
) -> usize {
    let mut inserted = 0;
    let mut converted: Option<(FragmentHandle, ListType)> = None;

    for &container in &block.list_item_containers {
        let Some(list_type) = container_list_type(dom, container) else {
            // No list to read items from: keep whatever it holds in place
            if let Some((list, _)) = converted.take() {
                dom.insert_before(container, list);
                inserted += 1;
            }
            dom.unwrap(container);
            continue;
        };

        let items =
            dom.find_descendants(container, |dom, h| dom.has_tag(h, "li"));
        for item in items {
            let level = item_level(dom, item, max_level);
            let list = match converted {
                Some((list, root_type)) if root_type != list_type && level == 1 => {
                    dom.insert_before(container, list);
                    inserted += 1;
                    let new_list = create_new_list(dom, container, list_type);
                    converted = Some((new_list, list_type));
                    new_list
                }
                Some((list, _)) => list,
                None => {
                    let new_list = create_new_list(dom, container, list_type);
                    converted = Some((new_list, list_type));
                    new_list
                }
            };

            if list_type == ListType::Unordered {
                reuse_marker_glyph(dom, item);
            }
            insert_list_item(dom, list, item, level, list_type);
        }
    }

    if let Some((list, _)) = converted {
        match block.insert_position_node {
            Some(position) if dom.is_attached(position) => {
                dom.insert_before(position, list)
            }
            _ => {
                if let Some(parent) = dom.parent(block.end_element) {
                    dom.append_child(parent, list);
                }
            }
        }
        inserted += 1;
    }

    for &container in &block.list_item_containers {
        dom.detach(container);
    }
    inserted
}

fn create_new_list(
    dom: &mut FragmentDom,
    container: FragmentHandle,
    list_type: ListType,
) -> FragmentHandle {
    let source = dom
        .children(container)
        .iter()
        .copied()
        .find(|c| dom.is_element(*c));
    let mut start = source
        .and_then(|s| dom.element(s))
        .and_then(|e| e.get_attr("start"))
        .map(str::to_owned);

    // A run that continues a list interrupted by another one only tells
    // where it resumes through the position of its first item.
    if start.is_none() && list_type == ListType::Ordered {
        start = source
            .and_then(|s| {
                dom.find_descendants(s, |dom, h| dom.has_tag(h, "li"))
                    .first()
                    .copied()
            })
            .and_then(|li| dom.element(li))
            .and_then(|e| e.get_attr(POSITION_ATTRIBUTE))
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 1)
            .map(|p| p.to_string());
    }

    let list = dom.create_element(list_type.tag());
    if let (Some(start), Some(e)) = (start, dom.element_mut(list)) {
        e.set_attr("start", &start);
    }
    list
}

fn reuse_marker_glyph(dom: &mut FragmentDom, item: FragmentHandle) {
    let Some(element) = dom.element_mut(item) else {
        return;
    };
    let Some(glyph) = element.get_attr(LEVEL_TEXT_ATTRIBUTE).map(str::trim)
    else {
        return;
    };
    if REUSABLE_BULLET_GLYPHS.contains(&glyph) {
        let style = format!("\"{glyph} \"");
        element.set_style("list-style-type", &style);
    }
}

/// Append `item` to `list`, `level - 1` lists deep.
fn insert_list_item(
    dom: &mut FragmentDom,
    list: FragmentHandle,
    item: FragmentHandle,
    level: usize,
    list_type: ListType,
) {
    let mut current = list;
    for _ in 1..level {
        current = get_or_create_nested_list(dom, current, list_type);
    }
    dom.append_child(current, item);
}

/// Online images come with a decorative sibling that renders as an empty
/// line under the picture.
fn remove_image_container_decorations(dom: &mut FragmentDom) {
    let containers = dom.find_descendants(dom.root(), |dom, handle| {
        dom.element(handle)
            .is_some_and(|e| e.has_class(IMAGE_CONTAINER))
    });
    for container in containers {
        let decorations: Vec<FragmentHandle> = dom
            .children(container)
            .iter()
            .copied()
            .filter(|c| {
                dom.is_element(*c)
                    && !dom.has_tag(*c, "img")
                    && !dom.any_descendant(*c, |dom, h| dom.has_tag(h, "img"))
            })
            .collect();
        for decoration in decorations {
            dom.detach(decoration);
        }
    }
}
