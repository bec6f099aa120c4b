// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{FragmentDom, FragmentHandle};

use super::LIST_CONTAINER_WRAPPER;

/// A run of adjacent list container wrappers that becomes one list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListItemBlock {
    pub start_element: FragmentHandle,
    pub end_element: FragmentHandle,
    /// The rebuilt list goes right before this node. `None` means at the end
    /// of the run's parent.
    pub insert_position_node: Option<FragmentHandle>,
    pub list_item_containers: Vec<FragmentHandle>,
}

impl ListItemBlock {
    fn new(container: FragmentHandle) -> Self {
        Self {
            start_element: container,
            end_element: container,
            insert_position_node: None,
            list_item_containers: vec![container],
        }
    }

    fn push(&mut self, container: FragmentHandle) {
        self.list_item_containers.push(container);
        self.end_element = container;
    }

    /// `container` is either the next sibling of the last wrapper, or the
    /// first thing reached after it in document order once blank text and
    /// comments are skipped.
    fn is_continued_by(
        &self,
        dom: &FragmentDom,
        container: FragmentHandle,
    ) -> bool {
        let last = self.end_element;
        if dom.next_sibling(last) == Some(container) {
            return true;
        }
        match dom.next_meaningful_leaf(last, dom.root()) {
            Some(next) => dom.first_meaningful_leaf(container) == Some(next),
            None => false,
        }
    }

    fn finish(mut self, dom: &FragmentDom) -> Self {
        self.insert_position_node = dom.next_sibling(self.end_element);
        self
    }

    /// Bring every wrapper of the run under one parent, splitting the
    /// ancestors in between and unwrapping the plain `<div>` layers that held
    /// them.
    pub fn flatten(&mut self, dom: &mut FragmentDom, root: FragmentHandle) {
        let sections =
            dom.collapse_nodes(root, self.start_element, self.end_element);
        for section in sections {
            let Some(element) = dom.element(section) else {
                continue;
            };
            if element.has_class(LIST_CONTAINER_WRAPPER) {
                continue;
            }
            let first = dom
                .children(section)
                .iter()
                .copied()
                .find(|c| !dom.is_whitespace_text(*c));
            if first.is_some_and(|f| dom.has_tag(f, "div")) {
                dom.unwrap(section);
            }
        }
        self.insert_position_node = dom.next_sibling(self.end_element);
    }
}

/// Group every list container wrapper of the fragment into runs, in
/// document order.
pub(crate) fn get_list_item_blocks(dom: &FragmentDom) -> Vec<ListItemBlock> {
    let containers = dom.find_descendants(dom.root(), |d, h| {
        d.element(h)
            .is_some_and(|e| e.has_class(LIST_CONTAINER_WRAPPER))
    });

    let mut blocks = Vec::new();
    let mut current: Option<ListItemBlock> = None;
    for container in containers {
        // Wrappers nested in a wrapper of the run move along with it
        if let Some(block) = &current {
            if block
                .list_item_containers
                .iter()
                .any(|c| dom.contains(*c, container))
            {
                continue;
            }
        }
        current = match current.take() {
            None => Some(ListItemBlock::new(container)),
            Some(mut block) if block.is_continued_by(dom, container) => {
                block.push(container);
                Some(block)
            }
            Some(block) => {
                blocks.push(block.finish(dom));
                Some(ListItemBlock::new(container))
            }
        };
    }
    if let Some(block) = current {
        blocks.push(block.finish(dom));
    }
    blocks
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::dom::parse_fragment_lossy;
    use crate::ToHtml;

    fn wrapper(text: &str) -> String {
        format!(
            r#"<div class="ListContainerWrapper"><ul class="BulletListStyle1"><li data-aria-level="1">{text}</li></ul></div>"#
        )
    }

    #[test]
    fn adjacent_wrappers_form_one_block() {
        let html = format!("{}{}{}", wrapper("A"), wrapper("B"), wrapper("C"));
        let dom = parse_fragment_lossy(&html);
        let blocks = get_list_item_blocks(&dom);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].list_item_containers.len(), 3);
        assert_eq!(blocks[0].insert_position_node, None);
    }

    #[test]
    fn whitespace_between_wrappers_does_not_split_the_block() {
        let html = format!("{}\n  {}", wrapper("A"), wrapper("B"));
        let dom = parse_fragment_lossy(&html);
        let blocks = get_list_item_blocks(&dom);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].list_item_containers.len(), 2);
    }

    #[test]
    fn content_between_wrappers_starts_a_new_block() {
        let html = format!("{}<p>gap</p>{}", wrapper("A"), wrapper("B"));
        let dom = parse_fragment_lossy(&html);
        let blocks = get_list_item_blocks(&dom);
        assert_eq!(blocks.len(), 2);
        let gap = dom.children(dom.root())[1];
        assert_eq!(blocks[0].insert_position_node, Some(gap));
    }

    #[test]
    fn wrappers_inside_a_wrapper_stay_with_it() {
        let html = format!(
            r#"<div class="ListContainerWrapper"><ul class="BulletListStyle1"><li>A</li></ul>{}</div>{}"#,
            wrapper("B"),
            wrapper("C"),
        );
        let dom = parse_fragment_lossy(&html);
        let root_children = dom.children(dom.root()).to_vec();
        let blocks = get_list_item_blocks(&dom);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].list_item_containers, root_children);
    }

    #[test]
    fn flatten_unwraps_outline_divs_around_the_run() {
        let html = indoc! {r#"
            <div class="OutlineElement">
            <div class="ListContainerWrapper"><ul class="BulletListStyle1"><li>A</li></ul></div>
            </div><div class="ListContainerWrapper"><ul class="BulletListStyle1"><li>B</li></ul></div>"#};
        let mut dom = parse_fragment_lossy(html);
        let root = dom.root();
        let mut blocks = get_list_item_blocks(&dom);
        assert_eq!(blocks.len(), 1);

        blocks[0].flatten(&mut dom, root);

        let block = &blocks[0];
        let parents: Vec<_> = block
            .list_item_containers
            .iter()
            .map(|c| dom.parent(*c))
            .collect();
        assert_eq!(parents[0], parents[1]);
        assert!(!dom.to_html().contains("OutlineElement"));
    }
}
