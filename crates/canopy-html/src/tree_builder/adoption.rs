//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs an end tag for a formatting element that is not the current node,
//! e.g. `<a>1<div>2</a>3</div>`, by splitting the formatting element around
//! the block that interrupts it.

use canopy_dom::NodeId;

use super::formatting::FormattingEntry;
use super::open_elements::{ElementCategory, ScopeKind};
use super::TreeBuilder;
use crate::tokenizer::Attribute;

/// Result of running the adoption agency algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdoptionOutcome {
    /// The end tag has been handled.
    Handled,
    /// "act as described in the "any other end tag" entry"
    AnyOtherEndTag,
}

impl TreeBuilder {
    /// Run the adoption agency algorithm for the end tag `subject`.
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) -> AdoptionOutcome {
        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.open_elements.current()
            && self.open_elements.current_tag() == Some(subject)
            && !self.active_formatting.contains(current)
        {
            let _ = self.open_elements.pop();
            return AdoptionOutcome::Handled;
        }

        // STEP 3-4: "Let outer loop counter be 0. Outer loop: If outer loop
        // counter is greater than or equal to 8, then return."
        for _ in 0..8 {
            // STEP 4.3: "Let formatting element be the last element in the list
            // of active formatting elements that: is between the end of the list
            // and the last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject. If there is no such
            // element, then return and instead act as described in the "any
            // other end tag" entry above."
            let Some((_, formatting_element)) = self.active_formatting.find_after_last_marker(subject)
            else {
                return AdoptionOutcome::AnyOtherEndTag;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            // elements, then this is a parse error; remove the element from the
            // list, and return."
            let Some(formatting_index) = self.open_elements.position(formatting_element) else {
                self.parse_error(&format!("</{subject}> for a formatting element that was closed"));
                self.active_formatting.remove(formatting_element);
                return AdoptionOutcome::Handled;
            };

            // STEP 4.5: "If formatting element is in the stack of open elements,
            // but the element is not in scope, then this is a parse error;
            // return."
            if !self
                .open_elements
                .has_node_in_scope(formatting_element, ScopeKind::Default)
            {
                self.parse_error(&format!("</{subject}> out of scope"));
                return AdoptionOutcome::Handled;
            }

            // STEP 4.6: "If formatting element is not the current node, this is
            // a parse error. (But do not return.)"
            if self.open_elements.current() != Some(formatting_element) {
                self.parse_error(&format!("mis-nested </{subject}>"));
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            // open elements that is lower in the stack than formatting element,
            // and is an element in the special category. There might not be
            // one."
            let furthest_block_index = self.open_elements.entries()[formatting_index + 1..]
                .iter()
                .position(|e| e.category == ElementCategory::Special)
                .map(|offset| formatting_index + 1 + offset);

            // STEP 4.8: "If there is no furthest block, then the UA must first
            // pop all the nodes from the bottom of the stack of open elements,
            // from the current node up to and including formatting element, then
            // remove formatting element from the list of active formatting
            // elements, and finally return."
            let Some(furthest_block_index) = furthest_block_index else {
                self.open_elements.truncate(formatting_index);
                self.active_formatting.remove(formatting_element);
                return AdoptionOutcome::Handled;
            };
            let Some(furthest_block) = self.open_elements.get(furthest_block_index) else {
                return AdoptionOutcome::Handled;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            // formatting element in the stack of open elements."
            let common_ancestor = formatting_index
                .checked_sub(1)
                .and_then(|i| self.open_elements.get(i))
                .unwrap_or(NodeId::ROOT);

            // STEP 4.10: "Let a bookmark note the position of formatting element
            // in the list of active formatting elements relative to the elements
            // on either side of it in the list."
            let mut bookmark = self
                .active_formatting
                .position(formatting_element)
                .unwrap_or(0);

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_block_index;
            let mut last_node = furthest_block;

            // STEP 4.13: "Inner loop"
            let mut inner_loop_counter = 0;
            loop {
                // STEP 4.13.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node in
                // the stack of open elements, or if node is no longer in the stack
                // of open elements (e.g. because it got removed by this
                // algorithm), the element that was immediately above node in the
                // stack of open elements before node was removed."
                node_index -= 1;
                let Some(mut node) = self.open_elements.get(node_index) else {
                    break;
                };

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and node
                // is in the list of active formatting elements, then remove node
                // from the list of active formatting elements."
                if inner_loop_counter > 3
                    && let Some(position) = self.active_formatting.position(node)
                {
                    self.active_formatting.remove(node);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                // elements, then remove node from the stack of open elements and
                // continue."
                let Some(entry_index) = self.active_formatting.position(node) else {
                    self.open_elements.remove(node);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                // element node was created, in the HTML namespace, with common
                // ancestor as the intended parent; replace the entry for node in
                // the list of active formatting elements with an entry for the new
                // element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be the
                // new element."
                let Some(FormattingEntry::Element { tag, attrs, .. }) =
                    self.active_formatting.get(entry_index).cloned()
                else {
                    break;
                };
                let attributes: Vec<Attribute> =
                    attrs.iter().map(|(n, v)| Attribute::new(n, v)).collect();
                let replacement = self.create_element_for_token(&tag, &attributes, common_ancestor);
                self.active_formatting.replace_at(
                    entry_index,
                    FormattingEntry::Element {
                        node: replacement,
                        tag: tag.clone(),
                        attrs,
                    },
                );
                self.open_elements.replace(node, replacement, &tag);
                node = replacement;

                // STEP 4.13.7: "If last node is furthest block, then move the
                // aforementioned bookmark to be immediately after the new node in
                // the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = entry_index + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.tree.append_child(node, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            // previous step at the appropriate place for inserting a node, but
            // using common ancestor as the override target."
            let point = self.appropriate_insertion_place(Some(common_ancestor));
            self.insert_at(point, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            // element was created, in the HTML namespace, with furthest block as
            // the intended parent."
            let Some(formatting_position) = self.active_formatting.position(formatting_element)
            else {
                return AdoptionOutcome::Handled;
            };
            let Some(FormattingEntry::Element { tag, attrs, .. }) =
                self.active_formatting.get(formatting_position).cloned()
            else {
                return AdoptionOutcome::Handled;
            };
            let attributes: Vec<Attribute> =
                attrs.iter().map(|(n, v)| Attribute::new(n, v)).collect();
            let new_element = self.create_element_for_token(&tag, &attributes, furthest_block);

            // STEP 4.16: "Take all of the child nodes of furthest block and
            // append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list of
            // active formatting elements at the position of the aforementioned
            // bookmark."
            self.active_formatting.remove(formatting_element);
            if formatting_position < bookmark {
                bookmark -= 1;
            }
            self.active_formatting.insert_at(
                bookmark,
                FormattingEntry::Element {
                    node: new_element,
                    tag: tag.clone(),
                    attrs,
                },
            );

            // STEP 4.19: "Remove formatting element from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthest block in that
            // stack."
            self.open_elements.remove(formatting_element);
            self.open_elements.insert_after(furthest_block, new_element, &tag);
        }
        AdoptionOutcome::Handled
    }
}
