//! Shared tree construction steps used by several insertion modes.

use canopy_dom::NodeId;

use super::formatting::FormattingEntry;
use super::open_elements::ScopeKind;
use super::{InsertionMode, TreeBuilder};
use crate::tokenizer::Attribute;

impl TreeBuilder {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        let Some(last) = self.active_formatting.entries().last() else {
            return;
        };

        // STEP 2: "If the last (most recently added) entry in the list of
        // active formatting elements is a marker, or if it is an element that
        // is in the stack of open elements, then there is nothing to
        // reconstruct; stop this algorithm."
        if last.node().is_none_or(|node| self.open_elements.contains(node)) {
            return;
        }

        // STEP 3-6 (Rewind): walk back to the entry after the last marker or
        // open element.
        let mut index = self.active_formatting.len() - 1;
        while index > 0 {
            let previous = &self.active_formatting.entries()[index - 1];
            if previous
                .node()
                .is_none_or(|node| self.open_elements.contains(node))
            {
                break;
            }
            index -= 1;
        }

        // STEP 7-10 (Advance / Create): re-create each entry from there on.
        while index < self.active_formatting.len() {
            let Some(FormattingEntry::Element { tag, attrs, .. }) =
                self.active_formatting.get(index).cloned()
            else {
                index += 1;
                continue;
            };
            // "Insert an HTML element for the token for which the element
            // entry was created, to obtain new element."
            let attributes: Vec<Attribute> =
                attrs.iter().map(|(n, v)| Attribute::new(n, v)).collect();
            let element = self.insert_html_element(&tag, &attributes);
            // "Replace the entry for entry in the list with an entry for new
            // element."
            self.active_formatting.replace_at(
                index,
                FormattingEntry::Element {
                    node: element,
                    tag,
                    attrs,
                },
            );
            index += 1;
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// `except` names an element that must not be popped.
    pub(crate) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(tag) = self.open_elements.current_tag() {
            let implied = matches!(
                tag,
                "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
            );
            if !implied || except == Some(tag) {
                break;
            }
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.3 Generate all implied end tags thoroughly](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub(crate) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.open_elements.current_is_one_of(&[
            "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt",
            "rtc", "tbody", "td", "tfoot", "th", "thead", "tr",
        ]) {
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "1. Generate implied end tags, except for p elements.
    ///  2. If the current node is not a p element, then this is a parse error.
    ///  3. Pop elements from the stack of open elements until a p element has
    /// been popped from the stack."
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if self.open_elements.current_tag() != Some("p") {
            self.parse_error("unclosed elements inside <p>");
        }
        self.open_elements.pop_until_tag("p");
    }

    /// Close a p element if one is in button scope, as most block start tags
    /// do first.
    pub(crate) fn close_p_if_in_button_scope(&mut self) {
        if self.open_elements.has_element_in_scope("p", ScopeKind::Button) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(crate) fn close_the_cell(&mut self) {
        // "1. Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "2. If the current node is not now a td element or a th element, then
        // this is a parse error."
        if !self.open_elements.current_is_one_of(&["td", "th"]) {
            self.parse_error("cell closed with open descendants");
        }
        // "3. Pop elements from the stack of open elements stack until a td
        // element or a th element has been popped from the stack."
        self.open_elements.pop_until_one_of(&["td", "th"]);
        // "4. Clear the list of active formatting elements up to the last marker."
        self.active_formatting.clear_to_last_marker();
        // "5. Switch the insertion mode to "in row"."
        self.insertion_mode = InsertionMode::InRow;
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        let entries = self.open_elements.entries();
        for (index, entry) in entries.iter().enumerate().rev() {
            // "last: Set last to false. If node is the first node in the stack
            // of open elements, then set last to true"
            let last = index == 0;
            let mode = match entry.tag.as_str() {
                // "If node is a select element, run these substeps: ... Loop:
                // If ancestor is a table element, switch the insertion mode to
                // "in select in table" and return."
                "select" => {
                    let in_table = !last
                        && entries[..index]
                            .iter()
                            .rev()
                            .take_while(|e| e.tag != "template")
                            .any(|e| e.tag == "table");
                    Some(if in_table {
                        InsertionMode::InSelectInTable
                    } else {
                        InsertionMode::InSelect
                    })
                }
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                "template" => self.template_insertion_modes.last().copied(),
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                "html" => Some(if self.head_element_pointer.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ => None,
            };
            if let Some(mode) = mode {
                self.insertion_mode = mode;
                return;
            }
            // "If last is true, then switch the insertion mode to "in body"
            // and return."
            if last {
                break;
            }
        }
        self.insertion_mode = InsertionMode::InBody;
    }

    /// [§ 13.2.7 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(crate) fn stop_parsing(&mut self) {
        while self.open_elements.pop().is_some() {}
        self.finished = true;
    }

    /// The body element, if it is the second element on the stack of open
    /// elements.
    pub(crate) fn body_on_stack(&self) -> Option<NodeId> {
        if self.open_elements.tag_at(1) == Some("body") {
            self.open_elements.get(1)
        } else {
            None
        }
    }

    /// Whether the stack holds anything besides the elements EOF may leave
    /// open without a parse error.
    pub(crate) fn has_unexpected_open_elements_at_eof(&self) -> bool {
        self.open_elements.entries().iter().any(|e| {
            !matches!(
                e.tag.as_str(),
                "dd" | "dt"
                    | "li"
                    | "optgroup"
                    | "option"
                    | "p"
                    | "rb"
                    | "rp"
                    | "rt"
                    | "rtc"
                    | "tbody"
                    | "td"
                    | "tfoot"
                    | "th"
                    | "thead"
                    | "tr"
                    | "body"
                    | "html"
            )
        })
    }
}
