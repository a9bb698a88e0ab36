//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use canopy_dom::{ElementData, NodeId, NodeType};

use super::{InsertionMode, TreeBuilder};
use crate::tokenizer::{Attribute, Token, attributes_to_map};

/// "the appropriate place for inserting a node": a parent and the child it
/// goes before, or the end of the parent when `before` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub(crate) parent: NodeId,
    pub(crate) before: Option<NodeId>,
}

impl TreeBuilder {
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(crate) fn appropriate_insertion_place(&self, override_target: Option<NodeId>) -> InsertionPoint {
        // STEP 1: "If there was an override target specified, then let target
        // be the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.open_elements.current())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        // matching steps from the following list:"
        //
        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        // thead, or tr element"
        let target_is_table_part = matches!(
            self.tree.tag_name(target),
            Some("table" | "tbody" | "tfoot" | "thead" | "tr")
        );
        if self.foster_parenting && target_is_table_part {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        // its last child (if any)."
        //
        // Template contents are stored as the template's own children.
        InsertionPoint {
            parent: target,
            before: None,
        }
    }

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> InsertionPoint {
        // "1. Let last template be the last template element in the stack of
        // open elements, if any.
        //  2. Let last table be the last table element in the stack of open
        // elements, if any."
        let last_template = self.open_elements.last_index_of("template");
        let last_table = self.open_elements.last_index_of("table");

        // "3. If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents"
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
            && let Some(template) = self.open_elements.get(template_index)
        {
            return InsertionPoint {
                parent: template,
                before: None,
            };
        }

        // "4. If there is no last table, then let adjusted insertion location
        // be inside the first element in the stack of open elements (the html
        // element), after its last child (if any), and abort these steps.
        // (fragment case)"
        let Some(table_index) = last_table else {
            return InsertionPoint {
                parent: self.open_elements.get(0).unwrap_or(NodeId::ROOT),
                before: None,
            };
        };
        let table = self.open_elements.get(table_index).unwrap_or(NodeId::ROOT);

        // "5. If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table, and abort these steps."
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // "6. Let previous element be the element immediately above last table
        // in the stack of open elements.
        //  7. Let adjusted insertion location be inside previous element, after
        // its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .and_then(|i| self.open_elements.get(i))
            .unwrap_or(NodeId::ROOT);
        InsertionPoint {
            parent: previous,
            before: None,
        }
    }

    pub(crate) fn insert_at(&mut self, point: InsertionPoint, node: NodeId) {
        self.tree.insert_before(point.parent, node, point.before);
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// The element is not inserted. Form association that depends on the
    /// form element pointer happens here, because it must use the pointer's
    /// value at creation time.
    pub(crate) fn create_element_for_token(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        intended_parent: NodeId,
    ) -> NodeId {
        let data = ElementData::new(name, attributes_to_map(attributes));
        let element = self.tree.alloc(NodeType::Element(data));
        if let Some(id) = attributes.iter().find(|a| a.name == "id") {
            self.register_id(&id.value, element);
        }
        self.associate_with_form_pointer(element, intended_parent);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "1. Let the adjusted insertion location be the appropriate place for
    /// inserting a node.
    ///  2. Let element be the result of creating an element for the token in
    /// the given namespace, with the intended parent being the element in
    /// which the adjusted insertion location finds itself.
    ///  3. If it is possible to insert element at the adjusted insertion
    /// location, then insert element at the adjusted insertion location.
    ///  4. Push element onto the stack of open elements so that it is the new
    /// current node.
    ///  5. Return element."
    pub(crate) fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let point = self.appropriate_insertion_place(None);
        let element = self.create_element_for_token(name, attributes, point.parent);
        self.insert_at(point, element);
        self.reset_form_owner_after_insertion(element);
        self.open_elements.push(element, name);
        element
    }

    /// Insert an HTML element for a start tag token.
    pub(crate) fn insert_element_for(&mut self, token: &Token) -> NodeId {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => self.insert_html_element(name, attributes),
            _ => self.insert_html_element(token.tag_name().unwrap_or_default(), &[]),
        }
    }

    /// Insert an element for a start tag that has no attributes, as when the
    /// parser acts "as if" it had seen a tag.
    pub(crate) fn insert_implied_element(&mut self, name: &str) -> NodeId {
        self.insert_html_element(name, &[])
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(crate) fn insert_characters(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        // "2. Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let point = self.appropriate_insertion_place(None);

        // "3. If the adjusted insertion location is inside a Document node,
        // then ignore the token."
        if point.parent == NodeId::ROOT {
            return;
        }

        // "4. If there is a Text node immediately before the adjusted insertion
        // location, then append data to that Text node's data."
        let previous = match point.before {
            Some(before) => self.tree.prev_sibling(before),
            None => self.tree.last_child(point.parent),
        };
        if let Some(previous) = previous
            && let Some(text) = self.tree.as_text_mut(previous)
        {
            text.push_str(data);
            return;
        }

        // "5. Otherwise, create a new Text node whose data is data and insert
        // the newly created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(data.to_string()));
        self.insert_at(point, text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_insertion_place(None);
        self.insert_comment_at(data, point);
    }

    /// Insert a comment at an explicit position, e.g. as the last child of
    /// the Document or of the html element.
    pub(crate) fn insert_comment_at(&mut self, data: &str, point: InsertionPoint) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_at(point, comment);
    }

    /// Insert a comment as the last child of `parent`.
    pub(crate) fn append_comment(&mut self, data: &str, parent: NodeId) {
        self.insert_comment_at(
            data,
            InsertionPoint {
                parent,
                before: None,
            },
        );
    }

    /// [§ 13.2.6.2 Generic RCDATA and raw text element parsing](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "1. Insert an HTML element for the token.
    ///  2. If the algorithm that was invoked is the generic raw text element
    /// parsing algorithm, switch the tokenizer to the RAWTEXT state; otherwise
    /// the algorithm invoked was the generic RCDATA element parsing algorithm,
    /// switch the tokenizer to the RCDATA state.
    ///  3. Let the original insertion mode be the current insertion mode.
    ///  4. Then, switch the insertion mode to "text"."
    ///
    /// The tokenizer makes its own state switch when it emits the start tag.
    pub(crate) fn parse_text_element(&mut self, token: &Token) {
        let _ = self.insert_element_for(token);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// Acknowledge (or complain about) a start tag's self-closing flag for an
    /// element that is not void.
    pub(crate) fn check_self_closing(&mut self, token: &Token) {
        if let Token::StartTag {
            name,
            self_closing: true,
            ..
        } = token
        {
            self.parse_error(&format!("non-void-html-element-start-tag-with-trailing-solidus <{name}/>"));
        }
    }

    /// Add attributes from `attributes` that `element` does not already
    /// have, as for a second `<html>` or `<body>` start tag.
    pub(crate) fn merge_missing_attributes(&mut self, element: NodeId, attributes: &[Attribute]) {
        let mut added_id = None;
        if let Some(data) = self.tree.as_element_mut(element) {
            for attribute in attributes {
                if !data.attrs.contains(&attribute.name) {
                    data.attrs.set(attribute.name.as_str(), attribute.value.as_str());
                    if attribute.name == "id" {
                        added_id = Some(attribute.value.as_str());
                    }
                }
            }
        }
        if let Some(id) = added_id {
            self.register_id(id, element);
        }
    }

    fn register_id(&mut self, id: &str, element: NodeId) {
        self.elements_by_id
            .entry(id.to_string())
            .or_default()
            .push(element);
    }
}
