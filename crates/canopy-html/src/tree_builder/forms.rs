//! [§ 4.10.17.3 Association of controls and forms](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#association-of-controls-and-forms)
//!
//! The parser associates listed controls with the form element pointer when
//! they are created, even if the control ends up outside the form (foster
//! parenting, forms closed by table structure). Controls the pointer does not
//! claim fall back to their nearest form ancestor, or to the form named by
//! their `form` attribute.

use canopy_dom::NodeId;

use super::TreeBuilder;

/// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#category-listed)
///
/// "Listed elements: button, fieldset, input, object, output, select, textarea"
#[must_use]
pub(crate) fn is_listed_element(tag: &str) -> bool {
    matches!(
        tag,
        "button" | "fieldset" | "input" | "object" | "output" | "select" | "textarea"
    )
}

impl TreeBuilder {
    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "If the form element pointer is not null, there is no template element
    /// on the stack of open elements, element is either listed or submittable,
    /// and either element does not have a form attribute or the intended parent
    /// is not connected, and the intended parent is in the same tree as the
    /// element pointed to by the form element pointer, then associate element
    /// with the form element pointed to by the form element pointer."
    pub(crate) fn associate_with_form_pointer(&mut self, element: NodeId, intended_parent: NodeId) {
        let Some(form) = self.form_element_pointer else {
            return;
        };
        if self.open_elements.contains_tag("template") {
            return;
        }
        let Some(data) = self.tree.as_element(element) else {
            return;
        };
        if !is_listed_element(&data.tag_name) {
            return;
        }
        if data.attrs.contains("form") && self.tree.is_connected(intended_parent) {
            return;
        }
        if self.tree.tree_root(intended_parent) != self.tree.tree_root(form) {
            return;
        }
        self.tree.set_form_owner(element, Some(form));
    }

    /// [§ 4.10.17.3 Reset the form owner](https://html.spec.whatwg.org/multipage/form-control-infrastructure.html#reset-the-form-owner)
    ///
    /// Run once a listed control has been inserted. A control the parser
    /// already associated keeps its owner.
    pub(crate) fn reset_form_owner_after_insertion(&mut self, element: NodeId) {
        let Some(data) = self.tree.as_element(element) else {
            return;
        };
        if !is_listed_element(&data.tag_name) || data.form_owner.is_some() {
            return;
        }

        // "If element has a form content attribute and is connected, then:
        // If the first element in element's tree, in tree order, to have an ID
        // that is identical to element's form content attribute's value, is a
        // form element, then associate the element with that form element."
        if let Some(form_id) = data.attrs.get("form") {
            let form_id = form_id.to_string();
            if self.tree.is_connected(element)
                && let Some(target) = self.element_with_id(&form_id)
                && self.tree.tag_name(target) == Some("form")
            {
                self.tree.set_form_owner(element, Some(target));
            }
            return;
        }

        // "Otherwise, if element has an ancestor form element, then associate
        // element with the nearest such ancestor form element."
        let ancestor_form = self
            .tree
            .ancestors(element)
            .find(|&a| self.tree.tag_name(a) == Some("form"));
        if ancestor_form.is_some() {
            self.tree.set_form_owner(element, ancestor_form);
        }
    }

    /// First connected element in tree order whose id is `id`.
    ///
    /// Looks only at elements created with that id. The tree is searched
    /// only when more than one of them is connected.
    fn element_with_id(&self, id: &str) -> Option<NodeId> {
        let candidates = self.elements_by_id.get(id)?;
        let mut connected = candidates
            .iter()
            .copied()
            .filter(|&c| self.tree.is_connected(c));
        let first = connected.next()?;
        if connected.next().is_none() {
            Some(first)
        } else {
            self.tree.get_element_by_id(id)
        }
    }

    /// Clear the form element pointer if its form is no longer in the
    /// document, as after a frameset replaces the body.
    pub(crate) fn drop_disconnected_form_pointer(&mut self) {
        if let Some(form) = self.form_element_pointer
            && !self.tree.is_connected(form)
        {
            self.form_element_pointer = None;
        }
    }
}
