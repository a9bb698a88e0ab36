//! Tests for form ownership of controls in malformed markup, mostly forms
//! written directly inside tables.

use canopy_dom::{DomTree, NodeId};
use canopy_html::parse_document;

fn attr(tree: &DomTree, id: NodeId, name: &str) -> String {
    tree.as_element(id)
        .and_then(|e| e.attrs.get(name))
        .unwrap_or_default()
        .to_string()
}

/// Names of the form's controls, in tree order.
fn control_names(tree: &DomTree, form: NodeId) -> Vec<String> {
    tree.form_elements(form)
        .into_iter()
        .map(|id| attr(tree, id, "name"))
        .collect()
}

fn parent_tag(tree: &DomTree, id: NodeId) -> &str {
    tree.parent(id)
        .and_then(|p| tree.tag_name(p))
        .unwrap_or_default()
}

fn element_by_name(tree: &DomTree, name: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|&id| tree.as_element(id).and_then(|e| e.attrs.get("name")) == Some(name))
        .expect("element with that name")
}

#[test]
fn test_forms_between_table_rows() {
    let html = "<html>\n<body>\n<table>\n  <tr>\n    <td>xyz</td>\n  </tr>\n\
        <form name='form1' action='' method='post'>\n\
        <input type='hidden' name='1a' value='a1' />\n\
        <tr>\n<td>\n<table>\n<tr>\n<td>\n\
        <input type='text' name='1b' value='b1' />\n\
        </td>\n</tr>\n</table>\n</td>\n</tr>\n\
        <input type='hidden' name='1c' value='c1'>\n\
        </form>\n\
        <form name='form2' action='' method='post'>\n\
        <input type='hidden' name='2a' value='a2' />\n\
        <tr>\n<td>\n<table>\n<tr>\n<td>\n\
        <input type='text' name='2b' value='b2' />\n\
        </td>\n</tr>\n</table>\n</td>\n</tr>\n\
        <input type='hidden' name='2c' value='c2'>\n\
        </form>\n</table></body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 2);
    assert_eq!(control_names(&tree, forms[0]), ["1a", "1b", "1c"]);
    assert_eq!(control_names(&tree, forms[1]), ["2a", "2b", "2c"]);
    for form in forms {
        assert!(tree.element_children(form).is_empty());
        assert_eq!(parent_tag(&tree, form), "tbody");
    }
}

#[test]
fn test_form_directly_in_table_owns_cell_controls() {
    let html = "<html>\n<body>\n  <table>\n\
        <form name='form1' action='' method='get'>\n\
        <input type='hidden' name='1a' value='a1'>\n\
        <tr>\n<td>\n\
        <input type='hidden' name='1b' value='b1'>\n\
        <input type='submit' value='Submit'>\n\
        </td>\n</tr>\n</form>\n  </table></body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(control_names(&tree, forms[0]), ["1a", "1b", ""]);
    assert!(tree.element_children(forms[0]).is_empty());
    assert_eq!(parent_tag(&tree, forms[0]), "table");
}

#[test]
fn test_form_inside_fostered_div() {
    let html = "<html>\n<body>\n  <table>\n    <div>\n\
        <form name='form1' action='' method='get'>\n\
        <input type='hidden' name='1a' value='a1'>\n\
        <tr>\n<td>\n\
        <input type='hidden' name='1b' value='b1'>\n\
        <input type='submit' value='Submit'>\n\
        </td>\n</tr>\n</form>\n</div>\n  </table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(control_names(&tree, forms[0]), ["1a", "1b", ""]);
    assert!(tree.element_children(forms[0]).is_empty());
    assert_eq!(parent_tag(&tree, forms[0]), "div");
}

#[test]
fn test_forms_inside_row_before_cell() {
    let html = "<html>\n<body>\n  <table>\n    <tr>\n\
        <form name='form1'>\n\
        <input value='a1' name='1a' type='hidden'></input>\n\
        </form>\n\
        <form name='form2'>\n\
        <input value='a2' name='2a' type='hidden'></input>\n\
        </form>\n\
        <td>\n</td>\n</tr>\n  </table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 2);
    assert_eq!(control_names(&tree, forms[0]), ["1a"]);
    assert_eq!(control_names(&tree, forms[1]), ["2a"]);
    for form in forms {
        assert!(tree.element_children(form).is_empty());
        assert_eq!(parent_tag(&tree, form), "tr");
    }
}

#[test]
fn test_form_between_cells_owns_nested_table_controls() {
    let html = "<html>\n<body>\n<table>\n  <tr>\n    <td></td>\n\
        <form name='form1'>\n\
        <input name='1a' value='a1' type='hidden'></input>\n\
        <td>\n<div>\n<table>\n<tr>\n<td>\n\
        <input name='1b' value='b1'></input>\n\
        </td>\n</tr>\n</table>\n</div>\n</td>\n\
        </form>\n  </tr>\n</table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(control_names(&tree, forms[0]), ["1a", "1b"]);
    assert!(tree.element_children(forms[0]).is_empty());
    assert_eq!(parent_tag(&tree, forms[0]), "tr");
}

#[test]
fn test_form_closed_by_table_then_new_form_after_table() {
    let html = "<html>\n<body>\n  <table>\n    <tbody>\n      <tr>\n\
        <form name='form1'>\n\
        <input type='hidden' name='1a' value='a1' />\n\
        <td>\n\
        <input type='hidden' name='1b' value='b1' />\n\
        <div>\n<input name='1c' value='c1'>\n</div>\n\
        </td>\n</form>\n</tr>\n</tbody>\n  </table>\n\
        <div>\n<form name='form2'>\n\
        <input type='hidden' name='2a' value='a2' />\n\
        </form>\n</div>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 2);

    assert_eq!(control_names(&tree, forms[0]), ["1a", "1b", "1c"]);
    assert!(tree.element_children(forms[0]).is_empty());
    assert_eq!(parent_tag(&tree, forms[0]), "tr");

    assert_eq!(control_names(&tree, forms[1]), ["2a"]);
    assert_eq!(tree.element_children(forms[1]).len(), 1);
    assert_eq!(parent_tag(&tree, forms[1]), "div");
}

#[test]
fn test_form_wrapping_table_owns_row_input() {
    let html = "<html>\n<body>\n  <form name='form1'>\n\
        <input type='hidden' name='1a' value='a1' />\n\
        <div>\n<table>\n\
        <colgroup id='colgroup'>\n<col width='50%' />\n<col width='50%' />\n</colgroup>\n\
        <thead>\n<tr>\n<th>A</th>\n<th>B</th>\n</tr>\n</thead>\n\
        <tbody>\n<tr>\n\
        <input type='hidden' name='1b' value='b1' />\n\
        <td>1</td>\n<td>2</td>\n\
        </tr>\n</tbody>\n</table>\n</div>\n  </form>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    let form = forms[0];
    assert_eq!(control_names(&tree, form), ["1a", "1b"]);
    assert_eq!(tree.element_children(form).len(), 2);
    assert_eq!(parent_tag(&tree, form), "body");

    let row_input = element_by_name(&tree, "1b");
    assert_eq!(parent_tag(&tree, row_input), "tr");

    let colgroup = tree.get_element_by_id("colgroup").expect("colgroup");
    assert_eq!(parent_tag(&tree, colgroup), "table");
    assert_eq!(tree.element_children(colgroup).len(), 2);
}

#[test]
fn test_form_controls_in_tree_order_across_foster_parenting() {
    let html = "<html>\n<body>\n  <table>\n    <form name='form1'>\n\
        <input type='hidden' name='1a' value='a1' />\n\
        <div>\n<input type='hidden' name='1b' value='b1' />\n</div>\n\
        <tbody>\n<tr>\n\
        <input type='hidden' name='1c' value='c1' />\n\
        <td>1</td>\n<td>2</td>\n\
        </tr>\n</tbody>\n</form>\n  </table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(control_names(&tree, forms[0]), ["1b", "1a", "1c"]);
    assert!(tree.element_children(forms[0]).is_empty());
    assert_eq!(parent_tag(&tree, forms[0]), "table");
}

#[test]
fn test_second_form_in_table_does_not_steal_controls() {
    let html = "<html>\n<body>\n  <table>\n    <form name='form1'>\n\
        <tr>\n<td>\n\
        <input name='form1_submit' type='submit'/>\n\
        </td>\n</tr>\n</form>\n\
        <form name='form2'>\n</form>\n  </table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    let form1 = forms
        .iter()
        .copied()
        .find(|&f| attr(&tree, f, "name") == "form1")
        .expect("form1");
    assert_eq!(control_names(&tree, form1), ["form1_submit"]);
    assert!(tree.element_children(form1).is_empty());
    assert_eq!(parent_tag(&tree, form1), "table");
}

#[test]
fn test_controls_after_closed_div_keep_form_owner() {
    let html = "<html><head><script>\nfunction test() {}\n</script>\n\
        </head><body onload='test()'>\n<div>\n\
        <form action='foo'>\
        <input type='text' name='text1'/>\
        <input type='text' name='text2'/>\
        </div>\n\
        <input type='text' name='text3'/>\n\
        </form>\n\
        <input type='text' name='text4' id='text4'/>\n\
        </body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 1);
    let form = forms[0];
    assert_eq!(tree.children(form).len(), 2);
    assert_eq!(control_names(&tree, form), ["text1", "text2", "text3"]);

    let text3 = element_by_name(&tree, "text3");
    assert_eq!(parent_tag(&tree, text3), "body");
    assert_eq!(tree.form_owner(text3), Some(form));

    let text4 = tree.get_element_by_id("text4").expect("text4");
    assert_eq!(tree.form_owner(text4), None);
}

#[test]
fn test_form_end_tag_inside_cell_leaves_form_open() {
    let html = "<html><body>\n<form name='TransSearch'>\n\
        <input type='submit' id='button'>\n<table>\n\
        <tr><td><input name='FromDate' value='inFirst'></form></td></tr>\n\
        </table>\n<table>\n\
        <tr><td><form name='ImageSearch'></td></tr>\n\
        <tr><td><input name='FromDate' value='inSecond'></form></td></tr>\n\
        </table>\n</body></html>";
    let tree = parse_document(html);
    let forms = tree.forms();
    assert_eq!(forms.len(), 2);

    let values = |form: NodeId| -> Vec<String> {
        tree.form_elements(form)
            .into_iter()
            .filter(|&id| attr(&tree, id, "name") == "FromDate")
            .map(|id| attr(&tree, id, "value"))
            .collect()
    };
    assert_eq!(values(forms[0]), ["inFirst"]);
    assert_eq!(values(forms[1]), ["inSecond"]);

    let button = tree.get_element_by_id("button").expect("button");
    assert_eq!(tree.form_owner(button), Some(forms[0]));
    assert!(tree.is_descendant_of(forms[1], forms[0]));
}

#[test]
fn test_form_attribute_overrides_ancestor() {
    let html = "<form id=a></form><form id=b><input form=a name=x></form>";
    let tree = parse_document(html);
    let a = tree.get_element_by_id("a").expect("form a");
    let x = element_by_name(&tree, "x");
    assert_eq!(tree.form_owner(x), Some(a));
}

#[test]
fn test_form_attribute_picks_first_element_with_id() {
    let html = "<form id=f name=first></form><form id=f name=second></form>\
        <input form=f name=c>";
    let tree = parse_document(html);
    let first = element_by_name(&tree, "first");
    let c = element_by_name(&tree, "c");
    assert_eq!(tree.form_owner(c), Some(first));
}

#[test]
fn test_form_attribute_naming_non_form_leaves_control_unowned() {
    let html = "<div id=f></div><form id=f></form><input form=f name=c>";
    let tree = parse_document(html);
    let c = element_by_name(&tree, "c");
    assert_eq!(tree.form_owner(c), None);
}

#[test]
fn test_form_attribute_resolves_across_many_forms() {
    let mut html = String::new();
    for i in 0..200 {
        html.push_str(&format!("<form id=f{i}></form>"));
    }
    for i in 0..200 {
        html.push_str(&format!("<input form=f{i} name=c{i}>"));
    }
    let tree = parse_document(&html);
    for i in [0, 57, 199] {
        let form = tree.get_element_by_id(&format!("f{i}")).expect("form");
        let control = element_by_name(&tree, &format!("c{i}"));
        assert_eq!(tree.form_owner(control), Some(form));
    }
}
