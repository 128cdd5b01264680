use schemaeq_types::{Callbacks, ConfigMode, Element, ObjectSchema, SchemaNode};

/// Reset every non-structural field of `node`, then recurse into its element.
///
/// The reset is unconditional, so the function is idempotent and the order in which subtrees are
/// visited does not matter.
pub fn normalize(node: &mut SchemaNode) {
    // Exhaustive: a new field on SchemaNode must be classified here.
    let SchemaNode {
        kind,
        required: _,
        optional: _,
        computed: _,
        force_new: _,
        element,
        callbacks,
        default,
        description,
        input_default,
        config_mode,
        min_items,
        max_items,
        conflicts_with,
        exactly_one_of,
        at_least_one_of,
        required_with,
        deprecated,
        sensitive,
        computed_when,
    } = node;

    *callbacks = Callbacks::default();
    *default = None;
    description.clear();
    input_default.clear();
    *config_mode = ConfigMode::default();
    *min_items = 0;
    *max_items = 0;
    conflicts_with.clear();
    exactly_one_of.clear();
    at_least_one_of.clear();
    required_with.clear();
    deprecated.clear();
    *sensitive = false;
    computed_when.clear();

    if kind.is_collection() {
        match element {
            Some(Element::Node(inner)) => normalize(inner),
            Some(Element::Object(schema)) => normalize_all(schema),
            None => {}
        }
    }
}

/// Normalize every attribute of `schema` in place.
pub fn normalize_all(schema: &mut ObjectSchema) {
    for node in schema.values_mut() {
        normalize(node);
    }
}

/// Normalized copy of `node`; the input is left untouched.
pub fn normalized(node: &SchemaNode) -> SchemaNode {
    let mut out = node.clone();
    normalize(&mut out);
    out
}

/// Normalized copy of `schema`; the input is left untouched.
pub fn normalized_all(schema: &ObjectSchema) -> ObjectSchema {
    let mut out = schema.clone();
    normalize_all(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemaeq_types::ValueKind;

    fn decorated(node: SchemaNode) -> SchemaNode {
        let mut node = node
            .with_description("doc")
            .with_deprecated("use other")
            .with_default(serde_json::json!(1))
            .with_item_bounds(1, 100)
            .with_validate("validate")
            .with_validate_diag("validate_diag")
            .with_diff_suppress("suppress")
            .with_state_func("state")
            .with_default_func("default_func")
            .sensitive();
        node.input_default = "42".to_string();
        node.config_mode = ConfigMode::Attr;
        node.conflicts_with = vec!["a".to_string()];
        node.exactly_one_of = vec!["b".to_string()];
        node.at_least_one_of = vec!["c".to_string()];
        node.required_with = vec!["d".to_string()];
        node.computed_when = vec!["e".to_string()];
        node
    }

    #[test]
    fn clears_every_behaviour_field() {
        let mut node = decorated(SchemaNode::int().required().force_new());
        normalize(&mut node);
        assert_eq!(node, SchemaNode::int().required().force_new());
    }

    #[test]
    fn keeps_structural_flags() {
        let mut node = decorated(SchemaNode::string().optional().computed());
        normalize(&mut node);
        assert_eq!(node.kind, ValueKind::String);
        assert!(node.optional);
        assert!(node.computed);
        assert!(!node.required);
        assert!(!node.force_new);
    }

    #[test]
    fn recurses_into_node_element() {
        let mut node = SchemaNode::list_of(Element::node(decorated(SchemaNode::int())));
        normalize(&mut node);
        let inner = node.element.as_ref().and_then(Element::as_node).expect("node element");
        assert!(inner.callbacks.is_empty());
        assert!(inner.description.is_empty());
    }

    #[test]
    fn recurses_into_object_element() {
        let mut node = SchemaNode::set_of(Element::object(
            ObjectSchema::new().with("embedded", decorated(SchemaNode::string().required())),
        ));
        normalize(&mut node);
        let embedded = node
            .object_element()
            .and_then(|o| o.get("embedded"))
            .expect("embedded");
        assert_eq!(embedded, &SchemaNode::string().required());
    }

    #[test]
    fn leaves_element_of_primitive_alone() {
        // Malformed input: the comparator reports it, normalization does not descend.
        let mut node = SchemaNode::int().with_element(Element::node(decorated(SchemaNode::int())));
        normalize(&mut node);
        let inner = node.element.as_ref().and_then(Element::as_node).expect("node element");
        assert!(!inner.callbacks.is_empty());
    }

    #[test]
    fn normalized_does_not_mutate_input() {
        let schema = ObjectSchema::new().with("field", decorated(SchemaNode::int()));
        let out = normalized_all(&schema);
        assert!(schema.get("field").is_some_and(|n| n.sensitive));
        assert!(out.get("field").is_some_and(|n| !n.sensitive));
    }
}
