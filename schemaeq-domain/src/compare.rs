use crate::error::SchemaMismatch;
use crate::normalize::normalize_all;
use schemaeq_types::report::Side;
use schemaeq_types::{Element, ObjectSchema, SchemaNode};
use tracing::debug;

/// Join a parent path and a key with `.`, omitting the separator at the root.
pub fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Check that `left` and `right` are structurally equivalent.
///
/// Both schemas are normalized in place before any per-key comparison, unless the key counts
/// already differ, in which case the inputs are returned untouched with a
/// [`SchemaMismatch::CardinalityMismatch`]. Keys are walked in sorted order over the
/// authoritative (`left`) side and the first divergence ends the walk.
///
/// `path` prefixes every reported path; pass `""` at the top level.
pub fn equal(
    left: &mut ObjectSchema,
    right: &mut ObjectSchema,
    path: &str,
) -> Result<(), SchemaMismatch> {
    check_cardinality(left, right, path)?;
    normalize_all(left);
    normalize_all(right);
    walk_keys(left, right, path)
}

/// Like [`equal`], but compares normalized copies and leaves both inputs as they were.
pub fn equivalent(
    left: &ObjectSchema,
    right: &ObjectSchema,
    path: &str,
) -> Result<(), SchemaMismatch> {
    equal(&mut left.clone(), &mut right.clone(), path)
}

fn check_cardinality(
    left: &ObjectSchema,
    right: &ObjectSchema,
    path: &str,
) -> Result<(), SchemaMismatch> {
    if left.len() == right.len() {
        return Ok(());
    }
    debug!(
        path = %path,
        left = left.len(),
        right = right.len(),
        "attribute count differs"
    );
    Err(SchemaMismatch::CardinalityMismatch {
        path: path.to_string(),
        left: left.clone(),
        right: right.clone(),
    })
}

// Nested levels are already normalized by the top-level call.
fn walk(left: &ObjectSchema, right: &ObjectSchema, path: &str) -> Result<(), SchemaMismatch> {
    check_cardinality(left, right, path)?;
    walk_keys(left, right, path)
}

fn walk_keys(left: &ObjectSchema, right: &ObjectSchema, path: &str) -> Result<(), SchemaMismatch> {
    for (key, l) in left {
        let key_path = join_path(path, key);
        let Some(r) = right.get(key) else {
            debug!(path = %key_path, "key missing from candidate");
            return Err(SchemaMismatch::MissingKey {
                path: key_path,
                key: key.clone(),
            });
        };

        check_shape(l, Side::Authoritative, &key_path)?;
        check_shape(r, Side::Candidate, &key_path)?;

        if l == r {
            continue;
        }

        if let Some((lo, ro)) = object_elements(l, r) {
            debug!(path = %key_path, "descending into nested object schema");
            walk(lo, ro, &key_path)?;
            // The records match, so the difference sits on the collection node itself.
        }

        debug!(path = %key_path, "attribute differs");
        return Err(SchemaMismatch::ValueMismatch {
            path: key_path,
            left: Box::new(l.clone()),
            right: Box::new(r.clone()),
        });
    }
    Ok(())
}

fn check_shape(node: &SchemaNode, side: Side, path: &str) -> Result<(), SchemaMismatch> {
    node.check_shape()
        .map_err(|source| SchemaMismatch::InvalidSchema {
            path: path.to_string(),
            side,
            source,
        })
}

fn object_elements<'a>(
    left: &'a SchemaNode,
    right: &'a SchemaNode,
) -> Option<(&'a ObjectSchema, &'a ObjectSchema)> {
    if !left.kind.is_collection() {
        return None;
    }
    match (left.element.as_ref()?, right.element.as_ref()?) {
        (Element::Object(lo), Element::Object(ro)) => Some((lo, ro)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemaeq_types::ValueKind;

    fn records(schema: ObjectSchema) -> SchemaNode {
        SchemaNode::list_of(Element::object(schema)).optional()
    }

    #[test]
    fn join_path_omits_leading_separator() {
        assert_eq!(join_path("", "field"), "field");
        assert_eq!(join_path("field", "embedded_field"), "field.embedded_field");
    }

    #[test]
    fn cardinality_mismatch_leaves_inputs_untouched() {
        let mut left = ObjectSchema::new().with("a", SchemaNode::int().with_description("doc"));
        let mut right = ObjectSchema::new();
        let err = equal(&mut left, &mut right, "").expect_err("counts differ");
        assert!(matches!(err, SchemaMismatch::CardinalityMismatch { .. }));
        assert_eq!(left.get("a").map(|n| n.description.as_str()), Some("doc"));
    }

    #[test]
    fn equal_normalizes_both_sides() {
        let mut left = ObjectSchema::new().with("a", SchemaNode::int().with_validate("v"));
        let mut right = ObjectSchema::new().with("a", SchemaNode::int().with_state_func("s"));
        equal(&mut left, &mut right, "").expect("equivalent");
        assert_eq!(left, right);
        assert!(left.get("a").is_some_and(|n| n.callbacks.is_empty()));
    }

    #[test]
    fn equivalent_keeps_originals() {
        let left = ObjectSchema::new().with("a", SchemaNode::int().with_validate("v"));
        let right = ObjectSchema::new().with("a", SchemaNode::int());
        equivalent(&left, &right, "").expect("equivalent");
        assert!(left.get("a").is_some_and(|n| !n.callbacks.is_empty()));
    }

    #[test]
    fn nested_failure_carries_the_deeper_path() {
        let mut left = ObjectSchema::new().with(
            "rule",
            records(ObjectSchema::new().with("port", SchemaNode::int())),
        );
        let mut right = ObjectSchema::new().with(
            "rule",
            records(ObjectSchema::new().with("port", SchemaNode::string())),
        );
        let err = equal(&mut left, &mut right, "resource").expect_err("nested kind differs");
        assert_eq!(err.path(), "resource.rule.port");
        match err {
            SchemaMismatch::ValueMismatch { left, right, .. } => {
                assert_eq!(left.kind, ValueKind::Int);
                assert_eq!(right.kind, ValueKind::String);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_cardinality_uses_collection_path() {
        let mut left = ObjectSchema::new().with(
            "rule",
            records(ObjectSchema::new().with("port", SchemaNode::int())),
        );
        let mut right = ObjectSchema::new().with("rule", records(ObjectSchema::new()));
        let err = equal(&mut left, &mut right, "").expect_err("nested counts differ");
        assert!(matches!(err, SchemaMismatch::CardinalityMismatch { .. }));
        assert_eq!(err.path(), "rule");
    }

    #[test]
    fn outer_flag_difference_is_reported_when_records_match() {
        let inner = ObjectSchema::new().with("port", SchemaNode::int());
        let mut left = ObjectSchema::new().with("rule", records(inner.clone()).force_new());
        let mut right = ObjectSchema::new().with("rule", records(inner));
        let err = equal(&mut left, &mut right, "").expect_err("force_new differs");
        assert_eq!(err.code(), schemaeq_types::report::codes::VALUE_MISMATCH);
        assert_eq!(err.path(), "rule");
    }

    #[test]
    fn list_and_set_of_same_records_differ() {
        let inner = ObjectSchema::new().with("port", SchemaNode::int());
        let mut left =
            ObjectSchema::new().with("rule", SchemaNode::list_of(Element::object(inner.clone())));
        let mut right =
            ObjectSchema::new().with("rule", SchemaNode::set_of(Element::object(inner)));
        let err = equal(&mut left, &mut right, "").expect_err("list vs set");
        assert_eq!(err.path(), "rule");
    }

    #[test]
    fn collection_without_element_is_invalid() {
        let mut left = ObjectSchema::new().with("tags", SchemaNode::new(ValueKind::Map));
        let mut right = ObjectSchema::new().with("tags", SchemaNode::new(ValueKind::Map));
        let err = equal(&mut left, &mut right, "").expect_err("map without element");
        match err {
            SchemaMismatch::InvalidSchema { path, side, .. } => {
                assert_eq!(path, "tags");
                assert_eq!(side, Side::Authoritative);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn candidate_shape_is_checked_too() {
        let mut left = ObjectSchema::new().with("name", SchemaNode::string());
        let mut right = ObjectSchema::new().with(
            "name",
            SchemaNode::string().with_element(Element::node(SchemaNode::string())),
        );
        let err = equal(&mut left, &mut right, "").expect_err("primitive with element");
        assert!(matches!(
            err,
            SchemaMismatch::InvalidSchema {
                side: Side::Candidate,
                ..
            }
        ));
    }

    #[test]
    fn first_divergence_in_key_order_wins() {
        let mut left = ObjectSchema::new()
            .with("b", SchemaNode::int())
            .with("a", SchemaNode::int());
        let mut right = ObjectSchema::new()
            .with("a", SchemaNode::string())
            .with("b", SchemaNode::string());
        let err = equal(&mut left, &mut right, "").expect_err("both differ");
        assert_eq!(err.path(), "a");
    }
}
