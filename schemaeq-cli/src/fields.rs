//! Field registry for the `schemaeq fields` command.
//!
//! Lists every serialized schema node key and whether it takes part in equivalence.

/// How the comparator treats a node field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Compared exactly.
    Structural,
    /// Reset by normalization before comparing.
    Reset,
}

/// One serialized key of a schema node.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Key in JSON/YAML schema files.
    pub key: &'static str,
    pub class: FieldClass,
    pub description: &'static str,
}

pub static FIELD_REGISTRY: &[FieldInfo] = &[
    FieldInfo {
        key: "type",
        class: FieldClass::Structural,
        description: "Value kind: bool, int, float, string, list, set or map.",
    },
    FieldInfo {
        key: "required",
        class: FieldClass::Structural,
        description: "The attribute must be set in configuration.",
    },
    FieldInfo {
        key: "optional",
        class: FieldClass::Structural,
        description: "The attribute may be set in configuration.",
    },
    FieldInfo {
        key: "computed",
        class: FieldClass::Structural,
        description: "The provider may set the value when configuration leaves it empty.",
    },
    FieldInfo {
        key: "force_new",
        class: FieldClass::Structural,
        description: "Changing the value recreates the resource.",
    },
    FieldInfo {
        key: "elem",
        class: FieldClass::Structural,
        description: "Member schema of a collection: a nested node or a nested object schema.",
    },
    FieldInfo {
        key: "callbacks",
        class: FieldClass::Reset,
        description: "Names of the validate, validate_diag, diff_suppress, state and default_func \
                      hooks.",
    },
    FieldInfo {
        key: "default",
        class: FieldClass::Reset,
        description: "Literal default value.",
    },
    FieldInfo {
        key: "description",
        class: FieldClass::Reset,
        description: "Documentation text.",
    },
    FieldInfo {
        key: "input_default",
        class: FieldClass::Reset,
        description: "Default shown when prompting for input.",
    },
    FieldInfo {
        key: "config_mode",
        class: FieldClass::Reset,
        description: "Block or attribute syntax in configuration.",
    },
    FieldInfo {
        key: "min_items",
        class: FieldClass::Reset,
        description: "Lower bound on collection size.",
    },
    FieldInfo {
        key: "max_items",
        class: FieldClass::Reset,
        description: "Upper bound on collection size.",
    },
    FieldInfo {
        key: "conflicts_with",
        class: FieldClass::Reset,
        description: "Attributes that must not be set together with this one.",
    },
    FieldInfo {
        key: "exactly_one_of",
        class: FieldClass::Reset,
        description: "Attribute group of which exactly one must be set.",
    },
    FieldInfo {
        key: "at_least_one_of",
        class: FieldClass::Reset,
        description: "Attribute group of which at least one must be set.",
    },
    FieldInfo {
        key: "required_with",
        class: FieldClass::Reset,
        description: "Attributes that must be set whenever this one is.",
    },
    FieldInfo {
        key: "deprecated",
        class: FieldClass::Reset,
        description: "Deprecation message.",
    },
    FieldInfo {
        key: "sensitive",
        class: FieldClass::Reset,
        description: "The value is hidden from plan output.",
    },
    FieldInfo {
        key: "computed_when",
        class: FieldClass::Reset,
        description: "Attributes whose change makes this value computed.",
    },
];

pub fn format_field_class(class: FieldClass) -> &'static str {
    match class {
        FieldClass::Structural => "structural",
        FieldClass::Reset => "reset",
    }
}
