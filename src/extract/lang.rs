use crate::model::{Language, TypeKind};

/// Per-language grammar adapter.
///
/// Grammars name the same concepts inconsistently (`function_item`,
/// `function_declaration`, `method_definition`, …), so each language gets a
/// profile naming its node kinds instead of scattering string checks
/// through the traversal. Dispatch is a lookup by language tag.
pub struct LanguageProfile {
    /// Marker used when a function definition carries no name.
    pub anonymous_marker: &'static str,
    pub function_kinds: &'static [&'static str],
    pub type_kinds: &'static [(&'static str, TypeKind)],
    pub import_kinds: &'static [&'static str],
    pub export_kinds: &'static [&'static str],
    /// Kinds that denote a single parameter.
    pub parameter_kinds: &'static [&'static str],
    /// Parameter-list container kinds, used as a fallback for grammars
    /// whose parameters are plain identifiers (JavaScript, Python).
    pub parameter_list_kinds: &'static [&'static str],
    /// Kinds of top-level statements that may bind a constant or global.
    pub binding_kinds: &'static [&'static str],
}

static JAVASCRIPT: LanguageProfile = LanguageProfile {
    anonymous_marker: "<anonymous>",
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "generator_function",
        "method_definition",
    ],
    type_kinds: &[("class_declaration", TypeKind::Class)],
    import_kinds: &["import_statement"],
    export_kinds: &["export_statement"],
    parameter_kinds: &[],
    parameter_list_kinds: &["formal_parameters"],
    binding_kinds: &["lexical_declaration", "variable_declaration"],
};

static TYPESCRIPT: LanguageProfile = LanguageProfile {
    anonymous_marker: "<anonymous>",
    function_kinds: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "generator_function",
        "method_definition",
        "function_signature",
    ],
    type_kinds: &[
        ("class_declaration", TypeKind::Class),
        ("interface_declaration", TypeKind::Interface),
        ("enum_declaration", TypeKind::Enum),
    ],
    import_kinds: &["import_statement"],
    export_kinds: &["export_statement"],
    parameter_kinds: &["required_parameter", "optional_parameter"],
    parameter_list_kinds: &["formal_parameters"],
    binding_kinds: &["lexical_declaration", "variable_declaration"],
};

static PYTHON: LanguageProfile = LanguageProfile {
    anonymous_marker: "<lambda>",
    function_kinds: &["function_definition"],
    type_kinds: &[("class_definition", TypeKind::Class)],
    import_kinds: &["import_statement", "import_from_statement"],
    export_kinds: &[],
    parameter_kinds: &[
        "typed_parameter",
        "default_parameter",
        "typed_default_parameter",
    ],
    parameter_list_kinds: &["parameters"],
    binding_kinds: &["expression_statement"],
};

static RUST: LanguageProfile = LanguageProfile {
    anonymous_marker: "<closure>",
    function_kinds: &["function_item"],
    type_kinds: &[
        ("struct_item", TypeKind::Struct),
        ("enum_item", TypeKind::Enum),
        ("trait_item", TypeKind::Interface),
        ("union_item", TypeKind::Struct),
    ],
    import_kinds: &["use_declaration"],
    export_kinds: &[],
    parameter_kinds: &["parameter", "self_parameter"],
    parameter_list_kinds: &["parameters"],
    binding_kinds: &["const_item", "static_item"],
};

static JAVA: LanguageProfile = LanguageProfile {
    anonymous_marker: "<anonymous>",
    function_kinds: &["method_declaration", "constructor_declaration"],
    type_kinds: &[
        ("class_declaration", TypeKind::Class),
        ("interface_declaration", TypeKind::Interface),
        ("enum_declaration", TypeKind::Enum),
        ("record_declaration", TypeKind::Class),
    ],
    import_kinds: &["import_declaration"],
    export_kinds: &[],
    parameter_kinds: &["formal_parameter", "spread_parameter"],
    parameter_list_kinds: &["formal_parameters"],
    binding_kinds: &[],
};

pub fn profile_for(language: Language) -> &'static LanguageProfile {
    match language {
        Language::JavaScript => &JAVASCRIPT,
        Language::TypeScript => &TYPESCRIPT,
        Language::Python => &PYTHON,
        Language::Rust => &RUST,
        Language::Java => &JAVA,
    }
}

impl LanguageProfile {
    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    pub fn type_kind(&self, kind: &str) -> Option<TypeKind> {
        self.type_kinds
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, t)| *t)
    }

    pub fn is_import(&self, kind: &str) -> bool {
        self.import_kinds.contains(&kind)
    }

    pub fn is_export(&self, kind: &str) -> bool {
        self.export_kinds.contains(&kind)
    }

    pub fn is_binding(&self, kind: &str) -> bool {
        self.binding_kinds.contains(&kind)
    }
}
