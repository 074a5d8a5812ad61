//! Vetted descriptors -- the synthesizer's model of a usable type.
//!
//! Descriptors are produced once per run by the eligibility filter in
//! [`crate::universe`] and are immutable afterwards. Type references inside
//! descriptors are by fully-qualified name and resolve back through the
//! universe, so the descriptor graph itself stays acyclic.

use rand::Rng;
use std::sync::Arc;

/// Well-known primitive/boxed/text types that the value allocator can
/// produce with a literal instead of a constructor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    Str,
}

impl WellKnown {
    /// Match a fully-qualified (or primitive) type name against the
    /// well-known table. Boxed JVM forms and Kotlin spellings map to the
    /// same literal rule as the bare primitive.
    pub fn match_name(name: &str) -> Option<WellKnown> {
        match name {
            "int" | "java.lang.Integer" | "kotlin.Int" => Some(WellKnown::Int),
            "long" | "java.lang.Long" | "kotlin.Long" => Some(WellKnown::Long),
            "float" | "java.lang.Float" | "kotlin.Float" => Some(WellKnown::Float),
            "double" | "java.lang.Double" | "kotlin.Double" => Some(WellKnown::Double),
            "boolean" | "java.lang.Boolean" | "kotlin.Boolean" => Some(WellKnown::Boolean),
            "char" | "java.lang.Character" | "kotlin.Char" => Some(WellKnown::Char),
            "java.lang.String" | "kotlin.String" | "java.lang.CharSequence" => {
                Some(WellKnown::Str)
            }
            _ => None,
        }
    }

    /// Whether a name denotes a boolean-valued type.
    pub fn is_boolean(name: &str) -> bool {
        matches!(Self::match_name(name), Some(WellKnown::Boolean))
    }

    /// Draw a literal value for this type. The value ranges are shared
    /// across backends; only the rendered suffix differs per syntax.
    pub fn draw_value<R: Rng>(&self, rng: &mut R) -> LiteralValue {
        match self {
            WellKnown::Int => LiteralValue::Int(rng.gen_range(0..100)),
            WellKnown::Long => LiteralValue::Long(rng.gen_range(0..100)),
            WellKnown::Float => LiteralValue::Float(rng.gen_range(0.0_f64..100.0)),
            WellKnown::Double => LiteralValue::Double(rng.gen_range(0.0_f64..100.0)),
            WellKnown::Boolean => LiteralValue::Bool(rng.gen_bool(0.5)),
            WellKnown::Char => LiteralValue::Char('g'),
            WellKnown::Str => LiteralValue::Str("sample".to_string()),
        }
    }
}

/// A literal value drawn by the allocator, rendered by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

/// Return type names whose values the synthesizer may iterate over with a
/// forEach-style lambda.
pub fn is_iterable_name(name: &str) -> bool {
    matches!(
        name,
        "java.util.List"
            | "java.util.Collection"
            | "java.util.Set"
            | "java.lang.Iterable"
            | "kotlin.collections.List"
            | "kotlin.collections.Set"
            | "kotlin.collections.Collection"
    )
}

/// Split an array type name into its element name and dimension count.
///
/// `"int[][]"` -> `("int", 2)`; a non-array name comes back with 0 dims.
pub fn split_array(name: &str) -> (&str, usize) {
    let mut base = name;
    let mut dims = 0;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped;
        dims += 1;
    }
    (base, dims)
}

/// A generic type parameter on a vetted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDescriptor {
    pub name: String,
    /// Upper bound, if the declaration had one.
    pub bound: Option<String>,
}

/// How a vetted type can be brought into existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constructibility {
    /// Primitive or otherwise opaque: the allocator must special-case it.
    Opaque,
    /// The chosen eligible constructor's ordered parameter list.
    Constructor(Vec<ParamDescriptor>),
}

/// A constructor or method value parameter on a vetted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub type_name: String,
    pub vararg: bool,
}

/// A callable member judged safe to invoke from generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    /// `None` for void methods.
    pub return_type: Option<String>,
}

impl MethodDescriptor {
    /// Whether this member can be called with no arguments.
    pub fn is_zero_arg(&self) -> bool {
        self.params.is_empty()
    }
}

/// One usable type: identity, how to construct it, what to call on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Fully-qualified name.
    pub name: String,
    pub type_params: Vec<TypeParamDescriptor>,
    pub ctor: Constructibility,
    /// The vetted callable member set. Never empty for a descriptor handed
    /// out by `pick_type` -- a type with nothing to call is not an
    /// ingredient.
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Pick a random callable member.
    pub fn pick_method<R: Rng>(&self, rng: &mut R) -> Option<&MethodDescriptor> {
        if self.methods.is_empty() {
            return None;
        }
        Some(&self.methods[rng.gen_range(0..self.methods.len())])
    }

    /// Find the zero-argument members whose return type satisfies `pred`.
    pub fn zero_arg_returning<'a>(
        &'a self,
        pred: impl Fn(&str) -> bool + 'a,
    ) -> impl Iterator<Item = &'a MethodDescriptor> {
        self.methods.iter().filter(move |m| {
            m.is_zero_arg() && m.return_type.as_deref().is_some_and(|r| pred(r))
        })
    }
}

/// A shared, immutable descriptor handle.
pub type TypeRef = Arc<TypeDescriptor>;

/// A declared name bound in some scope: a field or a local/parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
    pub private: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn well_known_matches_primitive_and_boxed_forms() {
        assert_eq!(WellKnown::match_name("int"), Some(WellKnown::Int));
        assert_eq!(
            WellKnown::match_name("java.lang.Integer"),
            Some(WellKnown::Int)
        );
        assert_eq!(WellKnown::match_name("kotlin.Boolean"), Some(WellKnown::Boolean));
        assert_eq!(
            WellKnown::match_name("java.lang.String"),
            Some(WellKnown::Str)
        );
        assert_eq!(WellKnown::match_name("com.example.Widget"), None);
    }

    #[test]
    fn is_boolean_only_for_boolean_names() {
        assert!(WellKnown::is_boolean("boolean"));
        assert!(WellKnown::is_boolean("java.lang.Boolean"));
        assert!(!WellKnown::is_boolean("int"));
        assert!(!WellKnown::is_boolean("com.example.Widget"));
    }

    #[test]
    fn draw_value_int_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            match WellKnown::Int.draw_value(&mut rng) {
                LiteralValue::Int(v) => assert!((0..100).contains(&v)),
                other => panic!("unexpected literal: {other:?}"),
            }
        }
    }

    #[test]
    fn split_array_counts_dimensions() {
        assert_eq!(split_array("int[][]"), ("int", 2));
        assert_eq!(split_array("java.lang.String[]"), ("java.lang.String", 1));
        assert_eq!(split_array("com.example.Widget"), ("com.example.Widget", 0));
    }

    #[test]
    fn iterable_names_recognized() {
        assert!(is_iterable_name("java.util.List"));
        assert!(is_iterable_name("kotlin.collections.List"));
        assert!(!is_iterable_name("java.lang.String"));
    }

    #[test]
    fn zero_arg_returning_filters_by_signature() {
        let desc = TypeDescriptor {
            name: "com.example.Widget".to_string(),
            type_params: vec![],
            ctor: Constructibility::Constructor(vec![]),
            methods: vec![
                MethodDescriptor {
                    name: "isReady".to_string(),
                    params: vec![],
                    return_type: Some("boolean".to_string()),
                },
                MethodDescriptor {
                    name: "resize".to_string(),
                    params: vec![ParamDescriptor {
                        type_name: "int".to_string(),
                        vararg: false,
                    }],
                    return_type: Some("boolean".to_string()),
                },
                MethodDescriptor {
                    name: "refresh".to_string(),
                    params: vec![],
                    return_type: None,
                },
            ],
        };

        let found: Vec<&str> = desc
            .zero_arg_returning(WellKnown::is_boolean)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(found, vec!["isReady"]);
    }

    #[test]
    fn pick_method_returns_none_for_empty_set() {
        let desc = TypeDescriptor {
            name: "x.Y".to_string(),
            type_params: vec![],
            ctor: Constructibility::Opaque,
            methods: vec![],
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(desc.pick_method(&mut rng).is_none());
    }
}
