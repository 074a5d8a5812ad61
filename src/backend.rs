//! The abstract emission backend.
//!
//! The synthesizer decides *what* a class contains; a [`SyntaxBackend`]
//! decides how each decision is spelled in one target language. Two
//! backends exist side by side (Java and Kotlin) and share one
//! synthesizer: given the same decision sequence and seed they must emit
//! syntactically valid, control-flow-equivalent sources.

use crate::descriptor::{FieldDescriptor, LiteralValue, TypeDescriptor, TypeParamDescriptor};
use crate::writer::CodeWriter;

pub mod java;
pub mod kotlin;

pub use java::JavaBackend;
pub use kotlin::KotlinBackend;

/// A rendered method parameter: name plus backend-rendered type.
#[derive(Debug, Clone)]
pub struct RenderedParam {
    pub name: String,
    pub type_text: String,
}

/// Renders synthesizer decisions into one concrete syntax.
///
/// Block-shaped methods come in open/close pairs and are always emitted as
/// properly nested pairs by the synthesizer; the writer asserts the balance
/// at the end.
pub trait SyntaxBackend {
    /// Short language tag (`"java"` / `"kotlin"`).
    fn name(&self) -> &'static str;

    /// Source file name for a class.
    fn file_name(&self, class_name: &str) -> String;

    fn package_header(&self, w: &mut CodeWriter, package: &str);

    fn class_open(&self, w: &mut CodeWriter, class_name: &str);
    fn class_close(&self, w: &mut CodeWriter);

    /// `type_text` is the declaration-position rendering of the field's
    /// type (generics already substituted).
    fn field_decl(&self, w: &mut CodeWriter, field: &FieldDescriptor, type_text: &str, init: &str);

    fn method_open(
        &self,
        w: &mut CodeWriter,
        name: &str,
        params: &[RenderedParam],
        return_type: Option<&str>,
    );
    fn method_close(&self, w: &mut CodeWriter);

    /// A counted loop from 0 (exclusive bound).
    fn loop_open(&self, w: &mut CodeWriter, index_var: &str, bound: usize);
    fn loop_close(&self, w: &mut CodeWriter);

    fn if_open(&self, w: &mut CodeWriter, condition: &str);
    /// Hinge from the then-branch into an else-branch.
    fn else_open(&self, w: &mut CodeWriter);
    fn if_close(&self, w: &mut CodeWriter);

    /// Iterate `sequence_expr` with a one-parameter lambda.
    fn lambda_open(&self, w: &mut CodeWriter, sequence_expr: &str, item_var: &str);
    fn lambda_close(&self, w: &mut CodeWriter);

    fn call_stmt(&self, w: &mut CodeWriter, receiver: &str, method: &str, args: &[String]);

    fn var_decl_stmt(&self, w: &mut CodeWriter, name: &str, type_text: &str, value: &str);

    fn return_stmt(&self, w: &mut CodeWriter, expr: &str);

    /// The known-safe trivial statement used when a bounded search finds
    /// nothing in the pool. Must compile against the bare standard library.
    fn fallback_stmt(&self, w: &mut CodeWriter);

    /// A trivially-true condition over a universally available type.
    fn fallback_condition(&self) -> String;

    /// A fixed literal sequence usable as an iteration source.
    fn fallback_sequence(&self) -> String;

    /// Render a literal value with this language's suffix rules.
    fn literal(&self, value: &LiteralValue) -> String;

    /// Render a construct-new-instance expression.
    fn new_instance(&self, type_text: &str, args: &[String]) -> String;

    /// Mark an argument for expansion into a vararg position.
    fn vararg_spread(&self, arg: &str) -> String;

    /// Render an array-of-`elem_base` value with the given per-dimension
    /// lengths. `elem_value` is an expression producing one element, for
    /// languages whose array constructors take an initializer.
    fn array_value(&self, elem_base: &str, dims: &[usize], elem_value: &str) -> String;

    /// The universal top type (`java.lang.Object` / `Any`).
    fn top_type(&self) -> &'static str;

    /// Map a fully-qualified or primitive type name into this language's
    /// spelling.
    fn type_name(&self, name: &str) -> String;

    /// Render a named type with its generic parameters substituted: each
    /// parameter becomes its upper bound, or the top type when no bound is
    /// known.
    fn display_parts(&self, name: &str, type_params: &[TypeParamDescriptor]) -> String {
        if type_params.is_empty() {
            return self.type_name(name);
        }
        let args: Vec<String> = type_params
            .iter()
            .map(|tp| {
                tp.bound
                    .as_deref()
                    .map(|b| self.type_name(b))
                    .unwrap_or_else(|| self.top_type().to_string())
            })
            .collect();
        format!("{}<{}>", self.type_name(name), args.join(", "))
    }

    /// Render a vetted type for a declaration position.
    fn display_type(&self, desc: &TypeDescriptor) -> String {
        self.display_parts(&desc.name, &desc.type_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Constructibility, TypeParamDescriptor};

    fn generic_desc() -> TypeDescriptor {
        TypeDescriptor {
            name: "com.example.Box".to_string(),
            type_params: vec![
                TypeParamDescriptor {
                    name: "T".to_string(),
                    bound: Some("java.lang.String".to_string()),
                },
                TypeParamDescriptor {
                    name: "U".to_string(),
                    bound: None,
                },
            ],
            ctor: Constructibility::Constructor(vec![]),
            methods: vec![],
        }
    }

    #[test]
    fn java_display_type_substitutes_bounds_and_top_type() {
        let b = JavaBackend;
        assert_eq!(
            b.display_type(&generic_desc()),
            "com.example.Box<java.lang.String, java.lang.Object>"
        );
    }

    #[test]
    fn kotlin_display_type_substitutes_bounds_and_top_type() {
        let b = KotlinBackend;
        assert_eq!(b.display_type(&generic_desc()), "com.example.Box<String, Any>");
    }
}
