//! Kotlin rendering of synthesizer decisions.
//!
//! Kotlin maps JVM primitive and `java.lang` spellings to its own local
//! names and spells varargs with an explicit spread.

use crate::backend::{RenderedParam, SyntaxBackend};
use crate::descriptor::{FieldDescriptor, LiteralValue, WellKnown};
use crate::writer::CodeWriter;

pub struct KotlinBackend;

impl SyntaxBackend for KotlinBackend {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn file_name(&self, class_name: &str) -> String {
        format!("{}.kt", class_name)
    }

    fn package_header(&self, w: &mut CodeWriter, package: &str) {
        w.line(&format!("package {}", package));
        w.blank();
    }

    fn class_open(&self, w: &mut CodeWriter, class_name: &str) {
        w.open(&format!("class {} {{", class_name));
    }

    fn class_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn field_decl(&self, w: &mut CodeWriter, field: &FieldDescriptor, type_text: &str, init: &str) {
        let visibility = if field.private { "private " } else { "" };
        let suffix = if field.nullable { "?" } else { "" };
        w.line(&format!(
            "{}val {}: {}{} = {}",
            visibility, field.name, type_text, suffix, init
        ));
    }

    fn method_open(
        &self,
        w: &mut CodeWriter,
        name: &str,
        params: &[RenderedParam],
        return_type: Option<&str>,
    ) {
        let params_text: Vec<String> = params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_text))
            .collect();
        let ret = return_type.map(|r| format!(": {}", r)).unwrap_or_default();
        w.open(&format!("fun {}({}){} {{", name, params_text.join(", "), ret));
    }

    fn method_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn loop_open(&self, w: &mut CodeWriter, index_var: &str, bound: usize) {
        w.open(&format!("for ({} in 0 until {}) {{", index_var, bound));
    }

    fn loop_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn if_open(&self, w: &mut CodeWriter, condition: &str) {
        w.open(&format!("if ({}) {{", condition));
    }

    fn else_open(&self, w: &mut CodeWriter) {
        w.hinge("} else {");
    }

    fn if_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn lambda_open(&self, w: &mut CodeWriter, sequence_expr: &str, item_var: &str) {
        w.open(&format!("{}.forEach {{ {} ->", sequence_expr, item_var));
    }

    fn lambda_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn call_stmt(&self, w: &mut CodeWriter, receiver: &str, method: &str, args: &[String]) {
        w.line(&format!("{}.{}({})", receiver, method, args.join(", ")));
    }

    fn var_decl_stmt(&self, w: &mut CodeWriter, name: &str, type_text: &str, value: &str) {
        w.line(&format!("val {}: {} = {}", name, type_text, value));
    }

    fn return_stmt(&self, w: &mut CodeWriter, expr: &str) {
        w.line(&format!("return {}", expr));
    }

    fn fallback_stmt(&self, w: &mut CodeWriter) {
        w.line("\"stable\" == \"stable\"");
    }

    fn fallback_condition(&self) -> String {
        "\"on\" == \"on\"".to_string()
    }

    fn fallback_sequence(&self) -> String {
        "listOf(1, 2, 3)".to_string()
    }

    fn literal(&self, value: &LiteralValue) -> String {
        match value {
            LiteralValue::Int(v) => format!("{}", v),
            LiteralValue::Long(v) => format!("{}L", v),
            LiteralValue::Float(v) => format!("{:.2}f", v),
            LiteralValue::Double(v) => format!("{:.2}", v),
            LiteralValue::Bool(v) => format!("{}", v),
            LiteralValue::Char(v) => format!("'{}'", v),
            LiteralValue::Str(v) => format!("\"{}\"", v),
        }
    }

    fn new_instance(&self, type_text: &str, args: &[String]) -> String {
        format!("{}({})", type_text, args.join(", "))
    }

    fn vararg_spread(&self, arg: &str) -> String {
        format!("*arrayOf({})", arg)
    }

    fn array_value(&self, elem_base: &str, dims: &[usize], elem_value: &str) -> String {
        let innermost = match WellKnown::match_name(elem_base) {
            Some(WellKnown::Int) => format!("IntArray({})", dims[dims.len() - 1]),
            Some(WellKnown::Long) => format!("LongArray({})", dims[dims.len() - 1]),
            Some(WellKnown::Float) => format!("FloatArray({})", dims[dims.len() - 1]),
            Some(WellKnown::Double) => format!("DoubleArray({})", dims[dims.len() - 1]),
            Some(WellKnown::Boolean) => format!("BooleanArray({})", dims[dims.len() - 1]),
            Some(WellKnown::Char) => format!("CharArray({})", dims[dims.len() - 1]),
            _ => format!("Array({}) {{ {} }}", dims[dims.len() - 1], elem_value),
        };
        dims[..dims.len() - 1]
            .iter()
            .rev()
            .fold(innermost, |inner, d| format!("Array({}) {{ {} }}", d, inner))
    }

    fn top_type(&self) -> &'static str {
        "Any"
    }

    fn type_name(&self, name: &str) -> String {
        match name {
            "int" | "java.lang.Integer" => "Int".to_string(),
            "long" | "java.lang.Long" => "Long".to_string(),
            "float" | "java.lang.Float" => "Float".to_string(),
            "double" | "java.lang.Double" => "Double".to_string(),
            "boolean" | "java.lang.Boolean" => "Boolean".to_string(),
            "char" | "java.lang.Character" => "Char".to_string(),
            "java.lang.String" | "java.lang.CharSequence" => "String".to_string(),
            other => other
                .strip_prefix("kotlin.")
                .filter(|rest| !rest.contains('.'))
                .map(|rest| rest.to_string())
                .unwrap_or_else(|| other.to_string()),
        }
    }
}
