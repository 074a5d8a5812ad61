//! Java rendering of synthesizer decisions.
//!
//! Java keeps pool types fully qualified, which sidesteps import management
//! entirely; only the well-known primitives map to their keyword forms.

use crate::backend::{RenderedParam, SyntaxBackend};
use crate::descriptor::{FieldDescriptor, LiteralValue};
use crate::writer::CodeWriter;

pub struct JavaBackend;

impl SyntaxBackend for JavaBackend {
    fn name(&self) -> &'static str {
        "java"
    }

    fn file_name(&self, class_name: &str) -> String {
        format!("{}.java", class_name)
    }

    fn package_header(&self, w: &mut CodeWriter, package: &str) {
        w.line(&format!("package {};", package));
        w.blank();
    }

    fn class_open(&self, w: &mut CodeWriter, class_name: &str) {
        w.open(&format!("public class {} {{", class_name));
    }

    fn class_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn field_decl(&self, w: &mut CodeWriter, field: &FieldDescriptor, type_text: &str, init: &str) {
        let visibility = if field.private { "private " } else { "public " };
        w.line(&format!(
            "{}{} {} = {};",
            visibility, type_text, field.name, init
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
            .map(|p| format!("{} {}", p.type_text, p.name))
            .collect();
        let ret = return_type.unwrap_or("void");
        w.open(&format!(
            "public {} {}({}) {{",
            ret,
            name,
            params_text.join(", ")
        ));
    }

    fn method_close(&self, w: &mut CodeWriter) {
        w.close("}");
    }

    fn loop_open(&self, w: &mut CodeWriter, index_var: &str, bound: usize) {
        w.open(&format!(
            "for (int {var} = 0; {var} < {bound}; {var}++) {{",
            var = index_var,
            bound = bound
        ));
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
        w.open(&format!("{}.forEach({} -> {{", sequence_expr, item_var));
    }

    fn lambda_close(&self, w: &mut CodeWriter) {
        w.close("});");
    }

    fn call_stmt(&self, w: &mut CodeWriter, receiver: &str, method: &str, args: &[String]) {
        w.line(&format!("{}.{}({});", receiver, method, args.join(", ")));
    }

    fn var_decl_stmt(&self, w: &mut CodeWriter, name: &str, type_text: &str, value: &str) {
        w.line(&format!("{} {} = {};", type_text, name, value));
    }

    fn return_stmt(&self, w: &mut CodeWriter, expr: &str) {
        w.line(&format!("return {};", expr));
    }

    fn fallback_stmt(&self, w: &mut CodeWriter) {
        w.line("\"stable\".equals(\"stable\");");
    }

    fn fallback_condition(&self) -> String {
        "\"on\".equals(\"on\")".to_string()
    }

    fn fallback_sequence(&self) -> String {
        "java.util.Arrays.asList(1, 2, 3)".to_string()
    }

    fn literal(&self, value: &LiteralValue) -> String {
        match value {
            LiteralValue::Int(v) => format!("{}", v),
            LiteralValue::Long(v) => format!("{}L", v),
            LiteralValue::Float(v) => format!("{:.2}f", v),
            LiteralValue::Double(v) => format!("{:.2}d", v),
            LiteralValue::Bool(v) => format!("{}", v),
            LiteralValue::Char(v) => format!("'{}'", v),
            LiteralValue::Str(v) => format!("\"{}\"", v),
        }
    }

    fn new_instance(&self, type_text: &str, args: &[String]) -> String {
        format!("new {}({})", type_text, args.join(", "))
    }

    fn vararg_spread(&self, arg: &str) -> String {
        // Java varargs accept loose elements; no marker needed.
        arg.to_string()
    }

    fn array_value(&self, elem_base: &str, dims: &[usize], _elem_value: &str) -> String {
        let dims_text: String = dims.iter().map(|d| format!("[{}]", d)).collect();
        format!("new {}{}", self.type_name(elem_base), dims_text)
    }

    fn top_type(&self) -> &'static str {
        "java.lang.Object"
    }

    fn type_name(&self, name: &str) -> String {
        // Kotlin spellings of primitives may leak in from mixed pools;
        // everything else stays fully qualified.
        match name {
            "kotlin.Int" => "int".to_string(),
            "kotlin.Long" => "long".to_string(),
            "kotlin.Float" => "float".to_string(),
            "kotlin.Double" => "double".to_string(),
            "kotlin.Boolean" => "boolean".to_string(),
            "kotlin.Char" => "char".to_string(),
            "kotlin.String" => "java.lang.String".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::WellKnown;

    #[test]
    fn literal_suffixes() {
        let b = JavaBackend;
        assert_eq!(b.literal(&LiteralValue::Int(42)), "42");
        assert_eq!(b.literal(&LiteralValue::Long(42)), "42L");
        assert_eq!(b.literal(&LiteralValue::Float(1.5)), "1.50f");
        assert_eq!(b.literal(&LiteralValue::Double(1.5)), "1.50d");
        assert_eq!(b.literal(&LiteralValue::Str("sample".into())), "\"sample\"");
        assert_eq!(b.literal(&LiteralValue::Char('g')), "'g'");
    }

    #[test]
    fn class_and_method_skeleton() {
        let b = JavaBackend;
        let mut w = CodeWriter::new();
        b.package_header(&mut w, "com.example");
        b.class_open(&mut w, "ClassAAA");
        b.method_open(
            &mut w,
            "method0",
            &[RenderedParam {
                name: "param_1_0".to_string(),
                type_text: "com.example.Widget".to_string(),
            }],
            None,
        );
        b.method_close(&mut w);
        b.class_close(&mut w);
        let text = w.finish();
        assert!(text.starts_with("package com.example;\n"));
        assert!(text.contains("public class ClassAAA {"));
        assert!(text.contains("    public void method0(com.example.Widget param_1_0) {"));
    }

    #[test]
    fn loop_and_branch_shapes() {
        let b = JavaBackend;
        let mut w = CodeWriter::new();
        b.loop_open(&mut w, "iAa", 5);
        b.if_open(&mut w, "x.isReady()");
        b.else_open(&mut w);
        b.if_close(&mut w);
        b.loop_close(&mut w);
        let text = w.finish();
        assert!(text.contains("for (int iAa = 0; iAa < 5; iAa++) {"));
        assert!(text.contains("    if (x.isReady()) {"));
        assert!(text.contains("    } else {"));
    }

    #[test]
    fn lambda_closes_with_paren() {
        let b = JavaBackend;
        let mut w = CodeWriter::new();
        b.lambda_open(&mut w, "java.util.Arrays.asList(1, 2, 3)", "item_2_0");
        b.lambda_close(&mut w);
        let text = w.finish();
        assert!(text.contains(".forEach(item_2_0 -> {"));
        assert!(text.trim_end().ends_with("});"));
    }

    #[test]
    fn array_value_lists_every_dimension() {
        let b = JavaBackend;
        assert_eq!(b.array_value("int", &[3, 2], ""), "new int[3][2]");
        assert_eq!(
            b.array_value("java.lang.String", &[4], ""),
            "new java.lang.String[4]"
        );
    }

    #[test]
    fn new_instance_uses_new_keyword() {
        let b = JavaBackend;
        assert_eq!(
            b.new_instance("com.example.Widget", &["1".into(), "true".into()]),
            "new com.example.Widget(1, true)"
        );
    }

    #[test]
    fn type_name_maps_kotlin_primitives() {
        let b = JavaBackend;
        assert_eq!(b.type_name("kotlin.Int"), "int");
        assert_eq!(b.type_name("com.example.Widget"), "com.example.Widget");
    }

    #[test]
    fn well_known_names_match_java_keywords() {
        // The mapped keyword spellings must still be recognized as
        // well-known so the allocator keeps its literal rules for them.
        let b = JavaBackend;
        assert!(WellKnown::match_name(&b.type_name("kotlin.Int")).is_some());
    }
}
