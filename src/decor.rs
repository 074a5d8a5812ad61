//! Decoration hooks -- observers of declaration sites.
//!
//! A hook is invoked immediately before a class, method, or field
//! declaration is written and may inject extra lines (typically
//! annotations) through the same writer the backend uses. Hooks observe;
//! they can never change what the synthesizer decided to declare.

use crate::writer::CodeWriter;

/// An observer of declaration points.
///
/// Every method defaults to a no-op so implementations only override the
/// sites they care about.
pub trait DecorationHook {
    /// Called before the class declaration line.
    fn before_class(&self, _writer: &mut CodeWriter, _class_name: &str) {}

    /// Called before each method declaration line.
    fn before_method(&self, _writer: &mut CodeWriter, _method_name: &str) {}

    /// Called before each field declaration line.
    fn before_field(&self, _writer: &mut CodeWriter, _field_name: &str) {}
}

/// A hook that writes a fixed annotation line before every declaration site.
///
/// The common production use: marking generated declarations so downstream
/// tooling (e.g. lint baselines) can recognize them.
pub struct AnnotateAll {
    pub annotation: String,
}

impl DecorationHook for AnnotateAll {
    fn before_class(&self, writer: &mut CodeWriter, _class_name: &str) {
        writer.line(&self.annotation);
    }

    fn before_method(&self, writer: &mut CodeWriter, _method_name: &str) {
        writer.line(&self.annotation);
    }

    fn before_field(&self, writer: &mut CodeWriter, _field_name: &str) {
        writer.line(&self.annotation);
    }
}
