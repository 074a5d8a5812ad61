//! Lexical scope tracking for the synthesizer.
//!
//! A [`Scope`] is a stack of frames: class scope at the bottom, then a method
//! scope, then one frame per open block (loop body, branch body, lambda
//! body). A frame's variables disappear when its block closes, so a name can
//! never leak into a sibling block. One `Scope` lives exactly as long as one
//! class's synthesis.

use rand::Rng;

/// A variable visible in some frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeVar {
    pub name: String,
    /// Fully-qualified type name.
    pub type_name: String,
    pub nullable: bool,
    /// Whether the binding came from the enclosing method's parameter list.
    pub from_param: bool,
}

/// One lexical nesting level.
#[derive(Debug, Default)]
struct Frame {
    vars: Vec<ScopeVar>,
}

/// The scope stack for one in-flight class.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<Frame>,
    /// Declaration counters indexed by depth. Counters survive frame pops,
    /// so sibling blocks at the same depth keep drawing fresh indices and
    /// their names never collide.
    counters: Vec<usize>,
    /// Running total of loops opened anywhere in this class. Loop index
    /// names derive from it, so no two loops in one method (or one class)
    /// ever share an index name.
    loops_seen: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth (number of open frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a new frame.
    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Close the innermost frame, discarding its variables.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Run `body` inside a fresh frame, closing it afterwards.
    ///
    /// All block-shaped constructs go through here so scope state can never
    /// desynchronize from the block structure being emitted.
    pub fn enter<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let result = body(self);
        self.pop();
        result
    }

    /// Declare a variable in the innermost frame, generating its name as
    /// `prefix_<scopeDepth>_<index>`.
    pub fn declare(&mut self, prefix: &str, type_name: &str, nullable: bool) -> String {
        assert!(!self.frames.is_empty(), "declare called with no open scope");
        let depth = self.frames.len() - 1;
        if self.counters.len() <= depth {
            self.counters.resize(depth + 1, 0);
        }
        let index = self.counters[depth];
        self.counters[depth] += 1;
        let name = format!("{}_{}_{}", prefix, depth, index);
        self.frames
            .last_mut()
            .expect("frame checked above")
            .vars
            .push(ScopeVar {
                name: name.clone(),
                type_name: type_name.to_string(),
                nullable,
                from_param: false,
            });
        name
    }

    /// Declare a method parameter in the innermost frame, named like
    /// [`declare`](Self::declare) but tagged as a parameter binding.
    pub fn declare_param(&mut self, type_name: &str, nullable: bool) -> String {
        let name = self.declare("param", type_name, nullable);
        self.frames
            .last_mut()
            .expect("declare_param called with no open scope")
            .vars
            .last_mut()
            .expect("declare pushed a variable")
            .from_param = true;
        name
    }

    /// Register an externally named binding (e.g. a method parameter) in the
    /// innermost frame.
    pub fn add(&mut self, var: ScopeVar) {
        self.frames
            .last_mut()
            .expect("add called with no open scope")
            .vars
            .push(var);
    }

    /// Produce the next loop index name: `i` plus two base-26 letters drawn
    /// from the class-wide loop total (`iAa`, `iAb`, ..., `iAz`, `iBa`).
    pub fn next_loop_name(&mut self) -> String {
        let n = self.loops_seen;
        self.loops_seen += 1;
        let first = (b'A' + ((n / 26) % 26) as u8) as char;
        let second = (b'a' + (n % 26) as u8) as char;
        format!("i{}{}", first, second)
    }

    /// All visible variables, innermost frame first.
    pub fn visible(&self) -> impl Iterator<Item = &ScopeVar> {
        self.frames.iter().rev().flat_map(|f| f.vars.iter())
    }

    /// The enclosing method's parameters, in declaration order.
    pub fn params(&self) -> Vec<ScopeVar> {
        self.frames
            .iter()
            .flat_map(|f| f.vars.iter())
            .filter(|v| v.from_param)
            .cloned()
            .collect()
    }

    /// All visible non-parameter locals, innermost first.
    pub fn locals(&self) -> Vec<ScopeVar> {
        self.visible().filter(|v| !v.from_param).cloned().collect()
    }

    /// Pick a random visible variable satisfying `pred`.
    pub fn pick_var_matching<R: Rng, F: Fn(&ScopeVar) -> bool>(
        &self,
        pred: F,
        rng: &mut R,
    ) -> Option<ScopeVar> {
        let matches: Vec<&ScopeVar> = self.visible().filter(|v| pred(v)).collect();
        if matches.is_empty() {
            return None;
        }
        Some(matches[rng.gen_range(0..matches.len())].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn param(name: &str, ty: &str) -> ScopeVar {
        ScopeVar {
            name: name.to_string(),
            type_name: ty.to_string(),
            nullable: false,
            from_param: true,
        }
    }

    #[test]
    fn declare_names_carry_depth_and_index() {
        let mut scope = Scope::new();
        scope.push();
        assert_eq!(scope.declare("field", "int", false), "field_0_0");
        assert_eq!(scope.declare("field", "int", false), "field_0_1");
        scope.push();
        assert_eq!(scope.declare("var", "int", false), "var_1_0");
        scope.pop();
        scope.pop();
    }

    #[test]
    fn sibling_frames_never_reuse_names() {
        let mut scope = Scope::new();
        scope.push();
        let first = scope.enter(|s| s.declare("var", "int", false));
        let second = scope.enter(|s| s.declare("var", "int", false));
        assert_eq!(first, "var_1_0");
        assert_eq!(second, "var_1_1");
        scope.pop();
    }

    #[test]
    fn enter_discards_inner_variables() {
        let mut scope = Scope::new();
        scope.push();
        scope.declare("field", "int", false);
        scope.enter(|s| {
            s.declare("var", "long", false);
            assert_eq!(s.visible().count(), 2);
        });
        assert_eq!(scope.visible().count(), 1);
        scope.pop();
    }

    #[test]
    fn visible_walks_innermost_first() {
        let mut scope = Scope::new();
        scope.push();
        scope.declare("outer", "int", false);
        scope.push();
        scope.declare("inner", "int", false);
        let names: Vec<&str> = scope.visible().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["inner_1_0", "outer_0_0"]);
        scope.pop();
        scope.pop();
    }

    #[test]
    fn loop_names_advance_in_base_26() {
        let mut scope = Scope::new();
        assert_eq!(scope.next_loop_name(), "iAa");
        assert_eq!(scope.next_loop_name(), "iAb");
        for _ in 0..24 {
            scope.next_loop_name();
        }
        assert_eq!(scope.next_loop_name(), "iBa");
    }

    #[test]
    fn params_preserve_declaration_order() {
        let mut scope = Scope::new();
        scope.push();
        scope.push();
        scope.add(param("p0", "int"));
        scope.add(param("p1", "long"));
        scope.enter(|s| {
            s.declare("var", "int", false);
            let params: Vec<String> = s.params().into_iter().map(|v| v.name).collect();
            assert_eq!(params, vec!["p0", "p1"]);
        });
        scope.pop();
        scope.pop();
    }

    #[test]
    fn pick_var_matching_honors_predicate() {
        let mut scope = Scope::new();
        scope.push();
        scope.declare("var", "int", false);
        scope.declare("var", "boolean", false);
        let mut rng = StdRng::seed_from_u64(3);
        let picked = scope
            .pick_var_matching(|v| v.type_name == "boolean", &mut rng)
            .unwrap();
        assert_eq!(picked.type_name, "boolean");
        assert!(
            scope
                .pick_var_matching(|v| v.type_name == "float", &mut rng)
                .is_none()
        );
        scope.pop();
    }
}
