//! The scoped program synthesizer.
//!
//! This is the state machine that decides *what* one class contains: a
//! bounded random walk over fields, methods, and statement shapes, with
//! every decision drawn from an explicitly passed RNG and every declared
//! name tracked by a [`Scope`]. Every nested block wraps its body in
//! [`Scope::enter`], so scope state cannot drift from the emitted block
//! structure.
//!
//! Every "find a suitable X" search is bounded by the configured attempt
//! budget; exhaustion is a designed fallback path that still emits
//! compilable output, never an error.

use rand::Rng;

use crate::alloc::allocate;
use crate::backend::{RenderedParam, SyntaxBackend};
use crate::decor::DecorationHook;
use crate::descriptor::{FieldDescriptor, WellKnown, is_iterable_name};
use crate::error::GenError;
use crate::profile::GenerationParameters;
use crate::scope::{Scope, ScopeVar};
use crate::universe::TypeUniverse;
use crate::writer::CodeWriter;

/// Probability that a method-call statement declares a fresh receiver
/// rather than reusing an existing parameter.
const FRESH_RECEIVER_PROBABILITY: f64 = 0.7;

/// Exclusive upper bound on generated loop trip counts.
const MAX_LOOP_TRIP: usize = 7;

/// Synthesizes one class at a time against a type universe and one
/// emission backend.
pub struct ClassSynthesizer<'a> {
    universe: &'a mut TypeUniverse,
    backend: &'a dyn SyntaxBackend,
    params: &'a GenerationParameters,
    hooks: &'a [Box<dyn DecorationHook>],
}

impl<'a> ClassSynthesizer<'a> {
    pub fn new(
        universe: &'a mut TypeUniverse,
        backend: &'a dyn SyntaxBackend,
        params: &'a GenerationParameters,
    ) -> Self {
        Self {
            universe,
            backend,
            params,
            hooks: &[],
        }
    }

    /// Attach decoration hooks invoked at declaration sites.
    pub fn with_hooks(mut self, hooks: &'a [Box<dyn DecorationHook>]) -> Self {
        self.hooks = hooks;
        self
    }

    /// Generate the full source text of one class.
    pub fn generate_class<R: Rng>(
        &mut self,
        rng: &mut R,
        package: &str,
        class_name: &str,
    ) -> Result<String, GenError> {
        let mut w = CodeWriter::new();
        self.backend.package_header(&mut w, package);
        for hook in self.hooks {
            hook.before_class(&mut w, class_name);
        }
        self.backend.class_open(&mut w, class_name);

        let mut scope = Scope::new();
        scope.push();
        self.gen_fields(rng, &mut w, &mut scope)?;
        let method_count = random_in(rng, self.params.methods);
        for index in 0..method_count {
            self.gen_method(rng, &mut w, &mut scope, index)?;
        }
        scope.pop();

        self.backend.class_close(&mut w);
        Ok(w.finish())
    }

    fn gen_fields<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
    ) -> Result<(), GenError> {
        let count = random_in(rng, self.params.instance_vars);
        for _ in 0..count {
            let Some(desc) = self.universe.pick_type(rng) else {
                if self.params.instance_vars.0 == 0 {
                    // Nothing to build fields from; an empty class body is
                    // acceptable when the minimum allows it.
                    return Ok(());
                }
                return Err(GenError::EmptyUniverse("instance variable type"));
            };
            let init = allocate(self.universe, self.backend, rng, &desc.name, false)?;
            let name = scope.declare("field", &desc.name, false);
            let field = FieldDescriptor {
                name,
                type_name: desc.name.clone(),
                nullable: false,
                private: true,
            };
            for hook in self.hooks {
                hook.before_field(w, &field.name);
            }
            self.backend
                .field_decl(w, &field, &self.backend.display_type(&desc), &init);
        }
        Ok(())
    }

    fn gen_method<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
        index: usize,
    ) -> Result<(), GenError> {
        let name = format!("method{}", index);
        scope.push();

        let mut rendered = Vec::new();
        let param_count = if self.params.max_params == 0 {
            0
        } else {
            rng.gen_range(0..=self.params.max_params)
        };
        for _ in 0..param_count {
            let Some(desc) = self.universe.pick_type(rng) else {
                break;
            };
            let param_name = scope.declare_param(&desc.name, false);
            rendered.push(RenderedParam {
                name: param_name,
                type_text: self.backend.display_type(&desc),
            });
        }

        // A minority of methods return a value; the rest are void.
        let return_type = if rng.gen_bool(self.params.return_probability.clamp(0.0, 1.0)) {
            self.universe.pick_type(rng)
        } else {
            None
        };
        let return_text = return_type.as_ref().map(|d| self.backend.display_type(d));

        w.blank();
        for hook in self.hooks {
            hook.before_method(w, &name);
        }
        self.backend
            .method_open(w, &name, &rendered, return_text.as_deref());

        let stmt_count = random_in(rng, self.params.method_statements);
        for _ in 0..stmt_count {
            self.add_block(rng, w, scope, 0)?;
        }
        if let Some(ret) = &return_type {
            let expr = allocate(self.universe, self.backend, rng, &ret.name, false)?;
            self.backend.return_stmt(w, &expr);
        }

        self.backend.method_close(w);
        scope.pop();
        Ok(())
    }

    /// Pick and emit one statement.
    ///
    /// The draw is weighted (defaults: 2 loop / 5 call / 1 lambda / 2
    /// branch out of 10), biasing bodies toward method calls the way real
    /// application code leans. Past the nesting cap every draw degrades to
    /// a call statement, which keeps generation depth-bounded.
    fn add_block<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), GenError> {
        let weights = &self.params.weights;
        let total = weights.total();
        if total == 0 {
            self.backend.fallback_stmt(w);
            return Ok(());
        }
        let draw = rng.gen_range(0..total);
        let can_nest = depth < self.params.max_block_depth;

        let mut edge = weights.loops;
        if draw < edge {
            if can_nest {
                return self.stmt_loop(rng, w, scope, depth);
            }
            return self.stmt_method_call(rng, w, scope);
        }
        edge += weights.calls;
        if draw < edge {
            return self.stmt_method_call(rng, w, scope);
        }
        edge += weights.lambdas;
        if draw < edge {
            if can_nest {
                return self.stmt_lambda(rng, w, scope, depth);
            }
            return self.stmt_method_call(rng, w, scope);
        }
        if can_nest {
            return self.stmt_if(rng, w, scope, depth);
        }
        self.stmt_method_call(rng, w, scope)
    }

    fn stmt_loop<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), GenError> {
        let index_var = scope.next_loop_name();
        let bound = rng.gen_range(0..MAX_LOOP_TRIP);
        self.backend.loop_open(w, &index_var, bound);
        scope.enter(|scope| -> Result<(), GenError> {
            scope.add(ScopeVar {
                name: index_var.clone(),
                type_name: "int".to_string(),
                nullable: false,
                from_param: false,
            });
            let count = bounded_count(rng, self.params.max_blocks_in_loop);
            for _ in 0..count {
                self.add_block(rng, w, scope, depth + 1)?;
            }
            Ok(())
        })?;
        self.backend.loop_close(w);
        Ok(())
    }

    fn stmt_method_call<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
    ) -> Result<(), GenError> {
        if rng.gen_bool(FRESH_RECEIVER_PROBABILITY) {
            // Fresh receiver: declare a new local of a picked type, then
            // call one of its members.
            for _ in 0..self.params.attempts {
                let Some(desc) = self.universe.pick_type(rng) else {
                    continue;
                };
                let Some(method) = desc.pick_method(rng).cloned() else {
                    continue;
                };
                let init = allocate(self.universe, self.backend, rng, &desc.name, false)?;
                let var = scope.declare("var", &desc.name, false);
                self.backend
                    .var_decl_stmt(w, &var, &self.backend.display_type(&desc), &init);
                let mut args = Vec::with_capacity(method.params.len());
                for p in &method.params {
                    args.push(allocate(
                        self.universe,
                        self.backend,
                        rng,
                        &p.type_name,
                        p.vararg,
                    )?);
                }
                self.backend.call_stmt(w, &var, &method.name, &args);
                return Ok(());
            }
            // The universe offered nothing within the budget; the trivial
            // statement keeps this slot compilable.
            self.backend.fallback_stmt(w);
            return Ok(());
        }

        // Existing receiver: the first parameter whose type exposes a
        // callable member. Parameters are a fixed finite set, so this path
        // has no retry budget and silently emits nothing when none
        // qualifies.
        for param in scope.params() {
            let Some(desc) = self.universe.descriptor(&param.type_name) else {
                continue;
            };
            let method = match desc.pick_method(rng) {
                Some(m) => m.clone(),
                None => continue,
            };
            let mut args = Vec::with_capacity(method.params.len());
            for p in &method.params {
                args.push(allocate(
                    self.universe,
                    self.backend,
                    rng,
                    &p.type_name,
                    p.vararg,
                )?);
            }
            self.backend.call_stmt(w, &param.name, &method.name, &args);
            return Ok(());
        }
        Ok(())
    }

    fn stmt_if<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), GenError> {
        let condition = self
            .find_zero_arg_call(rng, scope, WellKnown::is_boolean)
            .unwrap_or_else(|| self.backend.fallback_condition());
        self.backend.if_open(w, &condition);
        scope.enter(|scope| -> Result<(), GenError> {
            let count = bounded_count(rng, self.params.max_blocks_in_if);
            for _ in 0..count {
                self.add_block(rng, w, scope, depth + 1)?;
            }
            Ok(())
        })?;
        if rng.gen_bool(0.5) {
            self.backend.else_open(w);
            scope.enter(|scope| -> Result<(), GenError> {
                let count = bounded_count(rng, self.params.max_blocks_in_else);
                for _ in 0..count {
                    self.add_block(rng, w, scope, depth + 1)?;
                }
                Ok(())
            })?;
        }
        self.backend.if_close(w);
        Ok(())
    }

    fn stmt_lambda<R: Rng>(
        &mut self,
        rng: &mut R,
        w: &mut CodeWriter,
        scope: &mut Scope,
        depth: usize,
    ) -> Result<(), GenError> {
        let sequence = self
            .find_zero_arg_call(rng, scope, is_iterable_name)
            .unwrap_or_else(|| self.backend.fallback_sequence());
        scope.enter(|scope| -> Result<(), GenError> {
            let item = scope.declare("item", self.backend.top_type(), false);
            self.backend.lambda_open(w, &sequence, &item);
            let count = bounded_count(rng, self.params.max_blocks_in_lambda);
            for _ in 0..count {
                self.add_block(rng, w, scope, depth + 1)?;
            }
            Ok(())
        })?;
        self.backend.lambda_close(w);
        Ok(())
    }

    /// Bounded random search for `receiver.member()` where the member takes
    /// no arguments and its return type satisfies `pred`. Parameters are
    /// preferred over locals, matching how hand-written code tends to lean
    /// on its inputs.
    fn find_zero_arg_call<R: Rng>(
        &mut self,
        rng: &mut R,
        scope: &Scope,
        pred: fn(&str) -> bool,
    ) -> Option<String> {
        let params = scope.params();
        if let Some(call) = self.search_receivers(rng, &params, pred) {
            return Some(call);
        }
        let locals = scope.locals();
        self.search_receivers(rng, &locals, pred)
    }

    fn search_receivers<R: Rng>(
        &mut self,
        rng: &mut R,
        vars: &[ScopeVar],
        pred: fn(&str) -> bool,
    ) -> Option<String> {
        if vars.is_empty() {
            return None;
        }
        for _ in 0..self.params.attempts {
            let var = &vars[rng.gen_range(0..vars.len())];
            let Some(desc) = self.universe.descriptor(&var.type_name) else {
                continue;
            };
            let candidates: Vec<String> = desc
                .zero_arg_returning(pred)
                .map(|m| m.name.clone())
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let method = &candidates[rng.gen_range(0..candidates.len())];
            return Some(format!("{}.{}()", var.name, method));
        }
        None
    }
}

/// Draw from an inclusive `(min, max)` range, tolerating inverted bounds.
fn random_in<R: Rng>(rng: &mut R, bounds: (usize, usize)) -> usize {
    let (min, max) = bounds;
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Draw a statement count for a block body capped at `max` (0 empties the
/// body).
fn bounded_count<R: Rng>(rng: &mut R, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    rng.gen_range(0..=max)
}
