//! classgen: synthesize Java/Kotlin classes that are guaranteed to compile.
//!
//! Given a pool of already-compiled classes reached through a classpath
//! (scanned externally and handed over as JSON), classgen regenerates
//! synthetic class bodies whose every declaration, method call, loop,
//! conditional and lambda references only types and members that actually
//! exist and are legally usable from generated code. The output is meant
//! for build-performance benchmarking: structurally realistic, semantically
//! inert.
//!
//! # Architecture
//!
//! ```text
//! RawPool (scanner JSON)
//!     │
//!     ▼
//! TypeUniverse ── eligibility filter, pick_type ──┐
//!     │                                           │
//!     ▼                                           ▼
//! ClassSynthesizer ── scoped statement walk ── allocate (values)
//!     │
//!     ▼
//! SyntaxBackend (Java | Kotlin) ── DecorationHooks ── source text
//! ```
//!
//! Randomness is injected: every decision point draws from an explicitly
//! passed seeded RNG, so the same seed, pool, and parameters yield
//! byte-identical output, and parallel runs only need their own universe
//! and RNG.

pub mod alloc;
pub mod backend;
pub mod decor;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod pool;
pub mod profile;
pub mod scope;
pub mod synth;
pub mod universe;
pub mod writer;

pub use backend::{JavaBackend, KotlinBackend, SyntaxBackend};
pub use decor::DecorationHook;
pub use descriptor::{MethodDescriptor, TypeDescriptor, TypeRef};
pub use error::GenError;
pub use pool::RawPool;
pub use profile::{GenerationParameters, available_profiles, get_profile};
pub use synth::ClassSynthesizer;
pub use universe::TypeUniverse;
