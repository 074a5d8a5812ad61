//! The type universe: eligibility filtering and random type selection.
//!
//! The universe turns the raw discovered pool into vetted
//! [`TypeDescriptor`]s. A type only ever reaches the synthesizer if every
//! rule here passed; conversely, anything the filter rejects is silently
//! skipped -- an ineligible candidate is not an error.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::descriptor::{
    Constructibility, MethodDescriptor, ParamDescriptor, TypeDescriptor, TypeParamDescriptor,
    TypeRef, WellKnown, split_array,
};
use crate::pool::{RawPool, RawType, TypeKind};

/// Base-library namespaces whose types are trusted as ancestors even though
/// they are not part of the scanned pool.
const SAFE_NAMESPACES: &[&str] = &[
    "java.lang.",
    "java.util.",
    "java.io.",
    "kotlin.",
    "kotlin.collections.",
];

/// The queryable pool of vetted synthesis ingredients.
///
/// Lookup state (descriptor memoization, the empty-pool flag) is
/// per-instance; concurrent generations must each own their universe.
pub struct TypeUniverse {
    pool: RawPool,
    /// Fully-qualified name -> (module index, type index).
    by_name: HashMap<String, (usize, usize)>,
    /// Memoized eligibility results; `None` records a vetted rejection.
    descriptors: HashMap<String, Option<TypeRef>>,
    /// Memoized constructor-only resolution for the value allocator.
    constructors: HashMap<String, Option<Vec<ParamDescriptor>>>,
    /// Set after one full circular scan found nothing eligible; every later
    /// lookup short-circuits instead of rescanning.
    exhausted: bool,
}

impl TypeUniverse {
    pub fn new(pool: RawPool) -> Self {
        let mut by_name = HashMap::new();
        for (mi, module) in pool.modules.iter().enumerate() {
            for (ti, ty) in module.types.iter().enumerate() {
                by_name.insert(ty.name.clone(), (mi, ti));
            }
        }
        Self {
            pool,
            by_name,
            descriptors: HashMap::new(),
            constructors: HashMap::new(),
            exhausted: false,
        }
    }

    /// Whether a full scan has already proven the pool empty.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Pick a uniformly random eligible type.
    ///
    /// Starts at a random module/type position and advances circularly
    /// until something passes the filter or the whole pool has been visited
    /// once, at which point the universe marks itself empty and returns
    /// `None` for all future calls. The bounded probe guarantees
    /// termination even when the pool is mostly ineligible.
    pub fn pick_type<R: Rng>(&mut self, rng: &mut R) -> Option<TypeRef> {
        if self.exhausted {
            return None;
        }
        let module_count = self.pool.modules.len();
        let total = self.pool.type_count();
        if module_count == 0 || total == 0 {
            self.exhausted = true;
            return None;
        }

        let mut mi = rng.gen_range(0..module_count);
        let mut ti = match self.pool.modules[mi].types.len() {
            0 => 0,
            len => rng.gen_range(0..len),
        };

        let mut probed = 0;
        while probed < total {
            if ti < self.pool.modules[mi].types.len() {
                probed += 1;
                let name = self.pool.modules[mi].types[ti].name.clone();
                if let Some(desc) = self.descriptor(&name) {
                    return Some(desc);
                }
                ti += 1;
            } else {
                mi = (mi + 1) % module_count;
                ti = 0;
            }
        }

        self.exhausted = true;
        None
    }

    /// Resolve the vetted descriptor for a named type, if it is eligible.
    pub fn descriptor(&mut self, name: &str) -> Option<TypeRef> {
        if let Some(cached) = self.descriptors.get(name) {
            return cached.clone();
        }
        let result = self
            .by_name
            .get(name)
            .map(|&(mi, ti)| &self.pool.modules[mi].types[ti])
            .and_then(|raw| check_type(&self.pool, raw))
            .map(Arc::new);
        self.descriptors.insert(name.to_string(), result.clone());
        result
    }

    /// The declared generic type parameters of a named pool type, vetted or
    /// not. Backends need these to render construction expressions.
    pub fn generics_of(&self, name: &str) -> Vec<TypeParamDescriptor> {
        self.by_name
            .get(name)
            .map(|&(mi, ti)| &self.pool.modules[mi].types[ti])
            .map(|raw| {
                raw.type_params
                    .iter()
                    .map(|tp| TypeParamDescriptor {
                        name: tp.name.clone(),
                        bound: tp.bound.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve the eligible constructor parameter list for a named type.
    ///
    /// This is deliberately weaker than [`descriptor`](Self::descriptor):
    /// a constructor parameter type must be instantiable but does not need
    /// callable members, so the allocator resolves through here.
    pub fn constructor_of(&mut self, name: &str) -> Option<Vec<ParamDescriptor>> {
        if let Some(cached) = self.constructors.get(name) {
            return cached.clone();
        }
        let result = self
            .by_name
            .get(name)
            .map(|&(mi, ti)| &self.pool.modules[mi].types[ti])
            .filter(|raw| constructible_shape(raw))
            .and_then(|raw| eligible_ctor(&self.pool, raw));
        self.constructors.insert(name.to_string(), result.clone());
        result
    }
}

/// Whether a raw type has the shape of something a constructor call can
/// produce (regardless of member eligibility).
fn constructible_shape(raw: &RawType) -> bool {
    raw.loadable && !raw.is_abstract && raw.kind == TypeKind::Class
}

/// Full eligibility check for one raw type.
fn check_type(pool: &RawPool, raw: &RawType) -> Option<TypeDescriptor> {
    // Concrete, public, current, and actually loadable.
    if raw.kind != TypeKind::Class || raw.is_abstract {
        return None;
    }
    if !raw.is_public || raw.deprecated || !raw.loadable {
        return None;
    }
    // Loaded by the same context as the rest of the pool; anything else is
    // a platform/bootstrap copy shadowing the intended class.
    if raw.loader != pool.loader {
        return None;
    }
    // The whole ancestor chain must be safe.
    let mut visited = Vec::new();
    if !raw
        .supertypes
        .iter()
        .all(|s| is_safe_name(pool, s, &mut visited))
    {
        return None;
    }

    let ctor = eligible_ctor(pool, raw)?;
    let methods = eligible_members(pool, raw);
    if methods.is_empty() {
        return None;
    }

    Some(TypeDescriptor {
        name: raw.name.clone(),
        type_params: raw
            .type_params
            .iter()
            .map(|tp| TypeParamDescriptor {
                name: tp.name.clone(),
                bound: tp.bound.clone(),
            })
            .collect(),
        ctor: Constructibility::Constructor(ctor),
        methods,
    })
}

/// A name is safe when it is a primitive/well-known type, lives in an
/// allow-listed base namespace, or resolves within the pool to a loadable
/// type of the pool's own loading context whose ancestors are safe too.
fn is_safe_name(pool: &RawPool, name: &str, visited: &mut Vec<String>) -> bool {
    let (base, _dims) = split_array(name);
    if WellKnown::match_name(base).is_some() {
        return true;
    }
    if SAFE_NAMESPACES.iter().any(|ns| base.starts_with(ns)) {
        return true;
    }
    // Cycle guard for malformed supertype data.
    if visited.iter().any(|v| v == base) {
        return true;
    }
    visited.push(base.to_string());
    let safe = match pool.find_type(base) {
        Some(raw) => {
            raw.loadable
                && raw.loader == pool.loader
                && raw
                    .supertypes
                    .iter()
                    .all(|s| is_safe_name(pool, s, visited))
        }
        None => false,
    };
    visited.pop();
    safe
}

/// A parameter type is instantiable when it is a primitive/well-known
/// type, an array of something instantiable, or a concrete pool type with
/// an eligible constructor of its own.
///
/// The `visiting` stack rejects constructor cycles: a type currently being
/// checked cannot be required again further down, which also guarantees
/// the allocator terminates later.
fn is_instantiable(pool: &RawPool, name: &str, visiting: &mut Vec<String>) -> bool {
    let (base, _dims) = split_array(name);
    if WellKnown::match_name(base).is_some() {
        return true;
    }
    if visiting.iter().any(|v| v == base) {
        return false;
    }
    let Some(raw) = pool.find_type(base) else {
        return false;
    };
    if !constructible_shape(raw) {
        return false;
    }
    visiting.push(base.to_string());
    let ok = raw.constructors.iter().any(|c| {
        c.is_public
            && !c.deprecated
            && c.params.iter().all(|p| {
                split_array(&p.type_name).0 != raw.name
                    && is_instantiable(pool, &p.type_name, visiting)
            })
    });
    visiting.pop();
    ok
}

/// The first eligible constructor of a raw type, as a parameter list.
///
/// A constructor qualifies when it is public, not deprecated, none of its
/// parameters takes an instance of the enclosing type (which would recurse
/// at allocation time), and every parameter is instantiable.
fn eligible_ctor(pool: &RawPool, raw: &RawType) -> Option<Vec<ParamDescriptor>> {
    raw.constructors
        .iter()
        .find(|c| {
            c.is_public
                && !c.deprecated
                && c.params.iter().all(|p| {
                    let mut visiting = vec![raw.name.clone()];
                    split_array(&p.type_name).0 != raw.name
                        && is_instantiable(pool, &p.type_name, &mut visiting)
                })
        })
        .map(|c| {
            c.params
                .iter()
                .map(|p| ParamDescriptor {
                    type_name: p.type_name.clone(),
                    vararg: p.vararg,
                })
                .collect()
        })
}

/// Vet a raw member list into the callable subset.
///
/// A member qualifies when it is a public, non-deprecated instance method
/// whose value parameters are instantiable and whose parameter and return
/// types are all safe. Static members are excluded by design: the
/// synthesizer always calls through an instance.
fn eligible_members(pool: &RawPool, raw: &RawType) -> Vec<MethodDescriptor> {
    raw.methods
        .iter()
        .filter(|m| m.is_public && !m.deprecated && !m.is_static)
        .filter(|m| {
            m.params.iter().all(|p| {
                let mut visiting = Vec::new();
                let mut visited = Vec::new();
                is_instantiable(pool, &p.type_name, &mut visiting)
                    && is_safe_name(pool, &p.type_name, &mut visited)
            })
        })
        .filter(|m| match &m.return_type {
            Some(ret) => {
                let mut visited = Vec::new();
                is_safe_name(pool, ret, &mut visited)
            }
            None => true,
        })
        .map(|m| MethodDescriptor {
            name: m.name.clone(),
            params: m
                .params
                .iter()
                .map(|p| ParamDescriptor {
                    type_name: p.type_name.clone(),
                    vararg: p.vararg,
                })
                .collect(),
            return_type: m.return_type.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{RawConstructor, RawMethod, RawModule, RawParam};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plain_type(name: &str) -> RawType {
        RawType {
            name: name.to_string(),
            loader: "app".to_string(),
            constructors: vec![RawConstructor::default()],
            methods: vec![RawMethod {
                name: "poke".to_string(),
                return_type: Some("int".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn pool_of(types: Vec<RawType>) -> RawPool {
        RawPool {
            loader: "app".to_string(),
            modules: vec![RawModule {
                name: "m0".to_string(),
                types,
            }],
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn plain_concrete_type_is_eligible() {
        let mut universe = TypeUniverse::new(pool_of(vec![plain_type("a.Widget")]));
        let desc = universe.pick_type(&mut rng()).unwrap();
        assert_eq!(desc.name, "a.Widget");
        assert_eq!(desc.methods.len(), 1);
        assert!(matches!(desc.ctor, Constructibility::Constructor(ref p) if p.is_empty()));
    }

    #[test]
    fn abstract_interface_annotation_and_deprecated_are_rejected() {
        let mut abstract_ty = plain_type("a.Abstract");
        abstract_ty.is_abstract = true;
        let mut iface = plain_type("a.Iface");
        iface.kind = TypeKind::Interface;
        let mut anno = plain_type("a.Anno");
        anno.kind = TypeKind::Annotation;
        let mut deprecated = plain_type("a.Old");
        deprecated.deprecated = true;
        let mut hidden = plain_type("a.Hidden");
        hidden.is_public = false;

        let mut universe =
            TypeUniverse::new(pool_of(vec![abstract_ty, iface, anno, deprecated, hidden]));
        assert!(universe.pick_type(&mut rng()).is_none());
        assert!(universe.is_exhausted());
    }

    #[test]
    fn foreign_loader_and_unloadable_are_rejected() {
        let mut bootstrap = plain_type("a.Shadowed");
        bootstrap.loader = "bootstrap".to_string();
        let mut broken = plain_type("a.Broken");
        broken.loadable = false;

        let mut universe = TypeUniverse::new(pool_of(vec![bootstrap, broken]));
        assert!(universe.pick_type(&mut rng()).is_none());
    }

    #[test]
    fn type_without_members_or_ctor_is_rejected() {
        let mut no_methods = plain_type("a.Mute");
        no_methods.methods.clear();
        let mut no_ctor = plain_type("a.Sealed");
        no_ctor.constructors.clear();
        let mut private_ctor = plain_type("a.Locked");
        private_ctor.constructors[0].is_public = false;

        let mut universe = TypeUniverse::new(pool_of(vec![no_methods, no_ctor, private_ctor]));
        assert!(universe.pick_type(&mut rng()).is_none());
    }

    #[test]
    fn ctor_taking_own_type_is_rejected() {
        let mut ty = plain_type("a.Node");
        ty.constructors = vec![RawConstructor {
            params: vec![RawParam {
                type_name: "a.Node".to_string(),
                vararg: false,
            }],
            ..Default::default()
        }];
        let mut universe = TypeUniverse::new(pool_of(vec![ty]));
        assert!(universe.descriptor("a.Node").is_none());
    }

    #[test]
    fn mutually_recursive_ctors_are_rejected() {
        let mut a = plain_type("a.A");
        a.constructors = vec![RawConstructor {
            params: vec![RawParam {
                type_name: "a.B".to_string(),
                vararg: false,
            }],
            ..Default::default()
        }];
        let mut b = plain_type("a.B");
        b.constructors = vec![RawConstructor {
            params: vec![RawParam {
                type_name: "a.A".to_string(),
                vararg: false,
            }],
            ..Default::default()
        }];
        let mut universe = TypeUniverse::new(pool_of(vec![a, b]));
        assert!(universe.descriptor("a.A").is_none());
        assert!(universe.descriptor("a.B").is_none());
    }

    #[test]
    fn ctor_chain_through_instantiable_type_is_accepted() {
        let mut outer = plain_type("a.Outer");
        outer.constructors = vec![RawConstructor {
            params: vec![
                RawParam {
                    type_name: "int".to_string(),
                    vararg: false,
                },
                RawParam {
                    type_name: "a.Inner".to_string(),
                    vararg: false,
                },
            ],
            ..Default::default()
        }];
        let inner = plain_type("a.Inner");
        let mut universe = TypeUniverse::new(pool_of(vec![outer, inner]));
        let desc = universe.descriptor("a.Outer").unwrap();
        match &desc.ctor {
            Constructibility::Constructor(params) => assert_eq!(params.len(), 2),
            other => panic!("unexpected constructibility: {other:?}"),
        }
    }

    #[test]
    fn static_and_deprecated_members_are_filtered_out() {
        let mut ty = plain_type("a.Widget");
        ty.methods = vec![
            RawMethod {
                name: "ofStatic".to_string(),
                is_static: true,
                ..Default::default()
            },
            RawMethod {
                name: "oldPoke".to_string(),
                deprecated: true,
                ..Default::default()
            },
            RawMethod {
                name: "hidden".to_string(),
                is_public: false,
                ..Default::default()
            },
            RawMethod {
                name: "poke".to_string(),
                ..Default::default()
            },
        ];
        let mut universe = TypeUniverse::new(pool_of(vec![ty]));
        let desc = universe.descriptor("a.Widget").unwrap();
        let names: Vec<&str> = desc.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["poke"]);
    }

    #[test]
    fn member_with_unsafe_return_type_is_filtered_out() {
        let mut ty = plain_type("a.Widget");
        ty.methods.push(RawMethod {
            name: "leak".to_string(),
            return_type: Some("com.mystery.Unknown".to_string()),
            ..Default::default()
        });
        let mut universe = TypeUniverse::new(pool_of(vec![ty]));
        let desc = universe.descriptor("a.Widget").unwrap();
        assert!(desc.methods.iter().all(|m| m.name != "leak"));
    }

    #[test]
    fn unsafe_ancestor_rejects_the_whole_type() {
        let mut ty = plain_type("a.Widget");
        ty.supertypes = vec!["com.mystery.Base".to_string()];
        let mut universe = TypeUniverse::new(pool_of(vec![ty]));
        assert!(universe.descriptor("a.Widget").is_none());
    }

    #[test]
    fn allow_listed_ancestor_is_safe() {
        let mut ty = plain_type("a.Widget");
        ty.supertypes = vec!["java.lang.Object".to_string(), "java.io.Serializable".to_string()];
        let mut universe = TypeUniverse::new(pool_of(vec![ty]));
        assert!(universe.descriptor("a.Widget").is_some());
    }

    #[test]
    fn pool_resident_ancestor_with_same_loader_is_safe() {
        let base = plain_type("a.Base");
        let mut ty = plain_type("a.Widget");
        ty.supertypes = vec!["a.Base".to_string()];
        let mut universe = TypeUniverse::new(pool_of(vec![base, ty]));
        assert!(universe.descriptor("a.Widget").is_some());
    }

    #[test]
    fn empty_pool_marks_exhausted_once() {
        let mut universe = TypeUniverse::new(RawPool::default());
        assert!(universe.pick_type(&mut rng()).is_none());
        assert!(universe.is_exhausted());
        // Second call short-circuits on the cached flag.
        assert!(universe.pick_type(&mut rng()).is_none());
    }

    #[test]
    fn pick_type_is_deterministic_for_a_seed() {
        let types: Vec<RawType> = (0..8).map(|i| plain_type(&format!("a.T{i}"))).collect();
        let mut u1 = TypeUniverse::new(pool_of(types.clone()));
        let mut u2 = TypeUniverse::new(pool_of(types));
        let mut r1 = StdRng::seed_from_u64(9);
        let mut r2 = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let a = u1.pick_type(&mut r1).map(|d| d.name.clone());
            let b = u2.pick_type(&mut r2).map(|d| d.name.clone());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn constructor_of_ignores_member_eligibility() {
        // A type with a ctor but no callable members: never picked, but
        // still allocatable as a constructor parameter.
        let mut mute = plain_type("a.Mute");
        mute.methods.clear();
        let mut universe = TypeUniverse::new(pool_of(vec![mute]));
        assert!(universe.descriptor("a.Mute").is_none());
        assert_eq!(universe.constructor_of("a.Mute").unwrap().len(), 0);
    }

    #[test]
    fn probe_skips_ineligible_and_finds_the_one_eligible_type() {
        let mut types: Vec<RawType> = (0..6)
            .map(|i| {
                let mut t = plain_type(&format!("a.Dead{i}"));
                t.is_abstract = true;
                t
            })
            .collect();
        types.push(plain_type("a.Alive"));
        let mut universe = TypeUniverse::new(pool_of(types));
        for _ in 0..10 {
            let desc = universe.pick_type(&mut rng()).unwrap();
            assert_eq!(desc.name, "a.Alive");
        }
    }
}
