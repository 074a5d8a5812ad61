//! The value allocator: an expression that yields a value of a given type.
//!
//! Well-known primitive and text types become literals; arrays recurse per
//! dimension with independently random lengths; everything else resolves
//! its eligible constructor through the universe and recurses per
//! parameter. A type with neither a literal rule nor a constructor should
//! have been filtered out upstream, so hitting one here is fatal.

use rand::Rng;

use crate::backend::SyntaxBackend;
use crate::descriptor::{WellKnown, split_array};
use crate::error::GenError;
use crate::universe::TypeUniverse;

/// Maximum declared length of one generated array dimension (exclusive).
const MAX_ARRAY_LEN: usize = 4;

/// Produce a source expression of the requested type.
///
/// `vararg` marks a vararg parameter position: the allocated value gets the
/// backend's spread/expansion marker.
pub fn allocate<R: Rng>(
    universe: &mut TypeUniverse,
    backend: &dyn SyntaxBackend,
    rng: &mut R,
    type_name: &str,
    vararg: bool,
) -> Result<String, GenError> {
    if vararg {
        let value = allocate(universe, backend, rng, type_name, false)?;
        return Ok(backend.vararg_spread(&value));
    }

    let (base, dims) = split_array(type_name);
    if dims > 0 {
        let lengths: Vec<usize> = (0..dims).map(|_| rng.gen_range(1..MAX_ARRAY_LEN)).collect();
        let elem_value = allocate(universe, backend, rng, base, false)?;
        return Ok(backend.array_value(base, &lengths, &elem_value));
    }

    if let Some(well_known) = WellKnown::match_name(base) {
        let value = well_known.draw_value(rng);
        return Ok(backend.literal(&value));
    }

    // Class type: resolve the eligible constructor and recurse.
    let Some(params) = universe.constructor_of(base) else {
        return Err(GenError::NoAllocationRule(base.to_string()));
    };
    let mut args = Vec::with_capacity(params.len());
    for param in &params {
        args.push(allocate(
            universe,
            backend,
            rng,
            &param.type_name,
            param.vararg,
        )?);
    }
    let type_text = backend.display_parts(base, &universe.generics_of(base));
    Ok(backend.new_instance(&type_text, &args))
}
