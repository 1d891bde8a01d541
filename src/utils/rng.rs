use rand::{rngs::StdRng, SeedableRng};

/// The single sequential generator threaded through one whole decision:
/// node expansion, selection tie-breaks and rollout sampling all draw from
/// it, so a fixed seed reproduces the search exactly.
pub fn make_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
