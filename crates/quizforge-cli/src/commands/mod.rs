pub mod init;
pub mod publish;
pub mod take;
pub mod validate;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded RNG when `--seed` is given, otherwise seeded from the OS.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
