mod collisions;
mod goodness_of_fit;
mod util;

pub use collisions::collisions;
pub use goodness_of_fit::{chi_square_p_value, goodness_of_fit};
pub use util::test_rng;
