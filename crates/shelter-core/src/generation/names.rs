//! Name generation for newcomers

use rand::seq::SliceRandom;
use rand::Rng;

/// Name for a stranger at the door, numbered after the current population
pub fn wanderer_name(rng: &mut impl Rng, number: usize) -> String {
    let base = WANDERER_NAMES.choose(rng).copied().unwrap_or("Wanderer");
    format!("{base} #{number}")
}

/// Name for a child born in the living quarters
pub fn birth_name(rng: &mut impl Rng, number: usize) -> String {
    let base = BIRTH_NAMES.choose(rng).copied().unwrap_or("Alex");
    format!("{base}_{number}")
}

static WANDERER_NAMES: &[&str] = &[
    "Wanderer", "Stranger", "Nomad", "Survivor", "Traveler", "Scout", "Drifter",
    // Given names
    "Mara", "Jax", "Riley", "Morgan", "Ash", "Sky", "Blake", "Quinn",
];

static BIRTH_NAMES: &[&str] = &[
    "Alex", "Sam", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Skyler", "Jamie", "Avery",
    "Drew", "Quinn", "Rowan", "Parker", "Reese",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_name_formats() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let wanderer = wanderer_name(&mut rng, 4);
        assert!(wanderer.ends_with(" #4"));
        assert!(WANDERER_NAMES.iter().any(|n| wanderer.starts_with(n)));

        let child = birth_name(&mut rng, 7);
        assert!(child.ends_with("_7"));
    }
}
