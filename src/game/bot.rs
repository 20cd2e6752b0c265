//! Autonomous bot policy
//!
//! Bots are ordinary players driven by the server instead of a
//! connection. They go through the same movement and combat resolution
//! as humans; the only bot-specific behavior is the per-tick decision
//! made here and the respawn scheduled on death.

use rand::Rng;

/// What a bot rolled for this tick. The forward step itself is always
/// attempted and needs no roll; a new heading is picked separately when
/// that step gets rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotDecision {
    pub shoot: bool,
}

/// Stateless per-tick bot policy
pub struct BotPolicy;

impl BotPolicy {
    /// Roll the fire decision for one bot for one tick
    pub fn decide<R: Rng>(rng: &mut R, shoot_probability: f64) -> BotDecision {
        BotDecision {
            shoot: rng.gen_bool(shoot_probability),
        }
    }

    /// Fresh facing picked after a blocked forward step
    pub fn random_heading<R: Rng>(rng: &mut R) -> f32 {
        rng.gen_range(0.0..std::f32::consts::TAU)
    }

    /// Display name for the n-th startup bot (1-based)
    pub fn nickname(index: usize) -> String {
        format!("Bot {}", index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_probability_never_shoots() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(!BotPolicy::decide(&mut rng, 0.0).shoot);
        }
    }

    #[test]
    fn unit_probability_always_shoots() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(BotPolicy::decide(&mut rng, 1.0).shoot);
        }
    }

    #[test]
    fn random_heading_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..1000 {
            let heading = BotPolicy::random_heading(&mut rng);
            assert!((0.0..std::f32::consts::TAU).contains(&heading));
        }
    }
}
