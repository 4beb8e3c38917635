//! Cosmetic parameters derived from the winner, so effects replay identically

use crate::config::WheelConfig;
use crate::types::{Celebration, Participant};

/// FNV-1a, 32-bit
pub fn hash_string_to_seed(input: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for unit in input.encode_utf16() {
        hash ^= u32::from(unit);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

/// Confetti seed for the `pick_number`-th winner
pub fn confetti_seed(winner_id: &str, pick_number: usize) -> u32 {
    hash_string_to_seed(winner_id).wrapping_add((pick_number as u32).wrapping_mul(101))
}

/// Build the celebration for a freshly confirmed winner
pub fn celebration_for(
    winner: &Participant,
    pick_number: usize,
    sound_enabled: bool,
    without_spin: bool,
    config: &WheelConfig,
) -> Celebration {
    Celebration {
        winner: winner.clone(),
        pick_number,
        confetti_seed: confetti_seed(&winner.id, pick_number),
        play_sound: sound_enabled,
        duration_ms: if without_spin {
            config.last_pick_celebration_ms
        } else {
            config.celebration_ms
        },
    }
}
