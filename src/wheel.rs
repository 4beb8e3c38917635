//! Spin resolution and wheel geometry
//!
//! Angles are in degrees. Segment 0 starts at the top of the wheel (under the
//! pointer) and segments run clockwise. In drawing coordinates 0° points to
//! 3 o'clock and angles grow clockwise, so the top is -90°.
//!
//! Rotating the wheel by `R` moves a segment's local angle to `local + R`.
//! For segment `N` to sit under the pointer we need
//! `N * seg + seg / 2 - 90 + R = 270 (mod 360)`, i.e.
//! `R = 360 - (N + 0.5) * seg (mod 360)`.

use crate::config::WheelConfig;
use crate::random::RandomSource;
use crate::types::{Participant, WheelSegment};

/// Segment fill colors, cycled when there are more participants than entries
pub const SEGMENT_COLORS: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#FFE66D", "#FF8ED4", "#95E1D3", "#F38181", "#AA96DA", "#FCBAD3",
    "#A8D8EA", "#FFB347", "#87CEEB", "#DDA0DD", "#98D8C8", "#F7DC6F", "#BB8FCE",
];

/// Outcome of one spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinResolution {
    pub winner: Participant,
    pub winner_index: usize,
    pub segment_angle: f64,
    /// Absolute rotation, strictly greater than the rotation passed in
    pub target_rotation: f64,
    /// Extra full turns included in `target_rotation`
    pub full_rotations: u32,
}

/// Picks winners and works out where the wheel has to stop
#[derive(Debug, Clone)]
pub struct SpinResolver {
    min_extra_rotations: u32,
    max_extra_rotations: u32,
    landing_jitter: f64,
}

impl SpinResolver {
    pub fn new(config: &WheelConfig) -> Self {
        let config = config.clone().normalized();
        Self {
            min_extra_rotations: config.min_extra_rotations,
            max_extra_rotations: config.max_extra_rotations,
            landing_jitter: config.landing_jitter,
        }
    }

    /// Choose a uniformly random winner from `active` (already in wheel order)
    /// and the absolute rotation that lands the pointer on it.
    ///
    /// Returns `None` when `active` is empty. Draws from `rng` in this order:
    /// winner index, extra rotations, landing offset.
    pub fn resolve(
        &self,
        active: &[Participant],
        current_rotation: f64,
        rng: &mut dyn RandomSource,
    ) -> Option<SpinResolution> {
        if active.is_empty() {
            return None;
        }

        let count = active.len();
        let seg = segment_angle(count);
        let winner_index = rng.next_index(count);

        let span = (self.max_extra_rotations - self.min_extra_rotations + 1) as usize;
        let full_rotations = self.min_extra_rotations + rng.next_index(span) as u32;

        // Offset within +/- jitter of a segment keeps the pointer off the borders
        let offset = (rng.next_f64() - 0.5) * 2.0 * self.landing_jitter * seg;

        let target_base = base_rotation_for(winner_index, count);
        let current_normalized = current_rotation.rem_euclid(360.0);
        let target_normalized = (target_base + offset).rem_euclid(360.0);

        let additional = (target_normalized - current_normalized).rem_euclid(360.0);
        let target_rotation = current_rotation + f64::from(full_rotations) * 360.0 + additional;

        tracing::debug!(
            "Resolved spin: winner #{} of {} ({}), {} turns, target {:.2}",
            winner_index,
            count,
            active[winner_index].name,
            full_rotations,
            target_rotation
        );

        Some(SpinResolution {
            winner: active[winner_index].clone(),
            winner_index,
            segment_angle: seg,
            target_rotation,
            full_rotations,
        })
    }
}

pub fn segment_angle(count: usize) -> f64 {
    if count == 0 {
        360.0
    } else {
        360.0 / count as f64
    }
}

/// Center of segment `index` on an unrotated wheel, in drawing coordinates
pub fn segment_center_angle(index: usize, count: usize) -> f64 {
    let seg = segment_angle(count);
    index as f64 * seg + seg / 2.0 - 90.0
}

/// Rotation in [0, 360) that puts the center of segment `index` under the pointer
pub fn base_rotation_for(index: usize, count: usize) -> f64 {
    (360.0 - (index as f64 + 0.5) * segment_angle(count)).rem_euclid(360.0)
}

/// Which segment sits under the pointer after rotating the wheel by `rotation`
pub fn segment_under_pointer(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let local = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
    let idx = (local / segment_angle(count)).floor() as usize;
    Some(idx.min(count - 1))
}

/// Drawable slices for the given participants, in wheel order
pub fn segment_layout(active: &[Participant]) -> Vec<WheelSegment> {
    let count = active.len();
    let seg = segment_angle(count);

    active
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let start_angle = index as f64 * seg - 90.0;
            WheelSegment {
                participant_id: p.id.clone(),
                name: p.name.clone(),
                index,
                start_angle,
                end_angle: start_angle + seg,
                center_angle: segment_center_angle(index, count),
                color: SEGMENT_COLORS[index % SEGMENT_COLORS.len()].to_string(),
            }
        })
        .collect()
}
