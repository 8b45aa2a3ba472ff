use rand::Rng;

use crate::space::{Aabb, Vec3};

/// One bar of the chime row. Base geometry is fixed for the session;
/// `lit` and `scale` are per-frame visual state read by the renderer.
#[derive(Clone, Debug)]
pub struct Chime {
    center: Vec3,
    half_extents: Vec3,
    rank: usize,
    touched: bool,
    lit: bool,
    scale: f32,
}

impl Chime {
    /// 1-based musical rank, stable for the session.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[must_use]
    pub fn lit(&self) -> bool {
        self.lit
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Static layout of the row: a line of boxes along x, rising in height
/// with rank.
#[derive(Clone, Copy, Debug)]
pub struct RowLayout {
    pub count: usize,
    pub width: f32,
    pub min_height: f32,
    pub height_step: f32,
    pub gap: f32,
    pub z_offset: f32,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            count: 10,
            width: 0.1,
            min_height: 1.0,
            height_step: 0.1,
            gap: 0.05,
            z_offset: -0.5,
        }
    }
}

/// The ordered chime set. Iteration order is rank order; collision code
/// relies on it for deterministic tie-breaks.
#[derive(Clone, Debug)]
pub struct ChimeRow {
    chimes: Vec<Chime>,
}

impl ChimeRow {
    #[must_use]
    pub fn new(layout: &RowLayout) -> Self {
        let pitch = layout.width + layout.gap;
        let chimes = (0..layout.count)
            .map(|i| {
                let height = layout.min_height + layout.height_step * i as f32;
                let x = (i as f32 - layout.count as f32 / 2.0) * pitch;
                Chime {
                    center: Vec3::new(x, height * 0.5, layout.z_offset),
                    half_extents: Vec3::new(layout.width * 0.5, height * 0.5, layout.width * 0.5),
                    rank: i + 1,
                    touched: false,
                    lit: false,
                    scale: 1.0,
                }
            })
            .collect();
        Self { chimes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chimes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chimes.is_empty()
    }

    #[must_use]
    pub fn chimes(&self) -> &[Chime] {
        &self.chimes
    }

    /// Bounds derive from the base geometry, not the transient scale
    /// pulse, so hit-testing stays stable while a chime visually pulses.
    #[must_use]
    pub fn bounds(&self, index: usize) -> Aabb {
        let chime = &self.chimes[index];
        Aabb::from_center_half_extents(chime.center, chime.half_extents)
    }

    /// Normalized contact intensity of a chime, `rank / count` in (0, 1].
    #[must_use]
    pub fn intensity(&self, index: usize) -> f32 {
        self.chimes[index].rank as f32 / self.chimes.len() as f32
    }

    /// Start of the per-frame clear -> mark -> reset pass.
    pub fn clear_touches(&mut self) {
        for chime in &mut self.chimes {
            chime.touched = false;
        }
    }

    /// Mark a chime as touched this frame: lit, with a scale pulse that
    /// shimmers proportionally to the chime's intensity.
    pub fn mark_touched(&mut self, index: usize) {
        let intensity = self.intensity(index);
        let jitter: f32 = rand::rng().random();
        let chime = &mut self.chimes[index];
        chime.touched = true;
        chime.lit = true;
        chime.scale = 1.0 + jitter * 0.1 * intensity;
    }

    /// End of the pass: every chime not marked this frame returns to
    /// baseline within the same frame.
    pub fn reset_untouched(&mut self) {
        for chime in &mut self.chimes {
            if !chime.touched {
                chime.lit = false;
                chime.scale = 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_one_based_and_ordered() {
        let row = ChimeRow::new(&RowLayout::default());
        assert_eq!(row.len(), 10);
        for (i, chime) in row.chimes().iter().enumerate() {
            assert_eq!(chime.rank(), i + 1);
        }
    }

    #[test]
    fn heights_rise_with_rank() {
        let row = ChimeRow::new(&RowLayout::default());
        let first = row.bounds(0);
        let last = row.bounds(9);
        assert!(last.max.y > first.max.y);
        assert!((first.max.y - 1.0).abs() < 1e-6);
        assert!((last.max.y - 1.9).abs() < 1e-6);
    }

    #[test]
    fn bounds_ignore_scale_pulse() {
        let mut row = ChimeRow::new(&RowLayout::default());
        let before = row.bounds(3);
        row.mark_touched(3);
        assert_eq!(row.bounds(3), before);
    }

    #[test]
    fn mark_and_reset_round_trip() {
        let mut row = ChimeRow::new(&RowLayout::default());
        row.clear_touches();
        row.mark_touched(2);
        row.reset_untouched();

        let chimes = row.chimes();
        assert!(chimes[2].lit());
        assert!(chimes[2].scale() >= 1.0);
        let intensity = row.intensity(2);
        assert!(chimes[2].scale() < 1.0 + 0.1 * intensity + 1e-6);
        for (i, chime) in chimes.iter().enumerate() {
            if i != 2 {
                assert!(!chime.lit());
                assert_eq!(chime.scale(), 1.0);
            }
        }

        // next frame without contact resets the pulsed chime too
        row.clear_touches();
        row.reset_untouched();
        assert!(!row.chimes()[2].lit());
        assert_eq!(row.chimes()[2].scale(), 1.0);
    }

    #[test]
    fn intensity_is_rank_over_count() {
        let row = ChimeRow::new(&RowLayout::default());
        assert!((row.intensity(0) - 0.1).abs() < 1e-6);
        assert!((row.intensity(9) - 1.0).abs() < 1e-6);
    }
}
