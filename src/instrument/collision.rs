use crate::instrument::chime::ChimeRow;
use crate::space::Vec3;

/// Outcome of sweeping one probe across the row this frame.
///
/// `touching` is the OR across all chimes; `last_index` is the registry
/// index of the last chime hit in row order, which is the one that wins
/// the frequency and haptic tie-break.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact {
    pub touching: bool,
    pub last_index: Option<usize>,
}

/// Test a probe sphere against every chime in registry order, marking
/// every hit. Linear scan on purpose: the row is small and the scan order
/// is the tie-break contract. Callers run `clear_touches` before the
/// first probe and `reset_untouched` after the last.
pub fn sweep_probe(row: &mut ChimeRow, center: Vec3, radius: f32) -> Contact {
    let mut contact = Contact::default();
    for index in 0..row.len() {
        if row.bounds(index).intersects_sphere(center, radius) {
            row.mark_touched(index);
            contact.touching = true;
            contact.last_index = Some(index);
        }
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::chime::RowLayout;

    const RADIUS: f32 = 0.03;

    fn row() -> ChimeRow {
        ChimeRow::new(&RowLayout::default())
    }

    #[test]
    fn miss_everywhere_touches_nothing() {
        let mut row = row();
        row.clear_touches();
        let contact = sweep_probe(&mut row, Vec3::new(0.0, 5.0, 0.0), RADIUS);
        assert_eq!(contact, Contact::default());
        row.reset_untouched();
        assert!(row.chimes().iter().all(|c| !c.lit()));
    }

    #[test]
    fn hit_inside_a_single_chime() {
        let mut row = row();
        let target = row.bounds(4).center();
        row.clear_touches();
        let contact = sweep_probe(&mut row, target, RADIUS);
        row.reset_untouched();

        assert!(contact.touching);
        assert_eq!(contact.last_index, Some(4));
        for (i, chime) in row.chimes().iter().enumerate() {
            assert_eq!(chime.lit(), i == 4);
        }
    }

    #[test]
    fn straddling_two_chimes_marks_both_and_keeps_the_later() {
        // Sit between chime 3 and 4 with a radius wide enough to graze both.
        let mut row = row();
        let a = row.bounds(3).center();
        let b = row.bounds(4).center();
        let mid = Vec3::new((a.x + b.x) * 0.5, 0.5, a.z);
        row.clear_touches();
        let contact = sweep_probe(&mut row, mid, 0.08);
        row.reset_untouched();

        assert!(contact.touching);
        assert_eq!(contact.last_index, Some(4));
        assert!(row.chimes()[3].lit());
        assert!(row.chimes()[4].lit());
    }

    #[test]
    fn losing_contact_resets_within_one_frame() {
        let mut row = row();
        let target = row.bounds(0).center();

        row.clear_touches();
        sweep_probe(&mut row, target, RADIUS);
        row.reset_untouched();
        assert!(row.chimes()[0].lit());

        row.clear_touches();
        sweep_probe(&mut row, Vec3::new(0.0, 5.0, 0.0), RADIUS);
        row.reset_untouched();
        assert!(!row.chimes()[0].lit());
        assert_eq!(row.chimes()[0].scale(), 1.0);
    }
}
