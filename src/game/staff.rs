use crate::core::space::StaffMetrics;
use crate::game::pitch::Pitch;

/// Highest supported octave; notes live in octaves 0..=MAX_OCTAVE.
pub const MAX_OCTAVE: u8 = 1;

/// Vertical staff offset for a pitch in a given octave.
///
/// The pitch resolves to its staff letter (sharp borrows the letter below,
/// flat the letter above), then `index = canonical_index + 7 * octave` and
/// `offset = base_offset + index * half_step_height`. Pure and
/// deterministic; exercised on every spawn.
///
/// Octaves outside 0..=MAX_OCTAVE are a caller contract violation.
#[inline(always)]
pub fn staff_position(pitch: Pitch, octave: u8, metrics: &StaffMetrics) -> f32 {
    assert!(
        octave <= MAX_OCTAVE,
        "octave {octave} outside supported range 0..={MAX_OCTAVE}"
    );
    let index = pitch.letter().canonical_index() as f32 + 7.0 * octave as f32;
    metrics.base_offset + index * metrics.half_step_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pitch::ALL_PITCHES;

    #[test]
    fn deterministic_for_every_pitch() {
        let m = StaffMetrics::default();
        for p in ALL_PITCHES {
            for octave in 0..=MAX_OCTAVE {
                assert_eq!(
                    staff_position(p, octave, &m).to_bits(),
                    staff_position(p, octave, &m).to_bits(),
                    "{p} octave {octave}"
                );
            }
        }
    }

    #[test]
    fn octave_shift_is_seven_half_steps() {
        let m = StaffMetrics::default();
        for p in [Pitch::C, Pitch::D, Pitch::E, Pitch::F, Pitch::G, Pitch::A, Pitch::B] {
            let delta = staff_position(p, 1, &m) - staff_position(p, 0, &m);
            assert!(
                (delta - 7.0 * m.half_step_height).abs() < 1e-6,
                "{p}: {delta}"
            );
        }
    }

    #[test]
    fn enharmonic_spellings_sit_on_different_letters() {
        // C# borrows C's line, Db borrows D's: one staff step apart even
        // though they are the same physical key.
        let m = StaffMetrics::default();
        let sharp = staff_position(Pitch::CSharp, 0, &m);
        let flat = staff_position(Pitch::DFlat, 0, &m);
        assert!((flat - sharp - m.half_step_height).abs() < 1e-6);
    }

    #[test]
    fn natural_index_zero_sits_at_base_offset() {
        let m = StaffMetrics::default();
        assert!((staff_position(Pitch::C, 0, &m) - m.base_offset).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "outside supported range")]
    fn octave_out_of_range_is_a_contract_violation() {
        staff_position(Pitch::C, 2, &StaffMetrics::default());
    }
}
