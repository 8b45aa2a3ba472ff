/// Minor-pentatonic degrees, semitones within an octave. Whichever chime
/// is struck, neighbors stay consonant.
pub const PENTATONIC_MINOR: [u32; 5] = [0, 3, 5, 7, 10];

/// Default reference pitch, A2.
pub const BASE_FREQ_HZ: f32 = 110.0;

/// Semitone offset for a 1-based chime rank: the scale wraps every five
/// ranks and climbs an octave per wrap.
#[must_use]
pub fn semitone_offset(rank: usize) -> u32 {
    let degrees = PENTATONIC_MINOR.len();
    PENTATONIC_MINOR[rank % degrees] + 12 * (rank / degrees) as u32
}

/// Equal-tempered frequency for a rank above a reference pitch.
#[must_use]
pub fn rank_frequency_hz(base_hz: f32, rank: usize) -> f32 {
    base_hz * 2.0_f32.powf(semitone_offset(rank) as f32 / 12.0)
}
