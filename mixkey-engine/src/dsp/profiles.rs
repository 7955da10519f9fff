//! Key profile table
//!
//! 24 binary templates (major and minor for each of the 12 tonics). Each
//! template has a 1 at every pitch class belonging to the scale and 0
//! elsewhere. Binary rather than perceptually weighted profiles are a
//! deliberate simplification.
//!
//! Note that under binary templates a major scale and its relative minor
//! share the same pitch-class set, so their template vectors are identical;
//! the classifier's fixed iteration order decides between them.

use std::sync::OnceLock;

/// Pitch class names in chromagram index order
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone offsets from the tonic for a major scale
const MAJOR_OFFSETS: [usize; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Semitone offsets from the tonic for a natural minor scale
const MINOR_OFFSETS: [usize; 7] = [0, 2, 3, 5, 7, 8, 10];

/// One named key template
#[derive(Debug, Clone)]
pub struct KeyProfile {
    /// Template name, e.g. "F# minor"
    pub name: String,

    /// Binary pitch-class membership vector
    pub template: [f32; 12],
}

/// All 24 key profiles in fixed iteration order
///
/// Order is tonic-ascending with major before minor for each tonic, so
/// classification tie-breaks are deterministic across runs.
#[derive(Debug, Clone)]
pub struct KeyProfileTable {
    profiles: Vec<KeyProfile>,
}

impl KeyProfileTable {
    /// Build the full table
    pub fn new() -> Self {
        let mut profiles = Vec::with_capacity(24);

        for (tonic, tonic_name) in PITCH_CLASSES.iter().enumerate() {
            profiles.push(build_profile(tonic, tonic_name, "major", &MAJOR_OFFSETS));
            profiles.push(build_profile(tonic, tonic_name, "minor", &MINOR_OFFSETS));
        }

        Self { profiles }
    }

    /// Profiles in fixed iteration order
    pub fn profiles(&self) -> &[KeyProfile] {
        &self.profiles
    }

    /// Process-wide shared table, built once
    pub fn shared() -> &'static KeyProfileTable {
        static TABLE: OnceLock<KeyProfileTable> = OnceLock::new();
        TABLE.get_or_init(KeyProfileTable::new)
    }
}

impl Default for KeyProfileTable {
    fn default() -> Self {
        Self::new()
    }
}

fn build_profile(tonic: usize, tonic_name: &str, scale: &str, offsets: &[usize]) -> KeyProfile {
    let mut template = [0.0f32; 12];
    for offset in offsets {
        template[(tonic + offset) % 12] = 1.0;
    }
    KeyProfile {
        name: format!("{} {}", tonic_name, scale),
        template,
    }
}
