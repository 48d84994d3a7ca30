//! Pitch
//!
//! Notes, pitch classes and their sharp-spelled names.
//!
//! A [`Note`] is an absolute pitch such as a MIDI note number. Chord identification only
//! ever looks at its pitch class (`note % 12`), so everything in this module is about
//! folding notes down onto the twelve-tone circle.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Number of pitch classes in an octave.
pub const SEMITONES: u8 = 12;

/// An absolute pitch, conventionally a MIDI note number in `0..=127`.
///
/// Any value is accepted; only `note % 12` is ever inspected.
pub type Note = u32;

/// Errors when building pitch values from raw input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// A pitch class index was outside `0..12`.
    #[error("pitch class must be in 0..{max}, got {got}")]
    OutOfRange {
        /// The exclusive upper bound (12).
        max: u8,
        /// The rejected value.
        got: u8,
    },

    /// Text could not be read as a note name.
    #[error("invalid note name `{input}`")]
    InvalidNoteName {
        /// The rejected text.
        input: String,
    },
}

/// A note reduced to its position within one octave, 0 = C through 11 = B.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Create a pitch class from a raw index, or `None` if it is not in `0..12`.
    pub const fn new(index: u8) -> Option<Self> {
        if index < SEMITONES {
            Some(PitchClass(index))
        } else {
            None
        }
    }

    /// Fold an absolute note onto its pitch class.
    pub const fn from_note(note: Note) -> Self {
        PitchClass((note % SEMITONES as Note) as u8)
    }

    /// The raw index in `0..12`.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Ascending distance in semitones from `root` up to `self`.
    pub const fn interval_from(self, root: PitchClass) -> u8 {
        (self.0 + SEMITONES - root.0) % SEMITONES
    }

    /// The pitch class `semitones` above `self`.
    pub const fn transpose(self, semitones: u8) -> Self {
        PitchClass(((self.0 as u16 + semitones as u16) % SEMITONES as u16) as u8)
    }

    /// Sharp-spelled name of this pitch class.
    pub const fn name(self) -> NoteName {
        NoteName::from_pitch_class(self)
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = PitchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PitchClass::new(value).ok_or(PitchError::OutOfRange {
            max: SEMITONES,
            got: value,
        })
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Twelve chromatic pitch classes, spelled with sharps
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteName {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

/// Names in pitch-class order.
const NOTE_NAMES: [NoteName; SEMITONES as usize] = [
    NoteName::C,
    NoteName::Cs,
    NoteName::D,
    NoteName::Ds,
    NoteName::E,
    NoteName::F,
    NoteName::Fs,
    NoteName::G,
    NoteName::Gs,
    NoteName::A,
    NoteName::As,
    NoteName::B,
];

impl NoteName {
    /// Name of the given pitch class.
    pub const fn from_pitch_class(pc: PitchClass) -> NoteName {
        NOTE_NAMES[pc.0 as usize]
    }

    /// Pitch class this name spells.
    pub const fn pitch_class(self) -> PitchClass {
        PitchClass(self as u8)
    }

    /// Sharp spelling as shown to users, e.g. `"C#"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PitchClass> for NoteName {
    fn from(pc: PitchClass) -> Self {
        NoteName::from_pitch_class(pc)
    }
}

impl From<NoteName> for PitchClass {
    fn from(name: NoteName) -> Self {
        name.pitch_class()
    }
}

impl FromStr for NoteName {
    type Err = PitchError;

    /// Parse a letter with at most one accidental (`#`, `♯`, `b`, `♭`).
    ///
    /// Flats and enharmonic spellings such as `Cb` or `E#` resolve to the sharp name of
    /// the same pitch class.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PitchError::InvalidNoteName {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: u8 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let shift = match (chars.next(), chars.next()) {
            (None, _) => 0,
            (Some('#' | '♯'), None) => 1,
            (Some('b' | '♭'), None) => SEMITONES - 1,
            _ => return Err(invalid()),
        };

        Ok(PitchClass(natural).transpose(shift).name())
    }
}

/// Sharp-spelled name of a raw note, ignoring its octave.
pub const fn note_name(note: Note) -> NoteName {
    PitchClass::from_note(note).name()
}

/// Ascending, duplicate-free pitch classes drawn from a group of notes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PitchClassSet {
    classes: Vec<PitchClass>,
}

impl PitchClassSet {
    /// Reduce notes to their unique pitch classes in ascending order.
    ///
    /// Input order, duplicates and octave placement do not affect the result.
    pub fn from_notes(notes: &[Note]) -> Self {
        let mut present = [false; SEMITONES as usize];
        for &note in notes {
            present[PitchClass::from_note(note).index() as usize] = true;
        }

        let classes = present
            .iter()
            .zip(0..SEMITONES)
            .filter(|(&on, _)| on)
            .map(|(_, idx)| PitchClass(idx))
            .collect();

        PitchClassSet { classes }
    }

    /// Number of distinct pitch classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when no notes were supplied.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The pitch classes in ascending order.
    pub fn as_slice(&self) -> &[PitchClass] {
        &self.classes
    }

    /// Iterate in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PitchClass> + '_ {
        self.classes.iter().copied()
    }

    /// Whether `pc` is in the set.
    pub fn contains(&self, pc: PitchClass) -> bool {
        self.classes.binary_search(&pc).is_ok()
    }

    /// Semitone offsets of every member above `root`, sorted ascending.
    ///
    /// `root` itself contributes `0` when it is a member.
    pub fn intervals_from(&self, root: PitchClass) -> Vec<u8> {
        let mut intervals: Vec<u8> = self.iter().map(|pc| pc.interval_from(root)).collect();
        intervals.sort_unstable();
        intervals
    }
}
