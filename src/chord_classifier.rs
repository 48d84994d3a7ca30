//! Chord Classifier
//!
//! Identify chords from the set of notes currently held down.
//!
//! Notes are folded to pitch classes, then every pitch class is tried as a root (lowest
//! first) against a fixed, ordered table of interval templates. The first root and the
//! first template that line up exactly win.

use std::fmt::Display;
use tracing::{debug, trace};

use crate::pitch::{note_name, Note, NoteName, PitchClass, PitchClassSet};

/// Supported chord qualities in template search order, plus the fallback
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordQuality {
    /// Major triad (e.g., C-E-G)
    Major,
    /// Minor triad (e.g., C-Eb-G)
    Minor,
    /// Diminished triad (e.g., C-Eb-Gb)
    Diminished,
    /// Augmented triad (e.g., C-E-G#)
    Augmented,
    /// Major seventh (e.g., C-E-G-B)
    MajorSeventh,
    /// Minor seventh (e.g., C-Eb-G-Bb)
    MinorSeventh,
    /// Dominant seventh (e.g., C-E-G-Bb)
    DominantSeventh,
    /// Diminished seventh (e.g., C-Eb-Gb-A)
    DiminishedSeventh,
    /// Half-diminished seventh (e.g., C-Eb-Gb-Bb)
    HalfDiminishedSeventh,
    /// Suspended second (e.g., C-D-G)
    SuspendedSecond,
    /// Suspended fourth (e.g., C-F-G)
    SuspendedFourth,
    /// No template matched the notes
    Unknown,
}

/// Interval templates in search order. Earlier entries win ties.
pub const CHORD_TEMPLATES: &[(ChordQuality, &[u8])] = &[
    (ChordQuality::Major,                 &[0, 4, 7]),
    (ChordQuality::Minor,                 &[0, 3, 7]),
    (ChordQuality::Diminished,            &[0, 3, 6]),
    (ChordQuality::Augmented,             &[0, 4, 8]),
    (ChordQuality::MajorSeventh,          &[0, 4, 7, 11]),
    (ChordQuality::MinorSeventh,          &[0, 3, 7, 10]),
    (ChordQuality::DominantSeventh,       &[0, 4, 7, 10]),
    (ChordQuality::DiminishedSeventh,     &[0, 3, 6, 9]),
    (ChordQuality::HalfDiminishedSeventh, &[0, 3, 6, 10]),
    (ChordQuality::SuspendedSecond,       &[0, 2, 7]),
    (ChordQuality::SuspendedFourth,       &[0, 5, 7]),
];

impl ChordQuality {
    /// Semitone offsets from the root, ascending. Empty for [`ChordQuality::Unknown`].
    pub fn intervals(self) -> &'static [u8] {
        CHORD_TEMPLATES
            .iter()
            .find(|(quality, _)| *quality == self)
            .map(|(_, intervals)| *intervals)
            .unwrap_or_default()
    }

    /// Display name, e.g. `"Half-Diminished 7th"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ChordQuality::Major => "Major",
            ChordQuality::Minor => "Minor",
            ChordQuality::Diminished => "Diminished",
            ChordQuality::Augmented => "Augmented",
            ChordQuality::MajorSeventh => "Major 7th",
            ChordQuality::MinorSeventh => "Minor 7th",
            ChordQuality::DominantSeventh => "Dominant 7th",
            ChordQuality::DiminishedSeventh => "Diminished 7th",
            ChordQuality::HalfDiminishedSeventh => "Half-Diminished 7th",
            ChordQuality::SuspendedSecond => "Sus2",
            ChordQuality::SuspendedFourth => "Sus4",
            ChordQuality::Unknown => "Unknown",
        }
    }
}

impl Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which chord tone is treated as lowest
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Inversion {
    /// Root is lowest.
    RootPosition,
    /// Second chord tone (usually the third) is lowest.
    First,
    /// Third chord tone (usually the fifth) is lowest.
    Second,
    /// Fourth chord tone (the seventh) is lowest.
    Third,
    /// Position past the seventh.
    Unknown,
    /// Fewer than three pitch classes, or no chord matched.
    NotApplicable,
}

impl Inversion {
    /// Label a chord-tone position among `pitch_classes` distinct pitch classes.
    pub const fn from_position(position: usize, pitch_classes: usize) -> Self {
        if pitch_classes < 3 {
            return Inversion::NotApplicable;
        }
        match position {
            0 => Inversion::RootPosition,
            1 => Inversion::First,
            2 => Inversion::Second,
            3 => Inversion::Third,
            _ => Inversion::Unknown,
        }
    }

    /// Display label, e.g. `"1st Inversion"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Inversion::RootPosition => "Root Position",
            Inversion::First => "1st Inversion",
            Inversion::Second => "2nd Inversion",
            Inversion::Third => "3rd Inversion",
            Inversion::Unknown => "Unknown Inversion",
            Inversion::NotApplicable => "N/A",
        }
    }
}

impl Display for Inversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a matched chord's inversion is worked out
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum InversionRule {
    /// Position of the root within the ascending pitch-class set.
    ///
    /// Ignores which note is actually in the bass, so `E-G-C` reads as root position.
    #[default]
    PitchClassOrder,
    /// Position of the lowest played note among the chord's tones.
    LowestNote,
}

/// A chord identified from a group of notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    /// The root note of the chord.
    pub root: NoteName,
    /// The quality (e.g., Major, Minor 7th) of the chord.
    pub quality: ChordQuality,
    /// The inversion label.
    pub inversion: Inversion,
    /// Full name, `"<root> <quality>"`, or `"Unknown Chord"`.
    pub name: String,
}

impl Chord {
    fn identified(root: NoteName, quality: ChordQuality, inversion: Inversion) -> Self {
        Chord {
            root,
            quality,
            inversion,
            name: format!("{root} {quality}"),
        }
    }

    fn unknown(root: NoteName) -> Self {
        Chord {
            root,
            quality: ChordQuality::Unknown,
            inversion: Inversion::NotApplicable,
            name: "Unknown Chord".to_string(),
        }
    }

    /// True for the fallback produced when no template matched.
    pub fn is_unknown(&self) -> bool {
        self.quality == ChordQuality::Unknown
    }

    /// Chord tones spelled upward from the root. Empty for an unknown chord.
    pub fn tones(&self) -> Vec<NoteName> {
        let root = self.root.pitch_class();
        self.quality
            .intervals()
            .iter()
            .map(|&offset| root.transpose(offset).name())
            .collect()
    }
}

impl Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for `ChordClassifier` to pick the inversion rule
pub struct ChordClassifierBuilder {
    inversion_rule: InversionRule,
}

impl ChordClassifierBuilder {
    /// Create a new builder with the pitch-class-order inversion rule
    pub fn new() -> Self {
        ChordClassifierBuilder {
            inversion_rule: InversionRule::PitchClassOrder,
        }
    }

    /// Set how inversions are labelled
    pub fn inversion_rule(mut self, rule: InversionRule) -> Self {
        self.inversion_rule = rule;
        self
    }

    /// Build the `ChordClassifier`
    pub fn build(self) -> ChordClassifier {
        ChordClassifier {
            inversion_rule: self.inversion_rule,
        }
    }
}

impl Default for ChordClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless chord classifier, safe to share between threads
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChordClassifier {
    inversion_rule: InversionRule,
}

impl ChordClassifier {
    /// Return a builder to customize the inversion rule
    pub fn builder() -> ChordClassifierBuilder {
        ChordClassifierBuilder::new()
    }

    /// Create a classifier using the pitch-class-order inversion rule
    pub const fn new() -> Self {
        ChordClassifier {
            inversion_rule: InversionRule::PitchClassOrder,
        }
    }

    /// The configured inversion rule.
    pub fn inversion_rule(&self) -> InversionRule {
        self.inversion_rule
    }

    /// Identify the chord formed by `notes`.
    ///
    /// Returns:
    /// - `None` if there are fewer than two distinct pitch classes.
    /// - An "Unknown Chord" rooted on the first supplied note if no template matches.
    pub fn classify(&self, notes: &[Note]) -> Option<Chord> {
        let first = match notes {
            [first, _, ..] => *first,
            _ => return None,
        };

        let pitch_classes = PitchClassSet::from_notes(notes);
        trace!(pitch_classes = ?pitch_classes.as_slice(), "classifying notes");
        if pitch_classes.len() < 2 {
            return None;
        }

        let Some(found) = find_template(&pitch_classes) else {
            let chord = Chord::unknown(note_name(first));
            debug!(root = %chord.root, "no chord template matched");
            return Some(chord);
        };

        let inversion = match self.inversion_rule {
            InversionRule::PitchClassOrder => {
                Inversion::from_position(found.position, pitch_classes.len())
            }
            InversionRule::LowestNote => {
                lowest_note_inversion(notes, &found, pitch_classes.len())
            }
        };

        let chord = Chord::identified(found.root.name(), found.quality, inversion);
        debug!(chord = %chord, inversion = %chord.inversion, "matched chord");
        Some(chord)
    }
}

impl Default for ChordClassifier {
    fn default() -> Self {
        ChordClassifier::new()
    }
}

/// Identify the chord formed by `notes` with the default classifier.
///
/// See [`ChordClassifier::classify`].
pub fn classify(notes: &[Note]) -> Option<Chord> {
    ChordClassifier::new().classify(notes)
}

/// A root/template pairing that fits the pitch-class set exactly
struct TemplateMatch {
    /// Index of the root within the ascending pitch-class set.
    position: usize,
    root: PitchClass,
    quality: ChordQuality,
}

/// Roots ascending, then templates in table order; first exact fit wins.
fn find_template(pitch_classes: &PitchClassSet) -> Option<TemplateMatch> {
    pitch_classes
        .iter()
        .enumerate()
        .find_map(|(position, root)| {
            let intervals = pitch_classes.intervals_from(root);
            CHORD_TEMPLATES
                .iter()
                .find(|(_, template)| *template == intervals.as_slice())
                .map(|&(quality, _)| TemplateMatch {
                    position,
                    root,
                    quality,
                })
        })
}

fn lowest_note_inversion(
    notes: &[Note],
    found: &TemplateMatch,
    pitch_classes: usize,
) -> Inversion {
    let Some(&bass) = notes.iter().min() else {
        return Inversion::NotApplicable;
    };
    let offset = PitchClass::from_note(bass).interval_from(found.root);
    // The bass is a held pitch class, so it is always one of the matched offsets.
    found
        .quality
        .intervals()
        .iter()
        .position(|&o| o == offset)
        .map_or(Inversion::Unknown, |position| {
            Inversion::from_position(position, pitch_classes)
        })
}
