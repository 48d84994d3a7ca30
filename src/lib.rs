//! # chord_finder
//!
//! Identify chords from the notes currently held on a MIDI device or a virtual
//! keyboard: root, quality and inversion, from pitch classes alone.
//!
//! ## Example
//! ```rust
//! use chord_finder::{classify, ChordClassifier, ChordQuality, Inversion, InversionRule, NoteName};
//!
//! // E4, G4, C5
//! let held = [64, 67, 72];
//!
//! let chord = classify(&held).expect("three distinct pitch classes");
//! assert_eq!(chord.name, "C Major");
//! assert_eq!(chord.root, NoteName::C);
//! assert_eq!(chord.quality, ChordQuality::Major);
//! // Inversions follow pitch-class order by default, not the bass note.
//! assert_eq!(chord.inversion, Inversion::RootPosition);
//!
//! let by_bass = ChordClassifier::builder()
//!     .inversion_rule(InversionRule::LowestNote)
//!     .build();
//! let chord = by_bass.classify(&held).expect("three distinct pitch classes");
//! assert_eq!(chord.inversion.to_string(), "1st Inversion");
//!
//! // Fewer than two distinct pitch classes is not a chord yet.
//! assert!(classify(&[60, 72]).is_none());
//! ```
//!
//! ## Features
//! - `serde`: `Serialize`/`Deserialize` for pitch and chord types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Chord identification API.
pub use chord_classifier::{
    classify, Chord, ChordClassifier, ChordClassifierBuilder, ChordQuality, Inversion,
    InversionRule, CHORD_TEMPLATES,
};

/// Notes, pitch classes and note names.
pub use pitch::{note_name, Note, NoteName, PitchClass, PitchClassSet, PitchError, SEMITONES};

/// Chord classification module.
pub mod chord_classifier;

/// Pitch model module.
pub mod pitch;
