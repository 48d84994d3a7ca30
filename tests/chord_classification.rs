//! Integration tests for chord classification over held-note fixtures.

use chord_finder::{
    classify, Chord, ChordClassifier, ChordQuality, Inversion, InversionRule, Note, NoteName,
    PitchClassSet, CHORD_TEMPLATES,
};
use lazy_static::lazy_static;
use proptest::prelude::*;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Held notes and the chord they should read as
#[derive(Debug, Clone)]
struct Fixture {
    notes: Vec<Note>,
    root: NoteName,
    name: &'static str,
    inversion: Inversion,
}

fn fixture(notes: &[Note], root: NoteName, name: &'static str, inversion: Inversion) -> Fixture {
    Fixture {
        notes: notes.to_vec(),
        root,
        name,
        inversion,
    }
}

lazy_static! {
    static ref FIXTURES: Vec<Fixture> = vec![
        fixture(&[0, 4, 7], NoteName::C, "C Major", Inversion::RootPosition),
        fixture(&[4, 7, 12], NoteName::C, "C Major", Inversion::RootPosition),
        fixture(&[1, 5, 8], NoteName::Cs, "C# Major", Inversion::RootPosition),
        fixture(&[0, 3, 6, 9], NoteName::C, "C Diminished 7th", Inversion::RootPosition),
        fixture(&[61, 64, 67, 70], NoteName::Cs, "C# Diminished 7th", Inversion::RootPosition),
        fixture(&[60, 63, 66], NoteName::C, "C Diminished", Inversion::RootPosition),
        fixture(&[60, 64, 68], NoteName::C, "C Augmented", Inversion::RootPosition),
        fixture(&[64, 68, 72], NoteName::C, "C Augmented", Inversion::RootPosition),
        fixture(&[60, 64, 67, 71], NoteName::C, "C Major 7th", Inversion::RootPosition),
        fixture(&[57, 60, 64], NoteName::A, "A Minor", Inversion::Second),
        fixture(&[62, 65, 69, 72], NoteName::D, "D Minor 7th", Inversion::First),
        fixture(&[63, 66, 69, 71], NoteName::B, "B Dominant 7th", Inversion::Third),
        fixture(&[59, 62, 65, 69], NoteName::B, "B Half-Diminished 7th", Inversion::Third),
        fixture(&[60, 62, 67], NoteName::C, "C Sus2", Inversion::RootPosition),
        fixture(&[60, 65, 67], NoteName::C, "C Sus4", Inversion::RootPosition),
        fixture(&[55, 57, 62], NoteName::D, "D Sus4", Inversion::RootPosition),
        fixture(&[0, 1], NoteName::C, "Unknown Chord", Inversion::NotApplicable),
        fixture(&[13, 0], NoteName::Cs, "Unknown Chord", Inversion::NotApplicable),
        fixture(&[67, 60], NoteName::G, "Unknown Chord", Inversion::NotApplicable),
        fixture(&[60, 62, 64], NoteName::C, "Unknown Chord", Inversion::NotApplicable),
        fixture(&[60, 64, 67, 70, 74], NoteName::C, "Unknown Chord", Inversion::NotApplicable),
    ];
}

fn describe(chord: &Chord) -> String {
    format!(
        "root: {}, quality: {}, inversion: {}, name: {}",
        chord.root, chord.quality, chord.inversion, chord.name
    )
}

#[test]
fn test_fixtures() {
    let failures = Arc::new(Mutex::new(Vec::<String>::new()));

    FIXTURES.par_iter().for_each(|fx| {
        let msg = match classify(&fx.notes) {
            Some(chord)
                if chord.root == fx.root
                    && chord.name == fx.name
                    && chord.inversion == fx.inversion =>
            {
                return;
            }
            Some(chord) => format!(
                "notes:{:?}\nexpected = root: {}, name: {}, inversion: {}\nactual = {}\n",
                fx.notes,
                fx.root,
                fx.name,
                fx.inversion,
                describe(&chord)
            ),
            None => format!("notes:{:?}\nexpected {}, got nothing\n", fx.notes, fx.name),
        };
        failures.lock().unwrap().push(msg);
    });

    let failures = Arc::try_unwrap(failures).unwrap().into_inner().unwrap();
    if !failures.is_empty() {
        panic!(
            "{} chord fixtures failed:\n\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

#[test]
fn test_major_triad_fields() {
    let chord = classify(&[0, 4, 7]).unwrap();
    assert_eq!(chord.root, NoteName::C);
    assert_eq!(chord.quality, ChordQuality::Major);
    assert_eq!(chord.inversion, Inversion::RootPosition);
    assert_eq!(chord.name, "C Major");
    assert_eq!(chord.root.to_string(), "C");
    assert_eq!(chord.quality.to_string(), "Major");
    assert_eq!(chord.inversion.to_string(), "Root Position");
}

#[test]
fn test_unknown_chord_fields() {
    let chord = classify(&[0, 1]).unwrap();
    assert_eq!(chord.root, NoteName::C);
    assert_eq!(chord.quality, ChordQuality::Unknown);
    assert_eq!(chord.quality.to_string(), "Unknown");
    assert_eq!(chord.inversion.to_string(), "N/A");
    assert_eq!(chord.name, "Unknown Chord");
    assert!(chord.is_unknown());
}

#[test]
fn test_not_enough_notes() {
    let cases: [&[Note]; 5] = [&[], &[60], &[60, 60], &[48, 60, 72], &[5, 17, 29, 41]];
    for notes in cases {
        assert_eq!(classify(notes), None, "notes:{notes:?}");
    }
}

#[test]
fn test_every_template_on_every_root() {
    // Qualities whose rotations never land on another template.
    let unambiguous = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::DominantSeventh,
        ChordQuality::HalfDiminishedSeventh,
    ];

    for &(quality, intervals) in CHORD_TEMPLATES {
        for root in 0..12u32 {
            let notes: Vec<Note> = intervals.iter().map(|&i| 48 + root + i as Note).collect();
            let chord = classify(&notes).unwrap();
            assert!(!chord.is_unknown(), "{quality} on {root}");

            let played: BTreeSet<u8> = PitchClassSet::from_notes(&notes)
                .iter()
                .map(|pc| pc.index())
                .collect();
            let spelled: BTreeSet<u8> = chord
                .tones()
                .iter()
                .map(|n| n.pitch_class().index())
                .collect();
            assert_eq!(played, spelled, "{quality} on {root} read as {}", chord.name);

            if unambiguous.contains(&quality) {
                assert_eq!(chord.quality, quality);
                assert_eq!(chord.root.pitch_class().index() as u32, root);
            }
        }
    }
}

#[test]
fn test_lowest_note_rule() {
    let classifier = ChordClassifier::builder()
        .inversion_rule(InversionRule::LowestNote)
        .build();

    let chord = classifier.classify(&[4, 7, 12]).unwrap();
    assert_eq!(chord.name, "C Major");
    assert_eq!(chord.inversion, Inversion::First);

    let dyad = classifier.classify(&[60, 61]).unwrap();
    assert_eq!(dyad.inversion, Inversion::NotApplicable);

    assert_eq!(classifier.classify(&[60]), None);
}

#[test]
fn test_concurrent_calls_match_serial() {
    let classifier = ChordClassifier::new();
    let serial: Vec<Option<Chord>> = FIXTURES
        .iter()
        .map(|fx| classifier.classify(&fx.notes))
        .collect();
    let parallel: Vec<Option<Chord>> = FIXTURES
        .par_iter()
        .map(|fx| classifier.classify(&fx.notes))
        .collect();
    assert_eq!(serial, parallel);
}

fn held_notes() -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec(0u32..128, 0..8)
}

proptest! {
    /// Reordering held notes never changes a recognised chord.
    #[test]
    fn permutation_does_not_change_matches(
        (notes, shuffled) in held_notes().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = classify(&notes);
        let b = classify(&shuffled);
        prop_assert_eq!(a.is_none(), b.is_none());
        if let (Some(a), Some(b)) = (a, b) {
            prop_assert_eq!(&a.name, &b.name);
            prop_assert_eq!(a.quality, b.quality);
            prop_assert_eq!(a.inversion, b.inversion);
            if !a.is_unknown() {
                prop_assert_eq!(a.root, b.root);
            }
        }
    }

    /// Moving notes by whole octaves gives the same result.
    #[test]
    fn octave_shift_is_invisible(
        (notes, octaves) in held_notes().prop_flat_map(|v| {
            let len = v.len();
            (Just(v), prop::collection::vec(0u32..4, len))
        })
    ) {
        let shifted: Vec<Note> = notes.iter().zip(&octaves).map(|(n, o)| n + 12 * o).collect();
        prop_assert_eq!(classify(&notes), classify(&shifted));
    }

    /// A single pitch class in any octaves is never a chord.
    #[test]
    fn single_pitch_class_is_none(pc in 0u32..12, octaves in prop::collection::vec(0u32..10, 0..6)) {
        let notes: Vec<Note> = octaves.iter().map(|o| pc + 12 * o).collect();
        prop_assert_eq!(classify(&notes), None);
    }

    /// Repeated calls agree.
    #[test]
    fn classification_is_idempotent(notes in held_notes()) {
        prop_assert_eq!(classify(&notes), classify(&notes));
    }

    /// A recognised chord spells exactly the pitch classes that were held.
    #[test]
    fn matched_tones_cover_held_notes(notes in held_notes()) {
        if let Some(chord) = classify(&notes).filter(|c| !c.is_unknown()) {
            let held: BTreeSet<NoteName> = notes.iter().map(|&n| chord_finder::note_name(n)).collect();
            let spelled: BTreeSet<NoteName> = chord.tones().into_iter().collect();
            prop_assert_eq!(held, spelled);
        }
    }
}
