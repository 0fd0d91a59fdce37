// Unit tests for the similarity primitives and Soundex

use beneficiary_dedup::core::{
    phonetic::{soundex, soundex_score, soundex_with_mode},
    similarity::{levenshtein_distance, similarity_percentage},
};
use beneficiary_dedup::models::SoundexMode;

#[test]
fn test_similarity_identity() {
    for s in ["Maria Santos", "123 Main St, Manila", "1981-05-03", "x"] {
        assert_eq!(similarity_percentage(s, s), 100, "identity failed for {:?}", s);
    }
}

#[test]
fn test_similarity_empty_safety() {
    assert_eq!(similarity_percentage("", "anything"), 0);
    assert_eq!(similarity_percentage("x", ""), 0);
}

#[test]
fn test_similarity_symmetry() {
    let samples = [
        "Maria Santos",
        "Ma. Santos",
        "Mariah Santoz",
        "Juan dela Cruz",
        "Juan De La Cruz",
        "Pedro Reyes",
        "",
    ];

    for a in samples {
        for b in samples {
            assert_eq!(
                similarity_percentage(a, b),
                similarity_percentage(b, a),
                "asymmetric for {:?} / {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_similarity_case_insensitive() {
    assert_eq!(similarity_percentage("Maria", "maria"), 100);
    assert_eq!(similarity_percentage("JUAN DELA CRUZ", "juan dela cruz"), 100);
}

#[test]
fn test_similarity_within_bounds() {
    let pairs = [("a", "bcdefgh"), ("abcdefgh", "a"), ("Santos", "Santo"), ("1", "1999-12-31")];
    for (a, b) in pairs {
        let score = similarity_percentage(a, b);
        assert!(score <= 100, "{} out of range for {:?} / {:?}", score, a, b);
    }
}

#[test]
fn test_levenshtein_symmetric_distance() {
    assert_eq!(
        levenshtein_distance("Santos", "Santiago"),
        levenshtein_distance("Santiago", "Santos")
    );
    assert_eq!(levenshtein_distance("Santos", "Santiago"), 4);
}

#[test]
fn test_soundex_phonetic_pair() {
    assert_eq!(soundex("Smith"), soundex("Smyth"));
    assert_eq!(soundex_score("Smith", "Smyth", SoundexMode::Variable), 100);
}

#[test]
fn test_soundex_non_matching_pair() {
    assert_ne!(soundex("Smith"), soundex("Johnson"));
    assert_eq!(soundex_score("Smith", "Johnson", SoundexMode::Variable), 0);
}

#[test]
fn test_soundex_transliteration_variants() {
    // same digits, different initial letter
    assert_eq!(soundex("Catherine")[1..], soundex("Kathryn")[1..]);
    assert_eq!(soundex_score("Reyes", "Reies", SoundexMode::Variable), 100);
}

#[test]
fn test_soundex_standard_mode_is_four_chars() {
    for name in ["Lee", "Robert", "Maria Santos", "Juan dela Cruz"] {
        assert_eq!(soundex_with_mode(name, SoundexMode::Standard).chars().count(), 4, "{}", name);
    }
}
