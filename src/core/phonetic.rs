use crate::models::SoundexMode;

/// Length of a traditional Soundex code
const STANDARD_SOUNDEX_LEN: usize = 4;

/// Digit class of a lowercase letter; vowels and everything else have none
#[inline]
fn phonetic_class(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Variable-length Soundex fingerprint of a name
///
/// The first character is kept (uppercased) and every following letter is
/// mapped to its digit class. A digit is written only when it differs from the
/// class of the character right before it, so a run of same-class letters
/// yields one digit while vowels and other uncoded characters break runs.
/// The result is neither padded nor truncated; compare codes for equality only.
pub fn soundex(name: &str) -> String {
    soundex_with_mode(name, SoundexMode::Variable)
}

/// Soundex with an explicit output shape
pub fn soundex_with_mode(name: &str, mode: SoundexMode) -> String {
    let lowered = name.to_lowercase();
    let mut chars = lowered.chars();

    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code: String = first.to_uppercase().collect();
    let mut previous = phonetic_class(first);

    for c in chars {
        let current = phonetic_class(c);
        if let Some(digit) = current {
            if current != previous {
                code.push(digit);
            }
        }
        previous = current;
    }

    match mode {
        SoundexMode::Variable => code,
        SoundexMode::Standard => {
            let mut fixed: String = code.chars().take(STANDARD_SOUNDEX_LEN).collect();
            while fixed.chars().count() < STANDARD_SOUNDEX_LEN {
                fixed.push('0');
            }
            fixed
        }
    }
}

/// All-or-nothing phonetic signal: 100 when both names are present and
/// share a code, 0 otherwise
pub fn soundex_score(a: &str, b: &str, mode: SoundexMode) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    if soundex_with_mode(a, mode) == soundex_with_mode(b, mode) {
        100
    } else {
        0
    }
}
