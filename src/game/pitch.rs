use std::fmt;
use std::str::FromStr;

/// The seven letter names of the staff, in canonical staff order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

pub const ALL_LETTERS: [Letter; 7] = [
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
    Letter::A,
    Letter::B,
];

impl Letter {
    /// Staff index of this letter within one octave: C=0 .. B=6.
    #[inline(always)]
    pub const fn canonical_index(self) -> u8 {
        match self {
            Self::C => 0,
            Self::D => 1,
            Self::E => 2,
            Self::F => 3,
            Self::G => 4,
            Self::A => 5,
            Self::B => 6,
        }
    }

    /// Semitone offset of the natural within one octave: C=0 .. B=11.
    #[inline(always)]
    const fn semitone(self) -> i8 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::A => "A",
            Self::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// One pitch identity within an octave. Sharps and their flat aliases are
/// distinct identities that share a physical key; only spellings that exist
/// on a keyboard are representable (no E#/Fb/B#/Cb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pitch {
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

/// Every representable pitch identity, naturals and both accidental spellings.
pub const ALL_PITCHES: [Pitch; 17] = [
    Pitch::C,
    Pitch::CSharp,
    Pitch::DFlat,
    Pitch::D,
    Pitch::DSharp,
    Pitch::EFlat,
    Pitch::E,
    Pitch::F,
    Pitch::FSharp,
    Pitch::GFlat,
    Pitch::G,
    Pitch::GSharp,
    Pitch::AFlat,
    Pitch::A,
    Pitch::ASharp,
    Pitch::BFlat,
    Pitch::B,
];

/// The 12 identities the virtual keyboard exposes. Black keys are labeled as
/// sharps, so flat spellings never appear here even though judgment accepts
/// them.
pub const KEYBOARD_PITCHES: [Pitch; 12] = [
    Pitch::C,
    Pitch::CSharp,
    Pitch::D,
    Pitch::DSharp,
    Pitch::E,
    Pitch::F,
    Pitch::FSharp,
    Pitch::G,
    Pitch::GSharp,
    Pitch::A,
    Pitch::ASharp,
    Pitch::B,
];

impl Pitch {
    /// The staff letter this pitch sits on: a sharp borrows the letter below
    /// it, a flat the letter above it.
    #[inline(always)]
    pub const fn letter(self) -> Letter {
        match self {
            Self::C => Letter::C,
            Self::CSharp => Letter::C,
            Self::DFlat => Letter::D,
            Self::D => Letter::D,
            Self::DSharp => Letter::D,
            Self::EFlat => Letter::E,
            Self::E => Letter::E,
            Self::F => Letter::F,
            Self::FSharp => Letter::F,
            Self::GFlat => Letter::G,
            Self::G => Letter::G,
            Self::GSharp => Letter::G,
            Self::AFlat => Letter::A,
            Self::A => Letter::A,
            Self::ASharp => Letter::A,
            Self::BFlat => Letter::B,
            Self::B => Letter::B,
        }
    }

    #[inline(always)]
    pub const fn accidental(self) -> Accidental {
        match self {
            Self::CSharp | Self::DSharp | Self::FSharp | Self::GSharp | Self::ASharp => {
                Accidental::Sharp
            }
            Self::DFlat | Self::EFlat | Self::GFlat | Self::AFlat | Self::BFlat => Accidental::Flat,
            _ => Accidental::Natural,
        }
    }

    /// Physical-key index within one octave, 0..=11. Enharmonic aliases map
    /// to the same index.
    #[inline(always)]
    pub const fn chromatic_index(self) -> u8 {
        let base = self.letter().semitone();
        let shift = match self.accidental() {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        };
        (base + shift) as u8
    }

    /// The other spelling of the same physical key, if one exists.
    /// Naturals have no alias.
    #[inline(always)]
    pub const fn enharmonic_alias(self) -> Option<Pitch> {
        match self {
            Self::CSharp => Some(Self::DFlat),
            Self::DFlat => Some(Self::CSharp),
            Self::DSharp => Some(Self::EFlat),
            Self::EFlat => Some(Self::DSharp),
            Self::FSharp => Some(Self::GFlat),
            Self::GFlat => Some(Self::FSharp),
            Self::GSharp => Some(Self::AFlat),
            Self::AFlat => Some(Self::GSharp),
            Self::ASharp => Some(Self::BFlat),
            Self::BFlat => Some(Self::ASharp),
            _ => None,
        }
    }

    /// Whether `self` presses the same physical key as `other`, counting
    /// identity as well as the enharmonic alias.
    #[inline(always)]
    pub fn matches_key(self, other: Pitch) -> bool {
        self == other || is_enharmonic_match(self, other)
    }

    /// Lowercase ASCII stem for sound file keys ("c_sharp", "d_flat", ...).
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::CSharp => "c_sharp",
            Self::DFlat => "d_flat",
            Self::D => "d",
            Self::DSharp => "d_sharp",
            Self::EFlat => "e_flat",
            Self::E => "e",
            Self::F => "f",
            Self::FSharp => "f_sharp",
            Self::GFlat => "g_flat",
            Self::G => "g",
            Self::GSharp => "g_sharp",
            Self::AFlat => "a_flat",
            Self::A => "a",
            Self::ASharp => "a_sharp",
            Self::BFlat => "b_flat",
            Self::B => "b",
        }
    }
}

/// Strict alias equivalence: true only for a sharp/flat pair occupying the
/// same physical key, symmetric in its arguments. Identical spellings and
/// unrelated pairs are false.
#[inline(always)]
pub fn is_enharmonic_match(a: Pitch, b: Pitch) -> bool {
    a.enharmonic_alias() == Some(b)
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.accidental() {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        write!(f, "{}{}", self.letter().as_str(), suffix)
    }
}

impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.trim();
        let mut chars = v.chars();
        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => Letter::C,
            Some('D') => Letter::D,
            Some('E') => Letter::E,
            Some('F') => Letter::F,
            Some('G') => Letter::G,
            Some('A') => Letter::A,
            Some('B') => Letter::B,
            _ => return Err(format!("'{v}' is not a valid pitch")),
        };
        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            _ => return Err(format!("'{v}' is not a valid pitch")),
        };
        if chars.next().is_some() {
            return Err(format!("'{v}' is not a valid pitch"));
        }
        ALL_PITCHES
            .iter()
            .copied()
            .find(|p| p.letter() == letter && p.accidental() == accidental)
            .ok_or_else(|| format!("'{v}' is not a valid pitch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARPS: [Pitch; 5] = [
        Pitch::CSharp,
        Pitch::DSharp,
        Pitch::FSharp,
        Pitch::GSharp,
        Pitch::ASharp,
    ];

    #[test]
    fn enharmonic_match_is_symmetric_for_every_sharp() {
        for sharp in SHARPS {
            let flat = sharp.enharmonic_alias().expect("every sharp has a flat alias");
            assert!(is_enharmonic_match(sharp, flat), "{sharp} should match {flat}");
            assert!(is_enharmonic_match(flat, sharp), "{flat} should match {sharp}");
        }
    }

    #[test]
    fn non_aliased_pairs_never_match() {
        for a in ALL_PITCHES {
            for b in ALL_PITCHES {
                if a.enharmonic_alias() == Some(b) {
                    continue;
                }
                assert!(
                    !is_enharmonic_match(a, b),
                    "{a} and {b} are not aliases but matched"
                );
            }
        }
    }

    #[test]
    fn aliases_share_a_physical_key() {
        for sharp in SHARPS {
            let flat = sharp.enharmonic_alias().unwrap();
            assert_eq!(sharp.chromatic_index(), flat.chromatic_index());
        }
        // All 12 keyboard identities occupy distinct keys.
        for (i, a) in KEYBOARD_PITCHES.iter().enumerate() {
            assert_eq!(a.chromatic_index() as usize, i);
        }
    }

    #[test]
    fn sharps_borrow_the_letter_below_flats_the_letter_above() {
        assert_eq!(Pitch::CSharp.letter(), Letter::C);
        assert_eq!(Pitch::DFlat.letter(), Letter::D);
        assert_eq!(Pitch::ASharp.letter(), Letter::A);
        assert_eq!(Pitch::BFlat.letter(), Letter::B);
    }

    #[test]
    fn display_and_from_str_round_trip() {
        for p in ALL_PITCHES {
            let shown = p.to_string();
            assert_eq!(shown.parse::<Pitch>().unwrap(), p, "round trip for {shown}");
        }
        assert_eq!("db".parse::<Pitch>().unwrap(), Pitch::DFlat);
        assert!("H".parse::<Pitch>().is_err());
        assert!("C##".parse::<Pitch>().is_err());
        assert!("Eb#".parse::<Pitch>().is_err());
    }

    #[test]
    fn matches_key_accepts_identity_and_alias() {
        assert!(Pitch::C.matches_key(Pitch::C));
        assert!(Pitch::DFlat.matches_key(Pitch::CSharp));
        assert!(!Pitch::C.matches_key(Pitch::D));
    }
}
