//! Absolute pitch spellings ⟷ 3-limit values relative to C4
//!
//! Covers the seven diatonic nominals, the tone-splitter and semiquartal
//! Greek nominals and a table of accidentals (standard, semi/quarter/sesqui
//! fractions, soft-jaric and diamond-MOS).

use std::fmt;
use std::str::FromStr;

use num_integer::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::monzo::TimeMonzo;
use crate::notation::pythagorean::{off_center, quarter_monzo, three_limit, QuarterVector};
use crate::utils::rational::Exponent;

/// Pitch letters, including the Greek tone-splitters and semiquartals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nominal {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Zeta,
    Eta,
    Phi,
    Chi,
    Psi,
    Omega,
}

impl Nominal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nominal::C => "C",
            Nominal::D => "D",
            Nominal::E => "E",
            Nominal::F => "F",
            Nominal::G => "G",
            Nominal::A => "A",
            Nominal::B => "B",
            Nominal::Alpha => "α",
            Nominal::Beta => "β",
            Nominal::Gamma => "γ",
            Nominal::Delta => "δ",
            Nominal::Epsilon => "ε",
            Nominal::Zeta => "ζ",
            Nominal::Eta => "η",
            Nominal::Phi => "φ",
            Nominal::Chi => "χ",
            Nominal::Psi => "ψ",
            Nominal::Omega => "ω",
        }
    }

    /// Position relative to C4 in quarter units
    fn vector(&self) -> QuarterVector {
        match self {
            Nominal::F => (8, -4),
            Nominal::C => (0, 0),
            Nominal::G => (-4, 4),
            Nominal::D => (-12, 8),
            Nominal::A => (-16, 12),
            Nominal::E => (-24, 16),
            Nominal::B => (-28, 20),
            // Tone-splitters
            Nominal::Beta => (10, -4),
            Nominal::Zeta => (2, 0),
            Nominal::Gamma => (-6, 4),
            Nominal::Eta => (-10, 8),
            Nominal::Delta => (-18, 12),
            Nominal::Alpha => (-22, 16),
            Nominal::Epsilon => (-30, 20),
            // Semiquartals
            Nominal::Phi => (4, -2),
            Nominal::Chi => (-8, 6),
            Nominal::Psi => (0, 2),
            Nominal::Omega => (-12, 10),
        }
    }
}

impl fmt::Display for Nominal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Nominal {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Nominal::C),
            "D" => Ok(Nominal::D),
            "E" => Ok(Nominal::E),
            "F" => Ok(Nominal::F),
            "G" => Ok(Nominal::G),
            // Lowercase 'a' avoids a clash with the augmented quality
            "A" | "a" => Ok(Nominal::A),
            "B" => Ok(Nominal::B),
            "α" | "alpha" => Ok(Nominal::Alpha),
            "β" | "beta" => Ok(Nominal::Beta),
            "γ" | "gamma" => Ok(Nominal::Gamma),
            "δ" | "delta" => Ok(Nominal::Delta),
            "ε" | "epsilon" => Ok(Nominal::Epsilon),
            "ζ" | "zeta" => Ok(Nominal::Zeta),
            "η" | "eta" => Ok(Nominal::Eta),
            "φ" | "phi" => Ok(Nominal::Phi),
            "χ" | "chi" => Ok(Nominal::Chi),
            "ψ" | "psi" => Ok(Nominal::Psi),
            "ω" | "omega" => Ok(Nominal::Omega),
            _ => Err(IntervalError::UnknownNominal(s.to_string())),
        }
    }
}

/// Spelled-out nominals, longest first so prefixes never shadow longer names
pub const SPELLED_NOMINALS: [&str; 11] = [
    "epsilon", "omega", "alpha", "gamma", "delta", "beta", "zeta", "eta", "phi", "chi", "psi",
];

/// Single-character nominals
pub const NOMINAL_CHARS: &str = "CDEFGaABαβγδεζηφχψω";

const PURE_NOMINALS: [Nominal; 7] = [
    Nominal::C,
    Nominal::D,
    Nominal::E,
    Nominal::F,
    Nominal::G,
    Nominal::A,
    Nominal::B,
];

const TONESPLITTER_NOMINALS: [Nominal; 7] = [
    Nominal::Gamma,
    Nominal::Delta,
    Nominal::Epsilon,
    Nominal::Zeta,
    Nominal::Eta,
    Nominal::Alpha,
    Nominal::Beta,
];

const ACCIDENTAL_SPECTRUM: [&[&str]; 17] = [
    &["𝄫"],
    &["¾♭", "♭"],
    &["𝄳", "♭"],
    &["¼♭", "♭"],
    &["♭"],
    &["¾♭"],
    &["𝄳"],
    &["¼♭"],
    &[],
    &["¼♯"],
    &["𝄲"],
    &["¾♯"],
    &["♯"],
    &["¼♯", "♯"],
    &["𝄲", "♯"],
    &["¾♯", "♯"],
    &["𝄪"],
];

/// Accidentals that may carry a ½ s ¼ q ¾ Q fraction prefix
const FRACTIONAL_BASES: &str = "♯#♭b";

/// Single-character accidentals, for the literal reader
pub const ACCIDENTAL_CHARS: &str = "♮=♯#♭b𝄪x𝄫𝄲‡t𝄳drp&@";

/// Fraction prefixes, for the literal reader
pub const ACCIDENTAL_FRACTIONS: &str = "½s¼q¾Q";

/// Look up the quarter-unit vector of a single accidental token
pub fn accidental_vector(accidental: &str) -> Result<QuarterVector> {
    let unknown = || IntervalError::UnknownAccidental(accidental.to_string());
    let mut chars = accidental.chars();
    let first = chars.next().ok_or_else(unknown)?;
    let rest = chars.as_str();
    if !rest.is_empty() {
        // Fractional accidental such as ½♯ or q#
        let scale = match first {
            '½' | 's' => 2,
            '¼' | 'q' => 1,
            '¾' | 'Q' => 3,
            _ => return Err(unknown()),
        };
        if rest.chars().count() != 1 || !FRACTIONAL_BASES.contains(rest) {
            return Err(unknown());
        }
        let (twos, threes) = accidental_vector(rest)?;
        return Ok((twos / 4 * scale, threes / 4 * scale));
    }
    match first {
        '♮' | '=' => Ok((0, 0)),
        '♯' | '#' => Ok((-44, 28)),
        '♭' | 'b' => Ok((44, -28)),
        '𝄪' | 'x' => Ok((-88, 56)),
        '𝄫' => Ok((88, -56)),
        '𝄲' | '‡' | 't' => Ok((-22, 14)),
        '𝄳' | 'd' => Ok((22, -14)),
        // Soft-jaric
        'r' => Ok((-38, 24)),
        'p' => Ok((38, -24)),
        // Diamond-MOS
        '&' => Ok((16, -10)),
        '@' => Ok((-16, 10)),
        _ => Err(unknown()),
    }
}

/// A spelled pitch such as `E♭4` or `phi@4`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsolutePitch {
    pub nominal: Nominal,
    pub accidentals: Vec<String>,
    pub octave: i64,
}

impl fmt::Display for AbsolutePitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nominal == Nominal::A && self.accidentals.is_empty() {
            write!(f, "a")?;
        } else {
            write!(f, "{}", self.nominal)?;
        }
        for accidental in &self.accidentals {
            write!(f, "{}", accidental)?;
        }
        write!(f, "{}", self.octave)
    }
}

/// Map a spelled pitch to its 3-limit value relative to C4
pub fn absolute_monzo(pitch: &AbsolutePitch) -> Result<TimeMonzo> {
    let mut vector = pitch.nominal.vector();
    for accidental in &pitch.accidentals {
        let (twos, threes) = accidental_vector(accidental)?;
        vector.0 += twos;
        vector.1 += threes;
    }
    vector.0 += 4 * (pitch.octave - 4);
    Ok(quarter_monzo(vector))
}

/// Spell a 3-limit value relative to C4, `None` if it has no spelling
pub fn absolute_to_node(monzo: &TimeMonzo) -> Option<AbsolutePitch> {
    let (twos, threes) = three_limit(monzo)?;
    let stepspan = twos * Exponent::from_integer(7) + threes * Exponent::from_integer(11);
    let nominal = match *stepspan.denom() {
        1 => PURE_NOMINALS[stepspan.to_integer().mod_floor(&7) as usize],
        2 => {
            let whole = (stepspan - Exponent::new(1, 2)).to_integer();
            TONESPLITTER_NOMINALS[whole.mod_floor(&7) as usize]
        }
        _ => return None,
    };
    let octave = (stepspan / Exponent::from_integer(7)).floor().to_integer() + 4;

    let mut offset = off_center(&threes, nominal.vector().1)?;
    let mut accidentals: Vec<String> = Vec::new();
    while offset < -8 {
        accidentals.push("𝄫".to_string());
        offset += 8;
    }
    while offset > 8 {
        accidentals.push("𝄪".to_string());
        offset -= 8;
    }
    accidentals.extend(
        ACCIDENTAL_SPECTRUM[(offset + 8) as usize]
            .iter()
            .map(|a| a.to_string()),
    );
    if accidentals.is_empty() {
        accidentals.push("♮".to_string());
    }

    Some(AbsolutePitch {
        nominal,
        accidentals,
        octave,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch(nominal: &str, accidentals: &[&str], octave: i64) -> AbsolutePitch {
        AbsolutePitch {
            nominal: nominal.parse().unwrap(),
            accidentals: accidentals.iter().map(|a| a.to_string()).collect(),
            octave,
        }
    }

    fn fraction_of(pitch: &AbsolutePitch) -> Exponent {
        absolute_monzo(pitch).unwrap().to_fraction().unwrap()
    }

    #[test]
    fn test_nominals_relative_to_c4() {
        assert_eq!(fraction_of(&pitch("C", &[], 4)), Exponent::from_integer(1));
        assert_eq!(fraction_of(&pitch("C", &[], 5)), Exponent::from_integer(2));
        assert_eq!(fraction_of(&pitch("F", &[], 4)), Exponent::new(4, 3));
        assert_eq!(fraction_of(&pitch("a", &[], 4)), Exponent::new(27, 16));
        assert_eq!(fraction_of(&pitch("E", &["♭"], 4)), Exponent::new(32, 27));
    }

    #[test]
    fn test_fractional_accidentals() {
        assert_eq!(accidental_vector("½♯").unwrap(), accidental_vector("t").unwrap());
        assert_eq!(accidental_vector("q#").unwrap(), (-11, 7));
        assert_eq!(accidental_vector("¾b").unwrap(), (33, -21));
        assert!(matches!(
            accidental_vector("½x"),
            Err(IntervalError::UnknownAccidental(_))
        ));
    }

    #[test]
    fn test_unknown_nominal() {
        assert!(matches!("H".parse::<Nominal>(), Err(IntervalError::UnknownNominal(_))));
        assert_eq!("epsilon".parse::<Nominal>().unwrap(), Nominal::Epsilon);
    }

    #[test]
    fn test_spell_pitches() {
        let spelled = |n: i64, d: i64| absolute_to_node(&TimeMonzo::from_fraction(Exponent::new(n, d))).unwrap().to_string();
        assert_eq!(spelled(1, 1), "C♮4");
        assert_eq!(spelled(3, 2), "G♮4");
        assert_eq!(spelled(32, 27), "E♭4");
        assert_eq!(spelled(2187, 2048), "C♯4");
        assert_eq!(spelled(1, 2), "C♮3");
        assert_eq!(spelled(16, 9), "B♭4");
    }

    #[test]
    fn test_semiquartal_round_trip() {
        let phi = pitch("phi", &["@"], 4);
        let value = absolute_monzo(&phi).unwrap();
        let spelled = absolute_to_node(&value).unwrap();
        assert_eq!(absolute_monzo(&spelled).unwrap(), value);
    }

    #[test]
    fn test_tonesplitter_spelling() {
        let zeta = absolute_monzo(&pitch("ζ", &[], 4)).unwrap();
        assert_eq!(absolute_to_node(&zeta).unwrap().to_string(), "ζ♮4");
    }
}
