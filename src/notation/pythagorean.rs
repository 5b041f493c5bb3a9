//! Pythagorean interval names ⟷ 3-limit values
//!
//! Interval names such as `M3`, `sA4`, `n6` or `m6.5` map to exact vectors of
//! powers of two and three. Every table entry is a multiple of 1/4, so the
//! tables are stored in quarter units.

use std::fmt;

use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::monzo::TimeMonzo;
use crate::utils::rational::Exponent;

/// A 3-limit vector `[twos, threes]` in quarter units
pub(crate) type QuarterVector = (i64, i64);

// Exponents for perfect and imperfect ordinals, centered between major and minor.
const PYTH_VECTORS: [QuarterVector; 7] = [
    (0, 0),
    (10, -6),
    (-2, 2),
    (8, -4),
    (-4, 4),
    (6, -2),
    (-6, 6),
];

const MID_FOURTH: QuarterVector = (-14, 10);
const MID_FIFTH: QuarterVector = (18, -10);

// Interordinals: the whole tone split exactly in half.
const TONESPLITTER_VECTORS: [QuarterVector; 7] = [
    (-6, 4),
    (-18, 12),
    (-30, 20),
    (2, 0),
    (-10, 8),
    (-22, 16),
    (10, -4),
];

const APOTOME: QuarterVector = (-44, 28);
const SEMIAPOTOME: QuarterVector = (-22, 14);
const QUARTER_APOTOME: QuarterVector = (-11, 7);
const SESQUI_QUARTER_APOTOME: QuarterVector = (-33, 21);

const IMPERFECT_QUALITY_SPECTRUM: [&str; 13] = [
    "d", "Qd", "sd", "qd", "m", "sm", "n", "sM", "M", "qA", "sA", "QA", "A",
];

const PERFECT_QUALITY_SPECTRUM: [&str; 9] = ["d", "Qd", "sd", "qd", "P", "qA", "sA", "QA", "A"];

/// Threes per quality step, in quarter units
const QUALITY_STEP: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Degree {
    pub negative: bool,
    /// Ordinal 1 (unison) through 7 (seventh)
    pub base: u8,
    /// Half a step above `base` (`1.5`, `6.5`, ...)
    pub interordinal: bool,
    pub octaves: i64,
}

impl Degree {
    /// Build from a written degree number such as 3, 10 or 6.5
    pub fn from_number(number: i64, interordinal: bool) -> Result<Self> {
        if number == 0 {
            return Err(IntervalError::representation("Degree zero does not exist"));
        }
        let negative = number < 0;
        let magnitude = number.abs() - 1;
        Ok(Degree {
            negative,
            base: (magnitude % 7 + 1) as u8,
            interordinal,
            octaves: magnitude / 7,
        })
    }

    /// Perfect degrees are unisons, fourths and fifths
    pub fn is_perfect(&self) -> bool {
        !self.interordinal && matches!(self.base, 1 | 4 | 5)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.base as i64 + 7 * self.octaves)?;
        if self.interordinal {
            write!(f, ".5")?;
        }
        Ok(())
    }
}

/// A quality applied to a degree, e.g. `M3` or `AA-2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pythagorean {
    pub quality: String,
    pub imperfect: bool,
    pub degree: Degree,
}

impl Pythagorean {
    pub fn new(quality: impl Into<String>, degree: Degree) -> Self {
        let imperfect = !degree.is_perfect();
        Pythagorean {
            quality: quality.into(),
            imperfect,
            degree,
        }
    }
}

impl fmt::Display for Pythagorean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality, self.degree)
    }
}

fn shift(vector: &mut QuarterVector, by: QuarterVector, times: i64) {
    vector.0 += by.0 * times;
    vector.1 += by.1 * times;
}

pub(crate) fn quarter_monzo(vector: QuarterVector) -> TimeMonzo {
    TimeMonzo::new(
        Exponent::zero(),
        vec![Exponent::new(vector.0, 4), Exponent::new(vector.1, 4)],
        Exponent::one(),
    )
}

/// Strip one of the given prefixes, returning whether it matched
fn strip_any<'a>(quality: &mut &'a str, prefixes: &[&str]) -> bool {
    for prefix in prefixes {
        if let Some(rest) = quality.strip_prefix(prefix) {
            *quality = rest;
            return true;
        }
    }
    false
}

/// Map an interval name to its exact 3-limit value
pub fn pythagorean_monzo(node: &Pythagorean) -> Result<TimeMonzo> {
    let base = node.degree.base;
    if !(1..=7).contains(&base) {
        return Err(IntervalError::representation(format!(
            "Invalid degree base {}",
            base
        )));
    }
    let index = (base - 1) as usize;
    let mut vector = if node.degree.interordinal {
        TONESPLITTER_VECTORS[index]
    } else {
        PYTH_VECTORS[index]
    };

    let mut quality = node.quality.as_str();

    if node.imperfect {
        // Augmented and diminished imperfect intervals start from major and minor
        match quality.chars().last() {
            Some('A') => shift(&mut vector, SEMIAPOTOME, 1),
            Some('d') => shift(&mut vector, SEMIAPOTOME, -1),
            _ => {}
        }
    } else if quality == "n" {
        vector = if base == 4 { MID_FOURTH } else { MID_FIFTH };
    }

    vector.0 += 4 * node.degree.octaves;

    if strip_any(&mut quality, &["qA", "¼A"]) {
        shift(&mut vector, QUARTER_APOTOME, 1);
    }
    if strip_any(&mut quality, &["qd", "¼d"]) {
        shift(&mut vector, QUARTER_APOTOME, -1);
    }
    if strip_any(&mut quality, &["QA", "¾A"]) {
        shift(&mut vector, SESQUI_QUARTER_APOTOME, 1);
    }
    if strip_any(&mut quality, &["Qd", "¾d"]) {
        shift(&mut vector, SESQUI_QUARTER_APOTOME, -1);
    }
    if strip_any(&mut quality, &["sA", "½A"]) {
        shift(&mut vector, SEMIAPOTOME, 1);
    }
    if strip_any(&mut quality, &["sd", "½d"]) {
        shift(&mut vector, SEMIAPOTOME, -1);
    }
    while strip_any(&mut quality, &["A"]) {
        shift(&mut vector, APOTOME, 1);
    }
    while strip_any(&mut quality, &["d"]) {
        shift(&mut vector, APOTOME, -1);
    }

    match quality {
        "M" => shift(&mut vector, SEMIAPOTOME, 1),
        "m" => shift(&mut vector, SEMIAPOTOME, -1),
        "sM" | "½M" => shift(&mut vector, QUARTER_APOTOME, 1),
        "sm" | "½m" => shift(&mut vector, QUARTER_APOTOME, -1),
        _ => {}
    }

    let result = quarter_monzo(vector);
    if node.degree.negative {
        return result.inverse();
    }
    Ok(result)
}

/// Extract `(twos, threes)` from a value with nothing beyond the 3-limit
pub(crate) fn three_limit(monzo: &TimeMonzo) -> Option<(Exponent, Exponent)> {
    if !monzo.is_scalar()
        || monzo.cents != 0.0
        || !monzo.residual.is_one()
        || monzo.prime_exponents.len() > 2
    {
        return None;
    }
    let component = |i: usize| monzo.prime_exponents.get(i).copied().unwrap_or_else(Exponent::zero);
    Some((component(0), component(1)))
}

/// Convert an exact count of quarter-threes off center into a whole step count
pub(crate) fn off_center(threes: &Exponent, table_threes: i64) -> Option<i64> {
    // (threes - table) / 1.75 == 4 * (threes - table) / 7
    let quarters = threes * Exponent::from_integer(4) - Exponent::from_integer(table_threes);
    let steps = quarters / Exponent::from_integer(QUALITY_STEP);
    steps.is_integer().then(|| steps.to_integer())
}

/// Map a 3-limit value back to an interval name, `None` if it has no name
pub fn monzo_to_node(monzo: &TimeMonzo) -> Option<Pythagorean> {
    let (twos, threes) = three_limit(monzo)?;
    let mut stepspan = twos * Exponent::from_integer(7) + threes * Exponent::from_integer(11);
    let negative = stepspan.is_negative();
    let threes = if negative {
        stepspan = -stepspan;
        -threes
    } else {
        threes
    };
    let interordinal = match *stepspan.denom() {
        1 => false,
        2 => true,
        _ => {
            log::trace!("Stepspan {} is not a whole or half step", stepspan);
            return None;
        }
    };
    let whole = if interordinal {
        (stepspan - Exponent::new(1, 2)).to_integer()
    } else {
        stepspan.to_integer()
    };
    let index = whole.mod_floor(&7) as usize;
    let octaves = whole.div_floor(&7);
    let table_threes = if interordinal {
        TONESPLITTER_VECTORS[index].1
    } else {
        PYTH_VECTORS[index].1
    };
    let mut offset = off_center(&threes, table_threes)?;

    let degree = Degree {
        negative,
        base: index as u8 + 1,
        interordinal,
        octaves,
    };
    let imperfect = !degree.is_perfect();
    let (spectrum, half): (&[&str], i64) = if imperfect {
        (&IMPERFECT_QUALITY_SPECTRUM, 6)
    } else {
        (&PERFECT_QUALITY_SPECTRUM, 4)
    };

    // Whole apotomes are appended after the fractional remainder so that the
    // name maps back to the same vector.
    let mut peeled = String::new();
    while offset < -half {
        peeled.push('d');
        offset += 4;
    }
    while offset > half {
        peeled.push('A');
        offset -= 4;
    }
    let quality = format!("{}{}", spectrum[(offset + half) as usize], peeled);

    Some(Pythagorean {
        quality,
        imperfect,
        degree,
    })
}
