//! Recursive descent parser for interval literals
//!
//! Productions, tried in order:
//! 1. Up/down and lift/drop prefixes followed by an inflectable literal
//! 2. Monzos `[-4 4 -1>` and vals `<12 19 28]`
//! 3. Numbers: integers, fractions, nedji, decimals, cents, hertz
//! 4. Pythagorean and FJS names (`M3^5`, `AA-2`, `m6.5`)
//! 5. Absolute FJS pitches (`C4`, `E♭4^5`, `phi@4`)

use num_traits::CheckedMul;

use crate::error::Result;
use crate::models::literal::{AbsoluteFjsLiteral, FjsLiteral, IntervalLiteral};
use crate::notation::absolute::{
    accidental_vector, AbsolutePitch, Nominal, ACCIDENTAL_CHARS, ACCIDENTAL_FRACTIONS,
    NOMINAL_CHARS, SPELLED_NOMINALS,
};
use crate::notation::fjs::{FjsFlavor, FjsInflection};
use crate::notation::pythagorean::{Degree, Pythagorean};
use crate::parse::tokens::Scanner;
use crate::utils::rational::{checked_pow, Exponent};

/// Frequency unit written after a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Hertz,
    Kilohertz,
    Millihertz,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Hertz => "Hz",
            Unit::Kilohertz => "kHz",
            Unit::Millihertz => "mHz",
        }
    }

    /// Multiplier relative to one hertz
    pub fn scale(&self) -> Exponent {
        match self {
            Unit::Hertz => Exponent::from_integer(1),
            Unit::Kilohertz => Exponent::from_integer(1000),
            Unit::Millihertz => Exponent::new(1, 1000),
        }
    }
}

/// A literal together with an optional frequency unit
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLiteral {
    pub node: IntervalLiteral,
    pub unit: Option<Unit>,
}

impl ParsedLiteral {
    fn bare(node: IntervalLiteral) -> Self {
        ParsedLiteral { node, unit: None }
    }
}

/// Parse a complete literal (recursive descent entry point)
pub fn parse_literal(text: &str) -> Result<ParsedLiteral> {
    let mut scanner = Scanner::new(text.trim());
    if scanner.is_done() {
        return Err(scanner.error("Empty literal"));
    }
    let (ups, lifts) = ups_and_lifts(&mut scanner);
    let parsed = if ups != 0 || lifts != 0 {
        let node = inflectable(&mut scanner)?;
        let node = node
            .with_inflection(ups, lifts)
            .ok_or_else(|| scanner.error("Ups and lifts need an FJS, monzo or val"))?;
        ParsedLiteral::bare(node)
    } else {
        literal(&mut scanner)?
    };
    if !scanner.is_done() {
        return Err(scanner.unexpected());
    }
    log::trace!("Parsed '{}' as {:?}", text, parsed.node);
    Ok(parsed)
}

fn ups_and_lifts(scanner: &mut Scanner) -> (i64, i64) {
    let mut ups = 0;
    let mut lifts = 0;
    loop {
        match scanner.peek() {
            Some('^') => ups += 1,
            Some('v') => ups -= 1,
            Some('/') => lifts += 1,
            Some('\\') => lifts -= 1,
            _ => break,
        }
        scanner.bump();
    }
    (ups, lifts)
}

fn literal(scanner: &mut Scanner) -> Result<ParsedLiteral> {
    match scanner.peek() {
        Some('[') => Ok(ParsedLiteral::bare(monzo(scanner)?)),
        Some('<') => Ok(ParsedLiteral::bare(val(scanner)?)),
        Some(c) if c.is_ascii_digit() => number(scanner),
        Some(_) => Ok(ParsedLiteral::bare(notation(scanner)?)),
        None => Err(scanner.unexpected()),
    }
}

fn inflectable(scanner: &mut Scanner) -> Result<IntervalLiteral> {
    match scanner.peek() {
        Some('[') => monzo(scanner),
        Some('<') => val(scanner),
        _ => notation(scanner),
    }
}

// ============================================================================
// Numbers
// ============================================================================

fn digits(scanner: &mut Scanner) -> Result<String> {
    if !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
        return Err(scanner.error("Expected a digit"));
    }
    Ok(scanner.take_while(|c| c.is_ascii_digit()))
}

/// Digits with optional `_` separators
///
/// Only numeric literals take separators; in FJS `_` starts the subscripts.
fn separated_digits(scanner: &mut Scanner) -> Result<String> {
    if !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
        return Err(scanner.error("Expected a digit"));
    }
    let raw = scanner.take_while(|c| c.is_ascii_digit() || c == '_');
    Ok(raw.replace('_', ""))
}

fn parse_integer(scanner: &Scanner, text: &str) -> Result<i64> {
    text.parse()
        .map_err(|_| scanner.error(format!("Integer {} is too large", text)))
}

fn integer(scanner: &mut Scanner) -> Result<i64> {
    let text = digits(scanner)?;
    parse_integer(scanner, &text)
}

fn separated_integer(scanner: &mut Scanner) -> Result<i64> {
    let text = separated_digits(scanner)?;
    parse_integer(scanner, &text)
}

/// Optionally signed integer or fraction, as in monzo components
fn signed_fraction(scanner: &mut Scanner) -> Result<Exponent> {
    let negative = if scanner.eat('-') {
        true
    } else {
        scanner.eat('+');
        false
    };
    let numerator = integer(scanner)?;
    let mut value = Exponent::from_integer(numerator);
    if scanner.eat('/') {
        let denominator = integer(scanner)?;
        if denominator == 0 {
            return Err(scanner.error("Zero denominator"));
        }
        value = Exponent::new(numerator, denominator);
    }
    Ok(if negative { -value } else { value })
}

fn decimal_value(scanner: &Scanner, whole: &str, fractional: &str, exponent: i64) -> Result<Exponent> {
    let too_large = || scanner.error("Decimal literal is too large");
    let numerator: i64 = format!("{}{}", whole, fractional)
        .parse()
        .map_err(|_| too_large())?;
    let shift = exponent
        .checked_sub(fractional.len() as i64)
        .ok_or_else(too_large)?;
    let power = checked_pow(&Exponent::from_integer(10), shift).ok_or_else(too_large)?;
    Exponent::from_integer(numerator)
        .checked_mul(&power)
        .ok_or_else(too_large)
}

fn real_value(scanner: &Scanner, whole: &str, fractional: &str) -> Result<f64> {
    format!("{}.{}", whole, if fractional.is_empty() { "0" } else { fractional })
        .parse()
        .map_err(|_| scanner.error("Invalid real literal"))
}

/// Scientific exponent after `e`, `None` for a bare decimal suffix
fn scientific_exponent(scanner: &mut Scanner) -> Result<Option<i64>> {
    let signed = matches!(scanner.peek(), Some('-') | Some('+'))
        && scanner.peek_at(1).map_or(false, |c| c.is_ascii_digit());
    if !signed && !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
        return Ok(None);
    }
    let negative = scanner.eat('-');
    scanner.eat('+');
    let magnitude = integer(scanner)?;
    Ok(Some(if negative { -magnitude } else { magnitude }))
}

fn number(scanner: &mut Scanner) -> Result<ParsedLiteral> {
    let whole = separated_digits(scanner)?;
    let node = match scanner.peek() {
        Some('/') => {
            scanner.bump();
            let numerator = whole
                .parse()
                .map_err(|_| scanner.error("Numerator is too large"))?;
            let denominator = separated_integer(scanner)?;
            IntervalLiteral::Fraction {
                numerator,
                denominator,
            }
        }
        Some('\\') => {
            scanner.bump();
            let numerator = whole
                .parse()
                .map_err(|_| scanner.error("Numerator is too large"))?;
            let denominator = separated_integer(scanner)?;
            let equave = if scanner.eat('<') {
                let equave = signed_fraction(scanner)?;
                if !scanner.eat('>') {
                    return Err(scanner.error("Expected '>' after equave"));
                }
                Some(equave)
            } else {
                None
            };
            IntervalLiteral::Nedji {
                numerator,
                denominator,
                equave,
            }
        }
        Some(separator @ ('.' | ',')) => {
            scanner.bump();
            let fractional = if scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
                separated_digits(scanner)?
            } else {
                String::new()
            };
            if separator == ',' && fractional.is_empty() {
                return Err(scanner.error("Expected digits after ','"));
            }
            match decimal_suffix(scanner, &whole, &fractional)? {
                Some(node) => node,
                None if separator == ',' => IntervalLiteral::Decimal {
                    value: decimal_value(scanner, &whole, &fractional, 0)?,
                },
                None => IntervalLiteral::Cents {
                    value: decimal_value(scanner, &whole, &fractional, 0)?,
                },
            }
        }
        _ => match decimal_suffix(scanner, &whole, "")? {
            Some(node) => node,
            None => IntervalLiteral::Integer {
                value: whole
                    .parse()
                    .map_err(|_| scanner.error(format!("Integer {} is too large", whole)))?,
            },
        },
    };
    let unit = unit(scanner);
    let node = match (node, unit) {
        // `440. Hz` reads as a plain decimal frequency
        (IntervalLiteral::Cents { value }, Some(_)) => IntervalLiteral::Decimal { value },
        (node, _) => node,
    };
    with_unit(scanner, ParsedLiteral { node, unit })
}

/// `e`, `r` and `rc` suffixes
fn decimal_suffix(scanner: &mut Scanner, whole: &str, fractional: &str) -> Result<Option<IntervalLiteral>> {
    if scanner.eat('e') {
        let exponent = scientific_exponent(scanner)?.unwrap_or(0);
        return Ok(Some(IntervalLiteral::Decimal {
            value: decimal_value(scanner, whole, fractional, exponent)?,
        }));
    }
    if scanner.eat('r') {
        let value = real_value(scanner, whole, fractional)?;
        if scanner.eat('c') {
            return Ok(Some(IntervalLiteral::RealCents { value }));
        }
        return Ok(Some(IntervalLiteral::RealDecimal { value }));
    }
    Ok(None)
}

/// Optional whitespace and a frequency unit, rewinding when absent
fn unit(scanner: &mut Scanner) -> Option<Unit> {
    let start = scanner.position();
    scanner.skip_whitespace();
    for unit in [Unit::Kilohertz, Unit::Millihertz, Unit::Hertz] {
        if scanner.eat_str(unit.as_str()) {
            return Some(unit);
        }
    }
    scanner.reset(start);
    None
}

fn with_unit(scanner: &Scanner, parsed: ParsedLiteral) -> Result<ParsedLiteral> {
    if parsed.unit.is_none() {
        return Ok(parsed);
    }
    match parsed.node {
        IntervalLiteral::Integer { .. }
        | IntervalLiteral::Fraction { .. }
        | IntervalLiteral::Decimal { .. }
        | IntervalLiteral::RealDecimal { .. } => Ok(parsed),
        _ => Err(scanner.error("Only scalars can carry a frequency unit")),
    }
}

// ============================================================================
// Monzos and vals
// ============================================================================

fn components(scanner: &mut Scanner, close: char) -> Result<Vec<Exponent>> {
    let mut result = Vec::new();
    loop {
        scanner.take_while(|c| c.is_whitespace() || c == ',');
        if scanner.eat(close) {
            return Ok(result);
        }
        if scanner.is_done() {
            return Err(scanner.error(format!("Expected '{}'", close)));
        }
        result.push(signed_fraction(scanner)?);
    }
}

fn monzo(scanner: &mut Scanner) -> Result<IntervalLiteral> {
    if !scanner.eat('[') {
        return Err(scanner.unexpected());
    }
    Ok(IntervalLiteral::Monzo {
        components: components(scanner, '>')?,
        ups: 0,
        lifts: 0,
    })
}

fn val(scanner: &mut Scanner) -> Result<IntervalLiteral> {
    if !scanner.eat('<') {
        return Err(scanner.unexpected());
    }
    Ok(IntervalLiteral::Val {
        components: components(scanner, ']')?,
        ups: 0,
        lifts: 0,
    })
}

// ============================================================================
// Pythagorean and FJS
// ============================================================================

const QUALITY_CHARS: &str = "PMmnsqQ½¼¾Ad";

const FLAVOR_CHARS: &str = "cfnhmls";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QualityKind {
    Perfect,
    Imperfect,
    Neutral,
    /// Augmented or diminished, valid on any degree
    Either,
}

fn quality_kind(quality: &str) -> Option<QualityKind> {
    match quality {
        "P" => return Some(QualityKind::Perfect),
        "M" | "m" | "sM" | "sm" | "½M" | "½m" => return Some(QualityKind::Imperfect),
        "n" => return Some(QualityKind::Neutral),
        _ => {}
    }
    if !quality.is_empty() && (quality.chars().all(|c| c == 'A') || quality.chars().all(|c| c == 'd')) {
        return Some(QualityKind::Either);
    }
    let mut chars = quality.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(fraction), Some('A' | 'd'), None) if "sqQ½¼¾".contains(fraction) => {
            Some(QualityKind::Either)
        }
        _ => None,
    }
}

fn check_quality(scanner: &Scanner, kind: QualityKind, pythagorean: &Pythagorean) -> Result<()> {
    let degree = &pythagorean.degree;
    let valid = match kind {
        QualityKind::Perfect => degree.is_perfect(),
        QualityKind::Imperfect => !degree.is_perfect(),
        QualityKind::Neutral => !degree.is_perfect() || matches!(degree.base, 4 | 5),
        QualityKind::Either => true,
    };
    if !valid {
        return Err(scanner.error(format!("Invalid interval '{}'", pythagorean)));
    }
    Ok(())
}

fn inflection_list(scanner: &mut Scanner, into: &mut Vec<FjsInflection>) -> Result<()> {
    loop {
        let number = digits(scanner)?;
        let number: u64 = number
            .parse()
            .map_err(|_| scanner.error("Inflection is too large"))?;
        if number == 0 {
            return Err(scanner.error("Inflection must be positive"));
        }
        let flavor = match scanner.peek() {
            Some(c) if FLAVOR_CHARS.contains(c) => {
                scanner.bump();
                FjsFlavor::from_suffix(&c.to_string()).unwrap_or_default()
            }
            _ => FjsFlavor::Formal,
        };
        into.push(FjsInflection::new(number, flavor));
        if !scanner.eat(',') {
            return Ok(());
        }
    }
}

/// Superscript (`^`) and subscript (`_`) inflection lists
fn inflections(scanner: &mut Scanner) -> Result<(Vec<FjsInflection>, Vec<FjsInflection>)> {
    let mut superscripts = Vec::new();
    let mut subscripts = Vec::new();
    loop {
        if scanner.eat('^') {
            inflection_list(scanner, &mut superscripts)?;
        } else if scanner.eat('_') {
            inflection_list(scanner, &mut subscripts)?;
        } else {
            return Ok((superscripts, subscripts));
        }
    }
}

fn notation(scanner: &mut Scanner) -> Result<IntervalLiteral> {
    let start = scanner.position();
    if let Some(node) = fjs(scanner)? {
        return Ok(node);
    }
    scanner.reset(start);
    absolute_fjs(scanner)
}

/// Relative FJS, `None` when the text is not shaped like an interval name
fn fjs(scanner: &mut Scanner) -> Result<Option<IntervalLiteral>> {
    let quality = scanner.take_while(|c| QUALITY_CHARS.contains(c));
    let Some(kind) = quality_kind(&quality) else {
        return Ok(None);
    };
    let negative = scanner.eat('-');
    if !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
        return Ok(None);
    }
    let number = integer(scanner)?;
    let interordinal = scanner.eat_str(".5");
    if !(scanner.is_done() || matches!(scanner.peek(), Some('^') | Some('_'))) {
        return Ok(None);
    }
    let number = if negative { -number } else { number };
    let degree = Degree::from_number(number, interordinal).map_err(|e| scanner.error(e.to_string()))?;
    let pythagorean = Pythagorean::new(quality, degree);
    check_quality(scanner, kind, &pythagorean)?;
    let (superscripts, subscripts) = inflections(scanner)?;
    Ok(Some(IntervalLiteral::Fjs(FjsLiteral {
        ups: 0,
        lifts: 0,
        pythagorean,
        superscripts,
        subscripts,
    })))
}

fn nominal(scanner: &mut Scanner) -> Result<Nominal> {
    for spelled in SPELLED_NOMINALS {
        if scanner.eat_str(spelled) {
            return spelled.parse();
        }
    }
    match scanner.peek() {
        Some(c) if NOMINAL_CHARS.contains(c) => {
            scanner.bump();
            c.to_string().parse()
        }
        _ => Err(scanner.unexpected()),
    }
}

fn accidental(scanner: &mut Scanner) -> Result<Option<String>> {
    let token = match (scanner.peek(), scanner.peek_at(1)) {
        (Some(fraction), Some(base)) if ACCIDENTAL_FRACTIONS.contains(fraction) && "♯#♭b".contains(base) => {
            format!("{}{}", fraction, base)
        }
        (Some(c), _) if ACCIDENTAL_CHARS.contains(c) => c.to_string(),
        _ => return Ok(None),
    };
    accidental_vector(&token).map_err(|e| scanner.error(e.to_string()))?;
    scanner.reset(scanner.position() + token.chars().count());
    Ok(Some(token))
}

fn absolute_fjs(scanner: &mut Scanner) -> Result<IntervalLiteral> {
    let nominal = nominal(scanner)?;
    let mut accidentals = Vec::new();
    while let Some(token) = accidental(scanner)? {
        accidentals.push(token);
    }
    let negative = scanner.eat('-');
    if !scanner.peek().map_or(false, |c| c.is_ascii_digit()) {
        return Err(scanner.error("Expected an octave number"));
    }
    let octave = integer(scanner)?;
    let (superscripts, subscripts) = inflections(scanner)?;
    Ok(IntervalLiteral::AbsoluteFjs(AbsoluteFjsLiteral {
        ups: 0,
        lifts: 0,
        pitch: AbsolutePitch {
            nominal,
            accidentals,
            octave: if negative { -octave } else { octave },
        },
        superscripts,
        subscripts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntervalError;

    fn node(text: &str) -> IntervalLiteral {
        parse_literal(text).unwrap().node
    }

    #[test]
    fn test_integers_and_fractions() {
        assert_eq!(node("1_000"), IntervalLiteral::Integer { value: 1000 });
        assert_eq!(
            node("6/4"),
            IntervalLiteral::Fraction {
                numerator: 6,
                denominator: 4
            }
        );
    }

    #[test]
    fn test_decimals() {
        assert_eq!(
            node("1.2e"),
            IntervalLiteral::Decimal {
                value: Exponent::new(6, 5)
            }
        );
        assert_eq!(
            node("1,2"),
            IntervalLiteral::Decimal {
                value: Exponent::new(6, 5)
            }
        );
        assert_eq!(
            node("14e-1"),
            IntervalLiteral::Decimal {
                value: Exponent::new(7, 5)
            }
        );
        assert_eq!(node("3.14r"), IntervalLiteral::RealDecimal { value: 3.14 });
    }

    #[test]
    fn test_cents() {
        assert_eq!(
            node("701.955"),
            IntervalLiteral::Cents {
                value: Exponent::new(701955, 1000)
            }
        );
        assert_eq!(
            node("88."),
            IntervalLiteral::Cents {
                value: Exponent::from_integer(88)
            }
        );
        assert_eq!(node("1.5rc"), IntervalLiteral::RealCents { value: 1.5 });
    }

    #[test]
    fn test_nedji() {
        assert_eq!(
            node("7\\12"),
            IntervalLiteral::Nedji {
                numerator: 7,
                denominator: 12,
                equave: None
            }
        );
        assert_eq!(node("7\\5<4/3>").to_string(), "7\\5<4/3>");
    }

    #[test]
    fn test_monzo_and_val() {
        assert_eq!(node("[-4 4 -1>").to_string(), "[-4 4 -1>");
        assert_eq!(node("<12, 19, 28]").to_string(), "<12 19 28]");
        assert_eq!(node("^^[1/2 0>").to_string(), "^^[1/2 0>");
        assert!(parse_literal("[1 2").is_err());
    }

    #[test]
    fn test_hertz() {
        let parsed = parse_literal("440 Hz").unwrap();
        assert_eq!(parsed.unit, Some(Unit::Hertz));
        assert_eq!(parsed.node, IntervalLiteral::Integer { value: 440 });
        assert_eq!(parse_literal("1.5kHz").unwrap().unit, Some(Unit::Kilohertz));
        assert_eq!(parse_literal("3 mHz").unwrap().unit, Some(Unit::Millihertz));
        assert!(parse_literal("7\\12 Hz").is_err());
    }

    #[test]
    fn test_pythagorean_names() {
        assert_eq!(node("M3^5").to_string(), "M3^5");
        assert_eq!(node("n6_11n").to_string(), "n6_11n");
        assert_eq!(node("AA-2").to_string(), "AA-2");
        assert_eq!(node("m6.5").to_string(), "m6.5");
        assert_eq!(node("P8").to_string(), "P8");
        assert!(matches!(node("A4"), IntervalLiteral::Fjs(_)));
    }

    #[test]
    fn test_invalid_qualities() {
        assert!(matches!(parse_literal("n8"), Err(IntervalError::Parse { .. })));
        assert!(parse_literal("M4").is_err());
        assert!(parse_literal("P3").is_err());
        assert!(parse_literal("n4").is_ok());
    }

    #[test]
    fn test_absolute_pitches() {
        assert_eq!(node("C4").to_string(), "C4");
        assert_eq!(node("E♭4^5").to_string(), "E♭4^5");
        assert_eq!(node("G4_11n,11n").to_string(), "G4_11n,11n");
        assert!(matches!(node("a4"), IntervalLiteral::AbsoluteFjs(_)));
        assert!(matches!(node("Ab4"), IntervalLiteral::AbsoluteFjs(_)));
        match node("phi@4") {
            IntervalLiteral::AbsoluteFjs(literal) => {
                assert_eq!(literal.pitch.nominal, Nominal::Phi);
                assert_eq!(literal.pitch.accidentals, vec!["@".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_literal("C").is_err());
    }

    #[test]
    fn test_subscripts_follow_numbers() {
        let formal = |n: u64| FjsInflection::new(n, FjsFlavor::Formal);
        match node("M3_7") {
            IntervalLiteral::Fjs(literal) => {
                assert_eq!(literal.pythagorean.to_string(), "M3");
                assert!(literal.superscripts.is_empty());
                assert_eq!(literal.subscripts, vec![formal(7)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match node("C4_5") {
            IntervalLiteral::AbsoluteFjs(literal) => {
                assert_eq!(literal.pitch.octave, 4);
                assert_eq!(literal.subscripts, vec![formal(5)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match node("M3^5_7") {
            IntervalLiteral::Fjs(literal) => {
                assert_eq!(literal.superscripts, vec![formal(5)]);
                assert_eq!(literal.subscripts, vec![formal(7)]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(node("M3^5_7").to_string(), "M3^5_7");
        assert_eq!(node("1_0/2_0").to_string(), "10/20");
    }

    #[test]
    fn test_ups_and_lifts() {
        match node("/vM3") {
            IntervalLiteral::Fjs(literal) => {
                assert_eq!(literal.ups, -1);
                assert_eq!(literal.lifts, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_literal("^3/2").is_err());
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(matches!(
            parse_literal("3/2x"),
            Err(IntervalError::Parse { position: 3, .. })
        ));
        assert!(parse_literal("").is_err());
    }
}
