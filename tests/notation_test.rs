use xen_interval::api::{to_absolute_fjs, to_fjs};
use xen_interval::models::literal::IntervalLiteral;
use xen_interval::notation::fjs::{as_fjs, inflect, FjsFlavor, FjsInflection};
use xen_interval::notation::pythagorean::pythagorean_monzo;
use xen_interval::{
    from_notation, ApproximationSettings, Exponent, Interval, IntervalError, RootContext, TimeMonzo,
};

fn read(text: &str) -> Interval {
    from_notation(text, &RootContext::new())
        .unwrap()
        .into_interval()
        .unwrap()
}

fn monzo(components: &[i64]) -> TimeMonzo {
    TimeMonzo::new(
        Exponent::from_integer(0),
        components.iter().map(|&c| Exponent::from_integer(c)).collect(),
        Exponent::from_integer(1),
    )
}

#[test]
fn test_major_third_and_its_five_inflection() {
    assert_eq!(read("M3").value.to_fraction().unwrap(), Exponent::new(81, 64));
    assert_eq!(read("M3^5").value.to_fraction().unwrap(), Exponent::new(5, 4));
    assert_eq!(read("m7^7").value.to_fraction().unwrap(), Exponent::new(7, 4));
}

#[test]
fn test_augmented_unison_with_composite_inflection() {
    let context = RootContext::new();
    let result = to_fjs(
        &Interval::from_fraction(Exponent::new(25, 24)),
        None,
        &context,
        &ApproximationSettings::default(),
    )
    .unwrap();
    assert_eq!(result.to_string(), "A1^25");
    match result.node {
        Some(IntervalLiteral::Fjs(literal)) => {
            assert_eq!(literal.superscripts, vec![FjsInflection::new(25, FjsFlavor::Formal)]);
        }
        other => panic!("expected an FJS node, got {:?}", other),
    }
}

#[test]
fn test_half_exponent_of_eleven_has_no_spelling() {
    let root = TimeMonzo::from_integer(11)
        .pow_fraction(&Exponent::new(1, 2))
        .unwrap();
    assert!(as_fjs(&root, FjsFlavor::Formal).unwrap().is_none());
}

#[test]
fn test_reverse_then_forward_reproduces_exponents() {
    for flavor in [FjsFlavor::Formal, FjsFlavor::FloraC] {
        for twos in -6..=6 {
            for threes in -9..=9 {
                for fives in -2..=2 {
                    for sevens in -1..=1 {
                        let value = monzo(&[twos, threes, fives, sevens]);
                        let literal = as_fjs(&value, flavor)
                            .unwrap()
                            .unwrap_or_else(|| panic!("no spelling for {}", value));
                        let pythagorean = pythagorean_monzo(&literal.pythagorean).unwrap();
                        let back = inflect(&pythagorean, &literal.superscripts, &literal.subscripts)
                            .unwrap();
                        assert_eq!(
                            back.to_fraction().unwrap(),
                            value.to_fraction().unwrap(),
                            "{}",
                            literal
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_compound_intervals_report_octaves() {
    let context = RootContext::new();
    let settings = ApproximationSettings::default();
    let fifth = to_fjs(&Interval::from_integer(5), None, &context, &settings).unwrap();
    assert_eq!(fifth.to_string(), "M17^5");
    let down = to_fjs(&Interval::from_fraction(Exponent::new(1, 3)), None, &context, &settings).unwrap();
    assert_eq!(down.to_string(), "P-12");
}

#[test]
fn test_literals_render_as_written() {
    for text in ["n6_11n", "AA-2", "m6.5", "7\\5<4/3>", "[-4 4 -1>", "G4_11n,11n", "E♭4^5", "3/2", "1.5rc"] {
        assert_eq!(read(text).to_string(), text);
    }
}

#[test]
fn test_absolute_pitches_relative_to_c4() {
    let context = RootContext::new();
    let settings = ApproximationSettings::default();
    assert_eq!(read("C4").value.to_fraction().unwrap(), Exponent::from_integer(1));
    assert_eq!(read("G4").value.to_fraction().unwrap(), Exponent::new(3, 2));
    let seventh = to_absolute_fjs(
        &Interval::from_fraction(Exponent::new(7, 4)),
        None,
        &context,
        &settings,
    )
    .unwrap();
    assert_eq!(seventh.value.to_fraction().unwrap(), Exponent::new(7, 4));
    assert!(seventh.to_string().starts_with("B♭4^7"));
}

#[test]
fn test_reader_errors() {
    let context = RootContext::new();
    assert!(matches!(from_notation("n8", &context), Err(IntervalError::Parse { .. })));
    assert!(matches!(from_notation("M3^", &context), Err(IntervalError::Parse { .. })));
    assert!(matches!(from_notation("1/0", &context), Err(IntervalError::DivisionByZero)));
}
