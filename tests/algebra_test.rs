use xen_interval::api::{
    bleach, simplify, to_cents, to_fraction, to_relative_linear, unlabel,
};
use xen_interval::models::interval::Domain;
use xen_interval::{
    from_notation, ApproximationSettings, Color, Exponent, Interval, IntervalError, RootContext,
    TimeMonzo, Val,
};

fn read(text: &str, context: &RootContext) -> Interval {
    from_notation(text, context).unwrap().into_interval().unwrap()
}

fn ints(values: &[i64]) -> Vec<Exponent> {
    values.iter().map(|&v| Exponent::from_integer(v)).collect()
}

#[test]
fn test_domain_closure() {
    let context = RootContext::new();
    let sum = read("3/2", &context).add(&read("1/2", &context)).unwrap();
    assert_eq!(sum.domain, Domain::Linear);
    assert_eq!(sum.to_string(), "4/2");

    let stacked = read("P5", &context).add(&read("7\\12", &context)).unwrap();
    assert_eq!(stacked.domain, Domain::Logarithmic);
    let difference = read("1.5rc", &context).sub(&read("M3^5", &context)).unwrap();
    assert_eq!(difference.domain, Domain::Logarithmic);

    assert!(read("3/2", &context).add(&read("P5", &context)).is_err());
    assert!(read("P5", &context).sub(&read("5/4", &context)).is_err());
}

#[test]
fn test_integer_powers_stay_exact() {
    let fifth = Interval::from_fraction(Exponent::new(3, 2));
    let power = fifth.pow(&Interval::from_integer(5)).unwrap();
    assert_eq!(power.value.to_fraction().unwrap(), Exponent::new(243, 32));
    assert_eq!(power.value.cents, 0.0);
}

#[test]
fn test_subgroup_val_maps_to_one_step() {
    let val = Val::from_subgroup(&ints(&[5, 8, 7]), &ints(&[2, 15, 13])).unwrap();
    let interval = Interval::logarithmic(TimeMonzo::from_fraction(Exponent::new(15, 13)));
    assert_eq!(val.dot(&interval).unwrap().to_integer().unwrap(), 1);
}

#[test]
fn test_patent_val_from_literal() {
    let context = RootContext::new();
    let val = from_notation("<12 19 28]", &context).unwrap().into_val().unwrap();
    let third = read("M3^5", &context);
    assert_eq!(val.dot(&third).unwrap().to_string(), "4");
}

#[test]
fn test_frequencies_need_a_reference() {
    let context = RootContext::new();
    let a = read("440 Hz", &context);
    assert!(matches!(
        to_relative_linear(&a, &context),
        Err(IntervalError::MissingReference(_))
    ));

    let tuned = RootContext::new().with_unison_frequency(a.value.clone());
    let e = read("660 Hz", &tuned);
    let ratio = to_relative_linear(&e, &tuned).unwrap();
    assert_eq!(ratio.value.to_fraction().unwrap(), Exponent::new(3, 2));
    let settings = ApproximationSettings::default();
    assert_eq!(to_fraction(&e, None, &tuned, &settings).unwrap().to_string(), "3/2");
}

#[test]
fn test_formatting_helpers_are_idempotent() {
    let context = RootContext::new();
    let interval = read("M3^5", &context)
        .with_label("third")
        .with_color(Color::new("#f00"));
    let helpers: [fn(&Interval) -> Interval; 3] = [simplify, bleach, unlabel];
    for helper in helpers {
        let once = helper(&interval);
        assert_eq!(helper(&once), once);
    }
    assert_eq!(simplify(&interval).to_string(), "([-2 0 1> #f00 \"third\")");
    assert_eq!(bleach(&unlabel(&interval)).to_string(), "M3^5");
}

#[test]
fn test_stale_ups_render_canonically() {
    let mut context = RootContext::new();
    let upped = read("^M3", &context);
    assert_eq!(upped.str(Some(&context)), "^M3");
    context.set_up(TimeMonzo::from_cents(2.0));
    assert_ne!(upped.str(Some(&context)), "^M3");
}

#[test]
fn test_cents_rounding() {
    let context = RootContext::new();
    let fifth = Interval::from_fraction(Exponent::new(3, 2));
    assert_eq!(to_cents(&fifth, Some(1), &context).unwrap().to_string(), "702.");
    assert_eq!(to_cents(&fifth, Some(2), &context).unwrap().to_string(), "701.96");
}
