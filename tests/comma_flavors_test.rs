use xen_interval::notation::commas::{flora_comma, formal_comma, neutral_comma};
use xen_interval::utils::primes::prime_index;
use xen_interval::Exponent;

fn neutral_square(p: i64) -> Exponent {
    let index = prime_index(p).unwrap();
    neutral_comma(index)
        .unwrap()
        .pow_fraction(&Exponent::from_integer(2))
        .unwrap()
        .to_fraction()
        .unwrap()
}

/// FloraC only moves the primes whose formal comma is wider than half an apotome
#[test]
fn test_formal_and_flora_agree_except_three_primes() {
    for index in 2..100 {
        let formal = formal_comma(index).unwrap().to_fraction().unwrap();
        let flora = flora_comma(index).unwrap().to_fraction().unwrap();
        if matches!(index, 10 | 36 | 70) {
            assert_ne!(formal, flora, "prime index {}", index);
        } else {
            assert_eq!(formal, flora, "prime index {}", index);
        }
    }
}

#[test]
fn test_formal_commas() {
    let comma = |p: i64| formal_comma(prime_index(p).unwrap()).unwrap().to_fraction().unwrap();
    assert_eq!(comma(5), Exponent::new(80, 81));
    assert_eq!(comma(7), Exponent::new(63, 64));
}

#[test]
fn test_neutral_comma_squares() {
    assert_eq!(neutral_square(5), Exponent::new(25, 24));
    assert_eq!(neutral_square(7), Exponent::new(49, 54));
    assert_eq!(neutral_square(11), Exponent::new(242, 243));
    assert_eq!(neutral_square(13), Exponent::new(507, 512));
}

#[test]
fn test_cache_lookups_are_stable() {
    let late = formal_comma(50).unwrap();
    let early = formal_comma(3).unwrap();
    assert_eq!(formal_comma(50).unwrap(), late);
    assert_eq!(formal_comma(3).unwrap(), early);
}
