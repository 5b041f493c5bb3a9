//! Prime tables shared by the value type and the comma calculus
//!
//! The first `NUMBER_OF_COMPONENTS` primes are tracked as explicit exponents on
//! every value. The longer `PRIMES` table bounds factorization and comma
//! discovery: asking for anything past it is a hard error.

use num_rational::Ratio;
use once_cell::sync::Lazy;

use crate::error::{IntervalError, Result};

/// Number of primes tracked as explicit exponents (2 through 97)
pub const NUMBER_OF_COMPONENTS: usize = 25;

/// Number of primes known to factorization and comma discovery
pub const PRIME_TABLE_SIZE: usize = 1000;

pub static PRIMES: Lazy<Vec<i64>> = Lazy::new(|| first_primes(PRIME_TABLE_SIZE));

/// Size of each prime in cents: 1200·log2(p)
pub static PRIME_CENTS: Lazy<Vec<f64>> =
    Lazy::new(|| PRIMES.iter().map(|&p| 1200.0 * (p as f64).log2()).collect());

fn first_primes(count: usize) -> Vec<i64> {
    let mut limit = 8 * count.max(8);
    loop {
        let mut composite = vec![false; limit + 1];
        let mut primes = Vec::with_capacity(count);
        for n in 2..=limit {
            if composite[n] {
                continue;
            }
            primes.push(n as i64);
            if primes.len() == count {
                return primes;
            }
            let mut multiple = n * n;
            while multiple <= limit {
                composite[multiple] = true;
                multiple += n;
            }
        }
        limit *= 2;
    }
}

/// Get the prime at `index` (0 → 2, 1 → 3, ...)
pub fn prime(index: usize) -> Result<i64> {
    PRIMES.get(index).copied().ok_or(IntervalError::OutOfPrimes {
        index,
        size: PRIMES.len(),
    })
}

/// Get the index of a prime in the table
pub fn prime_index(p: i64) -> Option<usize> {
    PRIMES.binary_search(&p).ok()
}

/// Trial-divide a positive integer by the first `limit` primes.
///
/// Returns the trimmed exponent vector and the cofactor left over.
pub fn factor_over(mut n: i64, limit: usize) -> (Vec<i64>, i64) {
    let mut exponents = Vec::new();
    if n <= 1 {
        return (exponents, n);
    }
    for (index, &p) in PRIMES.iter().take(limit).enumerate() {
        if p * p > n {
            // What remains is 1 or a single prime.
            if n > 1 {
                if let Some(last) = prime_index(n).filter(|&i| i < limit) {
                    exponents.resize(last + 1, 0);
                    exponents[last] += 1;
                    n = 1;
                }
            }
            break;
        }
        while n % p == 0 {
            if exponents.len() <= index {
                exponents.resize(index + 1, 0);
            }
            exponents[index] += 1;
            n /= p;
        }
    }
    (exponents, n)
}

/// `|n|` as `(magnitude, extra twos)`; `i64::MIN` is halved to fit
fn split_magnitude(n: i64) -> (i64, i64) {
    match n.checked_abs() {
        Some(magnitude) => (magnitude, 0),
        None => (-(n / 2), 1),
    }
}

fn add_twos(exponents: &mut Vec<i64>, twos: i64) {
    if twos == 0 {
        return;
    }
    if exponents.is_empty() {
        exponents.push(0);
    }
    exponents[0] += twos;
}

/// [`factor_over`] applied to `|n|`, including `i64::MIN`
pub fn factor_magnitude(n: i64, limit: usize) -> (Vec<i64>, i64) {
    let (magnitude, twos) = split_magnitude(n);
    let (mut exponents, rest) = factor_over(magnitude, limit);
    add_twos(&mut exponents, twos);
    (exponents, rest)
}

/// Factor a positive integer completely over the prime table
pub fn to_monzo(n: i64) -> Result<Vec<i64>> {
    if n < 1 {
        return Err(IntervalError::representation(format!(
            "Cannot factor non-positive integer {}",
            n
        )));
    }
    let (exponents, cofactor) = factor_over(n, PRIMES.len());
    if cofactor != 1 {
        return Err(IntervalError::OutOfPrimes {
            index: PRIMES.len(),
            size: PRIMES.len(),
        });
    }
    Ok(exponents)
}

/// Factor the magnitude of a fraction completely over the prime table
pub fn fraction_to_monzo(value: &Ratio<i64>) -> Result<Vec<i64>> {
    let (magnitude, twos) = split_magnitude(*value.numer());
    let mut result = to_monzo(magnitude)?;
    add_twos(&mut result, twos);
    let denominator = to_monzo(*value.denom())?;
    if result.len() < denominator.len() {
        result.resize(denominator.len(), 0);
    }
    for (i, e) in denominator.iter().enumerate() {
        result[i] -= e;
    }
    while result.last() == Some(&0) {
        result.pop();
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bounds() {
        assert_eq!(PRIMES.len(), PRIME_TABLE_SIZE);
        assert_eq!(PRIMES[0], 2);
        assert_eq!(PRIMES[24], 97);
        assert_eq!(PRIMES[999], 7919);
        assert!(matches!(
            prime(PRIME_TABLE_SIZE),
            Err(IntervalError::OutOfPrimes { .. })
        ));
    }

    #[test]
    fn test_factor_over_leaves_cofactor() {
        let (exponents, cofactor) = factor_over(2 * 9 * 101, NUMBER_OF_COMPONENTS);
        assert_eq!(exponents, vec![1, 2]);
        assert_eq!(cofactor, 101);
    }

    #[test]
    fn test_factor_magnitude_of_most_negative() {
        let (exponents, cofactor) = factor_magnitude(i64::MIN, NUMBER_OF_COMPONENTS);
        assert_eq!(exponents, vec![63]);
        assert_eq!(cofactor, 1);
        let (exponents, cofactor) = factor_magnitude(-12, NUMBER_OF_COMPONENTS);
        assert_eq!(exponents, vec![2, 1]);
        assert_eq!(cofactor, 1);
        assert_eq!(fraction_to_monzo(&Ratio::new(i64::MIN, 3)).unwrap(), vec![63, -1]);
    }

    #[test]
    fn test_fraction_to_monzo() {
        assert_eq!(
            fraction_to_monzo(&Ratio::new(25, 24)).unwrap(),
            vec![-3, -1, 2]
        );
        assert_eq!(fraction_to_monzo(&Ratio::new(4, 4)).unwrap(), Vec::<i64>::new());
    }
}
