use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use xen_interval::api::to_fjs;
use xen_interval::notation::commas::{register_comma_table, unregister_comma_table, CommaTable};
use xen_interval::notation::fjs::{as_fjs, FjsFlavor};
use xen_interval::{
    from_notation, ApproximationSettings, Exponent, Interval, IntervalError, Result, RootContext,
    TimeMonzo,
};

/// Prime-keyed table that writes the septimal comma inverted
struct SeptimalSwapTable {
    commas: HashMap<u64, TimeMonzo>,
}

impl SeptimalSwapTable {
    fn new() -> Self {
        let mut commas = HashMap::new();
        commas.insert(2, TimeMonzo::from_fraction(Exponent::new(80, 81)));
        commas.insert(3, TimeMonzo::from_fraction(Exponent::new(64, 63)));
        SeptimalSwapTable { commas }
    }
}

impl CommaTable for SeptimalSwapTable {
    fn prime_basis(&self) -> bool {
        true
    }

    fn comma(&self, key: u64) -> Result<TimeMonzo> {
        self.commas
            .get(&key)
            .cloned()
            .ok_or_else(|| IntervalError::Representation(format!("No comma for index {}", key)))
    }

    fn swapped(&self, index: usize) -> bool {
        index == 3
    }
}

/// Table keyed by the written inflection number
struct NamedCommaTable;

impl CommaTable for NamedCommaTable {
    fn prime_basis(&self) -> bool {
        false
    }

    fn comma(&self, key: u64) -> Result<TimeMonzo> {
        match key {
            5 => Ok(TimeMonzo::from_fraction(Exponent::new(80, 81))),
            _ => Err(IntervalError::Representation(format!("No comma named {}", key))),
        }
    }
}

fn fraction(text: &str) -> Exponent {
    from_notation(text, &RootContext::new())
        .unwrap()
        .into_interval()
        .unwrap()
        .value
        .to_fraction()
        .unwrap()
}

#[test]
fn test_registered_tables() {
    assert!(matches!(
        from_notation("M3^5m", &RootContext::new()),
        Err(IntervalError::MissingCommaTable(FjsFlavor::Hewm53))
    ));

    register_comma_table(FjsFlavor::Hewm53, Arc::new(SeptimalSwapTable::new()));
    assert_eq!(fraction("M3^5m"), Exponent::new(5, 4));
    assert_eq!(fraction("m7_7m"), Exponent::new(7, 4));

    let seventh = TimeMonzo::from_fraction(Exponent::new(7, 4));
    let literal = as_fjs(&seventh, FjsFlavor::Hewm53).unwrap().unwrap();
    assert_eq!(literal.to_string(), "m7_7m");

    let settings = ApproximationSettings {
        default_flavor: FjsFlavor::Hewm53,
        ..Default::default()
    };
    let third = to_fjs(
        &Interval::from_fraction(Exponent::new(5, 4)),
        None,
        &RootContext::new(),
        &settings,
    )
    .unwrap();
    assert_eq!(third.to_string(), "M3^5m");
    unregister_comma_table(FjsFlavor::Hewm53);

    register_comma_table(FjsFlavor::SyntonicRastmic, Arc::new(NamedCommaTable));
    assert_eq!(fraction("M3^5s"), Exponent::new(5, 4));
    let third = TimeMonzo::from_fraction(Exponent::new(5, 4));
    assert!(as_fjs(&third, FjsFlavor::SyntonicRastmic).is_err());
    unregister_comma_table(FjsFlavor::SyntonicRastmic);
}

#[test]
fn test_settings_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"simple_tolerance": 2.0, "default_flavor": "FloraC"}}"#).unwrap();
    let settings = ApproximationSettings::from_path(file.path()).unwrap();
    assert_eq!(settings.simple_tolerance, 2.0);
    assert_eq!(settings.default_flavor, FjsFlavor::FloraC);
    assert_eq!(settings.max_radical_index, 5);
}

#[test]
fn test_missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("settings.json");
    assert!(matches!(
        ApproximationSettings::from_path(&missing),
        Err(IntervalError::Settings(_))
    ));
}
