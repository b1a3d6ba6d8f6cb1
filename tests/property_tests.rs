/// Property-based tests using proptest
/// Tests invariants of the validator and the consumption series builder
use cups_lookup::domain::{ConsumptionRecord, Cups};
use cups_lookup::error::LookupError;
use cups_lookup::normalize::dates::chronological;
use cups_lookup::normalize::{NormalizedDate, build_consumption_series, normalize_date};
use proptest::prelude::*;
use std::cmp::Ordering;

// Property: validation is total and case-insensitive
proptest! {
    #[test]
    fn cups_validation_never_panics(raw in "\\PC*") {
        let _ = Cups::parse(&raw);
    }

    #[test]
    fn well_formed_ids_are_accepted_in_any_case(body in "[A-Z0-9]{20}", lower in any::<bool>()) {
        let id = format!("ES{body}");
        let input = if lower { id.to_lowercase() } else { id.clone() };
        let cups = Cups::parse(&format!("  {input} ")).unwrap();
        prop_assert_eq!(cups.as_str(), id.as_str());
    }

    #[test]
    fn wrong_length_is_a_format_error(body in "[A-Z0-9]{0,30}") {
        prop_assume!(body.len() != 20);
        prop_assert_eq!(Cups::parse(&format!("ES{body}")), Err(LookupError::Format));
    }

    #[test]
    fn wrong_country_prefix_is_rejected(prefix in "[A-DF-Z]{2}", body in "[A-Z0-9]{20}") {
        prop_assert_eq!(Cups::parse(&format!("{prefix}{body}")), Err(LookupError::Format));
    }
}

fn date_text() -> impl Strategy<Value = String> {
    let date = (2000i32..2030, 1u32..=12, 1u32..=28);
    prop_oneof![
        date.clone().prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        date.clone().prop_map(|(y, m, d)| format!("{d:02}/{m:02}/{y:04}")),
        date.prop_map(|(y, m, _)| format!("{y:04}-{m:02}")),
        "[a-z]{3,10}",
    ]
}

// Property: the series is a stable, chronologically ordered permutation
proptest! {
    #[test]
    fn series_preserves_every_reading(dates in prop::collection::vec(date_text(), 0..40)) {
        let records: Vec<ConsumptionRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| ConsumptionRecord::new(d.clone(), Some(i as f64)))
            .collect();
        let series = build_consumption_series(&records);

        prop_assert_eq!(series.len(), records.len());
        let mut seen: Vec<usize> = series.values.iter().map(|v| v.unwrap() as usize).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..records.len()).collect::<Vec<_>>());
    }

    #[test]
    fn series_is_chronological_and_stable(dates in prop::collection::vec(date_text(), 0..40)) {
        let records: Vec<ConsumptionRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| ConsumptionRecord::new(d.clone(), Some(i as f64)))
            .collect();
        let series = build_consumption_series(&records);

        let order: Vec<usize> = series.values.iter().map(|v| v.unwrap() as usize).collect();
        for pair in order.windows(2) {
            let (a, b) = (normalize_date(&dates[pair[0]]), normalize_date(&dates[pair[1]]));
            match chronological(&a, &b) {
                Ordering::Less => {}
                Ordering::Equal => prop_assert!(pair[0] < pair[1], "ties keep input order"),
                Ordering::Greater => prop_assert!(false, "out of order: {:?} before {:?}", a, b),
            }
        }
    }

    #[test]
    fn canonical_dates_normalize_to_themselves(raw in date_text()) {
        let first = normalize_date(&raw);
        let again = normalize_date(&first.canonical());
        match &first {
            NormalizedDate::Parsed(_) => prop_assert_eq!(again, first),
            NormalizedDate::Unparseable(text) => prop_assert_eq!(text, &raw),
        }
    }
}
