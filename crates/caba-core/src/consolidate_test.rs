use std::collections::BTreeSet;

use super::*;

fn trip(date: &str) -> TripRecord {
    TripRecord::with_date(date)
}

fn run(records: Vec<TripRecord>) -> Vec<ConsolidatedRow> {
    consolidate(records, ConsolidateOptions::default())
}

// -----------------------------------------------------------------------
// row allocation and ordering
// -----------------------------------------------------------------------

#[test]
fn empty_input_yields_empty_output() {
    assert!(run(vec![]).is_empty());
}

#[test]
fn one_row_per_distinct_date() {
    let rows = run(vec![trip("2024-01-02"), trip("2024-01-01"), trip("2024-01-02")]);
    assert_eq!(rows.len(), 2);
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
}

#[test]
fn output_dates_match_input_dates() {
    let input = ["2024-03-01", "2024-01-15", "2024-03-01", "2024-02-10", "2024-01-15"];
    let rows = run(input.iter().map(|d| trip(d)).collect());

    let expected: BTreeSet<&str> = input.iter().copied().collect();
    let actual: BTreeSet<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(actual, expected);
    assert_eq!(rows.len(), expected.len(), "no date may appear twice");
}

#[test]
fn row_index_is_contiguous_from_one() {
    let rows = run(vec![
        trip("2024-01-09"),
        trip("2024-01-03"),
        trip("2024-01-07"),
        trip("2024-01-03"),
    ]);
    let indices: Vec<u32> = rows.iter().map(|r| r.row_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn rows_are_sorted_by_date_string() {
    let rows = run(vec![trip("b"), trip("c"), trip("a"), trip("b")]);
    assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn sheet_row_starts_at_start_row() {
    let rows = run(vec![trip("2024-01-02"), trip("2024-01-01")]);
    assert_eq!(rows[0].sheet_row, 9);
    assert_eq!(rows[1].sheet_row, 10);
}

#[test]
fn sheet_row_honours_custom_start_row() {
    let options = ConsolidateOptions {
        start_row: 2,
        ..ConsolidateOptions::default()
    };
    let rows = consolidate(vec![trip("x"), trip("y")], options);
    assert_eq!(rows[0].sheet_row, 2);
    assert_eq!(rows[1].sheet_row, 3);
    assert_eq!(rows[1].row_index, 2);
}

#[test]
fn provisional_order_is_discarded_after_sort() {
    // "2024-01-05" is seen first and gets the first provisional row, but
    // must end up second.
    let rows = run(vec![trip("2024-01-05"), trip("2024-01-01")]);
    assert_eq!(rows[0].date, "2024-01-01");
    assert_eq!(rows[0].row_index, 1);
    assert_eq!(rows[1].date, "2024-01-05");
    assert_eq!(rows[1].row_index, 2);
}

// -----------------------------------------------------------------------
// first-non-empty-wins merge
// -----------------------------------------------------------------------

#[test]
fn first_non_empty_value_wins() {
    let mut a = trip("d");
    a.vendor = "X".to_owned();
    let mut b = trip("d");
    b.vendor = "Y".to_owned();

    let rows = run(vec![a.clone(), b.clone()]);
    assert_eq!(rows[0].vendor, "X");

    let rows = run(vec![b, a]);
    assert_eq!(rows[0].vendor, "Y", "merge is sensitive to arrival order");
}

#[test]
fn later_value_fills_empty_field() {
    let a = trip("d");
    let mut b = trip("d");
    b.vendor = "Acme".to_owned();

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].vendor, "Acme");
}

#[test]
fn single_sided_fields_are_order_independent() {
    let mut a = trip("d");
    a.inward_from = "Home".to_owned();
    let mut b = trip("d");
    b.outward_to = "Office".to_owned();

    let ab = run(vec![a.clone(), b.clone()]);
    let ba = run(vec![b, a]);
    assert_eq!(ab, ba);
}

#[test]
fn fields_merge_independently_across_records() {
    let mut first = trip("d");
    first.inward_from = "Home".to_owned();
    let second = trip("d");
    let mut third = trip("d");
    third.outward_to = "Office".to_owned();
    third.inward_from = "Ignored".to_owned();

    let rows = run(vec![first, second, third]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].inward_from, "Home");
    assert_eq!(rows[0].outward_to, "Office");
}

#[test]
fn charges_merge_and_render_as_text() {
    let mut a = trip("d");
    a.inward_charges = Scalar::from("");
    let mut b = trip("d");
    b.inward_charges = Scalar::from(250);
    b.outward_charges = Scalar::from("310.00");

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].inward_charges, "250");
    assert_eq!(rows[0].outward_charges, "310.00");
}

// -----------------------------------------------------------------------
// emptiness policy
// -----------------------------------------------------------------------

#[test]
fn falsy_policy_lets_later_value_replace_numeric_zero() {
    let mut a = trip("d");
    a.inward_charges = Scalar::from(0);
    let mut b = trip("d");
    b.inward_charges = Scalar::from(120);

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].inward_charges, "120");
}

#[test]
fn falsy_policy_keeps_text_zero() {
    let mut a = trip("d");
    a.inward_charges = Scalar::from("0");
    let mut b = trip("d");
    b.inward_charges = Scalar::from(120);

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].inward_charges, "0");
}

#[test]
fn strict_policy_keeps_numeric_zero() {
    let mut a = trip("d");
    a.inward_charges = Scalar::from(0);
    let mut b = trip("d");
    b.inward_charges = Scalar::from(120);

    let options = ConsolidateOptions {
        emptiness: Emptiness::Strict,
        ..ConsolidateOptions::default()
    };
    let rows = consolidate(vec![a, b], options);
    assert_eq!(rows[0].inward_charges, "0");
}

#[test]
fn zero_charge_never_overwrites_empty_under_falsy() {
    let a = trip("d");
    let mut b = trip("d");
    b.outward_charges = Scalar::from(0);

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].outward_charges, "");
}

#[test]
fn emptiness_parse_accepts_known_values() {
    assert_eq!(Emptiness::parse("falsy"), Some(Emptiness::Falsy));
    assert_eq!(Emptiness::parse(" STRICT "), Some(Emptiness::Strict));
    assert_eq!(Emptiness::parse("lenient"), None);
}

// -----------------------------------------------------------------------
// visits
// -----------------------------------------------------------------------

#[test]
fn visits_default_to_one_when_absent() {
    let rows = run(vec![trip("d")]);
    assert_eq!(rows[0].visits, Visits::Count(1));
}

#[test]
fn visits_keep_first_value_and_are_not_summed() {
    let mut a = trip("d");
    a.visits = Some(Scalar::from(2));
    let mut b = trip("d");
    b.visits = Some(Scalar::from(3));

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].visits, Visits::Count(2));
}

#[test]
fn visits_absent_first_is_filled_by_later_value() {
    let a = trip("d");
    let mut b = trip("d");
    b.visits = Some(Scalar::from(2));

    let rows = run(vec![a, b]);
    assert_eq!(rows[0].visits, Visits::Count(2));
}

#[test]
fn visits_text_is_preserved() {
    let mut a = trip("d");
    a.visits = Some(Scalar::from("2 trips"));

    let rows = run(vec![a]);
    assert_eq!(rows[0].visits, Visits::Text("2 trips".to_owned()));
}

#[test]
fn whole_float_visits_are_counts() {
    let mut a = trip("d");
    a.visits = Some(Scalar::Number(serde_json::Number::from_f64(2.0).unwrap()));

    let rows = run(vec![a]);
    assert_eq!(rows[0].visits, Visits::Count(2));
}

#[test]
fn fractional_visits_stay_text() {
    let mut a = trip("d");
    a.visits = Some(Scalar::Number(serde_json::Number::from_f64(2.5).unwrap()));

    let rows = run(vec![a]);
    assert_eq!(rows[0].visits, Visits::Text("2.5".to_owned()));
}

// -----------------------------------------------------------------------
// scenarios
// -----------------------------------------------------------------------

#[test]
fn end_to_end_scenario() {
    let mut home = trip("2024-01-05");
    home.inward_from = "Home".to_owned();
    let mut office = trip("2024-01-05");
    office.outward_to = "Office".to_owned();
    let mut cabco = trip("2024-01-01");
    cabco.vendor = "CabCo".to_owned();

    let rows = run(vec![home, office, cabco]);

    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].row_index, 1);
    assert_eq!(rows[0].date, "2024-01-01");
    assert_eq!(rows[0].vendor, "CabCo");
    assert_eq!(rows[0].inward_from, "");
    assert_eq!(rows[0].inward_to, "");
    assert_eq!(rows[0].outward_from, "");
    assert_eq!(rows[0].outward_to, "");
    assert_eq!(rows[0].inward_charges, "");
    assert_eq!(rows[0].outward_charges, "");

    assert_eq!(rows[1].row_index, 2);
    assert_eq!(rows[1].date, "2024-01-05");
    assert_eq!(rows[1].inward_from, "Home");
    assert_eq!(rows[1].outward_to, "Office");
    assert_eq!(rows[1].vendor, "");
}

#[test]
fn parsed_ordering_sorts_calendar_dates() {
    let options = ConsolidateOptions {
        ordering: DateOrdering::from_formats("%d/%m/%Y"),
        ..ConsolidateOptions::default()
    };
    let rows = consolidate(vec![trip("02/01/2024"), trip("15/12/2023")], options);
    assert_eq!(rows[0].date, "15/12/2023");
    assert_eq!(rows[1].date, "02/01/2024");
}

#[test]
fn consolidator_tracks_distinct_dates() {
    let mut c = Consolidator::new(ConsolidateOptions::default());
    assert!(c.is_empty());
    c.push(trip("a"));
    c.push(trip("a"));
    c.push(trip("b"));
    assert_eq!(c.len(), 2);
    assert_eq!(c.finish().len(), 2);
}
