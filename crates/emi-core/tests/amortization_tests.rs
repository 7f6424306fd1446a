use emi_core::amortization::{self, compute_periodic_payment, generate_schedule, LoanTerms};
use emi_core::EmiError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

fn assert_invalid(result: Result<impl std::fmt::Debug, EmiError>, expected_field: &str) {
    match result {
        Err(EmiError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidInput on {expected_field}, got {other:?}"),
    }
}

// ===========================================================================
// Periodic payment
// ===========================================================================

#[test]
fn test_personal_loan_one_year() {
    // 50,000 at 9.99% over 12 months
    let payment = compute_periodic_payment(dec!(50000), dec!(9.99), dec!(1)).unwrap();
    assert_close(payment, dec!(4395.56), dec!(0.01));

    let result = generate_schedule(dec!(50000), dec!(9.99), dec!(1)).unwrap();
    assert_eq!(result.total_periods, 12);
    assert_eq!(result.periodic_payment_amount, payment);
    assert_close(result.total_interest, dec!(2746.74), dec!(0.01));
    assert_eq!(result.total_paid, payment * dec!(12));
    assert_eq!(result.total_interest, result.total_paid - dec!(50000));
}

#[test]
fn test_zero_interest_loan() {
    let payment = compute_periodic_payment(dec!(1_000_000), dec!(0), dec!(2)).unwrap();
    assert_eq!(payment, dec!(1_000_000) / dec!(24));
    assert_close(payment, dec!(41666.6666666667), dec!(0.0000001));

    let result = generate_schedule(dec!(1_000_000), dec!(0), dec!(2)).unwrap();
    assert_eq!(result.schedule.len(), 24);
    for period in &result.schedule {
        assert_eq!(period.interest_component, Decimal::ZERO);
        assert_eq!(period.principal_component, dec!(1_000_000) / dec!(24));
    }
}

#[test]
fn test_five_year_loan_reaches_zero() {
    let result = generate_schedule(dec!(200000), dec!(12), dec!(5)).unwrap();
    assert_eq!(result.total_periods, 60);
    assert_eq!(result.schedule.len(), 60);
    assert_eq!(result.schedule[59].remaining_balance, Decimal::ZERO);
    assert_close(result.periodic_payment_amount, dec!(4448.89), dec!(0.01));
}

#[test]
fn test_half_year_tenure() {
    let result = generate_schedule(dec!(100), dec!(10), dec!(0.5)).unwrap();
    assert_eq!(result.total_periods, 6);
    let principal_sum: Decimal = result.schedule.iter().map(|p| p.principal_component).sum();
    assert_close(principal_sum, dec!(100), dec!(0.0001));
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

fn sample_terms() -> Vec<(Decimal, Decimal, Decimal)> {
    vec![
        (dec!(50000), dec!(9.99), dec!(1)),
        (dec!(1_000_000), dec!(0), dec!(2)),
        (dec!(200000), dec!(12), dec!(5)),
        (dec!(100), dec!(10), dec!(0.5)),
        (dec!(2_500_000), dec!(8.5), dec!(20)),
        (dec!(75000), dec!(24), dec!(3.25)),
        (dec!(1), dec!(36), dec!(30)),
    ]
}

#[test]
fn test_components_sum_to_payment() {
    for (p, rate, years) in sample_terms() {
        let result = generate_schedule(p, rate, years).unwrap();
        for period in &result.schedule {
            assert_eq!(
                period.principal_component + period.interest_component,
                period.payment_amount
            );
        }
    }
}

#[test]
fn test_principal_components_sum_to_principal() {
    for (p, rate, years) in sample_terms() {
        let result = generate_schedule(p, rate, years).unwrap();
        let sum: Decimal = result.schedule.iter().map(|x| x.principal_component).sum();
        let relative = ((sum - p) / p).abs();
        assert!(relative <= dec!(0.000001), "{p} @ {rate}% x {years}y: sum {sum}");
    }
}

#[test]
fn test_balance_non_increasing_and_final_zero() {
    for (p, rate, years) in sample_terms() {
        let result = generate_schedule(p, rate, years).unwrap();
        let mut previous = p;
        for period in &result.schedule {
            assert!(period.remaining_balance >= Decimal::ZERO);
            assert!(period.remaining_balance <= previous);
            previous = period.remaining_balance;
        }
        assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }
}

#[test]
fn test_payment_is_constant() {
    for (p, rate, years) in sample_terms() {
        let result = generate_schedule(p, rate, years).unwrap();
        assert!(result
            .schedule
            .iter()
            .all(|x| x.payment_amount == result.periodic_payment_amount));
    }
}

#[test]
fn test_periods_are_ordered_and_one_based() {
    let result = generate_schedule(dec!(75000), dec!(24), dec!(3.25)).unwrap();
    assert_eq!(result.total_periods, 39);
    let indices: Vec<u32> = result.schedule.iter().map(|p| p.period_index).collect();
    assert_eq!(indices, (1..=39).collect::<Vec<u32>>());
}

#[test]
fn test_interest_share_declines() {
    let result = generate_schedule(dec!(200000), dec!(12), dec!(5)).unwrap();
    let first = &result.schedule[0];
    let last = &result.schedule[59];
    assert_eq!(first.interest_component, dec!(2000));
    assert!(last.interest_component < first.interest_component);
    assert!(last.principal_component > first.principal_component);
}

#[test]
fn test_deterministic() {
    let a = generate_schedule(dec!(2_500_000), dec!(8.5), dec!(20)).unwrap();
    let b = generate_schedule(dec!(2_500_000), dec!(8.5), dec!(20)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_terms_methods_match_free_functions() {
    let terms = LoanTerms::new(dec!(200000), dec!(12), dec!(5)).unwrap();
    assert_eq!(
        terms.periodic_payment().unwrap(),
        compute_periodic_payment(dec!(200000), dec!(12), dec!(5)).unwrap()
    );
    assert_eq!(
        terms.schedule().unwrap(),
        generate_schedule(dec!(200000), dec!(12), dec!(5)).unwrap()
    );
}

// ===========================================================================
// Summary
// ===========================================================================

#[test]
fn test_summary_matches_schedule() {
    let terms = LoanTerms::new(dec!(50000), dec!(9.99), dec!(1)).unwrap();
    let summary = amortization::summarize(&terms).unwrap();
    let result = terms.schedule().unwrap();

    assert_eq!(summary.monthly_payment, result.periodic_payment_amount);
    assert_eq!(summary.total_amount, result.total_paid);
    assert_eq!(summary.total_interest, result.total_interest);
    assert_eq!(summary.total_periods, 12);
}

#[test]
fn test_amortize_envelope_warns_on_fractional_months() {
    let terms = LoanTerms::new(dec!(100000), dec!(11), dec!(1.3)).unwrap();
    let output = amortization::amortize(&terms).unwrap();
    assert_eq!(output.result.total_periods, 16);
    assert_eq!(output.warnings.len(), 1);
    assert!(output.methodology.contains("amortization"));
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_invalid_inputs() {
    assert_invalid(compute_periodic_payment(dec!(0), dec!(10), dec!(1)), "principal");
    assert_invalid(compute_periodic_payment(dec!(-1000), dec!(10), dec!(1)), "principal");
    assert_invalid(
        compute_periodic_payment(dec!(1000), dec!(-5), dec!(1)),
        "annual_rate_percent",
    );
    assert_invalid(compute_periodic_payment(dec!(1000), dec!(10), dec!(0)), "tenure_years");
    assert_invalid(compute_periodic_payment(dec!(1000), dec!(10), dec!(-2)), "tenure_years");
}

#[test]
fn test_schedule_fails_atomically() {
    assert_invalid(generate_schedule(dec!(0), dec!(10), dec!(1)), "principal");
    assert_invalid(generate_schedule(dec!(1000), dec!(10), dec!(0.01)), "tenure_years");
}

#[test]
fn test_total_payable_overflow_is_an_input_error() {
    // Payment fits in a Decimal, twelve of them do not.
    let huge = Decimal::MAX / dec!(1.01);
    assert!(compute_periodic_payment(huge, dec!(10), dec!(1)).is_ok());
    assert_invalid(generate_schedule(huge, dec!(10), dec!(1)), "principal");

    let terms = LoanTerms::new(huge, dec!(10), dec!(1)).unwrap();
    assert_invalid(amortization::summarize(&terms), "principal");
    assert_invalid(amortization::amortize(&terms), "principal");
}

#[test]
fn test_tiny_positive_rate_is_accepted() {
    let expected = dec!(1000) / dec!(12);
    for rate in [dec!(0.00000000000000000000000012), dec!(0.00000000000000000000000001)] {
        let payment = compute_periodic_payment(dec!(1000), rate, dec!(1)).unwrap();
        assert_close(payment, expected, dec!(0.01));

        let result = generate_schedule(dec!(1000), rate, dec!(1)).unwrap();
        assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }
}
