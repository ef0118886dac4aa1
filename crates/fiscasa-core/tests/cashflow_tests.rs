use chrono::NaiveDate;
use fiscasa_core::cashflow::{annual_balance, monthly_net, year_to_date, NetBasis};
use fiscasa_core::property::records::{find_record, find_record_mut};
use fiscasa_core::property::{
    generate_monthly_records, ExpenseCategory, FiscalProfile, LeaseTaxYear, MonthlyRecord,
    NewExpense,
};
use fiscasa_core::report::{fiscal_report, PropertyDataset, ReportOptions};
use fiscasa_core::schedule::InMemoryLedger;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lease_profile() -> FiscalProfile {
    FiscalProfile {
        main_cadastral_value: dec!(1000),
        appurtenant_cadastral_value: Decimal::ZERO,
        imu_rate_per_mille: dec!(10.6),
        lease_start: Some(ymd(2026, 1, 1)),
        lease_end: Some(ymd(2026, 12, 31)),
        monthly_rent: dec!(650),
        condominium_fee: dec!(80),
        lease_tax_year: LeaseTaxYear::FirstYear,
    }
}

// ===========================================================================
// Monthly net
// ===========================================================================

#[test]
fn test_worked_example_from_registered_month() {
    let profile = lease_profile();
    let mut records = generate_monthly_records(&profile);
    find_record_mut(&mut records, 3, 2026)
        .unwrap()
        .register_income(Some(dec!(650)), Some(ymd(2026, 3, 2)), ymd(2026, 3, 5));

    let basis = NetBasis::new(profile.condominium_fee, dec!(1200));
    let m = monthly_net(3, 2026, find_record(&records, 3, 2026), &basis);
    assert_eq!(m.taxes, dec!(100));
    assert_eq!(m.recurring_fee, dec!(80));
    assert_eq!(m.net, dec!(470));
}

#[test]
fn test_empty_month_reports_no_data() {
    let basis = NetBasis::new(dec!(80), dec!(1200));
    let m = monthly_net(2, 2026, None, &basis);
    assert!(!m.has_data);
    assert_eq!(m.net, Decimal::ZERO);
}

#[test]
fn test_zero_net_month_still_has_data() {
    // Rent exactly covers fee and tax: a genuine zero, not a missing month.
    let basis = NetBasis::new(dec!(80), dec!(1200));
    let mut record = MonthlyRecord::awaited(6, 2026, dec!(80));
    record.register_income(Some(dec!(180)), None, ymd(2026, 6, 1));
    let m = monthly_net(6, 2026, Some(&record), &basis);
    assert!(m.has_data);
    assert_eq!(m.net, Decimal::ZERO);
}

// ===========================================================================
// Annual aggregation
// ===========================================================================

#[test]
fn test_year_without_registered_months_nets_zero() {
    let profile = lease_profile();
    let records = generate_monthly_records(&profile);
    let basis = NetBasis::for_profile(&profile, 2026);
    let balance = annual_balance(2026, &records, &basis);
    assert_eq!(balance.totals.net, Decimal::ZERO);
    let per_month: Decimal = balance.months.iter().map(|m| m.net).sum();
    assert_eq!(per_month, Decimal::ZERO);
}

#[test]
fn test_full_year_with_expenses() {
    let profile = lease_profile();
    let mut records = generate_monthly_records(&profile);
    for month in 1..=10 {
        find_record_mut(&mut records, month, 2026)
            .unwrap()
            .register_income(Some(dec!(650)), None, ymd(2026, month, 5));
    }
    let december = find_record_mut(&mut records, 12, 2026).unwrap();
    december.add_expense(NewExpense {
        description: "Boiler replacement".into(),
        date: Some(ymd(2026, 12, 3)),
        amount: dec!(1450),
        category: ExpenseCategory::Extraordinary,
    });
    december.add_expense(NewExpense {
        description: "Stairwell cleaning".into(),
        date: None,
        amount: dec!(60),
        category: ExpenseCategory::Ordinary,
    });

    // First-year regime: only IMU (1780.80) is payable this year.
    let basis = NetBasis::for_profile(&profile, 2026);
    assert_eq!(basis.annual_tax_total, dec!(1780.80));

    let balance = annual_balance(2026, &records, &basis);
    assert_eq!(balance.totals.income, dec!(6500));
    assert_eq!(balance.totals.recurring_fees, dec!(800));
    assert_eq!(balance.totals.extra_ordinary, dec!(60));
    assert_eq!(balance.totals.extra_extraordinary, dec!(1450));
    assert_eq!(balance.totals.ordinary_expenses, dec!(860));
    // 1780.80 / 12 × 10 registered months
    assert_eq!(balance.totals.taxes, dec!(1484.00));
    assert_eq!(balance.totals.net, dec!(2706.00));
    assert_eq!(balance.totals.months_with_data, 11);

    let ytd = year_to_date(2026, 12, &records, &basis);
    assert_eq!(ytd.total_net, balance.totals.net);
}

// ===========================================================================
// Report
// ===========================================================================

#[test]
fn test_report_serializes_with_envelope() {
    let dataset = PropertyDataset {
        profile: lease_profile(),
        records: generate_monthly_records(&lease_profile()),
    };
    let options = ReportOptions {
        as_of: ymd(2026, 10, 18),
        selected_month: None,
        selected_year: None,
    };
    let out = fiscal_report(&dataset, &options, &InMemoryLedger::new());
    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["schedule"]["obligations"].is_array());
    assert_eq!(json["result"]["lease"]["remaining_days"], serde_json::json!(74));
    assert!(json["methodology"].as_str().unwrap().contains("cedolare secca"));
    assert_eq!(out.result.schedule.set_aside_next_year, dec!(1638));
}

#[test]
fn test_report_with_out_of_range_amounts_degrades_to_zero() {
    let options = ReportOptions {
        as_of: ymd(2026, 3, 15),
        selected_month: None,
        selected_year: None,
    };
    let datasets = [
        r#"{"profile": {"monthly_rent": 1e28}}"#,
        r#"{"profile": {"main_cadastral_value": 1e27}}"#,
        r#"{"records": [{"month": 3, "year": 2026, "extra_expenses": [
            {"description": "a", "amount": 7e28},
            {"description": "b", "amount": "7e28"}
        ]}]}"#,
    ];
    for json in datasets {
        let dataset = PropertyDataset::from_json(json).unwrap();
        let out = fiscal_report(&dataset, &options, &InMemoryLedger::new());
        assert_eq!(out.result.annual_tax_total, Decimal::ZERO);
        assert_eq!(out.result.selected_month.net, Decimal::ZERO);
        assert_eq!(out.result.register.extraordinary_expenses, Decimal::ZERO);
    }
}
