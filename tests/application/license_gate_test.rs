use std::sync::Arc;

use chemimaster::application::services::LicenseGate;
use chemimaster::infrastructure::clock::FixedClock;
use chrono::{Days, NaiveDate};

const TEST_PREFIX: &str = "CHEM";
const TEST_SECRET: &str = "chem_master_secret_2025";
const TEST_VALIDITY_DAYS: u64 = 30;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn gate_on(today: NaiveDate, secret: &str) -> LicenseGate {
    LicenseGate::new(
        Arc::new(FixedClock(today)),
        TEST_PREFIX,
        secret,
        TEST_VALIDITY_DAYS,
    )
}

#[test]
fn given_known_secret_and_date_when_issuing_then_matches_md5_of_expiry() {
    // MD5("chem_master_secret_2025" + "20250131") starts with AAC6FFAD754A.
    let gate = gate_on(date(2025, 1, 1), TEST_SECRET);

    let code = gate.issue();

    assert_eq!(code.as_str(), "CHEM-AAC6-FFAD-754A");
}

#[test]
fn given_issued_code_when_verified_immediately_then_valid() {
    let gate = gate_on(date(2025, 1, 1), TEST_SECRET);

    let code = gate.issue();

    assert!(gate.verify(code.as_str()));
}

#[test]
fn given_issued_code_when_verified_on_every_day_until_expiry_then_valid() {
    let issue_day = date(2025, 1, 1);
    let gate = gate_on(issue_day, TEST_SECRET);
    let code = gate.issue();

    for offset in 0..=TEST_VALIDITY_DAYS {
        let day = issue_day.checked_add_days(Days::new(offset)).unwrap();
        assert!(
            gate.verify_on(code.as_str(), day),
            "expected valid on day +{}",
            offset
        );
    }
}

#[test]
fn given_issued_code_when_verified_one_day_after_expiry_then_invalid() {
    let issue_day = date(2025, 1, 1);
    let gate = gate_on(issue_day, TEST_SECRET);
    let code = gate.issue();

    let after_expiry = issue_day
        .checked_add_days(Days::new(TEST_VALIDITY_DAYS + 1))
        .unwrap();

    assert!(!gate.verify_on(code.as_str(), after_expiry));
}

#[test]
fn given_code_for_today_plus_thirty_when_verified_then_accepted() {
    let today = date(2025, 3, 10);
    let gate = gate_on(today, TEST_SECRET);

    let code = gate.issue_on(today);

    assert!(gate.verify_on(code.as_str(), today));
}

#[test]
fn given_code_for_today_plus_thirty_one_when_verified_then_rejected() {
    let today = date(2025, 3, 10);
    let gate = gate_on(today, TEST_SECRET);

    // A code issued tomorrow expires on today + 31.
    let code = gate.issue_on(today.checked_add_days(Days::new(1)).unwrap());

    assert!(!gate.verify_on(code.as_str(), today));
}

#[test]
fn given_code_expiring_yesterday_when_verified_then_rejected() {
    let today = date(2025, 3, 10);
    let gate = gate_on(today, TEST_SECRET);

    let code = gate.issue_on(date(2025, 2, 7));

    assert!(!gate.verify_on(code.as_str(), today));
}

#[test]
fn given_window_crossing_year_end_when_verified_then_valid() {
    let gate = gate_on(date(2025, 12, 20), TEST_SECRET);

    let code = gate.issue();

    assert!(gate.verify_on(code.as_str(), date(2026, 1, 19)));
    assert!(!gate.verify_on(code.as_str(), date(2026, 1, 20)));
}

#[test]
fn given_code_with_other_prefix_when_verified_then_rejected() {
    let gate = gate_on(date(2025, 1, 1), TEST_SECRET);

    assert!(!gate.verify("BIO-AAC6-FFAD-754A"));
    assert!(!gate.verify("AAC6-FFAD-754A"));
}

#[test]
fn given_code_from_other_secret_when_verified_then_rejected() {
    let today = date(2025, 1, 1);
    let foreign = gate_on(today, "other_secret");
    let gate = gate_on(today, TEST_SECRET);

    let code = foreign.issue();

    assert!(foreign.verify(code.as_str()));
    assert!(!gate.verify(code.as_str()));
}

#[test]
fn given_lowercase_suffix_when_verified_then_accepted() {
    let gate = gate_on(date(2025, 1, 1), TEST_SECRET);

    assert!(gate.verify("CHEM-aac6-ffad-754a"));
}

#[test]
fn given_malformed_codes_when_verified_then_rejected() {
    let gate = gate_on(date(2025, 1, 1), TEST_SECRET);

    for code in [
        "",
        "CHEM-",
        "CHEM-ZZZZ-ZZZZ-ZZZZ",
        "CHEM-AAC6-FFAD",
        "CHEM-AAC6-FFAD-754A-00",
        "ADMIN-TEST",
    ] {
        assert!(!gate.verify(code), "expected {:?} to be rejected", code);
    }
}

#[test]
fn given_same_inputs_when_issuing_twice_then_codes_identical() {
    let gate = gate_on(date(2025, 6, 1), TEST_SECRET);

    assert_eq!(gate.issue(), gate.issue());
}
