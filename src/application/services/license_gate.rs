use std::sync::Arc;

use chrono::{Days, NaiveDate};
use md5::{Digest, Md5};

use crate::application::ports::Clock;
use crate::domain::{LICENSE_SUFFIX_LEN, LicenseCode};

/// Stateless, time-windowed access codes.
///
/// A code carries the first twelve hex digits of `MD5(secret || YYYYMMDD)` for
/// its expiry date. Verification recomputes the digest for every date from
/// today through `today + validity_days` and accepts on the first match, so a
/// freshly issued code stays valid for exactly `validity_days + 1` calendar
/// days and nothing has to be stored.
///
/// Note: MD5 over a plain concatenation is not a MAC. Anyone holding the
/// secret can mint codes and nothing is bound to a user. Kept for
/// compatibility with codes already handed out.
pub struct LicenseGate {
    clock: Arc<dyn Clock>,
    prefix: String,
    secret: String,
    validity_days: u64,
}

impl LicenseGate {
    pub fn new(
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
        secret: impl Into<String>,
        validity_days: u64,
    ) -> Self {
        Self {
            clock,
            prefix: prefix.into(),
            secret: secret.into(),
            validity_days,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn validity_days(&self) -> u64 {
        self.validity_days
    }

    /// Issues a code that is valid from today until `today + validity_days`.
    pub fn issue(&self) -> LicenseCode {
        self.issue_on(self.clock.today())
    }

    pub fn issue_on(&self, today: NaiveDate) -> LicenseCode {
        let expiry = today
            .checked_add_days(Days::new(self.validity_days))
            .unwrap_or(NaiveDate::MAX);

        let code = LicenseCode::from_digest(&self.prefix, &self.expected_suffix(expiry));
        tracing::info!(expiry = %expiry, "License code issued");
        code
    }

    pub fn verify(&self, code: &str) -> bool {
        self.verify_on(code, self.clock.today())
    }

    pub fn verify_on(&self, code: &str, today: NaiveDate) -> bool {
        let Some(suffix) = LicenseCode::normalized_suffix(code, &self.prefix) else {
            return false;
        };

        if suffix.len() != LICENSE_SUFFIX_LEN || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        (0..=self.validity_days)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .any(|date| self.expected_suffix(date) == suffix)
    }

    fn expected_suffix(&self, date: NaiveDate) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(date.format("%Y%m%d").to_string().as_bytes());

        let mut digest = hex::encode_upper(hasher.finalize());
        digest.truncate(LICENSE_SUFFIX_LEN);
        digest
    }
}
