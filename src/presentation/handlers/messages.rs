//! User-facing strings, in the same language the assistant answers in.

use std::fmt::Display;

pub const LICENSE_ACCEPTED: &str = "لایسنس تایید شد. در حال بارگذاری...";
pub const INVALID_LICENSE: &str = "کد لایسنس نامعتبر یا منقضی شده است.";
pub const LICENSE_REQUIRED: &str = "برای استفاده از چت ابتدا کد لایسنس را وارد کنید.";
pub const INVALID_ADMIN_PASSWORD: &str = "رمز عبور اشتباه است.";
pub const EMPTY_RESPONSE: &str = "پاسخ خالی دریافت شد.";
pub const CHECK_CONNECTION: &str = "لطفاً اتصال اینترنت و صحت کلید API را بررسی کنید.";

pub fn relay_failed(error: impl Display) -> String {
    format!(
        "خطا در ارتباط با سرویس هوش مصنوعی: {} {}",
        error, CHECK_CONNECTION
    )
}

/// Validity notice for a freshly issued code, with the day count in Persian
/// digits.
pub fn license_issued(valid_days: u64) -> String {
    format!("این لایسنس به مدت {} روز معتبر است.", persian_digits(valid_days))
}

fn persian_digits(value: u64) -> String {
    value
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}
