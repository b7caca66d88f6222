use std::sync::Arc;

use crate::application::services::LicenseGate;
use crate::domain::LicenseCode;

/// Decides who reaches the chat: license holders, the optional bypass code,
/// and the admin who mints new codes.
pub struct AccessService {
    license_gate: Arc<LicenseGate>,
    admin_password: String,
    bypass_code: Option<String>,
}

impl AccessService {
    pub fn new(
        license_gate: Arc<LicenseGate>,
        admin_password: String,
        bypass_code: Option<String>,
    ) -> Self {
        Self {
            license_gate,
            admin_password,
            bypass_code: bypass_code.filter(|c| !c.is_empty()),
        }
    }

    pub fn license_gate(&self) -> &LicenseGate {
        &self.license_gate
    }

    /// Accepts `code` when it is a valid license or the bypass literal. The
    /// caller marks its session authenticated on success.
    pub fn authorize(&self, code: &str) -> Result<(), AccessError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AccessError::CodeRequired);
        }

        if self.bypass_code.as_deref() == Some(code) {
            tracing::warn!("Access granted with bypass code");
            return Ok(());
        }

        if self.license_gate.verify(code) {
            return Ok(());
        }

        Err(AccessError::InvalidLicense)
    }

    /// Exact match against the configured admin password.
    pub fn issue_license(&self, password: &str) -> Result<LicenseCode, AccessError> {
        if password.is_empty() {
            return Err(AccessError::PasswordRequired);
        }

        if password != self.admin_password {
            return Err(AccessError::InvalidPassword);
        }

        Ok(self.license_gate.issue())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("license code required")]
    CodeRequired,
    #[error("license code invalid or expired")]
    InvalidLicense,
    #[error("admin password required")]
    PasswordRequired,
    #[error("admin password incorrect")]
    InvalidPassword,
}
