use std::fmt;

const GROUP_LEN: usize = 4;
pub const LICENSE_SUFFIX_LEN: usize = 12;

/// An access code of the form `PREFIX-XXXX-XXXX-XXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseCode(String);

impl LicenseCode {
    /// Builds a code from the first twelve characters of `digest_hex`,
    /// uppercased and grouped 4-4-4.
    pub fn from_digest(prefix: &str, digest_hex: &str) -> Self {
        let suffix: String = digest_hex
            .chars()
            .take(LICENSE_SUFFIX_LEN)
            .collect::<String>()
            .to_uppercase();

        let groups = suffix
            .as_bytes()
            .chunks(GROUP_LEN)
            .map(|group| String::from_utf8_lossy(group).into_owned())
            .collect::<Vec<_>>()
            .join("-");

        Self(format!("{}-{}", prefix, groups))
    }

    /// Strips `PREFIX-`, removes every dash and uppercases what is left.
    /// Returns `None` when the code does not carry the prefix.
    pub fn normalized_suffix(code: &str, prefix: &str) -> Option<String> {
        if code.is_empty() {
            return None;
        }

        let rest = code.strip_prefix(prefix)?.strip_prefix('-')?;
        Some(rest.replace('-', "").to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LicenseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
