//! Public identifier format.

/// Public identifier format: `PREFIX-NNNN`, zero-padded to a fixed width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdScheme {
    prefix: String,
    width: usize,
}

impl IdScheme {
    #[must_use]
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// Format an ordinal as a public ID.
    ///
    /// Ordinals wider than the configured width are not truncated.
    #[must_use]
    pub fn format(&self, ordinal: u64) -> String {
        format!("{}-{ordinal:0width$}", self.prefix, width = self.width)
    }

    /// Parse the ordinal out of a public ID.
    ///
    /// Reads the segment after the first `-`, so IDs minted under another
    /// prefix still yield their ordinal. Returns `None` when that segment is
    /// missing or not all digits.
    #[must_use]
    pub fn ordinal_of(id: &str) -> Option<u64> {
        let segment = id.split('-').nth(1)?;
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse().ok()
    }

    /// Whether `id` can be used verbatim as a file stem.
    ///
    /// Adopted remote IDs are arbitrary text; only ASCII alphanumerics, `-`
    /// and `_` are accepted, so an ID can never name a path outside its
    /// directory.
    #[must_use]
    pub fn is_file_safe(id: &str) -> bool {
        !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl Default for IdScheme {
    fn default() -> Self {
        Self::new("DOC", 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_ordinal() {
        let scheme = IdScheme::default();
        assert_eq!(scheme.format(1), "DOC-0001");
        assert_eq!(scheme.format(42), "DOC-0042");
        assert_eq!(scheme.format(12345), "DOC-12345");
    }

    #[test]
    fn test_ordinal_of() {
        assert_eq!(IdScheme::ordinal_of("DOC-0001"), Some(1));
        assert_eq!(IdScheme::ordinal_of("DOC-0420"), Some(420));
        assert_eq!(IdScheme::ordinal_of("KB-7"), Some(7));
        assert_eq!(IdScheme::ordinal_of("DOC"), None);
        assert_eq!(IdScheme::ordinal_of("DOC-"), None);
        assert_eq!(IdScheme::ordinal_of("DOC-12a"), None);
        assert_eq!(IdScheme::ordinal_of("DOC-+12"), None);
    }

    #[test]
    fn test_is_file_safe() {
        assert!(IdScheme::is_file_safe("DOC-0001"));
        assert!(IdScheme::is_file_safe("LEGACY_7"));
        assert!(!IdScheme::is_file_safe(""));
        assert!(!IdScheme::is_file_safe("../DOC-0001"));
        assert!(!IdScheme::is_file_safe("DOC 0001"));
        assert!(!IdScheme::is_file_safe("DOC/0001"));
    }

    #[test]
    fn test_format_and_parse_agree() {
        let scheme = IdScheme::new("KB", 6);
        for ordinal in [1, 99, 100_000, 1_234_567] {
            assert_eq!(IdScheme::ordinal_of(&scheme.format(ordinal)), Some(ordinal));
        }
    }
}
