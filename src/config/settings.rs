use super::defaults::*;

/// Runtime settings for one merge-and-squeeze request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Byte budget for the final document, in kilobytes.
    pub target_size_kb: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_size_kb: DEFAULT_TARGET_MB * KB_PER_MB,
        }
    }
}

impl Settings {
    /// Build settings from the caller's raw target-size field, in megabytes.
    ///
    /// The field arrives as free text from the upload form; anything absent,
    /// unparsable, or not a positive finite number falls back to the default
    /// of 9 MB.
    pub fn from_target_field(field: Option<&str>) -> Self {
        let megabytes = field
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|mb| mb.is_finite() && *mb > 0.0)
            .unwrap_or(DEFAULT_TARGET_MB);
        Self::from_megabytes(megabytes)
    }

    /// Build settings from a target size already known to be in megabytes.
    pub fn from_megabytes(megabytes: f64) -> Self {
        let megabytes = if megabytes.is_finite() && megabytes > 0.0 {
            megabytes
        } else {
            DEFAULT_TARGET_MB
        };
        Self {
            target_size_kb: megabytes * KB_PER_MB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nine_megabytes() {
        let settings = Settings::default();
        assert_eq!(settings.target_size_kb, 9.0 * 1024.0);
    }

    #[test]
    fn test_missing_field_uses_default() {
        assert_eq!(Settings::from_target_field(None), Settings::default());
    }

    #[test]
    fn test_garbage_field_uses_default() {
        assert_eq!(
            Settings::from_target_field(Some("lots")),
            Settings::default()
        );
        assert_eq!(Settings::from_target_field(Some("")), Settings::default());
        assert_eq!(Settings::from_target_field(Some("-3")), Settings::default());
        assert_eq!(Settings::from_target_field(Some("0")), Settings::default());
        assert_eq!(Settings::from_target_field(Some("inf")), Settings::default());
    }

    #[test]
    fn test_decimal_megabytes_are_respected() {
        let settings = Settings::from_target_field(Some("2.5"));
        assert_eq!(settings.target_size_kb, 2.5 * 1024.0);

        let padded = Settings::from_target_field(Some("  12 "));
        assert_eq!(padded.target_size_kb, 12.0 * 1024.0);
    }
}
