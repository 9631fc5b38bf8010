//! Ad sources: the embedded reference ad and YAML files on disk.

use std::path::Path;

use tracing::{info, instrument};

use crate::domain::advert::Advert;
use crate::domain::error::ContentError;

/// The reference one-minute Dubai visa ad.
const BUILTIN_ADVERT: &str = include_str!("../../content/dubai-visa.yaml");

/// Parses the embedded reference ad.
///
/// # Errors
///
/// Returns a `ContentError` only if the embedded document is itself broken.
pub fn builtin_advert() -> Result<Advert, ContentError> {
    Advert::from_yaml(BUILTIN_ADVERT)
}

/// Reads and validates an ad document from `path`.
///
/// # Errors
///
/// Returns `ContentError::Io` if the file cannot be read, otherwise the
/// errors of [`Advert::from_yaml`].
#[instrument(fields(path = %path.display()))]
pub fn load_advert(path: &Path) -> Result<Advert, ContentError> {
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let advert = Advert::from_yaml(&source)?;
    info!(
        title = %advert.title,
        frames = advert.sequence.len(),
        total_seconds = advert.sequence.total_duration(),
        "ad loaded"
    );
    Ok(advert)
}

/// Loads the ad at `path`, or the embedded ad when no path is given.
///
/// # Errors
///
/// See [`load_advert`] and [`builtin_advert`].
pub fn resolve_advert(path: Option<&Path>) -> Result<Advert, ContentError> {
    match path {
        Some(path) => load_advert(path),
        None => builtin_advert(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use adreel_narration::domain::delivery::Delivery;
    use adreel_narration::domain::voice::VoicePreference;

    use super::*;

    #[test]
    fn test_builtin_advert_is_six_ten_second_frames() {
        // Act
        let advert = builtin_advert().unwrap();

        // Assert
        assert_eq!(advert.title, "Dubai Visa Ad Experience");
        assert_eq!(advert.presenter.as_deref(), Some("Ciroc Travel Presents"));
        assert!(advert.tagline.as_deref().unwrap().ends_with("at ₹7,499."));
        assert_eq!(advert.highlights.len(), 3);
        assert_eq!(
            advert.contact.as_ref().and_then(|c| c.phone.as_deref()),
            Some("99694 99579")
        );
        assert_eq!(advert.sequence.len(), 6);
        assert!((advert.sequence.total_duration() - 60.0).abs() < f64::EPSILON);
        assert!(
            advert
                .sequence
                .frames()
                .iter()
                .all(|frame| (frame.duration - 10.0).abs() < f64::EPSILON)
        );
        assert_eq!(
            advert.sequence.get(0).unwrap().headline,
            "Dubai Dreams Start at ₹7,499"
        );
        assert_eq!(
            advert.sequence.get(5).unwrap().footer.as_deref(),
            Some("Where trust and reliability come first.")
        );
    }

    #[test]
    fn test_builtin_advert_narration_uses_indian_english_chain() {
        // Act
        let advert = builtin_advert().unwrap();

        // Assert
        assert_eq!(advert.narration.preferences(), VoicePreference::default_chain());
        assert_eq!(advert.narration.delivery(), Delivery::default());
        assert!(advert.narration.script().starts_with("Experience Dubai like never before"));
        assert!(!advert.narration.script().contains('\n'));
    }

    #[test]
    fn test_load_advert_reports_missing_file() {
        // Arrange
        let path = PathBuf::from("/nonexistent/adreel/advert.yaml");

        // Act
        let result = load_advert(&path);

        // Assert
        match result {
            Err(ContentError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_load_advert_reads_file_from_disk() {
        // Arrange
        let path =
            std::env::temp_dir().join(format!("adreel-advert-{}.yaml", std::process::id()));
        let source = "\
title: Disk Ad
frames:
  - duration: 2.5
    headline: Hi
    subheadline: There
narration:
  script: Hi there.
";
        std::fs::write(&path, source).unwrap();

        // Act
        let result = resolve_advert(Some(&path));
        std::fs::remove_file(&path).unwrap();

        // Assert
        let advert = result.unwrap();
        assert_eq!(advert.title, "Disk Ad");
        assert!((advert.sequence.total_duration() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_advert_without_path_uses_builtin() {
        // Act
        let advert = resolve_advert(None).unwrap();

        // Assert
        assert_eq!(advert, builtin_advert().unwrap());
    }
}
