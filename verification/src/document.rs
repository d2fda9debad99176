//! Document validation — judges whether an analyzed identity document meets
//! the acceptance criteria, classifies its type, and extracts key fields.
//!
//! Pure judgment code: everything here operates on the analysis result
//! already fetched by the orchestrator. Persistence is the orchestrator's
//! responsibility.

use attest_services::DetectedFace;
use attest_types::DocumentType;
use std::collections::BTreeMap;

/// Text fields that must appear somewhere in the extracted document text.
const REQUIRED_FIELDS: [&str; 3] = ["name", "date of birth", "id number"];

/// Acceptable face brightness range on the analyzer's luminance scale.
const BRIGHTNESS_MIN: f64 = 50.0;
const BRIGHTNESS_MAX: f64 = 150.0;

/// Minimum acceptable face sharpness.
const SHARPNESS_MIN: f64 = 50.0;

/// Keyword vocabularies for document classification. Checked in order; the
/// first vocabulary with a hit decides the type.
const PASSPORT_KEYWORDS: [&str; 3] = ["passport", "passeport", "pasaporte"];
const DRIVER_LICENSE_KEYWORDS: [&str; 4] = ["driver", "license", "permis", "conduire"];
const NATIONAL_ID_KEYWORDS: [&str; 4] = ["national", "id card", "identity", "identité"];

/// The validator's verdict: valid iff no rule was violated, with every
/// violation reported (not just the first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentVerdict {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Judges extracted document content and detected faces against the
/// acceptance rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentValidator;

impl DocumentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate all acceptance rules independently and collect every
    /// violation.
    pub fn validate(&self, text: &str, faces: &[DetectedFace]) -> DocumentVerdict {
        let mut errors = Vec::new();
        let lowered = text.to_lowercase();

        for field in REQUIRED_FIELDS {
            if !lowered.contains(field) {
                errors.push(format!("Missing field: {field}"));
            }
        }

        // Exactly one face: rejects group photos and missing faces equally.
        if faces.len() != 1 {
            errors.push(format!(
                "Document must contain exactly one face (found {})",
                faces.len()
            ));
        } else {
            let face = &faces[0];
            if face.brightness < BRIGHTNESS_MIN || face.brightness > BRIGHTNESS_MAX {
                errors.push("Face brightness out of range".to_string());
            }
            if face.sharpness < SHARPNESS_MIN {
                errors.push("Face image not sharp enough".to_string());
            }
        }

        DocumentVerdict {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Best-effort document classification over known type vocabularies.
///
/// An unmatched document is `Unknown`, which by itself never invalidates it.
pub fn classify(text: &str) -> DocumentType {
    let lowered = text.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if has_any(&PASSPORT_KEYWORDS) {
        DocumentType::Passport
    } else if has_any(&DRIVER_LICENSE_KEYWORDS) {
        DocumentType::DriverLicense
    } else if has_any(&NATIONAL_ID_KEYWORDS) {
        DocumentType::NationalId
    } else {
        DocumentType::Unknown
    }
}

/// Extract the summary fields from labelled lines of the document text.
///
/// Each field is the remainder of the line after its label and any
/// separating whitespace/colons. Best-effort: absent labels simply produce
/// no entry.
pub fn extract_key_fields(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    if let Some(value) = value_after_label(text, "name") {
        fields.insert("full_name".to_string(), value);
    }
    if let Some(value) = value_after_label(text, "date of birth") {
        fields.insert("date_of_birth".to_string(), value);
    }
    for label in ["id number", "document number", "number", "id"] {
        if let Some(value) = value_after_label(text, label) {
            fields.insert("document_number".to_string(), value);
            break;
        }
    }

    fields
}

/// Find `label` case-insensitively and return the rest of its line, with
/// leading separators (whitespace, colons) stripped. Empty captures count
/// as absent. Labels are ASCII, so the byte-window scan below always lands
/// on character boundaries.
fn value_after_label(text: &str, label: &str) -> Option<String> {
    let hay = text.as_bytes();
    let needle = label.as_bytes();
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    let start = (0..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))?
        + needle.len();
    let line = text[start..].lines().next().unwrap_or("");
    let value = line.trim_start_matches([' ', '\t', ':']).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_face() -> DetectedFace {
        DetectedFace {
            brightness: 100.0,
            sharpness: 80.0,
        }
    }

    const VALID_TEXT: &str =
        "PASSPORT\nName: Jane Roe\nDate of Birth: 1990-04-01\nID Number: X123456";

    #[test]
    fn test_valid_document_passes() {
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[good_face()]);
        assert!(verdict.is_valid);
        assert!(verdict.errors.is_empty());
    }

    #[test]
    fn test_each_missing_field_reported() {
        let verdict = DocumentValidator::new().validate("Name: Jane Roe", &[good_face()]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.errors,
            vec![
                "Missing field: date of birth".to_string(),
                "Missing field: id number".to_string(),
            ]
        );
    }

    #[test]
    fn test_all_missing_fields_reported_simultaneously() {
        let verdict = DocumentValidator::new().validate("", &[good_face()]);
        assert_eq!(verdict.errors.len(), 3);
        for field in REQUIRED_FIELDS {
            assert!(verdict
                .errors
                .iter()
                .any(|e| e == &format!("Missing field: {field}")));
        }
    }

    #[test]
    fn test_required_fields_match_case_insensitively() {
        let text = "NAME: JANE\nDATE OF BIRTH: 1990\nId Number: 4";
        let verdict = DocumentValidator::new().validate(text, &[good_face()]);
        assert!(verdict.is_valid);
    }

    #[test]
    fn test_zero_faces_rejected_with_count() {
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.errors,
            vec!["Document must contain exactly one face (found 0)".to_string()]
        );
    }

    #[test]
    fn test_two_faces_rejected_with_count() {
        let verdict =
            DocumentValidator::new().validate(VALID_TEXT, &[good_face(), good_face()]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.errors,
            vec!["Document must contain exactly one face (found 2)".to_string()]
        );
    }

    #[test]
    fn test_face_quality_bounds() {
        let dim = DetectedFace {
            brightness: 40.0,
            sharpness: 80.0,
        };
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[dim]);
        assert_eq!(verdict.errors, vec!["Face brightness out of range".to_string()]);

        let blown_out = DetectedFace {
            brightness: 151.0,
            sharpness: 80.0,
        };
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[blown_out]);
        assert_eq!(verdict.errors, vec!["Face brightness out of range".to_string()]);

        let blurry = DetectedFace {
            brightness: 100.0,
            sharpness: 49.9,
        };
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[blurry]);
        assert_eq!(verdict.errors, vec!["Face image not sharp enough".to_string()]);
    }

    #[test]
    fn test_boundary_quality_values_accepted() {
        for face in [
            DetectedFace { brightness: 50.0, sharpness: 50.0 },
            DetectedFace { brightness: 150.0, sharpness: 50.0 },
        ] {
            let verdict = DocumentValidator::new().validate(VALID_TEXT, &[face]);
            assert!(verdict.is_valid, "boundary face should pass: {face:?}");
        }
    }

    #[test]
    fn test_both_quality_violations_reported() {
        let bad = DetectedFace {
            brightness: 10.0,
            sharpness: 10.0,
        };
        let verdict = DocumentValidator::new().validate(VALID_TEXT, &[bad]);
        assert_eq!(verdict.errors.len(), 2);
    }

    #[test]
    fn test_classify_vocabularies() {
        assert_eq!(classify("REPUBLIC PASSPORT"), DocumentType::Passport);
        assert_eq!(classify("passeport"), DocumentType::Passport);
        assert_eq!(classify("Pasaporte"), DocumentType::Passport);
        assert_eq!(classify("DRIVER LICENSE"), DocumentType::DriverLicense);
        assert_eq!(classify("Permis de conduire"), DocumentType::DriverLicense);
        assert_eq!(classify("NATIONAL ID CARD"), DocumentType::NationalId);
        assert_eq!(classify("carte d'identité"), DocumentType::NationalId);
        assert_eq!(classify("library card"), DocumentType::Unknown);
    }

    #[test]
    fn test_unknown_type_does_not_invalidate() {
        let text = "Name: J\nDate of Birth: 1990\nID Number: 5";
        assert_eq!(classify(text), DocumentType::Unknown);
        let verdict = DocumentValidator::new().validate(text, &[good_face()]);
        assert!(verdict.is_valid);
    }

    #[test]
    fn test_extract_key_fields() {
        let fields = extract_key_fields(VALID_TEXT);
        assert_eq!(fields["full_name"], "Jane Roe");
        assert_eq!(fields["date_of_birth"], "1990-04-01");
        assert_eq!(fields["document_number"], "X123456");
    }

    #[test]
    fn test_extract_key_fields_absent_labels() {
        let fields = extract_key_fields("nothing useful here");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_extract_tolerates_missing_separator() {
        let fields = extract_key_fields("Name Jane Roe");
        assert_eq!(fields["full_name"], "Jane Roe");
    }
}
