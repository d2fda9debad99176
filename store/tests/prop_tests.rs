use proptest::prelude::*;
use std::collections::BTreeMap;

use attest_store::{merge_record, Evidence, RecordPatch, VerificationRecord};
use attest_types::{DocumentType, ImageKey, Timestamp, UserId};

fn arb_evidence() -> impl Strategy<Value = Evidence> {
    (0.0f64..=100.0, any::<bool>()).prop_map(|(score, passed)| Evidence::new(score, passed))
}

fn arb_patch() -> impl Strategy<Value = RecordPatch> {
    prop_oneof![
        ("[a-z]{1,8}", any::<bool>()).prop_map(|(key, document_valid)| {
            RecordPatch::Document {
                document_key: ImageKey::new(format!("docs/{key}.jpg")),
                extracted_fields: BTreeMap::from([(
                    "full_name".to_string(),
                    "Jane Roe".to_string(),
                )]),
                document_type: DocumentType::Passport,
                document_valid,
                validation_errors: if document_valid {
                    Vec::new()
                } else {
                    vec!["Missing field: name".to_string()]
                },
            }
        }),
        (arb_evidence(), proptest::option::of(arb_evidence()), any::<bool>()).prop_map(
            |(liveness, face_match, completed)| RecordPatch::Liveness {
                liveness,
                face_match,
                completed,
            }
        ),
        arb_evidence().prop_map(|face_match| RecordPatch::FaceMatch { face_match }),
    ]
}

proptest! {
    /// Once a record reports completion it never reverts, whatever patches
    /// arrive afterwards.
    #[test]
    fn completion_is_monotone(patches in prop::collection::vec(arb_patch(), 1..12)) {
        let user = UserId::new("u1");
        let mut record: Option<VerificationRecord> = None;
        let mut was_completed = false;

        for (i, patch) in patches.iter().enumerate() {
            let merged =
                merge_record(record.take(), &user, patch, Timestamp::new(i as u64)).unwrap();
            if was_completed {
                prop_assert!(merged.verification_completed);
            }
            was_completed = merged.verification_completed;
            record = Some(merged);
        }
    }

    /// Non-document patches never disturb previously stored document fields.
    #[test]
    fn document_fields_survive_other_patches(
        patches in prop::collection::vec(arb_patch(), 0..8),
    ) {
        let user = UserId::new("u1");
        let document = RecordPatch::Document {
            document_key: ImageKey::new("docs/original.jpg"),
            extracted_fields: BTreeMap::from([(
                "document_number".to_string(),
                "X1".to_string(),
            )]),
            document_type: DocumentType::NationalId,
            document_valid: true,
            validation_errors: Vec::new(),
        };
        let mut record =
            merge_record(None, &user, &document, Timestamp::new(0)).unwrap();

        for patch in &patches {
            if matches!(patch, RecordPatch::Document { .. }) {
                continue;
            }
            record = merge_record(Some(record), &user, patch, Timestamp::new(1)).unwrap();
        }

        prop_assert_eq!(record.document_key.as_ref().unwrap().as_str(), "docs/original.jpg");
        prop_assert_eq!(record.document_type, DocumentType::NationalId);
        prop_assert_eq!(record.document_valid, Some(true));
        prop_assert_eq!(record.extracted_fields.len(), 1);
    }

    /// A derived boolean is always stored alongside its evidence score, and
    /// every merge stamps the mutation time.
    #[test]
    fn booleans_always_carry_evidence(
        patches in prop::collection::vec(arb_patch(), 1..10),
        now in 0u64..1_000_000,
    ) {
        let user = UserId::new("u1");
        let mut record: Option<VerificationRecord> = None;

        for patch in &patches {
            let merged =
                merge_record(record.take(), &user, patch, Timestamp::new(now)).unwrap();
            prop_assert_eq!(
                merged.liveness_passed().is_some(),
                merged.liveness_confidence().is_some()
            );
            prop_assert_eq!(
                merged.face_matched().is_some(),
                merged.face_similarity().is_some()
            );
            prop_assert_eq!(merged.updated_at, Timestamp::new(now));
            record = Some(merged);
        }
    }
}
