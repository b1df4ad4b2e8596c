use healthbook_api::{parse_vaccine_types, summarize_profile_value, VaccineType};
use healthbook_core::ProfileError;
use serde_json::json;

#[test]
fn failed_envelope_surfaces_the_message() {
    let payload = json!({
        "success": false,
        "message": "Học sinh không tồn tại",
        "data": null
    });

    match summarize_profile_value(&payload) {
        Err(ProfileError::Api(message)) => assert_eq!(message, "Học sinh không tồn tại"),
        other => panic!("Kết quả không mong đợi: {other:?}"),
    }
}

#[test]
fn failed_envelope_joins_the_error_list() {
    let payload = json!({
        "success": false,
        "message": "",
        "errors": ["Thiếu mã học sinh", "Phiên đăng nhập hết hạn"]
    });

    match summarize_profile_value(&payload) {
        Err(ProfileError::Api(message)) => {
            assert_eq!(message, "Thiếu mã học sinh; Phiên đăng nhập hết hạn");
        }
        other => panic!("Kết quả không mong đợi: {other:?}"),
    }
}

#[test]
fn envelope_without_success_flag_counts_as_failure() {
    let payload = json!({ "data": {} });

    assert!(matches!(
        summarize_profile_value(&payload),
        Err(ProfileError::Api(_))
    ));
}

#[test]
fn successful_envelope_without_data_is_missing_data() {
    let payload = json!({ "success": true, "message": "OK" });

    assert!(matches!(
        summarize_profile_value(&payload),
        Err(ProfileError::MissingData)
    ));
}

#[test]
fn missing_collections_default_to_empty_views() {
    let payload = json!({ "success": true, "data": {} });

    let snapshot = summarize_profile_value(&payload).expect("Payload rỗng vẫn phải tóm tắt được");
    assert!(snapshot.conditions.is_empty());
    assert!(snapshot.vaccinations.is_empty());
    assert!(snapshot.vaccination_history.is_empty());
    assert!(snapshot.growth.is_none());
    assert!(snapshot.physical_history.is_empty());
    assert!(snapshot.vision_history.is_empty());
    assert!(snapshot.hearing_history.is_empty());
    assert_eq!(snapshot.student.full_name, "");
}

#[test]
fn placeholders_normalize_to_none_at_the_boundary() {
    let payload = json!({
        "success": true,
        "data": {
            "physicalRecords": [
                {
                    "checkDate": "0001-01-01T00:00:00",
                    "height": "120.5",
                    "weight": 0,
                    "bmi": 0,
                    "comments": "Not recorded"
                }
            ]
        }
    });

    let snapshot = summarize_profile_value(&payload).expect("Không dựng được bản tóm tắt");
    assert_eq!(snapshot.physical_history.len(), 1);

    let record = &snapshot.physical_history[0];
    assert!(record.check_date.is_none());
    assert_eq!(record.height_cm, Some(120.5));
    assert!(record.weight_kg.is_none());
    assert!(record.bmi.is_none());
    assert!(record.comments.is_none());

    // BMI placeholder thì không phân loại được.
    let growth = snapshot.growth.as_ref().expect("Vẫn có lần khám mới nhất");
    assert!(growth.bmi_status.is_none());
}

#[test]
fn all_placeholder_records_are_dropped() {
    let payload = json!({
        "success": true,
        "data": {
            "visionRecords": [
                { "checkDate": "0001-01-01T00:00:00", "leftEye": 0, "rightEye": 0, "comments": "" }
            ],
            "hearingRecords": [
                { "leftEar": "Not recorded", "rightEar": "" }
            ]
        }
    });

    let snapshot = summarize_profile_value(&payload).expect("Không dựng được bản tóm tắt");
    assert!(snapshot.vision_history.is_empty());
    assert!(snapshot.hearing_history.is_empty());
}

#[test]
fn vaccine_catalog_parses_id_and_name_pairs() {
    let payload = json!({
        "success": true,
        "data": [
            { "id": 3, "name": "BCG" },
            { "id": "9", "name": "" },
            { "name": "Không có id" }
        ]
    })
    .to_string();

    let types = parse_vaccine_types(&payload).expect("Không đọc được danh mục vắc-xin");
    assert_eq!(
        types,
        vec![VaccineType {
            id: "3".to_string(),
            name: "BCG".to_string(),
        }]
    );
}
