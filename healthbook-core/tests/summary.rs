use chrono::{DateTime, TimeZone, Utc};
use healthbook_core::{
    classify_bmi, conditions_in_category, flatten_sorted_by_date, format_date,
    format_vision_score, group_by_type, has_multiple, is_sentinel_date, is_valid_numeric,
    is_valid_text, latest_by_date, select_representative, severity_rank, sort_descending_by_date,
    BmiStatus, ConditionCategory, HealthProfileSnapshot, HearingBand, MedicalConditionRecord,
    PhysicalCheckRecord, Severity, StudentBasicInfo, VaccinationDoseRecord, VisionCheckRecord,
};

fn day(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Some(
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("Ngày thử nghiệm không hợp lệ"),
    )
}

fn condition(
    id: &str,
    category: ConditionCategory,
    severity: Option<Severity>,
    diagnosis_date: Option<DateTime<Utc>>,
) -> MedicalConditionRecord {
    MedicalConditionRecord {
        id: id.to_string(),
        category,
        severity,
        diagnosis_date,
        name: format!("Tình trạng {id}"),
        reaction: None,
        treatment: None,
        medication: None,
        hospital: None,
        doctor: None,
        notes: None,
    }
}

fn dose(type_id: &str, name: &str, administered_date: Option<DateTime<Utc>>) -> VaccinationDoseRecord {
    VaccinationDoseRecord {
        vaccination_type_id: type_id.to_string(),
        vaccination_type_name: name.to_string(),
        administered_date,
        dose_number: None,
        administered_by: None,
        symptoms: None,
        notes: None,
    }
}

fn physical(check_date: Option<DateTime<Utc>>, bmi: Option<f64>) -> PhysicalCheckRecord {
    PhysicalCheckRecord {
        check_date,
        height_cm: Some(140.0),
        weight_kg: Some(35.0),
        bmi,
        comments: None,
    }
}

#[test]
fn severity_rank_is_totally_ordered() {
    assert!(severity_rank(Some(Severity::Severe)) > severity_rank(Some(Severity::Moderate)));
    assert!(severity_rank(Some(Severity::Moderate)) > severity_rank(Some(Severity::Mild)));
    assert!(severity_rank(Some(Severity::Mild)) > severity_rank(None));
    assert_eq!(severity_rank(None), 0);
}

#[test]
fn severity_codes_parse_case_insensitively() {
    assert_eq!(Severity::from_code("Severe"), Some(Severity::Severe));
    assert_eq!(Severity::from_code("moderate"), Some(Severity::Moderate));
    assert_eq!(Severity::from_code(" MILD "), Some(Severity::Mild));
    assert_eq!(Severity::from_code("Nghiêm trọng"), None);
}

#[test]
fn representative_prefers_severity_then_recency() {
    let records = vec![
        condition("a", ConditionCategory::Allergy, Some(Severity::Mild), day(2021, 1, 1)),
        condition("b", ConditionCategory::Allergy, Some(Severity::Severe), day(2020, 1, 1)),
        condition("c", ConditionCategory::Allergy, Some(Severity::Severe), day(2022, 6, 1)),
    ];

    let selected = select_representative(&records);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[&ConditionCategory::Allergy].id, "c");
}

#[test]
fn representative_keeps_first_on_full_tie() {
    let records = vec![
        condition("first", ConditionCategory::ChronicDisease, Some(Severity::Moderate), day(2021, 3, 1)),
        condition("second", ConditionCategory::ChronicDisease, Some(Severity::Moderate), day(2021, 3, 1)),
    ];

    let selected = select_representative(&records);
    assert_eq!(selected[&ConditionCategory::ChronicDisease].id, "first");
}

#[test]
fn representative_treats_unknown_severity_as_lowest() {
    let records = vec![
        condition("unknown", ConditionCategory::MedicalHistory, None, day(2023, 1, 1)),
        condition("mild", ConditionCategory::MedicalHistory, Some(Severity::Mild), day(2019, 1, 1)),
    ];

    let selected = select_representative(&records);
    assert_eq!(selected[&ConditionCategory::MedicalHistory].id, "mild");
}

#[test]
fn conditions_in_category_filters_and_sorts_descending() {
    let records = vec![
        condition("old", ConditionCategory::Allergy, None, day(2020, 1, 1)),
        condition("chronic", ConditionCategory::ChronicDisease, None, day(2021, 1, 1)),
        condition("new", ConditionCategory::Allergy, None, day(2022, 1, 1)),
    ];

    let allergies = conditions_in_category(&records, ConditionCategory::Allergy);
    let ids: Vec<&str> = allergies.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn grouper_counts_doses_and_orders_by_latest_date() {
    let doses = vec![
        dose("1", "MMR", day(2021, 1, 1)),
        dose("2", "Polio", day(2020, 1, 1)),
        dose("1", "MMR", day(2021, 6, 1)),
        dose("1", "MMR", day(2022, 1, 1)),
    ];

    let groups = group_by_type(&doses);
    assert_eq!(groups.len(), 2);

    assert_eq!(groups[0].vaccination_type_name, "MMR");
    assert_eq!(groups[0].total_doses, 3);
    assert_eq!(groups[0].latest_date, day(2022, 1, 1));
    assert_eq!(groups[0].records.len(), 3);

    assert_eq!(groups[1].vaccination_type_name, "Polio");
    assert_eq!(groups[1].total_doses, 1);
    assert_eq!(groups[1].latest_date, day(2020, 1, 1));
}

#[test]
fn grouper_separates_types_sharing_a_name() {
    // Cùng tên nhưng khác id vẫn là hai loại khác nhau.
    let doses = vec![
        dose("1", "Viêm gan B", day(2021, 1, 1)),
        dose("2", "Viêm gan B", day(2021, 2, 1)),
    ];

    let groups = group_by_type(&doses);
    assert_eq!(groups.len(), 2);
}

#[test]
fn flatten_indexes_every_dose_exactly_once() {
    let doses = vec![
        dose("1", "MMR", day(2021, 6, 1)),
        dose("2", "Polio", day(2022, 1, 1)),
        dose("1", "MMR", day(2021, 6, 1)),
        dose("3", "BCG", None),
    ];

    let flat = flatten_sorted_by_date(&doses);
    assert_eq!(flat.len(), doses.len());

    let indices: Vec<usize> = flat.iter().map(|entry| entry.global_index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);

    for pair in flat.windows(2) {
        assert!(pair[0].record.administered_date >= pair[1].record.administered_date
            || pair[1].record.administered_date.is_none());
    }

    assert_eq!(flat[0].record.vaccination_type_name, "Polio");
    assert!(flat[3].record.administered_date.is_none());
}

#[test]
fn bmi_boundaries_belong_to_the_upper_bucket() {
    assert_eq!(classify_bmi(18.49), BmiStatus::Underweight);
    assert_eq!(classify_bmi(18.5), BmiStatus::Normal);
    assert_eq!(classify_bmi(24.99), BmiStatus::Normal);
    assert_eq!(classify_bmi(25.0), BmiStatus::Overweight);
    assert_eq!(classify_bmi(29.99), BmiStatus::Overweight);
    assert_eq!(classify_bmi(30.0), BmiStatus::Obese);
}

#[test]
fn placeholder_values_are_not_measurements() {
    assert!(!is_valid_numeric(Some(0.0)));
    assert!(!is_valid_numeric(Some(-1.0)));
    assert!(!is_valid_numeric(None));
    assert!(is_valid_numeric(Some(7.0)));

    assert!(!is_valid_text(Some("Not recorded")));
    assert!(!is_valid_text(Some("")));
    assert!(!is_valid_text(Some("   ")));
    assert!(!is_valid_text(None));
    assert!(is_valid_text(Some("10/10")));

    assert!(is_sentinel_date("0001-01-01T00:00:00"));
    assert!(!is_sentinel_date("2021-01-01T00:00:00"));
}

#[test]
fn formatting_returns_none_for_missing_data() {
    assert_eq!(format_date(day(2021, 12, 5)), Some("05/12/2021".to_string()));
    assert_eq!(format_date(None), None);

    assert_eq!(format_vision_score(Some(7.0)), Some("7/10".to_string()));
    assert_eq!(format_vision_score(Some(8.5)), Some("8.5/10".to_string()));
    assert_eq!(format_vision_score(Some(0.0)), None);
    assert_eq!(format_vision_score(None), None);
}

#[test]
fn form_range_guards_use_the_documented_bounds() {
    assert!(healthbook_core::is_plausible_height(50.0));
    assert!(healthbook_core::is_plausible_height(250.0));
    assert!(!healthbook_core::is_plausible_height(49.9));
    assert!(!healthbook_core::is_plausible_height(250.1));

    assert!(healthbook_core::is_plausible_weight(10.0));
    assert!(!healthbook_core::is_plausible_weight(200.5));

    assert!(healthbook_core::is_plausible_vision_score(1.0));
    assert!(healthbook_core::is_plausible_vision_score(10.0));
    assert!(!healthbook_core::is_plausible_vision_score(0.5));
    assert!(!healthbook_core::is_plausible_vision_score(10.5));
}

#[test]
fn hearing_bands_follow_the_published_thresholds() {
    assert_eq!(HearingBand::from_code("normal"), Some(HearingBand::Normal));
    assert_eq!(HearingBand::from_code("Severe"), Some(HearingBand::Severe));
    assert_eq!(HearingBand::from_code("inaudible"), None);

    assert_eq!(HearingBand::from_decibels(25.9), Some(HearingBand::Normal));
    assert_eq!(HearingBand::from_decibels(26.0), Some(HearingBand::Mild));
    assert_eq!(HearingBand::from_decibels(40.0), Some(HearingBand::Mild));
    assert_eq!(HearingBand::from_decibels(41.0), Some(HearingBand::Moderate));
    assert_eq!(HearingBand::from_decibels(65.0), Some(HearingBand::Moderate));
    assert_eq!(HearingBand::from_decibels(66.5), Some(HearingBand::Severe));

    // 66 dB nằm trong khoảng trống của bảng ngưỡng gốc.
    assert_eq!(HearingBand::from_decibels(66.0), None);
}

#[test]
fn empty_inputs_produce_empty_views() {
    assert!(select_representative(&[]).is_empty());
    assert!(group_by_type(&[]).is_empty());
    assert!(flatten_sorted_by_date(&[]).is_empty());
    assert!(latest_by_date(&[] as &[PhysicalCheckRecord], |record| record.check_date).is_none());
    assert!(!has_multiple(&[] as &[PhysicalCheckRecord]));
    assert!(!has_multiple(&[physical(day(2021, 1, 1), None)]));
}

#[test]
fn latest_by_date_keeps_first_among_equal_dates() {
    let records = vec![
        physical(day(2021, 5, 1), Some(17.0)),
        physical(day(2021, 5, 1), Some(18.0)),
        physical(day(2020, 5, 1), Some(19.0)),
    ];

    let latest = latest_by_date(&records, |record| record.check_date)
        .expect("Phải có bản ghi mới nhất");
    assert_eq!(latest.bmi, Some(17.0));
}

#[test]
fn sort_descending_places_missing_dates_last() {
    let mut records = vec![
        VisionCheckRecord {
            check_date: None,
            left_eye: Some(7.0),
            right_eye: Some(7.0),
            comments: None,
        },
        VisionCheckRecord {
            check_date: day(2022, 3, 1),
            left_eye: Some(9.0),
            right_eye: Some(9.0),
            comments: None,
        },
        VisionCheckRecord {
            check_date: day(2021, 3, 1),
            left_eye: Some(8.0),
            right_eye: Some(8.0),
            comments: None,
        },
    ];

    sort_descending_by_date(&mut records, |record| record.check_date);
    assert_eq!(records[0].check_date, day(2022, 3, 1));
    assert_eq!(records[1].check_date, day(2021, 3, 1));
    assert!(records[2].check_date.is_none());
}

#[test]
fn snapshot_derives_every_view_from_one_pass() {
    let student = StudentBasicInfo {
        student_id: "hs-01".to_string(),
        full_name: "Nguyễn Văn An".to_string(),
        class_name: Some("3A".to_string()),
        date_of_birth: day(2016, 9, 5),
        gender: None,
    };
    let conditions = vec![
        condition("allergy", ConditionCategory::Allergy, Some(Severity::Moderate), day(2022, 1, 1)),
        condition("chronic", ConditionCategory::ChronicDisease, Some(Severity::Mild), day(2021, 1, 1)),
    ];
    let doses = vec![
        dose("1", "MMR", day(2021, 1, 1)),
        dose("1", "MMR", day(2022, 1, 1)),
    ];
    let physicals = vec![
        physical(day(2021, 9, 1), Some(16.2)),
        physical(day(2023, 9, 1), Some(26.1)),
    ];

    let snapshot = HealthProfileSnapshot::from_records(
        student,
        conditions,
        doses,
        physicals,
        Vec::new(),
        Vec::new(),
    );

    // Nhóm hiển thị theo thứ tự cố định, nhóm vắng mặt bị bỏ.
    let categories: Vec<ConditionCategory> = snapshot
        .conditions
        .iter()
        .map(|summary| summary.category)
        .collect();
    assert_eq!(
        categories,
        vec![ConditionCategory::ChronicDisease, ConditionCategory::Allergy]
    );
    assert_eq!(snapshot.conditions[1].total, 1);

    assert_eq!(snapshot.vaccinations.len(), 1);
    assert_eq!(snapshot.vaccinations[0].total_doses, 2);
    assert_eq!(snapshot.vaccination_history[0].global_index, 1);

    let growth = snapshot.growth.as_ref().expect("Phải có tóm tắt tăng trưởng");
    assert_eq!(growth.latest.check_date, day(2023, 9, 1));
    assert_eq!(growth.bmi_status, Some(BmiStatus::Overweight));

    assert_eq!(
        snapshot.latest_physical().and_then(|record| record.check_date),
        day(2023, 9, 1)
    );
    assert!(snapshot.latest_vision().is_none());
    assert!(snapshot.vision_history.is_empty());
}
