//! School health-platform REST payload to `HealthProfileSnapshot` converter.
//!
//! Mọi payload của nền tảng đều bọc trong envelope
//! `{ success, message, data, errors }`; module này mở envelope, chuẩn hóa
//! các giá trị placeholder (ngày 0001-01-01, số 0, chuỗi `Not recorded`)
//! thành `None` rồi dựng bản tóm tắt bằng healthbook-core.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use healthbook_core::{
    is_sentinel_date, is_valid_numeric, is_valid_text, ConditionCategory, HealthProfileSnapshot,
    HearingCheckRecord, MedicalConditionRecord, PhysicalCheckRecord, ProfileError, Severity,
    StudentBasicInfo, VaccinationDoseRecord, VisionCheckRecord,
};

/// Một loại vắc-xin trong danh mục, dùng cho ô gợi ý khi nhập liệu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaccineType {
    pub id: String,
    pub name: String,
}

/// Summarize a profile payload from a JSON string.
pub fn summarize_profile_str(payload: &str) -> Result<HealthProfileSnapshot, ProfileError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|err| ProfileError::Parse(err.to_string()))?;
    summarize_profile_value(&value)
}

/// Summarize a profile payload from a `serde_json::Value`.
pub fn summarize_profile_value(payload: &Value) -> Result<HealthProfileSnapshot, ProfileError> {
    let data = unwrap_envelope(payload)?;

    let student = data
        .get("basicInfo")
        .map(parse_basic_info)
        .unwrap_or_default();
    let conditions = records_in(data, "medicalConditions", parse_condition);
    let doses = records_in(data, "vaccinationRecords", parse_vaccination);
    let physical = records_in(data, "physicalRecords", parse_physical);
    let vision = records_in(data, "visionRecords", parse_vision);
    let hearing = records_in(data, "hearingRecords", parse_hearing);

    Ok(HealthProfileSnapshot::from_records(
        student, conditions, doses, physical, vision, hearing,
    ))
}

/// Decode the vaccine-catalog payload into `{ id, name }` pairs.
pub fn parse_vaccine_types(payload: &str) -> Result<Vec<VaccineType>, ProfileError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|err| ProfileError::Parse(err.to_string()))?;
    parse_vaccine_types_value(&value)
}

/// Decode the vaccine-catalog payload from a `serde_json::Value`.
pub fn parse_vaccine_types_value(payload: &Value) -> Result<Vec<VaccineType>, ProfileError> {
    let data = unwrap_envelope(payload)?;
    let entries = data.as_array().ok_or(ProfileError::MissingData)?;
    Ok(entries.iter().filter_map(parse_vaccine_type).collect())
}

/// Mở envelope chung của nền tảng: trả về `data` khi `success`, ngược lại
/// gom `message`/`errors` thành một lỗi `Api`.
pub fn unwrap_envelope(payload: &Value) -> Result<&Value, ProfileError> {
    let success = payload
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !success {
        return Err(ProfileError::Api(envelope_message(payload)));
    }

    payload.get("data").ok_or(ProfileError::MissingData)
}

fn envelope_message(payload: &Value) -> String {
    if let Some(message) = payload.get("message").and_then(Value::as_str) {
        if !message.trim().is_empty() {
            return message.trim().to_string();
        }
    }

    if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
        let parts: Vec<&str> = errors
            .iter()
            .filter_map(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .collect();
        if !parts.is_empty() {
            return parts.join("; ");
        }
    }

    "Yêu cầu không thành công".to_string()
}

fn records_in<T>(data: &Value, field: &str, parse: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    data.get(field)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(|entry| parse(entry)).collect())
        .unwrap_or_default()
}

fn parse_basic_info(value: &Value) -> StudentBasicInfo {
    StudentBasicInfo {
        student_id: id_field(value, &["studentId", "id"]).unwrap_or_default(),
        full_name: text_field(value, &["fullName", "name"]).unwrap_or_default(),
        class_name: text_field(value, &["className", "class"]),
        date_of_birth: date_field(value, &["dateOfBirth", "dob"]),
        gender: text_field(value, &["gender"]),
    }
}

fn parse_condition(entry: &Value) -> Option<MedicalConditionRecord> {
    // Nhóm nằm ngoài ba nhóm đã định nghĩa thì không đặt được vào bản tóm
    // tắt, bỏ qua bản ghi.
    let category = raw_text(entry, &["category"])
        .as_deref()
        .and_then(ConditionCategory::from_code)?;

    Some(MedicalConditionRecord {
        id: id_field(entry, &["id", "conditionId"]).unwrap_or_default(),
        category,
        severity: raw_text(entry, &["severity"])
            .as_deref()
            .and_then(Severity::from_code),
        diagnosis_date: date_field(entry, &["diagnosisDate", "dateDiagnosed"]),
        name: text_field(entry, &["name", "conditionName"]).unwrap_or_default(),
        reaction: text_field(entry, &["reaction"]),
        treatment: text_field(entry, &["treatment"]),
        medication: text_field(entry, &["medication"]),
        hospital: text_field(entry, &["hospital"]),
        doctor: text_field(entry, &["doctor", "doctorName"]),
        notes: text_field(entry, &["notes", "note"]),
    })
}

fn parse_vaccination(entry: &Value) -> Option<VaccinationDoseRecord> {
    let vaccination_type_id = id_field(entry, &["vaccinationTypeId", "vaccineTypeId"])?;

    Some(VaccinationDoseRecord {
        vaccination_type_id,
        vaccination_type_name: text_field(entry, &["vaccinationTypeName", "vaccineName"])
            .unwrap_or_default(),
        administered_date: date_field(entry, &["administeredDate", "vaccinationDate"]),
        dose_number: integer_field(entry, &["doseNumber"]),
        administered_by: text_field(entry, &["administeredBy", "administrator"]),
        symptoms: text_field(entry, &["symptoms"]),
        notes: text_field(entry, &["notes", "note"]),
    })
}

fn parse_physical(entry: &Value) -> Option<PhysicalCheckRecord> {
    let record = PhysicalCheckRecord {
        check_date: date_field(entry, &["checkDate", "checkupDate"]),
        height_cm: measurement_field(entry, &["height", "heightCm"]),
        weight_kg: measurement_field(entry, &["weight", "weightKg"]),
        bmi: measurement_field(entry, &["bmi"]),
        comments: text_field(entry, &["comments", "note"]),
    };

    let empty = record.check_date.is_none()
        && record.height_cm.is_none()
        && record.weight_kg.is_none()
        && record.bmi.is_none();
    if empty {
        return None;
    }
    Some(record)
}

fn parse_vision(entry: &Value) -> Option<VisionCheckRecord> {
    let record = VisionCheckRecord {
        check_date: date_field(entry, &["checkDate", "checkupDate"]),
        left_eye: measurement_field(entry, &["leftEye"]),
        right_eye: measurement_field(entry, &["rightEye"]),
        comments: text_field(entry, &["comments", "note"]),
    };

    let empty =
        record.check_date.is_none() && record.left_eye.is_none() && record.right_eye.is_none();
    if empty {
        return None;
    }
    Some(record)
}

fn parse_hearing(entry: &Value) -> Option<HearingCheckRecord> {
    let record = HearingCheckRecord {
        check_date: date_field(entry, &["checkDate", "checkupDate"]),
        left_ear: text_field(entry, &["leftEar"]),
        right_ear: text_field(entry, &["rightEar"]),
        comments: text_field(entry, &["comments", "note"]),
    };

    let empty =
        record.check_date.is_none() && record.left_ear.is_none() && record.right_ear.is_none();
    if empty {
        return None;
    }
    Some(record)
}

fn parse_vaccine_type(entry: &Value) -> Option<VaccineType> {
    let id = id_field(entry, &["id", "vaccinationTypeId"])?;
    let name = text_field(entry, &["name", "vaccinationTypeName"])?;
    Some(VaccineType { id, name })
}

/// Chuỗi thô của trường đầu tiên có mặt, chỉ cắt khoảng trắng.
fn raw_text(value: &Value, fields: &[&str]) -> Option<String> {
    for field in fields {
        if let Some(text) = value.get(*field).and_then(Value::as_str) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Chuỗi hiển thị: lọc thêm các placeholder kiểu `Not recorded`.
fn text_field(value: &Value, fields: &[&str]) -> Option<String> {
    raw_text(value, fields).filter(|text| is_valid_text(Some(text.as_str())))
}

/// Định danh: chấp nhận cả chuỗi lẫn số.
fn id_field(value: &Value, fields: &[&str]) -> Option<String> {
    for field in fields {
        match value.get(*field) {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                return Some(text.trim().to_string());
            }
            Some(Value::Number(number)) => return Some(number.to_string()),
            _ => {}
        }
    }
    None
}

/// Giá trị đo dạng số: chấp nhận số JSON hoặc chuỗi số, lọc placeholder
/// (0 và số âm nghĩa là chưa đo).
fn measurement_field(value: &Value, fields: &[&str]) -> Option<f64> {
    for field in fields {
        let number = match value.get(*field) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        if let Some(number) = number {
            return is_valid_numeric(Some(number)).then_some(number);
        }
    }
    None
}

fn integer_field(value: &Value, fields: &[&str]) -> Option<u32> {
    for field in fields {
        let number = match value.get(*field) {
            Some(Value::Number(number)) => number.as_u64(),
            Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
            _ => None,
        };
        if let Some(number) = number {
            return u32::try_from(number).ok();
        }
    }
    None
}

fn date_field(value: &Value, fields: &[&str]) -> Option<DateTime<Utc>> {
    for field in fields {
        if let Some(text) = value.get(*field).and_then(Value::as_str) {
            if let Some(parsed) = parse_record_date(text) {
                return Some(parsed);
            }
        }
    }
    None
}

/// Đọc ngày từ chuỗi của backend. Marker 0001-01-01 và chuỗi không đọc
/// được đều trở thành `None`.
fn parse_record_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_sentinel_date(trimmed) {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}
