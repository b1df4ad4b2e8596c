//! Logic lõi tổng hợp hồ sơ sức khỏe học sinh thành các góc nhìn tóm tắt.

use std::collections::{hash_map::Entry, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ngày tối thiểu mà một số backend trả về thay cho null.
pub const SENTINEL_DATE: &str = "0001-01-01T00:00:00";

/// Chuỗi placeholder đánh dấu giá trị chưa được ghi nhận.
pub const NOT_RECORDED: &str = "Not recorded";

/// Nhóm phân loại tình trạng y tế trong hồ sơ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    ChronicDisease,
    Allergy,
    MedicalHistory,
}

impl ConditionCategory {
    /// Thứ tự hiển thị cố định trên màn hình tóm tắt.
    pub const DISPLAY_ORDER: [ConditionCategory; 3] = [
        ConditionCategory::ChronicDisease,
        ConditionCategory::Allergy,
        ConditionCategory::MedicalHistory,
    ];

    /// Đọc mã nhóm từ dữ liệu thô; chấp nhận khác biệt hoa thường và dấu gạch.
    pub fn from_code(code: &str) -> Option<ConditionCategory> {
        let normalized: String = code
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "chronicdisease" => Some(ConditionCategory::ChronicDisease),
            "allergy" => Some(ConditionCategory::Allergy),
            "medicalhistory" => Some(ConditionCategory::MedicalHistory),
            _ => None,
        }
    }
}

/// Mức độ nghiêm trọng của một tình trạng, do phụ huynh hoặc y tá khai báo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Đọc mã mức độ từ dữ liệu thô. Mã lạ trả về `None` thay vì lỗi.
    pub fn from_code(code: &str) -> Option<Severity> {
        match code.trim().to_lowercase().as_str() {
            "mild" => Some(Severity::Mild),
            "moderate" => Some(Severity::Moderate),
            "severe" => Some(Severity::Severe),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Severity::Mild => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
        }
    }
}

/// Điểm xếp hạng dùng cho mọi so sánh "nặng hơn"; mức độ không xác định
/// xếp thấp nhất (0).
pub fn severity_rank(severity: Option<Severity>) -> u8 {
    severity.map_or(0, Severity::rank)
}

/// Một tình trạng y tế trong hồ sơ (bệnh mãn tính, dị ứng, tiền sử bệnh).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalConditionRecord {
    pub id: String,
    pub category: ConditionCategory,
    pub severity: Option<Severity>,
    pub diagnosis_date: Option<DateTime<Utc>>,
    pub name: String,
    pub reaction: Option<String>,
    pub treatment: Option<String>,
    pub medication: Option<String>,
    pub hospital: Option<String>,
    pub doctor: Option<String>,
    pub notes: Option<String>,
}

/// Một mũi tiêm đã thực hiện. Nhiều mũi cùng loại vắc-xin tạo thành một phác đồ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccinationDoseRecord {
    pub vaccination_type_id: String,
    pub vaccination_type_name: String,
    pub administered_date: Option<DateTime<Utc>>,
    pub dose_number: Option<u32>,
    pub administered_by: Option<String>,
    pub symptoms: Option<String>,
    pub notes: Option<String>,
}

/// Tóm tắt theo loại vắc-xin, dẫn xuất từ danh sách mũi tiêm hiện có.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaccineTypeSummary {
    pub vaccination_type_id: String,
    pub vaccination_type_name: String,
    pub total_doses: usize,
    pub latest_date: Option<DateTime<Utc>>,
    pub records: Vec<VaccinationDoseRecord>,
}

/// Một mũi tiêm kèm số thứ tự trình bày (1-based) trong danh sách đầy đủ.
///
/// Số thứ tự chỉ phục vụ hiển thị và được tính lại mỗi lần gọi, không phải
/// định danh lưu trữ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedDose {
    pub global_index: usize,
    pub record: VaccinationDoseRecord,
}

/// Kết quả một lần khám thể chất. BMI do máy chủ tính sẵn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicalCheckRecord {
    pub check_date: Option<DateTime<Utc>>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub comments: Option<String>,
}

/// Kết quả một lần khám thị lực (thang 0–10 cho từng mắt).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisionCheckRecord {
    pub check_date: Option<DateTime<Utc>>,
    pub left_eye: Option<f64>,
    pub right_eye: Option<f64>,
    pub comments: Option<String>,
}

/// Kết quả một lần khám thính lực (mã dải nghe cho từng tai).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HearingCheckRecord {
    pub check_date: Option<DateTime<Utc>>,
    pub left_ear: Option<String>,
    pub right_ear: Option<String>,
    pub comments: Option<String>,
}

/// Thông tin cơ bản của học sinh, chỉ dùng để hiển thị.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudentBasicInfo {
    pub student_id: String,
    pub full_name: String,
    pub class_name: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub gender: Option<String>,
}

/// Phân loại BMI theo ngưỡng lâm sàng cố định.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// Phân loại giá trị BMI. Giá trị biên thuộc về nhóm phía trên:
/// 18.5 là Normal, 25 là Overweight, 30 là Obese.
pub fn classify_bmi(bmi: f64) -> BmiStatus {
    if bmi < 18.5 {
        BmiStatus::Underweight
    } else if bmi < 25.0 {
        BmiStatus::Normal
    } else if bmi < 30.0 {
        BmiStatus::Overweight
    } else {
        BmiStatus::Obese
    }
}

/// Dải thính lực theo decibel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HearingBand {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl HearingBand {
    /// Đọc mã dải nghe từ dữ liệu thô; mã lạ trả về `None`.
    pub fn from_code(code: &str) -> Option<HearingBand> {
        match code.trim().to_lowercase().as_str() {
            "normal" => Some(HearingBand::Normal),
            "mild" => Some(HearingBand::Mild),
            "moderate" => Some(HearingBand::Moderate),
            "severe" => Some(HearingBand::Severe),
            _ => None,
        }
    }

    /// Xếp dải theo ngưỡng decibel mà hệ thống nguồn công bố.
    ///
    /// Khoảng (65, 66] không thuộc dải nào theo bảng ngưỡng gốc và được trả
    /// về `None` thay vì tự ý gán dải.
    pub fn from_decibels(decibels: f64) -> Option<HearingBand> {
        if decibels < 26.0 {
            Some(HearingBand::Normal)
        } else if decibels <= 40.0 {
            Some(HearingBand::Mild)
        } else if decibels <= 65.0 {
            Some(HearingBand::Moderate)
        } else if decibels > 66.0 {
            Some(HearingBand::Severe)
        } else {
            None
        }
    }

    /// Chú thích khoảng decibel tương ứng, dùng cho badge trên giao diện.
    pub fn decibel_range(self) -> &'static str {
        match self {
            HearingBand::Normal => "< 26 dB",
            HearingBand::Mild => "26–40 dB",
            HearingBand::Moderate => "41–65 dB",
            HearingBand::Severe => "> 66 dB",
        }
    }
}

/// Lỗi chung khi dựng bản tóm tắt hồ sơ.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Máy chủ trả về lỗi: {0}")]
    Api(String),
}

/// Ngày có phải marker 0001-01-01 thay cho null hay không.
pub fn is_sentinel_date(value: &str) -> bool {
    value.trim().starts_with("0001-01-01")
}

/// Giá trị đo dạng số có thật hay không. `0` và số âm là placeholder.
pub fn is_valid_numeric(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v > 0.0)
}

/// Giá trị đo dạng chuỗi có thật hay không. Chuỗi rỗng và `Not recorded`
/// là placeholder.
pub fn is_valid_text(value: Option<&str>) -> bool {
    match value {
        Some(text) => {
            let trimmed = text.trim();
            !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(NOT_RECORDED)
        }
        None => false,
    }
}

/// Định dạng ngày kiểu dd/mm/yyyy; `None` nghĩa là chưa có dữ liệu.
pub fn format_date(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|dt| dt.format("%d/%m/%Y").to_string())
}

/// Định dạng điểm thị lực dạng "x/10"; giá trị placeholder trả về `None`.
pub fn format_vision_score(value: Option<f64>) -> Option<String> {
    value
        .filter(|v| is_valid_numeric(Some(*v)))
        .map(|v| format!("{}/10", format_numeric(v)))
}

/// In số gọn: bỏ phần thập phân thừa.
pub fn format_numeric(value: f64) -> String {
    if (value.fract() - 0.0).abs() < f64::EPSILON {
        format!("{value:.0}")
    } else if (value * 10.0).fract().abs() < f64::EPSILON {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Chiều cao nhập tay chấp nhận được (cm). Ngoài khoảng thì chặn ngay trên
/// biểu mẫu, không tạo yêu cầu mạng.
pub fn is_plausible_height(height_cm: f64) -> bool {
    (50.0..=250.0).contains(&height_cm)
}

/// Cân nặng nhập tay chấp nhận được (kg).
pub fn is_plausible_weight(weight_kg: f64) -> bool {
    (10.0..=200.0).contains(&weight_kg)
}

/// Điểm thị lực nhập tay chấp nhận được (thang 1–10).
pub fn is_plausible_vision_score(score: f64) -> bool {
    (1.0..=10.0).contains(&score)
}

/// Sắp xếp tại chỗ theo ngày giảm dần; bản ghi không có ngày xếp cuối.
/// Sắp xếp ổn định nên các bản ghi cùng ngày giữ nguyên thứ tự đầu vào.
pub fn sort_descending_by_date<T, F>(records: &mut [T], date_of: F)
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    records.sort_by(|a, b| date_of(b).cmp(&date_of(a)));
}

/// Bản ghi mới nhất theo ngày; giữa các bản ghi cùng ngày lấy bản gặp trước.
pub fn latest_by_date<T, F>(records: &[T], date_of: F) -> Option<&T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut best: Option<&T> = None;
    for record in records {
        let replace = match best {
            Some(current) => is_more_recent(date_of(record), date_of(current)),
            None => true,
        };
        if replace {
            best = Some(record);
        }
    }
    best
}

/// Danh sách có đáng bày nút "xem tất cả" hay không.
pub fn has_multiple<T>(records: &[T]) -> bool {
    records.len() > 1
}

/// Chọn một tình trạng đại diện cho mỗi nhóm: mức độ nặng hơn thắng, cùng
/// mức độ thì ngày chẩn đoán mới hơn thắng, hòa hoàn toàn thì giữ bản ghi
/// gặp trước trong danh sách đầu vào.
pub fn select_representative(
    conditions: &[MedicalConditionRecord],
) -> HashMap<ConditionCategory, MedicalConditionRecord> {
    let mut best: HashMap<ConditionCategory, MedicalConditionRecord> = HashMap::new();
    for condition in conditions {
        match best.entry(condition.category) {
            Entry::Occupied(mut entry) => {
                let current = entry.get();
                let candidate_rank = severity_rank(condition.severity);
                let current_rank = severity_rank(current.severity);
                let wins = candidate_rank > current_rank
                    || (candidate_rank == current_rank
                        && is_more_recent(condition.diagnosis_date, current.diagnosis_date));
                if wins {
                    entry.insert(condition.clone());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(condition.clone());
            }
        }
    }
    best
}

/// Danh sách đầy đủ của một nhóm, sắp theo ngày chẩn đoán giảm dần.
pub fn conditions_in_category(
    conditions: &[MedicalConditionRecord],
    category: ConditionCategory,
) -> Vec<MedicalConditionRecord> {
    let mut matching: Vec<MedicalConditionRecord> = conditions
        .iter()
        .filter(|condition| condition.category == category)
        .cloned()
        .collect();
    sort_descending_by_date(&mut matching, |condition| condition.diagnosis_date);
    matching
}

/// Gom các mũi tiêm theo loại vắc-xin. Khóa gom là cặp (id, tên); kết quả
/// sắp theo ngày tiêm gần nhất giảm dần, nhóm cùng ngày giữ thứ tự xuất
/// hiện đầu tiên.
pub fn group_by_type(doses: &[VaccinationDoseRecord]) -> Vec<VaccineTypeSummary> {
    let mut groups: Vec<VaccineTypeSummary> = Vec::new();
    for dose in doses {
        let existing = groups.iter_mut().find(|group| {
            group.vaccination_type_id == dose.vaccination_type_id
                && group.vaccination_type_name == dose.vaccination_type_name
        });
        match existing {
            Some(group) => {
                group.total_doses += 1;
                if is_more_recent(dose.administered_date, group.latest_date) {
                    group.latest_date = dose.administered_date;
                }
                group.records.push(dose.clone());
            }
            None => groups.push(VaccineTypeSummary {
                vaccination_type_id: dose.vaccination_type_id.clone(),
                vaccination_type_name: dose.vaccination_type_name.clone(),
                total_doses: 1,
                latest_date: dose.administered_date,
                records: vec![dose.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| b.latest_date.cmp(&a.latest_date));
    groups
}

/// Danh sách phẳng toàn bộ mũi tiêm, giảm dần theo ngày, đánh số từ 1.
pub fn flatten_sorted_by_date(doses: &[VaccinationDoseRecord]) -> Vec<IndexedDose> {
    let mut ordered: Vec<VaccinationDoseRecord> = doses.to_vec();
    sort_descending_by_date(&mut ordered, |dose| dose.administered_date);
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, record)| IndexedDose {
            global_index: index + 1,
            record,
        })
        .collect()
}

/// Thẻ tóm tắt một nhóm tình trạng trên màn hình chính.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: ConditionCategory,
    pub representative: MedicalConditionRecord,
    pub total: usize,
    pub records: Vec<MedicalConditionRecord>,
}

/// Lần khám thể chất gần nhất kèm phân loại BMI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthSummary {
    pub latest: PhysicalCheckRecord,
    pub bmi_status: Option<BmiStatus>,
}

/// Ảnh tổng hợp hồ sơ sức khỏe dùng cho giao diện.
///
/// Luôn được dựng lại trọn vẹn từ danh sách bản ghi hiện tại, không giữ
/// trạng thái tăng dần giữa các lần gọi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthProfileSnapshot {
    pub generated_at: DateTime<Utc>,
    pub student: StudentBasicInfo,
    pub conditions: Vec<CategorySummary>,
    pub vaccinations: Vec<VaccineTypeSummary>,
    pub vaccination_history: Vec<IndexedDose>,
    pub growth: Option<GrowthSummary>,
    pub physical_history: Vec<PhysicalCheckRecord>,
    pub vision_history: Vec<VisionCheckRecord>,
    pub hearing_history: Vec<HearingCheckRecord>,
}

impl HealthProfileSnapshot {
    /// Dựng bản tóm tắt từ các danh sách bản ghi đã tải đầy đủ.
    pub fn from_records(
        student: StudentBasicInfo,
        conditions: Vec<MedicalConditionRecord>,
        doses: Vec<VaccinationDoseRecord>,
        mut physical: Vec<PhysicalCheckRecord>,
        mut vision: Vec<VisionCheckRecord>,
        mut hearing: Vec<HearingCheckRecord>,
    ) -> Self {
        let representatives = select_representative(&conditions);
        let mut category_summaries = Vec::new();
        for category in ConditionCategory::DISPLAY_ORDER {
            let Some(representative) = representatives.get(&category) else {
                continue;
            };
            let records = conditions_in_category(&conditions, category);
            category_summaries.push(CategorySummary {
                category,
                representative: representative.clone(),
                total: records.len(),
                records,
            });
        }

        let vaccinations = group_by_type(&doses);
        let vaccination_history = flatten_sorted_by_date(&doses);

        let growth = latest_by_date(&physical, |record| record.check_date).map(|latest| {
            GrowthSummary {
                bmi_status: latest.bmi.filter(|bmi| is_valid_numeric(Some(*bmi))).map(classify_bmi),
                latest: latest.clone(),
            }
        });

        sort_descending_by_date(&mut physical, |record| record.check_date);
        sort_descending_by_date(&mut vision, |record| record.check_date);
        sort_descending_by_date(&mut hearing, |record| record.check_date);

        Self {
            generated_at: Utc::now(),
            student,
            conditions: category_summaries,
            vaccinations,
            vaccination_history,
            growth,
            physical_history: physical,
            vision_history: vision,
            hearing_history: hearing,
        }
    }

    /// Lần khám thể chất gần nhất.
    pub fn latest_physical(&self) -> Option<&PhysicalCheckRecord> {
        self.physical_history.first()
    }

    /// Lần khám thị lực gần nhất.
    pub fn latest_vision(&self) -> Option<&VisionCheckRecord> {
        self.vision_history.first()
    }

    /// Lần khám thính lực gần nhất.
    pub fn latest_hearing(&self) -> Option<&HearingCheckRecord> {
        self.hearing_history.first()
    }
}

fn is_more_recent(candidate: Option<DateTime<Utc>>, current: Option<DateTime<Utc>>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        _ => false,
    }
}
