//! Thành phần giao diện hồ sơ sức khỏe học sinh cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::styles;
    use chrono::{DateTime, Utc};
    use healthbook_core::{
        format_date, format_numeric, format_vision_score, has_multiple, BmiStatus,
        CategorySummary, ConditionCategory, GrowthSummary, HealthProfileSnapshot, HearingBand,
        HearingCheckRecord, IndexedDose, MedicalConditionRecord, PhysicalCheckRecord, Severity,
        StudentBasicInfo, VaccineTypeSummary, VisionCheckRecord,
    };
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, Window};
    use yew::prelude::*;

    #[derive(Properties, PartialEq)]
    pub struct ProfileViewProps {
        pub snapshot: HealthProfileSnapshot,
    }

    #[function_component(ProfileView)]
    fn profile_view(props: &ProfileViewProps) -> Html {
        let snapshot = &props.snapshot;

        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        html! {
            <div class="healthbook-root">
                { render_student_header(&snapshot.student) }
                <div class="healthbook-grid">
                    {
                        if snapshot.conditions.is_empty() {
                            html! {
                                <section class="healthbook-card">
                                    <header><h3>{"Tình trạng y tế"}</h3></header>
                                    <p class="healthbook-empty">{"Chưa ghi nhận tình trạng y tế nào."}</p>
                                </section>
                            }
                        } else {
                            html! {
                                for snapshot.conditions.iter().map(|summary| html! {
                                    <ConditionCard summary={summary.clone()} />
                                })
                            }
                        }
                    }
                    <VaccinationCard
                        groups={snapshot.vaccinations.clone()}
                        history={snapshot.vaccination_history.clone()}
                    />
                    <GrowthCard
                        growth={snapshot.growth.clone()}
                        history={snapshot.physical_history.clone()}
                    />
                    <VisionCard history={snapshot.vision_history.clone()} />
                    <HearingCard history={snapshot.hearing_history.clone()} />
                </div>
            </div>
        }
    }

    fn render_student_header(student: &StudentBasicInfo) -> Html {
        let mut detail_parts = Vec::new();
        if let Some(class_name) = &student.class_name {
            detail_parts.push(format!("Lớp {class_name}"));
        }
        if let Some(birthday) = format_date(student.date_of_birth) {
            detail_parts.push(format!("Sinh ngày {birthday}"));
        }
        if let Some(gender) = &student.gender {
            detail_parts.push(gender.clone());
        }

        html! {
            <header class="healthbook-header">
                <span class="healthbook-eyebrow">{"Sổ sức khỏe học sinh"}</span>
                <h2>{ student.full_name.clone() }</h2>
                {
                    if detail_parts.is_empty() {
                        html! {}
                    } else {
                        html! { <p class="healthbook-subtitle">{ detail_parts.join(" | ") }</p> }
                    }
                }
            </header>
        }
    }

    #[derive(Properties, PartialEq)]
    struct ConditionCardProps {
        pub summary: CategorySummary,
    }

    #[function_component(ConditionCard)]
    fn condition_card(props: &ConditionCardProps) -> Html {
        let summary = &props.summary;
        let expanded = use_state(|| false);
        let on_toggle = {
            let expanded = expanded.clone();
            Callback::from(move |_| expanded.set(!*expanded))
        };

        html! {
            <section class="healthbook-card">
                <header>
                    <h3>{ category_title(summary.category) }</h3>
                    <span class="healthbook-count">{ summary.total }</span>
                </header>
                { render_condition(&summary.representative) }
                {
                    if has_multiple(&summary.records) {
                        html! {
                            <>
                                <button type="button" class="healthbook-toggle" onclick={on_toggle}>
                                    { if *expanded { "Thu gọn".to_string() } else { format!("Xem tất cả ({})", summary.total) } }
                                </button>
                                {
                                    if *expanded {
                                        html! {
                                            <ul class="healthbook-history">
                                                { for summary.records.iter().map(|record| html! {
                                                    <li>{ render_condition(record) }</li>
                                                }) }
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>
        }
    }

    fn render_condition(record: &MedicalConditionRecord) -> Html {
        html! {
            <div class="healthbook-condition">
                <div class="healthbook-condition-header">
                    <span class="healthbook-label">{ record.name.clone() }</span>
                    <span class="severity-badge" data-level={severity_level(record.severity)}>
                        { severity_label(record.severity) }
                    </span>
                </div>
                <span class="healthbook-date">{ format_timestamp(record.diagnosis_date) }</span>
                { condition_detail(record).map(render_detail).unwrap_or_default() }
            </div>
        }
    }

    fn condition_detail(record: &MedicalConditionRecord) -> Option<String> {
        let mut phrases = Vec::new();
        if let Some(reaction) = &record.reaction {
            phrases.push(format!("Phản ứng: {reaction}."));
        }
        if let Some(treatment) = &record.treatment {
            phrases.push(format!("Xử trí: {treatment}."));
        }
        if let Some(medication) = &record.medication {
            phrases.push(format!("Thuốc: {medication}."));
        }
        if let Some(hospital) = &record.hospital {
            phrases.push(format!("Nơi khám: {hospital}."));
        }
        if let Some(doctor) = &record.doctor {
            phrases.push(format!("Bác sĩ: {doctor}."));
        }
        if let Some(notes) = &record.notes {
            phrases.push(notes.clone());
        }

        if phrases.is_empty() {
            None
        } else {
            Some(phrases.join(" "))
        }
    }

    fn render_detail(detail: String) -> Html {
        html! { <p class="healthbook-detail">{ detail }</p> }
    }

    #[derive(Properties, PartialEq)]
    struct VaccinationCardProps {
        pub groups: Vec<VaccineTypeSummary>,
        pub history: Vec<IndexedDose>,
    }

    #[function_component(VaccinationCard)]
    fn vaccination_card(props: &VaccinationCardProps) -> Html {
        let expanded = use_state(|| false);
        let on_toggle = {
            let expanded = expanded.clone();
            Callback::from(move |_| expanded.set(!*expanded))
        };

        html! {
            <section class="healthbook-card">
                <header>
                    <h3>{"Tiêm chủng"}</h3>
                    <span class="healthbook-count">{ props.history.len() }</span>
                </header>
                <ul class="vaccine-list">
                    {
                        if props.groups.is_empty() {
                            html! { <li class="healthbook-empty">{"Chưa ghi nhận mũi tiêm nào."}</li> }
                        } else {
                            html! { for props.groups.iter().map(render_vaccine_group) }
                        }
                    }
                </ul>
                {
                    if has_multiple(&props.history) {
                        html! {
                            <>
                                <button type="button" class="healthbook-toggle" onclick={on_toggle}>
                                    { if *expanded { "Thu gọn".to_string() } else { format!("Xem tất cả ({})", props.history.len()) } }
                                </button>
                                {
                                    if *expanded {
                                        html! {
                                            <ul class="healthbook-history">
                                                { for props.history.iter().map(render_dose_row) }
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>
        }
    }

    fn render_vaccine_group(group: &VaccineTypeSummary) -> Html {
        html! {
            <li class="vaccine-item">
                <span class="healthbook-label">{ group.vaccination_type_name.clone() }</span>
                <span class="vaccine-doses">{ format!("{} mũi", group.total_doses) }</span>
                <span class="healthbook-date">{ format_timestamp(group.latest_date) }</span>
            </li>
        }
    }

    fn render_dose_row(entry: &IndexedDose) -> Html {
        let dose_number = entry
            .record
            .dose_number
            .map(|number| format!("mũi số {number}"))
            .unwrap_or_else(|| "mũi chưa rõ thứ tự".to_string());

        html! {
            <li class="dose-row">
                <span class="dose-index">{ format!("#{}", entry.global_index) }</span>
                <span class="healthbook-label">{ entry.record.vaccination_type_name.clone() }</span>
                <span class="dose-meta">{ dose_number }</span>
                <span class="healthbook-date">{ format_timestamp(entry.record.administered_date) }</span>
            </li>
        }
    }

    #[derive(Properties, PartialEq)]
    struct GrowthCardProps {
        pub growth: Option<GrowthSummary>,
        pub history: Vec<PhysicalCheckRecord>,
    }

    #[function_component(GrowthCard)]
    fn growth_card(props: &GrowthCardProps) -> Html {
        let expanded = use_state(|| false);
        let on_toggle = {
            let expanded = expanded.clone();
            Callback::from(move |_| expanded.set(!*expanded))
        };

        html! {
            <section class="healthbook-card">
                <header>
                    <h3>{"Thể chất"}</h3>
                    <span class="healthbook-count">{ props.history.len() }</span>
                </header>
                {
                    match &props.growth {
                        Some(growth) => render_growth(growth),
                        None => html! { <p class="healthbook-empty">{"Chưa có lần khám thể chất nào."}</p> },
                    }
                }
                {
                    if has_multiple(&props.history) {
                        html! {
                            <>
                                <button type="button" class="healthbook-toggle" onclick={on_toggle}>
                                    { if *expanded { "Thu gọn".to_string() } else { format!("Xem tất cả ({})", props.history.len()) } }
                                </button>
                                {
                                    if *expanded {
                                        html! {
                                            <ul class="healthbook-history">
                                                { for props.history.iter().map(render_physical_row) }
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>
        }
    }

    fn render_growth(growth: &GrowthSummary) -> Html {
        let latest = &growth.latest;
        let relative = format_relative_time(latest.check_date);

        html! {
            <div class="growth-summary">
                <div class="growth-metrics">
                    { render_metric("Chiều cao", latest.height_cm, "cm") }
                    { render_metric("Cân nặng", latest.weight_kg, "kg") }
                    { render_metric("BMI", latest.bmi, "") }
                    {
                        match growth.bmi_status {
                            Some(status) => html! {
                                <span class="bmi-pill" data-level={bmi_level(status)}>{ bmi_label(status) }</span>
                            },
                            None => html! {},
                        }
                    }
                </div>
                <span class="healthbook-date">
                    { format_timestamp(latest.check_date) }
                    { relative.map(|text| format!(" ({text})")).unwrap_or_default() }
                </span>
            </div>
        }
    }

    fn render_metric(label: &str, value: Option<f64>, unit: &str) -> Html {
        let display = value
            .map(|v| {
                if unit.is_empty() {
                    format_numeric(v)
                } else {
                    format!("{} {unit}", format_numeric(v))
                }
            })
            .unwrap_or_else(|| "--".to_string());

        html! {
            <span class="growth-metric">
                <span class="metric-label">{ label }</span>
                <span class="metric-value">{ display }</span>
            </span>
        }
    }

    fn render_physical_row(record: &PhysicalCheckRecord) -> Html {
        html! {
            <li class="check-row">
                <span class="healthbook-date">{ format_timestamp(record.check_date) }</span>
                { render_metric("Cao", record.height_cm, "cm") }
                { render_metric("Nặng", record.weight_kg, "kg") }
                { render_metric("BMI", record.bmi, "") }
            </li>
        }
    }

    #[derive(Properties, PartialEq)]
    struct VisionCardProps {
        pub history: Vec<VisionCheckRecord>,
    }

    #[function_component(VisionCard)]
    fn vision_card(props: &VisionCardProps) -> Html {
        let expanded = use_state(|| false);
        let on_toggle = {
            let expanded = expanded.clone();
            Callback::from(move |_| expanded.set(!*expanded))
        };

        html! {
            <section class="healthbook-card">
                <header>
                    <h3>{"Thị lực"}</h3>
                    <span class="healthbook-count">{ props.history.len() }</span>
                </header>
                {
                    match props.history.first() {
                        Some(latest) => render_vision_row(latest),
                        None => html! { <p class="healthbook-empty">{"Chưa có lần khám thị lực nào."}</p> },
                    }
                }
                {
                    if has_multiple(&props.history) {
                        html! {
                            <>
                                <button type="button" class="healthbook-toggle" onclick={on_toggle}>
                                    { if *expanded { "Thu gọn".to_string() } else { format!("Xem tất cả ({})", props.history.len()) } }
                                </button>
                                {
                                    if *expanded {
                                        html! {
                                            <ul class="healthbook-history">
                                                { for props.history.iter().map(|record| html! {
                                                    <li>{ render_vision_row(record) }</li>
                                                }) }
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>
        }
    }

    fn render_vision_row(record: &VisionCheckRecord) -> Html {
        let left = format_vision_score(record.left_eye).unwrap_or_else(|| "--".to_string());
        let right = format_vision_score(record.right_eye).unwrap_or_else(|| "--".to_string());

        html! {
            <div class="check-row">
                <span class="healthbook-date">{ format_timestamp(record.check_date) }</span>
                <span class="metric-value">{ format!("Mắt trái: {left}") }</span>
                <span class="metric-value">{ format!("Mắt phải: {right}") }</span>
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    struct HearingCardProps {
        pub history: Vec<HearingCheckRecord>,
    }

    #[function_component(HearingCard)]
    fn hearing_card(props: &HearingCardProps) -> Html {
        let expanded = use_state(|| false);
        let on_toggle = {
            let expanded = expanded.clone();
            Callback::from(move |_| expanded.set(!*expanded))
        };

        html! {
            <section class="healthbook-card">
                <header>
                    <h3>{"Thính lực"}</h3>
                    <span class="healthbook-count">{ props.history.len() }</span>
                </header>
                {
                    match props.history.first() {
                        Some(latest) => render_hearing_row(latest),
                        None => html! { <p class="healthbook-empty">{"Chưa có lần khám thính lực nào."}</p> },
                    }
                }
                {
                    if has_multiple(&props.history) {
                        html! {
                            <>
                                <button type="button" class="healthbook-toggle" onclick={on_toggle}>
                                    { if *expanded { "Thu gọn".to_string() } else { format!("Xem tất cả ({})", props.history.len()) } }
                                </button>
                                {
                                    if *expanded {
                                        html! {
                                            <ul class="healthbook-history">
                                                { for props.history.iter().map(|record| html! {
                                                    <li>{ render_hearing_row(record) }</li>
                                                }) }
                                            </ul>
                                        }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </section>
        }
    }

    fn render_hearing_row(record: &HearingCheckRecord) -> Html {
        html! {
            <div class="check-row">
                <span class="healthbook-date">{ format_timestamp(record.check_date) }</span>
                <span class="metric-value">{ format!("Tai trái: {}", hearing_text(record.left_ear.as_deref())) }</span>
                <span class="metric-value">{ format!("Tai phải: {}", hearing_text(record.right_ear.as_deref())) }</span>
            </div>
        }
    }

    fn hearing_text(code: Option<&str>) -> String {
        match code.and_then(HearingBand::from_code) {
            Some(band) => format!("{} ({})", hearing_label(band), band.decibel_range()),
            None => "--".to_string(),
        }
    }

    fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
        format_date(timestamp).unwrap_or_else(|| "--".to_string())
    }

    fn format_relative_time(timestamp: Option<DateTime<Utc>>) -> Option<String> {
        let timestamp = timestamp?;
        let delta = Utc::now().signed_duration_since(timestamp);
        if delta.num_seconds() < 0 {
            return None;
        }

        let days = delta.num_days();
        if days >= 365 {
            Some(format!("cách đây {} năm", days / 365))
        } else if days >= 30 {
            Some(format!("cách đây {} tháng", days / 30))
        } else if days >= 1 {
            Some(format!("cách đây {days} ngày"))
        } else {
            Some("hôm nay".to_string())
        }
    }

    fn category_title(category: ConditionCategory) -> &'static str {
        match category {
            ConditionCategory::ChronicDisease => "Bệnh mãn tính",
            ConditionCategory::Allergy => "Dị ứng",
            ConditionCategory::MedicalHistory => "Tiền sử bệnh",
        }
    }

    fn severity_label(severity: Option<Severity>) -> &'static str {
        match severity {
            Some(Severity::Severe) => "Nghiêm trọng",
            Some(Severity::Moderate) => "Trung bình",
            Some(Severity::Mild) => "Nhẹ",
            None => "Chưa đánh giá",
        }
    }

    fn severity_level(severity: Option<Severity>) -> &'static str {
        match severity {
            Some(Severity::Severe) => "severe",
            Some(Severity::Moderate) => "moderate",
            Some(Severity::Mild) => "mild",
            None => "unknown",
        }
    }

    fn bmi_label(status: BmiStatus) -> &'static str {
        match status {
            BmiStatus::Underweight => "Thiếu cân",
            BmiStatus::Normal => "Bình thường",
            BmiStatus::Overweight => "Thừa cân",
            BmiStatus::Obese => "Béo phì",
        }
    }

    fn bmi_level(status: BmiStatus) -> &'static str {
        match status {
            BmiStatus::Underweight => "underweight",
            BmiStatus::Normal => "normal",
            BmiStatus::Overweight => "overweight",
            BmiStatus::Obese => "obese",
        }
    }

    fn hearing_label(band: HearingBand) -> &'static str {
        match band {
            HearingBand::Normal => "Bình thường",
            HearingBand::Mild => "Giảm nhẹ",
            HearingBand::Moderate => "Giảm trung bình",
            HearingBand::Severe => "Giảm nặng",
        }
    }

    #[wasm_bindgen]
    pub fn mount_profile_view(selector: &str, snapshot: JsValue) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let snapshot: HealthProfileSnapshot = from_value(snapshot)?;

        yew::Renderer::<ProfileView>::with_root_and_props(target, ProfileViewProps { snapshot })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_profile_view;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_profile_view(_: &str, _: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "healthbook-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
