#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-healthbook-ui]";

/// CSS mặc định của component, kèm các design token dễ ghi đè.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --healthbook-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --healthbook-bg: #ffffff;
  --healthbook-card-bg: #ffffff;
  --healthbook-card-border: rgba(148, 163, 184, 0.28);
  --healthbook-radius: 16px;
  --healthbook-text: #1f2933;
  --healthbook-muted: #52606d;
  --healthbook-heading: #11181c;
  --healthbook-surface: #f8fafc;
  --healthbook-accent: #2563eb;
  --healthbook-severity-severe: #b42318;
  --healthbook-severity-severe-bg: rgba(180, 35, 24, 0.1);
  --healthbook-severity-moderate: #dc6803;
  --healthbook-severity-moderate-bg: rgba(220, 104, 3, 0.12);
  --healthbook-severity-mild: #067647;
  --healthbook-severity-mild-bg: rgba(6, 118, 71, 0.12);
  --healthbook-severity-unknown: #475467;
  --healthbook-severity-unknown-bg: rgba(71, 84, 103, 0.12);
  --healthbook-bmi-underweight: #0b5394;
  --healthbook-bmi-underweight-bg: rgba(11, 83, 148, 0.12);
  --healthbook-bmi-normal: #067647;
  --healthbook-bmi-normal-bg: rgba(6, 118, 71, 0.12);
  --healthbook-bmi-overweight: #dc6803;
  --healthbook-bmi-overweight-bg: rgba(220, 104, 3, 0.12);
  --healthbook-bmi-obese: #b42318;
  --healthbook-bmi-obese-bg: rgba(180, 35, 24, 0.1);
}

.healthbook-root {
  font-family: var(--healthbook-font-family);
  background: var(--healthbook-bg);
  color: var(--healthbook-text);
  border-radius: var(--healthbook-radius);
  display: flex;
  flex-direction: column;
  gap: 22px;
  padding: 28px;
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.1);
}

.healthbook-header {
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.healthbook-eyebrow {
  font-size: 0.74rem;
  font-weight: 700;
  letter-spacing: 0.12em;
  text-transform: uppercase;
  color: var(--healthbook-muted);
}

.healthbook-header h2 {
  margin: 0;
  font-size: 1.45rem;
  color: var(--healthbook-heading);
}

.healthbook-subtitle {
  margin: 0;
  font-size: 0.9rem;
  color: var(--healthbook-muted);
}

.healthbook-grid {
  display: grid;
  gap: 18px;
  grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
}

.healthbook-card {
  background: var(--healthbook-card-bg);
  border: 1px solid var(--healthbook-card-border);
  border-radius: calc(var(--healthbook-radius) - 6px);
  padding: 16px 18px;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.healthbook-card header {
  display: flex;
  align-items: center;
  justify-content: space-between;
}

.healthbook-card h3 {
  margin: 0;
  font-size: 1rem;
  color: var(--healthbook-heading);
}

.healthbook-count {
  font-size: 0.78rem;
  font-weight: 700;
  color: var(--healthbook-muted);
  background: var(--healthbook-surface);
  border-radius: 999px;
  padding: 2px 10px;
  font-variant-numeric: tabular-nums;
}

.healthbook-empty {
  margin: 0;
  font-size: 0.85rem;
  color: var(--healthbook-muted);
  font-style: italic;
}

.healthbook-condition {
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.healthbook-condition-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 10px;
}

.healthbook-label {
  font-weight: 600;
  font-size: 0.92rem;
}

.healthbook-date {
  font-size: 0.78rem;
  color: var(--healthbook-muted);
  font-variant-numeric: tabular-nums;
}

.healthbook-detail {
  margin: 0;
  font-size: 0.84rem;
  color: var(--healthbook-muted);
  line-height: 1.45;
}

.severity-badge {
  font-size: 0.72rem;
  font-weight: 700;
  border-radius: 999px;
  padding: 2px 10px;
  white-space: nowrap;
}

.severity-badge[data-level="severe"] {
  color: var(--healthbook-severity-severe);
  background: var(--healthbook-severity-severe-bg);
}

.severity-badge[data-level="moderate"] {
  color: var(--healthbook-severity-moderate);
  background: var(--healthbook-severity-moderate-bg);
}

.severity-badge[data-level="mild"] {
  color: var(--healthbook-severity-mild);
  background: var(--healthbook-severity-mild-bg);
}

.severity-badge[data-level="unknown"] {
  color: var(--healthbook-severity-unknown);
  background: var(--healthbook-severity-unknown-bg);
}

.healthbook-toggle {
  align-self: flex-start;
  border: 1px solid var(--healthbook-card-border);
  border-radius: 999px;
  background: var(--healthbook-surface);
  color: var(--healthbook-accent);
  font-size: 0.8rem;
  font-weight: 600;
  padding: 4px 14px;
  cursor: pointer;
}

.healthbook-toggle:hover {
  border-color: var(--healthbook-accent);
}

.healthbook-history {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 10px;
  border-top: 1px dashed var(--healthbook-card-border);
  padding-top: 10px;
}

.vaccine-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 8px;
}

.vaccine-item {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  gap: 10px;
}

.vaccine-doses {
  font-size: 0.8rem;
  font-weight: 700;
  color: var(--healthbook-accent);
  white-space: nowrap;
}

.dose-row {
  display: flex;
  align-items: baseline;
  gap: 10px;
}

.dose-index {
  font-size: 0.76rem;
  font-weight: 700;
  color: var(--healthbook-muted);
  font-variant-numeric: tabular-nums;
}

.dose-meta {
  font-size: 0.8rem;
  color: var(--healthbook-muted);
}

.growth-summary {
  display: flex;
  flex-direction: column;
  gap: 8px;
}

.growth-metrics {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 12px;
}

.growth-metric {
  display: flex;
  flex-direction: column;
  gap: 2px;
}

.metric-label {
  font-size: 0.72rem;
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--healthbook-muted);
}

.metric-value {
  font-size: 0.92rem;
  font-weight: 600;
  font-variant-numeric: tabular-nums;
}

.bmi-pill {
  font-size: 0.76rem;
  font-weight: 700;
  border-radius: 999px;
  padding: 3px 12px;
  white-space: nowrap;
}

.bmi-pill[data-level="underweight"] {
  color: var(--healthbook-bmi-underweight);
  background: var(--healthbook-bmi-underweight-bg);
}

.bmi-pill[data-level="normal"] {
  color: var(--healthbook-bmi-normal);
  background: var(--healthbook-bmi-normal-bg);
}

.bmi-pill[data-level="overweight"] {
  color: var(--healthbook-bmi-overweight);
  background: var(--healthbook-bmi-overweight-bg);
}

.bmi-pill[data-level="obese"] {
  color: var(--healthbook-bmi-obese);
  background: var(--healthbook-bmi-obese-bg);
}

.check-row {
  display: flex;
  flex-wrap: wrap;
  align-items: baseline;
  gap: 12px;
}

@media (max-width: 640px) {
  .healthbook-root {
    padding: 18px;
  }

  .healthbook-grid {
    grid-template-columns: 1fr;
  }

  .vaccine-item,
  .dose-row,
  .check-row {
    flex-direction: column;
    align-items: flex-start;
    gap: 4px;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-healthbook-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
