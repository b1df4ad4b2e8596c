//! Bridge WASM <-> JavaScript trung lập framework.

use healthbook_core::ProfileError;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn summarize_profile(input_payload: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let payload_value = from_value::<serde_json::Value>(input_payload)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON payload: {err}")))?;

    let snapshot = healthbook_api::summarize_profile_value(&payload_value)
        .map_err(|err| JsValue::from_str(&format_profile_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

#[wasm_bindgen]
pub fn list_vaccine_types(input_payload: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let payload_value = from_value::<serde_json::Value>(input_payload)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON payload: {err}")))?;

    let types = healthbook_api::parse_vaccine_types_value(&payload_value)
        .map_err(|err| JsValue::from_str(&format_profile_error(err)))?;

    to_value(&types).map_err(|err| JsValue::from_str(&format!("Không serialize danh mục: {err}")))
}

fn format_profile_error(err: ProfileError) -> String {
    format!("Profile error: {err}")
}
