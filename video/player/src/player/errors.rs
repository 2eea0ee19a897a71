use wasm_bindgen::prelude::*;

use super::JsResult;

#[wasm_bindgen(typescript_custom_section)]
const _: &'static str = r#"
interface EventError {
    code: ErrorCode;
    message: string;
    fatal: boolean;
    source?: any;
};

enum ErrorCode {
    Config = "Config",
    Dom = "Dom",
    Media = "Media",
}
"#;

#[derive(Debug, Clone, serde::Serialize)]
pub struct EventError {
	pub code: ErrorCode,
	#[serde(with = "serde_wasm_bindgen::preserve")]
	pub source: JsValue,
	pub message: String,
	pub fatal: bool,
}

impl EventError {
	pub fn new(code: ErrorCode, message: String, fatal: bool) -> Self {
		Self {
			code,
			source: JsValue::NULL,
			message,
			fatal,
		}
	}

	pub fn with_source(mut self, source: JsValue) -> Self {
		self.source = source;
		self
	}
}

impl From<EventError> for JsValue {
	fn from(err: EventError) -> Self {
		let message = format!("{:?}: {}", err.code, err.message);
		js_sys::Error::new(&message).into()
	}
}

impl From<video_player_types::ConfigError> for EventError {
	fn from(err: video_player_types::ConfigError) -> Self {
		Self::new(ErrorCode::Config, err.to_string(), true)
	}
}

pub trait EventErrorExt<T>
where
	Self: Sized,
{
	fn dom_error(self, message: &'static str) -> Result<T, EventError> {
		self.convert_error(ErrorCode::Dom, message, true)
	}
	fn convert_error(self, code: ErrorCode, message: &'static str, fatal: bool) -> Result<T, EventError>;
}

impl<T> EventErrorExt<T> for JsResult<T> {
	fn convert_error(self, code: ErrorCode, message: &'static str, fatal: bool) -> Result<T, EventError> {
		self.map_err(|e| EventError {
			code,
			message: message.to_string(),
			fatal,
			source: e,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorCode {
	Config,
	Dom,
	Media,
}
