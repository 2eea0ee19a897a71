use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

#[derive(
	tsify::Tsify, Debug, Default, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
	#[default]
	Info,
	Trace,
	Debug,
	Warn,
	Error,
}

#[derive(tsify::Tsify, Debug, Default, serde::Deserialize)]
/// Settings to configure the player.
pub struct PlayerSettings {
	/// Seconds seeked by the arrow keys and the rewind/forward buttons.
	/// Defaults to 5.
	#[tsify(optional)]
	#[serde(default)]
	pub seek_step_seconds: Option<f64>,

	/// The local storage key the volume is persisted under.
	/// Defaults to "video-player-volume"
	#[tsify(optional)]
	#[serde(default)]
	pub volume_storage_key: Option<String>,

	/// Listen to the arrow keys on the whole document, regardless of focus.
	/// Defaults to true.
	#[tsify(optional)]
	#[serde(default)]
	pub keyboard_shortcuts: Option<bool>,

	/// The logging level to use for the player.
	/// Defaults to "info"
	#[tsify(optional)]
	#[serde(default)]
	pub logging_level: Option<LoggingLevel>,
}

macro_rules! if_set {
    ($value:ident => $target:ident { $($i:ident),* }) => {
        {
            $(
                if let Some($i) = $value.$i {
                    $target.$i = $i;
                }
            )*
        }
    };
}

impl From<PlayerSettings> for PlayerSettingsParsed {
	fn from(value: PlayerSettings) -> Self {
		let mut target = Self::default();

		if_set!(value => target {
			seek_step_seconds,
			volume_storage_key,
			keyboard_shortcuts,
			logging_level
		});

		if !target.seek_step_seconds.is_finite() || target.seek_step_seconds <= 0.0 {
			tracing::warn!("ignoring seek step of {}", target.seek_step_seconds);
			target.seek_step_seconds = Self::default().seek_step_seconds;
		}

		target
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettingsParsed {
	pub seek_step_seconds: f64,
	pub volume_storage_key: String,
	pub keyboard_shortcuts: bool,
	pub logging_level: LoggingLevel,
}

impl Default for PlayerSettingsParsed {
	fn default() -> Self {
		Self {
			seek_step_seconds: 5.0,
			volume_storage_key: "video-player-volume".to_string(),
			keyboard_shortcuts: true,
			logging_level: LoggingLevel::Info,
		}
	}
}

impl PlayerSettingsParsed {
	pub fn logging_level(&self) -> tracing::Level {
		match self.logging_level {
			LoggingLevel::Info => tracing::Level::INFO,
			LoggingLevel::Trace => tracing::Level::TRACE,
			LoggingLevel::Debug => tracing::Level::DEBUG,
			LoggingLevel::Warn => tracing::Level::WARN,
			LoggingLevel::Error => tracing::Level::ERROR,
		}
	}
}

/// Deserializes a value handed to us by javascript, reporting the path of the
/// offending field on failure.
pub fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
	let deserializer = serde_wasm_bindgen::Deserializer::from(value);

	serde_path_to_error::deserialize(deserializer).map_err(|err| {
		JsValue::from_str(&format!("failed to deserialize {what} ({}): {}", err.path(), err.inner()))
	})
}

/// Like [`from_js`], but `undefined` and `null` give the default value.
pub fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue, what: &str) -> Result<T, JsValue> {
	if value.is_undefined() || value.is_null() {
		return Ok(T::default());
	}

	from_js(value, what)
}
