use std::collections::HashSet;

use url::Url;

/// The configuration a player is mounted with. It is immutable for the
/// lifetime of the player.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerConfig {
	/// The source loaded on mount.
	pub src: String,
	/// The selectable qualities, the first one is selected on mount.
	pub sources: Vec<QualitySource>,
	#[serde(default)]
	pub timestamps: Vec<TimestampConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QualitySource {
	pub quality: String,
	pub src: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimestampConfig {
	/// Seconds from the start of the media.
	pub time: f64,
	pub label: String,
	/// Seconds before playback resumes on its own once the countdown is started.
	/// `None` or `0` means the popup has no countdown. Fractions of a second
	/// are floored.
	#[serde(
		default,
		alias = "countdownTime",
		deserialize_with = "deserialize_countdown",
		skip_serializing_if = "Option::is_none"
	)]
	pub countdown_time: Option<u32>,
}

/// Whole seconds from any non negative number, javascript has no integers.
fn deserialize_countdown<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
	let Some(seconds) = <Option<f64> as serde::Deserialize>::deserialize(deserializer)? else {
		return Ok(None);
	};

	if !seconds.is_finite() || seconds < 0.0 {
		return Err(serde::de::Error::custom(format!("invalid countdown: {seconds}")));
	}

	// `as` saturates at u32::MAX.
	Ok(Some(seconds.floor() as u32))
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	#[error("at least one quality source is required")]
	NoSources,
	#[error("quality {0:?} is configured more than once")]
	DuplicateQuality(String),
	#[error("timestamp {index} has an invalid time: {time}")]
	InvalidTimestamp { index: usize, time: f64 },
	#[error("invalid source url {src:?}: {err}")]
	InvalidUrl { src: String, err: url::ParseError },
}

impl PlayerConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.sources.is_empty() {
			return Err(ConfigError::NoSources);
		}

		let mut seen = HashSet::new();
		for source in &self.sources {
			if !seen.insert(source.quality.as_str()) {
				return Err(ConfigError::DuplicateQuality(source.quality.clone()));
			}
		}

		for (index, timestamp) in self.timestamps.iter().enumerate() {
			if !timestamp.time.is_finite() || timestamp.time < 0.0 {
				return Err(ConfigError::InvalidTimestamp {
					index,
					time: timestamp.time,
				});
			}
		}

		Ok(())
	}

	/// The quality selected on mount.
	pub fn default_quality(&self) -> Option<&QualitySource> {
		self.sources.first()
	}

	pub fn find_source(&self, quality: &str) -> Option<&QualitySource> {
		self.sources.iter().find(|source| source.quality == quality)
	}

	/// Returns a copy of this config where every source is an absolute url resolved against `base`.
	pub fn resolve(&self, base: &Url) -> Result<Self, ConfigError> {
		Ok(Self {
			src: resolve_src(base, &self.src)?.to_string(),
			sources: self
				.sources
				.iter()
				.map(|source| {
					Ok(QualitySource {
						quality: source.quality.clone(),
						src: resolve_src(base, &source.src)?.to_string(),
					})
				})
				.collect::<Result<_, ConfigError>>()?,
			timestamps: self.timestamps.clone(),
		})
	}
}

impl TimestampConfig {
	/// The configured countdown, with `0` normalized to no countdown.
	pub fn countdown(&self) -> Option<u32> {
		self.countdown_time.filter(|secs| *secs > 0)
	}
}

fn resolve_src(base: &Url, src: &str) -> Result<Url, ConfigError> {
	base.join(src).map_err(|err| ConfigError::InvalidUrl {
		src: src.to_string(),
		err,
	})
}
