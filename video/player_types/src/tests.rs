use url::Url;

use crate::{ConfigError, PlayerConfig, QualitySource, TimestampConfig};

fn config() -> PlayerConfig {
	PlayerConfig {
		src: "/videos/Video.mp4".to_string(),
		sources: vec![
			QualitySource {
				quality: "720p".to_string(),
				src: "/videos/Video.mp4".to_string(),
			},
			QualitySource {
				quality: "1080p".to_string(),
				src: "/videos/Video_1080.mp4".to_string(),
			},
		],
		timestamps: vec![TimestampConfig {
			time: 30.0,
			label: "First Timestamp".to_string(),
			countdown_time: Some(3800),
		}],
	}
}

#[test]
fn test_parse_config() {
	let config: PlayerConfig = serde_json::from_str(
		r#"{
			"src": "/videos/Video.mp4",
			"sources": [{ "quality": "720p", "src": "/videos/Video.mp4" }],
			"timestamps": [
				{ "time": 30, "label": "First Timestamp", "countdownTime": 3800, "triggered": false },
				{ "time": 65.5, "label": "Second Timestamp" }
			]
		}"#,
	)
	.unwrap();

	assert_eq!(config.sources.len(), 1);
	assert_eq!(config.timestamps[0].countdown_time, Some(3800));
	assert_eq!(config.timestamps[1].time, 65.5);
	assert_eq!(config.timestamps[1].countdown(), None);
	assert!(config.validate().is_ok());
}

#[test]
fn test_timestamps_are_optional() {
	let config: PlayerConfig =
		serde_json::from_str(r#"{ "src": "a.mp4", "sources": [{ "quality": "480p", "src": "a.mp4" }] }"#).unwrap();

	assert!(config.timestamps.is_empty());
	assert_eq!(config.default_quality().unwrap().quality, "480p");
}

#[test]
fn test_zero_countdown_is_no_countdown() {
	let timestamp = TimestampConfig {
		time: 10.0,
		label: "zero".to_string(),
		countdown_time: Some(0),
	};

	assert_eq!(timestamp.countdown(), None);
}

#[test]
fn test_fractional_countdown_is_floored() {
	let timestamp: TimestampConfig =
		serde_json::from_str(r#"{ "time": 12.5, "label": "half", "countdownTime": 2.7 }"#).unwrap();
	assert_eq!(timestamp.countdown_time, Some(2));

	let timestamp: TimestampConfig =
		serde_json::from_str(r#"{ "time": 12.5, "label": "short", "countdown_time": 0.4 }"#).unwrap();
	assert_eq!(timestamp.countdown(), None);

	let timestamp: TimestampConfig =
		serde_json::from_str(r#"{ "time": 12.5, "label": "unset", "countdown_time": null }"#).unwrap();
	assert_eq!(timestamp.countdown_time, None);

	assert!(serde_json::from_str::<TimestampConfig>(r#"{ "time": 1, "label": "negative", "countdownTime": -3 }"#).is_err());
}

#[test]
fn test_validate_rejects_bad_configs() {
	let mut empty = config();
	empty.sources.clear();
	assert_eq!(empty.validate(), Err(ConfigError::NoSources));

	let mut duplicate = config();
	duplicate.sources[1].quality = "720p".to_string();
	assert_eq!(duplicate.validate(), Err(ConfigError::DuplicateQuality("720p".to_string())));

	let mut negative = config();
	negative.timestamps[0].time = -1.0;
	assert_eq!(
		negative.validate(),
		Err(ConfigError::InvalidTimestamp { index: 0, time: -1.0 })
	);

	let mut nan = config();
	nan.timestamps[0].time = f64::NAN;
	assert!(matches!(nan.validate(), Err(ConfigError::InvalidTimestamp { index: 0, .. })));
}

#[test]
fn test_find_source() {
	let config = config();

	assert_eq!(config.find_source("1080p").unwrap().src, "/videos/Video_1080.mp4");
	assert!(config.find_source("4k").is_none());
}

#[test]
fn test_resolve_against_page() {
	let base = Url::parse("https://example.com/watch/index.html").unwrap();
	let resolved = config().resolve(&base).unwrap();

	assert_eq!(resolved.src, "https://example.com/videos/Video.mp4");
	assert_eq!(resolved.sources[1].src, "https://example.com/videos/Video_1080.mp4");
	assert_eq!(resolved.timestamps, config().timestamps);

	let absolute = PlayerConfig {
		src: "https://cdn.example.org/a.mp4".to_string(),
		..config()
	}
	.resolve(&base)
	.unwrap();
	assert_eq!(absolute.src, "https://cdn.example.org/a.mp4");
}
