use crate::player::settings::{LoggingLevel, PlayerSettings, PlayerSettingsParsed};

fn parse(json: &str) -> PlayerSettingsParsed {
	serde_json::from_str::<PlayerSettings>(json).unwrap().into()
}

#[test]
fn test_defaults() {
	let settings = parse("{}");

	assert_eq!(settings, PlayerSettingsParsed::default());
	assert_eq!(settings.seek_step_seconds, 5.0);
	assert_eq!(settings.volume_storage_key, "video-player-volume");
	assert!(settings.keyboard_shortcuts);
	assert_eq!(settings.logging_level(), tracing::Level::INFO);
}

#[test]
fn test_overrides() {
	let settings = parse(
		r#"{
			"seek_step_seconds": 10,
			"volume_storage_key": "my-volume",
			"keyboard_shortcuts": false,
			"logging_level": "debug"
		}"#,
	);

	assert_eq!(settings.seek_step_seconds, 10.0);
	assert_eq!(settings.volume_storage_key, "my-volume");
	assert!(!settings.keyboard_shortcuts);
	assert_eq!(settings.logging_level, LoggingLevel::Debug);
	assert_eq!(settings.logging_level(), tracing::Level::DEBUG);
}

#[test]
fn test_invalid_seek_step_falls_back() {
	assert_eq!(parse(r#"{ "seek_step_seconds": 0 }"#).seek_step_seconds, 5.0);
	assert_eq!(parse(r#"{ "seek_step_seconds": -2.5 }"#).seek_step_seconds, 5.0);
}

#[test]
fn test_unknown_logging_level_is_rejected() {
	assert!(serde_json::from_str::<PlayerSettings>(r#"{ "logging_level": "verbose" }"#).is_err());
}
