use tokio::sync::broadcast;
use video_player_types::PlayerConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

use self::events::EventType;
use self::inner::{PlayerInner, PlayerInnerHolder};
use self::overlay::PopupAction;
use self::runner::events::Command;
use self::runner::Runner;
use self::settings::{from_js, from_js_or_default, PlayerSettings};

pub mod controller;
pub mod display;
pub mod errors;
pub mod events;
pub mod inner;
pub mod media;
pub mod overlay;
pub mod runner;
pub mod settings;
pub mod storage;
pub mod util;
pub mod view;

pub type JsResult<T> = Result<T, JsValue>;

#[wasm_bindgen(typescript_custom_section)]
const _: &'static str = r#"
interface QualitySource {
    quality: string;
    src: string;
}

interface TimestampConfig {
    time: number;
    label: string;
    /** Seconds, fractions are floored. */
    countdown_time?: number;
}

interface PlayerConfig {
    src: string;
    sources: QualitySource[];
    timestamps?: TimestampConfig[];
}

type VideoPlayerEvents = {
    error: (evt: EventError) => void;
    timestamp: (evt: TimestampEvent) => void;
    countdown: (evt: CountdownEvent) => void;
    popupclose: (evt: PopupCloseEvent) => void;
    qualitychange: (evt: QualityChangeEvent) => void;
    volumechange: (evt: VolumeChangeEvent) => void;
    fullscreenchange: (evt: FullscreenChangeEvent) => void;
    destroyed: () => void;
};

class VideoPlayer {
    constructor(config: PlayerConfig, settings?: PlayerSettings);

    attach(container: HTMLElement): void;
    detach(): void;
    shutdown(): void;

    togglePlayPause(): void;
    seekRelative(delta: number): void;
    seekToFraction(fraction: number): void;
    setVolume(volume: number): void;
    toggleMute(): void;
    setPlaybackRate(rate: number): void;
    switchQuality(quality: string): void;
    toggleFullscreen(): void;
    popupAction(action: "start" | "stop" | "close"): void;

    on<K extends keyof VideoPlayerEvents>(event: K, f: VideoPlayerEvents[K]): void;
    once<K extends keyof VideoPlayerEvents>(event: K, f: VideoPlayerEvents[K]): void;
    off<K extends keyof VideoPlayerEvents>(event: K, f: VideoPlayerEvents[K]): void;
    removeListener<K extends keyof VideoPlayerEvents>(event: K, f: VideoPlayerEvents[K]): void;

    readonly state: PlaybackState | null;
    readonly popup: PopupState | null;
    readonly timestamps: Timestamp[];
}
"#;

#[wasm_bindgen(skip_typescript)]
pub struct VideoPlayer {
	shutdown_sender: broadcast::Sender<()>,
	inner: PlayerInnerHolder,
}

#[wasm_bindgen]
impl VideoPlayer {
	#[wasm_bindgen(constructor)]
	pub fn new(config: JsValue, settings: JsValue) -> Result<VideoPlayer, JsValue> {
		let config: PlayerConfig = from_js(config, "config")?;
		config.validate().map_err(errors::EventError::from)?;

		let settings: PlayerSettings = from_js_or_default(settings, "settings")?;

		let (shutdown_sender, _) = broadcast::channel(1);

		Ok(Self {
			shutdown_sender,
			inner: PlayerInnerHolder::new(PlayerInner::new(config, settings.into())),
		})
	}

	/// Renders the player into `container`, replacing a previous mount.
	pub fn attach(&mut self, container: HtmlElement) -> Result<(), JsValue> {
		if self.inner.borrow().commands.is_some() {
			self.shutdown();
		}

		let _guard = crate::tracing_wasm::scope(self.inner.borrow().settings.logging_level());
		let runner = Runner::new(self.inner.clone(), &container, self.shutdown_sender.subscribe())?;
		spawn_local(runner.start());

		Ok(())
	}

	pub fn detach(&mut self) {
		self.shutdown();
	}

	pub fn shutdown(&self) {
		self.inner.borrow_mut().commands = None;
		self.shutdown_sender.send(()).ok();
	}

	#[wasm_bindgen(js_name = togglePlayPause)]
	pub fn toggle_play_pause(&self) {
		self.command(Command::TogglePlayPause);
	}

	#[wasm_bindgen(js_name = seekRelative)]
	pub fn seek_relative(&self, delta: f64) {
		self.command(Command::SeekRelative(delta));
	}

	#[wasm_bindgen(js_name = seekToFraction)]
	pub fn seek_to_fraction(&self, fraction: f64) {
		self.command(Command::SeekToFraction(fraction));
	}

	#[wasm_bindgen(js_name = setVolume)]
	pub fn set_volume(&self, volume: f64) {
		self.command(Command::SetVolume(volume));
	}

	#[wasm_bindgen(js_name = toggleMute)]
	pub fn toggle_mute(&self) {
		self.command(Command::ToggleMute);
	}

	#[wasm_bindgen(js_name = setPlaybackRate)]
	pub fn set_playback_rate(&self, rate: f64) {
		self.command(Command::SetPlaybackRate(rate));
	}

	#[wasm_bindgen(js_name = switchQuality)]
	pub fn switch_quality(&self, quality: String) {
		self.command(Command::SwitchQuality(quality));
	}

	#[wasm_bindgen(js_name = toggleFullscreen)]
	pub fn toggle_fullscreen(&self) {
		self.command(Command::ToggleFullscreen);
	}

	#[wasm_bindgen(js_name = popupAction)]
	pub fn popup_action(&self, action: &str) -> Result<(), JsValue> {
		let action = action
			.parse::<PopupAction>()
			.map_err(|_| JsValue::from_str(&format!("unknown popup action: {action}")))?;

		self.command(Command::Popup(action));

		Ok(())
	}

	/// The last published playback state, `null` before the first attach.
	#[wasm_bindgen(getter = state)]
	pub fn state(&self) -> Result<JsValue, JsValue> {
		match self.inner.borrow().snapshot.as_ref() {
			Some(snapshot) => Ok(serde_wasm_bindgen::to_value(&snapshot.playback)?),
			None => Ok(JsValue::NULL),
		}
	}

	#[wasm_bindgen(getter = popup)]
	pub fn popup(&self) -> Result<JsValue, JsValue> {
		match self.inner.borrow().snapshot.as_ref() {
			Some(snapshot) => Ok(serde_wasm_bindgen::to_value(&snapshot.popup)?),
			None => Ok(JsValue::NULL),
		}
	}

	#[wasm_bindgen(getter = timestamps)]
	pub fn timestamps(&self) -> Result<JsValue, JsValue> {
		let inner = self.inner.borrow();
		match inner.snapshot.as_ref() {
			Some(snapshot) => Ok(serde_wasm_bindgen::to_value(&snapshot.timestamps)?),
			None => {
				let timestamps = inner
					.config
					.timestamps
					.iter()
					.map(overlay::Timestamp::from)
					.collect::<Vec<_>>();
				Ok(serde_wasm_bindgen::to_value(&timestamps)?)
			}
		}
	}

	#[wasm_bindgen(js_name = on)]
	pub fn on(&mut self, event: &str, f: js_sys::Function) -> Result<(), JsValue> {
		let event = parse_event(event)?;
		self.inner.borrow_mut().events.add_event_listener(event, f, false);
		Ok(())
	}

	#[wasm_bindgen(js_name = once)]
	pub fn once(&mut self, event: &str, f: js_sys::Function) -> Result<(), JsValue> {
		let event = parse_event(event)?;
		self.inner.borrow_mut().events.add_event_listener(event, f, true);
		Ok(())
	}

	#[wasm_bindgen(js_name = off)]
	pub fn off(&mut self, event: &str, f: JsValue) -> Result<(), JsValue> {
		let event = parse_event(event)?;
		self.inner.borrow_mut().events.remove_event_listener(event, &f);
		Ok(())
	}

	#[wasm_bindgen(js_name = removeListener)]
	pub fn remove_listener(&mut self, event: &str, f: JsValue) -> Result<(), JsValue> {
		self.off(event, f)
	}
}

impl VideoPlayer {
	fn command(&self, command: Command) {
		let inner = self.inner.borrow();
		let Some(tx) = inner.commands.as_ref() else {
			tracing::trace!("player is not attached, ignoring {:?}", command);
			return;
		};

		if tx.try_send(command.into()).is_err() {
			tracing::warn!("player event queue is full, dropping command");
		}
	}
}

impl Drop for VideoPlayer {
	fn drop(&mut self) {
		self.shutdown();
	}
}

fn parse_event(event: &str) -> Result<EventType, JsValue> {
	event
		.parse()
		.map_err(|_| JsValue::from_str(&format!("unknown event: {event}")))
}
