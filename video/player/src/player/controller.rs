use video_player_types::PlayerConfig;

use super::display::{known_duration, progress_percent};
use super::media::MediaElement;
use super::storage::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackRate {
	Half,
	Normal,
	OneAndHalf,
	Double,
}

impl PlaybackRate {
	pub const ALL: [Self; 4] = [Self::Half, Self::Normal, Self::OneAndHalf, Self::Double];

	pub fn from_f64(rate: f64) -> Option<Self> {
		Self::ALL.into_iter().find(|r| r.as_f64() == rate)
	}

	pub const fn as_f64(self) -> f64 {
		match self {
			Self::Half => 0.5,
			Self::Normal => 1.0,
			Self::OneAndHalf => 1.5,
			Self::Double => 2.0,
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			Self::Half => "0.5x",
			Self::Normal => "1x",
			Self::OneAndHalf => "1.5x",
			Self::Double => "2x",
		}
	}
}

/// Everything the controls render, derived from the media element.
#[derive(Debug, Clone, PartialEq, serde::Serialize, tsify::Tsify)]
pub struct PlaybackState {
	pub src: String,
	pub quality: String,
	pub is_playing: bool,
	/// 0 to 100
	pub progress: f64,
	pub current_time: f64,
	/// `None` until the media metadata is loaded.
	pub duration: Option<f64>,
	pub volume: f64,
	pub playback_rate: f64,
	pub is_fullscreen: bool,
	/// `volume > 0`
	pub sound: bool,
}

/// The pause/resume side of the controller, used by the timestamp overlay.
pub trait Transport {
	fn pause(&mut self);
	fn resume(&mut self);
}

/// Where fullscreen is requested. The controller never assumes a request
/// succeeded, the flag only changes through [`PlaybackController::set_fullscreen`].
pub trait FullscreenHost {
	fn is_fullscreen(&self) -> bool;
	fn request_fullscreen(&self);
	fn exit_fullscreen(&self);
}

/// Owns the media element and keeps [`PlaybackState`] in sync with it.
///
/// Every command is a no-op while no element is bound.
pub struct PlaybackController<M, S> {
	element: Option<M>,
	store: S,
	volume_key: String,
	config: PlayerConfig,
	state: PlaybackState,
}

impl<M: MediaElement, S: SettingsStore> PlaybackController<M, S> {
	pub fn new(config: &PlayerConfig, store: S, volume_key: impl Into<String>) -> Self {
		Self {
			element: None,
			store,
			volume_key: volume_key.into(),
			config: config.clone(),
			state: PlaybackState {
				src: config.src.clone(),
				quality: config.default_quality().map(|s| s.quality.clone()).unwrap_or_default(),
				is_playing: false,
				progress: 0.0,
				current_time: 0.0,
				duration: None,
				volume: 1.0,
				playback_rate: PlaybackRate::Normal.as_f64(),
				is_fullscreen: false,
				sound: true,
			},
		}
	}

	/// Binds the element and loads the current source into it.
	pub fn bind(&mut self, element: M) {
		element.set_src(&self.state.src);
		element.set_volume(self.state.volume);
		element.set_playback_rate(self.state.playback_rate);
		self.element = Some(element);
		self.sync_paused();
		self.sync_time();
	}

	pub fn unbind(&mut self) -> Option<M> {
		self.state.is_playing = false;
		self.element.take()
	}

	pub fn state(&self) -> &PlaybackState {
		&self.state
	}

	/// Applies the persisted volume, if there is a valid one.
	pub fn restore_volume(&mut self) {
		let Some(volume) = self
			.store
			.get(&self.volume_key)
			.and_then(|value| value.parse::<f64>().ok())
			.filter(|volume| (0.0..=1.0).contains(volume))
		else {
			tracing::trace!("no persisted volume under {}", self.volume_key);
			return;
		};

		tracing::debug!("restoring volume {}", volume);
		self.apply_volume(volume);
	}

	/// Re-reads time and duration, called on every time update.
	pub fn sync_time(&mut self) {
		let Some(element) = &self.element else {
			return;
		};

		let current_time = element.current_time();
		let duration = element.duration();

		self.state.current_time = if current_time.is_finite() { current_time } else { 0.0 };
		self.state.duration = known_duration(duration);
		self.state.progress = progress_percent(current_time, duration);
	}

	/// Re-reads the paused flag, called on the element's play and pause events.
	pub fn sync_paused(&mut self) {
		if let Some(element) = &self.element {
			self.state.is_playing = !element.paused();
		}
	}

	pub fn toggle_play_pause(&mut self) {
		let Some(element) = &self.element else {
			tracing::trace!("toggle play with no element bound");
			return;
		};

		if element.paused() {
			element.play();
			self.state.is_playing = true;
		} else {
			element.pause();
			self.state.is_playing = false;
		}
	}

	/// Seeks by `delta` seconds, clamped to the media bounds.
	pub fn seek_relative(&mut self, delta: f64) {
		let Some(element) = &self.element else {
			return;
		};

		let Some(duration) = known_duration(element.duration()) else {
			tracing::trace!("seek before the duration is known");
			return;
		};

		if !delta.is_finite() {
			return;
		}

		let time = (element.current_time() + delta).clamp(0.0, duration);
		element.set_current_time(time);
		self.sync_time();
	}

	/// Seeks to `fraction` of the duration, `fraction` being the horizontal
	/// position of a click inside the progress bar.
	pub fn seek_to_fraction(&mut self, fraction: f64) {
		let Some(element) = &self.element else {
			return;
		};

		let Some(duration) = known_duration(element.duration()) else {
			return;
		};

		if !fraction.is_finite() {
			return;
		}

		element.set_current_time(fraction.clamp(0.0, 1.0) * duration);
		self.sync_time();
	}

	pub fn set_volume(&mut self, volume: f64) {
		if volume.is_nan() || self.element.is_none() {
			return;
		}

		let volume = volume.clamp(0.0, 1.0);
		self.apply_volume(volume);
		self.persist_volume();
	}

	/// Muting sets the volume to 0, unmuting restores full volume.
	/// The level before muting is not remembered.
	pub fn toggle_mute(&mut self) {
		if self.element.is_none() {
			return;
		}

		let volume = if self.state.sound { 0.0 } else { 1.0 };
		self.apply_volume(volume);
		self.persist_volume();
	}

	/// Returns false for rates outside of [`PlaybackRate::ALL`].
	pub fn set_playback_rate(&mut self, rate: f64) -> bool {
		let Some(rate) = PlaybackRate::from_f64(rate) else {
			tracing::debug!("unsupported playback rate {}", rate);
			return false;
		};

		let Some(element) = &self.element else {
			return false;
		};

		element.set_playback_rate(rate.as_f64());
		self.state.playback_rate = rate.as_f64();
		true
	}

	/// Swaps the source for the one labelled `quality`, keeping the position
	/// and resuming playback if it was playing.
	pub fn switch_quality(&mut self, quality: &str) -> bool {
		let Some(source) = self.config.find_source(quality) else {
			tracing::debug!("no source for quality {}", quality);
			return false;
		};

		let Some(element) = &self.element else {
			return false;
		};

		let current_time = element.current_time();
		let was_playing = !element.paused();

		element.set_src(&source.src);
		element.set_current_time(current_time);
		// A new source resets the rate to the default.
		element.set_playback_rate(self.state.playback_rate);
		if was_playing {
			element.play();
		}

		tracing::debug!("switched to {} at {}", source.quality, current_time);

		self.state.src = source.src.clone();
		self.state.quality = source.quality.clone();
		self.state.is_playing = was_playing;
		self.sync_time();
		true
	}

	pub fn toggle_fullscreen(&self, host: &impl FullscreenHost) {
		if host.is_fullscreen() {
			host.exit_fullscreen();
		} else {
			host.request_fullscreen();
		}
	}

	/// Called from the browser's fullscreen change notification.
	pub fn set_fullscreen(&mut self, fullscreen: bool) {
		self.state.is_fullscreen = fullscreen;
	}

	fn apply_volume(&mut self, volume: f64) {
		if let Some(element) = &self.element {
			element.set_volume(volume);
		}

		self.state.volume = volume;
		self.state.sound = volume > 0.0;
	}

	fn persist_volume(&self) {
		self.store.set(&self.volume_key, &self.state.volume.to_string());
	}
}

impl<M: MediaElement, S: SettingsStore> Transport for PlaybackController<M, S> {
	fn pause(&mut self) {
		if let Some(element) = &self.element {
			element.pause();
			self.state.is_playing = false;
		}
	}

	fn resume(&mut self) {
		if let Some(element) = &self.element {
			element.play();
			self.state.is_playing = true;
		}
	}
}
