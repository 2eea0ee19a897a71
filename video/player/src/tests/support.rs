use std::cell::{Cell, RefCell};

use video_player_types::{PlayerConfig, QualitySource, TimestampConfig};

use crate::player::controller::{FullscreenHost, Transport};
use crate::player::media::MediaElement;

/// An in-memory media element. Loading a source rewinds it and pauses it the
/// way a browser does.
#[derive(Debug)]
pub struct FakeMedia {
	pub current_time: Cell<f64>,
	pub duration: Cell<f64>,
	pub paused: Cell<bool>,
	pub volume: Cell<f64>,
	pub playback_rate: Cell<f64>,
	pub src: RefCell<String>,
	pub play_calls: Cell<usize>,
}

impl FakeMedia {
	pub fn new(duration: f64) -> Self {
		Self {
			current_time: Cell::new(0.0),
			duration: Cell::new(duration),
			paused: Cell::new(true),
			volume: Cell::new(1.0),
			playback_rate: Cell::new(1.0),
			src: RefCell::new(String::new()),
			play_calls: Cell::new(0),
		}
	}
}

impl MediaElement for FakeMedia {
	fn current_time(&self) -> f64 {
		self.current_time.get()
	}

	fn set_current_time(&self, time: f64) {
		self.current_time.set(time);
	}

	fn duration(&self) -> f64 {
		self.duration.get()
	}

	fn paused(&self) -> bool {
		self.paused.get()
	}

	fn play(&self) {
		self.play_calls.set(self.play_calls.get() + 1);
		self.paused.set(false);
	}

	fn pause(&self) {
		self.paused.set(true);
	}

	fn set_volume(&self, volume: f64) {
		self.volume.set(volume);
	}

	fn set_playback_rate(&self, rate: f64) {
		self.playback_rate.set(rate);
	}

	fn set_src(&self, src: &str) {
		*self.src.borrow_mut() = src.to_string();
		self.current_time.set(0.0);
		self.paused.set(true);
		self.playback_rate.set(1.0);
	}
}

/// Records what the overlay asked of playback.
#[derive(Debug, Default)]
pub struct FakeTransport {
	pub playing: bool,
	pub pauses: usize,
	pub resumes: usize,
}

impl FakeTransport {
	pub fn playing() -> Self {
		Self {
			playing: true,
			..Default::default()
		}
	}
}

impl Transport for FakeTransport {
	fn pause(&mut self) {
		self.playing = false;
		self.pauses += 1;
	}

	fn resume(&mut self) {
		self.playing = true;
		self.resumes += 1;
	}
}

#[derive(Debug, Default)]
pub struct FakeFullscreen {
	pub fullscreen: Cell<bool>,
	pub requests: Cell<usize>,
	pub exits: Cell<usize>,
}

impl FullscreenHost for FakeFullscreen {
	fn is_fullscreen(&self) -> bool {
		self.fullscreen.get()
	}

	fn request_fullscreen(&self) {
		self.requests.set(self.requests.get() + 1);
	}

	fn exit_fullscreen(&self) {
		self.exits.set(self.exits.get() + 1);
	}
}

pub fn timestamp(time: f64, label: &str, countdown_time: Option<u32>) -> TimestampConfig {
	TimestampConfig {
		time,
		label: label.to_string(),
		countdown_time,
	}
}

pub fn config(timestamps: Vec<TimestampConfig>) -> PlayerConfig {
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
		timestamps,
	}
}
