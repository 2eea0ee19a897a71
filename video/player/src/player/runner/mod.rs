use gloo_timers::callback::Interval;
use tokio::select;
use tokio::sync::{broadcast, mpsc};
use web_sys::{Document, EventTarget, HtmlElement, HtmlVideoElement};

use super::controller::{FullscreenHost, PlaybackController, Transport};
use super::errors::{ErrorCode, EventError};
use super::events::{
	dispatch, CountdownEvent, FullscreenChangeEvent, PopupCloseEvent, PopupCloseReason, QualityChangeEvent, TimestampEvent,
	UserEvent, VolumeChangeEvent,
};
use super::inner::{PlayerInnerHolder, Snapshot};
use super::media::{describe_js_error, VideoElement};
use super::overlay::{CountdownToken, PopupAction, TickOutcome, TimestampOverlay};
use super::settings::PlayerSettingsParsed;
use super::storage::BrowserStore;
use super::util::Holder;
use super::view::View;
use crate::tracing_wasm;

pub mod events;

use self::events::{make_control_holders, make_document_holder, make_video_element_holder, Command, WidgetEvent};

const COUNTDOWN_INTERVAL_MS: u32 = 1000;

pub struct Runner {
	inner: PlayerInnerHolder,
	settings: PlayerSettingsParsed,
	controller: PlaybackController<VideoElement, BrowserStore>,
	overlay: TimestampOverlay,

	/// The repeating countdown timer, dropping it cancels it.
	countdown: Option<Interval>,

	tx: mpsc::Sender<WidgetEvent>,
	rx: mpsc::Receiver<WidgetEvent>,
	shutdown_recv: broadcast::Receiver<()>,

	// Listener holders go before the view so they are unregistered before the
	// elements are removed.
	_video: Holder<HtmlVideoElement>,
	_document: Holder<Document>,
	_controls: Vec<Holder<EventTarget>>,
	view: View,
}

impl Runner {
	pub fn new(
		inner: PlayerInnerHolder,
		container: &HtmlElement,
		shutdown_recv: broadcast::Receiver<()>,
	) -> Result<Self, EventError> {
		let (config, settings) = {
			let inner = inner.borrow();
			(inner.config.clone(), inner.settings.clone())
		};

		let document = web_sys::window()
			.and_then(|window| window.document())
			.ok_or_else(|| EventError::new(ErrorCode::Dom, "no document available".into(), true))?;

		let config = match document.base_uri() {
			Ok(Some(base)) => match url::Url::parse(&base) {
				Ok(base) => config.resolve(&base)?,
				Err(err) => {
					tracing::warn!("document base {} is not a url: {}", base, err);
					config
				}
			},
			_ => config,
		};

		let (tx, rx) = mpsc::channel(128);

		let view = View::new(&document, container, &config, &settings)?;
		let video = make_video_element_holder(view.video.clone(), &tx)?;
		let document = make_document_holder(document, &tx, settings.keyboard_shortcuts)?;
		let controls = make_control_holders(&view, &tx)?;

		let mut controller = PlaybackController::new(&config, BrowserStore::open(), settings.volume_storage_key.clone());
		controller.bind(VideoElement::new(view.video.clone(), tx.clone()));
		controller.restore_volume();

		inner.borrow_mut().commands = Some(tx.clone());

		Ok(Self {
			overlay: TimestampOverlay::new(&config.timestamps),
			inner,
			settings,
			controller,
			countdown: None,
			tx,
			rx,
			shutdown_recv,
			_video: video,
			_document: document,
			_controls: controls,
			view,
		})
	}

	pub async fn start(mut self) {
		tracing::info!("player attached");

		self.publish();

		loop {
			let evt = select! {
				_ = self.shutdown_recv.recv() => None,
				evt = self.rx.recv() => evt,
			};

			let Some(evt) = evt else {
				break;
			};

			let _guard = tracing_wasm::scope(self.settings.logging_level());
			self.handle(evt);
			self.publish();
		}

		self.shutdown();
	}

	fn handle(&mut self, evt: WidgetEvent) {
		match evt {
			WidgetEvent::TimeUpdate => {
				self.controller.sync_time();
				let current_time = self.controller.state().current_time;
				if let Some(fired) = self.overlay.observe(current_time, &mut self.controller) {
					// A new popup never inherits a timer.
					self.cancel_countdown();
					self.emit(TimestampEvent {
						index: fired.index,
						time: fired.time,
						label: fired.label,
						countdown_time: fired.countdown_time,
					});
				}
			}
			WidgetEvent::DurationChange => self.controller.sync_time(),
			WidgetEvent::Play | WidgetEvent::Pause => self.controller.sync_paused(),
			WidgetEvent::MediaError(evt) => {
				self.emit(EventError::new(ErrorCode::Media, "video element error".into(), false).with_source(evt.into()));
			}
			WidgetEvent::PlayRejected(err) => {
				self.controller.sync_paused();
				self.emit(
					EventError::new(ErrorCode::Media, format!("playback was rejected: {}", describe_js_error(&err)), false)
						.with_source(err),
				);
			}
			WidgetEvent::KeyDown(key) => match key.as_str() {
				"ArrowLeft" => self.controller.seek_relative(-self.settings.seek_step_seconds),
				"ArrowRight" => self.controller.seek_relative(self.settings.seek_step_seconds),
				_ => {}
			},
			WidgetEvent::FullscreenChange => {
				let fullscreen = self.view.is_fullscreen();
				self.controller.set_fullscreen(fullscreen);
				self.emit(FullscreenChangeEvent { fullscreen });
			}
			WidgetEvent::CountdownTick(token) => self.tick(token),
			WidgetEvent::Command(command) => self.command(command),
		}
	}

	fn command(&mut self, command: Command) {
		tracing::trace!("command {:?}", command);

		match command {
			Command::TogglePlayPause => self.controller.toggle_play_pause(),
			Command::SeekRelative(delta) => self.controller.seek_relative(delta),
			Command::SeekToFraction(fraction) => self.controller.seek_to_fraction(fraction),
			Command::SetVolume(volume) => {
				self.controller.set_volume(volume);
				self.emit_volume();
			}
			Command::ToggleMute => {
				self.controller.toggle_mute();
				self.emit_volume();
			}
			Command::SetPlaybackRate(rate) => {
				self.controller.set_playback_rate(rate);
			}
			Command::SwitchQuality(quality) => {
				let previous_quality = self.controller.state().quality.clone();
				if self.controller.switch_quality(&quality) {
					self.emit(QualityChangeEvent {
						quality,
						previous_quality,
					});
				}
			}
			Command::ToggleFullscreen => self.controller.toggle_fullscreen(&self.view),
			Command::Popup(PopupAction::Start) => {
				if let Some(token) = self.overlay.start() {
					self.start_countdown(token);
				}
			}
			Command::Popup(PopupAction::Stop) => {
				if self.overlay.stop(&mut self.controller) {
					self.cancel_countdown();
				}
			}
			Command::Popup(PopupAction::Close) => {
				if self.overlay.close(&mut self.controller) {
					self.cancel_countdown();
					self.emit(PopupCloseEvent {
						reason: PopupCloseReason::Closed,
					});
				}
			}
		}
	}

	fn tick(&mut self, token: CountdownToken) {
		match self.overlay.tick(token, &mut self.controller) {
			TickOutcome::Ignored => tracing::trace!("ignoring stale countdown tick"),
			TickOutcome::Remaining(remaining) => self.emit(CountdownEvent { remaining }),
			TickOutcome::Finished => {
				self.cancel_countdown();
				self.emit(PopupCloseEvent {
					reason: PopupCloseReason::Finished,
				});
			}
		}
	}

	fn start_countdown(&mut self, token: CountdownToken) {
		self.cancel_countdown();

		let tx = self.tx.clone();
		self.countdown = Some(Interval::new(COUNTDOWN_INTERVAL_MS, move || {
			if tx.try_send(WidgetEvent::CountdownTick(token)).is_err() {
				tracing::warn!("failed to send countdown tick");
			}
		}));
	}

	fn cancel_countdown(&mut self) {
		if let Some(interval) = self.countdown.take() {
			interval.cancel();
		}
	}

	fn emit(&self, evt: impl Into<UserEvent>) {
		dispatch!(self.inner.borrow_mut().events.emit(evt));
	}

	fn emit_volume(&self) {
		let state = self.controller.state();
		self.emit(VolumeChangeEvent {
			volume: state.volume,
			sound: state.sound,
		});
	}

	/// Renders the current state and makes it readable from javascript.
	fn publish(&mut self) {
		let snapshot = Snapshot {
			playback: self.controller.state().clone(),
			popup: self.overlay.popup(),
			timestamps: self.overlay.timestamps().to_vec(),
		};

		self.view.render(&snapshot.playback, &snapshot.popup, &snapshot.timestamps);
		self.inner.borrow_mut().snapshot = Some(snapshot);
	}

	fn shutdown(mut self) {
		tracing::info!("player detached");

		self.cancel_countdown();
		self.controller.pause();
		self.controller.unbind();

		{
			// A newer mount may already own the player.
			let mut inner = self.inner.borrow_mut();
			if inner.commands.as_ref().is_some_and(|tx| tx.same_channel(&self.tx)) {
				inner.commands = None;
			}
		}

		self.emit(UserEvent::Destroyed);
	}
}
