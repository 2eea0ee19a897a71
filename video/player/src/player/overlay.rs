//! Timestamp popups and their countdowns.
//!
//! ```text
//!                 timestamp reached
//!   Playing ─────────────────────────▶ PausedByTimestamp
//!      ▲                                   │ start
//!      │ close (any popup state)           ▼
//!      ├──────────────────────────────  CountingDown ──┐ tick (remaining > 1)
//!      │ last tick                         │    ▲      │
//!      └───────────────────────────────────┤    └──────┘
//!                                          │ stop
//!                                          ▼
//!                                     PausedByUser ── start ──▶ CountingDown
//! ```
//!
//! The overlay does not own a timer. `start` hands out a [`CountdownToken`]
//! and whoever schedules the ticks passes it back to [`TimestampOverlay::tick`].
//! Any transition that ends a countdown retires its token, so a tick that was
//! already queued when the countdown was stopped or closed does nothing.

use video_player_types::TimestampConfig;

use super::controller::Transport;

#[derive(Debug, Clone, PartialEq, serde::Serialize, tsify::Tsify)]
pub struct Timestamp {
	pub time: f64,
	pub label: String,
	pub countdown_time: Option<u32>,
	/// Set the first time playback reaches `time`, never cleared.
	pub triggered: bool,
}

impl From<&TimestampConfig> for Timestamp {
	fn from(config: &TimestampConfig) -> Self {
		Self {
			time: config.time,
			label: config.label.clone(),
			countdown_time: config.countdown(),
			triggered: false,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, tsify::Tsify)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
	Playing,
	PausedByTimestamp,
	CountingDown,
	PausedByUser,
}

/// What the popup renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, tsify::Tsify)]
pub struct PopupState {
	pub active_label: Option<String>,
	pub countdown_remaining: Option<u32>,
	pub is_counting_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
	Start,
	Stop,
	Close,
}

impl std::str::FromStr for PopupAction {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"start" => Ok(Self::Start),
			"stop" => Ok(Self::Stop),
			"close" => Ok(Self::Close),
			_ => Err(()),
		}
	}
}

/// A timestamp that just fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Triggered {
	pub index: usize,
	pub time: f64,
	pub label: String,
	pub countdown_time: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
	/// Stale token or no countdown running.
	Ignored,
	Remaining(u32),
	/// The popup is gone and playback was resumed.
	Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Shown,
	CountingDown(CountdownToken),
	Stopped,
}

#[derive(Debug, Clone)]
struct Popup {
	label: String,
	remaining: Option<u32>,
	phase: Phase,
}

#[derive(Debug, Default)]
pub struct TimestampOverlay {
	timestamps: Vec<Timestamp>,
	popup: Option<Popup>,
	next_token: u64,
}

impl TimestampOverlay {
	pub fn new(timestamps: &[TimestampConfig]) -> Self {
		Self {
			timestamps: timestamps.iter().map(Timestamp::from).collect(),
			popup: None,
			next_token: 0,
		}
	}

	pub fn timestamps(&self) -> &[Timestamp] {
		&self.timestamps
	}

	pub fn state(&self) -> OverlayState {
		match self.popup.as_ref().map(|popup| popup.phase) {
			None => OverlayState::Playing,
			Some(Phase::Shown) => OverlayState::PausedByTimestamp,
			Some(Phase::CountingDown(_)) => OverlayState::CountingDown,
			Some(Phase::Stopped) => OverlayState::PausedByUser,
		}
	}

	pub fn popup(&self) -> PopupState {
		match &self.popup {
			Some(popup) => PopupState {
				active_label: Some(popup.label.clone()),
				countdown_remaining: popup.remaining,
				is_counting_down: matches!(popup.phase, Phase::CountingDown(_)),
			},
			None => PopupState::default(),
		}
	}

	/// The token of the running countdown.
	pub fn active_token(&self) -> Option<CountdownToken> {
		match self.popup.as_ref()?.phase {
			Phase::CountingDown(token) => Some(token),
			_ => None,
		}
	}

	/// Called on every time update.
	///
	/// Fires the untriggered timestamps whose whole second matches the whole
	/// second of `current_time`. Every match is marked triggered, the popup
	/// shows the first one in configuration order. A popup that is still open,
	/// for example because playback was resumed after a stop, is replaced and
	/// its countdown token retired.
	pub fn observe(&mut self, current_time: f64, transport: &mut impl Transport) -> Option<Triggered> {
		if !current_time.is_finite() {
			return None;
		}

		let second = current_time.floor();
		let mut fired = None;
		for (index, timestamp) in self.timestamps.iter_mut().enumerate() {
			if timestamp.triggered || timestamp.time.floor() != second {
				continue;
			}

			timestamp.triggered = true;
			if fired.is_none() {
				fired = Some(Triggered {
					index,
					time: timestamp.time,
					label: timestamp.label.clone(),
					countdown_time: timestamp.countdown_time,
				});
			} else {
				tracing::debug!("timestamp {} shares a second with an earlier one, not shown", timestamp.label);
			}
		}

		let fired = fired?;

		transport.pause();
		self.popup = Some(Popup {
			label: fired.label.clone(),
			remaining: fired.countdown_time,
			phase: Phase::Shown,
		});

		tracing::debug!("timestamp {} fired at {}", fired.label, current_time);

		Some(fired)
	}

	/// Starts the countdown, replacing the running one if any.
	///
	/// Returns the token the next ticks have to carry, `None` without a popup.
	pub fn start(&mut self) -> Option<CountdownToken> {
		let token = CountdownToken(self.next_token);
		let popup = self.popup.as_mut()?;

		self.next_token += 1;
		popup.phase = Phase::CountingDown(token);

		tracing::debug!("countdown started with {:?} remaining", popup.remaining);

		Some(token)
	}

	/// One second of the countdown identified by `token` elapsed.
	///
	/// The tick that would bring the countdown to zero clears the popup and
	/// resumes playback instead. A countdown with nothing remaining finishes on
	/// its first tick.
	pub fn tick(&mut self, token: CountdownToken, transport: &mut impl Transport) -> TickOutcome {
		if self.active_token() != Some(token) {
			return TickOutcome::Ignored;
		}

		let Some(popup) = self.popup.as_mut() else {
			return TickOutcome::Ignored;
		};

		if let Some(remaining) = popup.remaining.filter(|remaining| *remaining > 1) {
			popup.remaining = Some(remaining - 1);
			return TickOutcome::Remaining(remaining - 1);
		}

		self.popup = None;
		transport.resume();

		tracing::debug!("countdown finished");

		TickOutcome::Finished
	}

	/// Stops the countdown and keeps the popup open with playback paused.
	///
	/// Returns false without a popup.
	pub fn stop(&mut self, transport: &mut impl Transport) -> bool {
		let Some(popup) = self.popup.as_mut() else {
			return false;
		};

		popup.phase = Phase::Stopped;
		popup.remaining = None;
		transport.pause();

		tracing::debug!("countdown stopped");

		true
	}

	/// Closes the popup and resumes playback.
	///
	/// Returns false without a popup.
	pub fn close(&mut self, transport: &mut impl Transport) -> bool {
		if self.popup.take().is_none() {
			return false;
		}

		transport.resume();

		tracing::debug!("popup closed");

		true
	}
}
