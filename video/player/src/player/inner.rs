use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::mpsc;
use video_player_types::PlayerConfig;

use super::controller::PlaybackState;
use super::events::EventManager;
use super::overlay::{PopupState, Timestamp};
use super::runner::events::WidgetEvent;
use super::settings::PlayerSettingsParsed;

/// State shared between the javascript facing [`super::VideoPlayer`] and its runner.
///
/// The runner is the only writer of the snapshot. The facade only reads it and
/// talks to the runner through `commands`.
#[derive(Clone)]
pub struct PlayerInnerHolder(
	Rc<RefCell<PlayerInner>>,
	Rc<Cell<Option<&'static std::panic::Location<'static>>>>,
);

impl PlayerInnerHolder {
	pub fn new(inner: PlayerInner) -> Self {
		Self(Rc::new(RefCell::new(inner)), Rc::new(Cell::new(None)))
	}

	#[track_caller]
	pub fn borrow(&self) -> std::cell::Ref<PlayerInner> {
		let borrow = self
			.0
			.try_borrow()
			.map_err(|err| {
				tracing::error!(
					"Failed to borrow player inner\nPrevious borrow location: {:?}\nNew Location: {:?}",
					self.1.get(),
					std::panic::Location::caller()
				);
				err
			})
			.expect("failed to borrow player inner");

		self.1.set(Some(std::panic::Location::caller()));

		borrow
	}

	#[track_caller]
	pub fn borrow_mut(&self) -> std::cell::RefMut<PlayerInner> {
		let borrow = self
			.0
			.try_borrow_mut()
			.map_err(|err| {
				tracing::error!(
					"Failed to borrow player inner\nPrevious borrow location: {:?}\nNew Location: {:?}",
					self.1.get(),
					std::panic::Location::caller()
				);
				err
			})
			.expect("failed to borrow player inner");

		self.1.set(Some(std::panic::Location::caller()));

		borrow
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub playback: PlaybackState,
	pub popup: PopupState,
	pub timestamps: Vec<Timestamp>,
}

pub struct PlayerInner {
	pub config: PlayerConfig,
	pub settings: PlayerSettingsParsed,
	pub events: EventManager,
	/// Last state published by the runner, `None` until the first attach.
	pub snapshot: Option<Snapshot>,
	/// Sender of the mounted runner, `None` while detached.
	pub commands: Option<mpsc::Sender<WidgetEvent>>,
}

impl PlayerInner {
	pub fn new(config: PlayerConfig, settings: PlayerSettingsParsed) -> Self {
		Self {
			config,
			settings,
			events: EventManager::new(),
			snapshot: None,
			commands: None,
		}
	}
}
