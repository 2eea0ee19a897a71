use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::errors::EventError;

pub enum UserEvent {
	Error(EventError),
	Timestamp(TimestampEvent),
	Countdown(CountdownEvent),
	PopupClose(PopupCloseEvent),
	QualityChange(QualityChangeEvent),
	VolumeChange(VolumeChangeEvent),
	FullscreenChange(FullscreenChangeEvent),
	Destroyed,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
/// Emitted when playback reaches a timestamp and its popup is shown.
pub struct TimestampEvent {
	/// Position of the timestamp in the configured list.
	pub index: usize,
	pub time: f64,
	pub label: String,
	pub countdown_time: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
/// Emitted every second while a countdown runs.
pub struct CountdownEvent {
	pub remaining: u32,
}

#[derive(Debug, Clone, Copy, serde::Serialize, tsify::Tsify)]
#[serde(rename_all = "lowercase")]
pub enum PopupCloseReason {
	/// The close button was used.
	Closed,
	/// The countdown ran out.
	Finished,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct PopupCloseEvent {
	pub reason: PopupCloseReason,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct QualityChangeEvent {
	pub quality: String,
	pub previous_quality: String,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct VolumeChangeEvent {
	pub volume: f64,
	pub sound: bool,
}

#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
pub struct FullscreenChangeEvent {
	pub fullscreen: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum EventType {
	Error,
	Timestamp,
	Countdown,
	PopupClose,
	QualityChange,
	VolumeChange,
	FullscreenChange,
	Destroyed,
}

impl std::str::FromStr for EventType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"error" => Ok(Self::Error),
			"timestamp" => Ok(Self::Timestamp),
			"countdown" => Ok(Self::Countdown),
			"popupclose" => Ok(Self::PopupClose),
			"qualitychange" => Ok(Self::QualityChange),
			"volumechange" => Ok(Self::VolumeChange),
			"fullscreenchange" => Ok(Self::FullscreenChange),
			"destroyed" => Ok(Self::Destroyed),
			_ => Err(()),
		}
	}
}

impl UserEvent {
	pub const fn ty(&self) -> EventType {
		match self {
			Self::Error(_) => EventType::Error,
			Self::Timestamp(_) => EventType::Timestamp,
			Self::Countdown(_) => EventType::Countdown,
			Self::PopupClose(_) => EventType::PopupClose,
			Self::QualityChange(_) => EventType::QualityChange,
			Self::VolumeChange(_) => EventType::VolumeChange,
			Self::FullscreenChange(_) => EventType::FullscreenChange,
			Self::Destroyed => EventType::Destroyed,
		}
	}

	fn value(&self) -> Result<Option<JsValue>, serde_wasm_bindgen::Error> {
		let value = match self {
			Self::Error(error) => serde_wasm_bindgen::to_value(error)?,
			Self::Timestamp(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::Countdown(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::PopupClose(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::QualityChange(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::VolumeChange(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::FullscreenChange(evt) => serde_wasm_bindgen::to_value(evt)?,
			Self::Destroyed => return Ok(None),
		};

		Ok(Some(value))
	}
}

macro_rules! impl_from_event {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for UserEvent {
				fn from(evt: $ty) -> Self {
					Self::$variant(evt)
				}
			}
		)*
	};
}

impl_from_event! {
	EventError => Error,
	TimestampEvent => Timestamp,
	CountdownEvent => Countdown,
	PopupCloseEvent => PopupClose,
	QualityChangeEvent => QualityChange,
	VolumeChangeEvent => VolumeChange,
	FullscreenChangeEvent => FullscreenChange,
}

#[derive(Clone)]
struct EventListener {
	f: js_sys::Function,
	used: Option<Rc<Cell<bool>>>,
}

#[derive(Default)]
pub struct EventManager {
	listeners: HashMap<EventType, Vec<EventListener>>,
	dirty: Rc<Cell<bool>>,
}

impl EventManager {
	pub fn new() -> Self {
		Self::default()
	}

	fn clean(&mut self) {
		if self.dirty.get() {
			for listeners in self.listeners.values_mut() {
				listeners.retain(|x| !x.used.as_ref().is_some_and(|used| used.get()));
			}

			self.dirty.set(false);
		}
	}

	pub fn add_event_listener(&mut self, event: EventType, f: js_sys::Function, once: bool) {
		self.clean();

		self.listeners.entry(event).or_default().push(EventListener {
			f,
			used: once.then(|| Rc::new(Cell::new(false))),
		});
	}

	pub fn remove_event_listener(&mut self, event: EventType, f: &JsValue) {
		self.clean();

		if let Some(listeners) = self.listeners.get_mut(&event) {
			listeners.retain(|x| !JsValue::eq(&x.f, f));
		}
	}

	/// Listeners run after the returned closure is called, outside of any borrow
	/// of the player. Use the [`dispatch!`] macro.
	#[must_use = "must be called to process events use disptach! macro"]
	pub fn emit(&mut self, event: impl Into<UserEvent>) -> impl FnOnce() + 'static {
		self.clean();

		let event = event.into();
		let dirty = self.dirty.clone();
		let listeners = self.listeners.get(&event.ty()).cloned().unwrap_or_default();

		move || {
			if listeners.is_empty() {
				return;
			}

			let value = match event.value() {
				Ok(value) => value,
				Err(err) => {
					tracing::error!("failed to serialize {:?} event: {}", event.ty(), err);
					return;
				}
			};

			for listener in listeners {
				if let Some(used) = listener.used.as_ref() {
					if used.get() {
						continue;
					}
				}

				let result = match &value {
					Some(evt) => listener.f.call1(&JsValue::undefined(), evt),
					None => listener.f.call0(&JsValue::undefined()),
				};

				if let Err(err) = result {
					tracing::error!("event target raised exception: {:?}", err);
				}

				if let Some(used) = listener.used.as_ref() {
					used.set(true);
					dirty.set(true);
				}
			}
		}
	}
}

macro_rules! dispatch {
	($x:expr) => {{
		let f = { $x };
		f()
	}};
}

pub(crate) use dispatch;
