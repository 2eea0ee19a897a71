use std::rc::Rc;

use tokio::sync::mpsc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use super::runner::events::WidgetEvent;

/// The subset of `HTMLMediaElement` the controller drives.
///
/// `duration` follows the browser semantics: NaN until metadata is loaded.
pub trait MediaElement {
	fn current_time(&self) -> f64;
	fn set_current_time(&self, time: f64);
	fn duration(&self) -> f64;
	fn paused(&self) -> bool;
	/// Fire and forget, the element reports the real outcome through its events.
	fn play(&self);
	fn pause(&self);
	fn set_volume(&self, volume: f64);
	fn set_playback_rate(&self, rate: f64);
	fn set_src(&self, src: &str);
}

impl<T: MediaElement + ?Sized> MediaElement for Rc<T> {
	fn current_time(&self) -> f64 {
		(**self).current_time()
	}

	fn set_current_time(&self, time: f64) {
		(**self).set_current_time(time)
	}

	fn duration(&self) -> f64 {
		(**self).duration()
	}

	fn paused(&self) -> bool {
		(**self).paused()
	}

	fn play(&self) {
		(**self).play()
	}

	fn pause(&self) {
		(**self).pause()
	}

	fn set_volume(&self, volume: f64) {
		(**self).set_volume(volume)
	}

	fn set_playback_rate(&self, rate: f64) {
		(**self).set_playback_rate(rate)
	}

	fn set_src(&self, src: &str) {
		(**self).set_src(src)
	}
}

/// A `<video>` element owned by the widget.
///
/// Rejected `play()` promises (autoplay policies, source errors) are forwarded
/// to the runner instead of being dropped.
#[derive(Debug, Clone)]
pub struct VideoElement {
	element: HtmlVideoElement,
	events: mpsc::Sender<WidgetEvent>,
}

impl VideoElement {
	pub fn new(element: HtmlVideoElement, events: mpsc::Sender<WidgetEvent>) -> Self {
		Self { element, events }
	}
}

impl MediaElement for VideoElement {
	fn current_time(&self) -> f64 {
		self.element.current_time()
	}

	fn set_current_time(&self, time: f64) {
		self.element.set_current_time(time);
	}

	fn duration(&self) -> f64 {
		self.element.duration()
	}

	fn paused(&self) -> bool {
		self.element.paused()
	}

	fn play(&self) {
		let promise = match self.element.play() {
			Ok(promise) => promise,
			Err(err) => {
				tracing::warn!("play threw: {:?}", err);
				self.events.try_send(WidgetEvent::PlayRejected(err)).ok();
				return;
			}
		};

		let events = self.events.clone();
		wasm_bindgen_futures::spawn_local(async move {
			if let Err(err) = JsFuture::from(promise).await {
				tracing::warn!("play was rejected: {:?}", err);
				if events.try_send(WidgetEvent::PlayRejected(err)).is_err() {
					tracing::debug!("player is gone, dropping play rejection");
				}
			}
		});
	}

	fn pause(&self) {
		if let Err(err) = self.element.pause() {
			tracing::warn!("pause threw: {:?}", err);
		}
	}

	fn set_volume(&self, volume: f64) {
		self.element.set_volume(volume);
	}

	fn set_playback_rate(&self, rate: f64) {
		self.element.set_playback_rate(rate);
	}

	fn set_src(&self, src: &str) {
		self.element.set_src(src);
	}
}

/// A readable message for a thrown javascript value.
pub fn describe_js_error(err: &JsValue) -> String {
	err.as_string()
		.or_else(|| {
			js_sys::Reflect::get(err, &JsValue::from_str("message"))
				.ok()
				.and_then(|message| message.as_string())
		})
		.unwrap_or_else(|| format!("{:?}", err))
}
