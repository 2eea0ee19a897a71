use std::ops::Deref;

use wasm_bindgen::JsCast;

pub type Cleanup = Box<dyn FnOnce(&web_sys::EventTarget)>;

/// Keeps a DOM object together with the listeners registered on it.
/// The listeners are removed when the holder is dropped.
pub struct Holder<T: JsCast> {
	inner: T,
	cleanup: Option<Cleanup>,
}

impl<T: JsCast> Holder<T> {
	pub fn new(inner: T, cleanup: Cleanup) -> Self {
		Self {
			inner,
			cleanup: Some(cleanup),
		}
	}
}

impl<T: JsCast> Deref for Holder<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}

impl<T: JsCast> Drop for Holder<T> {
	fn drop(&mut self) {
		if let Some(cleanup) = self.cleanup.take() {
			cleanup(self.inner.unchecked_ref());
		}
	}
}

/// Registers closures as event listeners on `$ob` and evaluates to a
/// `Result<Cleanup, JsValue>` that unregisters them.
macro_rules! register_events {
	($ob:expr, {
		$(
			$($evt:literal)|+ => $body:expr
		),* $(,)?
	}) => {
		(|| -> Result<$crate::player::util::Cleanup, wasm_bindgen::JsValue> {
			let target: &web_sys::EventTarget = $ob.as_ref();
			let mut handlers = Vec::new();
			$(
				let closure = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new($body);
				$(
					target.add_event_listener_with_callback($evt, wasm_bindgen::JsCast::unchecked_ref(closure.as_ref()))?;
				)+
				handlers.push((vec![$($evt),+], closure));
			)*

			Ok(Box::new(move |target: &web_sys::EventTarget| {
				for (events, closure) in handlers {
					for event in events {
						target
							.remove_event_listener_with_callback(event, wasm_bindgen::JsCast::unchecked_ref(closure.as_ref()))
							.ok();
					}
				}
			}) as $crate::player::util::Cleanup)
		})()
	};
}

pub(crate) use register_events;
