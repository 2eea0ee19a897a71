use tokio::sync::mpsc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlVideoElement};

use crate::player::errors::{EventError, EventErrorExt};
use crate::player::overlay::{CountdownToken, PopupAction};
use crate::player::util::{register_events, Holder};
use crate::player::view::View;

/// Everything the runner reacts to, in the order it happened.
#[derive(Debug)]
pub enum WidgetEvent {
	TimeUpdate,
	DurationChange,
	Play,
	Pause,
	MediaError(web_sys::Event),
	PlayRejected(JsValue),
	KeyDown(String),
	FullscreenChange,
	CountdownTick(CountdownToken),
	Command(Command),
}

/// User intents, from the rendered controls or the javascript api.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	TogglePlayPause,
	SeekRelative(f64),
	SeekToFraction(f64),
	SetVolume(f64),
	ToggleMute,
	SetPlaybackRate(f64),
	SwitchQuality(String),
	ToggleFullscreen,
	Popup(PopupAction),
}

impl From<Command> for WidgetEvent {
	fn from(command: Command) -> Self {
		Self::Command(command)
	}
}

fn forward(tx: &mpsc::Sender<WidgetEvent>, evt: impl Into<WidgetEvent>) {
	if tx.try_send(evt.into()).is_err() {
		tracing::warn!("player event queue is full, dropping event");
	}
}

pub fn make_video_element_holder(
	element: HtmlVideoElement,
	tx: &mpsc::Sender<WidgetEvent>,
) -> Result<Holder<HtmlVideoElement>, EventError> {
	let cleanup = register_events!(element, {
		"timeupdate" => {
			let tx = tx.clone();
			move |_| forward(&tx, WidgetEvent::TimeUpdate)
		},
		"durationchange" | "loadedmetadata" => {
			let tx = tx.clone();
			move |_| forward(&tx, WidgetEvent::DurationChange)
		},
		"play" => {
			let tx = tx.clone();
			move |_| forward(&tx, WidgetEvent::Play)
		},
		"pause" => {
			let tx = tx.clone();
			move |_| forward(&tx, WidgetEvent::Pause)
		},
		"error" => {
			let tx = tx.clone();
			move |evt: web_sys::Event| {
				tracing::error!("video element error");
				forward(&tx, WidgetEvent::MediaError(evt));
			}
		},
		"click" => {
			let tx = tx.clone();
			move |_| forward(&tx, Command::TogglePlayPause)
		},
	})
	.dom_error("failed to listen to the video element")?;

	Ok(Holder::new(element, cleanup))
}

/// Keyboard shortcuts are registered on the document so they work regardless of focus.
pub fn make_document_holder(
	document: Document,
	tx: &mpsc::Sender<WidgetEvent>,
	keyboard_shortcuts: bool,
) -> Result<Holder<Document>, EventError> {
	let cleanup = (if keyboard_shortcuts {
		register_events!(document, {
			"fullscreenchange" => {
				let tx = tx.clone();
				move |_| forward(&tx, WidgetEvent::FullscreenChange)
			},
			"keydown" => {
				let tx = tx.clone();
				move |evt: web_sys::Event| {
					if let Some(evt) = evt.dyn_ref::<web_sys::KeyboardEvent>() {
						forward(&tx, WidgetEvent::KeyDown(evt.key()));
					}
				}
			},
		})
	} else {
		register_events!(document, {
			"fullscreenchange" => {
				let tx = tx.clone();
				move |_| forward(&tx, WidgetEvent::FullscreenChange)
			},
		})
	})
	.dom_error("failed to listen to the document")?;

	Ok(Holder::new(document, cleanup))
}

/// Wires the rendered controls to commands.
pub fn make_control_holders(view: &View, tx: &mpsc::Sender<WidgetEvent>) -> Result<Vec<Holder<EventTarget>>, EventError> {
	let mut holders = Vec::new();

	let mut click = |target: &web_sys::HtmlElement, command: Command| -> Result<(), EventError> {
		let cleanup = register_events!(target, {
			"click" => {
				let tx = tx.clone();
				move |_| forward(&tx, command.clone())
			},
		})
		.dom_error("failed to listen to a control")?;

		holders.push(Holder::new(target.clone().unchecked_into(), cleanup));
		Ok(())
	};

	let seek_step = view.seek_step();
	click(&view.play_button, Command::TogglePlayPause)?;
	click(&view.rewind_button, Command::SeekRelative(-seek_step))?;
	click(&view.forward_button, Command::SeekRelative(seek_step))?;
	click(&view.mute_button, Command::ToggleMute)?;
	click(&view.fullscreen_button, Command::ToggleFullscreen)?;
	click(&view.popup_start_button, Command::Popup(PopupAction::Start))?;
	click(&view.popup_stop_button, Command::Popup(PopupAction::Stop))?;
	click(&view.popup_close_button, Command::Popup(PopupAction::Close))?;

	let progress = view.progress_bar.clone();
	let cleanup = register_events!(progress, {
		"click" => {
			let tx = tx.clone();
			let progress = progress.clone();
			move |evt: web_sys::Event| {
				let Some(evt) = evt.dyn_ref::<web_sys::MouseEvent>() else {
					return;
				};

				let rect = progress.get_bounding_client_rect();
				if rect.width() <= 0.0 {
					return;
				}

				let fraction = (f64::from(evt.client_x()) - rect.left()) / rect.width();
				forward(&tx, Command::SeekToFraction(fraction));
			}
		},
	})
	.dom_error("failed to listen to the progress bar")?;
	holders.push(Holder::new(progress.unchecked_into(), cleanup));

	let volume = view.volume_slider.clone();
	let cleanup = register_events!(volume, {
		"input" => {
			let tx = tx.clone();
			let volume = volume.clone();
			move |_| {
				if let Ok(value) = volume.value().parse::<f64>() {
					forward(&tx, Command::SetVolume(value));
				}
			}
		},
	})
	.dom_error("failed to listen to the volume slider")?;
	holders.push(Holder::new(volume.unchecked_into(), cleanup));

	let rate = view.rate_select.clone();
	let cleanup = register_events!(rate, {
		"change" => {
			let tx = tx.clone();
			let rate = rate.clone();
			move |_| {
				if let Ok(value) = rate.value().parse::<f64>() {
					forward(&tx, Command::SetPlaybackRate(value));
				}
			}
		},
	})
	.dom_error("failed to listen to the rate selector")?;
	holders.push(Holder::new(rate.unchecked_into(), cleanup));

	let quality = view.quality_select.clone();
	let cleanup = register_events!(quality, {
		"change" => {
			let tx = tx.clone();
			let quality = quality.clone();
			move |_| forward(&tx, Command::SwitchQuality(quality.value()))
		},
	})
	.dom_error("failed to listen to the quality selector")?;
	holders.push(Holder::new(quality.unchecked_into(), cleanup));

	Ok(holders)
}
