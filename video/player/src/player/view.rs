use video_player_types::PlayerConfig;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlVideoElement};

use super::controller::{FullscreenHost, PlaybackRate, PlaybackState};
use super::display::{format_countdown, marker_percent, project};
use super::errors::{EventError, EventErrorExt};
use super::overlay::{PopupState, Timestamp};
use super::settings::PlayerSettingsParsed;
use super::JsResult;

const STYLE_ID: &str = "video-player-style";

const STYLE: &str = r#"
.vp-root { position: relative; width: 100%; background: #000; }
.vp-video { display: block; width: 100%; height: auto; cursor: pointer; }
.vp-popup { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.3); }
.vp-popup[hidden] { display: none; }
.vp-popup-body { display: flex; flex-direction: column; align-items: center; gap: 1rem; padding: 1rem 1.5rem; border-radius: 4px; background: rgba(255, 255, 255, 0.9); color: #000; }
.vp-popup-label, .vp-popup-countdown { font-weight: bold; font-size: 1.25rem; }
.vp-popup-actions { display: flex; gap: 1rem; }
.vp-controls { position: absolute; left: 0; right: 0; bottom: 0; display: flex; align-items: center; gap: 1rem; padding: 0.5rem 1rem; background: rgba(0, 0, 0, 0.6); color: #fff; }
.vp-controls button { background: none; border: none; color: inherit; cursor: pointer; }
.vp-progress { position: relative; flex: 1; height: 0.5rem; border-radius: 4px; background: #d1d5db; cursor: pointer; }
.vp-progress-fill { height: 100%; border-radius: 4px; background: #ef4444; }
.vp-marker { position: absolute; top: 0; width: 4px; height: 100%; background: #eab308; transform: translateX(-50%); }
.vp-time { font-size: 0.875rem; white-space: nowrap; }
"#;

const SVG_PLAY: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><polygon points="5,3 19,12 5,21 5,3"/></svg>"#;
const SVG_PAUSE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><rect x="6" y="4" width="4" height="16"/><rect x="14" y="4" width="4" height="16"/></svg>"#;
const SVG_REWIND: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><polygon points="11,5 3,12 11,19"/><polygon points="21,5 13,12 21,19"/></svg>"#;
const SVG_FORWARD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><polygon points="3,5 11,12 3,19"/><polygon points="13,5 21,12 13,19"/></svg>"#;
const SVG_SOUND: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><polygon points="3,9 7,9 12,5 12,19 7,15 3,15"/><path d="M16 8a5 5 0 0 1 0 8"/></svg>"#;
const SVG_MUTED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><polygon points="3,9 7,9 12,5 12,19 7,15 3,15"/><path d="M16 9l5 6M21 9l-5 6"/></svg>"#;
const SVG_FULLSCREEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16m-7 6h7"/></svg>"#;
const SVG_EXIT_FULLSCREEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6h12v12H6z"/></svg>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Icon {
	Play,
	Pause,
	Rewind,
	Forward,
	Sound,
	Muted,
	Fullscreen,
	ExitFullscreen,
}

impl Icon {
	const fn name(self) -> &'static str {
		match self {
			Self::Play => "play",
			Self::Pause => "pause",
			Self::Rewind => "rewind",
			Self::Forward => "forward",
			Self::Sound => "sound",
			Self::Muted => "muted",
			Self::Fullscreen => "fullscreen",
			Self::ExitFullscreen => "exit-fullscreen",
		}
	}

	const fn svg(self) -> &'static str {
		match self {
			Self::Play => SVG_PLAY,
			Self::Pause => SVG_PAUSE,
			Self::Rewind => SVG_REWIND,
			Self::Forward => SVG_FORWARD,
			Self::Sound => SVG_SOUND,
			Self::Muted => SVG_MUTED,
			Self::Fullscreen => SVG_FULLSCREEN,
			Self::ExitFullscreen => SVG_EXIT_FULLSCREEN,
		}
	}
}

/// The rendered widget. Dropping it removes it from the page.
pub struct View {
	document: Document,
	seek_step: f64,
	pub root: HtmlElement,
	pub video: HtmlVideoElement,
	pub popup: HtmlElement,
	pub popup_label: HtmlElement,
	pub popup_countdown: HtmlElement,
	pub popup_start_button: HtmlElement,
	pub popup_stop_button: HtmlElement,
	pub popup_close_button: HtmlElement,
	pub play_button: HtmlElement,
	pub rewind_button: HtmlElement,
	pub forward_button: HtmlElement,
	pub progress_bar: HtmlElement,
	pub progress_fill: HtmlElement,
	pub markers: Vec<HtmlElement>,
	pub time: HtmlElement,
	pub mute_button: HtmlElement,
	pub volume_slider: HtmlInputElement,
	pub rate_select: HtmlSelectElement,
	pub quality_select: HtmlSelectElement,
	pub fullscreen_button: HtmlElement,
}

impl View {
	pub fn new(
		document: &Document,
		container: &HtmlElement,
		config: &PlayerConfig,
		settings: &PlayerSettingsParsed,
	) -> Result<Self, EventError> {
		Self::build(document, container, config, settings).dom_error("failed to render the player")
	}

	fn build(
		document: &Document,
		container: &HtmlElement,
		config: &PlayerConfig,
		settings: &PlayerSettingsParsed,
	) -> JsResult<Self> {
		install_style(document)?;

		let el = |tag: &str, class: &str| -> JsResult<HtmlElement> {
			let element: HtmlElement = document.create_element(tag)?.unchecked_into();
			element.set_class_name(class);
			Ok(element)
		};

		let button = |class: &str, label: &str| -> JsResult<HtmlElement> {
			let element = el("button", class)?;
			element.set_attribute("type", "button")?;
			element.set_attribute("aria-label", label)?;
			Ok(element)
		};

		let root = el("div", "vp-root")?;
		let video: HtmlVideoElement = el("video", "vp-video")?.unchecked_into();
		video.set_attribute("playsinline", "")?;

		let popup = el("div", "vp-popup")?;
		popup.set_hidden(true);
		let popup_body = el("div", "vp-popup-body")?;
		let popup_label = el("div", "vp-popup-label")?;
		let popup_countdown = el("div", "vp-popup-countdown")?;
		let popup_actions = el("div", "vp-popup-actions")?;
		let popup_start_button = button("vp-popup-start", "Start countdown")?;
		popup_start_button.set_text_content(Some("Start"));
		let popup_stop_button = button("vp-popup-stop", "Stop countdown")?;
		popup_stop_button.set_text_content(Some("Stop"));
		let popup_close_button = button("vp-popup-close", "Close")?;
		popup_close_button.set_text_content(Some("Close"));
		popup_actions.append_child(&popup_start_button)?;
		popup_actions.append_child(&popup_stop_button)?;
		popup_actions.append_child(&popup_close_button)?;
		popup_body.append_child(&popup_label)?;
		popup_body.append_child(&popup_countdown)?;
		popup_body.append_child(&popup_actions)?;
		popup.append_child(&popup_body)?;

		let controls = el("div", "vp-controls")?;
		let play_button = button("vp-play", "Play")?;
		let rewind_button = button("vp-rewind", "Rewind")?;
		set_icon(&rewind_button, Icon::Rewind);
		let forward_button = button("vp-forward", "Forward")?;
		set_icon(&forward_button, Icon::Forward);

		let progress_bar = el("div", "vp-progress")?;
		let progress_fill = el("div", "vp-progress-fill")?;
		progress_bar.append_child(&progress_fill)?;
		let markers = config
			.timestamps
			.iter()
			.map(|timestamp| -> JsResult<HtmlElement> {
				let marker = el("div", "vp-marker")?;
				marker.set_title(&timestamp.label);
				progress_bar.append_child(&marker)?;
				Ok(marker)
			})
			.collect::<JsResult<Vec<_>>>()?;

		let time = el("div", "vp-time")?;
		let mute_button = button("vp-mute", "Mute")?;

		let volume_slider: HtmlInputElement = el("input", "vp-volume")?.unchecked_into();
		volume_slider.set_type("range");
		volume_slider.set_min("0");
		volume_slider.set_max("1");
		volume_slider.set_step("0.1");

		let rate_select: HtmlSelectElement = el("select", "vp-rate")?.unchecked_into();
		for rate in PlaybackRate::ALL {
			let option = document.create_element("option")?;
			option.set_attribute("value", &rate.as_f64().to_string())?;
			option.set_text_content(Some(rate.label()));
			rate_select.append_child(&option)?;
		}

		let quality_select: HtmlSelectElement = el("select", "vp-quality")?.unchecked_into();
		for source in &config.sources {
			let option = document.create_element("option")?;
			option.set_attribute("value", &source.quality)?;
			option.set_text_content(Some(&source.quality));
			quality_select.append_child(&option)?;
		}

		let fullscreen_button = button("vp-fullscreen", "Fullscreen")?;

		controls.append_child(&play_button)?;
		controls.append_child(&rewind_button)?;
		controls.append_child(&forward_button)?;
		controls.append_child(&progress_bar)?;
		controls.append_child(&time)?;
		controls.append_child(&mute_button)?;
		controls.append_child(&volume_slider)?;
		controls.append_child(&rate_select)?;
		controls.append_child(&quality_select)?;
		controls.append_child(&fullscreen_button)?;

		root.append_child(&video)?;
		root.append_child(&popup)?;
		root.append_child(&controls)?;
		container.append_child(&root)?;

		Ok(Self {
			document: document.clone(),
			seek_step: settings.seek_step_seconds,
			root,
			video,
			popup,
			popup_label,
			popup_countdown,
			popup_start_button,
			popup_stop_button,
			popup_close_button,
			play_button,
			rewind_button,
			forward_button,
			progress_bar,
			progress_fill,
			markers,
			time,
			mute_button,
			volume_slider,
			rate_select,
			quality_select,
			fullscreen_button,
		})
	}

	pub fn seek_step(&self) -> f64 {
		self.seek_step
	}

	pub fn render(&self, playback: &PlaybackState, popup: &PopupState, timestamps: &[Timestamp]) {
		let duration = playback.duration.unwrap_or(f64::NAN);
		let display = project(playback.current_time, duration);

		set_icon(&self.play_button, if playback.is_playing { Icon::Pause } else { Icon::Play });
		set_label(&self.play_button, if playback.is_playing { "Pause" } else { "Play" });

		set_style(&self.progress_fill, "width", &format!("{}%", display.progress));
		for (marker, timestamp) in self.markers.iter().zip(timestamps) {
			set_style(marker, "left", &format!("{}%", marker_percent(timestamp.time, duration)));
		}

		self.time.set_text_content(Some(&format!("{} / {}", display.elapsed, display.total)));

		set_icon(&self.mute_button, if playback.sound { Icon::Sound } else { Icon::Muted });
		set_label(&self.mute_button, if playback.sound { "Mute" } else { "Unmute" });
		let volume = playback.volume.to_string();
		if self.volume_slider.value() != volume {
			self.volume_slider.set_value(&volume);
		}

		self.rate_select.set_value(&playback.playback_rate.to_string());
		self.quality_select.set_value(&playback.quality);

		set_icon(
			&self.fullscreen_button,
			if playback.is_fullscreen {
				Icon::ExitFullscreen
			} else {
				Icon::Fullscreen
			},
		);

		match &popup.active_label {
			Some(label) => {
				self.popup.set_hidden(false);
				self.popup_label.set_text_content(Some(label));
			}
			None => self.popup.set_hidden(true),
		}

		match popup.countdown_remaining {
			Some(remaining) => {
				self.popup_countdown.set_hidden(false);
				self.popup_countdown.set_text_content(Some(&format_countdown(remaining)));
			}
			None => self.popup_countdown.set_hidden(true),
		}
	}
}

impl FullscreenHost for View {
	fn is_fullscreen(&self) -> bool {
		self.document
			.fullscreen_element()
			.is_some_and(|element| element.is_same_node(Some(AsRef::<web_sys::Node>::as_ref(&self.root))))
	}

	fn request_fullscreen(&self) {
		// Rejections are reported through `fullscreenerror`, the flag only follows `fullscreenchange`.
		if let Err(err) = self.root.request_fullscreen() {
			tracing::warn!("fullscreen request failed: {:?}", err);
		}
	}

	fn exit_fullscreen(&self) {
		self.document.exit_fullscreen();
	}
}

impl Drop for View {
	fn drop(&mut self) {
		self.root.remove();
	}
}

fn install_style(document: &Document) -> JsResult<()> {
	if document.get_element_by_id(STYLE_ID).is_some() {
		return Ok(());
	}

	let style = document.create_element("style")?;
	style.set_id(STYLE_ID);
	style.set_text_content(Some(STYLE));

	match document.head() {
		Some(head) => head.append_child(&style)?,
		None => document.document_element().ok_or("document has no root element")?.append_child(&style)?,
	};

	Ok(())
}

/// Only replaces the markup when the icon changes, renders happen on every time update.
fn set_icon(button: &HtmlElement, icon: Icon) {
	if button.get_attribute("data-icon").as_deref() != Some(icon.name()) {
		button.set_inner_html(icon.svg());
		button.set_attribute("data-icon", icon.name()).ok();
	}
}

fn set_label(element: &HtmlElement, label: &str) {
	element.set_attribute("aria-label", label).ok();
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
	element.style().set_property(property, value).ok();
}
