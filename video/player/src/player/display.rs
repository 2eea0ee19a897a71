//! Pure projections from raw media element readings to what the controls show.
//!
//! Nothing in here is stored, everything is recomputed on each time update.

/// What the control bar renders for a given `(current_time, duration)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
	/// Fill of the progress bar, between 0 and 100.
	pub progress: f64,
	/// `MM:SS`
	pub elapsed: String,
	/// `MM:SS`, or `00:00` while the duration is unknown.
	pub total: String,
}

pub fn project(current_time: f64, duration: f64) -> DisplayState {
	DisplayState {
		progress: progress_percent(current_time, duration),
		elapsed: format_clock(current_time),
		total: known_duration(duration).map(format_clock).unwrap_or_else(|| format_clock(0.0)),
	}
}

/// The duration reported by a media element is NaN before metadata is loaded
/// and infinite for live streams. Neither can be used to place anything on a timeline.
pub fn known_duration(duration: f64) -> Option<f64> {
	(duration.is_finite() && duration > 0.0).then_some(duration)
}

/// The duration to divide by, falling back to 1 while it is unknown.
pub fn effective_duration(duration: f64) -> f64 {
	known_duration(duration).unwrap_or(1.0)
}

pub fn progress_percent(current_time: f64, duration: f64) -> f64 {
	if !current_time.is_finite() {
		return 0.0;
	}

	(current_time / effective_duration(duration) * 100.0).clamp(0.0, 100.0)
}

/// Horizontal position of a timestamp marker on the progress bar.
pub fn marker_percent(time: f64, duration: f64) -> f64 {
	progress_percent(time, duration)
}

/// Formats seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: f64) -> String {
	let secs = whole_seconds(secs);
	format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats a countdown as `HH:MM:SS`.
pub fn format_countdown(secs: u32) -> String {
	format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn whole_seconds(secs: f64) -> u64 {
	if secs.is_finite() && secs > 0.0 {
		secs.floor() as u64
	} else {
		0
	}
}
