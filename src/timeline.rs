use chrono::{DateTime, FixedOffset, Offset, TimeZone, Timelike, Utc};
use uuid::Uuid;

use crate::model::Incident;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Horizontal position of a wall-clock time over a 24 hour span, in percent.
/// Seconds are ignored.
pub fn position_percent<T: Timelike>(time: &T) -> f64 {
    let minutes = time.hour() * 60 + time.minute();
    minutes as f64 / MINUTES_PER_DAY as f64 * 100.0
}

/// Converts a pointer coordinate within a track of `width` into a percentage
/// clamped to `[0, 100]`.
pub fn pointer_percent(x: f64, width: f64) -> f64 {
    if width.is_nan() || width <= 0.0 || x.is_nan() {
        return 0.0;
    }
    (x / width * 100.0).clamp(0.0, 100.0)
}

/// `HH:MM` label for a scrubber percentage. The far right edge reads `24:00`.
pub fn scrubber_label(percent: f64) -> String {
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    // snap float noise so an exact minute never floors to the one before
    let total_minutes = (percent / 100.0 * MINUTES_PER_DAY as f64 * 1e6).round() / 1e6;
    let hours = (total_minutes / 60.0).floor() as u32;
    let minutes = (total_minutes % 60.0).floor() as u32;
    format!("{hours:02}:{minutes:02}")
}

/// Label under the scrubber when the pointer sits at `x` along a track of
/// `width`.
pub fn scrubber_label_at(x: f64, width: f64) -> String {
    scrubber_label(pointer_percent(x, width))
}

/// Ruler labels `00:00` through `24:00`.
pub fn hour_labels() -> Vec<String> {
    (0..=24).map(|hour| format!("{hour:02}:00")).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineMarker {
    pub id: Uuid,
    pub percent: f64,
    pub color: &'static str,
    pub title: String,
}

/// Projects incidents onto a day in the given UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    offset: FixedOffset,
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline { offset: Utc.fix() }
    }
}

impl Timeline {
    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        Some(Timeline {
            offset: FixedOffset::east_opt(minutes.checked_mul(60)?)?,
        })
    }

    pub fn local<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> DateTime<FixedOffset> {
        time.with_timezone(&self.offset)
    }

    pub fn incident_position(&self, incident: &Incident) -> f64 {
        position_percent(&self.local(&incident.ts_start))
    }

    pub fn marker(&self, incident: &Incident) -> TimelineMarker {
        TimelineMarker {
            id: incident.id,
            percent: self.incident_position(incident),
            color: incident.kind.color(),
            title: format!(
                "{} - {} at {}",
                incident.kind,
                incident.camera.name,
                self.local(&incident.ts_start).format("%H:%M:%S")
            ),
        }
    }

    pub fn markers<'a>(&self, incidents: impl IntoIterator<Item = &'a Incident>) -> Vec<TimelineMarker> {
        incidents.into_iter().map(|x| self.marker(x)).collect()
    }

    /// `HH:MM - HH:MM on Mon D, YYYY`, dated by the start.
    pub fn time_range(&self, incident: &Incident) -> String {
        let start = self.local(&incident.ts_start);
        let end = self.local(&incident.ts_end);
        format!(
            "{} - {} on {}",
            start.format("%H:%M"),
            end.format("%H:%M"),
            start.format("%b %-d, %Y")
        )
    }
}
