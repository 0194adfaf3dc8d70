//! Clock-style formatting and parsing for paces and durations.

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Formats seconds as `mm:ss`, rounding to the nearest second and clamping
/// at zero. Minutes are not wrapped into hours, so long durations read as
/// `125:07`.
pub fn format_mmss(secs: f64) -> String {
    let s = whole_seconds(secs);
    format!(
        "{:02}:{:02}",
        s / SECONDS_PER_MINUTE,
        s % SECONDS_PER_MINUTE
    )
}

/// Formats seconds as `hh:mm`, rounding to the nearest minute.
pub fn format_hhmm(secs: f64) -> String {
    let s = whole_seconds(secs);
    let total_min = (s as f64 / SECONDS_PER_MINUTE as f64).round() as u64;
    format!("{:02}:{:02}", total_min / 60, total_min % 60)
}

/// Parses `mm:ss` into whole seconds. Both fields must be plain digits and
/// seconds must be below 60; minutes are unbounded.
pub fn parse_mmss(text: &str) -> Option<u32> {
    let (mm, ss) = text.trim().split_once(':')?;
    let mm = parse_digits(mm)?;
    let ss = parse_digits(ss)?;
    if ss >= 60 {
        return None;
    }
    mm.checked_mul(60)?.checked_add(ss)
}

/// Parses one hours/minutes form field. Blank text counts as zero.
pub fn parse_clock_field(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    parse_digits(text)
}

/// Combines hours and minutes into seconds.
pub fn target_seconds(hours: u32, minutes: u32) -> f64 {
    hours as f64 * SECONDS_PER_HOUR as f64 + minutes as f64 * SECONDS_PER_MINUTE as f64
}

fn whole_seconds(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        secs.round() as u64
    } else {
        0
    }
}

fn parse_digits(field: &str) -> Option<u32> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
