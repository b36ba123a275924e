/// Segment delimiter inside sweep file names (`IDR71B.T.202401010006.png`).
pub const NAME_DELIMITER: char = '.';

/// Default number of most recent sweeps in one animation.
pub const DEFAULT_FRAME_COUNT: usize = 7;

/// Ordering key embedded in a sweep file name.
///
/// The key is the second-to-last `.`-separated segment parsed as an integer. It is only ever
/// compared, never interpreted as a calendar time. Names whose token is missing or does not
/// parse get [`i64::MIN`] so that they sort before every well-formed name.
pub fn sweep_sort_key(name: &str) -> i64 {
    let mut segments = name.rsplit(NAME_DELIMITER);
    let _extension = segments.next();
    segments
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .unwrap_or(i64::MIN)
}

/// Pick the `frame_count` most recent sweeps whose names contain `needle`.
///
/// Returns them oldest first. Fewer matches than `frame_count` yields every match; no matches
/// yields an empty list. Sorting is stable, so names with equal keys keep their listing order.
pub fn select_sweeps<S: AsRef<str>>(names: &[S], needle: &str, frame_count: usize) -> Vec<String> {
    let mut matching: Vec<(i64, &str)> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.contains(needle))
        .map(|name| (sweep_sort_key(name), name))
        .collect();

    matching.sort_by_key(|(key, _)| *key);

    let start = matching.len().saturating_sub(frame_count);
    matching[start..]
        .iter()
        .map(|(_, name)| (*name).to_string())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/select/sweeps.rs"]
mod tests;
