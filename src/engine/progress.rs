//! Level curve: reaching level `L` takes `(L - 1)^2 * 5` correct answers.

pub fn points_for_level(level: u32) -> u64 {
    let steps = level.saturating_sub(1) as u64;
    steps * steps * 5
}

pub fn level_for(points: u32) -> u32 {
    let points = points as u64;
    let mut level = 1;
    while points >= points_for_level(level + 1) {
        level += 1;
    }
    level
}

/// Fraction of the way from the current level to the next, in `[0, 1)`.
pub fn progress_to_next_level(points: u32) -> f64 {
    let level = level_for(points);
    let floor = points_for_level(level);
    let ceiling = points_for_level(level + 1);
    (points as u64 - floor) as f64 / (ceiling - floor) as f64
}

pub fn points_to_next_level(points: u32) -> u64 {
    points_for_level(level_for(points) + 1) - points as u64
}
