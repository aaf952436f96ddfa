//! Tracker state snapshot

use std::fmt;

/// Direction of the last scroll movement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    /// No movement observed yet
    #[default]
    None,
}

impl ScrollDirection {
    /// Direction implied by moving from `previous` to `current`
    ///
    /// Equal offsets return `None` so the caller keeps its last direction.
    pub fn between(previous: f32, current: f32) -> Option<Self> {
        if current > previous {
            Some(ScrollDirection::Down)
        } else if current < previous {
            Some(ScrollDirection::Up)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::None => "none",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot for rendering
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollTrackingState {
    /// Document scroll progress, `[0, 1]`
    pub progress: f32,
    /// Most visible section
    pub current_section: Option<String>,
    /// Whether scroll events are actively arriving
    pub is_scrolling: bool,
    pub direction: ScrollDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between() {
        assert_eq!(ScrollDirection::between(10.0, 20.0), Some(ScrollDirection::Down));
        assert_eq!(ScrollDirection::between(20.0, 10.0), Some(ScrollDirection::Up));
        assert_eq!(ScrollDirection::between(20.0, 20.0), None);
    }
}
