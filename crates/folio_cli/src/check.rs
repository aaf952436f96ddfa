//! Scene validation

use std::collections::HashSet;

use folio_scroll::RootMargin;

use crate::scene::Scene;

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Result of a single check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    fn ok(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.into(),
            hint: None,
        }
    }

    fn warning(name: &str, message: impl Into<String>, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.into(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: impl Into<String>, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.into(),
            hint: Some(hint.to_string()),
        }
    }

    pub fn colored_icon(&self) -> String {
        match self.status {
            CheckStatus::Ok => format!("{}✓{}", colors::GREEN, colors::RESET),
            CheckStatus::Warning => format!("{}!{}", colors::YELLOW, colors::RESET),
            CheckStatus::Error => format!("{}✗{}", colors::RED, colors::RESET),
        }
    }
}

/// Validate a scene; results are in a stable order
pub fn check_scene(scene: &Scene) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if scene.viewport_height > 0.0 {
        results.push(CheckResult::ok(
            "viewport",
            format!("{}x{}", scene.viewport_width, scene.viewport_height),
        ));
    } else {
        results.push(CheckResult::error(
            "viewport",
            format!("height is {}", scene.viewport_height),
            "viewport_height must be positive",
        ));
    }

    if scene.max_scroll() > 0.0 {
        results.push(CheckResult::ok(
            "document",
            format!("{}px, scrolls {}px", scene.document_height, scene.max_scroll()),
        ));
    } else {
        results.push(CheckResult::warning(
            "document",
            "page does not scroll",
            "progress stays at 0 unless document_height exceeds viewport_height",
        ));
    }

    results.push(check_tracker(scene));
    results.extend(check_sections(scene));
    results.extend(check_elements(scene));
    results
}

fn check_tracker(scene: &Scene) -> CheckResult {
    let tracker = &scene.tracker;
    if let Err(err) = RootMargin::parse(&tracker.root_margin) {
        return CheckResult::error(
            "tracker",
            err.to_string(),
            "root_margin takes 1-4 lengths in px or %, e.g. \"-80px 0px 0px\"",
        );
    }
    if !(0.0..=1.0).contains(&tracker.threshold) {
        return CheckResult::warning(
            "tracker",
            format!("threshold {} is outside [0, 1]", tracker.threshold),
            "it will be clamped",
        );
    }
    CheckResult::ok(
        "tracker",
        format!(
            "threshold {}, root margin {}, quiet window {}ms",
            tracker.threshold, tracker.root_margin, tracker.quiet_window_ms
        ),
    )
}

fn check_sections(scene: &Scene) -> Vec<CheckResult> {
    if scene.sections.is_empty() {
        return vec![CheckResult::warning(
            "sections",
            "no sections",
            "add [[sections]] entries to track the active section",
        )];
    }

    let mut seen = HashSet::new();
    scene
        .sections
        .iter()
        .map(|section| {
            let name = format!("section '{}'", section.id);
            if !seen.insert(section.id.as_str()) {
                CheckResult::error(&name, "duplicate id", "section ids must be unique")
            } else if section.height <= 0.0 {
                CheckResult::warning(&name, "zero height", "it will never become active")
            } else if section.top >= scene.document_height {
                CheckResult::warning(
                    &name,
                    format!("starts at {} below the document end", section.top),
                    "it can never scroll into view",
                )
            } else {
                CheckResult::ok(
                    &name,
                    format!("{}..{}", section.top, section.top + section.height),
                )
            }
        })
        .collect()
}

fn check_elements(scene: &Scene) -> Vec<CheckResult> {
    scene
        .elements
        .iter()
        .map(|element| {
            let name = format!("element '{}'", element.name);
            let config = &element.parallax;
            if !(0.0..=1.0).contains(&config.threshold) {
                CheckResult::warning(
                    &name,
                    format!("threshold {} is outside [0, 1]", config.threshold),
                    "element progress is always within [0, 1]",
                )
            } else if config.depth <= 0.0 {
                CheckResult::warning(
                    &name,
                    format!("depth {}", config.depth),
                    "non-positive depth flattens or inverts the effect",
                )
            } else if element.height <= 0.0 {
                CheckResult::warning(&name, "zero height", "element progress is undefined")
            } else {
                CheckResult::ok(
                    &name,
                    format!("speed {}, {:?}", config.speed, config.direction),
                )
            }
        })
        .collect()
}

pub fn has_errors(results: &[CheckResult]) -> bool {
    results.iter().any(|r| r.status == CheckStatus::Error)
}

pub fn print_results(results: &[CheckResult]) {
    for check in results {
        println!("[{}] {}: {}", check.colored_icon(), check.name, check.message);
        if let Some(hint) = &check.hint {
            println!("    {}→ {}{}", colors::CYAN, hint, colors::RESET);
        }
    }
}
