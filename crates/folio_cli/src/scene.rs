//! Scene files
//!
//! A scene describes a page for the headless host: viewport and document
//! size, the tracked sections, and the parallax elements with their configs.
//!
//! ```toml
//! viewport_height = 800
//! document_height = 3000
//!
//! [tracker]
//! threshold = 0.3
//! root_margin = "-80px 0px 0px"
//!
//! [[sections]]
//! id = "hero"
//! top = 0
//! height = 1000
//!
//! [[elements]]
//! name = "hero-bg"
//! top = 1000
//! height = 400
//! speed = 0.5
//! scale = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use folio_parallax::{EngineConfig, ParallaxConfig};
use folio_platform::headless::{HeadlessPage, HeadlessSurface, DEFAULT_VIEWPORT_WIDTH};
use folio_scroll::{
    RootMargin, ScrollTrackerConfig, DEFAULT_HEADER_OFFSET, DEFAULT_QUIET_WINDOW,
    DEFAULT_THRESHOLD,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scene {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub document_height: f32,
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sections: Vec<SceneSection>,
    #[serde(default)]
    pub elements: Vec<SceneElement>,
}

fn default_viewport_width() -> f32 {
    DEFAULT_VIEWPORT_WIDTH
}

/// `[tracker]` table
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub threshold: f32,
    pub root_margin: String,
    pub header_offset: f32,
    pub quiet_window_ms: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: RootMargin::default().to_string(),
            header_offset: DEFAULT_HEADER_OFFSET,
            quiet_window_ms: DEFAULT_QUIET_WINDOW.as_millis() as u64,
        }
    }
}

/// `[[sections]]` entry, in document coordinates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneSection {
    pub id: String,
    pub top: f32,
    pub height: f32,
}

/// `[[elements]]` entry: position plus its parallax config
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneElement {
    pub name: String,
    pub top: f32,
    pub height: f32,
    #[serde(flatten)]
    pub parallax: ParallaxConfig,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Largest scroll offset the page allows
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    pub fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    pub fn tracker_config(&self) -> Result<ScrollTrackerConfig> {
        let root_margin = RootMargin::parse(&self.tracker.root_margin)
            .with_context(|| format!("Invalid root_margin '{}'", self.tracker.root_margin))?;

        Ok(ScrollTrackerConfig::new(self.section_ids())
            .threshold(self.tracker.threshold)
            .root_margin(root_margin)
            .header_offset(self.tracker.header_offset)
            .quiet_window(Duration::from_millis(self.tracker.quiet_window_ms)))
    }

    /// Build the headless page with every section mounted
    pub fn page(&self) -> HeadlessPage {
        let page = HeadlessPage::with_width(
            self.viewport_width,
            self.viewport_height,
            self.document_height,
        );
        for section in &self.sections {
            page.add_section(section.id.clone(), section.top, section.height);
        }
        page
    }

    /// One surface per element, in scene order
    pub fn surfaces(&self, page: &HeadlessPage) -> Vec<HeadlessSurface> {
        self.elements
            .iter()
            .map(|element| page.surface(element.top, element.height))
            .collect()
    }
}
