//! Viewport intersection and active-section resolution

use folio_platform::{Document, Rect};
use indexmap::IndexMap;

use crate::margin::RootMargin;

/// One section's intersection with the viewport
///
/// Equivalent to an `IntersectionObserverEntry` reduced to what section
/// tracking needs.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
    /// Fraction of the section's area inside the root box, `[0, 1]`
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn new(id: impl Into<String>, is_intersecting: bool, ratio: f32) -> Self {
        Self {
            id: id.into(),
            is_intersecting,
            ratio,
        }
    }
}

/// Intersection ratio of a full-width element against the viewport
///
/// `rect` is viewport-relative; `margin` grows or shrinks the root box.
/// Zero-height elements report `0`.
pub fn intersection_ratio(rect: Rect, viewport_height: f32, margin: &RootMargin) -> f32 {
    if rect.height <= 0.0 {
        return 0.0;
    }
    let (root_top, root_bottom) = margin.root_span(viewport_height);
    (rect.vertical_overlap(root_top, root_bottom) / rect.height).clamp(0.0, 1.0)
}

/// Compute intersection entries for the given sections
///
/// Used where no native observer exists (headless pages). A section is
/// intersecting when its ratio is positive and reaches `threshold`. A section
/// that is not mounted reports as not intersecting, as a browser observer
/// does for removed targets.
pub fn observe<D: Document + ?Sized>(
    document: &D,
    sections: &[String],
    threshold: f32,
    margin: &RootMargin,
) -> Vec<IntersectionEntry> {
    let viewport_height = document.viewport().viewport_height;
    sections
        .iter()
        .map(|id| match document.section_rect(id) {
            Some(rect) => {
                let ratio = intersection_ratio(rect, viewport_height, margin);
                let is_intersecting = ratio > 0.0 && ratio >= threshold;
                IntersectionEntry::new(id.clone(), is_intersecting, ratio)
            }
            None => IntersectionEntry::new(id.clone(), false, 0.0),
        })
        .collect()
}

/// Latest observation of one section
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct SectionSample {
    is_intersecting: bool,
    ratio: f32,
}

/// Keeps the latest ratio per section and decides which one is current
///
/// Observers only report sections whose intersection changed, so samples
/// persist across batches. The current section only changes when another
/// intersecting section beats it with a strictly greater ratio.
#[derive(Clone, Debug)]
pub struct SectionResolver {
    samples: IndexMap<String, SectionSample>,
    current: Option<String>,
}

impl SectionResolver {
    /// Create a resolver over the ordered section ids; the first is current
    pub fn new(sections: &[String]) -> Self {
        Self {
            samples: sections
                .iter()
                .map(|id| (id.clone(), SectionSample::default()))
                .collect(),
            current: sections.first().cloned(),
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Latest ratio recorded for a section
    pub fn ratio(&self, id: &str) -> Option<f32> {
        self.samples.get(id).map(|sample| sample.ratio)
    }

    /// Record a batch of entries and re-resolve
    ///
    /// Entries for ids that were not configured are ignored. Returns `true`
    /// when the current section changed.
    pub fn apply<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        for entry in entries {
            if let Some(sample) = self.samples.get_mut(&entry.id) {
                *sample = SectionSample {
                    is_intersecting: entry.is_intersecting,
                    ratio: entry.ratio,
                };
            }
        }
        self.resolve()
    }

    fn resolve(&mut self) -> bool {
        let mut best = self
            .current
            .as_deref()
            .and_then(|id| self.samples.get(id))
            .filter(|sample| sample.is_intersecting)
            .map(|sample| sample.ratio)
            .unwrap_or(0.0);
        let mut winner: Option<&String> = None;

        for (id, sample) in &self.samples {
            if sample.is_intersecting && sample.ratio > best {
                best = sample.ratio;
                winner = Some(id);
            }
        }

        match winner {
            Some(id) if self.current.as_deref() != Some(id.as_str()) => {
                self.current = Some(id.clone());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_platform::headless::HeadlessPage;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_largest_ratio_wins() {
        let mut resolver = SectionResolver::new(&ids(&["a", "b", "c"]));
        assert_eq!(resolver.current(), Some("a"));

        let changed = resolver.apply([
            IntersectionEntry::new("a", true, 0.3),
            IntersectionEntry::new("b", true, 0.6),
            IntersectionEntry::new("c", false, 0.0),
        ]);

        assert!(changed);
        assert_eq!(resolver.current(), Some("b"));
    }

    #[test]
    fn test_tie_keeps_current() {
        let mut resolver = SectionResolver::new(&ids(&["a", "b"]));
        let changed = resolver.apply([
            IntersectionEntry::new("a", true, 0.5),
            IntersectionEntry::new("b", true, 0.5),
        ]);

        assert!(!changed);
        assert_eq!(resolver.current(), Some("a"));
    }

    #[test]
    fn test_samples_persist_across_batches() {
        let mut resolver = SectionResolver::new(&ids(&["a", "b"]));
        resolver.apply([IntersectionEntry::new("b", true, 0.8)]);
        assert_eq!(resolver.current(), Some("b"));

        // Only `a` is reported; `b` still holds its 0.8
        assert!(!resolver.apply([IntersectionEntry::new("a", true, 0.7)]));
        assert_eq!(resolver.current(), Some("b"));
        assert_eq!(resolver.ratio("b"), Some(0.8));
    }

    #[test]
    fn test_nothing_intersecting_keeps_current() {
        let mut resolver = SectionResolver::new(&ids(&["a", "b"]));
        assert!(!resolver.apply([
            IntersectionEntry::new("a", false, 0.0),
            IntersectionEntry::new("b", false, 0.0),
        ]));
        assert_eq!(resolver.current(), Some("a"));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut resolver = SectionResolver::new(&ids(&["a"]));
        assert!(!resolver.apply([IntersectionEntry::new("footer", true, 1.0)]));
        assert_eq!(resolver.current(), Some("a"));
    }

    #[test]
    fn test_empty_sections() {
        let mut resolver = SectionResolver::new(&[]);
        assert_eq!(resolver.current(), None);
        assert!(!resolver.apply(Vec::new()));
    }

    #[test]
    fn test_intersection_ratio() {
        let margin = RootMargin::default();
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 10.0, 400.0), 800.0, &margin), 1.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 600.0, 10.0, 400.0), 800.0, &margin), 0.5);
        assert_eq!(intersection_ratio(Rect::new(0.0, 900.0, 10.0, 400.0), 800.0, &margin), 0.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 10.0, 0.0), 800.0, &margin), 0.0);

        // Shrinking the root by 25% at the bottom hides the lower half
        let margin = RootMargin::parse("0px 0px -25% 0px").unwrap();
        assert_eq!(intersection_ratio(Rect::new(0.0, 400.0, 10.0, 400.0), 800.0, &margin), 0.5);
    }

    #[test]
    fn test_observe_headless_page() {
        let page = HeadlessPage::new(800.0, 3000.0);
        page.add_section("hero", 0.0, 800.0);
        page.add_section("about", 800.0, 800.0);
        page.set_scroll_top(600.0);

        let entries = observe(
            &page,
            &ids(&["hero", "about", "contact"]),
            0.3,
            &RootMargin::default(),
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], IntersectionEntry::new("hero", false, 0.25));
        assert_eq!(entries[1], IntersectionEntry::new("about", true, 0.75));
        assert_eq!(entries[2], IntersectionEntry::new("contact", false, 0.0));
    }
}
