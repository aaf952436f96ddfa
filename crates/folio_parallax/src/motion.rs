//! Per-element parallax math
//!
//! Pure functions from an element's position and its config to the style
//! the engine writes. Progress runs from 0 when the element's bottom edge
//! reaches the bottom of the viewport to 1 when it reaches the top; the
//! effects are centered on 0.5.

use folio_platform::{Rect, Transform, TransformOp, Viewport, VisualStyle};

use crate::config::ParallaxConfig;

/// Translation in pixels at `speed = 1`, `depth = 1`, from center to edge
/// of the traversal times two
pub const TRANSLATE_RANGE: f32 = 100.0;

/// Horizontal translation runs at half the vertical rate and ignores depth
pub const HORIZONTAL_FACTOR: f32 = 0.5;

/// Scale factor at progress 0; grows by `SCALE_SPAN` to progress 1
pub const SCALE_START: f32 = 0.8;
pub const SCALE_SPAN: f32 = 0.4;
pub const SCALE_MIN: f32 = 0.1;
pub const SCALE_MAX: f32 = 2.0;

/// Z translation per unit of depth when scaling
pub const DEPTH_Z: f32 = 10.0;

/// Peak-to-peak rotation in degrees at `depth = 1`
pub const ROTATE_X_RANGE: f32 = 30.0;
pub const ROTATE_Y_RANGE: f32 = 15.0;

/// Fraction of its traversal an element has completed, clamped to `[0, 1]`
///
/// `rect` is viewport-relative; the element's document offset is
/// `rect.top + scroll_top`. Elements taller than the viewport stay at 0
/// while they cover it.
pub fn element_progress(rect: Rect, viewport: &Viewport) -> f32 {
    if viewport.viewport_height <= 0.0 {
        return 0.0;
    }
    let element_top = rect.top() + viewport.scroll_top;
    let swept = viewport.scroll_top + viewport.viewport_height - (element_top + rect.height);
    (swept / viewport.viewport_height).clamp(0.0, 1.0)
}

/// Whether an element is far enough outside the viewport to skip
pub fn is_culled(rect: Rect, viewport_height: f32, margin: f32) -> bool {
    rect.bottom() < -margin || rect.top() > viewport_height + margin
}

/// Tent function: 1 at the middle of the traversal, 0 at either end
pub fn tent_opacity(progress: f32) -> f32 {
    (1.0 - (2.0 * (progress - 0.5)).abs()).clamp(0.0, 1.0)
}

/// Build the style for an element at the given progress
pub fn compute_style(config: &ParallaxConfig, progress: f32) -> VisualStyle {
    let centered = progress - 0.5;
    let mut transform = Transform::identity();

    if config.direction.is_vertical() {
        transform.push(TransformOp::TranslateY(
            centered * config.speed * config.depth * TRANSLATE_RANGE,
        ));
    }

    if config.direction.is_horizontal() {
        transform.push(TransformOp::TranslateX(
            centered * config.speed * HORIZONTAL_FACTOR * TRANSLATE_RANGE,
        ));
    }

    if config.scale {
        let factor = (SCALE_START + progress * SCALE_SPAN).clamp(SCALE_MIN, SCALE_MAX);
        transform.push(TransformOp::TranslateZ(config.depth * DEPTH_Z));
        transform.push(TransformOp::Scale(factor));
    }

    if config.rotation {
        transform.push(TransformOp::RotateX(centered * ROTATE_X_RANGE * config.depth));
        transform.push(TransformOp::RotateY(centered * ROTATE_Y_RANGE * config.depth));
    }

    let opacity = if config.opacity {
        tent_opacity(progress)
    } else {
        1.0
    };

    VisualStyle::new(transform, opacity)
}
