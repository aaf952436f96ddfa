//! Displayable surfaces and the visual styles applied to them

use std::fmt;

use smallvec::SmallVec;

use crate::geometry::Rect;

/// A single CSS transform function
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    /// `translateX(<px>)`
    TranslateX(f32),
    /// `translateY(<px>)`
    TranslateY(f32),
    /// `translateZ(<px>)`
    TranslateZ(f32),
    /// `scale(<factor>)`
    Scale(f32),
    /// `rotateX(<deg>)`
    RotateX(f32),
    /// `rotateY(<deg>)`
    RotateY(f32),
}

impl TransformOp {
    /// Whether this op leaves the element where it is
    pub fn is_identity(&self) -> bool {
        match *self {
            TransformOp::Scale(factor) => factor == 1.0,
            TransformOp::TranslateX(v)
            | TransformOp::TranslateY(v)
            | TransformOp::TranslateZ(v)
            | TransformOp::RotateX(v)
            | TransformOp::RotateY(v) => v == 0.0,
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformOp::TranslateX(px) => write!(f, "translateX({px}px)"),
            TransformOp::TranslateY(px) => write!(f, "translateY({px}px)"),
            TransformOp::TranslateZ(px) => write!(f, "translateZ({px}px)"),
            TransformOp::Scale(factor) => write!(f, "scale({factor})"),
            TransformOp::RotateX(deg) => write!(f, "rotateX({deg}deg)"),
            TransformOp::RotateY(deg) => write!(f, "rotateY({deg}deg)"),
        }
    }
}

/// An ordered list of transform functions
///
/// Renders to the value of the CSS `transform` property via `Display`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    ops: SmallVec<[TransformOp; 6]>,
}

impl Transform {
    /// The empty (identity) transform
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: TransformOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when every op is neutral (or there are none)
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(TransformOp::is_identity)
    }

    /// First scale factor in the list, if any
    pub fn scale(&self) -> Option<f32> {
        self.ops.iter().find_map(|op| match op {
            TransformOp::Scale(factor) => Some(*factor),
            _ => None,
        })
    }
}

impl FromIterator<TransformOp> for Transform {
    fn from_iter<I: IntoIterator<Item = TransformOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("none");
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Transform and opacity written to a surface in one mutation
#[derive(Clone, Debug, PartialEq)]
pub struct VisualStyle {
    pub transform: Transform,
    pub opacity: f32,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            opacity: 1.0,
        }
    }
}

impl VisualStyle {
    pub fn new(transform: Transform, opacity: f32) -> Self {
        Self { transform, opacity }
    }

    /// True when applying this style would not change the element's look
    pub fn is_neutral(&self) -> bool {
        self.transform.is_identity() && self.opacity == 1.0
    }
}

/// A displayable element the parallax engine can move
///
/// The engine holds surfaces by value but never owns the underlying
/// element; dropping a surface must not remove anything from the page.
/// Equality identifies the element (two handles to the same DOM node are
/// equal), which is how re-registration is detected.
pub trait Surface: PartialEq {
    /// Viewport-relative bounds, or `None` if the element is detached
    fn bounding_rect(&self) -> Option<Rect>;

    /// Write transform and opacity
    fn apply(&self, style: &VisualStyle);

    /// Unset transform and opacity, returning to the stylesheet's values
    fn reset(&self);

    /// Hint (or stop hinting) that the element is animated every frame
    fn set_accelerated(&self, accelerated: bool);
}
