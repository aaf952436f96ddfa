//! Root margins for viewport intersection
//!
//! A root margin grows (positive) or shrinks (negative) the viewport box
//! sections are intersected against, using the CSS margin shorthand that
//! `IntersectionObserver` accepts: `"-20% 0px -35% 0px"`, `"10px"`, ...

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, opt},
    error::ParseError as NomParseError,
    multi::separated_list1,
    number::complete::float,
    sequence::delimited,
    Finish, IResult,
};
use thiserror::Error;

/// Root margin parse errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootMarginError {
    /// The input is not a whitespace-separated list of lengths
    #[error("invalid root margin '{0}': expected lengths in px or %")]
    Invalid(String),

    /// More than four lengths were given
    #[error("root margin takes 1 to 4 lengths, got {0}")]
    TooManyValues(usize),
}

/// A margin length
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percentage of the root's corresponding dimension
    Percent(f32),
}

impl Length {
    /// Resolve to pixels against a reference dimension
    pub fn to_px(self, reference: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => reference * pct / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Margin around the viewport used for intersection tests
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    /// Same length on every side
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Vertical-only margin
    pub fn vertical(top: Length, bottom: Length) -> Self {
        Self {
            top,
            bottom,
            ..Default::default()
        }
    }

    /// Parse CSS margin shorthand
    pub fn parse(input: &str) -> Result<Self, RootMarginError> {
        let (_, values) = all_consuming(lengths::<nom::error::Error<&str>>)(input)
            .finish()
            .map_err(|_| RootMarginError::Invalid(input.to_string()))?;

        match values.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [v, h] => Ok(Self {
                top: *v,
                right: *h,
                bottom: *v,
                left: *h,
            }),
            [t, h, b] => Ok(Self {
                top: *t,
                right: *h,
                bottom: *b,
                left: *h,
            }),
            [t, r, b, l] => Ok(Self {
                top: *t,
                right: *r,
                bottom: *b,
                left: *l,
            }),
            _ => Err(RootMarginError::TooManyValues(values.len())),
        }
    }

    /// Vertical extent of the root box for a viewport of the given height
    ///
    /// Returns `(top, bottom)` in viewport coordinates; percentages resolve
    /// against the viewport height.
    pub fn root_span(&self, viewport_height: f32) -> (f32, f32) {
        (
            -self.top.to_px(viewport_height),
            viewport_height + self.bottom.to_px(viewport_height),
        )
    }
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Parse a length with an optional px/% suffix (unitless means px)
fn length<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Length, E> {
    let (input, value) = float(input)?;
    let (input, unit) = opt(alt((tag_no_case("px"), tag("%"))))(input)?;

    let length = match unit {
        Some("%") => Length::Percent(value),
        _ => Length::Px(value),
    };

    Ok((input, length))
}

fn lengths<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Vec<Length>, E> {
    delimited(
        multispace0,
        separated_list1(multispace1, length),
        multispace0,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shorthand() {
        let margin = RootMargin::parse("-20% 0px -35% 0px").unwrap();
        assert_eq!(margin.top, Length::Percent(-20.0));
        assert_eq!(margin.right, Length::Px(0.0));
        assert_eq!(margin.bottom, Length::Percent(-35.0));
        assert_eq!(margin.left, Length::Px(0.0));

        let margin: RootMargin = "10px".parse().unwrap();
        assert_eq!(margin, RootMargin::uniform(Length::Px(10.0)));

        let margin = RootMargin::parse(" 5px 10% ").unwrap();
        assert_eq!(margin.top, Length::Px(5.0));
        assert_eq!(margin.bottom, Length::Px(5.0));
        assert_eq!(margin.left, Length::Percent(10.0));

        let margin = RootMargin::parse("1px 2px 3px").unwrap();
        assert_eq!(margin.bottom, Length::Px(3.0));
        assert_eq!(margin.left, Length::Px(2.0));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            RootMargin::parse("1px 2px 3px 4px 5px"),
            Err(RootMarginError::TooManyValues(5))
        );
        assert!(matches!(
            RootMargin::parse("wide"),
            Err(RootMarginError::Invalid(_))
        ));
        assert!(RootMargin::parse("").is_err());
    }

    #[test]
    fn test_root_span() {
        let margin = RootMargin::parse("-20% 0px -30% 0px").unwrap();
        assert_eq!(margin.root_span(1000.0), (200.0, 700.0));
        assert_eq!(RootMargin::default().root_span(800.0), (0.0, 800.0));
    }

    #[test]
    fn test_display_round_trips_through_observer_syntax() {
        let margin = RootMargin::vertical(Length::Percent(-10.0), Length::Px(40.0));
        assert_eq!(margin.to_string(), "-10% 0px 40px 0px");
    }
}
