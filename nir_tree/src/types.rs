// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: points, rectangles and rectangle unions.

use core::ops::{Deref, Index};

use crate::error::{NirError, Result};

/// A point in `D` dimensions.
///
/// Coordinates are assumed to be finite; comparisons involving NaN make every
/// predicate in this crate return `false`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point<const D: usize>(pub [f64; D]);

impl<const D: usize> Point<D> {
    /// Create a point from its coordinates.
    pub const fn new(coords: [f64; D]) -> Self {
        Self(coords)
    }

    /// The coordinates of this point.
    pub const fn coords(&self) -> &[f64; D] {
        &self.0
    }

    /// Whether `self[i] >= other[i]` holds on every axis.
    pub fn dominates(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
    }
}

impl<const D: usize> Index<usize> for Point<D> {
    type Output = f64;

    #[inline]
    fn index(&self, axis: usize) -> &f64 {
        &self.0[axis]
    }
}

impl<const D: usize> From<[f64; D]> for Point<D> {
    fn from(coords: [f64; D]) -> Self {
        Self(coords)
    }
}

/// Axis-aligned rectangle in `D` dimensions, closed on every face.
///
/// The upper-right corner always dominates the lower-left corner. Degenerate
/// rectangles (zero extent on some axes: lines, planes, points) are valid and
/// have volume zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rectangle<const D: usize> {
    lower_left: Point<D>,
    upper_right: Point<D>,
}

impl<const D: usize> Rectangle<D> {
    /// Create a rectangle from its corners.
    ///
    /// Fails with [`NirError::InvertedRectangle`] if `upper_right` does not
    /// dominate `lower_left`.
    pub fn new(lower_left: Point<D>, upper_right: Point<D>) -> Result<Self> {
        if !upper_right.dominates(&lower_left) {
            return Err(NirError::InvertedRectangle {
                lower: lower_left.0.to_vec(),
                upper: upper_right.0.to_vec(),
            });
        }
        Ok(Self {
            lower_left,
            upper_right,
        })
    }

    /// Construct without checking the corner order. Callers must have proved it.
    pub(crate) const fn from_corners_unchecked(lower_left: Point<D>, upper_right: Point<D>) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// The zero-volume rectangle covering a single point.
    pub const fn from_point(point: Point<D>) -> Self {
        Self::from_corners_unchecked(point, point)
    }

    /// Lower-left (minimum) corner.
    pub const fn lower_left(&self) -> &Point<D> {
        &self.lower_left
    }

    /// Upper-right (maximum) corner.
    pub const fn upper_right(&self) -> &Point<D> {
        &self.upper_right
    }

    /// Extent along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        self.upper_right[axis] - self.lower_left[axis]
    }

    /// Product of the per-axis extents.
    pub fn volume(&self) -> f64 {
        (0..D).map(|axis| self.extent(axis)).product()
    }

    /// Whether the point lies in the rectangle, boundary included.
    pub fn includes_point(&self, point: &Point<D>) -> bool {
        point.dominates(&self.lower_left) && self.upper_right.dominates(point)
    }

    /// Whether `other` lies entirely inside this rectangle, boundary included.
    pub fn includes_rectangle(&self, other: &Self) -> bool {
        self.includes_point(&other.lower_left) && self.includes_point(&other.upper_right)
    }

    /// The common part of two rectangles, or `None` when they do not meet.
    ///
    /// Rectangles that only touch produce a degenerate intersection.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let mut lower = self.lower_left;
        let mut upper = self.upper_right;
        for axis in 0..D {
            lower.0[axis] = lower[axis].max(other.lower_left[axis]);
            upper.0[axis] = upper[axis].min(other.upper_right[axis]);
        }
        upper
            .dominates(&lower)
            .then(|| Self::from_corners_unchecked(lower, upper))
    }

    /// The smallest rectangle containing both this rectangle and `point`.
    pub fn expand(&self, point: &Point<D>) -> Self {
        let mut lower = self.lower_left;
        let mut upper = self.upper_right;
        for axis in 0..D {
            lower.0[axis] = lower[axis].min(point[axis]);
            upper.0[axis] = upper[axis].max(point[axis]);
        }
        Self::from_corners_unchecked(lower, upper)
    }

    /// The smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        self.expand(&other.lower_left).expand(&other.upper_right)
    }

    /// Replace the range covered on `axis` with `[lower, upper]`.
    ///
    /// Callers guarantee `lower <= upper`.
    pub(crate) fn with_axis(&self, axis: usize, lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "axis range must not be inverted");
        let mut out = *self;
        out.lower_left.0[axis] = lower;
        out.upper_right.0[axis] = upper;
        out
    }
}

/// A region described as the union of axis-aligned rectangles.
///
/// The rectangles keep their construction order. Until [`refine`](crate::geometry::refine)
/// has run they may overlap, in which case [`Polygon::volume`] over-counts.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Polygon<const D: usize>(Vec<Rectangle<D>>);

impl<const D: usize> Polygon<D> {
    /// Create a polygon from its rectangles.
    pub const fn new(rectangles: Vec<Rectangle<D>>) -> Self {
        Self(rectangles)
    }

    /// The rectangles making up this polygon.
    pub fn rectangles(&self) -> &[Rectangle<D>] {
        &self.0
    }

    /// Consume the polygon, returning its rectangles.
    pub fn into_rectangles(self) -> Vec<Rectangle<D>> {
        self.0
    }

    /// Append a rectangle.
    pub fn push(&mut self, rectangle: Rectangle<D>) {
        self.0.push(rectangle);
    }

    /// Whether any rectangle includes the point.
    pub fn includes_point(&self, point: &Point<D>) -> bool {
        self.0.iter().any(|r| r.includes_point(point))
    }

    /// Sum of the rectangle volumes. Exact only for refined polygons.
    pub fn volume(&self) -> f64 {
        self.0.iter().map(Rectangle::volume).sum()
    }

    /// The smallest rectangle enclosing every rectangle, `None` if empty.
    pub fn bounding_rectangle(&self) -> Option<Rectangle<D>> {
        let (first, rest) = self.0.split_first()?;
        Some(rest.iter().fold(*first, |acc, r| acc.union(r)))
    }
}

impl<const D: usize> Deref for Polygon<D> {
    type Target = [Rectangle<D>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const D: usize> From<Vec<Rectangle<D>>> for Polygon<D> {
    fn from(rectangles: Vec<Rectangle<D>>) -> Self {
        Self(rectangles)
    }
}

impl<const D: usize> FromIterator<Rectangle<D>> for Polygon<D> {
    fn from_iter<I: IntoIterator<Item = Rectangle<D>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const D: usize> IntoIterator for Polygon<D> {
    type Item = Rectangle<D>;
    type IntoIter = std::vec::IntoIter<Rectangle<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, const D: usize> IntoIterator for &'a Polygon<D> {
    type Item = &'a Rectangle<D>;
    type IntoIter = core::slice::Iter<'a, Rectangle<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    use super::{Point, Rectangle};

    impl<const D: usize> Serialize for Point<D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.0.iter())
        }
    }

    impl<'de, const D: usize> Deserialize<'de> for Point<D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let coords = Vec::<f64>::deserialize(deserializer)?;
            let len = coords.len();
            <[f64; D]>::try_from(coords)
                .map(Point)
                .map_err(|_| de::Error::invalid_length(len, &"one coordinate per dimension"))
        }
    }

    impl<const D: usize> Serialize for Rectangle<D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            (&self.lower_left, &self.upper_right).serialize(serializer)
        }
    }

    impl<'de, const D: usize> Deserialize<'de> for Rectangle<D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let (lower_left, upper_right) = <(Point<D>, Point<D>)>::deserialize(deserializer)?;
            Self::new(lower_left, upper_right).map_err(de::Error::custom)
        }
    }
}
