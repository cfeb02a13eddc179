// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry kernel over rectangles and rectangle unions.
//!
//! Everything here is pure and dimension-generic. The tree algorithms rely on
//! three ideas:
//!
//! - **Boundary-tolerant disjointness.** Two regions are disjoint when their
//!   intersection is empty or lies flat on a face of both, so sibling regions
//!   may share edges.
//! - **Fragmentation.** `R \ Rp` is expressed as at most `2 * D` boxes by
//!   sweeping the axes in order (see [`rectangle_fragmentation`]).
//! - **Refinement.** Fragmentation leaves slivers and splinters behind;
//!   [`refine`] drops the degenerate and redundant pieces and merges aligned
//!   neighbours back together.
//!
//! Pairwise operations are quadratic in the rectangle counts. Node fan-out is
//! small, so no acceleration structure is used.

mod fragment;
mod refine;

pub use fragment::{polygon_fragmentation, rectangle_fragmentation};
pub use refine::refine;

use crate::error::{NirError, Result};
use crate::types::{Point, Polygon, Rectangle};

/// Faces of `rectangle` that `point` lies on.
///
/// Axis `i` stands for the low face on that axis and `i + D` for the high
/// face; identifiers come back in ascending order. The result is empty when
/// the point is strictly inside the rectangle or outside it.
pub fn point_in_perimeter<const D: usize>(rectangle: &Rectangle<D>, point: &Point<D>) -> Vec<usize> {
    if !rectangle.includes_point(point) {
        return Vec::new();
    }
    let low = (0..D).filter(|&axis| point[axis] == rectangle.lower_left()[axis]);
    let high = (0..D)
        .filter(|&axis| point[axis] == rectangle.upper_right()[axis])
        .map(|axis| axis + D);
    low.chain(high).collect()
}

/// Faces of `outer` that the whole of `inner` lies flat against.
///
/// Non-empty only for rectangles that have zero extent across the shared face.
pub fn rectangle_in_perimeter<const D: usize>(
    outer: &Rectangle<D>,
    inner: &Rectangle<D>,
) -> Vec<usize> {
    let upper = point_in_perimeter(outer, inner.upper_right());
    point_in_perimeter(outer, inner.lower_left())
        .into_iter()
        .filter(|face| upper.contains(face))
        .collect()
}

/// Whether two rectangles share no interior.
///
/// Rectangles that only touch along a face, edge or corner are disjoint.
pub fn rectangles_are_disjoint<const D: usize>(a: &Rectangle<D>, b: &Rectangle<D>) -> bool {
    match a.intersection(b) {
        None => true,
        Some(common) => {
            !rectangle_in_perimeter(a, &common).is_empty()
                && !rectangle_in_perimeter(b, &common).is_empty()
        }
    }
}

/// Whether every rectangle of `a` is disjoint from every rectangle of `b`.
pub fn polygons_are_disjoint<const D: usize>(a: &Polygon<D>, b: &Polygon<D>) -> bool {
    a.iter()
        .all(|ra| b.iter().all(|rb| rectangles_are_disjoint(ra, rb)))
}

/// Outcome of [`polygon_expand`].
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion<const D: usize> {
    /// The polygon with one rectangle grown to enclose the point.
    pub polygon: Polygon<D>,
    /// Index of the rectangle that was grown.
    pub index: usize,
    /// Volume added by growing it.
    pub added_volume: f64,
}

/// Grow the rectangle of `polygon` that needs the least extra volume to
/// enclose `point`, leaving every other rectangle untouched.
///
/// Ties go to the first rectangle. Fails with [`NirError::EmptyPolygon`] if
/// there is nothing to grow.
pub fn polygon_expand<const D: usize>(polygon: &Polygon<D>, point: &Point<D>) -> Result<Expansion<D>> {
    let mut best: Option<(usize, Rectangle<D>, f64)> = None;
    for (index, rectangle) in polygon.iter().enumerate() {
        let grown = rectangle.expand(point);
        let added = grown.volume() - rectangle.volume();
        if best.as_ref().is_none_or(|(_, _, min)| added < *min) {
            best = Some((index, grown, added));
        }
    }
    let (index, grown, added_volume) = best.ok_or(NirError::EmptyPolygon)?;
    let mut rectangles = polygon.to_vec();
    rectangles[index] = grown;
    Ok(Expansion {
        polygon: Polygon::new(rectangles),
        index,
        added_volume,
    })
}

impl<const D: usize> Polygon<D> {
    /// Pairwise intersection of two polygons.
    ///
    /// Degenerate pieces (lines, points) are kept; pairs that do not meet are
    /// dropped. Run [`refine`] on the result to simplify it.
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .flat_map(|a| other.iter().filter_map(move |b| a.intersection(b)))
            .collect()
    }

    /// This polygon minus `cut`, dropping zero-volume fragments.
    pub fn subtract_rectangle(&self, cut: &Rectangle<D>) -> Self {
        self.iter()
            .flat_map(|r| rectangle_fragmentation(r, cut))
            .filter(|r| r.volume() > 0.0)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;

    pub(crate) fn rect<const D: usize>(lower: [f64; D], upper: [f64; D]) -> Rectangle<D> {
        Rectangle::new(Point(lower), Point(upper)).unwrap()
    }

    pub(crate) fn poly<const D: usize>(rectangles: &[([f64; D], [f64; D])]) -> Polygon<D> {
        rectangles.iter().map(|&(l, u)| rect(l, u)).collect()
    }

    /// `[2,3]x[2,4]`, `[3,4]x[2,3]`, `[4,5]x[2,4]`: a "U" lying on its back.
    fn polygon1() -> Polygon<2> {
        poly(&[([2., 2.], [3., 4.]), ([3., 2.], [4., 3.]), ([4., 2.], [5., 4.])])
    }

    /// Two stacked rows covering `[3,5]x[2,4]`.
    fn polygon2() -> Polygon<2> {
        poly(&[([3., 2.], [5., 3.]), ([3., 3.], [5., 4.])])
    }

    #[rstest]
    #[case([1.5, 1.0], vec![1])]
    #[case([1.0, 1.0], vec![0, 1])]
    #[case([2.0, 2.0], vec![2, 3])]
    #[case([1.5, 1.5], vec![])]
    #[case([0.5, 1.0], vec![])]
    fn faces_touched_by_point(#[case] point: [f64; 2], #[case] faces: Vec<usize>) {
        assert_eq!(point_in_perimeter(&rect([1., 1.], [2., 2.]), &Point(point)), faces);
    }

    #[rstest]
    #[case(rect([1., 1.], [2., 2.]), rect([1.25, 1.], [1.75, 1.]), vec![1])]
    #[case(rect([1., 1.], [2., 2.]), rect([1., 1.], [1., 1.]), vec![0, 1])]
    #[case(rect([1., 1.], [1., 2.]), rect([1., 1.25], [1., 1.75]), vec![0, 2])]
    #[case(rect([1., 1.], [1., 2.]), rect([1., 1.], [1., 2.]), vec![0, 2])]
    #[case(rect([1., 1.], [2., 2.]), rect([1.25, 1.25], [1.75, 1.75]), vec![])]
    #[case(rect([1., 1.], [2., 2.]), rect([1., 1.], [2., 2.]), vec![])]
    #[case(rect([1., 1.], [2., 2.]), rect([0.5, 0.5], [2.5, 2.5]), vec![])]
    #[case(rect([1., 1.], [2., 2.]), rect([2., 1.], [3., 2.]), vec![])]
    #[case(rect([1., 1.], [2., 2.]), rect([0.5, 1.], [2.5, 1.]), vec![])]
    fn faces_shared_by_rectangle(
        #[case] outer: Rectangle<2>,
        #[case] inner: Rectangle<2>,
        #[case] faces: Vec<usize>,
    ) {
        assert_eq!(rectangle_in_perimeter(&outer, &inner), faces);
    }

    #[rstest]
    #[case(rect([2., 2.], [3., 4.]), rect([4., 2.], [5., 4.]))]
    #[case(rect([2., 2.], [3., 4.]), rect([3., 2.], [4., 4.]))]
    #[case(rect([4., 7.], [6., 9.]), rect([6., 5.], [8., 7.]))]
    #[case(rect([5., 3.], [6., 6.]), rect([6., 5.], [8., 7.]))]
    #[case(rect([8., 3.], [9., 6.]), rect([6., 5.], [8., 7.]))]
    #[case(rect([6., 3.], [8., 5.]), rect([6., 5.], [8., 7.]))]
    #[case(rect([0., 0.], [1., 1.]), rect([1., 0.], [2., 1.]))]
    fn touching_rectangles_are_disjoint(#[case] a: Rectangle<2>, #[case] b: Rectangle<2>) {
        assert!(rectangles_are_disjoint(&a, &b));
        assert!(rectangles_are_disjoint(&b, &a));
    }

    #[test]
    fn overlapping_rectangles_are_not_disjoint() {
        assert!(!rectangles_are_disjoint(
            &rect([2., 2.], [3., 4.]),
            &rect([1., 2.], [4., 3.])
        ));
        let unit = rect([0., 0.], [1., 1.]);
        assert!(!rectangles_are_disjoint(&unit, &unit));
    }

    #[test]
    fn polygon_disjointness() {
        let shifted: Polygon<2> = polygon2()
            .iter()
            .map(|r| {
                let l = r.lower_left();
                let u = r.upper_right();
                rect([l[0], l[1] - 2.], [u[0], u[1] - 2.])
            })
            .collect();
        assert!(polygons_are_disjoint(&polygon1(), &shifted));
        assert!(!polygons_are_disjoint(&polygon1(), &polygon2()));
    }

    #[test]
    fn polygon_intersection_keeps_degenerate_pieces() {
        assert_eq!(
            polygon1().intersection(&polygon2()),
            poly(&[
                ([3., 2.], [3., 3.]),
                ([3., 3.], [3., 4.]),
                ([3., 2.], [4., 3.]),
                ([3., 3.], [4., 3.]),
                ([4., 2.], [5., 3.]),
                ([4., 3.], [5., 4.]),
            ])
        );
        assert_eq!(
            polygon1().intersection(&poly(&[([2., 2.], [5., 4.])])),
            polygon1()
        );
        assert_eq!(polygon1().intersection(&poly(&[([2., 0.], [2., 5.])])).len(), 1);
        assert_eq!(polygon1().intersection(&poly(&[([2.5, 0.], [2.5, 5.])])).len(), 1);
        assert!(polygon1().intersection(&poly(&[([1.5, 0.], [1.5, 5.])])).is_empty());
    }

    #[test]
    fn expansion_grows_the_cheapest_rectangle() {
        let expanded = polygon_expand(&polygon1(), &Point([5., 5.])).unwrap();
        assert_eq!(
            expanded.polygon,
            poly(&[([2., 2.], [3., 4.]), ([3., 2.], [4., 3.]), ([4., 2.], [5., 5.])])
        );
        assert_eq!(expanded.index, 2);

        let expanded = polygon_expand(&polygon1(), &Point([3.9, 4.])).unwrap();
        assert_eq!(
            expanded.polygon,
            poly(&[([2., 2.], [3., 4.]), ([3., 2.], [4., 3.]), ([3.9, 2.], [5., 4.])])
        );
    }

    #[test]
    fn expansion_ties_go_to_the_first_rectangle() {
        let twins = poly(&[([0., 0.], [1., 1.]), ([2., 0.], [3., 1.])]);
        let expanded = polygon_expand(&twins, &Point([1.5, 0.5])).unwrap();
        assert_eq!(expanded.index, 0);
        assert_eq!(expanded.polygon[0], rect([0., 0.], [1.5, 1.]));
        assert_eq!(expanded.polygon[1], twins[1]);
    }

    #[test]
    fn expanded_rectangle_contains_the_point() {
        let targets = [[0., 0.], [6., 6.], [3.5, 3.5], [2., 5.], [10., -3.]];
        for target in targets {
            let point = Point(target);
            let expanded = polygon_expand(&polygon1(), &point).unwrap();
            assert!(expanded.polygon[expanded.index].includes_point(&point));
            assert!(expanded.added_volume >= 0.0);
        }
    }

    #[test]
    fn expanding_an_empty_polygon_fails() {
        assert_eq!(
            polygon_expand(&Polygon::<2>::default(), &Point([0., 0.])),
            Err(NirError::EmptyPolygon)
        );
    }

    #[test]
    fn subtracting_a_rectangle_drops_slivers() {
        let base = poly(&[([4., 3.], [10., 9.])]);
        let touched = base.subtract_rectangle(&rect([4., 7.], [6., 9.]));
        assert!(touched.iter().all(|r| r.volume() > 0.0));
        approx::assert_relative_eq!(touched.volume(), 36.0 - 4.0);
    }
}
