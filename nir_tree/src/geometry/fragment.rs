// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle and polygon subtraction.

use crate::types::{Polygon, Rectangle};

/// `rectangle \ cut`, as a union of boxes.
///
/// A shrinking "remaining" box starts as `rectangle`. For each axis in turn, a
/// low face of `cut` inside the remaining range emits the part of the
/// remaining box below it, a high face emits the part above it, and the
/// remaining box is then clipped to `cut` on that axis. All low-face fragments
/// come first (in axis order), then the high-face ones.
///
/// A face lying on the far side of the remaining range still emits a
/// fragment, possibly of zero volume; [`refine`](super::refine) removes or
/// merges those. When the two rectangles do not meet at all the result is
/// `[rectangle]`. At most `2 * D` fragments are produced.
pub fn rectangle_fragmentation<const D: usize>(
    rectangle: &Rectangle<D>,
    cut: &Rectangle<D>,
) -> Polygon<D> {
    if rectangle.intersection(cut).is_none() {
        return Polygon::new(vec![*rectangle]);
    }
    let mut remaining = *rectangle;
    let mut lows = Vec::with_capacity(D);
    let mut highs = Vec::with_capacity(D);
    for axis in 0..D {
        let lo = remaining.lower_left()[axis];
        let hi = remaining.upper_right()[axis];
        let cut_lo = cut.lower_left()[axis];
        let cut_hi = cut.upper_right()[axis];
        if lo < cut_lo && cut_lo <= hi {
            lows.push(remaining.with_axis(axis, lo, cut_lo));
        }
        if lo <= cut_hi && cut_hi < hi {
            highs.push(remaining.with_axis(axis, cut_hi, hi));
        }
        // The rectangles meet, so the clipped range cannot invert.
        remaining = remaining.with_axis(axis, lo.max(cut_lo), hi.min(cut_hi));
    }
    lows.extend(highs);
    Polygon::new(lows)
}

/// `polygon \ cut`: every rectangle of `cut` is subtracted in turn from what
/// is left of `polygon`.
///
/// Zero-volume fragments are kept.
pub fn polygon_fragmentation<const D: usize>(polygon: &Polygon<D>, cut: &Polygon<D>) -> Polygon<D> {
    cut.iter().fold(polygon.clone(), |left, c| {
        left.iter()
            .flat_map(|r| rectangle_fragmentation(r, c))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::refine;
    use crate::geometry::tests::{poly, rect};
    use approx::assert_relative_eq;

    #[test]
    fn fragments_around_an_overlapping_rectangle() {
        assert_eq!(
            rectangle_fragmentation(&rect([6., 5.], [10., 7.]), &rect([8., 3.], [9., 6.])),
            poly(&[([6., 5.], [8., 7.]), ([9., 5.], [10., 7.]), ([8., 6.], [9., 7.])])
        );
        assert_eq!(
            rectangle_fragmentation(&rect([4., 3.], [10., 9.]), &rect([9., 3.], [13., 5.])),
            poly(&[([4., 3.], [9., 9.]), ([9., 5.], [10., 9.])])
        );
    }

    #[test]
    fn touching_cut_refines_back_to_the_whole_rectangle() {
        let whole = poly(&[([6., 5.], [10., 7.])]);
        for cut in [rect([5., 7.], [7., 9.]), rect([4., 7.], [6., 9.])] {
            assert_eq!(
                refine(&rectangle_fragmentation(&rect([6., 5.], [10., 7.]), &cut)),
                whole
            );
        }
        assert_eq!(
            rectangle_fragmentation(&rect([6., 5.], [10., 7.]), &rect([3., 7.], [5., 9.])),
            whole
        );
    }

    #[test]
    fn fragments_in_three_dimensions() {
        let cube = rect([1., 0., 0.], [4., 3., 3.]);
        assert_eq!(
            rectangle_fragmentation(&cube, &rect([3., 1., 1.], [5., 2., 2.])),
            poly(&[
                ([1., 0., 0.], [3., 3., 3.]),
                ([3., 0., 0.], [4., 1., 3.]),
                ([3., 1., 0.], [4., 2., 1.]),
                ([3., 2., 0.], [4., 3., 3.]),
                ([3., 1., 2.], [4., 2., 3.]),
            ])
        );
        assert_eq!(
            rectangle_fragmentation(&cube, &rect([3., 1., 2.], [5., 2., 3.])),
            poly(&[
                ([1., 0., 0.], [3., 3., 3.]),
                ([3., 0., 0.], [4., 1., 3.]),
                ([3., 1., 0.], [4., 2., 2.]),
                ([3., 2., 0.], [4., 3., 3.]),
            ])
        );
        assert_eq!(
            refine(&rectangle_fragmentation(&cube, &rect([3., 1., 3.], [5., 2., 4.]))),
            poly(&[([1., 0., 0.], [4., 3., 3.])])
        );
    }

    #[test]
    fn fragments_lines_and_planes() {
        assert_eq!(
            rectangle_fragmentation(&rect([0., 0.], [4., 0.]), &rect([1., -1.], [3., 1.])),
            poly(&[([0., 0.], [1., 0.]), ([3., 0.], [4., 0.])])
        );
        assert_eq!(
            rectangle_fragmentation(&rect([0., 0.], [0., 4.]), &rect([-1., 1.], [1., 3.])),
            poly(&[([0., 0.], [0., 1.]), ([0., 3.], [0., 4.])])
        );
        assert_eq!(
            rectangle_fragmentation(&rect([0., 0.], [4., 0.]), &rect([1., 0.], [3., 2.])),
            poly(&[([0., 0.], [1., 0.]), ([3., 0.], [4., 0.])])
        );
        assert_eq!(
            rectangle_fragmentation(&rect([0., 0.], [0., 4.]), &rect([0., 1.], [2., 3.])),
            poly(&[([0., 0.], [0., 1.]), ([0., 3.], [0., 4.])])
        );

        let plane_pieces = poly(&[
            ([4., 0., 0.], [4., 1., 3.]),
            ([4., 1., 0.], [4., 2., 1.]),
            ([4., 2., 0.], [4., 3., 3.]),
            ([4., 1., 2.], [4., 2., 3.]),
        ]);
        let plane = rect([4., 0., 0.], [4., 3., 3.]);
        assert_eq!(
            rectangle_fragmentation(&plane, &rect([3., 1., 1.], [5., 2., 2.])),
            plane_pieces
        );
        assert_eq!(
            rectangle_fragmentation(&plane, &rect([4., 1., 1.], [6., 2., 2.])),
            plane_pieces
        );
        assert_eq!(
            rectangle_fragmentation(&rect([0., 4., 0.], [3., 4., 3.]), &rect([1., 3., 1.], [2., 5., 2.])),
            poly(&[
                ([0., 4., 0.], [1., 4., 3.]),
                ([1., 4., 0.], [2., 4., 1.]),
                ([2., 4., 0.], [3., 4., 3.]),
                ([1., 4., 2.], [2., 4., 3.]),
            ])
        );
    }

    #[test]
    fn fragmentation_conserves_volume() {
        let cases = [
            (rect([6., 5.], [10., 7.]), rect([8., 3.], [9., 6.])),
            (rect([4., 3.], [10., 9.]), rect([9., 3.], [13., 5.])),
            (rect([0., 0.], [4., 4.]), rect([1., 1.], [2., 2.])),
            (rect([0., 0.], [4., 4.]), rect([-1., -1.], [5., 5.])),
            (rect([0., 0.], [4., 4.]), rect([4., 0.], [5., 4.])),
            (rect([0., 0.], [4., 4.]), rect([7., 7.], [8., 8.])),
        ];
        for (r, cut) in cases {
            let common = r.intersection(&cut).map_or(0.0, |i| i.volume());
            let pieces = rectangle_fragmentation(&r, &cut);
            assert!(pieces.len() <= 4);
            assert_relative_eq!(r.volume(), pieces.volume() + common);
        }
    }

    #[test]
    fn polygon_fragmentation_subtracts_every_cut_rectangle() {
        // C1 grown to (11, 5.5), carved by branch B's two rectangles.
        let grown = poly(&[([9., 3.], [13., 5.5]), ([13., 3.], [16., 7.])]);
        let b = poly(&[([4., 3.], [9., 9.]), ([9., 5.], [10., 9.])]);
        assert_eq!(
            polygon_fragmentation(&grown, &b),
            poly(&[
                ([9., 3.], [10., 5.]),
                ([10., 3.], [13., 5.5]),
                ([13., 3.], [16., 7.]),
            ])
        );
        assert_eq!(polygon_fragmentation(&grown, &Polygon::default()), grown);
    }
}
