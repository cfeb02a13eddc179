// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon simplification.

use super::rectangle_in_perimeter;
use crate::types::{Polygon, Rectangle};

/// Simplify a polygon without changing the region it covers.
///
/// Three passes run in order, and are repeated until none of them changes
/// anything:
///
/// 1. drop every rectangle lying flat on a face of another one;
/// 2. drop every rectangle included in another one;
/// 3. merge pairs that meet and agree on all axes but one, restarting the
///    scan after each merge. The union takes the place of the first rectangle
///    of the pair.
///
/// The first two passes are sequential, so of two identical rectangles one
/// survives. The result is a fixpoint: `refine(&refine(p)) == refine(p)`.
pub fn refine<const D: usize>(polygon: &Polygon<D>) -> Polygon<D> {
    let mut rectangles = polygon.to_vec();
    loop {
        let before = rectangles.len();
        retain_unless_covered(&mut rectangles, |other, r| {
            !rectangle_in_perimeter(other, r).is_empty()
        });
        retain_unless_covered(&mut rectangles, Rectangle::includes_rectangle);
        merge_aligned(&mut rectangles);
        // Every pass only ever removes rectangles.
        if rectangles.len() == before {
            break;
        }
    }
    Polygon::new(rectangles)
}

/// Remove each rectangle for which `covers(other, rectangle)` holds for some
/// other rectangle still present.
fn retain_unless_covered<const D: usize>(
    rectangles: &mut Vec<Rectangle<D>>,
    covers: impl Fn(&Rectangle<D>, &Rectangle<D>) -> bool,
) {
    let mut i = 0;
    while i < rectangles.len() {
        let covered = rectangles
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && covers(other, &rectangles[i]));
        if covered {
            rectangles.remove(i);
        } else {
            i += 1;
        }
    }
}

fn mergeable<const D: usize>(a: &Rectangle<D>, b: &Rectangle<D>) -> bool {
    if a.intersection(b).is_none() {
        return false;
    }
    let differing = (0..D)
        .filter(|&axis| {
            a.lower_left()[axis] != b.lower_left()[axis]
                || a.upper_right()[axis] != b.upper_right()[axis]
        })
        .count();
    differing <= 1
}

fn merge_aligned<const D: usize>(rectangles: &mut Vec<Rectangle<D>>) {
    'scan: loop {
        for i in 0..rectangles.len() {
            for j in (i + 1)..rectangles.len() {
                if mergeable(&rectangles[i], &rectangles[j]) {
                    rectangles[i] = rectangles[i].union(&rectangles[j]);
                    rectangles.remove(j);
                    continue 'scan;
                }
            }
        }
        break;
    }
}
