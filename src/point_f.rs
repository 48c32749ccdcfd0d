// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        PointF { x, y }
    }

    pub fn zero() -> Self {
        PointF { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: PointF) -> f32 {
        (*self - other).length()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn lerp(self, other: PointF, alpha: f32) -> PointF {
        self + (other - self) * alpha
    }

    /// Grid cell containing this point.
    pub fn floor(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PointF {
    type Output = PointF;

    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for PointF {
    type Output = PointF;

    fn mul(self, rhs: f32) -> PointF {
        PointF::new(self.x * rhs, self.y * rhs)
    }
}

pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    x.max(min).min(max)
}

pub fn saturate(x: f32) -> f32 {
    clamp(x, 0.0, 1.0)
}

pub fn ease_in_out_quad(x: f32) -> f32 {
    if x < 0.5 {
        2.0 * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
    }
}

pub fn ease_out_quart(x: f32) -> f32 {
    1.0 - (1.0 - x).powi(4)
}

/// Intersection of the infinite lines through `(start1, end1)` and
/// `(start2, end2)`. Returns the point and its parameter along the first
/// line, `None` for parallel lines.
pub fn lines_intersect(
    start1: PointF,
    end1: PointF,
    start2: PointF,
    end2: PointF,
) -> Option<(PointF, f32)> {
    let denom = (end2.y - start2.y) * (end1.x - start1.x) - (end2.x - start2.x) * (end1.y - start1.y);
    if denom == 0.0 {
        return None;
    }
    let ua = ((end2.x - start2.x) * (start1.y - start2.y)
        - (end2.y - start2.y) * (start1.x - start2.x))
        / denom;

    Some((start1.lerp(end1, ua), ua))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_lines_meet_at_parameter() {
        let (p, t) = lines_intersect(
            PointF::new(0.0, 0.0),
            PointF::new(4.0, 0.0),
            PointF::new(1.0, -1.0),
            PointF::new(1.0, 1.0),
        )
        .unwrap();
        assert!((p.x - 1.0).abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn parallel_lines_do_not_meet() {
        assert!(
            lines_intersect(
                PointF::new(0.0, 0.0),
                PointF::new(1.0, 0.0),
                PointF::new(0.0, 1.0),
                PointF::new(1.0, 1.0),
            )
            .is_none()
        );
    }

    #[test]
    fn easings_hit_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(saturate(1.7), 1.0);
    }
}
