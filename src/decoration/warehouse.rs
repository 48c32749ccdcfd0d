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

use crate::decoration::room_decorator::SceneryHint;
use crate::rng::SeededRng;

fn crate_prop(x: f32, y: f32, angle: f32) -> SceneryHint {
    SceneryHint {
        x,
        y,
        name: "box".to_string(),
        group: 0,
        variant: 0,
        angle,
        scale: None,
        height: None,
    }
}

/// Stacks of crates: up to three in the upper-left corner, each gated on the
/// previous one, plus an independent one in the lower-right corner.
pub fn make_warehouse(rng: &mut SeededRng, width: i32, height: i32, scenery: &mut Vec<SceneryHint>) {
    if rng.chance(0.4) {
        scenery.push(crate_prop(-0.3, 0.4, 0.2));
        if rng.chance(0.6) {
            scenery.push(crate_prop(-0.3, -0.4, 0.7));
            if rng.chance(0.8) {
                scenery.push(SceneryHint {
                    scale: Some(0.7),
                    height: Some(0.6),
                    ..crate_prop(-0.4, 0.0, 2.3)
                });
            }
        }
    }

    if rng.chance(0.5) {
        scenery.push(crate_prop(width as f32 - 0.7, height as f32 - 0.7, 0.2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crates_stay_within_limits() {
        for seed in 0..64 {
            let mut rng = SeededRng::new(&seed.to_string());
            let mut scenery = Vec::new();
            make_warehouse(&mut rng, 4, 5, &mut scenery);
            assert!(scenery.len() <= 4);
            assert!(scenery.iter().all(|s| s.name == "box"));
            if let Some(last) = scenery.last().filter(|s| s.x > 1.0) {
                assert!((last.x - 3.3).abs() < 1e-5 && (last.y - 4.3).abs() < 1e-5);
            }
            let stacked = scenery.iter().filter(|s| s.scale.is_some()).count();
            assert!(stacked <= 1);
        }
    }
}
