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

use std::hash::Hasher;

use fnv::FnvHasher;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reproducible random stream derived from a string seed.
///
/// Every pipeline stage owns its own stream (`"<seed>_room"`,
/// `"<seed>_tile"`, ...) so that decoration randomness does not depend on how
/// many numbers the layout generator happened to consume.
#[derive(Clone, Debug)]
pub struct SeededRng {
    rng: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed_hash(seed)),
        }
    }

    /// Sub-stream named `"<seed>_<name>"`.
    pub fn named(seed: &str, name: &str) -> Self {
        Self::new(&format!("{seed}_{name}"))
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rng.r#gen::<u32>()
    }

    /// Integer in `[0, max]`.
    pub fn random_int(&mut self, max: u32) -> u32 {
        self.next_u32() % (max + 1)
    }

    /// Integer in `[from, to]`, or `from` when the range is empty.
    pub fn random_range(&mut self, from: i32, to: i32) -> i32 {
        if to <= from {
            return from;
        }
        from + self.random_int((to - from) as u32) as i32
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// `floor(next_f64() * n)`, an index in `[0, n)`.
    pub fn index(&mut self, n: i32) -> i32 {
        (self.next_f64() * n as f64).floor() as i32
    }
}

/// 64-bit FNV-1a of the seed string.
fn seed_hash(seed: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(seed.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new("test");
        let mut b = SeededRng::new("test");
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seed_hash_is_fnv1a() {
        assert_eq!(seed_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(seed_hash("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn stream_is_pinned_to_chacha() {
        let mut ours = SeededRng::new("test");
        let mut chacha = ChaCha8Rng::seed_from_u64(seed_hash("test"));
        for _ in 0..8 {
            assert_eq!(ours.next_u32(), chacha.r#gen::<u32>());
        }
    }

    #[test]
    fn named_streams_differ() {
        let mut room = SeededRng::named("test", "room");
        let mut tile = SeededRng::named("test", "tile");
        let a: Vec<u32> = (0..8).map(|_| room.next_u32()).collect();
        let b: Vec<u32> = (0..8).map(|_| tile.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn ranges_stay_inside_bounds() {
        let mut rng = SeededRng::new("bounds");
        for _ in 0..500 {
            let v = rng.random_range(3, 7);
            assert!((3..=7).contains(&v));
            let i = rng.index(5);
            assert!((0..5).contains(&i));
        }
        assert_eq!(rng.random_range(4, 1), 4);
    }
}
