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

use thiserror::Error;

use crate::maps::dungeon::Dungeon;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Coverage target never reached. `best` is the layout with the largest
    /// room area seen across all attempts.
    #[error("dungeon coverage target not reached after {attempts} attempts")]
    Exhausted { attempts: usize, best: Box<Dungeon> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid {width}x{height} is too small (minimum {min}x{min})")]
    GridTooSmall { width: i32, height: i32, min: i32 },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
