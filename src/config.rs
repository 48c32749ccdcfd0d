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

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_GRID_SIZE: i32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeneratorKind {
    #[default]
    Simple,
    Debug,
}

/// Visual theme. Its ordinal is the tile mesh group for floors and walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelTheme {
    Church,
    Crypt,
    #[default]
    Castle,
    Basement,
    Cave,
}

impl LevelTheme {
    pub fn group(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub seed: String,
    pub width: i32,
    pub height: i32,
    pub generator: GeneratorKind,
    pub theme: LevelTheme,
    pub max_attempts: usize,
    /// Keep the best layout when the coverage target is never met instead
    /// of failing the build.
    pub accept_best: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            seed: "test".to_string(),
            width: 30,
            height: 30,
            generator: GeneratorKind::Simple,
            theme: LevelTheme::Castle,
            max_attempts: 1000,
            accept_best: true,
        }
    }
}

impl LevelConfig {
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::read_to_string(path)?;
        Self::from_json(&file)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_SIZE || self.height < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID_SIZE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config = LevelConfig::from_json(r#"{ "seed": "abc", "theme": "Cave" }"#).unwrap();
        assert_eq!(config.seed, "abc");
        assert_eq!(config.width, 30);
        assert_eq!(config.theme, LevelTheme::Cave);
        assert_eq!(config.generator, GeneratorKind::Simple);
        assert!(config.accept_best);
    }

    #[test]
    fn tiny_grid_is_rejected() {
        let err = LevelConfig::from_json(r#"{ "width": 5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::GridTooSmall { width: 5, .. }));
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        assert!(matches!(
            LevelConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn theme_ordinal_is_mesh_group() {
        assert_eq!(LevelTheme::Church.group(), 0);
        assert_eq!(LevelTheme::Castle.group(), 2);
    }
}
