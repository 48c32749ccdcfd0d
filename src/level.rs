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

use log::{debug, warn};

use crate::config::{GeneratorKind, LevelConfig};
use crate::error::{GenerationError, LevelError};
use crate::maps::{
    DebugDungeonGenerator, Door, Dungeon, DungeonGenerator, Navigator, PathNode,
    SimpleDungeonGenerator, VisibilityManager,
};
use crate::point_f::{PointF, ease_out_quart};
use crate::rooms::{DecoratedLink, DecoratedRoom, RoomGenerator};
use crate::trimesh::{PointLight, RoomTriangulator, TileSource, TriangulatedLink, TriangulatedRoom, WallFade};

/// One generated level and the state that changes while it is played:
/// reveal progress, doors and wall fade.
pub struct Level {
    config: LevelConfig,
    dungeon: Dungeon,
    decorated_rooms: Vec<DecoratedRoom>,
    decorated_links: Vec<DecoratedLink>,
    rooms: Vec<TriangulatedRoom>,
    links: Vec<TriangulatedLink>,
    visibility: VisibilityManager,
    doors: Vec<Door>,
    wall_fade: WallFade,
}

impl Level {
    pub fn build(config: &LevelConfig, tiles: &dyn TileSource) -> Result<Self, LevelError> {
        config.validate()?;
        let dungeon = Self::generate_dungeon(config)?;
        Ok(Self::from_dungeon(config, dungeon, tiles))
    }

    /// Runs the configured generator. An exhausted retry budget falls back to
    /// the best layout when `accept_best` is set.
    pub fn generate_dungeon(config: &LevelConfig) -> Result<Dungeon, LevelError> {
        let (width, height) = (config.width, config.height);
        let result = match config.generator {
            GeneratorKind::Simple => SimpleDungeonGenerator::new(&config.seed, width, height)
                .with_max_attempts(config.max_attempts)
                .generate(),
            GeneratorKind::Debug => DebugDungeonGenerator::new(width, height).generate(),
        };

        match result {
            Ok(dungeon) => Ok(dungeon),
            Err(GenerationError::Exhausted { attempts, best }) if config.accept_best => {
                warn!(
                    "seed {:?}: keeping best layout after {attempts} attempts ({:.0}% coverage)",
                    config.seed,
                    best.coverage() * 100.0
                );
                Ok(*best)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Decorates and triangulates an existing dungeon, then reveals its start
    /// room.
    pub fn from_dungeon(config: &LevelConfig, dungeon: Dungeon, tiles: &dyn TileSource) -> Self {
        let mut generator = RoomGenerator::new(&config.seed, config.theme);
        let (decorated_rooms, decorated_links) = generator.generate(&dungeon);
        let (rooms, links) =
            RoomTriangulator::new(tiles).triangulate(&dungeon, &decorated_rooms, &decorated_links);

        let mut visibility = VisibilityManager::new(&dungeon);
        visibility.reveal(dungeon.start_room, true);
        let doors = Door::from_dungeon(&dungeon);
        let wall_fade = WallFade::new(dungeon.rooms.len());

        debug!(
            "level {:?} ready: {} rooms, {} links, {} doors, {} visibility groups",
            config.seed,
            dungeon.rooms.len(),
            dungeon.links.len(),
            doors.len(),
            visibility.groups().len()
        );

        Self {
            config: config.clone(),
            dungeon,
            decorated_rooms,
            decorated_links,
            rooms,
            links,
            visibility,
            doors,
            wall_fade,
        }
    }

    /// Per-frame tick. `delta` is in frames at 60 Hz.
    pub fn update(&mut self, delta: f32, player: PointF) {
        self.visibility.update(delta);
        for door in &mut self.doors {
            door.update(delta);
        }
        self.wall_fade.update(&self.dungeon, player, delta);
    }

    pub fn build_path(
        &self,
        from: PointF,
        to: PointF,
        to_radius: f32,
        target: Option<usize>,
    ) -> Option<Vec<PathNode>> {
        Navigator::new(&self.dungeon, &self.visibility, &self.doors).build_path(from, to, to_radius, target)
    }

    /// Opens a door and starts revealing the rooms on both sides.
    pub fn open_door(&mut self, index: usize, player: PointF) -> bool {
        match self.doors.get_mut(index) {
            Some(door) => door.activate(player, &mut self.visibility),
            None => false,
        }
    }

    /// Closest visible door within `reach` of `point`.
    pub fn nearest_door(&self, point: PointF, reach: f32) -> Option<usize> {
        self.doors
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_visible(&self.visibility))
            .map(|(i, d)| (i, d.position().distance(point)))
            .filter(|(_, dist)| *dist <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Lights of every room that has started to appear, dimmed by its reveal.
    pub fn lights(&self, time: f32) -> Vec<PointLight> {
        let mut lights = Vec::new();
        for room in &self.rooms {
            let state = self.visibility.room_state(room.room);
            if state <= 0.0 {
                continue;
            }
            let strength = ease_out_quart(state);
            lights.extend(room.lights.iter().map(|l| l.point_light(strength, time)));
        }
        lights
    }

    /// Center of the start room's middle cell.
    pub fn start_position(&self) -> PointF {
        match self.dungeon.rooms.get(self.dungeon.start_room) {
            Some(room) => PointF::new(
                (room.x + room.width / 2) as f32 + 0.5,
                (room.y + room.height / 2) as f32 + 0.5,
            ),
            None => PointF::zero(),
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn decorated_rooms(&self) -> &[DecoratedRoom] {
        &self.decorated_rooms
    }

    pub fn decorated_links(&self) -> &[DecoratedLink] {
        &self.decorated_links
    }

    pub fn rooms(&self) -> &[TriangulatedRoom] {
        &self.rooms
    }

    pub fn links(&self) -> &[TriangulatedLink] {
        &self.links
    }

    pub fn visibility(&self) -> &VisibilityManager {
        &self.visibility
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn wall_fade(&self) -> &WallFade {
        &self.wall_fade
    }
}
