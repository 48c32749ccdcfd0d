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

use log::{error, info, warn};
use macroquad::prelude::*;

use rust_dungeon::debug_map::render_ascii;
use rust_dungeon::maps::PathNode;
use rust_dungeon::point_f::PointF;
use rust_dungeon::tile::TileType;
use rust_dungeon::trimesh::TileSet;
use rust_dungeon::{Level, LevelConfig};

pub const CELL_SIZE: f32 = 20.0;
/// Cells per 60 Hz frame.
const MOVE_SPEED: f32 = 0.04;
const DOOR_USE_RANGE: f32 = 1.5;
const DUMP_PATH: &str = "dungeon.json";

struct Viewer {
    config: LevelConfig,
    tiles: TileSet,
    level: Level,
    player: PointF,
    path: Vec<PathNode>,
    regenerations: u32,
    offset: PointF,
}

impl Viewer {
    fn new(config: LevelConfig) -> Result<Self, rust_dungeon::LevelError> {
        let tiles = TileSet::placeholder();
        let level = Level::build(&config, &tiles)?;
        let player = level.start_position();
        Ok(Self {
            config,
            tiles,
            level,
            player,
            path: Vec::new(),
            regenerations: 0,
            offset: PointF::new(10.0, 40.0),
        })
    }

    fn regenerate(&mut self) {
        self.regenerations += 1;
        let config = LevelConfig {
            seed: format!("{}-{}", self.config.seed, self.regenerations),
            ..self.config.clone()
        };
        match Level::build(&config, &self.tiles) {
            Ok(level) => {
                info!("regenerated with seed {:?}", config.seed);
                self.player = level.start_position();
                self.level = level;
                self.path.clear();
            }
            Err(err) => error!("regeneration failed: {err}"),
        }
    }

    fn dump(&self) {
        match serde_json::to_string_pretty(self.level.dungeon()) {
            Ok(json) => match std::fs::write(DUMP_PATH, json) {
                Ok(()) => info!("wrote {DUMP_PATH}"),
                Err(err) => error!("failed to write {DUMP_PATH}: {err}"),
            },
            Err(err) => error!("failed to serialize dungeon: {err}"),
        }
    }

    fn screen_to_map(&self, x: f32, y: f32) -> PointF {
        PointF::new((x - self.offset.x) / CELL_SIZE, (y - self.offset.y) / CELL_SIZE)
    }

    fn handle_input(&mut self) {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (mx, my) = mouse_position();
            let goal = self.screen_to_map(mx, my);
            match self.level.build_path(self.player, goal, 0.0, None) {
                Some(path) => self.path = path,
                None => warn!("no path to ({:.1}, {:.1})", goal.x, goal.y),
            }
        }

        if is_key_pressed(KeyCode::O) {
            if let Some(door) = self.level.nearest_door(self.player, DOOR_USE_RANGE) {
                self.level.open_door(door, self.player);
            }
        }
        if is_key_pressed(KeyCode::R) {
            self.regenerate();
        }
        if is_key_pressed(KeyCode::J) {
            self.dump();
        }
        if is_key_pressed(KeyCode::P) {
            println!("{}", render_ascii(self.level.dungeon()));
        }
    }

    fn step(&mut self, delta: f32) {
        let mut budget = MOVE_SPEED * delta;
        while budget > 0.0 {
            let Some(next) = self.path.first().copied() else {
                break;
            };
            let distance = self.player.distance(next.position);
            let remaining = distance - next.radius;
            if remaining <= 1e-4 {
                self.path.remove(0);
                continue;
            }
            if budget >= remaining {
                self.player = self.player.lerp(next.position, remaining / distance);
                budget -= remaining;
                self.path.remove(0);
            } else {
                self.player = self.player.lerp(next.position, budget / distance);
                budget = 0.0;
            }
        }
        self.level.update(delta, self.player);
    }

    fn reveal_at(&self, x: i32, y: i32) -> f32 {
        let dungeon = self.level.dungeon();
        let visibility = self.level.visibility();
        let mut state: f32 = 0.0;
        for (i, room) in dungeon.rooms.iter().enumerate() {
            if x >= room.x - 1 && y >= room.y - 1 && x <= room.x + room.width && y <= room.y + room.height {
                state = state.max(visibility.room_state(i));
            }
        }
        for (i, link) in dungeon.links.iter().enumerate() {
            if link.contains_cell(x, y) {
                state = state.max(visibility.link_state(i));
            }
        }
        state
    }

    fn draw(&self) {
        let dungeon = self.level.dungeon();
        for y in 0..dungeon.map.height() {
            for x in 0..dungeon.map.width() {
                let reveal = self.reveal_at(x, y);
                if reveal <= 0.0 {
                    continue;
                }
                let base = match dungeon.map.get(x, y) {
                    TileType::None => LIGHTGRAY,
                    TileType::Wall => DARKGRAY,
                    TileType::Fence => GRAY,
                    TileType::Door | TileType::FenceDoor => LIGHTGRAY,
                };
                draw_rectangle(
                    self.offset.x + x as f32 * CELL_SIZE,
                    self.offset.y + y as f32 * CELL_SIZE,
                    CELL_SIZE - 1.0,
                    CELL_SIZE - 1.0,
                    Color::new(base.r, base.g, base.b, reveal),
                );
            }
        }

        for door in self.level.doors() {
            if !door.is_visible(self.level.visibility()) {
                continue;
            }
            // Closed doors fill the cell; opening shrinks them to a sliver.
            let open = door.swing().abs();
            let (w, h) = if door.vertical {
                (CELL_SIZE - 1.0, (CELL_SIZE - 1.0) * (1.0 - open * 0.8))
            } else {
                ((CELL_SIZE - 1.0) * (1.0 - open * 0.8), CELL_SIZE - 1.0)
            };
            draw_rectangle(
                self.offset.x + door.x as f32 * CELL_SIZE,
                self.offset.y + door.y as f32 * CELL_SIZE,
                w,
                h,
                BROWN,
            );
        }

        let to_screen = |p: PointF| (self.offset.x + p.x * CELL_SIZE, self.offset.y + p.y * CELL_SIZE);
        let mut last = to_screen(self.player);
        for node in &self.path {
            let next = to_screen(node.position);
            draw_line(last.0, last.1, next.0, next.1, 2.0, SKYBLUE);
            draw_circle(next.0, next.1, 3.0, SKYBLUE);
            last = next;
        }

        let (px, py) = to_screen(self.player);
        draw_circle(px, py, CELL_SIZE * 0.3, YELLOW);

        draw_text(
            &format!(
                "seed {:?}  rooms {}  links {}  | click: walk  O: open door  R: regenerate  J: dump json",
                self.level.config().seed,
                dungeon.rooms.len(),
                dungeon.links.len()
            ),
            10.0,
            24.0,
            20.0,
            WHITE,
        );
    }
}

pub async fn run(config: LevelConfig) {
    let mut viewer = match Viewer::new(config) {
        Ok(viewer) => viewer,
        Err(err) => {
            error!("failed to build level: {err}");
            return;
        }
    };

    loop {
        // Simulation speeds are tuned per 60 Hz frame.
        let delta = get_frame_time() * 60.0;
        viewer.handle_input();
        viewer.step(delta);

        clear_background(BLACK);
        viewer.draw();
        next_frame().await;
    }
}
