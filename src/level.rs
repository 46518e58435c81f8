//! Level files
//!
//! A level is a whitespace-separated text file:
//!
//! ```text
//! <tiles_w> <tiles_h> <screens_w> <screens_h>
//! +next_room.txt +other_room.txt ...
//! <grid, tiles_w * screens_w cells wide>
//! ```
//!
//! Each grid cell covers `40 / tiles_w` by `30 / tiles_h` map tiles. Parsing
//! turns the grid into an ordered list of [`Placement`]s that
//! [`World::load_level`](crate::sim::World::load_level) replays.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Vec2;
use thiserror::Error;

use crate::consts::{
    FIELD_H, FIELD_H_TILES, FIELD_W, FIELD_W_TILES, ROOM_CONNECTION_MAX, TILE_SIZE,
};
use crate::sim::geometry::Rect;

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read level {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("level header is missing {0}")]
    MissingHeader(&'static str),
    #[error("level header {field} must be a positive number, got {value:?}")]
    InvalidHeader { field: &'static str, value: String },
    #[error("{tiles} cells do not evenly divide the {screen}-tile screen")]
    InvalidTileScale { tiles: usize, screen: usize },
    #[error("connection name is empty")]
    EmptyConnectionName,
    #[error("{screens_w}x{screens_h} screens is too large a room")]
    GridTooLarge { screens_w: usize, screens_h: usize },
    #[error("grid has {found} cells, expected {expected}")]
    GridSizeMismatch { expected: usize, found: usize },
    #[error("unknown tile {ch:?} at column {column}, row {row}")]
    UnknownTile { ch: char, column: usize, row: usize },
    #[error("level {name} has no player spawn")]
    MissingPlayerSpawn { name: String },
    #[error("level {0} not found")]
    NotFound(String),
}

/// Something placed in the room by the level file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Player,
    Seeker,
    /// Never-expiring health pickup
    Item { large: bool },
    Drone { flip: bool },
    Walker { flip: bool },
    Sentry { flip: bool },
    Boss,
    Boulder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Wall(Rect),
    Ladder(Rect),
    /// Edge doorway; `index` is the digit minus one
    Connector { index: usize, bounds: Rect },
    Spawn { kind: Spawn, at: Vec2 },
}

/// Parsed level, ready to be loaded into a world
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub tiles_w: usize,
    pub tiles_h: usize,
    pub screens_w: usize,
    pub screens_h: usize,
    /// Target level for each connector index
    pub filenames: Vec<String>,
    /// In file order
    pub placements: Vec<Placement>,
}

impl LevelLayout {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.screens_w as f32 * FIELD_W,
            self.screens_h as f32 * FIELD_H,
        )
    }

    /// Travel range of the camera's top-left corner
    pub fn camera_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.screens_w.saturating_sub(1) as f32 * FIELD_W,
            self.screens_h.saturating_sub(1) as f32 * FIELD_H,
        )
    }

    pub fn player_spawn(&self) -> Option<Vec2> {
        self.placements.iter().find_map(|p| match p {
            Placement::Spawn {
                kind: Spawn::Player,
                at,
            } => Some(*at),
            _ => None,
        })
    }

    pub fn connector(&self, index: usize) -> Option<Rect> {
        self.placements.iter().rev().find_map(|p| match p {
            Placement::Connector { index: i, bounds } if *i == index => Some(*bounds),
            _ => None,
        })
    }

    pub fn walls(&self) -> impl Iterator<Item = &Rect> {
        self.placements.iter().filter_map(|p| match p {
            Placement::Wall(r) => Some(r),
            _ => None,
        })
    }
}

fn header<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<usize, LevelLoadError> {
    let token = tokens.next().ok_or(LevelLoadError::MissingHeader(field))?;
    match token.parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(LevelLoadError::InvalidHeader {
            field,
            value: token.to_string(),
        }),
    }
}

/// Map tiles per grid cell along one axis
fn scale(tiles: usize, screen: usize) -> Result<usize, LevelLoadError> {
    if screen % tiles != 0 {
        return Err(LevelLoadError::InvalidTileScale { tiles, screen });
    }
    Ok(screen / tiles)
}

/// Mutable cell grid consumed as placements are emitted
struct Grid {
    cells: Vec<char>,
    pitch: usize,
    rows: usize,
}

impl Grid {
    fn at(&self, x: usize, y: usize) -> char {
        self.cells[x + y * self.pitch]
    }

    fn set(&mut self, x: usize, y: usize, c: char) {
        self.cells[x + y * self.pitch] = c;
    }

    /// Cells of a wall run: plain walls and ladders set into walls
    fn is_solid(&self, x: usize, y: usize) -> bool {
        matches!(self.at(x, y), '#' | 'L')
    }

    /// Grow a wall rectangle right, then down, from `(x, y)`
    fn take_wall(&mut self, x: usize, y: usize) -> (usize, usize) {
        let mut w = 1;
        while x + w < self.pitch && self.is_solid(x + w, y) {
            w += 1;
        }
        let mut h = 1;
        while y + h < self.rows && (x..x + w).all(|cx| self.is_solid(cx, y + h)) {
            h += 1;
        }
        for cy in y..y + h {
            for cx in x..x + w {
                let rest = if self.at(cx, cy) == '#' { ' ' } else { 'l' };
                self.set(cx, cy, rest);
            }
        }
        (w, h)
    }

    /// Extend a ladder down from `(x, y)`
    fn take_ladder(&mut self, x: usize, y: usize) -> usize {
        let mut h = 1;
        while y + h < self.rows {
            match self.at(x, y + h) {
                'l' => self.set(x, y + h, '-'),
                'L' => self.set(x, y + h, '#'),
                _ => break,
            }
            h += 1;
        }
        h
    }

    /// Consume a run of `digit` starting at `(x, y)` and stepping by `(dx, dy)`
    fn take_run(&mut self, digit: char, x: usize, y: usize, dx: usize, dy: usize) -> usize {
        self.set(x, y, ' ');
        let mut n = 1;
        loop {
            let (cx, cy) = (x + dx * n, y + dy * n);
            if cx >= self.pitch || cy >= self.rows || self.at(cx, cy) != digit {
                break;
            }
            self.set(cx, cy, ' ');
            n += 1;
        }
        n
    }
}

fn spawn(kind: Spawn, at: Vec2) -> Placement {
    Placement::Spawn { kind, at }
}

fn tile_rect(x: usize, y: usize, w: usize, h: usize) -> Rect {
    Rect::tile_aligned(x as i32, y as i32, w as i32, h as i32)
}

/// Parse level text into a layout
pub fn parse(text: &str) -> Result<LevelLayout, LevelLoadError> {
    let mut tokens = text.split_whitespace().peekable();
    let tiles_w = header(&mut tokens, "tiles_w")?;
    let tiles_h = header(&mut tokens, "tiles_h")?;
    let screens_w = header(&mut tokens, "screens_w")?;
    let screens_h = header(&mut tokens, "screens_h")?;
    let xc = scale(tiles_w, FIELD_W_TILES)?;
    let yc = scale(tiles_h, FIELD_H_TILES)?;

    let mut filenames = Vec::new();
    while let Some(token) = tokens.next_if(|t| t.starts_with('+')) {
        let name = &token[1..];
        if name.is_empty() {
            return Err(LevelLoadError::EmptyConnectionName);
        }
        if filenames.len() < ROOM_CONNECTION_MAX {
            filenames.push(name.to_string());
        } else {
            log::warn!("ignoring connection {name}: only {ROOM_CONNECTION_MAX} allowed");
        }
    }

    let too_large = || LevelLoadError::GridTooLarge {
        screens_w,
        screens_h,
    };
    let pitch = tiles_w.checked_mul(screens_w).ok_or_else(too_large)?;
    let rows = tiles_h.checked_mul(screens_h).ok_or_else(too_large)?;
    let expected = pitch.checked_mul(rows).ok_or_else(too_large)?;
    let cells: Vec<char> = tokens.flat_map(str::chars).collect();
    if cells.len() != expected {
        return Err(LevelLoadError::GridSizeMismatch {
            expected,
            found: cells.len(),
        });
    }
    let mut grid = Grid { cells, pitch, rows };

    // Pixel size of one cell
    let cell_w = (xc as f32) * TILE_SIZE;
    let cell_h = (yc as f32) * TILE_SIZE;
    let mut placements = Vec::new();
    let mut i = 0;
    while i < grid.cells.len() {
        let (col, row) = (i % pitch, i / pitch);
        // Creatures stand on the corner one tile into their cell
        let inset = Vec2::new(
            ((col * xc + 1) as f32) * TILE_SIZE,
            ((row * yc + 1) as f32) * TILE_SIZE,
        );
        let corner = Vec2::new(((col * xc) as f32) * TILE_SIZE, ((row * yc) as f32) * TILE_SIZE);
        match grid.cells[i] {
            '@' => {
                let at = Vec2::new(
                    col as f32 * cell_w + (0.5 * cell_w - 7.0),
                    row as f32 * cell_h + (0.5 * cell_h - 7.0),
                );
                placements.push(spawn(Spawn::Player, at.trunc()));
            }
            's' => placements.push(spawn(Spawn::Seeker, inset)),
            c @ ('i' | 'I') => {
                placements.push(spawn(Spawn::Item { large: c == 'I' }, inset));
            }
            c @ ('b' | 'B') => {
                placements.push(spawn(Spawn::Drone { flip: c == 'b' }, inset));
            }
            c @ ('d' | 'D') => {
                placements.push(spawn(Spawn::Walker { flip: c == 'd' }, inset));
            }
            c @ ('p' | 'P') => {
                placements.push(spawn(Spawn::Sentry { flip: c == 'p' }, inset));
            }
            'M' => placements.push(spawn(Spawn::Boss, corner)),
            'O' => placements.push(spawn(Spawn::Boulder, corner)),
            'l' => {
                let h = grid.take_ladder(col, row);
                placements.push(Placement::Ladder(tile_rect(col * xc, row * yc, xc, h * yc)));
            }
            c @ ('#' | 'L') => {
                let (w, h) = grid.take_wall(col, row);
                let bounds =
                    tile_rect(col * xc, row * yc, w * xc, h * yc).translate(Vec2::splat(0.5));
                placements.push(Placement::Wall(bounds));
                if c == 'L' {
                    // The cell is now a ladder; visit it again
                    continue;
                }
            }
            c @ '1'..='9' => {
                let index = c as usize - '1' as usize;
                let bounds = if col == 0 {
                    let h = grid.take_run(c, col, row, 0, 1);
                    Some(Rect::tile_aligned(-1, (row * yc) as i32, 2, (h * yc) as i32))
                } else if row == 0 {
                    let w = grid.take_run(c, col, row, 1, 0);
                    Some(Rect::tile_aligned((col * xc) as i32, -1, (w * xc) as i32, 2))
                } else if col == pitch - 1 {
                    let h = grid.take_run(c, col, row, 0, 1);
                    Some(tile_rect((pitch - 1) * xc + 1, row * yc, 2, h * yc))
                } else if row == rows - 1 {
                    let w = grid.take_run(c, col, row, 1, 0);
                    Some(tile_rect(col * xc, (rows - 1) * yc + 1, w * xc, 2))
                } else {
                    log::warn!("connector {c} at column {col}, row {row} is not on the room edge");
                    grid.set(col, row, ' ');
                    None
                };
                if let Some(bounds) = bounds {
                    placements.push(Placement::Connector { index, bounds });
                }
            }
            '.' | '-' | '0' | '_' | ' ' => {}
            ch => {
                return Err(LevelLoadError::UnknownTile {
                    ch,
                    column: col,
                    row,
                });
            }
        }
        i += 1;
    }

    Ok(LevelLayout {
        tiles_w,
        tiles_h,
        screens_w,
        screens_h,
        filenames,
        placements,
    })
}

/// Where level files come from
pub trait LevelSource {
    /// Raw text of level `name`
    fn load(&self, name: &str) -> Result<String, LevelLoadError>;

    fn layout(&self, name: &str) -> Result<LevelLayout, LevelLoadError> {
        parse(&self.load(name)?)
    }
}

/// Level files in a directory
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    root: PathBuf,
}

impl DirLevelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LevelSource for DirLevelSource {
    fn load(&self, name: &str) -> Result<String, LevelLoadError> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LevelLoadError::NotFound(name.to_string())
            } else {
                LevelLoadError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

/// Levels held in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemoryLevels {
    levels: HashMap<String, String>,
}

impl MemoryLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        self.levels.insert(name.to_string(), text.into());
    }
}

impl LevelSource for MemoryLevels {
    fn load(&self, name: &str) -> Result<String, LevelLoadError> {
        self.levels
            .get(name)
            .cloned()
            .ok_or_else(|| LevelLoadError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four-by-three cells on one screen, 10x10 tiles each
    fn small(grid: &str) -> String {
        format!("4 3 1 1 +next.txt\n{grid}")
    }

    #[test]
    fn test_header_and_geometry() {
        let err = parse("40 30 2 1 +a.txt +b.txt\n").unwrap_err();
        assert!(matches!(
            err,
            LevelLoadError::GridSizeMismatch {
                expected: 2400,
                found: 0
            }
        ));

        let layout = parse(&small("....\n....\n....")).unwrap();
        assert_eq!(layout.filenames, vec!["next.txt"]);
        assert_eq!(layout.bounds(), Rect::new(0.0, 0.0, 320.0, 240.0));
        assert_eq!(layout.camera_bounds(), Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(layout.placements.is_empty());
    }

    #[test]
    fn test_walls_merge_greedily() {
        let layout = parse(&small("##..\n##.#\n...#")).unwrap();
        let walls: Vec<Rect> = layout.walls().copied().collect();
        assert_eq!(
            walls,
            vec![
                Rect::new(0.5, 0.5, 160.0, 160.0),
                Rect::new(240.5, 80.5, 80.0, 160.0),
            ]
        );
    }

    #[test]
    fn test_ladder_in_wall_makes_both() {
        let layout = parse(&small("#L..\n.l..\n.l..")).unwrap();
        assert_eq!(
            layout.placements,
            vec![
                Placement::Wall(Rect::new(0.5, 0.5, 160.0, 80.0)),
                Placement::Ladder(Rect::new(80.0, 0.0, 80.0, 240.0)),
            ]
        );
    }

    #[test]
    fn test_edge_connectors() {
        let text = "40 30 1 1\n".to_string()
            + &(0..30)
                .map(|row| {
                    let mut line = vec!['.'; 40];
                    if (10..13).contains(&row) {
                        line[0] = '1';
                        line[39] = '4';
                    }
                    if row == 0 {
                        line[5] = '2';
                        line[6] = '2';
                    }
                    line.into_iter().collect::<String>() + "\n"
                })
                .collect::<String>();
        let layout = parse(&text).unwrap();
        assert_eq!(layout.connector(0), Some(Rect::new(-8.0, 80.0, 16.0, 24.0)));
        assert_eq!(layout.connector(3), Some(Rect::new(320.0, 80.0, 16.0, 24.0)));
        assert_eq!(layout.connector(1), Some(Rect::new(40.0, -8.0, 16.0, 16.0)));
        assert_eq!(layout.connector(2), None);
    }

    #[test]
    fn test_spawn_positions() {
        let layout = parse(&small("@...\n.d..\n..MO")).unwrap();
        assert_eq!(layout.player_spawn(), Some(Vec2::new(33.0, 33.0)));
        assert!(layout.placements.contains(&Placement::Spawn {
            kind: Spawn::Walker { flip: true },
            at: Vec2::new(88.0, 88.0),
        }));
        assert!(layout.placements.contains(&Placement::Spawn {
            kind: Spawn::Boss,
            at: Vec2::new(160.0, 160.0),
        }));
        assert!(layout.placements.contains(&Placement::Spawn {
            kind: Spawn::Boulder,
            at: Vec2::new(240.0, 160.0),
        }));
    }

    #[test]
    fn test_extra_connections_are_skipped() {
        let names: String = (1..=11).map(|n| format!(" +r{n}.txt")).collect();
        let layout = parse(&format!("4 3 1 1{names}\n....\n....\n....")).unwrap();
        assert_eq!(layout.filenames.len(), ROOM_CONNECTION_MAX);
        assert_eq!(layout.filenames[8], "r9.txt");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("4 3 1"), Err(LevelLoadError::MissingHeader("screens_h"))));
        assert!(matches!(
            parse("4 x 1 1"),
            Err(LevelLoadError::InvalidHeader { field: "tiles_h", .. })
        ));
        assert!(matches!(
            parse("7 3 1 1"),
            Err(LevelLoadError::InvalidTileScale { tiles: 7, screen: 40 })
        ));
        assert!(matches!(
            parse("4 3 1 1 + ...."),
            Err(LevelLoadError::EmptyConnectionName)
        ));
        assert!(matches!(
            parse(&small("....\n.?..\n....")),
            Err(LevelLoadError::UnknownTile { ch: '?', column: 1, row: 1 })
        ));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        let huge = format!("40 30 {} 1", usize::MAX / 2);
        assert!(matches!(parse(&huge), Err(LevelLoadError::GridTooLarge { .. })));
        assert!(matches!(
            parse("40 30 1000000000000000000 1"),
            Err(LevelLoadError::GridTooLarge { .. })
        ));
        let rows = format!("1 1 {} {}", 1u64 << 33, 1u64 << 33);
        assert!(matches!(parse(&rows), Err(LevelLoadError::GridTooLarge { .. })));
    }

    #[test]
    fn test_memory_source() {
        let levels = MemoryLevels::new().with("a.txt", small("....\n....\n...."));
        assert!(levels.layout("a.txt").is_ok());
        assert!(matches!(levels.load("b.txt"), Err(LevelLoadError::NotFound(_))));
    }
}
