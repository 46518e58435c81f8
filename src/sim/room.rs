//! Room extents, edge connectors and the follow camera

use glam::Vec2;

use super::geometry::Rect;
use crate::consts::{FIELD_H, FIELD_W, ROOM_CONNECTION_MAX};

/// A numbered doorway on the room edge leading to another level file
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub bounds: Rect,
}

/// Climbable column; the player snaps to its centre line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ladder {
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Room {
    /// Level file this room was loaded from
    pub name: String,
    pub bounds: Rect,
    /// Connector `i` is the one drawn with digit `i + 1`
    pub connections: [Option<Connector>; ROOM_CONNECTION_MAX],
    /// Target level file for each connector index
    pub filenames: Vec<String>,
    /// Player offset from the connector it left through
    pub transition_offset: Vec2,
}

impl Room {
    /// First connector containing `point`, if any
    pub fn connector_at(&self, point: Vec2) -> Option<usize> {
        self.connections.iter().position(|c| {
            c.as_ref()
                .is_some_and(|connector| connector.bounds.contains(point))
        })
    }

    pub fn filename(&self, connector: usize) -> Option<&str> {
        self.filenames.get(connector).map(String::as_str)
    }
}

/// Top-left corner of the view, clamped to `bounds`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub position: Vec2,
    /// Range the camera position may take; `w`/`h` are the travel, not the view
    pub bounds: Rect,
}

impl Camera {
    /// Centre the view on `target` as far as the bounds allow
    pub fn focus(&mut self, target: Vec2) {
        let x = (target.x - FIELD_W / 2.0).floor();
        let y = (target.y - FIELD_H / 2.0).floor();
        self.position = Vec2::new(
            x.max(self.bounds.x).min(self.bounds.right()),
            y.max(self.bounds.y).min(self.bounds.bottom()),
        );
    }

    pub fn view(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, FIELD_W, FIELD_H)
    }

    /// Whether `rect` is at least partly visible
    pub fn sees(&self, rect: &Rect) -> bool {
        rect.overlaps_strict(&self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_clamps_to_bounds() {
        let mut camera = Camera {
            position: Vec2::ZERO,
            bounds: Rect::new(0.0, 0.0, 320.0, 0.0),
        };
        camera.focus(Vec2::new(10.0, 500.0));
        assert_eq!(camera.position, Vec2::ZERO);
        camera.focus(Vec2::new(400.5, 100.0));
        assert_eq!(camera.position, Vec2::new(240.0, 0.0));
        camera.focus(Vec2::new(2000.0, 100.0));
        assert_eq!(camera.position, Vec2::new(320.0, 0.0));
    }

    #[test]
    fn test_camera_visibility_is_strict() {
        let camera = Camera::default();
        assert!(camera.sees(&Rect::new(316.0, 10.0, 8.0, 8.0)));
        assert!(!camera.sees(&Rect::new(320.0, 10.0, 8.0, 8.0)));
        assert!(!camera.sees(&Rect::new(-8.0, 10.0, 8.0, 8.0)));
    }

    #[test]
    fn test_connector_lookup() {
        let mut room = Room::default();
        room.connections[3] = Some(Connector {
            bounds: Rect::new(320.0, 80.0, 16.0, 24.0),
        });
        assert_eq!(room.connector_at(Vec2::new(325.0, 85.0)), Some(3));
        assert_eq!(room.connector_at(Vec2::new(300.0, 85.0)), None);
    }
}
