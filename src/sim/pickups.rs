//! Health pickups
//!
//! Items placed in the level never expire. Items dropped by destroyed
//! enemies expire after [`item::LIFETIME_TICKS`] or as soon as they leave
//! the view, blinking for their last [`item::BLINK_TICKS`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geometry::Rect;
use super::pool::Pool;
use super::state::World;
use crate::tuning::{item, player};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    /// Centre of the item
    pub position: Vec2,
    pub heal: i32,
    /// Two-frame idle animation
    pub frames: [u8; 2],
    /// Ticks left before it vanishes; `None` never expires
    pub timer: Option<u32>,
}

impl Item {
    pub fn small(position: Vec2, timer: Option<u32>) -> Self {
        Self {
            position,
            heal: item::SMALL_HEAL,
            frames: item::SMALL_FRAMES,
            timer,
        }
    }

    pub fn large(position: Vec2, timer: Option<u32>) -> Self {
        Self {
            position,
            heal: item::LARGE_HEAL,
            frames: item::LARGE_FRAMES,
            timer,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.position, item::WIDTH, item::HEIGHT)
    }

    /// Sprite to draw on simulation frame `frame`, or `None` while blinked out
    pub fn sprite(&self, frame: u64) -> Option<u8> {
        let phase = ((frame / 8) % 2) as usize;
        let blinking = self.timer.is_some_and(|t| t <= item::BLINK_TICKS);
        if blinking && phase == 0 {
            return None;
        }
        Some(self.frames[phase])
    }
}

/// Roll for a dropped item at `at`. One roll in eight drops something, and a
/// quarter of those are large.
pub fn random_drop(rng: &mut Pcg32, items: &mut Pool<Item>, at: Vec2) {
    let roll: u32 = rng.random_range(0..item::DROP_DIE);
    if roll >= item::DROP_BELOW {
        return;
    }
    let timer = Some(item::LIFETIME_TICKS);
    let drop = if roll % 4 == 0 {
        Item::large(at, timer)
    } else {
        Item::small(at, timer)
    };
    if let Err(err) = items.push(drop) {
        log::trace!("item drop skipped: {err}");
    }
}

impl World {
    pub(crate) fn tick_items(&mut self) {
        let World {
            items,
            player: p,
            walls,
            camera,
            fx,
            ..
        } = self;
        let mut i = 0;
        while i < items.len() {
            let it = &mut items[i];
            let bounds = it.bounds();
            if p.alive && p.hitpoints < player::MAX_HITPOINTS && bounds.overlaps(&p.bounds()) {
                p.heal(it.heal, fx);
                items.swap_remove(i);
                continue;
            }
            if let Some(timer) = it.timer {
                if timer == 0 || !camera.sees(&bounds) {
                    items.swap_remove(i);
                    continue;
                }
                it.timer = Some(timer - 1);
            }
            let motion = walls.move_and_slide(&bounds, Vec2::new(0.0, item::FALL_SPEED));
            it.position += motion.displacement;
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_support::{floor_world, open_world};
    use rand::SeedableRng;

    #[test]
    fn test_item_falls_and_rests_on_floor() {
        let mut world = floor_world();
        world.player.position.x = 40.0;
        world.items.push(Item::small(Vec2::new(200.0, 100.0), None)).unwrap();
        for _ in 0..100 {
            world.tick_items();
        }
        let bounds = world.items[0].bounds();
        assert!(bounds.bottom() <= 200.0 && bounds.bottom() > 199.5);
    }

    #[test]
    fn test_pickup_heals_only_when_hurt() {
        let mut world = open_world();
        let at = world.player.position;
        world.items.push(Item::large(at, None)).unwrap();
        world.tick_items();
        assert_eq!(world.items.len(), 1);

        world.player.hitpoints = 50;
        world.tick_items();
        assert!(world.items.is_empty());
        assert_eq!(world.player.hitpoints, 90);
    }

    #[test]
    fn test_dropped_item_expires() {
        let mut world = open_world();
        world.player.position = Vec2::new(20.0, 20.0);
        world.items.push(Item::small(Vec2::new(200.0, 100.0), Some(3))).unwrap();
        for _ in 0..3 {
            world.tick_items();
            assert_eq!(world.items.len(), 1);
        }
        world.tick_items();
        assert!(world.items.is_empty());
    }

    #[test]
    fn test_dropped_item_offscreen_vanishes() {
        let mut world = open_world();
        world.items.push(Item::small(Vec2::new(400.0, 100.0), Some(500))).unwrap();
        world.items.push(Item::small(Vec2::new(400.0, 100.0), None)).unwrap();
        world.tick_items();
        assert_eq!(world.items.len(), 1);
        assert_eq!(world.items[0].timer, None);
    }

    #[test]
    fn test_blink_hides_every_other_phase() {
        let mut it = Item::small(Vec2::ZERO, None);
        assert_eq!(it.sprite(0), Some(12));
        assert_eq!(it.sprite(8), Some(13));
        it.timer = Some(item::BLINK_TICKS);
        assert_eq!(it.sprite(0), None);
        assert_eq!(it.sprite(8), Some(13));
    }

    #[test]
    fn test_drop_rate_is_one_in_eight() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut drops = 0;
        for _ in 0..6400 {
            let mut items = Pool::with_capacity(1);
            random_drop(&mut rng, &mut items, Vec2::ZERO);
            drops += items.len();
        }
        // 800 expected
        assert!((600..1000).contains(&drops), "{drops} drops");
    }
}
