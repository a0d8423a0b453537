use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Level of the non-removable base tile drawn under every existing tile.
pub const GROUND_LEVEL: i32 = -1;

/// Screen-space rectangle of one unit sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Two-axis isometric projection.
///
/// ```text
/// screen_x = base_x + x_step * dx - x_step * dy
/// screen_y = base_y + y_step * dx + y_step * dy - level_step * level
/// ```
///
/// Moving +x shifts right and down, +y shifts left and down, and each level
/// shifts straight up by `level_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Screen x of grid offset (0, 0) at level 0.
    pub base_x: i32,
    /// Screen y of grid offset (0, 0) at level 0.
    pub base_y: i32,
    pub x_step: i32,
    pub y_step: i32,
    pub level_step: i32,
    pub sprite_width: u32,
    pub sprite_height: u32,
    /// Size of the surface the sprites are drawn on.
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            base_x: 250,
            base_y: 350,
            x_step: 30,
            y_step: 15,
            level_step: 30,
            sprite_width: 80,
            sprite_height: 80,
            surface_width: 600,
            surface_height: 600,
        }
    }
}

impl Projection {
    /// Sprite rectangle for a grid offset from the view center and a stack level.
    pub fn project(&self, offset: IVec2, level: i32) -> ScreenRect {
        ScreenRect {
            x: self.base_x + self.x_step * offset.x - self.x_step * offset.y,
            y: self.base_y + self.y_step * offset.x + self.y_step * offset.y
                - self.level_step * level,
            width: self.sprite_width,
            height: self.sprite_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_common::Direction;

    #[test]
    fn origin_maps_to_base() {
        let p = Projection::default();
        let r = p.project(IVec2::ZERO, 0);
        assert_eq!((r.x, r.y), (250, 350));
        assert_eq!((r.width, r.height), (80, 80));
    }

    #[test]
    fn axes_follow_diamond_layout() {
        let p = Projection::default();
        let origin = p.project(IVec2::ZERO, 0);
        let east = p.project(Direction::East.delta(), 0);
        let south = p.project(Direction::South.delta(), 0);
        let north = p.project(Direction::North.delta(), 0);

        assert!(east.x > origin.x && east.y > origin.y);
        assert!(south.x < origin.x && south.y > origin.y);
        assert!(north.y < origin.y && north.x > origin.x);
    }

    #[test]
    fn each_step_is_constant() {
        let p = Projection::default();
        for dx in -4..=4 {
            for dy in -4..=4 {
                let here = p.project(IVec2::new(dx, dy), 0);
                for d in Direction::ALL {
                    let next = p.project(IVec2::new(dx, dy) + d.delta(), 0);
                    let expected = p.project(d.delta(), 0);
                    assert_eq!(next.x - here.x, expected.x - 250);
                    assert_eq!(next.y - here.y, expected.y - 350);
                }
            }
        }
    }

    #[test]
    fn level_moves_straight_up() {
        let p = Projection::default();
        for offset in [IVec2::ZERO, IVec2::new(3, -2), IVec2::new(-4, 4)] {
            for level in GROUND_LEVEL..8 {
                let low = p.project(offset, level);
                let high = p.project(offset, level + 1);
                assert_eq!(high.x, low.x);
                assert_eq!(low.y - high.y, p.level_step);
            }
        }
    }

    #[test]
    fn ground_sits_below_level_zero() {
        let p = Projection::default();
        assert_eq!(p.project(IVec2::ZERO, GROUND_LEVEL).y, 380);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let p: Projection = serde_json::from_str(r#"{"base_x": 10}"#).unwrap();
        assert_eq!(p.base_x, 10);
        assert_eq!(p.level_step, Projection::default().level_step);
    }
}
