//! Falling number entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INVADER_START_Y;

/// One falling number
///
/// Horizontal position is chosen at spawn and never changes; only `y`
/// advances, which is why `pos` is not public.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: u32,
    pub value: u32,
    /// Fall speed in pixels/second
    pub speed: f32,
    pos: Vec2,
}

impl Invader {
    pub fn new(id: u32, value: u32, x: f32, speed: f32) -> Self {
        Self {
            id,
            value,
            speed,
            pos: Vec2::new(x, INVADER_START_Y),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Fall for `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.speed * dt.max(0.0);
    }

    /// The number the player must type to clear this invader
    #[inline]
    pub fn answer(&self, multiplier: u32) -> u32 {
        self.value * multiplier
    }

    /// Has it scrolled past the bottom of a play area `height` pixels tall?
    #[inline]
    pub fn has_escaped(&self, height: f32) -> bool {
        self.pos.y > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_only_moves_down() {
        let mut invader = Invader::new(1, 7, 120.0, 50.0);
        invader.advance(0.5);
        assert_eq!(invader.pos().x, 120.0);
        assert!((invader.pos().y - (INVADER_START_Y + 25.0)).abs() < 1e-4);

        // Negative dt (clock skew) never moves it back up
        let before = invader.pos().y;
        invader.advance(-1.0);
        assert_eq!(invader.pos().y, before);
    }

    #[test]
    fn test_escape_is_strictly_past_bottom() {
        let mut invader = Invader::new(1, 3, 0.0, 100.0);
        invader.advance(6.4);
        assert!(!invader.has_escaped(610.0));
        invader.advance(0.2);
        assert!(invader.has_escaped(610.0));
    }

    #[test]
    fn test_answer() {
        assert_eq!(Invader::new(1, 12, 0.0, 1.0).answer(7), 84);
    }
}
