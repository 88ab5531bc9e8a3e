//! Confetti burst shown after a win
//!
//! Purely cosmetic. Simulation is plain data so it can be tested natively;
//! drawing onto a 2D canvas is wasm only.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{CELEBRATION_PARTICLES, CELEBRATION_SECS, MAX_FRAME_DT};

/// Downward acceleration (pixels/s²)
const GRAVITY: f32 = 420.0;
/// Per-frame velocity retention
const DRAG: f32 = 0.985;

const PALETTE: [&str; 6] = [
    "#ffd166", "#ef476f", "#06d6a0", "#118ab2", "#f78c6b", "#ffffff",
];

/// One confetti piece
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Index into the palette
    pub color: usize,
    /// Seconds left to live
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// 1.0 when fresh, fading to 0.0
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    pub fn css_color(&self) -> &'static str {
        PALETTE[self.color % PALETTE.len()]
    }
}

/// A running celebration
#[derive(Debug, Clone)]
pub struct Celebration {
    particles: Vec<Particle>,
    elapsed: f32,
    last_frame_ms: Option<f64>,
}

impl Celebration {
    /// Fire three fountains from the bottom edge of a `width` x `height` canvas
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        use std::f32::consts::FRAC_PI_2;

        let mut rng = Pcg32::seed_from_u64(seed);
        let fountains: [f32; 3] = [0.2, 0.5, 0.8];

        let particles = (0..CELEBRATION_PARTICLES)
            .map(|i| {
                let origin = Vec2::new(width * fountains[i % fountains.len()], height);
                // Straight up is -π/2 in screen space
                let angle: f32 = -FRAC_PI_2 + rng.random_range(-0.6f32..0.6);
                let speed: f32 = rng.random_range(250.0f32..600.0);
                let max_life: f32 = CELEBRATION_SECS * rng.random_range(0.6f32..1.0);
                Particle {
                    pos: origin,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    color: rng.random_range(0..PALETTE.len()),
                    life: max_life,
                    max_life,
                    size: rng.random_range(4.0f32..9.0),
                }
            })
            .collect();

        Self {
            particles,
            elapsed: 0.0,
            last_frame_ms: None,
        }
    }

    /// Step the burst by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        for particle in self.particles.iter_mut() {
            particle.vel.y += GRAVITY * dt;
            particle.vel *= DRAG;
            particle.pos += particle.vel * dt;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Step from a frame timestamp. Returns false once the burst is over.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let dt = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.update(dt);
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= CELEBRATION_SECS || self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Paint the current frame, clearing the canvas first
    #[cfg(target_arch = "wasm32")]
    pub fn draw(&self, ctx: &web_sys::CanvasRenderingContext2d, width: f64, height: f64) {
        ctx.clear_rect(0.0, 0.0, width, height);
        for particle in &self.particles {
            ctx.set_global_alpha(particle.alpha() as f64);
            ctx.set_fill_style_str(particle.css_color());
            let half = particle.size as f64 / 2.0;
            ctx.fill_rect(
                particle.pos.x as f64 - half,
                particle.pos.y as f64 - half,
                particle.size as f64,
                particle.size as f64,
            );
        }
        ctx.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_starts_at_bottom_moving_up() {
        let celebration = Celebration::new(7, 400.0, 300.0);
        assert_eq!(celebration.particles().len(), CELEBRATION_PARTICLES);
        for particle in celebration.particles() {
            assert_eq!(particle.pos.y, 300.0);
            assert!(particle.vel.y < 0.0);
            assert_eq!(particle.alpha(), 1.0);
        }
    }

    #[test]
    fn test_burst_finishes() {
        let mut celebration = Celebration::new(7, 400.0, 300.0);
        let mut now = 0.0;
        let mut frames = 0;
        while celebration.frame(now) {
            now += 16.0;
            frames += 1;
            assert!(frames < 1000, "celebration never finished");
        }
        assert!(celebration.is_finished());
    }

    #[test]
    fn test_gravity_wins_eventually() {
        let mut celebration = Celebration::new(3, 400.0, 300.0);
        for _ in 0..15 {
            celebration.update(0.1);
        }
        assert!(!celebration.particles().is_empty());
        assert!(celebration.particles().iter().all(|p| p.vel.y > 0.0));
    }
}
