//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic for a given seed, so camera shake and gameplay randomness
//! replay identically.

use glam::Vec2;

use super::Color;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Reseed in place.
    pub fn seed(&mut self, seed: u64) {
        *self = Rng::new(seed);
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn gen(&mut self) -> f32 {
        // Top 24 bits fill an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform value in `[lo, hi)`.
    pub fn gen_range(&mut self, lo: f32, hi: f32) -> f32 {
        self.gen() * (hi - lo) + lo
    }

    pub fn gen_vec2(&mut self, lo: Vec2, hi: Vec2) -> Vec2 {
        Vec2::new(self.gen_range(lo.x, hi.x), self.gen_range(lo.y, hi.y))
    }

    pub fn gen_color(&mut self, lo: Color, hi: Color) -> Color {
        Color::rgba(
            self.gen_range(lo.r, hi.r),
            self.gen_range(lo.g, hi.g),
            self.gen_range(lo.b, hi.b),
            self.gen_range(lo.a, hi.a),
        )
    }

    /// Generate a random integer in `[0, upper_bound)`.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound.max(1) as u64) as u32
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.gen() <= p
    }

    pub fn choose<'a, T>(&mut self, list: &'a [T]) -> Option<&'a T> {
        if list.is_empty() {
            return None;
        }
        list.get(self.next_int(list.len() as u32) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = Rng::new(42);
        let mut rng2 = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(rng1.next_int(1000), rng2.next_int(1000));
        }
    }

    #[test]
    fn rng_zero_seed_handled() {
        let mut rng = Rng::new(0);
        let _ = rng.next_int(100);
    }

    #[test]
    fn gen_is_unit_interval() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.gen();
            assert!((0.0..1.0).contains(&v), "gen out of range: {}", v);
        }
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = Rng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}
