//! Seeded 2D gradient noise.
//!
//! Classic lattice gradient noise: each integer lattice point carries one of
//! twelve fixed gradient vectors picked through a seeded permutation table,
//! and a sample blends the four surrounding corner contributions with a
//! quintic fade curve. The field is C¹-continuous and repeats every 256 units
//! on both axes.

/// Base shuffle of `0..=255` that every seed is XOR-ed against.
const BASE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// The twelve edge-midpoint gradients of a cube, projected onto the XY plane.
const GRADIENTS: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

/// Length of the doubled lookup tables.
const TABLE_LEN: usize = 512;

/// A deterministic, seedable 2D gradient noise field.
///
/// Owned state: independent fields never share tables, so tests and
/// parallel generators can hold as many as they like.
#[derive(Clone)]
pub struct NoiseField {
    /// Permutation mirrored into `256..512` so `X + perm[Y + 1]` never wraps.
    perm: [u8; TABLE_LEN],
    /// Gradient picked for each permutation slot, same doubled layout.
    grad: [[f64; 2]; TABLE_LEN],
    seed_value: f64,
}

impl NoiseField {
    /// Create a field initialised from `seed`.
    pub fn new(seed: f64) -> Self {
        let mut field = Self {
            perm: [0; TABLE_LEN],
            grad: [[0.0; 2]; TABLE_LEN],
            seed_value: seed,
        };
        field.seed(seed);
        field
    }

    /// Rebuild both tables from `value`. Same seed, same tables.
    ///
    /// Seeds in `(0, 1)` are scaled by 65 536 first so that values from a
    /// unit random source still spread across the 16-bit seed space. Seeds
    /// below 256 have their low byte copied into the high byte.
    pub fn seed(&mut self, value: f64) {
        let scaled = if value > 0.0 && value < 1.0 {
            value * 65_536.0
        } else {
            value
        };
        let mut seed = scaled.floor() as i64;
        if seed < 256 {
            seed |= seed << 8;
        }
        let low = (seed & 0xff) as u8;
        let high = ((seed >> 8) & 0xff) as u8;

        for (i, &base) in BASE_PERMUTATION.iter().enumerate() {
            let v = if i % 2 == 0 { base ^ low } else { base ^ high };
            let g = GRADIENTS[v as usize % GRADIENTS.len()];
            self.perm[i] = v;
            self.perm[i + 256] = v;
            self.grad[i] = g;
            self.grad[i + 256] = g;
        }
        self.seed_value = value;
    }

    /// The seed value last passed to [`seed`](Self::seed).
    pub fn current_seed(&self) -> f64 {
        self.seed_value
    }

    /// Sample the field at `(x, y)`.
    ///
    /// Returns a value in approximately `[-1, 1]`. Integer lattice points
    /// always sample to exactly zero.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let cell_x = x.floor();
        let cell_y = y.floor();
        let fx = x - cell_x;
        let fy = y - cell_y;
        let xi = (cell_x as i64 & 255) as usize;
        let yi = (cell_y as i64 & 255) as usize;

        let n00 = dot(self.grad[xi + self.perm[yi] as usize], fx, fy);
        let n01 = dot(self.grad[xi + self.perm[yi + 1] as usize], fx, fy - 1.0);
        let n10 = dot(self.grad[xi + 1 + self.perm[yi] as usize], fx - 1.0, fy);
        let n11 = dot(
            self.grad[xi + 1 + self.perm[yi + 1] as usize],
            fx - 1.0,
            fy - 1.0,
        );

        let u = fade(fx);
        let v = fade(fy);
        lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed_value)
            .finish_non_exhaustive()
    }
}

#[inline]
fn dot(g: [f64; 2], x: f64, y: f64) -> f64 {
    g[0] * x + g[1] * y
}

/// Quintic smoothstep `6t⁵ - 15t⁴ + 10t³`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_determinism_same_seed_same_value() {
        let a = NoiseField::new(42.0);
        let b = NoiseField::new(42.0);
        for &(x, y) in &[(0.3, 0.7), (12.5, -3.25), (-100.1, 250.9)] {
            let first = a.sample(x, y);
            assert_eq!(first, a.sample(x, y), "repeat call changed at ({x}, {y})");
            assert_eq!(first, b.sample(x, y), "fresh instance differs at ({x}, {y})");
        }
    }

    #[test]
    fn test_reseed_fully_replaces_tables() {
        let mut field = NoiseField::new(1.0);
        field.seed(42.0);
        let fresh = NoiseField::new(42.0);
        for i in 0..200 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.61;
            assert_eq!(field.sample(x, y), fresh.sample(x, y));
        }
        assert_eq!(field.current_seed(), 42.0);
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = NoiseField::new(1.0);
        let b = NoiseField::new(999.0);
        let differs = (0..100).any(|i| {
            let x = i as f64 * 0.13 + 0.05;
            (a.sample(x, x * 0.5) - b.sample(x, x * 0.5)).abs() > EPSILON
        });
        assert!(differs, "seeds 1 and 999 should not produce the same field");
    }

    #[test]
    fn test_output_bounded() {
        let field = NoiseField::new(1234.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
        for _ in 0..10_000 {
            let x = rng.random_range(-1000.0..1000.0);
            let y = rng.random_range(-1000.0..1000.0);
            let n = field.sample(x, y);
            assert!(
                (-1.0 - 1e-9..=1.0 + 1e-9).contains(&n),
                "sample {n} out of range at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_continuity_small_epsilon() {
        let field = NoiseField::new(7.0);
        let eps = 1e-4;
        for i in 0..1000 {
            let x = i as f64 * 0.173;
            let y = i as f64 * 0.291;
            let delta = (field.sample(x + eps, y) - field.sample(x, y)).abs();
            assert!(delta < 1e-3, "discontinuity at ({x}, {y}): delta={delta}");
        }
    }

    #[test]
    fn test_lattice_points_are_zero() {
        let field = NoiseField::new(42.0);
        for x in -3..4 {
            for y in -3..4 {
                assert_eq!(field.sample(x as f64, y as f64), 0.0);
            }
        }
    }

    #[test]
    fn test_periodic_every_256_units() {
        let field = NoiseField::new(99.0);
        let base = field.sample(3.25, 17.75);
        assert!((field.sample(3.25 + 256.0, 17.75) - base).abs() < EPSILON);
        assert!((field.sample(3.25, 17.75 - 256.0) - base).abs() < EPSILON);
    }

    #[test]
    fn test_known_values() {
        // Cell centres reduce to a sum of gradient components times 0.5 * 0.5.
        let field = NoiseField::new(42.0);
        assert!((field.sample(1.5, 2.5) - (-0.125)).abs() < EPSILON);

        let unit = NoiseField::new(0.5);
        assert!((unit.sample(1.5, 2.5) - (-0.25)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_seed_is_valid_and_stable() {
        let a = NoiseField::new(0.0);
        let b = NoiseField::new(0.0);
        assert_eq!(a.sample(10.3, 4.1), b.sample(10.3, 4.1));
    }

    #[test]
    fn test_fractional_seed_scaled() {
        // 0.5 * 65536 = 32768 = 0x8000: low byte 0x00, high byte 0x80.
        let fractional = NoiseField::new(0.5);
        let integral = NoiseField::new(32_768.0);
        assert_eq!(fractional.perm, integral.perm);
    }

    #[test]
    fn test_small_seed_low_byte_replicated() {
        // 5 becomes 0x0505, so both parities XOR with 5.
        let field = NoiseField::new(5.0);
        for i in 0..256 {
            assert_eq!(field.perm[i], BASE_PERMUTATION[i] ^ 5);
        }
    }

    #[test]
    fn test_parity_selects_seed_byte() {
        // 0x1234: even slots XOR 0x34, odd slots XOR 0x12.
        let field = NoiseField::new(0x1234 as f64);
        assert_eq!(field.perm[0], BASE_PERMUTATION[0] ^ 0x34);
        assert_eq!(field.perm[1], BASE_PERMUTATION[1] ^ 0x12);
        assert_eq!(field.perm[256], field.perm[0]);
        assert_eq!(field.grad[300], field.grad[44]);
    }

    #[test]
    fn test_fade_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < EPSILON);
        assert_eq!(lerp(2.0, 4.0, 0.25), 2.5);
    }
}
