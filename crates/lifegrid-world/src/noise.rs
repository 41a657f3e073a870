//! Noise sources for the terrain model.

use lifegrid_core::NoiseParams;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A seeded 3D scalar field sampled as `(x, y, time)`
pub trait NoiseSource {
    /// Sample the field. Implementations return values in [-1, 1].
    fn sample(&self, x: f64, y: f64, t: f64) -> f64;

    /// Replace the field with one generated from a new seed
    fn reseed(&mut self, seed: u64);
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad3(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 != 0 { -u } else { u }) + (if h & 2 != 0 { -v } else { v })
}

/// Octave-summed improved Perlin noise over a seeded permutation table.
///
/// Each octave scales the sample point by `beta` and divides its amplitude
/// by `alpha`.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    perm: [u8; 512],
    octaves: u32,
    alpha: f64,
    beta: f64,
    seed: u64,
}

impl PerlinNoise {
    pub fn new(params: &NoiseParams, seed: u64) -> Self {
        Self {
            perm: Self::permutation(seed),
            octaves: params.octaves.max(1),
            alpha: params.alpha,
            beta: params.beta,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn permutation(seed: u64) -> [u8; 512] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        perm
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Single octave, approximately [-1, 1]. Zero on every lattice point.
    fn octave(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let near = lerp(
            lerp(
                grad3(self.perm[aa], xf, yf, zf),
                grad3(self.perm[ba], xf - 1.0, yf, zf),
                u,
            ),
            lerp(
                grad3(self.perm[ab], xf, yf - 1.0, zf),
                grad3(self.perm[bb], xf - 1.0, yf - 1.0, zf),
                u,
            ),
            v,
        );
        let far = lerp(
            lerp(
                grad3(self.perm[aa + 1], xf, yf, zf - 1.0),
                grad3(self.perm[ba + 1], xf - 1.0, yf, zf - 1.0),
                u,
            ),
            lerp(
                grad3(self.perm[ab + 1], xf, yf - 1.0, zf - 1.0),
                grad3(self.perm[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
                u,
            ),
            v,
        );

        lerp(near, far, w)
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        let (mut px, mut py, mut pt) = (x, y, t);
        let mut scale = 1.0;
        let mut sum = 0.0;

        for _ in 0..self.octaves {
            sum += self.octave(px, py, pt) / scale;
            scale *= self.alpha;
            px *= self.beta;
            py *= self.beta;
            pt *= self.beta;
        }

        sum.clamp(-1.0, 1.0)
    }

    fn reseed(&mut self, seed: u64) {
        self.perm = Self::permutation(seed);
        self.seed = seed;
    }
}
