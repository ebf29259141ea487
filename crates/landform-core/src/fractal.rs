//! Fractal noise synthesis used to seed heightfields.
//!
//! Three accumulation schemes over a seeded coherent-noise source:
//! plain Perlin fBm, Billow (folded all-positive masses), and
//! ridged-multifractal with per-octave spectral weights. The generator
//! is a value-like configuration object; the only derived state is the
//! ridged spectral-weight table, which is rebuilt eagerly whenever the
//! algorithm, persistence, or lacunarity change.
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Fixed table size for the ridged-multifractal spectral weights.
const MAX_OCTAVES: usize = 30;
/// Ridge fold offset applied per octave.
const RIDGE_OFFSET: f64 = 1.0;
/// Weight feedback gain between ridged octaves.
const RIDGE_GAIN: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalAlgorithm {
    Perlin,
    Billow,
    RidgedMulti,
}

/// Full parameter vector for fractal evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FractalConfig {
    pub seed: u32,
    /// Octave count, at least 1.
    pub octaves: u32,
    /// Per-octave amplitude decay; for RidgedMulti it is the spectral
    /// exponent H.
    pub persistence: f64,
    pub frequency: f64,
    pub lacunarity: f64,
    pub offset_x: f64,
    /// Vertical bias added to the accumulated value.
    pub offset_y: f64,
    pub offset_z: f64,
    pub algorithm: FractalAlgorithm,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            persistence: 0.5,
            frequency: 1.0,
            lacunarity: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
            algorithm: FractalAlgorithm::Perlin,
        }
    }
}

pub struct FractalNoiseGenerator {
    config: FractalConfig,
    source: Perlin,
    /// `f^(-persistence)` per octave, `f` chained by lacunarity.
    spectral_weights: Vec<f64>,
}

impl FractalNoiseGenerator {
    pub fn new(mut config: FractalConfig) -> Self {
        config.octaves = config.octaves.max(1);
        let mut generator = Self {
            source: Perlin::new(config.seed),
            config,
            spectral_weights: Vec::new(),
        };
        generator.rebuild_spectral_weights();
        generator
    }

    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    /// Switch the active algorithm. The ridged spectral-weight table is
    /// recomputed here, on assignment, so the next evaluation is always
    /// consistent.
    pub fn set_algorithm(&mut self, algorithm: FractalAlgorithm) {
        self.config.algorithm = algorithm;
        self.rebuild_spectral_weights();
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.config.seed = seed;
        self.source = Perlin::new(seed);
    }

    pub fn set_octaves(&mut self, octaves: u32) {
        self.config.octaves = octaves.max(1);
    }

    pub fn set_persistence(&mut self, persistence: f64) {
        self.config.persistence = persistence;
        self.rebuild_spectral_weights();
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.config.frequency = frequency;
    }

    pub fn set_lacunarity(&mut self, lacunarity: f64) {
        self.config.lacunarity = lacunarity;
        self.rebuild_spectral_weights();
    }

    pub fn set_offsets(&mut self, x: f64, y: f64, z: f64) {
        self.config.offset_x = x;
        self.config.offset_y = y;
        self.config.offset_z = z;
    }

    fn rebuild_spectral_weights(&mut self) {
        let mut f = 1.0f64;
        self.spectral_weights = (0..MAX_OCTAVES)
            .map(|_| {
                let w = f.powf(-self.config.persistence);
                f *= self.config.lacunarity;
                w
            })
            .collect();
    }

    /// Evaluate at `(x, z)`, roughly in [-1, 1] plus the vertical bias.
    pub fn evaluate(&self, x: f64, z: f64) -> f64 {
        let c = &self.config;
        let mut x = (x + c.offset_x) * c.frequency;
        let mut z = (z + c.offset_z) * c.frequency;

        match c.algorithm {
            FractalAlgorithm::Perlin => {
                let mut value = 0.0f64;
                let mut amp = 1.0f64;
                for _ in 0..c.octaves {
                    value += amp * self.source.get([x, z]);
                    x *= c.lacunarity;
                    z *= c.lacunarity;
                    amp *= c.persistence;
                }
                value + c.offset_y
            }
            FractalAlgorithm::Billow => {
                let mut value = 0.0f64;
                let mut amp = 1.0f64;
                for _ in 0..c.octaves {
                    let s = 2.0 * self.source.get([x, z]).abs() - 1.0;
                    value += amp * s;
                    x *= c.lacunarity;
                    z *= c.lacunarity;
                    amp *= c.persistence;
                }
                value + c.offset_y
            }
            FractalAlgorithm::RidgedMulti => {
                let mut value = 0.0f64;
                let mut weight = 1.0f64;
                for octave in 0..c.octaves as usize {
                    let mut s = self.source.get([x, z]);
                    s = RIDGE_OFFSET - s.abs();
                    s *= s;
                    s *= weight;
                    weight = (s * RIDGE_GAIN).clamp(0.0, 1.0);
                    value += s * self.spectral_weights[octave.min(MAX_OCTAVES - 1)];
                    x *= c.lacunarity;
                    z *= c.lacunarity;
                }
                value * 1.25 - 1.0 + c.offset_y
            }
        }
    }

    /// Evaluate and remap into [0, 1]: `clamp01((v + 1) / 2)`.
    pub fn evaluate_normalized(&self, x: f64, z: f64) -> f64 {
        ((self.evaluate(x, z) + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::HeightField;

    fn config(algorithm: FractalAlgorithm) -> FractalConfig {
        FractalConfig {
            seed: 42,
            octaves: 6,
            persistence: 0.5,
            frequency: 1.7,
            lacunarity: 2.0,
            algorithm,
            ..FractalConfig::default()
        }
    }

    #[test]
    fn identical_configs_are_deterministic() {
        let a = FractalNoiseGenerator::new(config(FractalAlgorithm::Perlin));
        let b = FractalNoiseGenerator::new(config(FractalAlgorithm::Perlin));
        for i in 0..50 {
            let x = i as f64 * 0.173;
            let z = i as f64 * 0.091;
            assert_eq!(a.evaluate(x, z), b.evaluate(x, z));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = FractalNoiseGenerator::new(config(FractalAlgorithm::Perlin));
        let mut other = config(FractalAlgorithm::Perlin);
        other.seed = 43;
        let b = FractalNoiseGenerator::new(other);
        let differing = (0..50)
            .filter(|&i| {
                let x = i as f64 * 0.173 + 0.05;
                a.evaluate(x, 0.37) != b.evaluate(x, 0.37)
            })
            .count();
        assert!(differing > 25, "only {differing}/50 samples differ across seeds");
    }

    #[test]
    fn algorithms_produce_distinct_fields() {
        let perlin = FractalNoiseGenerator::new(config(FractalAlgorithm::Perlin));
        let billow = FractalNoiseGenerator::new(config(FractalAlgorithm::Billow));
        let ridged = FractalNoiseGenerator::new(config(FractalAlgorithm::RidgedMulti));
        let p = perlin.evaluate(0.31, 0.77);
        let b = billow.evaluate(0.31, 0.77);
        let r = ridged.evaluate(0.31, 0.77);
        assert!(p != b && b != r && p != r);
    }

    #[test]
    fn switching_to_ridged_before_any_evaluation_is_safe() {
        let mut generator = FractalNoiseGenerator::new(config(FractalAlgorithm::Perlin));
        generator.set_algorithm(FractalAlgorithm::RidgedMulti);
        let v = generator.evaluate(0.5, 0.5);
        assert!(v.is_finite());
    }

    #[test]
    fn normalized_output_stays_in_unit_range() {
        for algorithm in [
            FractalAlgorithm::Perlin,
            FractalAlgorithm::Billow,
            FractalAlgorithm::RidgedMulti,
        ] {
            let generator = FractalNoiseGenerator::new(config(algorithm));
            for i in 0..100 {
                let v = generator.evaluate_normalized(i as f64 * 0.21, i as f64 * 0.13);
                assert!((0.0..=1.0).contains(&v), "{algorithm:?} produced {v}");
            }
        }
    }

    #[test]
    fn octave_count_is_floored_to_one() {
        let mut cfg = config(FractalAlgorithm::Perlin);
        cfg.octaves = 0;
        let generator = FractalNoiseGenerator::new(cfg);
        assert_eq!(generator.config().octaves, 1);
    }

    #[test]
    fn seeded_field_is_non_constant() {
        let generator = FractalNoiseGenerator::new(config(FractalAlgorithm::RidgedMulti));
        let n = 32;
        let mut field = HeightField::new(n, n);
        for z in 0..n {
            for x in 0..n {
                let v = generator.evaluate_normalized(x as f64 / n as f64, z as f64 / n as f64);
                field.set(x, z, v as f32);
            }
        }
        field.refresh_stats();
        assert!(field.max_value() - field.min_value() > 0.01);
    }
}
