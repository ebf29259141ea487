//! Diagnostic visualizer — writes grayscale debug maps to data/debug/.
//! Not part of the main pipeline; no tests, no clippy target.

use std::fs;
use std::path::Path;

use landform_core::analysis::{
    aspect_map, curvature_map, flow_map, normalized_slope_map, AspectKind, CurvatureKind,
};
use landform_core::erosion::{erode_hydraulic, erode_thermal};
use landform_core::{FractalAlgorithm, FractalConfig, FractalNoiseGenerator, HeightField};

const N: usize = 512;

// ── Image helpers ─────────────────────────────────────────────────────────────

fn write_map(field: &HeightField, out_dir: &Path, name: &str) {
    let mut img = image::GrayImage::new(field.width() as u32, field.depth() as u32);
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let v = (field.get(x, z).clamp(0.0, 1.0) * 255.0) as u8;
            img.put_pixel(x as u32, z as u32, image::Luma([v]));
        }
    }
    let path = out_dir.join(name);
    img.save(&path).expect("failed to save debug map");
    println!("Wrote {}", path.display());
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let generator = FractalNoiseGenerator::new(FractalConfig {
        seed: 42,
        octaves: 8,
        persistence: 0.5,
        frequency: 3.0,
        lacunarity: 2.0,
        algorithm: FractalAlgorithm::RidgedMulti,
        ..FractalConfig::default()
    });

    println!("Seeding {N}x{N} ridged-multifractal field…");
    let mut field = HeightField::new(N, N);
    for z in 0..N {
        for x in 0..N {
            let v = generator.evaluate_normalized(x as f64 / N as f64, z as f64 / N as f64);
            field.set(x, z, v as f32);
        }
    }
    field.normalise();

    println!("Running thermal + hydraulic erosion…");
    erode_thermal(&mut field, 20, 0.0, 0.05, &[]).expect("thermal erosion");
    let rain = vec![0.005f32; N * N];
    let mut sediment = Vec::new();
    erode_hydraulic(&mut field, 30, &[], &rain, 5, 0.3, &mut sediment).expect("hydraulic erosion");

    let out_dir = Path::new("data/debug");
    fs::create_dir_all(out_dir).expect("cannot create data/debug/");

    write_map(&field, out_dir, "height.png");
    write_map(&normalized_slope_map(&field), out_dir, "slope.png");
    write_map(
        &curvature_map(&field, CurvatureKind::Average),
        out_dir,
        "curvature.png",
    );
    write_map(&aspect_map(&field, AspectKind::Aspect), out_dir, "aspect.png");
    write_map(&flow_map(&field, 16), out_dir, "flow.png");

    let mut sediment_field =
        HeightField::from_values(N, N, sediment).expect("sediment accumulator is grid-sized");
    sediment_field.normalise();
    write_map(&sediment_field, out_dir, "sediment.png");
}
