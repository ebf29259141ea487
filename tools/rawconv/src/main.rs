//! RAW heightmap importer: converts flat 8/16-bit RAW files into the
//! native binary heightfield format, with an optional cleanup prepass.

use anyhow::{bail, Context, Result};
use clap::Parser;

use landform_core::{FieldError, HeightField, RawBitDepth, RawByteOrder};

#[derive(Parser, Debug)]
#[command(name = "rawconv", about = "Convert RAW heightmaps to the landform binary format")]
struct Args {
    /// Input RAW file (square grid of unsigned samples, no header).
    input: String,

    /// Output binary heightfield path.
    output: String,

    /// Byte order for 16-bit samples: "mac" (big endian) or "ibm"
    /// (little endian).
    #[arg(long, default_value = "ibm")]
    byte_order: String,

    /// Force 8-bit reinterpretation instead of 16-bit samples.
    #[arg(long)]
    eight_bit: bool,

    /// JSON blob stored as the heightfield's metadata.
    #[arg(long)]
    meta: Option<String>,

    /// Smoothing passes applied before writing.
    #[arg(long, default_value_t = 0)]
    smooth: u32,

    /// Rescale the imported grid to span [0, 1].
    #[arg(long)]
    normalise: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let byte_order = match args.byte_order.as_str() {
        "mac" | "macintosh" => RawByteOrder::Macintosh,
        "ibm" => RawByteOrder::Ibm,
        other => bail!("unknown byte order {other:?}; expected \"mac\" or \"ibm\""),
    };
    let bit_depth = if args.eight_bit {
        RawBitDepth::Eight
    } else {
        RawBitDepth::Sixteen
    };

    let mut field = match HeightField::load_raw(&args.input, byte_order, bit_depth) {
        Ok(field) => field,
        Err(FieldError::AmbiguousRawFormat { bytes }) => bail!(
            "{}: {bytes} bytes do not form a square 16-bit grid; \
             re-run with --eight-bit to force byte samples",
            args.input
        ),
        Err(e) => return Err(e).with_context(|| format!("reading {}", args.input)),
    };

    if let Some(meta) = &args.meta {
        let value: serde_json::Value =
            serde_json::from_str(meta).context("--meta is not valid JSON")?;
        field.set_metadata(serde_json::to_vec(&value)?);
    }
    if args.smooth > 0 {
        field.smooth(args.smooth);
    }
    if args.normalise {
        field.normalise();
    }

    field
        .save_binary(&args.output)
        .with_context(|| format!("writing {}", args.output))?;
    println!(
        "Wrote {} ({}x{}, {} metadata bytes)",
        args.output,
        field.width(),
        field.depth(),
        field.metadata().len()
    );
    Ok(())
}
