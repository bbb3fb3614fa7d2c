use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

use streetsphere::logger::{self, error, info, warn};
use streetsphere::panorama::{
    FillColor, PadConfig, PanoramaDescriptor, PanoramaPadder, PngCompression, StreetViewBundle,
    ViewerTemplate, same_file,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

/// Pad a photo to a 2:1 equirectangular canvas for panorama viewers.
#[derive(Debug, Parser)]
#[command(name = "streetsphere", version, about)]
struct Cli {
    /// Source photograph (PNG or JPEG)
    input: PathBuf,

    /// Output file: the padded image, or a zip archive with --bundle
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a zip with the padded image and a viewer page
    #[arg(long)]
    bundle: bool,

    /// Padding color as #rrggbb or #rrggbbaa
    #[arg(long, default_value = "#000000")]
    fill: FillColor,

    /// JPEG output quality (1-100)
    #[arg(long, default_value_t = 90)]
    jpeg_quality: u8,

    /// PNG output compression
    #[arg(long, value_enum, default_value_t = CompressionArg::Default)]
    png_compression: CompressionArg,

    /// Largest accepted source width or height, 0 disables the limit
    #[arg(long, default_value_t = 30_000)]
    max_dimension: u32,

    /// Pixel budget for images held as a whole frame (JPEG, interlaced PNG), 0 disables the limit
    #[arg(long, default_value_t = 64_000_000)]
    max_frame_pixels: u64,

    /// Custom viewer page template for --bundle
    #[arg(long)]
    template: Option<PathBuf>,

    /// Print the panorama descriptor as JSON on stdout
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn default_output(input: &Path, bundle: bool) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "panorama".to_string());
    if bundle {
        input.with_file_name(format!("{}-streetview.zip", stem))
    } else {
        let ext = input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "png".to_string());
        input.with_file_name(format!("{}-padded.{}", stem, ext))
    }
}

fn write_bundle(cli: &Cli, padder: &PanoramaPadder, output: &Path) -> anyhow::Result<PanoramaDescriptor> {
    let template = match &cli.template {
        Some(path) => ViewerTemplate::from_file(path)?,
        None => ViewerTemplate::default(),
    };
    let image_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut input = BufReader::new(
        File::open(&cli.input).with_context(|| format!("couldn't open {}", cli.input.display()))?,
    );
    let archive = File::create(output).with_context(|| format!("couldn't create {}", output.display()))?;

    let bundle = StreetViewBundle::new(&template);
    let result = bundle.write(padder, &image_name, &mut input, BufWriter::new(archive));
    match result {
        Ok(descriptor) => Ok(descriptor),
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(output) {
                warn!("Could not remove partial archive {}: {}", output.display(), rm);
            }
            Err(e).context("couldn't create street view bundle")
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level());

    info!("Starting streetsphere...");

    let config = PadConfig::builder()
        .fill(cli.fill)
        .jpeg_quality(cli.jpeg_quality)
        .png_compression(cli.png_compression.into())
        .max_dimension((cli.max_dimension > 0).then_some(cli.max_dimension))
        .max_frame_pixels((cli.max_frame_pixels > 0).then_some(cli.max_frame_pixels))
        .build();
    let padder = PanoramaPadder::new(config);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, cli.bundle));
    if output == cli.input || same_file(&cli.input, &output) {
        bail!("refusing to overwrite the input file {}", output.display());
    }

    let descriptor = if cli.bundle {
        write_bundle(&cli, &padder, &output)
    } else {
        padder
            .pad_file(&cli.input, &output)
            .context("couldn't convert image to street view format")
    };

    let descriptor = match descriptor {
        Ok(d) => d,
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            return Err(e);
        }
    };

    if descriptor.is_full_height() {
        warn!("Photo already fills the 2:1 canvas, no padding was added");
    }
    info!(output = %output.display(), "Conversion successful!");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    }

    Ok(())
}
