use clap::Parser;
use std::fs;
use std::path::PathBuf;
use dominant_colors_wasm::{
    PaletteConfig, ResizeTarget, extract_palette_bytes, from_hex, names, rgb_string,
};
use anyhow::{Context, Result, anyhow, bail};

/// Print the dominant colors of images (native wrapper).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required_unless_present = "nearest")]
    inputs: Vec<PathBuf>,

    /// JSON configuration file; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of dominant colors
    #[arg(short = 'k', long)]
    palette_size: Option<usize>,

    /// Shrink so the longest side is at most this many pixels
    #[arg(short = 'm', long, conflicts_with = "exact")]
    max_dimension: Option<u32>,

    /// Resample to a fixed resolution, e.g. 600x400
    #[arg(short = 'x', long, value_parser = parse_dimensions)]
    exact: Option<(u32, u32)>,

    /// k-means seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Show the nearest CSS color name for each color
    #[arg(short, long)]
    names: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Only print the CSS name closest to this hex color or name
    #[arg(long)]
    nearest: Option<String>,
}

fn parse_dimensions(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok((w, h))
}

fn build_config(args: &Args) -> Result<PaletteConfig> {
    let mut config = match &args.config {
        Some(path) => PaletteConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PaletteConfig::default(),
    };

    if let Some(k) = args.palette_size {
        config.palette_size = k;
    }
    if let Some(max_dimension) = args.max_dimension {
        config.resize = ResizeTarget::Thumbnail { max_dimension };
    }
    if let Some((width, height)) = args.exact {
        config.resize = ResizeTarget::Exact { width, height };
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.names {
        config.enable_naming = true;
    }
    Ok(config)
}

fn print_nearest(query: &str) -> Result<()> {
    let color = from_hex(query)
        .ok()
        .or_else(|| names::lookup(query))
        .ok_or_else(|| anyhow!("{query} is neither a hex color nor a CSS color name"))?;
    let named = names::named_color(color);
    println!("{} {} → {} ({})", query, rgb_string(color), named.name, named.hex);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(query) = &args.nearest {
        return print_nearest(query);
    }

    let config = build_config(&args)?;
    let mut failures = 0usize;

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

        let summary = match extract_palette_bytes(&bytes, &config) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("{}: {}", input.display(), e.user_message());
                failures += 1;
                continue;
            }
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            continue;
        }

        println!("{} ({}x{} sampled)", input.display(), summary.width, summary.height);
        for swatch in &summary.swatches {
            let name = swatch.name.as_deref().unwrap_or("");
            println!(
                "  {} {:<16} {:>6.2}%  {}",
                swatch.hex.to_uppercase(),
                rgb_string(swatch.color),
                swatch.share * 100.0,
                name
            );
        }
    }

    if failures > 0 {
        bail!("{failures} of {} images could not be processed", args.inputs.len());
    }
    Ok(())
}
