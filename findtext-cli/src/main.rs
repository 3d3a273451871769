use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use findtext::{FindText, RegionBlock};
use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::info;

/// Command-line arguments: input image, detection mode, and output options.
#[derive(Parser, Debug)]
#[command(
    name = "findtext-cli",
    version,
    about = "Locate text regions in an image via Tesseract"
)]
struct Args {
    /// Input image path
    image: PathBuf,

    /// Recognition language passed to the engine
    #[arg(long, default_value = findtext::DEFAULT_LANG)]
    lang: String,

    /// Detection granularity: line or word
    #[arg(long, default_value = "word")]
    granularity: String,

    /// Run the hierarchical line-then-word pass instead of a flat one
    #[arg(long, default_value_t = false)]
    deep: bool,

    /// Vertical padding (pixels) around each line crop in deep mode
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Write a copy of the image with the detected boxes drawn on it
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Print the detected blocks as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let detector = FindText::with_lang(args.lang.as_str());

    let blocks = if args.deep {
        detector.find_words_deep(args.image.as_path(), args.offset)?
    } else {
        detector.find(args.image.as_path(), &args.granularity)?
    };
    info!(blocks = blocks.len(), "detection finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        for block in &blocks {
            let b = block.bounding_box();
            println!(
                "{:>5} {:>5} {:>5} {:>5}  {}",
                b.x,
                b.y,
                b.width,
                b.height,
                block.text()
            );
        }
    }

    if let Some(out) = &args.annotate {
        annotate(&args.image, &blocks, out)?;
        info!(out = %out.display(), "annotated image written");
    }

    Ok(())
}

/// Draw each detected box as a hollow rectangle on an RGB copy of the source
/// image and save it.
fn annotate(image: &Path, blocks: &[RegionBlock], out: &Path) -> Result<()> {
    let mut canvas = image::open(image)
        .with_context(|| format!("failed to open {}", image.display()))?
        .to_rgb8();
    for block in blocks {
        let b = block.bounding_box();
        if b.width == 0 || b.height == 0 {
            continue;
        }
        let rect = Rect::at(b.x as i32, b.y as i32).of_size(b.width, b.height);
        draw_hollow_rect_mut(&mut canvas, rect, Rgb([255, 0, 0]));
    }
    canvas
        .save(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
