use anyhow::{Context, Result};
use clap::Parser;
use sheet_layout::{ImageAsset, ProgressSender, SheetOptions, generate_sheet_pdf};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet", about = "Arrange images into a print-ready PDF grid", version)]
struct Cli {
    /// Input image file(s), placed in the order given
    #[arg(required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Output PDF file
    #[arg(short, long, default_value = "sheet.pdf")]
    output: PathBuf,

    /// JSON options file; flags below override its values
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// Page width in inches
    #[arg(long)]
    page_width_in: Option<f32>,

    /// Page height in inches
    #[arg(long)]
    page_height_in: Option<f32>,

    /// Cell width in centimeters
    #[arg(long)]
    cell_width_cm: Option<f32>,

    /// Cell height in centimeters
    #[arg(long)]
    cell_height_cm: Option<f32>,

    /// Gap between cells in millimeters
    #[arg(long)]
    spacing_mm: Option<f32>,

    /// Columns per page
    #[arg(long)]
    columns: Option<usize>,

    /// Rows per page
    #[arg(long)]
    rows: Option<usize>,

    /// Enlarge small images to fill their cell
    #[arg(long)]
    allow_upscale: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut options = match &cli.options {
        Some(path) => SheetOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => SheetOptions::default(),
    };

    if let Some(dpi) = cli.dpi {
        options.dpi = dpi;
    }
    if let Some(v) = cli.page_width_in {
        options.page_width_in = v;
    }
    if let Some(v) = cli.page_height_in {
        options.page_height_in = v;
    }
    if let Some(v) = cli.cell_width_cm {
        options.cell_width_cm = v;
    }
    if let Some(v) = cli.cell_height_cm {
        options.cell_height_cm = v;
    }
    if let Some(v) = cli.spacing_mm {
        options.spacing_mm = v;
    }
    if let Some(v) = cli.columns {
        options.columns_per_page = v;
    }
    if let Some(v) = cli.rows {
        options.rows_per_page = v;
    }
    if cli.allow_upscale {
        options.allow_upscale = true;
    }

    let mut images = Vec::with_capacity(cli.images.len());
    for path in &cli.images {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        images.push(ImageAsset::new(name, bytes));
    }

    let (progress, mut rx) = ProgressSender::channel();
    let reporter = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            eprintln!("[{:>3}%] {}", event.percent, event.label);
        }
    });

    let count = images.len();
    let pdf = generate_sheet_pdf(images, &options, Some(&progress)).await?;
    drop(progress);
    let _ = reporter.await;

    tokio::fs::write(&cli.output, &pdf)
        .await
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Placed {} images → {}", count, cli.output.display());

    Ok(())
}
