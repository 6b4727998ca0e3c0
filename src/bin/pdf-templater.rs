//! PDF Templater CLI tool
//!
//! A command-line tool for filling PDF templates with text, QR codes and images.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pdf_templater::pdf::extract_metadata;
use pdf_templater::{FillMode, ImageSpec, PdfBuilder, QrSpec};

/// PDF Templater - Fill PDF templates with data
#[derive(Parser)]
#[command(name = "pdf-templater")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Replace placeholders
    pdf-templater fill template.pdf -o out.pdf --replace @name@=\"Jane Doe\"

    # Spread a long text over two placeholders
    pdf-templater fill template.pdf -o out.pdf --multiline \"Lucy in the sky with diamonds:20:top:@l0@,@l1@\"

    # Stamp a QR code 20pt from the right and bottom edges
    pdf-templater fill template.pdf -o out.pdf --qr 4711@-20,-20,145")]
struct Cli {
    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template and write the result
    Fill {
        /// Template PDF file
        template: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Search-replace pair, KEY=VALUE (the key is a regular expression)
        #[arg(long = "replace", value_name = "KEY=VALUE")]
        replacements: Vec<String>,

        /// Multi-line replacement, TEXT:MAX:FILL:PH1,PH2[,...] with FILL being top or bottom
        #[arg(long = "multiline", value_name = "SPEC")]
        multiline: Vec<String>,

        /// QR code placement, CODE@X,Y[,SIZE] (negative offsets count from the far edge)
        #[arg(long = "qr", value_name = "SPEC")]
        qr_codes: Vec<String>,

        /// Image placement, PATH@X,Y
        #[arg(long = "image", value_name = "SPEC")]
        images: Vec<String>,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Fill { template, output, replacements, multiline, qr_codes, images } => {
            cmd_fill(template, output, replacements, multiline, qr_codes, images)
        }
        Commands::Info { input } => cmd_info(input),
    }
}

/// Fill a template
fn cmd_fill(
    template: PathBuf,
    output: PathBuf,
    replacements: Vec<String>,
    multiline: Vec<String>,
    qr_codes: Vec<String>,
    images: Vec<String>,
) -> Result<()> {
    let mut pdf = PdfBuilder::from_path(&template);

    for pair in &replacements {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Replacement {:?} is not of the form KEY=VALUE", pair))?;
        pdf = pdf.with_replacement(key, value);
    }

    for spec in &multiline {
        let (text, max_chars, fill_mode, placeholders) = parse_multiline(spec)?;
        pdf = pdf.with_multiline_replacement_mode(text, max_chars, fill_mode, placeholders);
    }

    for spec in &qr_codes {
        let (code, coords) = split_placement(spec)?;
        let mut qr = QrSpec::from_code(code).with_position(coords[0], coords[1]);
        match coords.len() {
            2 => {}
            3 => {
                let size = u32::try_from(coords[2])
                    .with_context(|| format!("QR size in {:?} must not be negative", spec))?;
                qr = qr.with_size(size);
            }
            _ => bail!("QR code {:?} is not of the form CODE@X,Y[,SIZE]", spec),
        }
        pdf = pdf.with_qr_code(qr);
    }

    for spec in &images {
        let (path, coords) = split_placement(spec)?;
        if coords.len() != 2 {
            bail!("Image {:?} is not of the form PATH@X,Y", spec);
        }
        pdf = pdf.with_image(ImageSpec::from_path(path).with_position(coords[0], coords[1]));
    }

    let document = pdf
        .build()
        .with_context(|| format!("Failed to fill template {}", template.display()))?;
    document
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Output: {}", output.display());
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let metadata = extract_metadata(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(bounds) = metadata.first_page {
        println!("Page size: {} x {} pt", bounds.width, bounds.height);
    }
    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}

/// Split `VALUE@X,Y[,...]`, the value may itself contain `@`
fn split_placement(spec: &str) -> Result<(&str, Vec<i32>)> {
    let (value, coords) = spec
        .rsplit_once('@')
        .ok_or_else(|| anyhow!("Placement {:?} is missing '@X,Y'", spec))?;

    let coords = coords
        .split(',')
        .map(|n| n.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid coordinates in {:?}", spec))?;

    if coords.len() < 2 {
        bail!("Placement {:?} needs both X and Y", spec);
    }
    Ok((value, coords))
}

/// Parse `TEXT:MAX:FILL:PH1,PH2[,...]`, the text may itself contain `:`
fn parse_multiline(spec: &str) -> Result<(&str, usize, FillMode, Vec<&str>)> {
    let mut parts = spec.rsplitn(4, ':');
    let (Some(placeholders), Some(fill), Some(max_chars), Some(text)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        bail!("Multi-line replacement {:?} is not of the form TEXT:MAX:FILL:PH1,PH2", spec);
    };

    let max_chars = max_chars
        .parse()
        .with_context(|| format!("Invalid maximum line length in {:?}", spec))?;
    let fill_mode = match fill.to_ascii_lowercase().as_str() {
        "top" => FillMode::Top,
        "bottom" => FillMode::Bottom,
        other => bail!("Unknown fill mode {:?}, expected top or bottom", other),
    };

    Ok((text, max_chars, fill_mode, placeholders.split(',').collect()))
}
