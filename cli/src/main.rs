//! pdflayout CLI - replay content-stream traces into layout markup

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use pdflayout::engine::replay::RecordedDocument;
use pdflayout::images::DirectoryHandler;
use pdflayout::render::{self, MarkupCollector};
use pdflayout::{DocumentMarkup, JsonFormat, Orchestrator, PageSelection, ParseOptions, XhtmlOptions};

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "pdflayout")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct positioned text, vector hints and images from PDF content-stream traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render traces as XHTML
    Xhtml {
        /// Input trace files (JSON)
        #[arg(value_name = "TRACE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Omit line and rect hints
        #[arg(long)]
        no_vector_hints: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render traces as JSON
    Json {
        /// Input trace files (JSON)
        #[arg(value_name = "TRACE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Extract images drawn by the page content
    Images {
        /// Input trace files (JSON)
        #[arg(value_name = "TRACE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show trace information
    Info {
        /// Input trace file (JSON)
        #[arg(value_name = "TRACE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone)]
struct LayoutArgs {
    /// Stop at the first failure instead of collecting warnings
    #[arg(long)]
    fail_fast: bool,

    /// Lay out rotated text upright, one pass per angle
    #[arg(long)]
    detect_angles: bool,

    /// Extract images drawn by the page content
    #[arg(long)]
    images: bool,

    /// Extract each image stream only once per document
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    unique_images: bool,

    /// Maximum number of characters written per document
    #[arg(long, value_name = "N")]
    write_limit: Option<usize>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Skip vector graphics
    #[arg(long)]
    no_vector_graphics: bool,
}

impl LayoutArgs {
    fn to_options(&self) -> CliResult<ParseOptions> {
        let mut options = ParseOptions::new()
            .with_detect_angles(self.detect_angles)
            .with_inline_images(self.images)
            .with_unique_images_only(self.unique_images)
            .with_vector_graphics(!self.no_vector_graphics);
        if self.fail_fast {
            options = options.fail_fast();
        }
        if let Some(limit) = self.write_limit {
            options = options.with_write_limit(limit);
        }
        if let Some(pages) = &self.pages {
            let selection =
                PageSelection::parse(pages).map_err(|e| format!("Invalid page range: {}", e))?;
            options = options.with_pages(selection);
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Xhtml {
            inputs,
            output,
            no_vector_hints,
            layout,
        } => {
            let xhtml = XhtmlOptions::new().with_vector_hints(!no_vector_hints);
            cmd_render(&inputs, output.as_deref(), &layout, "xhtml", move |doc| {
                Ok(render::to_xhtml(doc, &xhtml)?)
            })
        }
        Commands::Json {
            inputs,
            output,
            compact,
            layout,
        } => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            cmd_render(&inputs, output.as_deref(), &layout, "json", move |doc| {
                Ok(render::to_json(doc, format)?)
            })
        }
        Commands::Images {
            inputs,
            output,
            layout,
        } => cmd_images(&inputs, &output, &layout),
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress(len: usize) -> ProgressBar {
    if len < 2 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn report_warnings(input: &Path, doc: &DocumentMarkup) {
    for warning in &doc.warnings {
        let page = warning
            .page
            .map(|p| format!("page {}", p))
            .unwrap_or_else(|| "document".to_string());
        eprintln!(
            "{} {} ({}): {}",
            "Warning".yellow().bold(),
            input.display(),
            page,
            warning.message
        );
    }
}

fn cmd_render<F>(
    inputs: &[PathBuf],
    output: Option<&Path>,
    layout: &LayoutArgs,
    extension: &str,
    format_doc: F,
) -> CliResult<()>
where
    F: Fn(&DocumentMarkup) -> CliResult<String> + Sync,
{
    let options = layout.to_options()?;
    log::debug!("Rendering {} traces with {:?}", inputs.len(), options);
    let orchestrator = Orchestrator::new(options);
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = progress(inputs.len());
    let results: Vec<CliResult<(DocumentMarkup, String)>> = inputs
        .par_iter()
        .map(|input| {
            let mut trace = RecordedDocument::from_path(input)?;
            let doc = orchestrator.process_to_markup(&mut trace)?;
            let rendered = format_doc(&doc)?;
            pb.inc(1);
            Ok((doc, rendered))
        })
        .collect();
    pb.finish_and_clear();

    for (input, result) in inputs.iter().zip(results) {
        let (doc, rendered) = result.map_err(|e| format!("{}: {}", input.display(), e))?;
        report_warnings(input, &doc);
        match output {
            Some(dir) => {
                let path = dir.join(format!("{}.{}", stem(input), extension));
                fs::write(&path, &rendered)?;
                println!("{} {}", "Saved to".green(), path.display());
            }
            None => println!("{}", rendered),
        }
    }

    Ok(())
}

fn cmd_images(inputs: &[PathBuf], output: &Path, layout: &LayoutArgs) -> CliResult<()> {
    let options = layout.to_options()?.with_inline_images(true);
    let orchestrator = Orchestrator::new(options);

    let pb = progress(inputs.len());
    let results: Vec<CliResult<(usize, usize)>> = inputs
        .par_iter()
        .map(|input| {
            let dir = if inputs.len() > 1 {
                output.join(stem(input))
            } else {
                output.to_path_buf()
            };
            let mut trace = RecordedDocument::from_path(input)?;
            let mut handler = DirectoryHandler::new(dir)?;
            let mut sink = MarkupCollector::new();
            let report = orchestrator.process(&mut trace, &mut sink, &mut handler)?;
            pb.inc(1);
            Ok((handler.written().len(), report.warnings.len()))
        })
        .collect();
    pb.finish_and_clear();

    let mut total = 0;
    for (input, result) in inputs.iter().zip(results) {
        let (written, warnings) = result.map_err(|e| format!("{}: {}", input.display(), e))?;
        println!(
            "{} {} images from {}{}",
            "Extracted".green(),
            written,
            input.display(),
            if warnings > 0 {
                format!(" ({} warnings)", warnings).yellow().to_string()
            } else {
                String::new()
            }
        );
        total += written;
    }

    println!("\n{} {} images extracted", "Done!".green().bold(), total);
    Ok(())
}

/// Counts reported by the `info` subcommand.
struct TraceStats {
    pages: usize,
    spans: usize,
    words: usize,
    lines: usize,
    rects: usize,
    images: usize,
    warnings: usize,
}

impl TraceStats {
    fn collect(trace: &RecordedDocument, doc: &DocumentMarkup) -> Self {
        Self {
            pages: trace.pages.len(),
            spans: doc.pages.iter().map(|p| p.text_fragments().count()).sum(),
            words: doc.plain_text().split_whitespace().count(),
            lines: doc.pages.iter().map(|p| p.line_count()).sum(),
            rects: doc.pages.iter().map(|p| p.rect_count()).sum(),
            images: doc.images.len(),
            warnings: doc.warnings.len(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "pages": self.pages,
            "spans": self.spans,
            "words": self.words,
            "lines": self.lines,
            "rects": self.rects,
            "images": self.images,
            "warnings": self.warnings,
        })
    }
}

fn cmd_info(input: &Path, json: bool) -> CliResult<()> {
    let trace = RecordedDocument::from_path(input)?;
    let doc = Orchestrator::new(ParseOptions::new().with_inline_images(true))
        .process_to_markup(&mut trace.clone())?;
    let stats = TraceStats::collect(&trace, &doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats.to_json())?);
        return Ok(());
    }

    println!("{}", "Trace Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), stats.pages);

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Spans".bold(), stats.spans);
    println!("{}: {}", "Words".bold(), stats.words);
    println!("{}: {}", "Lines".bold(), stats.lines);
    println!("{}: {}", "Rects".bold(), stats.rects);
    println!("{}: {}", "Images".bold(), stats.images);
    println!("{}: {}", "Warnings".bold(), stats.warnings);

    Ok(())
}
