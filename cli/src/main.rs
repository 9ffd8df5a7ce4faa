//! pdfdiff CLI - PDF text comparison tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfdiff::report::{self, ComparisonReport, JsonFormat};
use pdfdiff::{
    compare_documents, compare_text, extract_file, extract_pair, format_file_size,
    CompareOptions, DiffStats, Document, ExtractOptions, PageSelection,
};

#[derive(Parser)]
#[command(name = "pdfdiff")]
#[command(version)]
#[command(about = "Compare the text of two PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two PDF files
    #[command(alias = "diff")]
    Compare {
        /// Original PDF file
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        /// Modified PDF file
        #[arg(value_name = "MODIFIED")]
        modified: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Diff granularity
        #[arg(short, long, value_enum, default_value = "word")]
        granularity: GranularityArg,

        /// Diff the full text in one pass instead of page by page
        #[arg(long, conflicts_with = "pages")]
        whole: bool,

        /// Output a JSON report
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Diff pages on a single thread
        #[arg(long)]
        sequential: bool,

        /// Skip the size, extension and header checks
        #[arg(long)]
        no_validate: bool,
    },

    /// Print the reconstructed text of a PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output the pages as JSON
        #[arg(long)]
        json: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum GranularityArg {
    /// Words and the whitespace between them
    Word,
    /// Whole lines
    Line,
}

impl From<GranularityArg> for pdfdiff::Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Word => pdfdiff::Granularity::Word,
            GranularityArg::Line => pdfdiff::Granularity::Line,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            original,
            modified,
            pages,
            granularity,
            whole,
            json,
            compact,
            output,
            sequential,
            no_validate,
        } => {
            let mut options = CompareOptions::new()
                .with_granularity(granularity.into())
                .with_parallel(!sequential);
            if let Some(spec) = pages {
                options = options.with_pages(PageSelection::spec(spec));
            }
            let extract = ExtractOptions::new().with_validation(!no_validate);
            let format = json.then_some(if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            });
            cmd_compare(
                &original,
                &modified,
                &extract,
                &options,
                whole,
                format,
                output.as_deref(),
            )
        }
        Commands::Text {
            input,
            pages,
            json,
            output,
        } => cmd_text(&input, pages.as_deref(), json, output.as_deref()),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_compare(
    original: &Path,
    modified: &Path,
    extract: &ExtractOptions,
    options: &CompareOptions,
    whole: bool,
    format: Option<JsonFormat>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!(
        "Comparing {} with {}",
        original.display(),
        modified.display()
    );

    let pb = spinner("Extracting text...")?;
    let extracted = extract_pair(original, modified, extract);
    pb.finish_and_clear();
    let (original_doc, modified_doc) = extracted?;

    if whole {
        let result = compare_text(&original_doc, &modified_doc, options.granularity);
        return match format {
            Some(JsonFormat::Compact) => write_output(output, &serde_json::to_string(&result)?),
            Some(JsonFormat::Pretty) => {
                write_output(output, &serde_json::to_string_pretty(&result)?)
            }
            None => {
                print_header(&original_doc, &modified_doc);
                print_stats("Whole document", &result.stats);
                Ok(())
            }
        };
    }

    let comparison = compare_documents(&original_doc, &modified_doc, options);

    if let Some(format) = format {
        let json = report::to_json(&ComparisonReport::new(&comparison), format)?;
        return write_output(output, &json);
    }

    print_header(&original_doc, &modified_doc);
    if comparison.pages.is_empty() {
        println!("{}", "No pages selected".yellow());
        return Ok(());
    }

    for page in &comparison.pages {
        let label = format!("Page {}", page.page_number);
        if page.has_changes() {
            print_stats(&label, &page.stats);
        } else {
            println!("  {:<10} {}", label, "unchanged".dimmed());
        }
    }

    println!("{}", "─".repeat(40).dimmed());
    print_stats("Total", &comparison.stats);

    Ok(())
}

fn print_header(original: &Document, modified: &Document) {
    println!("{}", "Comparison".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {} ({} pages)",
        "Original".bold(),
        original.name,
        original.page_count()
    );
    println!(
        "{}: {} ({} pages)",
        "Modified".bold(),
        modified.name,
        modified.page_count()
    );
    println!();
}

fn print_stats(label: &str, stats: &DiffStats) {
    println!(
        "  {:<10} {} {} {} {}",
        label,
        format!("+{}", stats.additions).green(),
        format!("-{}", stats.deletions).red(),
        format!("={}", stats.unchanged).dimmed(),
        format!("({:.2}% changed)", stats.change_percentage).bold()
    );
}

fn cmd_text(
    input: &Path,
    pages: Option<&str>,
    json: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = extract_file(input, &ExtractOptions::default())?;
    log::debug!("Extracted {} pages from {}", doc.page_count(), input.display());

    let selection = pages.map(PageSelection::spec).unwrap_or_default();
    let selected: Vec<_> = selection
        .resolve(doc.page_count())
        .into_iter()
        .filter_map(|n| doc.page(n))
        .collect();

    let content = if json {
        serde_json::to_string_pretty(&selected)?
    } else {
        selected
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    write_output(output, &content)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let size = fs::metadata(input)?.len();
    let doc = extract_file(input, &ExtractOptions::default())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Size".bold(), format_file_size(size));
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let blank = doc.pages.iter().filter(|p| p.is_blank()).count();
    println!("{}: {}", "Words".bold(), doc.word_count());
    println!("{}: {}", "Characters".bold(), doc.plain_text().chars().count());
    println!("{}: {}", "Blank pages".bold(), blank);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfdiff".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF text comparison tool");
    println!();
    println!("License: MIT");
}
