use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use techspring_report::config::OUTPUT_DIR_ENV;
use techspring_report::research::{compose_markdown, ResearchConfig, Researcher};
use techspring_report::{
    today_report_path, MarkdownStrategy, MissingInputError, ReportConfig, ReportRenderer,
};

/// Renders a markdown research report to `research_report_<date>.pdf`.
///
/// Fonts, the output directory and the strategy default to the `TECHSPRING_*` environment
/// configuration; flags take precedence.
#[derive(Parser)]
#[command(author, version, about = "Technology research report generator")]
struct Cli {
    /// Markdown report to render.
    #[arg(long, env = "TECHSPRING_INPUT", default_value = "report/research_report.md")]
    input: PathBuf,

    /// Directory the PDF is written to.
    #[arg(long, env = OUTPUT_DIR_ENV)]
    output_dir: Option<PathBuf>,

    /// Markdown conversion: `lines` or `structural`.
    #[arg(long)]
    strategy: Option<MarkdownStrategy>,

    /// Research current topics first and write the markdown to `--input`.
    #[arg(long)]
    research: bool,

    /// Document title used for the PDF metadata and the researched report heading.
    #[arg(long)]
    title: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = ReportConfig::from_env();
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(strategy) = cli.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(title) = cli.title {
        config = config.with_title(title);
    }

    if cli.research {
        research(&config, &cli.input)?;
    }

    let markdown = match fs::read_to_string(&cli.input) {
        Ok(markdown) => markdown,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            // A missing source ends the run without generating anything.
            let err = MissingInputError::new(&cli.input);
            warn!("{err}");
            println!("Error: Could not find report at {}", err.path().display());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let output = today_report_path(config.output_dir());
    info!(
        "Generating PDF from {} with the {} strategy",
        cli.input.display(),
        config.strategy()
    );

    let renderer = ReportRenderer::new(config);
    let summary = renderer.render(&markdown, &output)?;
    if !summary.skipped().is_empty() {
        warn!("{} block(s) were skipped", summary.skipped().len());
    }
    println!("{}", output.display());
    Ok(())
}

fn research(config: &ReportConfig, markdown_path: &Path) -> Result<(), Box<dyn Error>> {
    let researcher = Researcher::from_config(&ResearchConfig::from_env());
    let sections = researcher.run();
    let markdown = compose_markdown(
        config.title(),
        chrono::Local::now().date_naive(),
        &sections,
    );

    if let Some(parent) = markdown_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(markdown_path, markdown)?;
    info!("Research report written to {}", markdown_path.display());
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
