//! medreport CLI - medical report extraction and synthesis tool

mod server;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use medreport::render::{self, to_markdown_with_stats};
use medreport::synthesis::{ChatRequest, GeminiClient, GeminiConfig, DEFAULT_GEMINI_MODEL};
use medreport::{
    parse_file, parse_str, AnalysisRequest, JsonFormat, PageSelection, PatientDetails,
    RenderOptions, Synthesizer,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "medreport")]
#[command(version)]
#[command(about = "Rebuild report tables and forms as Markdown and summarize them", long_about = None)]
struct Cli {
    /// Input analysis JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an analysis response to all formats (Markdown, text, JSON)
    Convert {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert an analysis response to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Top-level heading
        #[arg(long, default_value = medreport::render::DEFAULT_TITLE)]
        title: String,

        /// Escape `|` and `\` in cell and form text
        #[arg(long)]
        escape: bool,

        /// Omit the form data section
        #[arg(long)]
        no_forms: bool,

        /// Omit the tables section
        #[arg(long)]
        no_tables: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Convert an analysis response to plain text
    Text {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert an analysis response to JSON
    Json {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate the patient summary and biomarker analysis for a report
    Analyze {
        /// Report file: analysis JSON or extracted Markdown
        #[arg(long, value_name = "FILE")]
        report: PathBuf,

        #[arg(long, default_value = "")]
        age: String,

        #[arg(long, default_value = "")]
        gender: String,

        /// Weight in kg
        #[arg(long, default_value = "")]
        weight: String,

        #[arg(long, default_value = "")]
        symptoms: String,

        /// Print the JSON response body instead of formatted text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        gemini: GeminiArgs,
    },

    /// Ask a follow-up question about a summary
    Chat {
        /// File containing the patient summary
        #[arg(long, value_name = "FILE")]
        summary: PathBuf,

        #[arg(long)]
        question: String,

        #[command(flatten)]
        gemini: GeminiArgs,
    },

    /// Serve the extraction and synthesis endpoints over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "MEDREPORT_BIND", default_value = "127.0.0.1:3000")]
        bind: String,

        /// Document-analysis endpoint used by /extract
        #[arg(long, env = "MEDREPORT_ANALYZER_URL")]
        analyzer_url: Option<String>,

        /// Gemini API key used by /analysis and /chat
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Gemini model
        #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
        model: String,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Gemini model
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

impl GeminiArgs {
    fn synthesizer(&self) -> CliResult<Synthesizer<GeminiClient>> {
        let config = GeminiConfig::new(&self.api_key)
            .with_model(&self.model)
            .with_timeout(self.timeout);
        Ok(Synthesizer::new(GeminiClient::new(config)?))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, output }) => cmd_convert(&input, output.as_deref()),
        Some(Commands::Markdown {
            input,
            output,
            title,
            escape,
            no_forms,
            no_tables,
            pages,
        }) => {
            let options = MarkdownArgs {
                title,
                escape,
                no_forms,
                no_tables,
                pages,
            };
            cmd_markdown(&input, output.as_deref(), &options)
        }
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Analyze {
            report,
            age,
            gender,
            weight,
            symptoms,
            json,
            gemini,
        }) => cmd_analyze(
            &report,
            PatientDetails::new(age, gender, weight, symptoms),
            json,
            &gemini,
        ),
        Some(Commands::Chat {
            summary,
            question,
            gemini,
        }) => cmd_chat(&summary, question, &gemini),
        Some(Commands::Serve {
            bind,
            analyzer_url,
            api_key,
            model,
        }) => cmd_serve(&bind, analyzer_url, api_key, model),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref())
            } else {
                println!("{}", "Usage: medreport <FILE> [OUTPUT]".yellow());
                println!("       medreport --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct MarkdownArgs {
    title: String,
    escape: bool,
    no_forms: bool,
    no_tables: bool,
    pages: Option<String>,
}

impl MarkdownArgs {
    fn render_options(&self) -> CliResult<RenderOptions> {
        let page_selection = match &self.pages {
            Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
            None => PageSelection::All,
        };

        Ok(RenderOptions::new()
            .with_title(&self.title)
            .with_escaping(self.escape)
            .with_forms(!self.no_forms)
            .with_tables(!self.no_tables)
            .with_pages(page_selection))
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>) -> CliResult<()> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing analysis response...");
    let doc = parse_file(input)?;
    pb.inc(1);

    pb.set_message("Generating Markdown...");
    let markdown = render::to_markdown(&doc, &RenderOptions::default())?;
    fs::write(output_dir.join("extract.md"), &markdown)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = render::to_text(&doc)?;
    fs::write(output_dir.join("extract.txt"), &text)?;
    pb.inc(1);

    pb.set_message("Generating JSON...");
    let json = render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("content.json"), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} extract.md", "├─".dimmed());
    println!("  {} extract.txt", "├─".dimmed());
    println!("  {} content.json", "└─".dimmed());

    Ok(())
}

fn cmd_markdown(input: &Path, output: Option<&Path>, args: &MarkdownArgs) -> CliResult<()> {
    let doc = parse_file(input)?;
    let markdown = render::to_markdown(&doc, &args.render_options()?)?;
    write_or_print(output, &markdown)
}

fn cmd_text(input: &Path, output: Option<&Path>) -> CliResult<()> {
    let doc = parse_file(input)?;
    let text = render::to_text(&doc)?;
    write_or_print(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult<()> {
    let doc = parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let doc = parse_file(input)?;
    let result = to_markdown_with_stats(&doc, &RenderOptions::default())?;
    let meta = &result.metadata;
    let stats = &result.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), meta.page_count);
    println!("{}: {}", "Blocks".bold(), meta.block_count);
    println!("{}: {}", "Words".bold(), meta.word_count);
    println!("{}: {}", "Keys".bold(), meta.key_count);
    println!("{}: {}", "Tables".bold(), meta.table_count);

    println!();
    println!("{}", "Rendering Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Form fields".bold(), stats.form_field_count);
    println!(
        "{}: {} ({} skipped without header)",
        "Tables rendered".bold(),
        stats.rendered_table_count,
        stats.skipped_table_count
    );
    println!("{}: {}", "Table rows".bold(), stats.row_count);
    println!("{}: {}", "Markdown words".bold(), stats.word_count);
    println!("{}: {}", "Markdown characters".bold(), stats.char_count);

    Ok(())
}

/// Load report content: analysis JSON is rendered to Markdown, anything
/// else is used as-is.
fn load_report(path: &Path) -> CliResult<String> {
    let content = fs::read_to_string(path)?;
    match parse_str(&content) {
        Ok(doc) => Ok(render::to_markdown(&doc, &RenderOptions::default())?),
        Err(e) => {
            log::debug!("{} is not an analysis response ({}), using raw text", path.display(), e);
            Ok(content)
        }
    }
}

fn cmd_analyze(
    report: &Path,
    patient: PatientDetails,
    json: bool,
    gemini: &GeminiArgs,
) -> CliResult<()> {
    let request = AnalysisRequest::new(load_report(report)?, patient);
    request.validate()?;
    let synthesizer = gemini.synthesizer()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Generating summary and biomarker analysis...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(synthesizer.analyze(&request));
    spinner.finish_and_clear();
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Patient Summary".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}\n", report.patient_summary);
        println!("{}", "Biomarker Analysis".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", report.biomarker_trends);
    }

    Ok(())
}

fn cmd_chat(summary: &Path, question: String, gemini: &GeminiArgs) -> CliResult<()> {
    let request = ChatRequest::new(fs::read_to_string(summary)?, question);
    request.validate()?;
    let synthesizer = gemini.synthesizer()?;

    let rt = tokio::runtime::Runtime::new()?;
    let reply = rt.block_on(synthesizer.answer(&request))?;
    println!("{}", reply.answer);

    Ok(())
}

fn cmd_serve(
    bind: &str,
    analyzer_url: Option<String>,
    api_key: Option<String>,
    model: String,
) -> CliResult<()> {
    let state = server::AppState::from_settings(analyzer_url, api_key, model)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(bind).await?;
        println!("{} http://{}", "Listening on".green(), listener.local_addr()?);
        axum::serve(listener, server::router(state)).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn cmd_version() {
    println!("{} {}", "medreport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Medical report extraction and synthesis tool");
    println!();
    println!("License: MIT");
}
