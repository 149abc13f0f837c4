//! helpdoc CLI - help-center article tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use helpdoc::command::{Notification, NotificationLevel, DEFAULT_ENDPOINT};
use helpdoc::editor::lock_session;
use helpdoc::render::{self, HtmlRenderer};
use helpdoc::theme::{self, Rgb, TextColor};
use helpdoc::{
    parse_markup_with_options, ClientOptions, Command, CommandDispatcher, DomainContext, Document,
    EditorSession, HttpGenerationService, JsonFormat, Notifier, Outcome, ParseOptions, Position,
    RenderOptions, Selection, StreamEnvelope,
};

#[derive(Parser)]
#[command(name = "helpdoc")]
#[command(version)]
#[command(about = "Parse, render and generate help-center articles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse plain markup into document JSON
    Parse {
        /// Input markup file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Keep marker characters as literal text
        #[arg(long)]
        plain: bool,
    },

    /// Render document JSON
    Render {
        /// Input JSON file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// Keep inline marks in HTML output
        #[arg(long)]
        marks: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Print render statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Run a writing command and stream the result into a document
    #[command(alias = "gen")]
    Generate {
        /// Writing command to run
        #[arg(value_enum)]
        command: CommandArg,

        /// Input markup file; its whole text is the selection
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Instruction for the custom command
        #[arg(short, long)]
        prompt: Option<String>,

        /// Domain the text belongs to
        #[arg(long, value_enum, default_value = "documentation")]
        context: ContextArg,

        /// Generation endpoint
        #[arg(long, env = "HELPDOC_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Bearer token
        #[arg(long, env = "HELPDOC_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Response body framing
        #[arg(long, value_enum, default_value = "raw")]
        envelope: EnvelopeArg,

        /// Write document JSON instead of markup
        #[arg(long)]
        json: bool,
    },

    /// Pick readable text color for a background color
    Contrast {
        /// Background color (#rgb or #rrggbb)
        #[arg(value_name = "COLOR")]
        background: String,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Display HTML
    Html,
    /// Plain text
    Text,
    /// Plain markup
    Markup,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CommandArg {
    /// Polish clarity and grammar
    Improve,
    /// Condense into a short summary
    Summarize,
    /// Add detail and examples
    Expand,
    /// Make it shorter
    Shorten,
    /// Follow a free-form prompt
    Custom,
}

impl From<CommandArg> for Command {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Improve => Command::Improve,
            CommandArg::Summarize => Command::Summarize,
            CommandArg::Expand => Command::Expand,
            CommandArg::Shorten => Command::Shorten,
            CommandArg::Custom => Command::Custom,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ContextArg {
    /// Help-center articles
    Documentation,
    /// Release notes
    Changelog,
}

impl From<ContextArg> for DomainContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Documentation => DomainContext::Documentation,
            ContextArg::Changelog => DomainContext::ChangeLog,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EnvelopeArg {
    /// Body is the generated text
    Raw,
    /// Body is `0:"..."` data-stream lines
    DataStream,
}

impl From<EnvelopeArg> for StreamEnvelope {
    fn from(arg: EnvelopeArg) -> Self {
        match arg {
            EnvelopeArg::Raw => StreamEnvelope::Raw,
            EnvelopeArg::DataStream => StreamEnvelope::DataStream,
        }
    }
}

/// Prints notifications to stderr.
struct TerminalNotifier {
    spinner: ProgressBar,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let label = match notification.level {
            NotificationLevel::Info => "Info".cyan().bold(),
            NotificationLevel::Error => "Error".red().bold(),
        };
        self.spinner
            .suspend(|| eprintln!("{}: {}", label, notification.message));
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            output,
            compact,
            plain,
        }) => cmd_parse(input.as_deref(), output.as_deref(), compact, plain),
        Some(Commands::Render {
            input,
            output,
            format,
            marks,
            max_heading,
            stats,
        }) => cmd_render(
            input.as_deref(),
            output.as_deref(),
            format,
            RenderOptions::new()
                .with_marks(marks)
                .with_max_heading(max_heading)
                .with_stats(stats),
        ),
        Some(Commands::Generate {
            command,
            input,
            output,
            prompt,
            context,
            endpoint,
            token,
            timeout,
            envelope,
            json,
        }) => {
            let mut options = ClientOptions::new(endpoint)
                .with_timeout(Duration::from_secs(timeout))
                .with_envelope(envelope.into());
            if let Some(token) = token {
                options = options.with_token(token);
            }
            cmd_generate(
                command.into(),
                context.into(),
                prompt,
                input.as_deref(),
                output.as_deref(),
                &options,
                json,
            )
        }
        Some(Commands::Contrast { background }) => cmd_contrast(&background),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: helpdoc <COMMAND>".yellow());
            println!("       helpdoc --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    input: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
    plain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;

    let options = if plain {
        ParseOptions::new().plain()
    } else {
        ParseOptions::new()
    };
    let doc = parse_markup_with_options(&markup, options);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::to_json(&doc, format)?;

    write_output(output, &json)?;
    Ok(())
}

fn cmd_render(
    input: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = read_input(input)?;
    let doc = Document::from_json(&json)?;
    let show_stats = options.collect_stats;

    let content = match format {
        OutputFormat::Html => {
            let result = HtmlRenderer::new(options).render_with_stats(&doc);
            if show_stats {
                eprintln!("{}", "Render Statistics".cyan().bold());
                eprintln!("{}", "─".repeat(40).dimmed());
                eprintln!("{}: {}", "Headings".bold(), result.stats.heading_count);
                eprintln!("{}: {}", "Paragraphs".bold(), result.stats.paragraph_count);
                eprintln!("{}: {}", "List items".bold(), result.stats.list_item_count);
                eprintln!("{}: {}", "Images".bold(), result.stats.image_count);
                eprintln!("{}: {}", "Skipped".bold(), result.stats.skipped_count);
                eprintln!("{}: {}", "Words".bold(), result.stats.word_count);
                eprintln!(
                    "{}: {} min",
                    "Reading time".bold(),
                    result.stats.reading_minutes()
                );
            }
            result.content
        }
        OutputFormat::Text => render::to_text(&doc),
        OutputFormat::Markup => render::to_markup(&doc),
    };

    write_output(output, &content)?;
    Ok(())
}

fn cmd_generate(
    command: Command,
    context: DomainContext,
    prompt: Option<String>,
    input: Option<&Path>,
    output: Option<&Path>,
    options: &ClientOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = match input {
        Some(path) => parse_markup_with_options(&fs::read_to_string(path)?, options.parse.clone()),
        None => Document::new(),
    };

    let mut editor = EditorSession::new(doc);
    if !editor.document.is_empty() {
        // Select everything, from the first block to past the last.
        let end = Position::new(editor.document.block_count(), 0);
        editor.set_selection(Selection::new(Position::default(), end));
    }
    let session = editor.into_shared();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Running {}...", command));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let service = Arc::new(HttpGenerationService::new(options)?);
    let notifier = Arc::new(TerminalNotifier {
        spinner: spinner.clone(),
    });
    let dispatcher = CommandDispatcher::with_options(service, notifier, options);

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async {
        tokio::select! {
            outcome = dispatcher.invoke_on_selection(&session, command, prompt, context) => outcome,
            _ = tokio::signal::ctrl_c() => {
                dispatcher.cancel();
                Outcome::Cancelled { inserted: 0 }
            }
        }
    });

    let inserted = match outcome {
        Outcome::Completed { inserted } => {
            spinner.finish_with_message(format!("Done! {} blocks", inserted));
            inserted
        }
        Outcome::Cancelled { inserted } => {
            spinner.finish_with_message("Cancelled".yellow().to_string());
            inserted
        }
        Outcome::Failed(err) => {
            spinner.finish_and_clear();
            return Err(err.into());
        }
    };
    log::debug!("{} blocks inserted", inserted);

    let editor = lock_session(&session);
    let content = if json {
        render::to_json(&editor.document, JsonFormat::Pretty)?
    } else {
        render::to_markup(&editor.document)
    };
    write_output(output, &content)?;
    Ok(())
}

fn cmd_contrast(background: &str) -> Result<(), Box<dyn std::error::Error>> {
    let color: Rgb = background.parse()?;
    let text = theme::text_color_for(background)?;
    let ratio = theme::contrast_ratio(color, text.rgb());
    let other = match text {
        TextColor::Black => TextColor::White,
        TextColor::White => TextColor::Black,
    };

    println!("{}: {}", "Background".bold(), color);
    println!("{}: {}", "Text".bold(), text.hex().green());
    println!("{}: {:.2}:1", "Contrast".bold(), ratio);
    println!(
        "{}",
        format!(
            "{} would give {:.2}:1",
            other.hex(),
            theme::contrast_ratio(color, other.rgb())
        )
        .dimmed()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "helpdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Help-center article tool");
    println!();
    println!("Library: {}", helpdoc::VERSION.dimmed());
    println!("License: MIT");
}
