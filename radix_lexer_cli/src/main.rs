use clap::{Parser, ValueEnum};
use radix_lexer::config::runtime::{LexicalPreferences, LoggingPreferences, WhitespaceClass};
use radix_lexer::lexical::LexicalMetrics;
use radix_lexer::logging::{self, FacadeLogger, LogLevel, LoggingService};
use radix_lexer::{pipeline, Dictionary, Lexicon, Token, TokenKind, TrieStats};
use serde::Serialize;
use std::error::Error;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Split a file into keyword, symbol and user tokens using a radix-trie dictionary
#[derive(Debug, Parser)]
#[command(name = "radix-lex", version, about)]
struct Cli {
    /// File to tokenize; read from the first line of stdin when omitted
    input: Option<PathBuf>,

    /// TOML dictionary with `symbols` and `keywords` tables (default: built-in C-like set)
    #[arg(short, long, value_name = "TOML")]
    dictionary: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Prefix each text line with the token kind
    #[arg(long)]
    kinds: bool,

    /// Print the dictionary trie before tokenizing
    #[arg(long)]
    dump_trie: bool,

    /// Report trie and token statistics
    #[arg(long)]
    stats: bool,

    /// Treat all Unicode whitespace as separators instead of the C-locale set
    #[arg(long)]
    unicode_whitespace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<JsonStats<'a>>,
}

#[derive(Serialize)]
struct JsonStats<'a> {
    trie: TrieStats,
    lexical: &'a LexicalMetrics,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LoggingPreferences::from_env()) {
        eprintln!("warning: {}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// JSON lines on stderr when structured logging is requested, otherwise
/// library events go through the `log` facade to env_logger
fn init_logging(preferences: LoggingPreferences) -> Result<(), String> {
    if preferences.use_structured_logging {
        logging::config::init_runtime_preferences(preferences)?;
        return logging::init_global_logging();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let min_level = match log::max_level() {
        log::LevelFilter::Off | log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warning,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug | log::LevelFilter::Trace => LogLevel::Debug,
    };

    let service = LoggingService::new(Arc::new(FacadeLogger), min_level);
    logging::init_global_logging_with_service(Arc::new(service))
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let lexicon = match &cli.dictionary {
        Some(path) => pipeline::load_lexicon(path)?,
        None => Dictionary::c_like().build()?,
    };
    log::debug!("lexicon ready: {:?}", lexicon);

    if cli.dump_trie {
        print!("{}", lexicon.dump());
        if cli.input.is_none() {
            return Ok(());
        }
    }

    let input = match &cli.input {
        Some(path) => path.clone(),
        None => read_input_name(io::stdin().lock())?,
    };

    let mut preferences = LexicalPreferences::from_env();
    if cli.unicode_whitespace {
        preferences.whitespace = WhitespaceClass::Unicode;
    }
    if cli.stats {
        preferences.collect_metrics = true;
    }

    match cli.format {
        OutputFormat::Text => write_text(cli, &input, &lexicon, preferences),
        OutputFormat::Json => write_json(cli, &input, &lexicon, preferences),
    }
}

/// First whitespace-delimited word on stdin
fn read_input_name(reader: impl BufRead) -> Result<PathBuf, Box<dyn Error>> {
    for line in reader.lines() {
        if let Some(word) = line?.split_whitespace().next() {
            return Ok(PathBuf::from(word));
        }
    }
    Err("no input file given on the command line or stdin".into())
}

fn write_text(
    cli: &Cli,
    input: &Path,
    lexicon: &Lexicon,
    preferences: LexicalPreferences,
) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_error: Option<io::Error> = None;

    let result = pipeline::stream_file(input, lexicon, preferences, |token| {
        if token.is_end() || write_error.is_some() {
            return;
        }
        if let Err(e) = write_token(&mut out, token, cli.kinds) {
            write_error = Some(e);
        }
    })?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    out.flush()?;

    if cli.stats {
        let trie = lexicon.stats();
        let metrics = &result.lexical_metrics;
        eprintln!(
            "trie: {} nodes, {} keys, depth {}",
            trie.node_count, trie.key_count, trie.max_depth
        );
        eprintln!(
            "tokens: {} total ({} keyword, {} symbol, {} user), longest {}, {} chars read",
            metrics.total_tokens,
            metrics.count_of(TokenKind::Keyword),
            metrics.count_of(TokenKind::Symbol),
            metrics.count_of(TokenKind::User),
            metrics.longest_token,
            metrics.chars_read
        );
    }

    Ok(())
}

fn write_token(out: &mut impl Write, token: &Token, with_kind: bool) -> io::Result<()> {
    if with_kind {
        writeln!(out, "{}\t{}", token.kind, token.text)
    } else {
        writeln!(out, "{}", token.text)
    }
}

fn write_json(
    cli: &Cli,
    input: &Path,
    lexicon: &Lexicon,
    preferences: LexicalPreferences,
) -> Result<(), Box<dyn Error>> {
    let result = pipeline::process_file(input, lexicon, preferences)?;

    let report = JsonReport {
        file: result.file_metadata.path.display().to_string(),
        tokens: &result.tokens,
        stats: cli.stats.then(|| JsonStats {
            trie: lexicon.stats(),
            lexical: &result.lexical_metrics,
        }),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}
