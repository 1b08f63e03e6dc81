use clap::{Parser, Subcommand};
use colored::Colorize;
use lookahead::{DEFAULT_ATTEMPT_LIMIT, DEFAULT_MAX_DEPTH, MatcherBuilder, TraceLog, TraceStage, scan};

#[derive(Parser)]
#[command(name = "lookahead")]
#[command(about = "Regex matching with lookahead assertions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check if pattern matches
    Match {
        /// The regex pattern, may contain (?=...) and (?!...)
        pattern: String,
        /// The input string to test
        input: String,
        /// Show every fragment handed to the regex engine
        #[arg(short, long)]
        trace: bool,
        /// Recursion depth ceiling
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
        /// Maximum number of engine searches
        #[arg(long, default_value_t = DEFAULT_ATTEMPT_LIMIT)]
        attempt_limit: usize,
    },
    /// List the lookahead groups found in a pattern
    Spans {
        /// The regex pattern
        pattern: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            pattern,
            input,
            trace,
            max_depth,
            attempt_limit,
        } => cmd_match(&pattern, &input, trace, max_depth, attempt_limit),
        Commands::Spans { pattern } => cmd_spans(&pattern),
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(2);
}

fn cmd_match(pattern: &str, input: &str, trace: bool, max_depth: usize, attempt_limit: usize) {
    let log = TraceLog::new();
    let mut builder = MatcherBuilder::new();
    builder.max_depth(max_depth).attempt_limit(attempt_limit);
    if trace {
        builder.trace(log.sink());
    }

    let matcher = match builder.build(pattern) {
        Ok(m) => m,
        Err(e) => fail(e),
    };
    let result = matcher.is_match(input);

    if trace {
        print_trace(&log);
    }

    match result {
        Ok(true) => {
            println!("{}", "true".green());
            std::process::exit(0);
        }
        Ok(false) => {
            println!("{}", "false".red());
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}

fn print_trace(log: &TraceLog) {
    for (stage, depth, pattern, subject) in log.entries() {
        let label = match stage {
            TraceStage::Prefix => "prefix ".cyan(),
            TraceStage::Residue => "residue".magenta(),
        };
        eprintln!(
            "{}{} {} by {}",
            "  ".repeat(depth),
            label,
            subject.yellow(),
            pattern.cyan()
        );
    }
}

fn cmd_spans(pattern: &str) {
    let spans = match scan(pattern) {
        Ok(s) => s,
        Err(e) => fail(e),
    };

    if spans.is_empty() {
        println!("{}", "No lookahead groups".red());
        return;
    }

    println!(
        "{} {}",
        "Found".bold(),
        format!("{} lookahead group(s)", spans.len()).green()
    );
    println!();

    for (i, span) in spans.iter().enumerate() {
        println!(
            "  [{}] {} {}..{} = {}",
            i + 1,
            span.kind,
            span.start,
            span.end,
            span.interior(pattern).unwrap_or_default().green()
        );
    }
}
