use std::fmt;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::QuestionComposer;
use quiz_services::{ExamSession, TokioScheduler};

mod terminal;

use terminal::{ExamSettings, Terminal};

const DEFAULT_OPPOSITES_PATH: &str = "samples/opposites.toml";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidMinutes { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --questions value: {raw}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --minutes value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--topics <A,B,..>] [--questions <n>] [--minutes <m>]");
    eprintln!("       [--opposites <path>] [--json]");
    eprintln!();
    eprintln!("Anything not given on the command line is asked for interactively.");
    eprintln!("Topics: {}", ExamSession::test_list().join(", "));
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_OPPOSITES_PATH (default {DEFAULT_OPPOSITES_PATH}), RUST_LOG");
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    topics: Option<Vec<String>>,
    questions: Option<usize>,
    minutes: Option<i64>,
    opposites: Option<PathBuf>,
    json: bool,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--topics" => {
                    let value = require_value(args, "--topics")?;
                    parsed.topics = Some(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    let count = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ArgsError::InvalidCount { raw: value.clone() })?;
                    parsed.questions = Some(count);
                }
                "--minutes" => {
                    let value = require_value(args, "--minutes")?;
                    let minutes = terminal::parse_minutes(&value)
                        .ok_or(ArgsError::InvalidMinutes { raw: value.clone() })?;
                    parsed.minutes = Some(minutes);
                }
                "--opposites" => {
                    parsed.opposites = Some(PathBuf::from(require_value(args, "--opposites")?));
                }
                "--json" => parsed.json = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn opposites_path(&self) -> PathBuf {
        self.opposites.clone().unwrap_or_else(|| {
            std::env::var_os("QUIZ_OPPOSITES_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_OPPOSITES_PATH), PathBuf::from)
        })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    // The timer lives on the runtime; the quiz itself runs on this thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;
    let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));
    let composer = QuestionComposer::new().with_antonyms_path(args.opposites_path());
    let mut session = ExamSession::new(scheduler).with_composer(composer);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut term = Terminal::new(stdin.lock(), stdout.lock()).with_color(color);

    let settings = term.practice_menu(ExamSettings {
        topics: args.topics.clone(),
        questions: args.questions,
        minutes: args.minutes,
    })?;
    tracing::debug!(?settings, "practice menu complete");

    session.configure(settings.topics.as_slice(), settings.questions)?;
    let duration = chrono::Duration::try_minutes(settings.minutes)
        .ok_or(quiz_services::SessionError::InvalidDuration)?;
    session.start(duration)?;
    term.run_exam(&mut session)?;
    session.stop();

    let report = session
        .report()
        .ok_or_else(|| io::Error::other("exam did not produce a report"))?;
    if args.json {
        term.write_json(&serde_json::to_string_pretty(&report)?)?;
    } else {
        term.show_results(&report)?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "--topics",
            "Addition, Opposites",
            "--questions",
            "12",
            "--minutes",
            "3",
            "--opposites",
            "words.toml",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            args.topics,
            Some(vec!["Addition".to_string(), "Opposites".to_string()])
        );
        assert_eq!(args.questions, Some(12));
        assert_eq!(args.minutes, Some(3));
        assert_eq!(args.opposites_path(), PathBuf::from("words.toml"));
        assert!(args.json);
    }

    #[test]
    fn empty_args_leave_everything_interactive() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_non_positive_numbers() {
        assert!(matches!(
            parse(&["--questions", "0"]),
            Err(ArgsError::InvalidCount { .. })
        ));
        assert!(matches!(
            parse(&["--minutes", "-2"]),
            Err(ArgsError::InvalidMinutes { .. })
        ));
    }

    #[test]
    fn rejects_oversized_minutes() {
        assert!(matches!(
            parse(&["--minutes", "200000000000000"]),
            Err(ArgsError::InvalidMinutes { .. })
        ));
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["--topics"]),
            Err(ArgsError::MissingValue { flag: "--topics" })
        ));
    }
}
