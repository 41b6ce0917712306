//! Line-oriented presentation of the practice menu, the exam and its results.

use std::io::{self, BufRead, Write};

use chrono::Duration;
use quiz_core::model::Topic;
use quiz_core::time::{format_countdown, format_hms};
use quiz_services::{ExamReport, ExamSession, ExamStatus, Urgency};

/// Menu choices; `None` fields are asked for interactively.
#[derive(Debug, Default, Clone)]
pub struct ExamSettings {
    pub topics: Option<Vec<String>>,
    pub questions: Option<usize>,
    pub minutes: Option<i64>,
}

/// Menu choices with every field filled in and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub topics: Vec<String>,
    pub questions: usize,
    pub minutes: i64,
}

pub struct Terminal<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    /// Emit ANSI colors for the countdown and verdicts.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Fill in whatever `preset` leaves open, re-asking until each answer is valid.
    pub fn practice_menu(&mut self, preset: ExamSettings) -> io::Result<ResolvedSettings> {
        let menu = ExamSession::test_list();

        let topics = match preset.topics.as_deref().and_then(|t| select_topics(t, &menu)) {
            Some(topics) => topics,
            None => {
                if preset.topics.is_some() {
                    writeln!(self.output, "Unknown topic selection, please choose again.")?;
                }
                writeln!(self.output, "Select Tests")?;
                for (i, name) in menu.iter().enumerate() {
                    writeln!(self.output, "  {}. {name}", i + 1)?;
                }
                self.ask("Topics (names or numbers, comma-separated): ", |line| {
                    let tokens: Vec<String> = line.split(',').map(str::to_string).collect();
                    select_topics(&tokens, &menu)
                })?
            }
        };

        let questions = match preset.questions {
            Some(n) => n,
            None => self.ask("Number of Questions: ", |line| {
                line.parse::<usize>().ok().filter(|n| *n > 0)
            })?,
        };

        let minutes = match preset.minutes {
            Some(m) => m,
            None => self.ask("Time (minutes): ", parse_minutes)?,
        };

        Ok(ResolvedSettings {
            topics,
            questions,
            minutes,
        })
    }

    /// Ask every question in order until the paper is exhausted or time runs out.
    pub fn run_exam(&mut self, session: &mut ExamSession) -> io::Result<()> {
        let total = session.progress().total;
        for index in 0..total {
            let remaining = session.time_remaining();
            if session.status() != ExamStatus::Running {
                writeln!(self.output, "Time is up!")?;
                return Ok(());
            }
            let Some(text) = session.question(index).map(|p| p.text.to_string()) else {
                break;
            };

            self.countdown(remaining)?;
            writeln!(self.output, "Question {} of {total}", index + 1)?;
            let answer = loop {
                write!(self.output, "{text}")?;
                self.output.flush()?;
                let Some(line) = self.read_line()? else {
                    return Ok(());
                };
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    break trimmed.to_string();
                }
            };

            if !session.submit_answer(index, answer) {
                writeln!(self.output, "Time is up!")?;
                return Ok(());
            }
            if session.evaluate_answer(index) {
                let verdict = self.paint("Correct!!!", GREEN);
                writeln!(self.output, "{verdict}")?;
            } else {
                let verdict = self.paint("Wrong!!!", RED);
                writeln!(self.output, "{verdict}")?;
            }
        }
        Ok(())
    }

    pub fn show_results(&mut self, report: &ExamReport) -> io::Result<()> {
        writeln!(self.output)?;
        for outcome in &report.outcomes {
            let mark = if outcome.correct {
                self.paint("\u{2713}", GREEN)
            } else {
                self.paint("\u{2715}", RED)
            };
            let response = outcome.response.as_deref().unwrap_or("");
            writeln!(self.output, "{}{response}  | {mark}", outcome.prompt)?;
        }
        writeln!(self.output, "----------------")?;
        writeln!(self.output, "Score: {} / {}", report.score, report.total)?;
        writeln!(self.output, "----------------")?;
        writeln!(self.output, "Time: {}", format_hms(report.time_taken()))?;
        Ok(())
    }

    pub fn write_json(&mut self, json: &str) -> io::Result<()> {
        writeln!(self.output, "{json}")
    }

    fn countdown(&mut self, remaining: Duration) -> io::Result<()> {
        let code = match Urgency::from_remaining(remaining) {
            Urgency::Relaxed => GREEN,
            Urgency::Warning => MAGENTA,
            Urgency::Critical => RED,
        };
        let text = self.paint(&format_countdown(remaining), code);
        writeln!(self.output, "[{text}]")
    }

    fn ask<T>(&mut self, label: &str, parse: impl Fn(&str) -> Option<T>) -> io::Result<T> {
        loop {
            write!(self.output, "{label}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before the menu was complete",
                ));
            };
            match parse(line.trim()) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "Invalid input, please try again.")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

/// Longest exam the menu accepts: one week.
pub const MAX_MINUTES: i64 = 7 * 24 * 60;

/// A positive whole number of minutes, at most [`MAX_MINUTES`].
pub fn parse_minutes(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|m| (1..=MAX_MINUTES).contains(m))
}

const GREEN: &str = "32";
const MAGENTA: &str = "35";
const RED: &str = "31";

/// Resolve names or 1-based menu numbers into canonical topic names.
fn select_topics(tokens: &[String], menu: &[&'static str]) -> Option<Vec<String>> {
    let mut selected = Vec::new();
    for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let name = match token.parse::<usize>() {
            Ok(n) => *menu.get(n.checked_sub(1)?)?,
            Err(_) => token.parse::<Topic>().ok()?.name(),
        };
        if !selected.iter().any(|s: &String| s == name) {
            selected.push(name.to_string());
        }
    }
    (!selected.is_empty()).then_some(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use quiz_core::ManualClock;
    use quiz_core::time::fixed_now;
    use quiz_services::TokioScheduler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(term: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(term.output).unwrap()
    }

    #[test]
    fn menu_reasks_until_valid() {
        let mut term = terminal("9\nAddition,2\n0\nabc\n5\n2\n");
        let settings = term.practice_menu(ExamSettings::default()).unwrap();
        assert_eq!(
            settings,
            ResolvedSettings {
                topics: vec!["Addition".into(), "Subtraction".into()],
                questions: 5,
                minutes: 2,
            }
        );
        let out = output(term);
        assert!(out.contains("  1. Addition"));
        assert_eq!(out.matches("Invalid input").count(), 3);
    }

    #[test]
    fn menu_uses_presets() {
        let mut term = terminal("");
        let settings = term
            .practice_menu(ExamSettings {
                topics: Some(vec!["opposites".into()]),
                questions: Some(4),
                minutes: Some(1),
            })
            .unwrap();
        assert_eq!(settings.topics, vec!["Opposites".to_string()]);
        assert_eq!(output(term), "");
    }

    #[test]
    fn menu_reasks_for_oversized_minutes() {
        let mut term = terminal("200000000000000\n10081\n90\n");
        let settings = term
            .practice_menu(ExamSettings {
                topics: Some(vec!["Addition".into()]),
                questions: Some(1),
                minutes: None,
            })
            .unwrap();
        assert_eq!(settings.minutes, 90);
        assert_eq!(output(term).matches("Invalid input").count(), 2);
    }

    #[test]
    fn minutes_parsing_bounds() {
        assert_eq!(parse_minutes(" 5 "), Some(5));
        assert_eq!(parse_minutes("10080"), Some(MAX_MINUTES));
        assert_eq!(parse_minutes("10081"), None);
        assert_eq!(parse_minutes("0"), None);
        assert_eq!(parse_minutes("soon"), None);
    }

    #[test]
    fn closed_input_aborts_menu() {
        let mut term = terminal("");
        let err = term.practice_menu(ExamSettings::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn scripted_exam_scores_every_answer() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));
        let mut session = ExamSession::new(scheduler);
        let mut rng = StdRng::seed_from_u64(3);
        session
            .configure_with_rng(&["Addition"], 3, &mut rng)
            .unwrap();

        let mut script = String::from("\n");
        for prompt in session.questions() {
            let (a, b) = prompt.text.trim_end_matches(" = ").split_once(" + ").unwrap();
            let sum = a.parse::<u64>().unwrap() + b.parse::<u64>().unwrap();
            script.push_str(&format!("{sum}\n"));
        }

        session.start(Duration::minutes(10)).unwrap();
        let mut term = terminal(&script);
        term.run_exam(&mut session).unwrap();
        session.stop();

        let report = session.report().unwrap();
        assert_eq!(report.score, 3);
        term.show_results(&report).unwrap();

        let out = output(term);
        assert!(out.contains("Question 1 of 3"));
        assert!(out.contains("Question 3 of 3"));
        assert_eq!(out.matches("Correct!!!").count(), 3);
        assert!(out.contains("Score: 3 / 3"));
        assert!(out.contains("Time: 00 : 00 : 00"));
    }

    #[test]
    fn expired_exam_asks_nothing() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));
        let clock = ManualClock::new(fixed_now());
        let mut session = ExamSession::new(scheduler).with_clock(clock.clock());
        session.configure(&["Multiplication"], 2).unwrap();
        session.start(Duration::minutes(1)).unwrap();
        clock.advance(Duration::minutes(2));

        let mut term = terminal("1\n2\n");
        term.run_exam(&mut session).unwrap();

        let out = output(term);
        assert!(out.contains("Time is up!"));
        assert!(!out.contains("Question 1"));
        assert_eq!(session.report().unwrap().score, 0);
    }

    #[test]
    fn results_mark_each_line() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));
        let mut session = ExamSession::new(scheduler);
        session.configure(&["Addition"], 2).unwrap();
        session.start(Duration::minutes(1)).unwrap();
        session.submit_answer(0, "not a number");
        session.stop();

        let mut term = terminal("");
        term.show_results(&session.report().unwrap()).unwrap();
        let out = output(term);
        assert!(out.contains("not a number  | \u{2715}"));
        assert!(out.contains("Score: 0 / 2"));
    }

    #[test]
    fn topic_selection_accepts_names_and_numbers() {
        let menu = ExamSession::test_list();
        let pick = |s: &str| select_topics(&[s.to_string()], &menu);
        assert_eq!(pick("4"), Some(vec!["Opposites".to_string()]));
        assert_eq!(pick("MULTIPLICATION"), Some(vec!["Multiplication".to_string()]));
        assert_eq!(pick("0"), None);
        assert_eq!(pick("Geometry"), None);
        assert_eq!(
            select_topics(&["1".into(), "addition".into()], &menu),
            Some(vec!["Addition".to_string()])
        );
    }
}
