mod error;

use error::Error;
use mathgrade::{
    render_report,
    GoldSolution,
    Grader,
    GraderConfig,
    GradingResult,
    StepEvaluation,
    StudentStep,
    UnmatchedReason,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};
use tabled::{settings::Style, Table, Tabled};
use tracing::{debug, metadata::LevelFilter, Level};
use tracing_subscriber::{fmt, prelude::*};

const USAGE: &str = "usage: mathgrade-repl <rubric.json> [submission.txt] [--json] [--tolerance <value>]";

/// Cells longer than this are cut short in the step table.
const CELL_WIDTH: usize = 50;

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    rubric: String,
    submission: Option<String>,
    json: bool,
    tolerance: Option<f64>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, Error> {
        let mut rubric = None;
        let mut options = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => options.json = true,
                "--tolerance" => {
                    let value = args.next()
                        .and_then(|value| value.parse().ok())
                        .ok_or_else(|| Error::Usage("--tolerance expects a number".to_owned()))?;
                    options.tolerance = Some(value);
                },
                "-h" | "--help" => return Err(Error::Usage(USAGE.to_owned())),
                _ if rubric.is_none() => rubric = Some(arg),
                _ if options.submission.is_none() => options.submission = Some(arg),
                _ => return Err(Error::Usage(format!("unexpected argument `{}`\n{}", arg, USAGE))),
            }
        }
        options.rubric = rubric.ok_or_else(|| Error::Usage(USAGE.to_owned()))?;
        Ok(options)
    }
}

/// A row of the step table.
#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Step")]
    step: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Points")]
    points: String,
    #[tabled(rename = "Your answer")]
    received: String,
    #[tabled(rename = "Expected")]
    expected: String,
}

impl From<&StepEvaluation> for Row {
    fn from(evaluation: &StepEvaluation) -> Self {
        let step = if evaluation.final_answer {
            format!("{} (final)", evaluation.step_number)
        } else {
            evaluation.step_number.to_string()
        };
        Self {
            step,
            status: evaluation.status.to_string(),
            points: format!("{}/{}", evaluation.points_earned, evaluation.points_possible),
            received: truncate(evaluation.received.as_deref().unwrap_or("-")),
            expected: truncate(evaluation.expected.as_deref().unwrap_or("-")),
        }
    }
}

/// Cuts the text short to fit in a table cell.
fn truncate(text: &str) -> String {
    match text.char_indices().nth(CELL_WIDTH) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}

/// Reads a file, naming it in the error.
fn read(path: &str) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })
}

/// Loads the rubric and creates the grader.
fn load_grader(options: &Options) -> Result<Grader, Error> {
    let solution: GoldSolution = serde_json::from_str(&read(&options.rubric)?)
        .map_err(|source| Error::Rubric { path: options.rubric.clone(), source })?;
    debug!(steps = solution.all_steps().count(), "loaded rubric");

    let config = match options.tolerance {
        Some(tolerance) => GraderConfig::with_tolerance(tolerance),
        None => GraderConfig::default(),
    };
    Ok(Grader::new(solution, config)?)
}

/// Prints a report pointing at the problem in a step that could not be interpreted.
fn report_step(index: usize, text: &str) {
    if let Err(err) = StudentStep::new(index, text).parsed() {
        if let Err(io_err) = err.report_to_stderr(&format!("step {}", index + 1)) {
            eprintln!("{}", io_err);
        }
    }
}

/// Prints the result of grading.
fn print_result(result: &GradingResult, json: bool) -> Result<(), Error> {
    if json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    for step in &result.unmatched_steps {
        if let UnmatchedReason::Uninterpretable { .. } = step.reason {
            report_step(step.index, &step.text);
        }
    }

    let rows = result.evaluations.iter().map(Row::from).collect::<Vec<_>>();
    println!("{}", Table::new(&rows).with(Style::modern()));
    println!("{}", render_report(result));
    Ok(())
}

/// What the interactive loop should do after reading a line.
enum Command {
    Continue,
    Grade,
    Clear,
    Quit,
}

/// Reads one line in interactive mode, checking it immediately if it is a step.
fn process_line(rl: &mut DefaultEditor, steps: &mut Vec<String>) -> Result<Command, ReadlineError> {
    let input = rl.readline(&format!("{}> ", steps.len() + 1))?;
    let line = input.trim();
    match line {
        "" | ":grade" => return Ok(Command::Grade),
        ":clear" => return Ok(Command::Clear),
        ":quit" | ":q" => return Ok(Command::Quit),
        _ => (),
    }

    rl.add_history_entry(line)?;
    report_step(steps.len(), line);
    steps.push(line.to_owned());
    Ok(Command::Continue)
}

/// Grades steps entered one per line until the user quits.
fn interactive(grader: &Grader, json: bool) -> Result<(), Error> {
    let mut rl = DefaultEditor::new()?;
    let mut steps = Vec::new();
    println!("enter one step per line; an empty line or :grade grades, :clear starts over, :quit exits");

    loop {
        match process_line(&mut rl, &mut steps) {
            Ok(Command::Continue) => (),
            Ok(Command::Grade) => {
                if !steps.is_empty() {
                    print_result(&grader.grade(&steps), json)?;
                }
            },
            Ok(Command::Clear) => steps.clear(),
            Ok(Command::Quit) | Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run(options: Options) -> Result<(), Error> {
    let grader = load_grader(&options)?;

    if let Some(path) = &options.submission {
        // grade submission file
        let result = grader.grade_text(&read(path)?);
        print_result(&result, options.json)
    } else if !io::stdin().is_terminal() {
        // read submission from stdin
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| Error::Io { path: "<stdin>".to_owned(), source })?;
        print_result(&grader.grade_text(&input), options.json)
    } else {
        interactive(&grader, options.json)
    }
}

/// Installs the log subscriber. The level is read from `MATHGRADE_LOG`.
fn init_logging() {
    let level = std::env::var("MATHGRADE_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    let fmt = fmt::layer()
        .without_time()
        .with_writer(io::stderr);
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let result = Options::parse(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        },
    }
}
