use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use survey_spec::{
    AnswerRecord, DisplayItem, answer_unit, classify_group, deserialize, normalize_all,
    partition_questions, serialize, set_value,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Survey answer wire-format helper",
    long_about = "Encodes raw form values into colon-delimited answer rows, decodes rows back \
                  into records, and inspects the display grouping of a question set."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cast raw values against their questions and print one answer row each.
    Answer {
        /// Path to the JSON array of raw question objects.
        #[arg(long, value_name = "QUESTIONS")]
        questions: PathBuf,
        /// Path to a JSON object mapping question ids to raw form values.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        /// Emit a structured JSON report instead of plain rows.
        #[arg(long)]
        json: bool,
    },
    /// Decode answer rows back into JSON records.
    Decode {
        /// File with one answer row per line; reads stdin when omitted.
        #[arg(long, value_name = "ROWS")]
        rows: Option<PathBuf>,
    },
    /// Show the display partition and group commonality of a question set.
    Groups {
        /// Path to the JSON array of raw question objects.
        #[arg(long, value_name = "QUESTIONS")]
        questions: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Answer {
            questions,
            values,
            json,
        } => run_answer(&questions, &values, json),
        Command::Decode { rows } => run_decode(rows.as_deref()),
        Command::Groups { questions } => run_groups(&questions),
    }
}

fn load_questions(path: &Path) -> CliResult<Vec<survey_spec::QuestionSpec>> {
    let raw: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    let Value::Array(items) = raw else {
        return Err(format!("{}: expected a JSON array of questions", path.display()).into());
    };
    Ok(normalize_all(&items))
}

fn run_answer(questions_path: &Path, values_path: &Path, as_json: bool) -> CliResult<()> {
    let questions = load_questions(questions_path)?;
    let values: Value = serde_json::from_str(&fs::read_to_string(values_path)?)?;
    let Value::Object(values) = values else {
        return Err(format!(
            "{}: expected a JSON object mapping question ids to values",
            values_path.display()
        )
        .into());
    };

    let mut report = Vec::new();
    let mut failures = 0usize;

    for question in &questions {
        let Some(raw) = values.get(&question.id) else {
            continue;
        };
        match set_value(question, raw).and_then(|answer| serialize(&answer)) {
            Ok(row) => {
                if as_json {
                    report.push(json!({
                        "id": question.id,
                        "unit": answer_unit(question),
                        "row": row,
                    }));
                } else {
                    println!("{row}");
                }
            }
            Err(error) => {
                failures += 1;
                if as_json {
                    report.push(json!({
                        "id": question.id,
                        "error": error.to_string(),
                    }));
                } else {
                    eprintln!("{}: {}", question.id, error);
                }
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&Value::Array(report))?);
    }

    if failures > 0 {
        return Err(format!("{failures} answer(s) failed validation").into());
    }
    Ok(())
}

fn run_decode(rows_path: Option<&Path>) -> CliResult<()> {
    let input = match rows_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        let record: AnswerRecord = deserialize(line)?;
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

fn run_groups(questions_path: &Path) -> CliResult<()> {
    let questions = load_questions(questions_path)?;

    for item in partition_questions(questions) {
        match item {
            DisplayItem::Single(question) => {
                println!("- {} ({})", question.id, question.kind.as_str());
            }
            DisplayItem::Group(members) => {
                let commonality = classify_group(&members);
                let ids = members
                    .iter()
                    .map(|member| member.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("= [{}] {}", commonality.as_str(), ids);
            }
        }
    }
    Ok(())
}
