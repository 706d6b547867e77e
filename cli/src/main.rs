use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use simopt_config::TableFile;
use simopt_core::{
    ALL_LEVELS, Arguments, OptionMap, OptionRecord, Options, ParseError, Value,
    validate_declarations,
};

/// Exit status for usage errors, missing mandatory options and rejected
/// keyword calls.
const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "simopt", version, disable_help_subcommand = true)]
#[command(about = "Parse command-line tokens against a declarative option table")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the result as JSON.
    Parse(ParseArgs),
    /// Print help text for a table.
    Help(HelpArgs),
    /// Validate a table file and summarize it.
    Check(CheckArgs),
    /// Validate KEY=VALUE keyword arguments and print the completed set.
    Call(CallArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// YAML or JSON table file.
    #[arg(long)]
    table: PathBuf,
    /// Program name used in messages (overrides the table file).
    #[arg(long)]
    program: Option<String>,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// YAML or JSON table file.
    #[arg(long)]
    table: PathBuf,
    /// Program name shown on the first line (overrides the table file).
    #[arg(long)]
    program: Option<String>,
    /// Highest user level to show (default: all).
    #[arg(long)]
    level: Option<u32>,
    /// Tokens whose values are shown instead of the defaults.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// YAML or JSON table file.
    #[arg(long)]
    table: PathBuf,
}

#[derive(Debug, Args)]
struct CallArgs {
    /// YAML or JSON table file.
    #[arg(long)]
    table: PathBuf,
    /// Function name used in messages.
    #[arg(long, default_value = "call")]
    name: String,
    /// Accept calls that leave out mandatory keywords.
    #[arg(long)]
    no_check_mandatory: bool,
    /// KEY=VALUE keyword arguments; anything without `=` is positional.
    arguments: Vec<String>,
}

/// Failure of a subcommand, split by exit status.
#[derive(Debug)]
enum Failure {
    /// Rejected input; the message is printed as is.
    Usage(String),
    /// Anything else.
    Error(String),
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Error(message)
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Check(args) => run_check(args),
        Command::Call(args) => run_call(args),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Usage(message)) => {
            eprintln!("{message}");
            std::process::exit(USAGE_EXIT_CODE);
        }
        Err(Failure::Error(message)) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let options = load_options(&args.table, args.program)?;

    match options.parse(&args.tokens) {
        Ok(parsed) => print_json(&parsed),
        Err(ParseError::HelpRequested) => {
            let help = options
                .help(Some(args.tokens.as_slice()), ALL_LEVELS)
                .map_err(|err| Failure::Usage(err.to_string()))?;
            print!("{help}");
            Ok(())
        }
        Err(err) => Err(Failure::Usage(err.to_string())),
    }
}

fn run_help(args: HelpArgs) -> Result<(), Failure> {
    let options = load_options(&args.table, args.program)?;
    let tokens = (!args.tokens.is_empty()).then_some(args.tokens.as_slice());
    let help = options
        .help(tokens, args.level.unwrap_or(ALL_LEVELS))
        .map_err(|err| Failure::Usage(err.to_string()))?;
    print!("{help}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), Failure> {
    let table = load_table(&args.table)?;

    let problems = validate_declarations(&table.declarations);
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("{}: {problem}", args.table.display());
        }
        return Err(format!("{} problem(s) found in option table", problems.len()).into());
    }

    let sections = table
        .declarations
        .iter()
        .filter(|decl| decl.as_option().is_none())
        .count();
    let options = table
        .into_options()
        .map_err(|err| format!("Invalid option table: {err}"))?;

    println!(
        "{}: {} options, {} sections",
        args.table.display(),
        options.table().len(),
        sections
    );
    println!("mandatory flags: {}", join(options.mandatory_arguments()));
    println!("mandatory keys: {}", join(options.mandatory_keys()));
    Ok(())
}

fn run_call(args: CallArgs) -> Result<(), Failure> {
    let options = load_options(&args.table, None)?;

    let mut arguments = Arguments::new();
    for raw in &args.arguments {
        let Some((key, value)) = raw.split_once('=') else {
            arguments = arguments.positional(raw.as_str());
            continue;
        };
        match options.table().records().find(|r| r.attribute == key) {
            Some(record) => {
                let value = keyword_value(record, value).map_err(Failure::Usage)?;
                if record.behavior.multi && !record.value_type.is_bool() {
                    arguments
                        .keywords
                        .entry(key.to_string())
                        .or_insert_with(|| Value::List(Vec::new()))
                        .append_occurrence(value);
                } else {
                    arguments.keywords.insert(key.to_string(), value);
                }
            }
            // Left for the validator to report.
            None => {
                arguments.keywords.insert(key.to_string(), Value::from(value));
            }
        }
    }

    let func = options
        .opt_func(&args.name, |keywords: OptionMap| keywords)
        .check_mandatory(!args.no_check_mandatory);
    let keywords = func
        .call(arguments)
        .map_err(|err| Failure::Usage(err.to_string()))?;
    print_json(&keywords)
}

fn keyword_value(record: &OptionRecord, raw: &str) -> Result<Value, String> {
    let convert = |raw: &str| {
        record
            .value_type
            .convert(raw)
            .map_err(|reason| {
                format!("Invalid value for keyword '{}': {reason}", record.attribute)
            })
    };
    if record.arity > 1 {
        let items = (0..record.arity)
            .map(|_| convert(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Tuple(items))
    } else {
        convert(raw)
    }
}

fn load_table(path: &Path) -> Result<TableFile, String> {
    TableFile::load(path)
        .map_err(|err| format!("Failed to load table '{}': {err}", path.display()))
}

fn load_options(path: &Path, program: Option<String>) -> Result<Options, String> {
    let mut table = load_table(path)?;
    if program.is_some() {
        table.program = program;
    }
    table
        .into_options()
        .map_err(|err| format!("Invalid option table '{}': {err}", path.display()))
}

fn print_json(map: &OptionMap) -> Result<(), Failure> {
    let json = serde_json::to_string_pretty(map)
        .map_err(|err| format!("Failed to serialize result: {err}"))?;
    println!("{json}");
    Ok(())
}

fn join(names: impl IntoIterator<Item = String>) -> String {
    let names: Vec<String> = names.into_iter().collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
