//! A small program whose options come from a declaration table.
//!
//! ```sh
//! cargo run -p simopt-demos --example convert -- -f a.pdb -f b.pdb -o out.top
//! cargo run -p simopt-demos --example convert -- --help
//! ```

use simopt_core::{Declaration, OptionDecl, OptionMap, Options, ParseError, ValueType};

fn declarations() -> Vec<Declaration> {
    vec![
        Declaration::section("Input/output options:"),
        OptionDecl::new("-f", "input", ValueType::String)
            .multi()
            .with_description("Input structure (repeatable)")
            .into(),
        OptionDecl::new("-o", "output", ValueType::String)
            .mandatory()
            .with_description("Output topology")
            .into(),
        Declaration::section("Model options:"),
        OptionDecl::new(
            "-ff",
            "forcefield",
            ValueType::Choice(vec!["martini22".into(), "martini3".into()]),
        )
        .with_default("martini3")
        .with_description("Force field")
        .into(),
        OptionDecl::new("-box", "box", ValueType::Float)
            .with_arity(3)
            .at_level(2)
            .with_description("Box edge, used for all three dimensions")
            .into(),
        OptionDecl::switch("-v", "verbose")
            .with_description("Report progress")
            .into(),
    ]
}

fn convert(kw: OptionMap) -> String {
    format!(
        "converting {} to {} with {} (box {})",
        kw["input"], kw["output"], kw["forcefield"], kw["box"]
    )
}

fn main() {
    let options = match Options::new(declarations()) {
        Ok(options) => options.with_program("convert"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match options.parse(&args) {
        Ok(parsed) => parsed,
        Err(ParseError::HelpRequested) => {
            print!("{}", options.usage());
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    // The wrapped function can also be called directly with keywords.
    let run = options.opt_func("convert", convert);
    match run.call_keywords(parsed) {
        Ok(message) => println!("{message}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}
