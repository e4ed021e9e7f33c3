//! Thin CLI wrapper around [`parsegen::emit`], built only behind the `cli`
//! feature so the library itself stays free of an argument-parsing
//! dependency.

use facet::Facet;
use std::fs;
use std::process::ExitCode;

/// Reads a JSON-encoded grammar AST and writes the parser `parsegen` emits
/// for it.
#[derive(Facet)]
struct Args {
    /// Path to the JSON-encoded grammar AST.
    grammar: String,

    /// Overrides the grammar's own start rule.
    #[facet(default)]
    start_rule: Option<String>,

    /// Writes the emitted parser source here instead of stdout.
    #[facet(default)]
    output: Option<String>,
}

fn main() -> ExitCode {
    let args: Args = match facet_args::from_std_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let json = match fs::read_to_string(&args.grammar) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: failed to read {}: {err}", args.grammar);
            return ExitCode::FAILURE;
        }
    };

    let grammar: parsegen::Grammar = match facet_json::from_str(&json) {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("error: failed to parse {}: {err}", args.grammar);
            return ExitCode::FAILURE;
        }
    };

    warn_about_undefined_references(&grammar);

    // `--start-rule` only relabels the debug note below; the emitted
    // parser's own `parse(input, startRule)` already accepts a runtime
    // override, so emission never needs to touch `grammar.start_rule`.
    let options = parsegen::EmitOptions {
        debug_start_rule: args.start_rule,
        trust_mode: false,
    };

    let source = match parsegen::emit_with_options(&grammar, &options) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start_rule = options.debug_start_rule.as_deref().unwrap_or(&grammar.start_rule);
    eprintln!("note: emitted {} bytes for start rule '{start_rule}'", source.len());

    match args.output {
        Some(path) => {
            if let Err(err) = fs::write(&path, source) {
                eprintln!("error: failed to write {path}: {err}");
                return ExitCode::FAILURE;
            }
        }
        None => println!("{source}"),
    }

    ExitCode::SUCCESS
}

/// Reports (without failing) any rule referenced from an expression but
/// absent from `grammar.rules`. This is the one place a rule's
/// `references()` are consulted; the emitter itself never validates.
fn warn_about_undefined_references(grammar: &parsegen::Grammar) {
    let mut names: Vec<&String> = grammar.rules.keys().collect();
    names.sort();
    for name in names {
        let rule = &grammar.rules[name];
        for referenced in rule.expression.references() {
            if !grammar.rules.contains_key(&referenced) {
                eprintln!(
                    "note: rule '{name}' references undefined rule '{referenced}'"
                );
            }
        }
    }
}
