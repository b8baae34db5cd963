use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use cpp_sim_check_core::{
    CompareError, DuplicationReport, Options, SimilarityOutcome, SourceInput, Target,
};
use serde::Serialize;

const HELP_TEXT: &str = concat!(
    "cpp-sim-check (structural similarity / duplicated regions for C++ sources)\n",
    "\n",
    "Usage:\n",
    "  cpp-sim-check [options] <reference> <candidate>...\n",
    "  cpp-sim-check --duplication [options] <file-a> <file-b>\n",
    "\n",
    "Options:\n",
    "  --duplication        Extract literal duplicated regions (exactly 2 files)\n",
    "  --json               Output JSON\n",
    "  --kgram <n>          k-gram length for winnowing (default: 3)\n",
    "  --window <n>         Winnowing window size (default: 5)\n",
    "  --compiler <name>    Preprocessor-capable compiler (default: g++)\n",
    "  --encoding <name>    Source text encoding (default: utf-8)\n",
    "  --timeout-secs <n>   Preprocessor timeout in seconds (default: 30)\n",
    "  --no-timeout         Wait for the preprocessor indefinitely\n",
    "  -V, --version        Show version\n",
    "  -h, --help           Show help\n",
    "\n",
    "Examples:\n",
    "  cpp-sim-check submission.cpp reference.cpp\n",
    "  cpp-sim-check submission.cpp candidates/a.cpp candidates/b.cpp\n",
    "  cpp-sim-check --duplication --json a.cpp b.cpp\n",
    "\n"
);

#[derive(Debug, Clone)]
struct ParsedArgs {
    duplication: bool,
    json: bool,
    files: Vec<PathBuf>,
    options: Options,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSimilarity {
    score: f64,
    best_index: Option<usize>,
    best_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDuplication {
    runs: usize,
    report_a: String,
    report_b: String,
}

fn print_help() {
    print!("{HELP_TEXT}");
}

fn parse_usize(name: &str, raw: &str) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("{name} must be an integer"))?;
    if value == 0 {
        return Err(format!("{name} must be >= 1"));
    }
    Ok(value)
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("{name} must be an integer"))
}

fn parse_args(argv: &[String]) -> Result<Option<ParsedArgs>, String> {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut duplication = false;
    let mut json = false;
    let mut options = Options::default();

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        if arg == "--" {
            files.extend(argv[(i + 1)..].iter().map(PathBuf::from));
            break;
        }
        if arg == "--duplication" {
            duplication = true;
            i += 1;
            continue;
        }
        if arg == "--json" {
            json = true;
            i += 1;
            continue;
        }
        if arg == "--kgram" {
            let raw = argv.get(i + 1).ok_or("--kgram requires a value")?;
            options.kgram_len = parse_usize("--kgram", raw)?;
            i += 2;
            continue;
        }
        if arg == "--window" {
            let raw = argv.get(i + 1).ok_or("--window requires a value")?;
            options.window_size = parse_usize("--window", raw)?;
            i += 2;
            continue;
        }
        if arg == "--compiler" {
            let raw = argv.get(i + 1).ok_or("--compiler requires a value")?;
            options.compiler = raw.to_string();
            i += 2;
            continue;
        }
        if arg == "--encoding" {
            let raw = argv.get(i + 1).ok_or("--encoding requires a value")?;
            options.encoding = raw.to_string();
            i += 2;
            continue;
        }
        if arg == "--timeout-secs" {
            let raw = argv.get(i + 1).ok_or("--timeout-secs requires a value")?;
            let secs = parse_u64("--timeout-secs", raw)?;
            options.preprocess_timeout = Some(Duration::from_secs(secs));
            i += 2;
            continue;
        }
        if arg == "--no-timeout" {
            options.preprocess_timeout = None;
            i += 1;
            continue;
        }
        if arg == "-h" || arg == "--help" {
            return Ok(None);
        }
        if arg == "-V" || arg == "--version" {
            println!("cpp-sim-check {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
        if arg.starts_with('-') {
            return Err(format!("Unknown option: {arg}"));
        }
        files.push(PathBuf::from(arg));
        i += 1;
    }

    if duplication {
        if files.len() != 2 {
            return Err("--duplication requires exactly 2 files".to_string());
        }
    } else if files.len() < 2 {
        return Err("similarity requires a reference and at least one candidate".to_string());
    }

    Ok(Some(ParsedArgs {
        duplication,
        json,
        files,
        options,
    }))
}

fn format_similarity(outcome: &SimilarityOutcome, candidates: &[PathBuf]) -> String {
    let mut out = String::new();
    out.push_str(&format!("score={:.4}\n", outcome.score));
    match outcome.best_index {
        Some(index) => out.push_str(&format!(
            "best match: {} (candidate {} of {})\n",
            candidates[index].display(),
            index + 1,
            candidates.len()
        )),
        None => out.push_str("best match: none\n"),
    }
    out
}

fn format_duplication(report: &DuplicationReport, files: &[PathBuf]) -> String {
    let mut out = String::new();
    out.push_str(&format!("duplicated runs: {}\n\n", report.runs.len()));
    out.push_str(&format!("== {} ==\n", files[0].display()));
    out.push_str(&format!("{}\n", report.render_a().trim_end()));
    out.push_str(&format!("== {} ==\n", files[1].display()));
    out.push_str(&format!("{}\n", report.render_b().trim_end()));
    out
}

fn write_json<T: Serialize>(value: &T) -> Result<(), CompareError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CompareError::Io(std::io::Error::other(format!("json encode: {e}"))))?;
    println!("{json}");
    Ok(())
}

fn run(parsed: &ParsedArgs) -> Result<(), CompareError> {
    if parsed.duplication {
        let a = SourceInput::Path(parsed.files[0].clone());
        let b = SourceInput::Path(parsed.files[1].clone());
        let report = cpp_sim_check_core::duplication(&a, &b, &parsed.options)?;

        if parsed.json {
            write_json(&JsonDuplication {
                runs: report.runs.len(),
                report_a: report.render_a(),
                report_b: report.render_b(),
            })?;
        } else {
            print!("{}", format_duplication(&report, &parsed.files));
        }
        return Ok(());
    }

    let reference = SourceInput::Path(parsed.files[0].clone());
    let candidates = &parsed.files[1..];
    let target = if candidates.len() == 1 {
        Target::Single(SourceInput::Path(candidates[0].clone()))
    } else {
        Target::Many(
            candidates
                .iter()
                .map(|path| SourceInput::Path(path.clone()))
                .collect(),
        )
    };

    let outcome = cpp_sim_check_core::similarity(&reference, &target, &parsed.options)?;

    if parsed.json {
        write_json(&JsonSimilarity {
            score: outcome.score,
            best_index: outcome.best_index,
            best_path: outcome
                .best_index
                .map(|index| candidates[index].display().to_string()),
        })?;
    } else {
        print!("{}", format_similarity(&outcome, candidates));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            if !args.iter().any(|a| a == "-V" || a == "--version") {
                print_help();
            }
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(&parsed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn similarity_needs_a_reference_and_a_candidate() {
        let err = parse_args(&argv(&["only.cpp"])).unwrap_err();
        assert!(err.contains("at least one candidate"));
    }

    #[test]
    fn duplication_needs_exactly_two_files() {
        let err = parse_args(&argv(&["--duplication", "a.cpp"])).unwrap_err();
        assert!(err.contains("exactly 2"));

        let err = parse_args(&argv(&["--duplication", "a.cpp", "b.cpp", "c.cpp"])).unwrap_err();
        assert!(err.contains("exactly 2"));
    }

    #[test]
    fn winnowing_parameters_are_parsed() {
        let parsed = parse_args(&argv(&["--kgram", "4", "--window", "9", "a.cpp", "b.cpp"]))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.options.kgram_len, 4);
        assert_eq!(parsed.options.window_size, 9);
    }

    #[test]
    fn zero_kgram_is_a_usage_error() {
        let err = parse_args(&argv(&["--kgram", "0", "a.cpp", "b.cpp"])).unwrap_err();
        assert!(err.contains(">= 1"));
    }

    #[test]
    fn no_timeout_clears_the_bound() {
        let parsed = parse_args(&argv(&["--no-timeout", "a.cpp", "b.cpp"]))
            .unwrap()
            .unwrap();
        assert!(parsed.options.preprocess_timeout.is_none());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = parse_args(&argv(&["--frobnicate", "a.cpp", "b.cpp"])).unwrap_err();
        assert!(err.contains("Unknown option"));
    }

    #[test]
    fn compiler_and_encoding_pass_through() {
        let parsed = parse_args(&argv(&[
            "--compiler", "clang++", "--encoding", "utf-8", "a.cpp", "b.cpp",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(parsed.options.compiler, "clang++");
        assert_eq!(parsed.options.encoding, "utf-8");
    }
}
