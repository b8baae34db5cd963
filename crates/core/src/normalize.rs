use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;

use crate::error::{CompareError, Result};
use crate::types::Options;

/// How much normalization a pipeline path needs. The duplication path stops
/// after macro expansion so its report quotes the expanded source faithfully;
/// the similarity path additionally folds away text that only obscures
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalizeMode {
    Full,
    Expanded,
}

pub(crate) fn normalize(code: &str, mode: NormalizeMode, options: &Options) -> Result<String> {
    let stripped = strip_includes(code);
    let expanded = preprocess(&stripped, options)?;
    match mode {
        NormalizeMode::Expanded => Ok(expanded),
        NormalizeMode::Full => Ok(fold_source(&strip_marker_lines(&expanded))),
    }
}

// Splices out every `#include` directive up to and including its newline; a
// directive on the last line without a trailing newline is cut to end of
// input.
pub(crate) fn strip_includes(code: &str) -> String {
    let mut out = code.to_string();
    while let Some(start) = out.find("#include") {
        let end = match out[start..].find('\n') {
            Some(rel) => start + rel + 1,
            None => out.len(),
        };
        out.replace_range(start..end, "");
    }
    out
}

// Drops the `# <line> "<file>"` marker lines the preprocessor leaves behind.
pub(crate) fn strip_marker_lines(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for line in code.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            continue;
        }
        out.push_str(line);
    }
    out
}

static USING_NAMESPACE_STD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"using\s+namespace\s+std;").expect("static pattern"));
static STD_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"std\s*::").expect("static pattern"));
static EMPTY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\)|\[\]|<>|\{\}").expect("static pattern"));

// Literal pattern replacements, deliberately not syntax-aware: fold namespace
// qualifiers and collapse empty bracket pairs (single pass each).
pub(crate) fn fold_source(code: &str) -> String {
    let folded = USING_NAMESPACE_STD.replace_all(code, "");
    let folded = STD_QUALIFIER.replace_all(&folded, "");
    EMPTY_BRACKETS.replace_all(&folded, "").into_owned()
}

fn preprocess(code: &str, options: &Options) -> Result<String> {
    let mut temp = tempfile::Builder::new()
        .prefix("cpp-sim-check-")
        .suffix(".cpp")
        .tempfile()?;
    temp.write_all(code.as_bytes())?;
    temp.flush()?;

    let expanded = run_preprocessor(&options.compiler, temp.path(), options.preprocess_timeout);

    // Cleanup failures don't affect the returned result; log and move on.
    if let Err(err) = temp.close() {
        log::warn!("failed to remove preprocessor temp file: {err}");
    }

    expanded
}

fn run_preprocessor(compiler: &str, path: &Path, timeout: Option<Duration>) -> Result<String> {
    let mut child = Command::new(compiler)
        .arg("-E")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| CompareError::preprocess(format!("failed to launch {compiler}: {err}")))?;

    let Some(mut stdout) = child.stdout.take() else {
        return Err(CompareError::preprocess("preprocessor stdout not captured"));
    };
    let Some(mut stderr) = child.stderr.take() else {
        return Err(CompareError::preprocess("preprocessor stderr not captured"));
    };

    // Drain both pipes on their own threads so a chatty compiler can't fill a
    // pipe buffer and deadlock against our wait loop.
    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).map(|_| buf)
    });

    let status = match timeout {
        None => child.wait()?,
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if Instant::now() >= deadline {
                    if let Err(err) = child.kill() {
                        log::warn!("failed to kill timed-out preprocessor: {err}");
                    }
                    let _ = child.wait();
                    return Err(CompareError::preprocess(format!(
                        "{compiler} -E did not finish within {}s",
                        limit.as_secs()
                    )));
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
    };

    let stdout = stdout_reader
        .join()
        .map_err(|_| CompareError::preprocess("stdout reader panicked"))??;
    let stderr = stderr_reader
        .join()
        .map_err(|_| CompareError::preprocess("stderr reader panicked"))??;

    if !status.success() {
        let detail = String::from_utf8_lossy(&stderr);
        return Err(CompareError::preprocess(format!(
            "{compiler} -E exited with {status}: {}",
            detail.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}
