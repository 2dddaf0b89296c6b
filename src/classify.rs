//! Line Classifier: pure, deterministic line -> (LineType, LineContext).

use crate::task::{CognitiveLoad, LineContext, LineType};

/// Classify a single line of process output.
///
/// Pure and side-effect free: the same `(line, command, args)` always
/// yields the same result. `context.is_internal` is always false here;
/// only the process supervisor marks a line internal.
pub fn classify(line: &str, command: &str, args: &[String]) -> (LineType, LineContext) {
    let trimmed = line.trim_end_matches('\r').trim();

    if is_progress_marker(line, trimmed) {
        return (
            LineType::Progress,
            LineContext::classified(CognitiveLoad::Low, 1),
        );
    }

    if let Some((line_type, load, importance)) = leading_token_classification(trimmed) {
        return (line_type, LineContext::classified(load, importance));
    }

    if let Some((line_type, load, importance)) = command_hint_classification(trimmed, command, args) {
        return (line_type, LineContext::classified(load, importance));
    }

    (
        LineType::Detail,
        LineContext::classified(CognitiveLoad::Low, 2),
    )
}

fn is_progress_marker(raw: &str, trimmed: &str) -> bool {
    if raw.ends_with('\r') && !raw.ends_with("\r\n") {
        return true;
    }
    looks_like_percentage(trimmed)
}

fn looks_like_percentage(trimmed: &str) -> bool {
    let Some(percent_idx) = trimmed.find('%') else {
        return false;
    };
    let digits_before = trimmed[..percent_idx]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    digits_before > 0
}

/// Leading-token heuristics shared by most build/test tool output.
fn leading_token_classification(trimmed: &str) -> Option<(LineType, CognitiveLoad, u8)> {
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("error:") || lower.starts_with("error ") || lower.starts_with("fatal:") {
        return Some((LineType::Error, CognitiveLoad::High, 5));
    }
    if trimmed.starts_with("FAIL") || lower.starts_with("failed:") {
        return Some((LineType::Error, CognitiveLoad::High, 5));
    }
    if lower.starts_with("warning:") || lower.starts_with("warn:") {
        return Some((LineType::Warning, CognitiveLoad::Medium, 3));
    }
    if trimmed.starts_with("PASS") || lower.starts_with("ok:") || lower.starts_with("success:") {
        return Some((LineType::Success, CognitiveLoad::Low, 2));
    }
    if trimmed.starts_with("===") || trimmed.starts_with("---") {
        return Some((LineType::Info, CognitiveLoad::Low, 2));
    }
    if lower.starts_with("info:") || lower.starts_with("note:") {
        return Some((LineType::Info, CognitiveLoad::Low, 2));
    }

    None
}

/// Command/argument-driven bias. `go test -json` output is structured and
/// should default toward neutral detail lines rather than aggressive
/// error/warning keyword matching, since the adapter registry (not the
/// classifier) is responsible for interpreting that stream.
fn command_hint_classification(
    trimmed: &str,
    command: &str,
    args: &[String],
) -> Option<(LineType, CognitiveLoad, u8)> {
    let is_go_test_json = command.ends_with("go")
        && args.iter().any(|a| a == "test")
        && args.iter().any(|a| a == "-json");

    if is_go_test_json {
        if trimmed.is_empty() {
            return Some((LineType::Detail, CognitiveLoad::Low, 1));
        }
        return Some((LineType::Detail, CognitiveLoad::Low, 2));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_plain(line: &str) -> (LineType, LineContext) {
        classify(line, "make", &[])
    }

    #[test]
    fn error_prefix_is_high_importance() {
        let (t, ctx) = classify_plain("error: undefined symbol `foo`");
        assert_eq!(t, LineType::Error);
        assert_eq!(ctx.importance, 5);
        assert!(!ctx.is_internal);
    }

    #[test]
    fn fail_token_classified_as_error() {
        let (t, _) = classify_plain("FAIL    github.com/example/pkg    0.4s");
        assert_eq!(t, LineType::Error);
    }

    #[test]
    fn pass_token_classified_as_success() {
        let (t, _) = classify_plain("PASS");
        assert_eq!(t, LineType::Success);
    }

    #[test]
    fn warning_prefix_classified_medium() {
        let (t, ctx) = classify_plain("warning: unused variable `x`");
        assert_eq!(t, LineType::Warning);
        assert_eq!(ctx.cognitive_load, CognitiveLoad::Medium);
    }

    #[test]
    fn trailing_cr_is_progress() {
        let (t, _) = classify_plain("downloading... 42%\r");
        assert_eq!(t, LineType::Progress);
    }

    #[test]
    fn percentage_pattern_is_progress() {
        let (t, _) = classify_plain("Building [===>    ] 57%");
        assert_eq!(t, LineType::Progress);
    }

    #[test]
    fn unclassified_line_is_detail_low_importance() {
        let (t, ctx) = classify_plain("some random tool output");
        assert_eq!(t, LineType::Detail);
        assert_eq!(ctx.importance, 2);
    }

    #[test]
    fn go_test_json_biases_toward_neutral_detail() {
        let args = vec!["test".to_string(), "-json".to_string(), "./...".to_string()];
        let (t, ctx) = classify(r#"{"Action":"pass","Package":"x"}"#, "go", &args);
        assert_eq!(t, LineType::Detail);
        assert_eq!(ctx.importance, 2);
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify_plain("error: boom");
        let b = classify_plain("error: boom");
        assert_eq!(a.0, b.0);
        assert_eq!(a.1.importance, b.1.importance);
    }
}
