// src/report.rs

//! Presentation helpers: colour lookup and plain result lines.
//!
//! Gating logic never looks at anything in here.

use std::time::Duration;

use crate::types::Bucket;

/// Width of a formatted result line (without timing).
pub const TERM_COLS: usize = 110;

/// Display colour associated with a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    Yellow,
    Cyan,
    Reset,
}

pub fn color_of(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Pass => Color::Green,
        Bucket::Fail | Bucket::Deleted => Color::Red,
        Bucket::Diff => Color::Yellow,
        Bucket::Pending | Bucket::Finished => Color::Cyan,
        Bucket::Skip | Bucket::Silent => Color::Reset,
    }
}

/// `name.......... RESULT [1.234s]`
///
/// `result` is usually `"<BUCKET> <reason>"`. Dots pad the line out to
/// [`TERM_COLS`]; at least one dot is always emitted.
pub fn format_result(name: &str, result: &str, timing: Option<Duration>) -> String {
    let used = name.chars().count() + result.chars().count();
    let dots = (TERM_COLS - 2).saturating_sub(used).max(1);

    let mut line = format!("{name}{} {result}", ".".repeat(dots));
    if let Some(t) = timing {
        line.push_str(&format!(" [{:.3}s]", t.as_secs_f64()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_follow_bucket() {
        assert_eq!(color_of(Bucket::Pass), Color::Green);
        assert_eq!(color_of(Bucket::Deleted), Color::Red);
        assert_eq!(color_of(Bucket::Diff), Color::Yellow);
        assert_eq!(color_of(Bucket::Finished), Color::Cyan);
        assert_eq!(color_of(Bucket::Silent), Color::Reset);
    }

    #[test]
    fn result_line_is_padded() {
        let line = format_result("kernels/simple", "PASS", None);
        assert_eq!(line.chars().count(), TERM_COLS - 1);
        assert!(line.starts_with("kernels/simple..."));
        assert!(line.ends_with(" PASS"));
    }

    #[test]
    fn result_line_with_timing() {
        let line = format_result("a", "FAIL boom", Some(Duration::from_millis(1500)));
        assert!(line.ends_with("FAIL boom [1.500s]"));
    }

    #[test]
    fn long_names_still_get_a_dot() {
        let name = "x".repeat(200);
        let line = format_result(&name, "SKIP", None);
        assert!(line.contains("x. SKIP"));
    }
}
