//! Text handling and wrapping utilities

use crate::font::{EstimatedMetrics, FontMetrics};
use tracing::trace;

/// Break text into lines whose estimated width fits within `max_width`.
///
/// Words are packed greedily and joined by a single space. A word that is
/// wider than `max_width` on its own is kept whole on its own line.
/// Empty or whitespace-only input yields no lines.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    wrap_text_with_metrics(text, font_size, max_width, &EstimatedMetrics::default())
}

/// Break text into lines using the supplied font metrics for measurement.
pub fn wrap_text_with_metrics(
    text: &str,
    font_size: f32,
    max_width: f32,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line.push_str(word);
            continue;
        }

        let candidate = format!("{current_line} {word}");
        if metrics.text_width(&candidate, font_size) <= max_width {
            current_line = candidate;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    trace!("Wrapped text into {} lines", lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::estimate_text_width;

    #[test]
    fn test_wrap_text() {
        let text = "This is a long piece of text that should be wrapped into multiple lines";
        let lines = wrap_text(text, 10.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_empty_text() {
        assert!(wrap_text("", 10.0, 100.0).is_empty());
        assert!(wrap_text("   \n\t ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_single_long_word_is_not_split() {
        let text = "supercalifragilisticexpialidocious";
        let lines = wrap_text(text, 10.0, 50.0);
        assert_eq!(lines, vec![text.to_string()]);
    }

    #[test]
    fn test_long_word_gets_its_own_line() {
        let lines = wrap_text("a supercalifragilisticexpialidocious b", 10.0, 50.0);
        assert_eq!(lines, vec!["a", "supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_whitespace_collapses_to_single_space() {
        let lines = wrap_text("one   two\n\nthree", 10.0, 500.0);
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn test_exact_fit_stays_on_one_line() {
        // "ab cd" is 5 chars * 10pt * 0.5 = 25pt
        assert_eq!(wrap_text("ab cd", 10.0, 25.0), vec!["ab cd"]);
        assert_eq!(wrap_text("ab cd", 10.0, 24.9), vec!["ab", "cd"]);
    }

    #[test]
    fn test_lines_never_exceed_width_unless_single_word() {
        let samples = [
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor",
            "x yy zzz wwww vvvvv uuuuuu ttttttt ssssssss rrrrrrrrr qqqqqqqqqq",
            "Revenue grew in every region thanks to the onboarding of three enterprise accounts",
        ];
        for text in samples {
            for size in [8.0, 11.0, 14.0] {
                for max_width in [20.0, 60.0, 150.0, 512.0] {
                    for line in wrap_text(text, size, max_width) {
                        let fits = estimate_text_width(&line, size) <= max_width;
                        let single_word = !line.contains(' ');
                        assert!(
                            fits || single_word,
                            "line {line:?} overflows {max_width} at size {size}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_multibyte_char_wrapping_no_panic() {
        let text = "caf\u{00e9} caf\u{00e9} caf\u{00e9} caf\u{00e9}";
        let lines = wrap_text(text, 10.0, 45.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.join(" "), text);
    }
}
