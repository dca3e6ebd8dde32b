use super::*;

const SQUARE: CanvasSize = CanvasSize {
    width: 1000,
    height: 1000,
};

fn words_of(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|l| l.split_whitespace().map(str::to_string))
        .collect()
}

#[test]
fn measure_fits_uses_byte_length() {
    assert!(measure_fits("Hi", 20, 1000));
    assert!(measure_fits("abcde", 200, 1000));
    assert!(!measure_fits("abcdef", 200, 1000));
    // Two bytes per character.
    assert!(!measure_fits("éé", 300, 1000));
    assert!(measure_fits("", 50, 0));
}

#[test]
fn wrap_empty_label_is_one_empty_line() {
    assert_eq!(wrap("", 50, 1000), vec![String::new()]);
    assert_eq!(wrap("   \t ", 50, 1000), vec![String::new()]);
}

#[test]
fn wrap_short_label_is_single_normalized_line() {
    assert_eq!(wrap("  hello   brave  world ", 10, 1000), vec!["hello brave world"]);
}

#[test]
fn wrap_closes_line_once_budget_is_reached() {
    // Budget 1000 / 100 = 10 chars.
    let lines = wrap("aaaa bbbb cccc dddd", 100, 1000);
    assert_eq!(lines, vec!["aaaa bbbb cccc", "dddd"]);
}

#[test]
fn wrap_last_word_is_not_rechecked() {
    // Budget 5: "ab" (2 < 5) takes "cdefghij" and becomes 11 chars, then the loop ends.
    let lines = wrap("ab cdefghij", 200, 1000);
    assert_eq!(lines, vec!["ab cdefghij"]);
}

#[test]
fn wrap_zero_budget_emits_leading_empty_line() {
    // Font larger than the width: the budget is 0 and the empty first line is closed.
    let lines = wrap("one two", 2000, 1000);
    assert_eq!(lines, vec!["", "one", "two"]);
}

#[test]
fn wrap_preserves_word_order() {
    let label = "the quick brown fox jumps over the lazy dog and keeps running far away";
    for fs in [10, 40, 50, 90, 150, 400] {
        let lines = wrap(label, fs, 1000);
        let input_words: Vec<String> = label.split_whitespace().map(str::to_string).collect();
        assert_eq!(words_of(&lines), input_words, "font size {fs}");
    }
}

#[test]
fn wrap_is_single_line_whenever_label_fits() {
    for label in ["Hi", "a b c", "twenty characters ok", "x  y"] {
        for fs in [1, 5, 20, 50] {
            if measure_fits(label, fs, 1000) {
                let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
                assert_eq!(wrap(label, fs, 1000), vec![normalized]);
            }
        }
    }
}

#[test]
fn long_label_wraps_into_budgeted_lines() {
    let label = vec!["word"; 60].join(" ");
    assert!(!measure_fits(&label, 50, 1000));

    let lines = wrap(&label, 50, 1000);
    assert!(lines.len() >= 2);
    let budget = (1000 / 50) as usize;
    for line in &lines[..lines.len() - 1] {
        // Closed lines were below budget before their final word was added.
        let without_last = line.rsplit_once(' ').map(|(head, _)| head.len()).unwrap_or(0);
        assert!(without_last < budget, "{line:?}");
    }
    assert_eq!(words_of(&lines).len(), 60);
}

#[test]
fn single_line_centering_has_no_nudge() {
    let line = layout_single("Hi", SQUARE, 20);
    assert_eq!(line.text, "Hi");
    assert_eq!(line.x, 500 - 2 * 20 / 4);
    assert_eq!(line.y, 500 - 10);
}

#[test]
fn wrapped_centering_adds_nudge() {
    let lines = vec!["abcd".to_string(), "ef".to_string()];
    let out = layout_wrapped(&lines, SQUARE, 100);
    assert_eq!(out.len(), 2);
    assert_eq!((out[0].x, out[0].y), (500 - 100 + 50, 500 - 100 + 50));
    assert_eq!((out[1].x, out[1].y), (500 - 50 + 50, 500 - 100 + 100 + 50));
}

#[test]
fn layout_label_selects_formula() {
    let short = layout_label("Hi", SQUARE, 20);
    assert!(!short.wrapped);
    assert_eq!(short.lines, vec![layout_single("Hi", SQUARE, 20)]);

    let label = vec!["word"; 60].join(" ");
    let long = layout_label(&label, SQUARE, 50);
    assert!(long.wrapped);
    assert!(long.lines.len() >= 2);
    for (i, line) in long.lines.iter().enumerate() {
        let expected_y = 500 - (50 * long.lines.len() as i64 / 2) + i as i64 * 50 + 50;
        assert_eq!(line.y, expected_y);
    }
}

#[test]
fn layout_allows_negative_offsets() {
    let line = layout_single("abcdefghij", CanvasSize { width: 10, height: 10 }, 1);
    assert_eq!(line.x, 5 - 10 / 4);

    let wide = layout_single("abcdefghijklmnopqrstuvwxyz", CanvasSize { width: 10, height: 4 }, 10);
    assert!(wide.x < 0);
    assert_eq!(wide.y, 2 - 5);
}
