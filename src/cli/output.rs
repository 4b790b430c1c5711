//! Output formatting for CLI

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a fraction as a percentage with one decimal
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the summary table for a finished training run
pub fn print_training_result(result: &TrainingResult) {
    print_subsection("Results");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Red wins",
        &format!(
            "{} ({})",
            format_number(result.red_wins),
            format_percent(result.red_win_rate)
        ),
    );
    print_kv(
        "Black wins",
        &format!(
            "{} ({})",
            format_number(result.black_wins),
            format_percent(result.black_win_rate)
        ),
    );
    print_kv("Turn cap reached", &format_number(result.truncated));
    print_kv("Average turns", &format!("{:.1}", result.average_turns));
    print_kv("Red epsilon", &format!("{:.4}", result.red_epsilon));
    print_kv("Black epsilon", &format!("{:.4}", result.black_epsilon));
    print_kv("Red table entries", &format_number(result.red_table_size));
    print_kv("Black table entries", &format_number(result.black_table_size));
}
