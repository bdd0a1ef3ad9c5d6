// Terminal output — colored display of extracted data and the final
// ranking. All formatting lives here; main.rs just calls through.

use colored::Colorize;

use crate::extract::TopicBlock;
use crate::preprocess::NormalizedBlock;
use crate::ranking::rank::TopicScore;

/// Truncate a string to at most `max_chars` characters, appending "..."
/// when truncated. Respects UTF-8 character boundaries, unlike byte
/// slicing.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Display raw extracted topic blocks.
pub fn display_blocks(blocks: &[TopicBlock]) {
    if blocks.is_empty() {
        println!("No topic headings found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topic blocks ({}) ===", blocks.len()).bold()
    );
    for block in blocks {
        println!("\n  {}", block.heading.bold());
        if block.content.is_empty() {
            println!("    {}", "(no content)".dimmed());
        } else {
            for line in block.content.lines() {
                println!("    {}", truncate_chars(line, 100));
            }
        }
    }
    println!();
}

/// Display normalized topic blocks as token sequences.
pub fn display_normalized_blocks(blocks: &[NormalizedBlock]) {
    if blocks.is_empty() {
        println!("No topic headings found in the uploaded files.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Normalized topic blocks ({}) ===", blocks.len()).bold()
    );
    for block in blocks {
        println!("\n  {}", block.heading.join(" ").bold());
        println!(
            "    {}",
            truncate_chars(&block.content.join(" "), 120).dimmed()
        );
    }
    println!();
}

/// Display raw extracted question units.
pub fn display_questions(questions: &[String]) {
    if questions.is_empty() {
        println!("No questions found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Question units ({}) ===", questions.len()).bold()
    );
    for (i, question) in questions.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, truncate_chars(question, 110));
    }
    println!();
}

/// Display normalized questions as token sequences.
pub fn display_normalized_questions(questions: &[Vec<String>]) {
    if questions.is_empty() {
        println!("No questions found in the uploaded quiz files.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Normalized questions ({}) ===", questions.len()).bold()
    );
    for (i, tokens) in questions.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, truncate_chars(&tokens.join(" "), 110));
    }
    println!();
}

/// Display the final ranking as a bar chart, most probed topic first.
///
/// Bars are scaled against the top score so the relative weight of each
/// topic is scannable at a glance.
pub fn display_rankings(rankings: &[TopicScore]) {
    if rankings.is_empty() {
        println!("Nothing to rank.");
        return;
    }

    println!(
        "\n{}",
        "=== Topic rankings (most to least important) ===".bold()
    );
    println!();

    let bar_width: usize = 24;
    let top_score = rankings
        .first()
        .map(|r| r.score)
        .filter(|s| *s > 0.0)
        .unwrap_or(1.0);

    for (i, entry) in rankings.iter().enumerate() {
        let fraction = (entry.score / top_score).clamp(0.0, 1.0);
        let filled = (fraction * bar_width as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(bar_width.saturating_sub(filled))
        );

        let colored_bar = if fraction >= 0.75 {
            bar.bright_green()
        } else if fraction >= 0.35 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>3}. {:<40} {} {:.4}",
            i + 1,
            truncate_chars(&entry.heading, 40).bold(),
            colored_bar,
            entry.score
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_is_unchanged() {
        assert_eq!(truncate_chars("hash tables", 20), "hash tables");
    }

    #[test]
    fn truncate_long_string_appends_ellipsis() {
        assert_eq!(truncate_chars("abcdefgh", 5), "abcde...");
    }

    #[test]
    fn truncate_respects_multibyte_chars() {
        // Would panic with byte slicing.
        let text = "héllo wörld émoji 🎓 extra";
        let out = truncate_chars(text, 10);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 13);
    }
}
