use colored::Colorize;

use crate::github::{Commit, FileChange};

/// Print the commit header followed by each changed file's summary and
/// colorized patch.
pub fn print_commit(commit: &Commit, changes: &[FileChange]) {
    println!(
        "🧩 Latest Commit: {} {}",
        commit.short_sha(),
        commit.message
    );
    println!(
        "👤 Author: {} <{}>",
        commit.author_name, commit.author_email
    );
    println!("📅 Date: {}", commit.date);
    println!("{}", "-".repeat(50));

    if changes.is_empty() {
        println!("This commit has no file changes.");
        return;
    }

    for change in changes {
        println!(
            "\n📄 File: {} | Status: {} (+{} / -{})",
            change.path, change.status, change.additions, change.deletions
        );
        if let Some(previous) = &change.previous_filename {
            println!("   (renamed from {previous})");
        }
        for line in patch_lines(change.patch.as_deref()) {
            println!("{line}");
        }
    }
}

/// Render a patch into output lines, colored by each line's leading
/// character: `+` green, `-` red, anything else untouched. An absent
/// patch renders as a single placeholder line.
fn patch_lines(patch: Option<&str>) -> Vec<String> {
    match patch {
        None => vec!["  (No patch text available)".to_string()],
        Some(text) => text.lines().map(colorize_patch_line).collect(),
    }
}

fn colorize_patch_line(line: &str) -> String {
    if line.starts_with('+') {
        line.green().to_string()
    } else if line.starts_with('-') {
        line.red().to_string()
    } else {
        line.to_string()
    }
}
