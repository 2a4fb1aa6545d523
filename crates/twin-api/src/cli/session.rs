//! `twin sessions`: list stored conversations.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use twin_core::history::summary::summarize_sessions;
use twin_infra::history::build_history_store;
use twin_types::config::TwinConfig;
use twin_types::session::SessionSummary;

/// Longest message preview shown in the table, in characters.
const PREVIEW_CHARS: usize = 60;

/// List every stored session with its turn count and last message.
///
/// # Examples
///
/// ```bash
/// twin sessions
/// twin sessions --json
/// ```
pub async fn list_sessions(config: &TwinConfig, json: bool) -> Result<()> {
    let store = build_history_store(&config.storage)
        .await
        .context("failed to open conversation history store")?;
    let sessions = summarize_sessions(&store)
        .await
        .context("failed to list sessions")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "sessions": sessions }))?
        );
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions stored in {} yet.",
            style("i").blue().bold(),
            style(config.storage.backend).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  Sessions ({} storage)",
        style(config.storage.backend).cyan().bold()
    );
    println!();
    println!("{}", session_table(&sessions));
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn session_table(sessions: &[SessionSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Last message").fg(Color::White),
    ]);

    for session in sessions {
        let last = match &session.last_message {
            Some(text) => Cell::new(preview(text)).fg(Color::White),
            None => Cell::new("(empty)").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(session.session_id.as_str()).fg(Color::Cyan),
            Cell::new(session.message_count.to_string()).fg(Color::White),
            last,
        ]);
    }

    table
}

/// First line of `text`, cut to `PREVIEW_CHARS` on a character boundary.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_first_line() {
        assert_eq!(preview("first\nsecond"), "first");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_table_renders_empty_record() {
        let sessions = vec![SessionSummary {
            session_id: "abc".parse().unwrap(),
            last_message: None,
            message_count: 0,
        }];
        let rendered = session_table(&sessions).to_string();
        assert!(rendered.contains("abc"));
        assert!(rendered.contains("(empty)"));
    }
}
