//! # Rendering
//!
//! Terminal output for the CLI. Layout math (widths, truncation, padding)
//! is Unicode-aware and kept in small functions that return strings, so it can
//! be tested without a terminal; the `print_*` functions only add color.

use chrono::{DateTime, Utc};
use colored::*;
use flashgen::api::{CmdMessage, GenerationReport, MessageLevel};
use flashgen::config::FlashgenConfig;
use flashgen::index::IndexedCollection;
use flashgen::model::{level_label, Collection, Flashcard, Stats};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const MAX_LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const COUNT_WIDTH: usize = 10;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_collections(collections: &[IndexedCollection]) {
    if collections.is_empty() {
        println!("No collections found.");
        return;
    }

    let width = line_width();
    for ic in collections {
        let idx = format!("{:>3}. ", ic.index);
        let count = format_card_count(ic.metadata.card_count);
        let time = format_time_ago(ic.metadata.created_at);

        let fixed = idx.width() + COUNT_WIDTH + TIME_WIDTH + 2;
        let available = width.saturating_sub(fixed);
        let label = format!("{} ({})", ic.metadata.title, ic.metadata.subject);
        let label = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label.width());

        println!(
            "{}{}{}  {}{}",
            idx.yellow(),
            label,
            " ".repeat(padding),
            count,
            time.dimmed()
        );
    }
}

pub fn print_full_collection(index: Option<usize>, collection: &Collection) {
    let meta = &collection.metadata;
    let header = match index {
        Some(i) => format!("{} {}", format!("{}.", i).yellow(), meta.title.bold()),
        None => meta.title.bold().to_string(),
    };
    println!("{}", header);
    println!(
        "{}",
        format!(
            "{} · {} · {} cards · {}",
            meta.subject,
            level_label(meta.difficulty),
            meta.card_count,
            meta.id
        )
        .dimmed()
    );
    println!("--------------------------------");

    if collection.cards.is_empty() {
        println!("{}", "(no cards)".dimmed());
    }
    for (i, card) in collection.cards.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_card(i + 1, card);
    }
}

pub fn print_card(position: usize, card: &Flashcard) {
    println!(
        "{} {} {}",
        format!("{:>2}.", position).yellow(),
        card_tag(card).dimmed(),
        card.front.bold()
    );
    for line in card.back.lines() {
        println!("    {}", line);
    }
}

fn card_tag(card: &Flashcard) -> String {
    match &card.topic {
        Some(topic) => format!("[{}, {}]", card.difficulty, topic),
        None => format!("[{}]", card.difficulty),
    }
}

pub fn print_report(report: &GenerationReport, verbose: bool) {
    if verbose {
        let c = &report.content;
        println!(
            "{}",
            format!(
                "Source: {} characters, {} words, {} paragraphs (~{} min read)",
                c.characters, c.words, c.paragraphs, c.reading_minutes
            )
            .dimmed()
        );
    }
    if !report.collection.cards.is_empty() {
        print_full_collection(None, &report.collection);
        println!();
    }
}

pub fn print_stats(stats: &Stats) {
    println!("Collections: {}", stats.total_collections);
    println!("Cards:       {}", stats.total_cards);
    println!("Average:     {:.1} cards per collection", stats.average_cards());
    if stats.subjects.is_empty() {
        println!("Subjects:    {}", "none".dimmed());
    } else {
        println!("Subjects:    {}", stats.subjects.join(", "));
    }
}

pub fn print_config(config: &FlashgenConfig) {
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
}

fn format_card_count(count: usize) -> String {
    let label = format!("{} cards", count);
    format!("{:>width$}", label, width = COUNT_WIDTH)
}

fn line_width() -> usize {
    let (_, cols) = console::Term::stdout().size();
    (cols as usize).clamp(40, MAX_LINE_WIDTH)
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    if s.width() <= max_width {
        return s.to_string();
    }

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
