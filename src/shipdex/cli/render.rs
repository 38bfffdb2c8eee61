use chrono::{NaiveDate, Utc};
use colored::Colorize;
use shipdex::api::{CmdMessage, MessageLevel};
use shipdex::config::ShipdexConfig;
use shipdex::model::PairingRecord;
use shipdex::query::{CatalogStats, FandomCount};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const FAVORITE_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_pairings(records: &[PairingRecord]) {
    if records.is_empty() {
        println!("No pairings found.");
        return;
    }

    let today = Utc::now().date_naive();
    let id_width = records
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(1);

    for record in records {
        println!("{}", format_row(record, id_width, today));
    }
}

fn format_row(record: &PairingRecord, id_width: usize, today: NaiveDate) -> String {
    let id = format!("{:>width$}. ", record.id, width = id_width);
    let marker = if record.favorite {
        format!("{} ", FAVORITE_MARKER)
    } else {
        "  ".to_string()
    };

    let text = format!("{}  {}", record.label(), record.fandom);
    let fixed = 2 + id.width() + marker.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let shown = truncate_to_width(&text, available);
    let padding = available.saturating_sub(shown.width());

    let label_width = record.label().width().min(shown.width());
    let (label, rest) = split_at_width(&shown, label_width);

    format!(
        "  {}{}{}{}{}{}",
        id.yellow(),
        label.bold(),
        rest.dimmed(),
        " ".repeat(padding),
        marker.yellow(),
        format_age(record.added_date, today).dimmed()
    )
}

pub(super) fn print_full_pairings(records: &[PairingRecord]) {
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let star = if record.favorite {
            format!(" {}", FAVORITE_MARKER).yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            record.id.to_string().yellow(),
            record.label().bold(),
            star
        );
        println!("--------------------------------");
        for (label, value) in detail_fields(record) {
            println!("{:<14} {}", format!("{}:", label).dimmed(), value);
        }
    }
}

fn detail_fields(record: &PairingRecord) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("Characters", record.characters.clone()),
        ("Fandom", record.fandom.clone()),
        ("Universe", record.universe.to_string()),
        ("Status", record.status.to_string()),
        ("Relationship", record.relationship.clone()),
    ];
    let optional = [
        ("Since", &record.year_started),
        ("Media", &record.media),
        ("Dynamic", &record.dynamic),
        ("Trope", &record.trope),
    ];
    for (label, value) in optional {
        if let Some(v) = value {
            fields.push((label, v.clone()));
        }
    }
    if !record.tags.is_empty() {
        fields.push(("Tags", record.tags.join(", ")));
    }
    fields.push(("Fanfics", record.fanfic_count.to_string()));
    fields.push(("Art", record.art_count.to_string()));
    fields.push(("Rating", stars(record.rating)));
    if let Some(notes) = &record.notes {
        fields.push(("Notes", notes.clone()));
    }
    if let Some(image) = &record.image {
        let shown = if image.is_embedded() {
            format!("embedded ({} bytes)", image.as_str().len())
        } else {
            image.as_str().to_string()
        };
        fields.push(("Image", shown));
    }
    fields.push(("Added", record.added_date.format("%Y-%m-%d").to_string()));
    fields
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub(super) fn print_stats(stats: &CatalogStats) {
    let rows = [
        ("Pairings", stats.total.to_string()),
        ("Favorites", stats.favorites.to_string()),
        ("Canon", stats.canon.to_string()),
        ("Fandoms", stats.fandoms.to_string()),
        ("Fanfics", stats.fanfics.to_string()),
        ("Art", stats.art.to_string()),
    ];
    for (label, value) in rows {
        println!("{:<10} {}", format!("{}:", label).dimmed(), value.bold());
    }
}

pub(super) fn print_fandoms(fandoms: &[FandomCount]) {
    let width = fandoms.iter().map(|f| f.fandom.width()).max().unwrap_or(0);
    for entry in fandoms {
        let padding = width.saturating_sub(entry.fandom.width());
        println!(
            "  {}{}  {}",
            entry.fandom,
            " ".repeat(padding),
            entry.count.to_string().yellow()
        );
    }
}

pub(super) fn print_config(config: &ShipdexConfig) {
    for (key, value) in config.entries() {
        let shown = if value.is_empty() {
            "(unset)".dimmed().to_string()
        } else {
            value
        };
        println!("{} = {}", key, shown);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

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

fn split_at_width(s: &str, width: usize) -> (String, String) {
    let mut head = String::new();
    let mut used = 0;
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        head.push(c);
        used += w;
        chars.next();
    }
    (head, chars.collect())
}

fn format_age(added: NaiveDate, today: NaiveDate) -> String {
    let days = today.signed_duration_since(added).num_days().max(0) as u64;
    let time_str = if days == 0 {
        "today".to_string()
    } else {
        let formatter = Formatter::new();
        formatter.convert(std::time::Duration::from_secs(days * 24 * 60 * 60))
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
