use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::cycle::CycleOutcome;
use crate::models::{Field, WatchList};
use crate::notify::Delivery;
use crate::tracker::differ::{ActiveEntry, ChangeKind, EntryStatus};

/// Render a colored terminal report for one cycle.
pub fn render(outcome: &CycleOutcome, watch: &WatchList, state_path: &Path, quiet: bool) {
    let kind = outcome.classification.kind();
    let active = outcome.classification.active();
    let released = outcome.classification.released();

    if quiet {
        println!(
            "Change: {}  Active: {}  Released: {}  Notified: {}",
            colored_kind(kind),
            active.len(),
            released.len(),
            delivery_label(outcome.delivery.as_ref()),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "advisory-watch".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Watching: {}", watch);
    println!(" State:    {}\n", state_path.display());

    println!(" {}  {}", "Change:".bold(), colored_kind(kind));
    println!(
        " {}  {}",
        "Notify:".bold(),
        delivery_label(outcome.delivery.as_ref())
    );
    println!(
        " {}  {}\n",
        "Saved: ".bold(),
        if outcome.saved { "yes" } else { "no" }
    );

    if !active.is_empty() {
        println!(" {} Active advisories:\n", "[ACTIVE]".red().bold());
        render_table(active);
        println!();
    }

    if !released.is_empty() {
        println!(" {} Released:\n", "[CLEAR]".green().bold());
        for r in released {
            println!("   {} {} {} {}", "✓".green(), r.area, r.kind, r.level);
        }
        println!();
    }
}

fn render_table(active: &[ActiveEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Level").add_attribute(Attribute::Bold),
            Cell::new("Area").add_attribute(Attribute::Bold),
            Cell::new("Announced").add_attribute(Attribute::Bold),
            Cell::new("Effective").add_attribute(Attribute::Bold),
            Cell::new("Clear").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for entry in active {
        let r = &entry.record;
        let field_cell = |field: Field| {
            let cell = Cell::new(r.field(field));
            if entry.field_changed(field) {
                cell.fg(Color::Yellow).add_attribute(Attribute::Bold)
            } else {
                cell
            }
        };

        let (status, status_color) = match &entry.status {
            EntryStatus::New => ("new".to_string(), Color::Red),
            EntryStatus::Updated(fields) => (
                format!(
                    "updated ({})",
                    fields.iter().map(Field::to_string).collect::<Vec<_>>().join(", ")
                ),
                Color::Yellow,
            ),
            EntryStatus::Unchanged => ("unchanged".to_string(), Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(&r.kind),
            field_cell(Field::Level),
            Cell::new(&r.area),
            field_cell(Field::Announce),
            field_cell(Field::Effective),
            field_cell(Field::Clear),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{}", table);
}

fn colored_kind(kind: ChangeKind) -> ColoredString {
    match kind {
        ChangeKind::None => kind.to_string().dimmed(),
        ChangeKind::NewOrUpdated => kind.to_string().red().bold(),
        ChangeKind::PartiallyCleared => kind.to_string().yellow().bold(),
        ChangeKind::Cleared => kind.to_string().green().bold(),
    }
}

fn delivery_label(delivery: Option<&Delivery>) -> ColoredString {
    match delivery {
        None => "-".dimmed(),
        Some(Delivery::Sent) => "sent".green(),
        Some(failed) => failed.to_string().red(),
    }
}
