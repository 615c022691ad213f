//! Text rendering of the record list and the form.

use chrono::{DateTime, Local, Utc};
use comfy_table::{Cell, CellAlignment, Table};

use bandscore_client::Layout;
use bandscore_core::controller::{FormMode, FormState};
use bandscore_core::model::{format_score, ScoreRecord, ScoreSchema};

/// Turn `auto` into a concrete layout for a terminal `width` columns wide.
///
/// Unknown width means a wide terminal.
pub fn resolve_layout(layout: Layout, width: Option<usize>, breakpoint: usize) -> Layout {
    match layout {
        Layout::Auto => match width {
            Some(w) if w < breakpoint => Layout::Cards,
            _ => Layout::Table,
        },
        fixed => fixed,
    }
}

/// Terminal width from `COLUMNS`, if set.
pub fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS").ok()?.trim().parse().ok()
}

pub fn render_records(records: &[&ScoreRecord], schema: &ScoreSchema, layout: Layout) -> String {
    if records.is_empty() {
        return "No students found.".to_string();
    }
    match layout {
        Layout::Cards => render_cards(records, schema),
        _ => render_table(records, schema),
    }
}

/// Name, one column per skill, and the id.
pub fn render_table(records: &[&ScoreRecord], schema: &ScoreSchema) -> String {
    let mut table = Table::new();

    let mut header = vec![Cell::new("Name")];
    header.extend(schema.skills().iter().map(|s| Cell::new(s.label())));
    header.push(Cell::new("ID"));
    table.set_header(header);

    for record in records {
        let mut row = vec![Cell::new(&record.name)];
        row.extend(schema.skills().iter().map(|s| {
            Cell::new(format_score(record.score(*s))).set_alignment(CellAlignment::Center)
        }));
        row.push(Cell::new(id_text(record)));
        table.add_row(row);
    }

    table.to_string()
}

/// One block per record: name and id, then a `Skill: score` line per skill.
pub fn render_cards(records: &[&ScoreRecord], schema: &ScoreSchema) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{} (#{})\n", record.name, id_text(record)));
        for skill in schema.skills() {
            out.push_str(&format!(
                "  {}: {}\n",
                skill.label(),
                format_score(record.score(*skill))
            ));
        }
    }
    out.trim_end().to_string()
}

/// The open form with its current draft values.
pub fn render_form(form: &FormState, saving: bool) -> String {
    let title = match &form.mode {
        FormMode::Create => "New student".to_string(),
        FormMode::Edit(id) => format!("Edit student #{id}"),
    };

    let mut out = format!("-- {title} --\n");
    out.push_str(&format!("  name: {}\n", form.draft.name));
    for (skill, value) in form.draft.fields() {
        out.push_str(&format!("  {}: {value}\n", skill.key()));
    }
    out.push_str(if saving {
        "[Cancel] [Saving...]"
    } else {
        "[Cancel] [Save]"
    });
    out
}

pub fn render_footer(shown: usize, total: usize, refreshed: Option<DateTime<Utc>>) -> String {
    let mut footer = format!("{shown} of {total} student(s)");
    if let Some(at) = refreshed {
        let local: DateTime<Local> = at.into();
        footer.push_str(&format!(", refreshed {}", local.format("%H:%M:%S")));
    }
    footer
}

fn id_text(record: &ScoreRecord) -> String {
    record
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}
