//! Plain-text rendering of the timeline, the counter and the form.

use crate::timeline::{DraftMemory, PhotoRef};
use crate::view::{Notice, NoticeKind};
use chrono::{DateTime, Local};
use memory_timeline_types::MemoryRecord;
use std::fmt::Write;

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Failure => "error",
        NoticeKind::Info => "info",
    };
    format!("[{}] {}", tag, notice.message)
}

pub fn render_counter(live_time: &str) -> String {
    let value = if live_time.is_empty() { "..." } else { live_time };
    format!("Together since\n  {}", value)
}

/// Cards alternate left/right, newest first.
pub fn render_timeline(records: &[MemoryRecord]) -> String {
    if records.is_empty() {
        return "No memories yet. Use `add` to create one.".to_string();
    }

    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        let side = if index % 2 == 0 { "<" } else { ">" };
        let _ = writeln!(out, "{} {} ({})  #{}", side, record.title, record.date, record.id);
        let _ = writeln!(out, "    {}", record.note);
        if !record.photo.is_empty() {
            let _ = writeln!(out, "    photo: {}", record.photo);
        }
        if let Some(created) = &record.created_at {
            let _ = writeln!(out, "    added on: {}", format_created_at(created));
        }
    }
    out.trim_end().to_string()
}

pub fn render_form(draft: Option<&DraftMemory>) -> String {
    let Some(draft) = draft else {
        return "Form is closed.".to_string();
    };

    let heading = match &draft.editing {
        Some(id) => format!("Editing memory #{}", id),
        None => "New memory".to_string(),
    };
    let photo = match &draft.photo {
        PhotoRef::Remote(url) if url.is_empty() => "(none)".to_string(),
        PhotoRef::Remote(url) => url.clone(),
        PhotoRef::Pending(upload) => format!("{} (will upload)", upload.path.display()),
    };
    let action = if draft.is_editing() { "update" } else { "save" };

    format!(
        "{}\n  date:  {}\n  title: {}\n  photo: {}\n  note:  {}\n(`save` to {})",
        heading, draft.date, draft.title, photo, draft.note, action
    )
}

/// Server timestamps are shown in local time; anything unparseable as-is.
fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}
