use crate::models::{Roster, Snapshot};

/// Display names are left-justified to this many columns.
pub const NAME_WIDTH: usize = 22;
pub const THOUSANDS_SEPARATOR: char = '.';
/// Last line of a report that had to be cut to fit the payload limit.
pub const TRUNCATION_MARKER: &str = "[...]";

const CODE_FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub id: String,
    pub name: String,
    pub delta: i64,
}

impl DiffLine {
    pub fn render(&self) -> String {
        let sign = if self.delta < 0 { '-' } else { '+' };
        format!(
            "{:<width$} {} {}",
            self.name,
            sign,
            group_thousands(self.delta.unsigned_abs()),
            width = NAME_WIDTH
        )
    }
}

/// Score changes between two snapshots, largest gain first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub timestamp: i64,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Both snapshots carry the same feed timestamp.
    NoChange,
    Report(Report),
}

/// Compare `new` against the `old` baseline.
///
/// Only ids present in both snapshots are considered and zero deltas are
/// dropped. Names come from `roster` when it knows the id, otherwise the
/// raw id is shown. Lines are ordered by delta, descending; equal deltas
/// keep ascending id order.
pub fn diff(old: &Snapshot, new: &Snapshot, roster: Option<&Roster>) -> DiffOutcome {
    if old.timestamp == new.timestamp {
        return DiffOutcome::NoChange;
    }

    let mut lines: Vec<DiffLine> = new
        .entities
        .iter()
        .filter_map(|(id, current)| {
            let previous = old.entities.get(id)?;
            let delta = current.score - previous.score;
            if delta == 0 {
                return None;
            }
            let name = roster
                .and_then(|r| r.name_from_id(id))
                .unwrap_or(id.as_str())
                .to_string();
            Some(DiffLine {
                id: id.clone(),
                name,
                delta,
            })
        })
        .collect();

    lines.sort_by(|a, b| b.delta.cmp(&a.delta));

    DiffOutcome::Report(Report {
        timestamp: new.timestamp,
        lines,
    })
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as a fenced code block of at most `limit` characters.
    ///
    /// When the full text is too long, trailing lines are dropped whole and
    /// replaced by [`TRUNCATION_MARKER`]; the fence is always closed.
    pub fn render(&self, syntax: &str, limit: usize) -> String {
        let header = format!(
            "{}{}\n{}\n\n",
            CODE_FENCE,
            syntax,
            format_update_time(self.timestamp)
        );
        let footer = format!("\n{}", CODE_FENCE);
        let body: Vec<String> = self.lines.iter().map(DiffLine::render).collect();

        let full = format!("{}{}{}", header, body.join("\n"), footer);
        if char_len(&full) <= limit {
            return full;
        }

        let budget = limit
            .saturating_sub(char_len(&header))
            .saturating_sub(char_len(&footer))
            .saturating_sub(char_len(TRUNCATION_MARKER));

        let mut out = header;
        let mut used = 0;
        let mut dropped = body.len();
        for line in &body {
            let cost = char_len(line) + 1;
            if used + cost > budget {
                break;
            }
            used += cost;
            dropped -= 1;
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(TRUNCATION_MARKER);
        out.push_str(&footer);

        tracing::debug!(limit, dropped, "Report truncated to fit payload limit");
        out
    }
}

/// Feed timestamp as local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
pub fn format_update_time(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }
    out
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
