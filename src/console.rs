use std::io::Write;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Weekday};

use crate::calendar::MonthView;
use crate::current::{CurrentEntryState, EditMode};
use crate::week::DayBucket;

/// 週の集計結果を表示するためのtrait。
pub trait WeekPresenter {
    /// 日ごとの集計結果を表示する。
    ///
    /// # Arguments
    ///
    /// * `buckets` - 表示する日ごとの集計結果
    fn show_week(&mut self, buckets: &[DayBucket]) -> Result<()>;
}

/// 週の集計結果をMarkdownのlist形式で表示する。
pub struct MarkdownWeek<'a, W: Write> {
    writer: &'a mut W,
    /// 時刻の表示に利用するタイムゾーン。
    offset: FixedOffset,
}

impl<'a, W: Write> MarkdownWeek<'a, W> {
    /// 新しい`MarkdownWeek`を返す。
    pub fn new(writer: &'a mut W, offset: FixedOffset) -> Self {
        Self { writer, offset }
    }
}

impl<'a, W: Write> WeekPresenter for MarkdownWeek<'a, W> {
    // 日ごとに見出しを出し、区間を1行ずつ表示する。
    fn show_week(&mut self, buckets: &[DayBucket]) -> Result<()> {
        for bucket in buckets {
            writeln!(self.writer, "## {} ({})", bucket.date, hours(bucket.total))
                .with_context(|| format!("Failed to write day header: {}", bucket.date))?;

            for occurrence in &bucket.occurrences {
                let start_str = occurrence
                    .start
                    .with_timezone(&self.offset)
                    .format("%H:%M")
                    .to_string();
                let end_str = if occurrence.is_running {
                    "now".to_string()
                } else {
                    occurrence
                        .end
                        .with_timezone(&self.offset)
                        .format("%H:%M")
                        .to_string()
                };
                let total_str = match occurrence.entry_total {
                    Some(total) if total != occurrence.duration => {
                        format!(", entry {}", hours(total))
                    }
                    _ => String::new(),
                };
                // 記録のidはeditやdeleteの引数に使うため、行末に併記する
                writeln!(
                    self.writer,
                    "- {} ~ {}: {} ({}{}) [{}]",
                    start_str,
                    end_str,
                    occurrence.title,
                    hours(occurrence.duration),
                    total_str,
                    occurrence.entry_id
                )
                .with_context(|| format!("Failed to write occurrence: {}", occurrence.title))?;
            }
        }

        Ok(())
    }
}

/// タグごとの件数を表示する。
pub fn show_tag_counts<W: Write>(writer: &mut W, counts: &[(String, usize)]) -> Result<()> {
    for (tag, count) in counts {
        writeln!(writer, "- {}: {}", tag, count)
            .with_context(|| format!("Failed to write tag count: {}", tag))?;
    }

    Ok(())
}

/// 進行中の記録の状態を表示する。
pub fn show_status<W: Write>(
    writer: &mut W,
    state: &CurrentEntryState,
    offset: FixedOffset,
) -> Result<()> {
    match state {
        CurrentEntryState::Idle => {
            writeln!(writer, "No entry is running.").context("Failed to write status")?;
        }
        CurrentEntryState::Running {
            title,
            started_at,
            duration,
            edit,
            ..
        } => {
            let started_str = started_at
                .with_timezone(&offset)
                .format("%Y-%m-%d %H:%M")
                .to_string();
            writeln!(
                writer,
                "Tracking: {} (started at {}, {})",
                title,
                started_str,
                hours(*duration)
            )
            .context("Failed to write status")?;
            if let EditMode::Edit {
                title,
                start_text,
                save_enabled,
            } = edit
            {
                writeln!(
                    writer,
                    "Editing: {} (start: {}, save {})",
                    title,
                    start_text,
                    if *save_enabled { "enabled" } else { "disabled" }
                )
                .context("Failed to write status")?;
            }
        }
    }

    Ok(())
}

/// カレンダーの月表示を出力する。選択済みの日付は`[ ]`で囲んで示す。
pub fn show_calendar<W: Write>(
    writer: &mut W,
    view: &MonthView,
    week_starts_on: Weekday,
) -> Result<()> {
    writeln!(writer, "# {:04}-{:02}", view.year(), view.month())
        .context("Failed to write calendar header")?;

    for week in view.grid(week_starts_on) {
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(date) if view.is_selected(*date) => {
                    format!("[{:>2}]", chrono::Datelike::day(date))
                }
                Some(date) => format!(" {:>2} ", chrono::Datelike::day(date)),
                None => "    ".to_string(),
            })
            .collect();
        writeln!(writer, "{}", cells.join(""))
            .context("Failed to write calendar week")?;
    }
    if let Some(selected) = view.selected() {
        writeln!(writer, "Selected: {}", selected).context("Failed to write calendar footer")?;
    }

    Ok(())
}

/// 経過時間を時間単位の文字列にする。
fn hours(duration: chrono::Duration) -> String {
    format!("{:.2}h", duration.num_seconds() as f64 / 3600.0)
}
