use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use uuid::Uuid;

use crate::time_entry::TimeEntry;

/// 1日分の集計結果。
///
/// `date`は表示用タイムゾーンでの暦日を表す。
#[derive(Clone, Debug, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// 開始時刻の降順(新しいものが先)で並んだ区間。
    pub occurrences: Vec<EntryOccurrence>,
    /// 区間の長さの合計。
    pub total: Duration,
}

/// 記録が1日に対して寄与する区間。
///
/// 日付をまたぐ記録は、重なる日ごとに1つずつ生成される。
/// `start`と`end`は当日の範囲に切り詰めた時刻を保持する。
#[derive(Clone, Debug, PartialEq)]
pub struct EntryOccurrence {
    pub entry_id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: Duration,
    /// 記録全体の長さ。記録の開始日の区間にのみ設定される。
    pub entry_total: Option<Duration>,
    /// 進行中の記録で、終了時刻の代わりに`now`を表示する区間かどうか。
    pub is_running: bool,
}

/// 指定した週(7日間)の記録を日ごとに集計する。
///
/// 日付の境界は`tz`のタイムゾーンで計算する。日付をまたぐ記録は日ごとに分割し、
/// 進行中の記録は表示用に`now`を終了時刻として扱う(保存された記録は変更しない)。
/// 区間を1つも含まない日は結果に含めず、日は昇順で返す。
///
/// # Arguments
///
/// * `entries` - 集計対象の記録
/// * `tz` - 表示に利用するタイムゾーン
/// * `week_start` - 週の開始日(`tz`での日付)
/// * `now` - 現在時刻。進行中の記録の終了時刻として利用する
pub fn aggregate<Tz: TimeZone>(
    entries: &[TimeEntry],
    tz: &Tz,
    week_start: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Vec<DayBucket>> {
    let mut buckets = Vec::new();
    for offset in 0..7 {
        let date = week_start + Duration::days(offset);
        let day_begin = local_midnight(tz, date)?;
        let day_end = local_midnight(tz, date + Duration::days(1))?;

        let mut occurrences: Vec<EntryOccurrence> = entries
            .iter()
            .filter_map(|entry| occurrence_within(entry, tz, date, day_begin, day_end, now))
            .collect();
        if occurrences.is_empty() {
            continue;
        }

        occurrences.sort_by(|a, b| b.start.cmp(&a.start));
        let total = occurrences
            .iter()
            .fold(Duration::zero(), |acc, occurrence| acc + occurrence.duration);
        buckets.push(DayBucket {
            date,
            occurrences,
            total,
        });
    }

    Ok(buckets)
}

/// 指定した日付を含む週の開始日を返す。
///
/// # Arguments
///
/// * `date` - 週に含まれる日付
/// * `week_starts_on` - 週の開始曜日(利用者ごとの設定)
pub fn week_start_for(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let days_back = (7 + date.weekday().num_days_from_monday()
        - week_starts_on.num_days_from_monday())
        % 7;
    date - Duration::days(i64::from(days_back))
}

/// 記録が指定した1日の範囲と重なる場合、その区間を返す。
fn occurrence_within<Tz: TimeZone>(
    entry: &TimeEntry,
    tz: &Tz,
    date: NaiveDate,
    day_begin: DateTime<Utc>,
    day_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<EntryOccurrence> {
    let entry_end = entry.stop.unwrap_or(now);
    if entry_end <= entry.start {
        // 開始したばかり、または開始時刻が未来の進行中の記録
        return None;
    }

    let start = entry.start.max(day_begin);
    let end = entry_end.min(day_end);
    if end <= start {
        return None;
    }

    let starts_on_this_day = entry.start.with_timezone(tz).date_naive() == date;
    Some(EntryOccurrence {
        entry_id: entry.id,
        title: entry.title.clone(),
        start,
        end,
        duration: end - start,
        entry_total: starts_on_this_day.then(|| entry_end - entry.start),
        is_running: entry.is_running() && entry_end <= day_end,
    })
}

/// 指定した日付の0時をUTCの時刻へ変換する。
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .context("Failed to build midnight")?;
    let midnight = tz
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Failed to resolve local midnight for {}", date))?;

    Ok(midnight.to_utc())
}
