use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::console::{MarkdownWeek, WeekPresenter};
use crate::datetime;
use crate::datetime::parse_naive_date;
use crate::repository::StoreRepository;
use crate::week::{aggregate, week_start_for, DayBucket};

/// 週の集計を表示するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct WeekArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the week in the format YYYY-MM-DD",
        parse(try_from_str = parse_naive_date),
    )]
    date: Option<NaiveDate>,
}

pub struct WeekCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> WeekCommand<'a, T> {
    /// 新しい`WeekCommand`を返す。
    ///
    /// # Arguments
    ///
    /// * `repository` - 保存データを読み書きするためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `week`サブコマンドの処理を行う。
    ///
    /// 指定された日付を含む1週間の記録を、利用者の表示タイムゾーンで日ごとに集計して表示する。
    /// 週の開始曜日は利用者の設定に従う。日付が指定されていない場合は現在の日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `week` - `week`サブコマンドの引数
    /// * `writer` - 表示の出力先
    pub async fn run<W: Write>(
        &self,
        username: &str,
        week: WeekArgs,
        writer: &mut W,
    ) -> Result<Vec<DayBucket>> {
        let now = datetime::now();

        let database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        let offset = user.viewing_offset(now);
        let date = week
            .date
            .unwrap_or_else(|| now.with_timezone(&offset).date_naive());
        let week_start = week_start_for(date, user.week_starts_on);
        info!("Week starting at: {}", week_start);

        let entries = database.entries_for(user.id);
        let buckets =
            aggregate(&entries, &offset, week_start, now).context("Failed to aggregate entries")?;
        if buckets.is_empty() {
            writeln!(writer, "No entries in the week of {}.", week_start)
                .context("Failed to write week view")?;
        } else {
            MarkdownWeek::new(writer, offset).show_week(&buckets)?;
        }

        Ok(buckets)
    }
}
