use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

use crate::calendar::MonthView;
use crate::console::show_calendar;
use crate::datetime;
use crate::datetime::{parse_naive_date, parse_year_month};
use crate::repository::StoreRepository;

/// カレンダーの月表示を行うサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct CalendarArgs {
    #[clap(
        short = 'm',
        long = "month",
        help = "Sets a custom month in the format YYYY-MM",
        parse(try_from_str = parse_year_month),
    )]
    month: Option<(i32, u32)>,

    #[clap(
        short = 's',
        long = "selected",
        help = "Marks a date as selected in the format YYYY-MM-DD",
        parse(try_from_str = parse_naive_date),
    )]
    selected: Option<NaiveDate>,
}

pub struct CalendarCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> CalendarCommand<'a, T> {
    /// 新しい`CalendarCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `calendar`サブコマンドの処理を行う。
    ///
    /// 指定された月のカレンダーを、利用者の週の開始曜日に合わせて表示する。
    /// 月が指定されていない場合は、利用者の表示タイムゾーンでの現在の月を利用する。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `calendar` - `calendar`サブコマンドの引数
    /// * `writer` - 表示の出力先
    pub async fn run<W: Write>(
        &self,
        username: &str,
        calendar: CalendarArgs,
        writer: &mut W,
    ) -> Result<MonthView> {
        let now = datetime::now();

        let database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;

        let today = now.with_timezone(&user.viewing_offset(now)).date_naive();
        let (year, month) = calendar.month.unwrap_or((today.year(), today.month()));
        let mut view = MonthView::new(year, month, None)?;
        if let Some(selected) = calendar.selected {
            view.select(selected);
        }
        show_calendar(writer, &view, user.week_starts_on)?;

        Ok(view)
    }
}
