use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::datetime;
use crate::datetime::parse_local_datetime;
use crate::repository::StoreRepository;
use crate::time_entry::TimeEntry;

/// 新しい記録を開始するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct StartArgs {
    #[clap(help = "Title of the new entry")]
    title: String,

    #[clap(
        short = 't',
        long = "tag",
        help = "Attaches a tag to the entry (can be repeated)"
    )]
    tags: Vec<String>,

    #[clap(
        long = "at",
        help = "Sets a custom start time in the format YYYY-MM-DDTHH:MM",
        parse(try_from_str = parse_local_datetime),
    )]
    at: Option<DateTime<Utc>>,
}

pub struct StartCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> StartCommand<'a, T> {
    /// 新しい`StartCommand`を返す。
    ///
    /// # Arguments
    ///
    /// * `repository` - 保存データを読み書きするためのリポジトリ
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `start`サブコマンドの処理を行う。
    ///
    /// 指定された利用者の記録を開始する。開始時刻が指定されていない場合は現在時刻を利用する。
    /// 進行中の記録が既にある場合は失敗し、データは変更されない。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `start` - `start`サブコマンドの引数
    pub async fn run(&self, username: &str, start: StartArgs) -> Result<TimeEntry> {
        let start_at = start.at.unwrap_or_else(datetime::now);

        let mut database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        let entry = database.create_entry(user.id, &start.title, start_at, &start.tags)?;
        self.repository
            .save(&database)
            .await
            .context("Failed to save store")?;
        info!("Started entry: {}", entry.id);

        Ok(entry)
    }
}
