use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;

use crate::active::{active_state, ActiveState};
use crate::datetime;
use crate::datetime::parse_local_datetime;
use crate::error::Error;
use crate::repository::StoreRepository;
use crate::time_entry::TimeEntry;

/// 進行中の記録を終了するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct StopArgs {
    #[clap(
        long = "at",
        help = "Sets a custom end time in the format YYYY-MM-DDTHH:MM",
        parse(try_from_str = parse_local_datetime),
    )]
    at: Option<DateTime<Utc>>,
}

pub struct StopCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> StopCommand<'a, T> {
    /// 新しい`StopCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `stop`サブコマンドの処理を行う。
    ///
    /// 指定された利用者の進行中の記録を終了する。
    /// 終了時刻が指定されていない場合は現在時刻を利用する。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `stop` - `stop`サブコマンドの引数
    pub async fn run(&self, username: &str, stop: StopArgs) -> Result<TimeEntry> {
        let end_at = stop.at.unwrap_or_else(datetime::now);

        let mut database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        let entry_id = match active_state(&database.entries, user.id) {
            ActiveState::Running(entry_id) => entry_id,
            ActiveState::Idle => {
                return Err(Error::NotFound("no entry is running".to_string()).into())
            }
        };
        let entry = database.stop_entry(user.id, entry_id, end_at)?;
        self.repository
            .save(&database)
            .await
            .context("Failed to save store")?;
        info!("Stopped entry: {}", entry.id);

        Ok(entry)
    }
}
