use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::datetime::parse_local_datetime;
use crate::repository::StoreRepository;
use crate::time_entry::TimeEntry;

/// 記録の内容を変更するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct EditArgs {
    #[clap(help = "Identifier of the entry to edit")]
    id: Uuid,

    #[clap(long = "title", help = "Sets a new title")]
    title: Option<String>,

    #[clap(
        long = "start",
        help = "Sets a new start time in the format YYYY-MM-DDTHH:MM",
        parse(try_from_str = parse_local_datetime),
    )]
    start: Option<DateTime<Utc>>,

    #[clap(
        long = "end",
        help = "Sets a new end time in the format YYYY-MM-DDTHH:MM",
        parse(try_from_str = parse_local_datetime),
    )]
    end: Option<DateTime<Utc>>,
}

pub struct EditCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> EditCommand<'a, T> {
    /// 新しい`EditCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `edit`サブコマンドの処理を行う。
    ///
    /// 指定されたフィールドだけを変更し、変更後の記録を検証してから保存する。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `edit` - `edit`サブコマンドの引数
    pub async fn run(&self, username: &str, edit: EditArgs) -> Result<TimeEntry> {
        let mut database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        let entry = database.edit_entry(
            user.id,
            edit.id,
            edit.title.as_deref(),
            edit.start,
            edit.end,
        )?;
        self.repository
            .save(&database)
            .await
            .context("Failed to save store")?;
        info!("Edited entry: {}", entry.id);

        Ok(entry)
    }
}
