use anyhow::{Context, Result};
use log::info;
use uuid::Uuid;

use crate::repository::StoreRepository;

/// 記録を削除するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    #[clap(help = "Identifier of the entry to delete")]
    id: Uuid,
}

pub struct DeleteCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> DeleteCommand<'a, T> {
    /// 新しい`DeleteCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `delete`サブコマンドの処理を行う。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `delete` - `delete`サブコマンドの引数
    pub async fn run(&self, username: &str, delete: DeleteArgs) -> Result<()> {
        let mut database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        database.delete_entry(user.id, delete.id)?;
        self.repository
            .save(&database)
            .await
            .context("Failed to save store")?;
        info!("Deleted entry: {}", delete.id);

        Ok(())
    }
}
