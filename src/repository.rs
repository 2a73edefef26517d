use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::fs;

use crate::store::Database;

/// 保存された全データを読み書きするためのリポジトリ。
///
/// 読み込み、変更、保存の1往復が「進行中の記録は高々1件」という不変条件の
/// 直列化境界になる。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StoreRepository {
    /// 保存された全データを読み込む。
    async fn load(&self) -> Result<Database>;

    /// 全データを保存する。
    ///
    /// # Arguments
    ///
    /// * `database` - 保存する全データ
    async fn save(&self, database: &Database) -> Result<()>;
}

/// JSONファイルへ全データを保存するリポジトリ。
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// 新しい`JsonFileRepository`を返す。
    ///
    /// `path`が指定されていない場合は、既定のデータディレクトリ配下のファイルを利用する。
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => dirs::data_dir()
                .context("Failed to resolve data directory")?
                .join("kintai")
                .join("store.json"),
        };

        Ok(Self { path })
    }
}

#[async_trait]
impl StoreRepository for JsonFileRepository {
    // ファイルがまだ存在しない場合は空のデータとして読み込む。
    async fn load(&self) -> Result<Database> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Store file not found: {}", self.path.display());
                return Ok(Database::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read store file: {}", self.path.display())
                })
            }
        };
        let database = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))?;

        Ok(database)
    }

    async fn save(&self, database: &Database) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(database).context("Failed to serialize store")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;
        debug!(
            "Saved {} entries for {} users",
            database.entries.len(),
            database.users.len()
        );

        Ok(())
    }
}
