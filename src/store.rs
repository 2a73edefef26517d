use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::active::{active_state, ActiveState};
use crate::error::{Error, Result};
use crate::time_entry::{normalize_tags, TimeEntry};
use crate::user::User;

/// 保存対象となる全データ。
///
/// リポジトリが読み書きするJSONドキュメントのルート。
/// 操作は検証をすべて終えてから書き込みを行い、失敗した操作はデータを変更しない。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub users: Vec<User>,
    pub entries: Vec<TimeEntry>,
}

impl Database {
    /// 新しい記録を開始する。
    ///
    /// タイトルが空の場合は`Error::Validation`、
    /// 既に進行中の記録がある場合は`Error::Conflict`を返す。
    pub fn create_entry(
        &mut self,
        owner: Uuid,
        title: &str,
        start: DateTime<Utc>,
        tags: &[String],
    ) -> Result<TimeEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        if let ActiveState::Running(entry_id) = active_state(&self.entries, owner) {
            return Err(Error::Conflict(format!(
                "another entry is already running: {}",
                entry_id
            )));
        }

        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            start,
            stop: None,
            tags: normalize_tags(tags),
        };
        self.entries.push(entry.clone());

        Ok(entry)
    }

    /// 進行中の記録を終了する。
    ///
    /// 記録が存在しない場合は`Error::NotFound`、既に終了済みの場合は`Error::Conflict`、
    /// 終了時刻が開始時刻以前の場合は`Error::Validation`を返す。
    pub fn stop_entry(&mut self, owner: Uuid, entry_id: Uuid, end: DateTime<Utc>) -> Result<TimeEntry> {
        let entry = self.find_entry_mut(owner, entry_id)?;
        if !entry.is_running() {
            return Err(Error::Conflict(format!(
                "entry is already stopped: {}",
                entry_id
            )));
        }
        if end <= entry.start {
            return Err(Error::Validation(
                "end time must be after start time".to_string(),
            ));
        }

        entry.stop = Some(end);

        Ok(entry.clone())
    }

    /// 記録の内容を変更する。
    ///
    /// 指定されたフィールドだけを適用し、適用後の記録に対して再度検証を行う。
    /// 進行中の記録に終了時刻を設定する操作は、記録の終了と等価になる。
    pub fn edit_entry(
        &mut self,
        owner: Uuid,
        entry_id: Uuid,
        title: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<TimeEntry> {
        let entry = self.find_entry_mut(owner, entry_id)?;

        let new_title = match title {
            Some(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(Error::Validation("title must not be empty".to_string()));
                }
                title.to_string()
            }
            None => entry.title.clone(),
        };
        let new_start = start.unwrap_or(entry.start);
        let new_stop = end.or(entry.stop);
        if let Some(stop) = new_stop {
            if stop <= new_start {
                return Err(Error::Validation(
                    "end time must be after start time".to_string(),
                ));
            }
        }

        entry.title = new_title;
        entry.start = new_start;
        entry.stop = new_stop;

        Ok(entry.clone())
    }

    /// 記録を削除する。
    ///
    /// 記録が存在しない場合は`Error::NotFound`を返す。
    pub fn delete_entry(&mut self, owner: Uuid, entry_id: Uuid) -> Result<()> {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.user_id == owner && entry.id == entry_id));
        if self.entries.len() == before {
            return Err(Error::NotFound(format!("no such entry: {}", entry_id)));
        }

        Ok(())
    }

    /// 指定した利用者の記録をすべて返す。順序は保証しない。
    pub fn entries_for(&self, owner: Uuid) -> Vec<TimeEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.user_id == owner)
            .cloned()
            .collect()
    }

    // 所有者が一致しない記録はNotFoundとして扱う
    fn find_entry_mut(&mut self, owner: Uuid, entry_id: Uuid) -> Result<&mut TimeEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.user_id == owner && entry.id == entry_id)
            .ok_or_else(|| Error::NotFound(format!("no such entry: {}", entry_id)))
    }
}
