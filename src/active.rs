use uuid::Uuid;

use crate::time_entry::TimeEntry;

/// 利用者ごとの進行中の記録の状態。
///
/// 終了時刻が未設定の記録は利用者ごとに高々1件という不変条件を前提とする。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveState {
    /// 進行中の記録がない状態。
    Idle,
    /// 指定した記録が進行中の状態。
    Running(Uuid),
}

/// 記録のスナップショットから、指定した利用者の進行中の記録の状態を導出する。
pub fn active_state(entries: &[TimeEntry], owner: Uuid) -> ActiveState {
    entries
        .iter()
        .find(|entry| entry.user_id == owner && entry.is_running())
        .map_or(ActiveState::Idle, |entry| ActiveState::Running(entry.id))
}
