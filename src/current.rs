use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::active::{active_state, ActiveState};
use crate::datetime::parse_local_datetime;
use crate::time_entry::TimeEntry;

/// 進行中の記録を表示するパネルの状態。
///
/// 画面の状態をそのまま写した判別付きの列挙型で、継承階層は使わない。
#[derive(Clone, Debug, PartialEq)]
pub enum CurrentEntryState {
    /// 進行中の記録がない状態。
    Idle,
    /// 記録が進行中の状態。
    Running {
        entry_id: Uuid,
        title: String,
        started_at: DateTime<Utc>,
        /// `now`時点までの経過時間。
        duration: Duration,
        edit: EditMode,
    },
}

/// 進行中の記録の編集フォームの状態。
#[derive(Clone, Debug, PartialEq)]
pub enum EditMode {
    /// 表示のみの状態。
    View,
    /// 編集中の状態。入力欄の内容と保存可否を保持する。
    Edit {
        title: String,
        start_text: String,
        save_enabled: bool,
    },
}

impl CurrentEntryState {
    /// 記録のスナップショットから現在の状態を導出する。
    pub fn of(entries: &[TimeEntry], owner: Uuid, now: DateTime<Utc>) -> Self {
        match active_state(entries, owner) {
            ActiveState::Idle => Self::Idle,
            ActiveState::Running(entry_id) => entries
                .iter()
                .find(|entry| entry.id == entry_id)
                .map_or(Self::Idle, |entry| Self::Running {
                    entry_id,
                    title: entry.title.clone(),
                    started_at: entry.start,
                    duration: entry.duration_as_of(now),
                    edit: EditMode::View,
                }),
        }
    }

    /// 編集モードへ切り替える。Idleの場合は何も変わらない。
    pub fn begin_edit(self) -> Self {
        match self {
            Self::Running {
                entry_id,
                title,
                started_at,
                duration,
                edit: EditMode::View,
            } => Self::Running {
                entry_id,
                title: title.clone(),
                started_at,
                duration,
                edit: EditMode::begin(&title, started_at),
            },
            other => other,
        }
    }
}

impl EditMode {
    /// 記録の現在の内容から編集状態を作る。
    pub fn begin(title: &str, started_at: DateTime<Utc>) -> Self {
        let start_text = started_at.to_rfc3339();
        let save_enabled = Self::validate(title, &start_text);

        Self::Edit {
            title: title.to_string(),
            start_text,
            save_enabled,
        }
    }

    /// タイトル入力欄を更新し、保存可否を再計算する。表示のみの状態では何も変わらない。
    pub fn with_title(self, title: &str) -> Self {
        match self {
            Self::Edit { start_text, .. } => Self::Edit {
                title: title.to_string(),
                save_enabled: Self::validate(title, &start_text),
                start_text,
            },
            Self::View => Self::View,
        }
    }

    /// 開始時刻の入力欄を更新し、保存可否を再計算する。表示のみの状態では何も変わらない。
    pub fn with_start_text(self, start_text: &str) -> Self {
        match self {
            Self::Edit { title, .. } => Self::Edit {
                save_enabled: Self::validate(&title, start_text),
                title,
                start_text: start_text.to_string(),
            },
            Self::View => Self::View,
        }
    }

    // タイトルが空でなく、開始時刻が日時として解釈できる場合のみ保存できる
    fn validate(title: &str, start_text: &str) -> bool {
        !title.trim().is_empty() && parse_local_datetime(start_text).is_ok()
    }
}
