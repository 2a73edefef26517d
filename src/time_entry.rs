use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 1件の作業記録を表す構造体。
///
/// `stop`が`None`の記録は進行中を表す。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub title: String,
    #[serde(rename = "startTime")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// 記録が進行中かどうかを返す。
    pub fn is_running(&self) -> bool {
        self.stop.is_none()
    }

    /// 記録の長さを返す。
    ///
    /// 進行中の記録は`now`を終了時刻として扱う。
    pub fn duration_as_of(&self, now: DateTime<Utc>) -> Duration {
        self.stop.unwrap_or(now) - self.start
    }
}

/// タグの集合を正規化する。
///
/// 前後の空白を取り除き、空になったタグと重複したタグを除外する。
/// タグは大文字小文字を区別し、最初に現れた順序を保つ。
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::normalize_tags;
    use super::TimeEntry;

    #[rstest]
    #[case::empty(&[], &[])]
    #[case::keeps_order(&["kotlin", "backend"], &["kotlin", "backend"])]
    #[case::drops_duplicates(&["kotlin", "kotlin"], &["kotlin"])]
    #[case::drops_blank(&["", "  ", "backend"], &["backend"])]
    #[case::trims(&[" backend "], &["backend"])]
    #[case::case_sensitive(&["Kotlin", "kotlin"], &["Kotlin", "kotlin"])]
    fn test_normalize_tags(#[case] input: &[&str], #[case] expected: &[&str]) {
        let input: Vec<String> = input.iter().map(|tag| tag.to_string()).collect();

        assert_eq!(normalize_tags(&input), expected);
    }

    /// 終了済みの記録は`now`に依存しない長さを返すことを確認する。
    #[test]
    fn test_duration_of_stopped_entry() {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "entry".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
            stop: Some(Utc.with_ymd_and_hms(2024, 3, 15, 11, 30, 0).unwrap()),
            tags: vec![],
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();

        assert_eq!(entry.duration_as_of(now).num_minutes(), 90);
        assert!(!entry.is_running());
    }

    /// 進行中の記録は`now`を終了時刻として長さを計算することを確認する。
    #[test]
    fn test_duration_of_running_entry() {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "entry".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
            stop: None,
            tags: vec![],
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 45, 0).unwrap();

        assert_eq!(entry.duration_as_of(now).num_minutes(), 45);
        assert!(entry.is_running());
    }

    /// 進行中の記録の終了時刻はシリアライズ結果に含まれないことを確認する。
    #[test]
    fn test_serialize_running_entry_without_end_time() {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "entry".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap(),
            stop: None,
            tags: vec!["kotlin".to_string()],
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_none());
    }
}
