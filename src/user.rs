use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 利用者のアカウントを表す構造体。
///
/// 認証情報はハッシュ化済みの不透明な文字列として保持する。
/// ハッシュ化そのものは外部の認証層の責務とする。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// 有効化されるまでは`None`。
    pub password: Option<String>,
    /// 画面に表示する挨拶文。
    pub greeting: String,
    pub is_admin: bool,
    /// 表示用タイムゾーンのUTCオフセット(分、東向きが正)。
    /// 未設定の場合はホストのLocalタイムゾーンを利用する。
    pub utc_offset_minutes: Option<i32>,
    /// 週表示の開始曜日。
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,
    /// 有効化が完了するまで保持される招待トークン。
    pub activation_token: Option<Uuid>,
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

impl User {
    /// 招待が有効化済みかどうかを返す。
    pub fn is_activated(&self) -> bool {
        self.activation_token.is_none()
    }

    /// 表示に利用するタイムゾーンを固定オフセットとして返す。
    ///
    /// 利用者の設定がない場合は、`now`時点のLocalタイムゾーンのオフセットを利用する。
    pub fn viewing_offset(&self, now: DateTime<Utc>) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| Local.offset_from_utc_datetime(&now.naive_utc()).fix())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc, Weekday};
    use uuid::Uuid;

    use super::User;

    fn dummy_user(utc_offset_minutes: Option<i32>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password: Some("secret".to_string()),
            greeting: "Hi, Alice!".to_string(),
            is_admin: false,
            utc_offset_minutes,
            week_starts_on: Weekday::Mon,
            activation_token: None,
        }
    }

    /// 設定したオフセットがそのまま利用されることを確認する。
    #[test]
    fn test_viewing_offset_from_preference() {
        let user = dummy_user(Some(13 * 60));
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();

        assert_eq!(
            user.viewing_offset(now),
            FixedOffset::east_opt(13 * 3600).unwrap()
        );
    }

    /// 招待トークンの有無で有効化状態が判定されることを確認する。
    #[test]
    fn test_is_activated() {
        let mut user = dummy_user(None);
        assert!(user.is_activated());

        user.activation_token = Some(Uuid::new_v4());
        assert!(!user.is_activated());
    }
}
