use chrono::Weekday;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::Database;
use crate::user::User;

impl Database {
    /// 利用者名から利用者を取得する。
    pub fn find_user(&self, username: &str) -> Result<User> {
        self.users
            .iter()
            .find(|user| user.username == username)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no such user: {}", username)))
    }

    /// 新しい利用者を招待する。
    ///
    /// 招待した利用者は認証情報を持たず、発行された招待トークンで有効化されるまで
    /// ログインできない。利用者名が重複する場合は`Error::Conflict`を返す。
    pub fn invite_user(&mut self, username: &str, greeting: &str, is_admin: bool) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if self.users.iter().any(|user| user.username == username) {
            return Err(Error::Conflict(format!(
                "username is already taken: {}",
                username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: None,
            greeting: greeting.to_string(),
            is_admin,
            utc_offset_minutes: None,
            week_starts_on: Weekday::Mon,
            activation_token: Some(Uuid::new_v4()),
        };
        self.users.push(user.clone());

        Ok(user)
    }

    /// 招待トークンを使って利用者を有効化し、認証情報を設定する。
    ///
    /// トークンに対応する利用者がいない場合は`Error::NotFound`を返す。
    pub fn activate_user(&mut self, token: Uuid, password: &str) -> Result<User> {
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }
        let user = self
            .users
            .iter_mut()
            .find(|user| user.activation_token == Some(token))
            .ok_or_else(|| Error::NotFound("no user with this activation token".to_string()))?;

        user.password = Some(password.to_string());
        user.activation_token = None;

        Ok(user.clone())
    }

    /// 利用者名を変更する。
    ///
    /// 変更後の利用者名が他の利用者と重複する場合は`Error::Conflict`を返す。
    pub fn rename_user(&mut self, user_id: Uuid, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if self
            .users
            .iter()
            .any(|user| user.username == username && user.id != user_id)
        {
            return Err(Error::Conflict(format!(
                "username is already taken: {}",
                username
            )));
        }
        let user = self
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| Error::NotFound(format!("no such user id: {}", user_id)))?;

        user.username = username.to_string();

        Ok(user.clone())
    }

    /// 利用者を削除する。所有する記録も同時に削除する。
    pub fn remove_user(&mut self, user_id: Uuid) -> Result<()> {
        if !self.users.iter().any(|user| user.id == user_id) {
            return Err(Error::NotFound(format!("no such user id: {}", user_id)));
        }

        self.users.retain(|user| user.id != user_id);
        self.entries.retain(|entry| entry.user_id != user_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::error::Error;
    use crate::store::Database;

    /// 招待した利用者が有効化されるまでの流れを確認する。
    #[test]
    fn test_invite_then_activate() {
        let mut database = Database::default();

        let invited = database.invite_user("alice", "Hi, Alice!", false).unwrap();
        assert!(!invited.is_activated());
        assert!(invited.password.is_none());

        let token = invited.activation_token.unwrap();
        let activated = database.activate_user(token, "secret").unwrap();

        assert!(activated.is_activated());
        assert_eq!(activated.password.as_deref(), Some("secret"));
        assert_eq!(database.find_user("alice").unwrap().id, invited.id);
    }

    /// 利用者名の重複した招待は拒否されることを確認する。
    #[test]
    fn test_invite_duplicate_username() {
        let mut database = Database::default();
        database.invite_user("alice", "", false).unwrap();

        let result = database.invite_user("alice", "", true);

        assert_eq!(
            result.unwrap_err(),
            Error::Conflict("username is already taken: alice".to_string())
        );
        assert_eq!(database.users.len(), 1);
    }

    /// 不明な招待トークンでの有効化はNotFoundになることを確認する。
    #[test]
    fn test_activate_with_unknown_token() {
        let mut database = Database::default();
        database.invite_user("alice", "", false).unwrap();

        let result = database.activate_user(Uuid::new_v4(), "secret");

        assert!(matches!(result.unwrap_err(), Error::NotFound(_)));
    }

    /// 利用者名の変更で重複が検査されることを確認する。
    #[test]
    fn test_rename_checks_uniqueness() {
        let mut database = Database::default();
        let alice = database.invite_user("alice", "", false).unwrap();
        database.invite_user("bob", "", false).unwrap();

        let result = database.rename_user(alice.id, "bob");
        assert_eq!(
            result.unwrap_err(),
            Error::Conflict("username is already taken: bob".to_string())
        );

        // 自分自身の現在の名前への変更は重複とみなさない
        assert!(database.rename_user(alice.id, "alice").is_ok());
        assert!(database.rename_user(alice.id, "carol").is_ok());
        assert!(database.find_user("carol").is_ok());
    }

    /// 利用者の削除で所有する記録も削除されることを確認する。
    #[test]
    fn test_remove_user_cascades_to_entries() {
        let mut database = Database::default();
        let alice = database.invite_user("alice", "", false).unwrap();
        let bob = database.invite_user("bob", "", false).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        database.create_entry(alice.id, "alice entry", start, &[]).unwrap();
        database.create_entry(bob.id, "bob entry", start, &[]).unwrap();

        database.remove_user(alice.id).unwrap();

        assert!(database.find_user("alice").is_err());
        assert_eq!(database.entries.len(), 1);
        assert_eq!(database.entries[0].user_id, bob.id);
    }

    /// 存在しない利用者の削除はNotFoundになることを確認する。
    #[test]
    fn test_remove_unknown_user() {
        let mut database = Database::default();

        let result = database.remove_user(Uuid::new_v4());

        assert!(matches!(result.unwrap_err(), Error::NotFound(_)));
    }
}
