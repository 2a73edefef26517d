use std::io::Write;

use anyhow::{Context, Result};

use crate::console::show_tag_counts;
use crate::repository::StoreRepository;
use crate::tags::tag_counts;

pub struct TagsCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> TagsCommand<'a, T> {
    /// 新しい`TagsCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `tags`サブコマンドの処理を行う。
    ///
    /// 利用者の記録からタグごとの件数を集計し、辞書順で表示する。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `writer` - 表示の出力先
    pub async fn run<W: Write>(&self, username: &str, writer: &mut W) -> Result<Vec<(String, usize)>> {
        let database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;

        let counts = tag_counts(&database.entries_for(user.id));
        show_tag_counts(writer, &counts)?;

        Ok(counts)
    }
}
