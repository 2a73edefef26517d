use std::io::Write;

use anyhow::{Context, Result};

use crate::console::show_status;
use crate::current::CurrentEntryState;
use crate::datetime;
use crate::repository::StoreRepository;

/// 進行中の記録の状態を表示するサブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct StatusArgs {
    #[clap(long = "edit", help = "Shows the running entry as an editable form")]
    edit: bool,

    #[clap(
        long = "title",
        help = "Fills the title field of the edit form",
        requires = "edit"
    )]
    title: Option<String>,

    #[clap(
        long = "start",
        help = "Fills the start time field of the edit form",
        requires = "edit"
    )]
    start: Option<String>,
}

pub struct StatusCommand<'a, T: StoreRepository> {
    repository: &'a T,
}

impl<'a, T: StoreRepository> StatusCommand<'a, T> {
    /// 新しい`StatusCommand`を返す。
    pub fn new(repository: &'a T) -> Self {
        Self { repository }
    }

    /// `status`サブコマンドの処理を行う。
    ///
    /// 進行中の記録の状態を導出して表示する。`--edit`が指定された場合は、
    /// 進行中の記録を編集フォームの状態として表示する。`--title`と`--start`で
    /// フォームの入力を差し替え、保存できる内容かどうかを確認できる。
    ///
    /// # Arguments
    ///
    /// * `username` - 操作する利用者の利用者名
    /// * `status` - `status`サブコマンドの引数
    /// * `writer` - 表示の出力先
    pub async fn run<W: Write>(
        &self,
        username: &str,
        status: StatusArgs,
        writer: &mut W,
    ) -> Result<CurrentEntryState> {
        let now = datetime::now();

        let database = self
            .repository
            .load()
            .await
            .context("Failed to load store")?;
        let user = database.find_user(username)?;
        if !user.greeting.is_empty() {
            writeln!(writer, "{}", user.greeting).context("Failed to write greeting")?;
        }

        let mut state = CurrentEntryState::of(&database.entries, user.id, now);
        if status.edit {
            state = state.begin_edit();
            if let CurrentEntryState::Running {
                entry_id,
                title,
                started_at,
                duration,
                edit,
            } = state
            {
                let mut edit = edit;
                if let Some(new_title) = &status.title {
                    edit = edit.with_title(new_title);
                }
                if let Some(new_start) = &status.start {
                    edit = edit.with_start_text(new_start);
                }
                state = CurrentEntryState::Running {
                    entry_id,
                    title,
                    started_at,
                    duration,
                    edit,
                };
            }
        }
        show_status(writer, &state, user.viewing_offset(now))?;

        Ok(state)
    }
}
