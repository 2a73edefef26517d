use thiserror::Error;

/// ドメイン操作が失敗した場合のエラー種別。
///
/// どのエラーも1回の操作の中で即座に返し、失敗した操作はデータを変更しない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// 入力が不正な場合のエラー。タイトルが空、終了時刻が開始時刻以前など。
    #[error("validation failed: {0}")]
    Validation(String),

    /// 現在の状態と矛盾する操作のエラー。進行中の記録の二重開始、利用者名の重複など。
    #[error("conflict: {0}")]
    Conflict(String),

    /// 対象が存在しない場合のエラー。
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
