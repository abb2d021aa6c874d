//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 同じ client_id のクライアントが既に接続中
    #[error("Client '{0}' is already connected")]
    DuplicateClientId(String),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 送信者が参加していないルームが指定された
    #[error("Client is not a member of room '{0}'")]
    NotInRoom(String),

    /// 送信先のルームが一つも無い
    #[error("No target rooms")]
    NoTargetRooms,

    /// ペイロードが不正
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),

    /// メッセージのシリアライズに失敗
    #[error("Failed to encode message: {0}")]
    Encode(String),
}
