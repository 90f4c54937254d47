//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod error;
pub mod join_channel;
pub mod leave_channel;
pub mod publish_message;

pub use error::{JoinError, LeaveError, PublishError};
pub use join_channel::JoinChannelUseCase;
pub use leave_channel::LeaveChannelUseCase;
pub use publish_message::PublishMessageUseCase;
