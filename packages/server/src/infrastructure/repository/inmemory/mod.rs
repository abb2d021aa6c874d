//! InMemory 実装
//!
//! 単一プロセス・インメモリでの実装。再起動をまたいだ永続化は行いません。

pub mod connection;
pub mod room;

pub use connection::{ClientConnection, InMemoryConnectionRegistry};
pub use room::InMemoryRoomAdapter;
