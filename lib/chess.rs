mod color;
mod fen;
mod file;
mod r#move;
mod outcome;
mod piece;
mod position;
mod promotion;
mod rank;
mod role;
mod square;

pub use color::*;
pub use fen::*;
pub use file::*;
pub use outcome::*;
pub use piece::*;
pub use position::*;
pub use promotion::*;
pub use r#move::*;
pub use rank::*;
pub use role::*;
pub use square::*;

/// A reader for game records.
pub mod pgn;
