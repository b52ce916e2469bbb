/// Chess domain types.
pub mod chess;
/// The chess engine capability.
pub mod play;
/// Board presentation.
pub mod render;
/// The legality oracle.
pub mod rules;
/// The interactive session controller.
pub mod session;
/// Assorted utilities.
pub mod util;
