pub mod model;
pub mod service;

pub use model::{GameState, Player, PlayerId};
pub use service::GameService;
