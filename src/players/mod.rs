pub mod base;
pub mod objective;
pub mod random;

pub use base::BasePlayer;
pub use objective::ObjectivePlayer;
pub use random::RandomPlayer;
