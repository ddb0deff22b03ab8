pub mod arbiter;
pub mod board;
pub mod eval;
pub mod game;
pub mod notation;
pub mod protocol;
pub mod search;
pub mod tournament;

pub mod prelude {
    pub use crate::arbiter::{Arbiter, ArbiterOptions, GameResult};
    pub use crate::board::{self, NUM_FIELDS};
    pub use crate::eval::evaluate;
    pub use crate::game::{Colour, Field, Move, State, ValidationError};
    pub use crate::notation;
    pub use crate::protocol::PlayerSession;
    pub use crate::search::{search, SearchConfig, SearchStats, StoneSelection};
    pub use crate::tournament::{Tournament, TournamentOptions, TournamentSummary};
}

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;
    }
}
