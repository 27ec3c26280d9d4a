pub mod parser;
pub mod render;
pub mod roller;
pub mod types;


pub use parser::parse;
pub use render::render;
pub use roller::{roll, Roller, SeededRoller, SharedRoller, ThreadRngRoller};
pub use types::{
    DiceError, Die, DieResult, Kind, Pool, Results, LUCKY_DIE, MAX_DICE, SKILLED_DIE, UNLUCKY_DIE, UNSKILLED_DIE,
};
