mod astar;
mod state;

pub use astar::permit_a_star_search;
