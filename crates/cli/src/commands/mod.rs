pub mod nodes;
pub mod statements;
