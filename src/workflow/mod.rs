pub mod defaults;
pub mod generate;
