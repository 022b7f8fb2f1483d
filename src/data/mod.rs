pub mod config;
pub mod table;

pub use config::{OptimizerConfig, load_config, save_config};
pub use table::{TableLayout, load_table, read_table};
