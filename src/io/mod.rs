pub mod config_io;
pub mod records_io;
pub mod state;
