pub mod cli;
pub mod conf;
pub mod logging;
pub mod protocol;
pub mod read;
pub mod schema;
