pub mod conf;
pub mod read;
mod render;
