pub mod codec;
pub mod msg;
pub mod types;
