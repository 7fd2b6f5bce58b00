//! A fixed-capacity circular byte buffer with a wrapping cursor.

pub mod circular_buffer;
pub mod config;
pub mod error;

pub use circular_buffer::CircularBuffer;
pub use error::Error;
