pub mod baseline;
pub mod buffer;

pub use baseline::Baseline;
pub use buffer::EditableBuffer;
