pub mod chunk;
pub mod job;
pub mod pipeline;
pub mod range;
pub mod reader;
pub mod writer;

pub use chunk::*;
pub use job::*;
pub use pipeline::*;
pub use range::*;
pub use reader::*;
pub use writer::*;
