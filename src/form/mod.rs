pub mod adapter;

pub use adapter::{EchoSink, FormAdapter, FormState, RecordSink};
