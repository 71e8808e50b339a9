pub mod auto_sender;

pub use auto_sender::AutoSendWorker;
