pub mod args;
pub mod domain;
pub mod error;
pub mod history;
pub mod iter;
pub mod logfile;
pub mod monitor;
pub mod node;
pub mod report;
pub mod tldlist;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod proptests;

pub use args::{Args, OutputFormat};
pub use error::TldError;
pub use iter::Iter;
pub use node::{Node, NodeId};
pub use report::{Report, TldShare};
pub use tldlist::{Added, TldList};
pub use tree::{CountingTree, Insertion};
