//! Error types for the cosmos-console crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Graph error: {0}")]
    Graph(#[from] cosmos_graph::GraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
