//! Error types for the adjudicator.
//!
//! The resolver itself never raises; it only tightens bounds. Errors come
//! from the lookup surface used by the order parser, from game-state edits
//! that the current phase forbids, and from the sequencer when resolution
//! terminates with unresolved orders.

use thiserror::Error;

/// The error type for all fallible operations in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Topology inconsistency: non-contiguous ids, dangling cross
    /// references, or an ambiguous location lookup.
    #[error("map error: {0}")]
    Map(String),

    /// The parser could not identify a referenced unit, province, or
    /// order, or the order targets a phase that expects no orders.
    #[error("order input error: {0}")]
    OrderInput(String),

    /// A manual game-state edit at a phase that forbids it, or an attempt
    /// to place a unit where one already exists.
    #[error("game error: {0}")]
    Game(String),

    /// Resolution terminated with unresolved orders. This indicates a bug
    /// or a malformed variant and is fatal for the current turn.
    #[error("adjudication error: {0}")]
    Adjudication(String),
}

impl Error {
    pub(crate) fn map(msg: impl Into<String>) -> Self {
        Error::Map(msg.into())
    }

    pub(crate) fn order_input(msg: impl Into<String>) -> Self {
        Error::OrderInput(msg.into())
    }

    pub(crate) fn game(msg: impl Into<String>) -> Self {
        Error::Game(msg.into())
    }

    pub(crate) fn adjudication(msg: impl Into<String>) -> Self {
        Error::Adjudication(msg.into())
    }
}
