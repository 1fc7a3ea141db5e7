//! Document domain model.
//!
//! # Responsibility
//! - Define the block tree, inline spans and theme state shared by the codec,
//!   editor and persistence layers.
//! - Own every structural mutation of the live document.
//!
//! # Invariants
//! - Every block is addressed by a stable `BlockId`, never by position.
//! - A document always holds at least one block.

pub mod block;
pub mod document;
pub mod inline;
pub mod theme;
