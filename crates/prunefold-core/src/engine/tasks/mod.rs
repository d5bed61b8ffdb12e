//! The three steps of one search level, plus the final harvest.
//!
//! A level expands every frontier node into its two mirror children ([`expansion`]),
//! then judges all of those children against the restraints ([`pruning`]). Judging only
//! starts once the whole level has been expanded. When the target depth is reached the
//! surviving leaves are turned into solutions ([`collection`]).

pub mod collection;
pub mod expansion;
pub mod pruning;
