pub mod vote;

pub use vote::{VoteCounts, VoteDecision, VoteType};
