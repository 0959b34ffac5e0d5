pub mod ranking;
pub mod score_index;
