pub mod arxiv;
pub mod forum;
pub mod youtube;
