pub mod recommendation;
pub mod reply;
pub mod scan;
