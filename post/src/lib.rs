//! Window and winning proof-of-spacetime flows over a sealed sector set.

pub mod window;
pub mod winning;

pub use window::{generate_window_post, verify_window_post, WindowPoStOutput};
pub use winning::{generate_winning_post, select_candidates, verify_winning_post};
