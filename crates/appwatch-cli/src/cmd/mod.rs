pub mod check;
pub mod completions;
pub mod notify;
pub mod serve;
pub mod watch;
