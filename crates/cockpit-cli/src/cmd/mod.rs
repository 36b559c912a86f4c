pub mod burnout;
pub mod config;
pub mod deadlines;
pub mod init;
pub mod project;
pub mod run;
