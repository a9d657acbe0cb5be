pub mod evaluate;
pub mod graph;
pub mod init;
pub mod list;
pub mod plan;
pub mod run;
pub mod schema;
