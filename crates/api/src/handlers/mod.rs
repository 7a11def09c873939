pub mod backup;
pub mod calculator;
pub mod config_gen;
pub mod port;
pub mod project;
pub mod sfp;
pub mod switch;
pub mod topology;
