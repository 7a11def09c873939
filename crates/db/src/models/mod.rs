pub mod port;
pub mod project;
pub mod sfp;
pub mod switch;
