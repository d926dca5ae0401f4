pub mod cd;
pub mod help;
pub mod ps;
pub mod pwd;
pub mod whoami;
