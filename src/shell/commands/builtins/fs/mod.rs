pub mod cp;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod projects;
pub mod rm;
pub mod stat;
pub mod touch;
