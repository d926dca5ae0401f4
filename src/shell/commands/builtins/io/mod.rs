pub mod cat;
pub mod clear;
pub mod echo;
pub mod grep;
pub mod head;
pub mod wc;
