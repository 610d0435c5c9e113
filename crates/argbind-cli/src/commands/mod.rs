pub mod bind;
pub mod describe;
pub mod lex;
