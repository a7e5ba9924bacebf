pub mod blocks;
pub mod init;
pub mod run;
pub mod validate;
