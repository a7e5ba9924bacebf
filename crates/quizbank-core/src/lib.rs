//! quizbank-core: question-bank parser, quiz session engine and scoring.
//!
//! This crate is pure and synchronous: it never touches the filesystem or
//! the network. Callers read the question text themselves, hand it to
//! [`parser::parse`], and drive a [`session::QuizSession`] over the result.

pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
