// Studyrank: ranks syllabus topics by how heavily quiz questions probe them.
//
// This is the library root. Each module corresponds to one stage of the
// ranking pipeline.

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod preprocess;
pub mod ranking;
