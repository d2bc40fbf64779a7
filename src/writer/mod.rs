//! Output emitters. Each one takes the processed project and an output
//! directory and writes a single file.
pub mod json;
pub mod report;
