//! Reporter module for output formatting

pub mod console;
pub mod html;
pub mod json;

pub use console::ConsoleReporter;
pub use html::HtmlReporter;
pub use json::JsonReporter;
