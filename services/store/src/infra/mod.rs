pub mod db;
pub mod gemini;
