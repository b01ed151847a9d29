pub mod datetime;
pub mod rich_text;
pub mod url;
