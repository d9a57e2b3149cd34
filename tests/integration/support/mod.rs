pub mod docx_reader;
pub mod providers;
