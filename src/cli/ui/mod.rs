pub mod navigation;
pub mod prompts;
pub mod table_renderer;
