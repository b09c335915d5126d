mod docx;
mod text;

pub use docx::DocxExporter;
pub use text::render_text;
