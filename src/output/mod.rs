//! Result Presentation
//!
//! Default is the clipboard (the point of the tool is paste-ready
//! LaTeX); `-p` prints to stdout instead.

use anyhow::Result;

/// Deliver the recognized markup
pub fn present(text: &str, to_stdout: bool) -> Result<()> {
    if to_stdout {
        println!("{}", text);
        Ok(())
    } else {
        crate::clipboard::set_text(text)
    }
}
