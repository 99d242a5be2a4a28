use std::io::{self, Write};

/// Independently updated areas of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Feeds,
    Posts,
    Modal,
    Feedback,
}

impl Region {
    pub fn selector(self) -> &'static str {
        match self {
            Region::Feeds => ".feeds",
            Region::Posts => ".posts",
            Region::Modal => "#modal .modal-content",
            Region::Feedback => ".feedback",
        }
    }
}

/// Write-only access to the page.
pub trait Dom {
    /// Replace everything inside `region` with `markup`.
    fn replace_children(&self, region: Region, markup: &str);

    /// Toggle the invalid state of the URL input.
    fn set_input_invalid(&self, invalid: bool);
}

/// Prints region updates to stdout, for running outside a browser.
#[derive(Debug, Default)]
pub struct TerminalDom;

impl Dom for TerminalDom {
    fn replace_children(&self, region: Region, markup: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "--- {} ---", region.selector());
        let _ = writeln!(out, "{}", markup);
    }

    fn set_input_invalid(&self, invalid: bool) {
        if invalid {
            let _ = writeln!(io::stdout().lock(), "--- #url-input is-invalid ---");
        }
    }
}
