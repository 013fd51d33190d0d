//! System clipboard access for the share action

use copypasta::{ClipboardContext, ClipboardProvider};

/// Clipboard abstraction (swapped for a buffer in tests)
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), String>;
}

/// The real system clipboard
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), String> {
        let mut ctx = ClipboardContext::new().map_err(|err| err.to_string())?;
        ctx.set_contents(text.to_owned()).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
pub mod test_support {
    use super::Clipboard;

    /// In-memory clipboard for tests
    #[derive(Default)]
    pub struct BufferClipboard {
        pub contents: Option<String>,
    }

    impl Clipboard for BufferClipboard {
        fn copy(&mut self, text: &str) -> Result<(), String> {
            self.contents = Some(text.to_owned());
            Ok(())
        }
    }

    /// Clipboard that always fails (denied access)
    pub struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn copy(&mut self, _text: &str) -> Result<(), String> {
            Err("clipboard unavailable".to_string())
        }
    }
}
