//! Write-only text clipboard.

use crate::error::ClipboardError;

/// Host clipboard access.
///
/// `write_text` is the secure clipboard API; `legacy_copy` is the fallback
/// for contexts without one (an offscreen text field plus the legacy copy
/// command on the web).
pub trait ClipboardBackend {
    /// Check whether the secure clipboard API is usable.
    fn is_secure(&self) -> bool;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    fn legacy_copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copy `text`, choosing the secure API when available.
///
/// Exactly one write is attempted. Failures are logged and reported as
/// `false`; they never interrupt the caller.
pub fn copy_to_clipboard(backend: &mut dyn ClipboardBackend, text: &str) -> bool {
    let result = if backend.is_secure() {
        backend.write_text(text)
    } else {
        backend.legacy_copy(text)
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to copy: {e}");
            false
        }
    }
}

/// In-memory clipboard for headless hosts.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    /// Report the secure API as available
    pub secure: bool,
    /// Last text written
    pub contents: Option<String>,
    /// Every write, in order
    pub writes: Vec<String>,
    /// Reject writes with this reason
    pub reject_with: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            secure: true,
            ..Self::default()
        }
    }

    fn store(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_string());
        if let Some(reason) = &self.reject_with {
            return Err(ClipboardError::Rejected(reason.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn is_secure(&self) -> bool {
        self.secure
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.store(text)
    }

    fn legacy_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.store(text)
    }
}

/// Browser clipboard.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlDocument, HtmlTextAreaElement};

    fn js_err(e: wasm_bindgen::JsValue) -> ClipboardError {
        ClipboardError::Rejected(format!("{e:?}"))
    }

    /// Clipboard of the current page.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebClipboard;

    impl ClipboardBackend for WebClipboard {
        fn is_secure(&self) -> bool {
            web_sys::window().is_some_and(|w| w.is_secure_context())
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
            let promise = window.navigator().clipboard().write_text(text);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::error!("Failed to copy: {e:?}");
                }
            });
            Ok(())
        }

        fn legacy_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
            let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
            let document = window.document().ok_or(ClipboardError::Unavailable)?;
            let body = document.body().ok_or(ClipboardError::Unavailable)?;

            let field = document
                .create_element("textarea")
                .map_err(js_err)?
                .dyn_into::<HtmlTextAreaElement>()
                .map_err(|_| ClipboardError::Unavailable)?;
            field.set_value(text);
            let style = field.style();
            style.set_property("position", "fixed").map_err(js_err)?;
            style.set_property("left", "-999999px").map_err(js_err)?;
            style.set_property("top", "-999999px").map_err(js_err)?;
            body.append_child(&field).map_err(js_err)?;
            field.focus().map_err(js_err)?;
            field.select();

            let copied = document
                .dyn_ref::<HtmlDocument>()
                .ok_or(ClipboardError::Unavailable)
                .and_then(|doc| doc.exec_command("copy").map_err(js_err));
            body.remove_child(&field).map_err(js_err)?;

            match copied? {
                true => Ok(()),
                false => Err(ClipboardError::Rejected("copy command refused".into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_path_writes_once() {
        let mut clipboard = MemoryClipboard::new();
        assert!(copy_to_clipboard(&mut clipboard, "(♥‿♥)"));
        assert_eq!(clipboard.writes, vec!["(♥‿♥)".to_string()]);
        assert_eq!(clipboard.contents.as_deref(), Some("(♥‿♥)"));
    }

    #[test]
    fn insecure_context_uses_legacy_copy() {
        struct LegacyOnly(Vec<String>);
        impl ClipboardBackend for LegacyOnly {
            fn is_secure(&self) -> bool {
                false
            }
            fn write_text(&mut self, _: &str) -> Result<(), ClipboardError> {
                panic!("secure API used in insecure context")
            }
            fn legacy_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
                self.0.push(text.to_string());
                Ok(())
            }
        }

        let mut clipboard = LegacyOnly(Vec::new());
        assert!(copy_to_clipboard(&mut clipboard, "ʕ•ᴥ•ʔ"));
        assert_eq!(clipboard.0, vec!["ʕ•ᴥ•ʔ".to_string()]);
    }

    #[test]
    fn rejected_write_is_swallowed() {
        let mut clipboard = MemoryClipboard {
            reject_with: Some("denied".into()),
            ..MemoryClipboard::new()
        };
        assert!(!copy_to_clipboard(&mut clipboard, "(^_-)"));
        assert_eq!(clipboard.writes.len(), 1);
        assert!(clipboard.contents.is_none());
    }
}
