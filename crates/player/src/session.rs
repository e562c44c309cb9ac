//! Explicit session context objects.
//!
//! These replace the hidden module-level mutables the browser prototype
//! relied on (`currentSheetId`, `currentFolderId`, ...). Operations that
//! depend on "what is currently open" take the relevant session by
//! reference, so the dependency is visible at the call site.

/// Which sheet the editor currently holds, if any.
///
/// Decides PATCH (update) vs POST (create) on save; adopted from the
/// server response after create and import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetSession {
    current_sheet_id: Option<i64>,
}

impl SheetSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_id(&self) -> Option<i64> {
        self.current_sheet_id
    }

    pub fn adopt(&mut self, id: i64) {
        self.current_sheet_id = Some(id);
    }

    pub fn clear(&mut self) {
        self.current_sheet_id = None;
    }
}

/// Folder filters and the open article in the gallery surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GallerySession {
    pub lore_folder: Option<i64>,
    pub media_folder: Option<i64>,
    pub open_article: Option<i64>,
}

impl GallerySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_session_adopt_and_clear() {
        let mut session = SheetSession::new();
        assert_eq!(session.current_id(), None);
        session.adopt(12);
        assert_eq!(session.current_id(), Some(12));
        session.clear();
        assert_eq!(session.current_id(), None);
    }
}
