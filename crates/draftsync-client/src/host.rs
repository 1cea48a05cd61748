//! Editor binding supplied by the host page.
//!
//! The session never searches for its own inputs; the host hands it an
//! explicit binding at construction. Sidecar fields default to absent so
//! minimal hosts implement only title, body and the restore write-back.

use draftsync_core::document::DocumentId;
use parking_lot::Mutex;

/// What the session needs from the page.
pub trait EditorHost: Send + Sync {
    /// Current title field content.
    fn title(&self) -> String;

    /// Current body field content.
    fn body(&self) -> String;

    /// Overwrite both fields with restored content. This is the only way
    /// the session writes into the editor.
    fn apply_restore(&self, title: &str, body: &str);

    /// Selected category, when the host form exposes one.
    fn category_id(&self) -> Option<String> {
        None
    }

    /// Table-of-contents flag, when the host form exposes one.
    fn show_toc(&self) -> Option<bool> {
        None
    }

    /// Ordering weight, when the host form exposes one.
    fn article_order(&self) -> Option<i64> {
        None
    }

    /// The first successful save assigned an identity; the host should
    /// update any location/URL state that encodes "new document".
    fn document_identified(&self, identity: &DocumentId) {
        let _ = identity;
    }
}

/// In-memory host for tests, simulations and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryHost {
    fields: Mutex<MemoryFields>,
    identified: Mutex<Vec<DocumentId>>,
}

#[derive(Debug, Default)]
struct MemoryFields {
    title: String,
    body: String,
    category_id: Option<String>,
    show_toc: Option<bool>,
    article_order: Option<i64>,
    restored: Vec<(String, String)>,
}

impl MemoryHost {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            fields: Mutex::new(MemoryFields {
                title: title.into(),
                body: body.into(),
                ..MemoryFields::default()
            }),
            identified: Mutex::new(Vec::new()),
        }
    }

    /// Simulate the user typing into the editor.
    pub fn set_content(&self, title: impl Into<String>, body: impl Into<String>) {
        let mut fields = self.fields.lock();
        fields.title = title.into();
        fields.body = body.into();
    }

    pub fn set_category_id(&self, category_id: Option<String>) {
        self.fields.lock().category_id = category_id;
    }

    pub fn set_show_toc(&self, show_toc: Option<bool>) {
        self.fields.lock().show_toc = show_toc;
    }

    pub fn set_article_order(&self, article_order: Option<i64>) {
        self.fields.lock().article_order = article_order;
    }

    /// Restores applied so far, oldest first.
    #[must_use]
    pub fn restored(&self) -> Vec<(String, String)> {
        self.fields.lock().restored.clone()
    }

    /// Identity notifications received so far.
    #[must_use]
    pub fn identified(&self) -> Vec<DocumentId> {
        self.identified.lock().clone()
    }
}

impl EditorHost for MemoryHost {
    fn title(&self) -> String {
        self.fields.lock().title.clone()
    }

    fn body(&self) -> String {
        self.fields.lock().body.clone()
    }

    fn apply_restore(&self, title: &str, body: &str) {
        let mut fields = self.fields.lock();
        fields.title = title.to_owned();
        fields.body = body.to_owned();
        fields.restored.push((title.to_owned(), body.to_owned()));
    }

    fn category_id(&self) -> Option<String> {
        self.fields.lock().category_id.clone()
    }

    fn show_toc(&self) -> Option<bool> {
        self.fields.lock().show_toc
    }

    fn article_order(&self) -> Option<i64> {
        self.fields.lock().article_order
    }

    fn document_identified(&self, identity: &DocumentId) {
        self.identified.lock().push(identity.clone());
    }
}
