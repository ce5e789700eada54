/// One story row from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Rank shown on the page; unique within one listing.
    pub id: u64,
    pub title: String,
    /// Absolute, or relative to the site for self-posts.
    pub link: String,
    /// Empty for self-posts.
    pub site: String,
}

/// Everything scraped from one listing page, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryList {
    pub entries: Vec<Entry>,
    pub next_page_ref: String,
}

impl EntryList {
    pub fn find(&self, id: u64) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
