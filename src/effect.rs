//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the full catalog listing
    LoadCatalog { url: String },
    /// Fetch one entry's detail; `seq` tags the request for stale checks
    LoadDetail { seq: u64, url: String },
    /// Fetch and decode artwork for the displayed detail
    LoadSprite { id: u32, url: String },
    /// Fetch and decode artwork for one grid card
    LoadCardSprite { id: String, url: String },
    /// Drop in-flight detail and sprite work after the overlay closes
    CancelDetail,
}
