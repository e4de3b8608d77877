//! Deferred asset promotion.
//!
//! Media elements ship with `data-remote-*` attributes instead of live
//! sources so nothing heavy loads before the engine decides to. In
//! `Remote` mode the deferred attributes are promoted to live ones at
//! mount; `Placeholder` mode leaves everything deferred.

use motif_dom::{Document, NodeId};

use crate::config::AssetMode;

pub const ATTR_REMOTE_SRC: &str = "data-remote-src";
pub const ATTR_REMOTE_SRCSET: &str = "data-remote-srcset";
pub const ATTR_REMOTE_POSTER: &str = "data-remote-poster";

/// Set when a video's sources were promoted and the host should reload it.
pub const ATTR_RELOAD_REQUESTED: &str = "data-reload-requested";

/// Promote one element's deferred attributes. Returns true if anything
/// was promoted.
pub fn promote_node(doc: &mut Document, node: NodeId) -> bool {
    let mut promoted = false;
    if let Some(src) = doc.attr(node, ATTR_REMOTE_SRC).map(str::to_owned) {
        doc.set_attr(node, "src", &src);
        doc.remove_attr(node, ATTR_REMOTE_SRC);
        promoted = true;
    }
    if let Some(srcset) = doc.attr(node, ATTR_REMOTE_SRCSET).map(str::to_owned) {
        doc.set_attr(node, "srcset", &srcset);
        doc.remove_attr(node, ATTR_REMOTE_SRCSET);
        promoted = true;
    }
    if let Some(poster) = doc.attr(node, ATTR_REMOTE_POSTER).map(str::to_owned) {
        doc.set_attr(node, "poster", &poster);
        doc.remove_attr(node, ATTR_REMOTE_POSTER);
        promoted = true;
    }
    promoted
}

/// Promote every deferred source in the document.
pub fn promote_all(doc: &mut Document, mode: AssetMode) {
    if mode != AssetMode::Remote {
        tracing::debug!("placeholder asset mode; leaving deferred sources");
        return;
    }
    let mut count = 0usize;
    let deferred: Vec<NodeId> = doc
        .descendants(doc.root())
        .into_iter()
        .filter(|&n| {
            doc.attr(n, ATTR_REMOTE_SRC).is_some()
                || doc.attr(n, ATTR_REMOTE_SRCSET).is_some()
                || doc.attr(n, ATTR_REMOTE_POSTER).is_some()
        })
        .collect();
    for node in deferred {
        let is_video = doc.tag(node) == "video";
        let had_poster = doc.attr(node, ATTR_REMOTE_POSTER).is_some();
        if promote_node(doc, node) {
            count += 1;
        }
        // A video whose child sources changed needs a reload to pick
        // them up.
        if is_video && had_poster {
            doc.set_attr(node, ATTR_RELOAD_REQUESTED, "true");
        }
    }
    tracing::debug!(count, "promoted deferred assets");
}
