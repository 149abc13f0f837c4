//! Images: node construction from upload URLs and resize handles.
//!
//! Uploading is done elsewhere; this module only receives the public URL.
//! Resize handles attached to a rendered image are scoped resources: the
//! [`HandleGuard`] returned on registration releases them when dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::model::{Node, NodeType};

/// Smallest width an image can be resized to, in pixels.
pub const MIN_IMAGE_WIDTH: u32 = 50;

/// Build an image node for an uploaded file.
pub fn image_node(src: &str, alt: Option<&str>, title: Option<&str>) -> Result<Node> {
    let src = src.trim();
    if src.is_empty() {
        return Err(Error::InvalidDocument("image source is empty".to_string()));
    }
    Ok(Node::image(src, alt, title))
}

/// Set the display width of an image node, clamped to [`MIN_IMAGE_WIDTH`].
///
/// Returns the width actually applied.
pub fn set_image_width(node: &mut Node, width: u32) -> Result<u32> {
    if node.node_type != NodeType::Image {
        return Err(Error::NotAnImage(node.node_type.to_string()));
    }
    let width = width.max(MIN_IMAGE_WIDTH);
    node.set_attr("width", width);
    Ok(width)
}

/// Tracks which nodes currently have resize handles attached.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    handles: Arc<Mutex<HashMap<String, usize>>>,
}

impl HandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handle to a node; it stays registered while the guard lives.
    pub fn register(&self, key: impl Into<String>) -> HandleGuard {
        let key = key.into();
        *self.lock().entry(key.clone()).or_insert(0) += 1;
        log::debug!("Registered resize handle for '{}'", key);
        HandleGuard {
            registry: self.clone(),
            key,
        }
    }

    /// Check if a node has at least one live handle.
    pub fn is_registered(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of nodes with live handles.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no handles are live.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn release(&self, key: &str) {
        let mut handles = self.lock();
        if let Some(count) = handles.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                handles.remove(key);
            }
        }
        log::debug!("Released resize handle for '{}'", key);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its resize handle when dropped.
#[derive(Debug)]
#[must_use = "the handle is released as soon as the guard is dropped"]
pub struct HandleGuard {
    registry: HandleRegistry,
    key: String,
}

impl HandleGuard {
    /// Key of the node this handle belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_node() {
        let node = image_node(" https://cdn.test/a.png ", Some("A"), None).unwrap();
        assert_eq!(node.attr_str("src"), Some("https://cdn.test/a.png"));
        assert_eq!(node.attr_str("alt"), Some("A"));
        assert!(image_node("  ", None, None).is_err());
    }

    #[test]
    fn test_set_image_width_clamps() {
        let mut node = Node::image("a.png", None, None);
        assert_eq!(set_image_width(&mut node, 10).unwrap(), MIN_IMAGE_WIDTH);
        assert_eq!(node.attr_u64("width"), Some(u64::from(MIN_IMAGE_WIDTH)));
        assert_eq!(set_image_width(&mut node, 400).unwrap(), 400);
    }

    #[test]
    fn test_set_width_rejects_non_image() {
        let mut node = Node::paragraph_text("x");
        assert!(matches!(
            set_image_width(&mut node, 100),
            Err(Error::NotAnImage(_))
        ));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = HandleRegistry::new();
        let first = registry.register("img-1");
        let second = registry.register("img-1");
        assert!(registry.is_registered("img-1"));

        drop(first);
        assert!(registry.is_registered("img-1"));
        drop(second);
        assert!(!registry.is_registered("img-1"));
        assert!(registry.is_empty());
    }
}
