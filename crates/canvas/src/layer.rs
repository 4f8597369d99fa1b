//! Layer registry
//!
//! Named off-screen surfaces composited over the main surface. Layers are
//! kept back-to-front: index 0 is drawn first, right above the main surface,
//! and the last layer ends up on top.

use sdlcanvas_render::{PixelFormat, SurfaceId, Target};

use crate::error::{CanvasError, CanvasResult, ResourceKind};

/// Direction for `LayerRegistry::move_layer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the top of the stack (drawn later)
    Up,
    /// Toward the main surface (drawn earlier)
    Down,
}

/// A registered layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layer {
    pub id: String,
    pub format: PixelFormat,
    pub active: bool,
    pub surface: SurfaceId,
}

/// Read-only view of a layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub id: String,
    pub format: PixelFormat,
    /// Position in the stack, 0 being the bottom-most layer
    pub rank: usize,
    pub active: bool,
}

/// Ordered set of layers plus the current draw target
#[derive(Debug, Default)]
pub(crate) struct LayerRegistry {
    layers: Vec<Layer>,
    current: Option<String>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    fn index_of(&self, id: &str) -> CanvasResult<usize> {
        self.position(id)
            .ok_or_else(|| CanvasError::unknown(ResourceKind::Layer, id))
    }

    /// Add an active layer on top of the stack
    pub fn insert(&mut self, id: &str, format: PixelFormat, surface: SurfaceId) -> CanvasResult<()> {
        if self.contains(id) {
            return Err(CanvasError::duplicate(ResourceKind::Layer, id));
        }
        self.layers.push(Layer {
            id: id.to_string(),
            format,
            active: true,
            surface,
        });
        Ok(())
    }

    /// Remove a layer; drawing falls back to the main surface if it was selected
    pub fn remove(&mut self, id: &str) -> CanvasResult<Layer> {
        let index = self.index_of(id)?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Ok(self.layers.remove(index))
    }

    pub fn select(&mut self, id: &str) -> CanvasResult<()> {
        self.index_of(id)?;
        self.current = Some(id.to_string());
        Ok(())
    }

    pub fn select_main(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Where draw calls currently land
    pub fn target(&self) -> Target {
        self.current
            .as_deref()
            .and_then(|id| self.layers.iter().find(|layer| layer.id == id))
            .map(|layer| Target::Surface(layer.surface))
            .unwrap_or(Target::Main)
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> CanvasResult<()> {
        let index = self.index_of(id)?;
        self.layers[index].active = active;
        Ok(())
    }

    /// Shift a layer `steps` positions, clamped to the ends of the stack
    pub fn move_layer(&mut self, id: &str, direction: Direction, steps: usize) -> CanvasResult<()> {
        let from = self.index_of(id)?;
        let to = match direction {
            Direction::Up => from.saturating_add(steps).min(self.layers.len() - 1),
            Direction::Down => from.saturating_sub(steps),
        };
        if from != to {
            let layer = self.layers.remove(from);
            self.layers.insert(to, layer);
        }
        Ok(())
    }

    /// Surfaces to composite, bottom first, skipping inactive layers
    pub fn active_surfaces(&self) -> Vec<SurfaceId> {
        self.layers
            .iter()
            .filter(|layer| layer.active)
            .map(|layer| layer.surface)
            .collect()
    }

    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.layers.iter().map(|layer| layer.surface)
    }

    /// Back-to-front snapshot of every layer
    pub fn snapshot(&self) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .enumerate()
            .map(|(rank, layer)| LayerInfo {
                id: layer.id.clone(),
                format: layer.format,
                rank,
                active: layer.active,
            })
            .collect()
    }

    /// Remove every layer
    pub fn drain(&mut self) -> Vec<Layer> {
        self.current = None;
        std::mem::take(&mut self.layers)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[&str]) -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        for (i, id) in ids.iter().enumerate() {
            registry
                .insert(id, PixelFormat::Rgba8888, SurfaceId(i as u32 + 1))
                .unwrap();
        }
        registry
    }

    fn order(registry: &LayerRegistry) -> Vec<String> {
        registry.snapshot().into_iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_insert_on_top() {
        let registry = registry(&["a", "b", "c"]);
        assert_eq!(order(&registry), vec!["a", "b", "c"]);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot[2].rank, 2);
        assert!(snapshot.iter().all(|l| l.active));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry(&["a"]);
        let result = registry.insert("a", PixelFormat::Rgb332, SurfaceId(9));
        assert!(matches!(
            result,
            Err(CanvasError::DuplicateResource {
                kind: ResourceKind::Layer,
                ..
            })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_then_reinsert() {
        let mut registry = registry(&["a", "b"]);
        registry.remove("a").unwrap();
        assert!(!registry.contains("a"));
        registry.insert("a", PixelFormat::Rgb565, SurfaceId(7)).unwrap();
        assert_eq!(order(&registry), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_unknown() {
        let mut registry = registry(&["a"]);
        assert!(matches!(
            registry.remove("zzz"),
            Err(CanvasError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_select_and_target() {
        let mut registry = registry(&["a", "b"]);
        assert_eq!(registry.target(), Target::Main);
        registry.select("b").unwrap();
        assert_eq!(registry.target(), Target::Surface(SurfaceId(2)));
        registry.select_main();
        assert_eq!(registry.target(), Target::Main);
        assert!(registry.select("nope").is_err());
        assert_eq!(registry.target(), Target::Main);
    }

    #[test]
    fn test_removing_current_returns_to_main() {
        let mut registry = registry(&["a"]);
        registry.select("a").unwrap();
        registry.remove("a").unwrap();
        assert_eq!(registry.current(), None);
        assert_eq!(registry.target(), Target::Main);
    }

    #[test]
    fn test_move_zero_steps_is_noop() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.move_layer("b", Direction::Up, 0).unwrap();
        registry.move_layer("b", Direction::Down, 0).unwrap();
        assert_eq!(order(&registry), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_clamps() {
        let mut registry = registry(&["a", "b", "c", "d"]);
        registry.move_layer("b", Direction::Up, 100).unwrap();
        assert_eq!(order(&registry), vec!["a", "c", "d", "b"]);
        registry.move_layer("d", Direction::Down, 100).unwrap();
        assert_eq!(order(&registry), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_move_keeps_untouched_order() {
        let mut registry = registry(&["a", "b", "c", "d", "e"]);
        registry.move_layer("a", Direction::Up, 2).unwrap();
        let ids = order(&registry);
        assert_eq!(ids, vec!["b", "c", "a", "d", "e"]);
        let others: Vec<_> = ids.iter().filter(|id| *id != "a").cloned().collect();
        assert_eq!(others, vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn test_inactive_layers_skipped() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.set_active("b", false).unwrap();
        assert_eq!(registry.active_surfaces(), vec![SurfaceId(1), SurfaceId(3)]);
        registry.set_active("b", true).unwrap();
        assert_eq!(registry.active_surfaces().len(), 3);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let registry = registry(&["x", "y"]);
        assert_eq!(registry.snapshot(), registry.snapshot());
    }
}
