//! Component tree (arena-based allocation)

use crate::{Bounds, ComponentId, ListenerMap, Result, TreeError, Vec2};

/// A node in the component tree
#[derive(Debug, Default)]
pub struct Component {
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    /// Position relative to the parent
    pub position: Vec2,
    pub size: Vec2,
    pub listeners: ListenerMap,
}

impl Component {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }
}

/// Read-only queries over a component hierarchy.
///
/// Render utilities only need these; anything that can answer them can be
/// clipped and hit-tested.
pub trait Hierarchy {
    fn parent(&self, id: ComponentId) -> Option<ComponentId>;

    /// Local position (relative to the parent)
    fn position(&self, id: ComponentId) -> Vec2;

    fn size(&self, id: ComponentId) -> Vec2;

    /// World-space position: sum of local positions from the root down
    fn absolute_position(&self, id: ComponentId) -> Vec2 {
        let mut pos = self.position(id);
        let mut current = self.parent(id);
        while let Some(parent) = current {
            pos = pos + self.position(parent);
            current = self.parent(parent);
        }
        pos
    }

    fn absolute_bounds(&self, id: ComponentId) -> Bounds {
        Bounds::from_pos_size(self.absolute_position(id), self.size(id))
    }

    /// Ancestors from the nearest parent up to the root
    fn ancestors(&self, id: ComponentId) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }
}

/// Iterator over a component's ancestors, nearest first
#[derive(Debug)]
pub struct Ancestors<'a, H> {
    tree: &'a H,
    next: Option<ComponentId>,
}

impl<H: Hierarchy> Iterator for Ancestors<'_, H> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Arena-based component tree.
///
/// Removed components leave a tombstone so ids are never reused.
#[derive(Debug, Default)]
pub struct ComponentTree {
    nodes: Vec<Option<Component>>,
}

impl ComponentTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a detached component
    pub fn create(&mut self, position: Vec2, size: Vec2) -> ComponentId {
        self.insert(Component::new(position, size))
    }

    /// Add a detached component covering `bounds`
    pub fn create_with_bounds(&mut self, bounds: Bounds) -> ComponentId {
        self.create(bounds.position(), bounds.size())
    }

    fn insert(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.nodes.len() as u32);
        self.nodes.push(Some(component));
        id
    }

    /// Get a component by ID
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a mutable component by ID
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.get(id).map(Component::children).unwrap_or(&[])
    }

    pub fn listener_map(&self, id: ComponentId) -> Option<&ListenerMap> {
        self.get(id).map(|c| &c.listeners)
    }

    pub fn listener_map_mut(&mut self, id: ComponentId) -> Option<&mut ListenerMap> {
        self.get_mut(id).map(|c| &mut c.listeners)
    }

    pub fn set_position(&mut self, id: ComponentId, position: Vec2) -> Result<()> {
        self.component_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_size(&mut self, id: ComponentId, size: Vec2) -> Result<()> {
        self.component_mut(id)?.size = size;
        Ok(())
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.get_mut(id).ok_or(TreeError::UnknownComponent(id))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved.
    pub fn append_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<()> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownComponent(parent));
        }
        if !self.contains(child) {
            return Err(TreeError::UnknownComponent(child));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(TreeError::Cycle { parent, child });
        }

        if let Some(old_parent) = self.detach(child) {
            tracing::trace!("Moving {:?} from {:?} to {:?}", child, old_parent, parent);
        }
        self.component_mut(child)?.parent = Some(parent);
        self.component_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a component from its parent, returning the old parent
    pub fn detach(&mut self, child: ComponentId) -> Option<ComponentId> {
        let parent = self.get_mut(child)?.parent.take()?;
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        Some(parent)
    }

    /// Remove a component and its whole subtree
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        if !self.contains(id) {
            return Err(TreeError::UnknownComponent(id));
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(component) = self.nodes.get_mut(current.index()).and_then(Option::take) {
                stack.extend(component.children);
            }
        }
        Ok(())
    }
}

impl Hierarchy for ComponentTree {
    fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.get(id).and_then(Component::parent)
    }

    fn position(&self, id: ComponentId) -> Vec2 {
        self.get(id).map(|c| c.position).unwrap_or_default()
    }

    fn size(&self, id: ComponentId) -> Vec2 {
        self.get(id).map(|c| c.size).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_chain() -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let root = tree.create(Vec2::new(10.0, 10.0), Vec2::new(500.0, 500.0));
        let panel = tree.create(Vec2::new(20.0, 30.0), Vec2::new(200.0, 100.0));
        let button = tree.create(Vec2::new(5.0, 5.0), Vec2::new(50.0, 20.0));
        tree.append_child(root, panel).unwrap();
        tree.append_child(panel, button).unwrap();
        (tree, root, panel, button)
    }

    #[test]
    fn test_absolute_position_sums_locals() {
        let (tree, root, panel, button) = tree_with_chain();

        assert_eq!(tree.absolute_position(root), Vec2::new(10.0, 10.0));
        assert_eq!(tree.absolute_position(panel), Vec2::new(30.0, 40.0));
        assert_eq!(tree.absolute_position(button), Vec2::new(35.0, 45.0));
        assert_eq!(tree.absolute_bounds(button), Bounds::new(35.0, 45.0, 50.0, 20.0));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, root, panel, button) = tree_with_chain();

        let ancestors: Vec<_> = tree.ancestors(button).collect();
        assert_eq!(ancestors, vec![panel, root]);
        assert_eq!(tree.ancestors(root).count(), 0);
    }

    #[test]
    fn test_append_rejects_cycle() {
        let (mut tree, root, _panel, button) = tree_with_chain();

        assert_eq!(
            tree.append_child(button, root),
            Err(TreeError::Cycle { parent: button, child: root })
        );
        assert_eq!(
            tree.append_child(root, root),
            Err(TreeError::Cycle { parent: root, child: root })
        );
    }

    #[test]
    fn test_append_moves_between_parents() {
        let (mut tree, root, panel, button) = tree_with_chain();

        tree.append_child(root, button).unwrap();
        assert_eq!(tree.parent(button), Some(root));
        assert!(tree.children(panel).is_empty());
        assert_eq!(tree.children(root), &[panel, button]);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, root, panel, button) = tree_with_chain();

        tree.remove(panel).unwrap();
        assert!(!tree.contains(panel));
        assert!(!tree.contains(button));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.remove(panel), Err(TreeError::UnknownComponent(panel)));
    }
}
