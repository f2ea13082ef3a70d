use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A minimal scene node: name, hierarchy and transform.
///
/// Names are what clip body tracks bind against (see
/// [`Binder`](crate::animation::Binder)); everything else a full engine
/// hangs off a node lives in the scene's component maps, not here.
#[derive(Debug, Clone)]
pub struct Node {
    /// Bind name; matched against [`BodyTrack::node_name`](crate::animation::BodyTrack).
    pub name: String,

    /// Parent node handle (None for root nodes)
    pub(crate) parent: Option<NodeHandle>,
    /// Child node handles
    pub(crate) children: Vec<NodeHandle>,

    /// Transform component (hot data accessed every frame)
    pub transform: Transform,

    /// Visibility flag for culling
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}
