//! Scene construction: POI markers, their registry, and the exhibit floor.

/// Exhibit floor geometry.
pub mod ground;

/// POI marker entities, hit volumes, the ordered registry, and the focus
/// animation owned by the render loop.
pub mod markers;
