//! Asset definitions for the POI catalog.

/// JSON scene manifest with exhibit metadata and marker placement.
pub mod poi_manifest;
