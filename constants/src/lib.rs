/// Exhibit category identifiers with display labels and accent colours.
pub mod category;

/// Tuning constants for the POI interaction and tooltip subsystems.
pub mod interaction;
