use bevy::prelude::*;

pub struct CategoryInfo {
    pub slug: &'static str,
    pub label: &'static str,
    /// Linear RGB accent used for marker emissive and tooltip trim.
    pub accent: [f32; 3],
}

pub const CATEGORY_MAP: &[CategoryInfo] = &[
    CategoryInfo {
        slug: "engineering",
        label: "Engineering",
        accent: [0.95, 0.62, 0.12],
    },
    CategoryInfo {
        slug: "research",
        label: "Research",
        accent: [0.22, 0.68, 0.94],
    },
    CategoryInfo {
        slug: "creative",
        label: "Creative Work",
        accent: [0.88, 0.28, 0.62],
    },
    CategoryInfo {
        slug: "environment",
        label: "Environment",
        accent: [0.30, 0.85, 0.42],
    },
    CategoryInfo {
        slug: "community",
        label: "Community",
        accent: [0.74, 0.52, 0.96],
    },
];

/// Fallback accent for categories the map does not know.
pub const DEFAULT_ACCENT: [f32; 3] = [0.80, 0.80, 0.80];

pub fn get_category_label(slug: &str) -> String {
    CATEGORY_MAP
        .iter()
        .find(|c| c.slug == slug)
        .map_or("Exhibit", |c| c.label)
        .to_string()
}

pub fn get_category_accent(slug: &str) -> LinearRgba {
    let accent = CATEGORY_MAP
        .iter()
        .find(|c| c.slug == slug)
        .map_or(DEFAULT_ACCENT, |c| c.accent);
    LinearRgba::rgb(accent[0], accent[1], accent[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_resolves_label_and_accent() {
        assert_eq!(get_category_label("research"), "Research");
        let accent = get_category_accent("research");
        assert!(accent.blue > accent.red);
    }

    #[test]
    fn unknown_category_falls_back() {
        assert_eq!(get_category_label("dinosaurs"), "Exhibit");
        assert_eq!(
            get_category_accent("dinosaurs"),
            LinearRgba::rgb(DEFAULT_ACCENT[0], DEFAULT_ACCENT[1], DEFAULT_ACCENT[2])
        );
    }
}
