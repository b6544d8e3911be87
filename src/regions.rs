//! Region registry for the nowcast service.
//!
//! Defines the canonical list of metropolitan regions the service answers
//! for, each with one representative point on the KMA forecast grid. This is
//! the single source of truth for grid coordinates; other modules reach them
//! through `catalog::ReferenceTables` rather than hardcoding pairs.
//!
//! The grid points are representative, not exhaustive: a whole metropolitan
//! city is answered from one grid cell.

use crate::model::GridPoint;

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// Metadata for a single supported region.
pub struct Region {
    /// Short key users type, e.g. "서울".
    pub key: &'static str,
    /// Official administrative name.
    pub official_name: &'static str,
    /// Representative KMA grid cell.
    pub grid: GridPoint,
}

/// All supported metropolitan regions.
///
/// Source: KMA 단기예보 grid table (기상청41_단기예보 조회서비스_오픈API활용가이드).
pub static REGION_REGISTRY: &[Region] = &[
    Region {
        key: "서울",
        official_name: "서울특별시",
        grid: GridPoint::new(60, 127),
    },
    Region {
        key: "부산",
        official_name: "부산광역시",
        grid: GridPoint::new(98, 76),
    },
    Region {
        key: "대구",
        official_name: "대구광역시",
        grid: GridPoint::new(89, 90),
    },
    Region {
        key: "인천",
        official_name: "인천광역시",
        grid: GridPoint::new(55, 124),
    },
    Region {
        key: "광주",
        official_name: "광주광역시",
        grid: GridPoint::new(58, 74),
    },
    Region {
        key: "대전",
        official_name: "대전광역시",
        grid: GridPoint::new(67, 100),
    },
    Region {
        key: "울산",
        official_name: "울산광역시",
        grid: GridPoint::new(102, 84),
    },
    Region {
        key: "세종",
        official_name: "세종특별자치시",
        grid: GridPoint::new(66, 103),
    },
];

/// Free-form inputs shown to users as examples of what resolves.
pub const EXAMPLE_INPUTS: &[&str] = &["서울", "서울특별시", "서울시", "부산", "부산광역시", "세종시"];

/// Administrative suffixes, most specific first so "특별자치시" is not
/// reduced by "시" alone.
const ADMIN_SUFFIXES: &[&str] = &["특별자치시", "특별시", "광역시", "시"];

/// Region keys, sorted.
pub fn all_region_keys() -> Vec<&'static str> {
    let mut keys: Vec<_> = REGION_REGISTRY.iter().map(|r| r.key).collect();
    keys.sort_unstable();
    keys
}

/// Looks up a region by its normalized key. Returns `None` if not found.
pub fn find_region(key: &str) -> Option<&'static Region> {
    REGION_REGISTRY.iter().find(|r| r.key == key)
}

// ---------------------------------------------------------------------------
// Input normalization
// ---------------------------------------------------------------------------

/// Canonicalizes a free-form region name by stripping administrative
/// suffixes, e.g. "서울특별시" -> "서울", "부산광역시" -> "부산",
/// "세종시" -> "세종".
///
/// Each suffix is tried once, in order, against the progressively trimmed
/// name. Never fails and does not check membership; unmatched input comes
/// back trimmed.
pub fn normalize_region_name(input: &str) -> String {
    let mut name = input.trim();
    for suffix in ADMIN_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
        }
    }
    name.trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_eight_metropolitan_regions() {
        let expected = ["서울", "부산", "대구", "인천", "광주", "대전", "울산", "세종"];
        for key in &expected {
            assert!(
                find_region(key).is_some(),
                "REGION_REGISTRY missing expected region '{}'",
                key
            );
        }
        assert_eq!(REGION_REGISTRY.len(), expected.len());
    }

    #[test]
    fn test_no_duplicate_region_keys_or_grids() {
        let mut keys = std::collections::HashSet::new();
        let mut grids = std::collections::HashSet::new();
        for region in REGION_REGISTRY {
            assert!(keys.insert(region.key), "duplicate key '{}'", region.key);
            assert!(
                grids.insert(region.grid),
                "duplicate grid {} for '{}'",
                region.grid,
                region.key
            );
        }
    }

    #[test]
    fn test_grid_points_fall_inside_the_kma_grid() {
        // The KMA Lambert grid is 149 x 253 cells.
        for region in REGION_REGISTRY {
            assert!(
                (1..=149).contains(&region.grid.nx) && (1..=253).contains(&region.grid.ny),
                "grid {} for '{}' is outside the KMA domain",
                region.grid,
                region.key
            );
        }
    }

    #[test]
    fn test_official_names_normalize_back_to_their_key() {
        for region in REGION_REGISTRY {
            assert_eq!(
                normalize_region_name(region.official_name),
                region.key,
                "official name '{}' should normalize to '{}'",
                region.official_name,
                region.key
            );
        }
    }

    #[test]
    fn test_seoul_variants_all_normalize_to_seoul() {
        for input in ["서울특별시", "서울시", "서울", "  서울특별시  "] {
            assert_eq!(normalize_region_name(input), "서울", "input '{}'", input);
        }
    }

    #[test]
    fn test_sejong_special_autonomous_city_is_not_cut_short() {
        assert_eq!(normalize_region_name("세종특별자치시"), "세종");
        assert_eq!(normalize_region_name("세종시"), "세종");
    }

    #[test]
    fn test_empty_and_unmatched_input_come_back_trimmed() {
        assert_eq!(normalize_region_name(""), "");
        assert_eq!(normalize_region_name("   "), "");
        assert_eq!(normalize_region_name(" Tokyo "), "Tokyo");
    }

    #[test]
    fn test_unsupported_or_garbled_names_never_match() {
        for input in ["수원시", "제주특별자치도", "서울특별시강남구", "seoul", "서 울", "울"] {
            let normalized = normalize_region_name(input);
            assert!(
                find_region(&normalized).is_none(),
                "'{}' (normalized '{}') must not resolve to a supported region",
                input,
                normalized
            );
        }
    }

    #[test]
    fn test_example_inputs_all_resolve() {
        for input in EXAMPLE_INPUTS {
            assert!(
                find_region(&normalize_region_name(input)).is_some(),
                "example '{}' should resolve",
                input
            );
        }
    }

    #[test]
    fn test_all_region_keys_is_sorted() {
        let keys = all_region_keys();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), REGION_REGISTRY.len());
    }
}
