//! Splits a listing's option lines into factory packages and dealer-installed
//! accessories, dropping mandated zero-value lines.

use std::collections::HashSet;

use carinv_core::{Package, Platform, RawPackage};

use crate::price::price_from_scalar;

/// Lowercased names of line items dropped from every listing.
pub const EXCLUDED_NAMES: [&str; 1] = ["50 state emissions"];

/// Trims a package name and strips a single trailing period.
#[must_use]
pub fn normalize_package_name(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Output of [`PackageClassifier::classify`]. The three buckets partition the
/// input: every raw line lands in exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedPackages {
    pub factory: Vec<Package>,
    pub accessories: Vec<Package>,
    /// Normalized names of dropped lines.
    pub excluded: Vec<String>,
}

impl ClassifiedPackages {
    #[must_use]
    pub fn len(&self) -> usize {
        self.factory.len() + self.accessories.len() + self.excluded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Case-insensitive package classifier for one dealer.
#[derive(Debug, Clone)]
pub struct PackageClassifier {
    accessory_names: HashSet<String>,
    excluded_names: HashSet<String>,
}

impl PackageClassifier {
    /// Classifier seeded with the platform's built-in accessory denylist.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            accessory_names: platform
                .accessory_names()
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            excluded_names: EXCLUDED_NAMES.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    /// Adds dealer-specific accessory names on top of the platform list.
    #[must_use]
    pub fn with_accessory_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accessory_names.extend(
            names
                .into_iter()
                .map(|name| normalize_package_name(name.as_ref()).to_lowercase())
                .filter(|name| !name.is_empty()),
        );
        self
    }

    fn is_excluded(&self, key: &str) -> bool {
        self.excluded_names.contains(key)
    }

    /// Classifies `packages` by name. Lines in `pre_classified` are already
    /// known to be dealer-installed and skip the denylist, though excluded
    /// names are still dropped.
    #[must_use]
    pub fn classify(
        &self,
        packages: &[RawPackage],
        pre_classified: &[RawPackage],
    ) -> ClassifiedPackages {
        let mut out = ClassifiedPackages::default();

        for raw in packages {
            let name = normalize_package_name(&raw.name);
            let key = name.to_lowercase();
            if self.is_excluded(&key) {
                tracing::debug!(package = %name, "excluded package dropped");
                out.excluded.push(name);
            } else if self.accessory_names.contains(&key) {
                out.accessories.push(to_package(name, raw));
            } else {
                out.factory.push(to_package(name, raw));
            }
        }

        for raw in pre_classified {
            let name = normalize_package_name(&raw.name);
            if self.is_excluded(&name.to_lowercase()) {
                tracing::debug!(package = %name, "excluded accessory dropped");
                out.excluded.push(name);
            } else {
                out.accessories.push(to_package(name, raw));
            }
        }

        out
    }
}

fn to_package(name: String, raw: &RawPackage) -> Package {
    Package::new(name, raw.price.as_ref().and_then(price_from_scalar))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, price: Option<&str>) -> RawPackage {
        RawPackage {
            name: name.to_string(),
            price: price.map(Into::into),
        }
    }

    #[test]
    fn normalize_package_name_strips_one_trailing_period() {
        assert_eq!(normalize_package_name("  Weather. "), "Weather");
        assert_eq!(normalize_package_name("Pkg.."), "Pkg.");
        assert_eq!(normalize_package_name("Premium Audio"), "Premium Audio");
    }

    #[test]
    fn classify_routes_each_bucket() {
        let classifier = PackageClassifier::for_platform(Platform::DealerCom);
        let out = classifier.classify(
            &[
                raw("Weather.", Some("$375")),
                raw("50 State Emissions", Some("$0")),
                raw("TINT", Some("$499")),
                raw("Mudguards", None),
            ],
            &[],
        );

        assert_eq!(
            out.factory,
            vec![Package::new("Weather", Some(375)), Package::new("Mudguards", None)]
        );
        assert_eq!(out.accessories, vec![Package::new("TINT", Some(499))]);
        assert_eq!(out.excluded, vec!["50 State Emissions".to_string()]);
    }

    #[test]
    fn classify_is_a_partition() {
        let classifier = PackageClassifier::for_platform(Platform::DealerOn)
            .with_accessory_names(["Window Film."]);
        let packages = vec![
            raw("360Shield -PaintShield and InteriorShield", Some("$1,295")),
            raw("window film", Some("$300")),
            raw("50 state emissions.", None),
            raw("   ", Some("$10")),
            raw("Convenience Package", Some("$1,050")),
            raw("Carpet Mats", Some("$289")),
        ];
        let pre = vec![raw("Nitrogen Tires", Some("$199"))];

        let out = classifier.classify(&packages, &pre);

        assert_eq!(out.len(), packages.len() + pre.len());
        assert_eq!(out.factory.len(), 3);
        assert_eq!(out.accessories.len(), 3);
        assert_eq!(out.excluded.len(), 1);

        let factory: HashSet<_> = out.factory.iter().map(|p| p.name.to_lowercase()).collect();
        assert!(out
            .accessories
            .iter()
            .all(|p| !factory.contains(&p.name.to_lowercase())));
    }

    #[test]
    fn blank_name_stays_a_priced_factory_package() {
        let out = PackageClassifier::for_platform(Platform::DealerCom)
            .classify(&[raw("   ", Some("$500")), raw(".", None)], &[]);
        assert_eq!(
            out.factory,
            vec![Package::new("", Some(500)), Package::new("", None)]
        );
        assert!(out.excluded.is_empty());
    }

    #[test]
    fn pre_classified_lines_skip_the_denylist_but_not_exclusion() {
        let classifier = PackageClassifier::for_platform(Platform::TeamVelocity);
        let out = classifier.classify(
            &[],
            &[raw("Paint Protection", Some("$895")), raw("50 State Emissions", None)],
        );
        assert!(out.factory.is_empty());
        assert_eq!(out.accessories, vec![Package::new("Paint Protection", Some(895))]);
        assert_eq!(out.excluded.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let out = PackageClassifier::for_platform(Platform::DealerInspire).classify(&[], &[]);
        assert!(out.is_empty());
    }
}
