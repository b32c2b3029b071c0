//! Stage sequence turning an adapter's [`RawFieldSet`] into a
//! [`CanonicalRecord`]: text cleanup, package classification, price
//! reconciliation, then timestamping.
//!
//! Nothing here fails. Unparsable input degrades to absent fields.

use carinv_core::{CanonicalRecord, Platform, RawFieldSet};
use chrono::{DateTime, Utc};

use crate::packages::PackageClassifier;
use crate::price::{price_from_scalar, signed_from_scalar, year_from_scalar};
use crate::reconcile::reconcile_prices;
use crate::text::{
    clean_text, normalize_color, normalize_status, resolve_drivetrain, DrivetrainAliases,
};
use crate::timestamp::stamp;

/// Per-dealer normalization settings.
#[derive(Debug, Clone)]
pub struct ListingNormalizer {
    classifier: PackageClassifier,
    aliases: DrivetrainAliases,
    dealer_name: Option<String>,
    dealer_url: Option<String>,
}

impl ListingNormalizer {
    #[must_use]
    pub fn new(classifier: PackageClassifier, aliases: DrivetrainAliases) -> Self {
        Self {
            classifier,
            aliases,
            dealer_name: None,
            dealer_url: None,
        }
    }

    /// Platform accessory denylist with the default drivetrain folding.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self::new(
            PackageClassifier::for_platform(platform),
            DrivetrainAliases::default(),
        )
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: DrivetrainAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Dealer metadata applied when a raw record does not carry its own.
    #[must_use]
    pub fn with_dealer(mut self, name: Option<&str>, url: Option<&str>) -> Self {
        self.dealer_name = clean_text(name);
        self.dealer_url = clean_text(url);
        self
    }

    /// Runs every stage over one raw record.
    #[must_use]
    pub fn normalize(&self, raw: &RawFieldSet, scraped_at: DateTime<Utc>) -> CanonicalRecord {
        let mut record = self.clean_fields(raw);

        let classified = self.classifier.classify(&raw.packages, &raw.dealer_accessories);
        record.packages = Some(classified.factory).filter(|p| !p.is_empty());

        reconcile_prices(&mut record, &classified.accessories);
        stamp(&mut record, scraped_at);
        record
    }

    fn clean_fields(&self, raw: &RawFieldSet) -> CanonicalRecord {
        let trim = clean_text(raw.trim.as_deref());
        let drivetrain = resolve_drivetrain(&[raw.drivetrain.as_deref(), trim.as_deref()])
            .map(|token| self.aliases.fold(token));
        if drivetrain.is_none() && raw.drivetrain.is_some() {
            tracing::debug!(
                vin = raw.vin.as_deref().unwrap_or("-"),
                drivetrain = raw.drivetrain.as_deref().unwrap_or_default(),
                "unresolvable drivetrain"
            );
        }

        CanonicalRecord {
            vin: clean_text(raw.vin.as_deref()),
            stock_number: clean_text(raw.stock_number.as_deref()),
            model_code: clean_text(raw.model_code.as_deref()),
            year: raw.year.as_ref().and_then(year_from_scalar),
            trim,
            drivetrain,
            exterior_color: normalize_color(raw.exterior_color.as_deref()),
            interior_color: normalize_color(raw.interior_color.as_deref()),
            msrp: raw.msrp.as_ref().and_then(price_from_scalar),
            base_price: raw.base_price.as_ref().and_then(price_from_scalar),
            total_packages_price: raw.total_packages_price.as_ref().and_then(price_from_scalar),
            dealer_accessories_price: raw
                .dealer_accessories_price
                .as_ref()
                .and_then(price_from_scalar),
            adjustments: raw.adjustments.as_ref().and_then(signed_from_scalar),
            total_price: raw.total_price.as_ref().and_then(price_from_scalar),
            packages: None,
            status: normalize_status(raw.status.as_deref()),
            availability_date: clean_text(raw.availability_date.as_deref()),
            dealer_name: clean_text(raw.dealer_name.as_deref())
                .or_else(|| self.dealer_name.clone()),
            dealer_url: clean_text(raw.dealer_url.as_deref()).or_else(|| self.dealer_url.clone()),
            detail_url: clean_text(raw.detail_url.as_deref()),
            scraped_at: None,
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
