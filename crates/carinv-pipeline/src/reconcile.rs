//! Derived pricing fields. Only fields the adapter left empty are filled, so
//! platform-published figures always win over the formulas here.

use carinv_core::{CanonicalRecord, Package};

/// Fills `total_packages_price`, `dealer_accessories_price`, `base_price` and
/// `adjustments` on `record` where they are still absent.
///
/// Factory packages are read from `record.packages`; `accessories` is the
/// dealer-installed bucket from classification, which the record itself does
/// not carry.
pub fn reconcile_prices(record: &mut CanonicalRecord, accessories: &[Package]) {
    if record.total_packages_price.is_none() {
        record.total_packages_price = sum_prices(record.packages.as_deref().unwrap_or_default());
    }

    if record.dealer_accessories_price.is_none() {
        record.dealer_accessories_price = sum_prices(accessories);
    }

    if record.base_price.is_none() {
        record.base_price = record.msrp.and_then(|msrp| {
            msrp.checked_sub(record.total_packages_price.unwrap_or(0))
                .filter(|&base| base > 0)
        });
    }

    if record.adjustments.is_none() {
        record.adjustments = match (record.msrp, record.total_price) {
            (Some(msrp), Some(total)) if msrp != total => {
                let accessories = i64::from(record.dealer_accessories_price.unwrap_or(0));
                Some(i64::from(total) - i64::from(msrp) - accessories).filter(|&adj| adj != 0)
            }
            _ => None,
        };
    }
}

/// Sum of present prices; `None` when the sum is zero or overflows `u32`.
fn sum_prices(packages: &[Package]) -> Option<u32> {
    let total: u64 = packages
        .iter()
        .filter_map(|p| p.price)
        .map(u64::from)
        .sum();
    u32::try_from(total).ok().filter(|&sum| sum != 0)
}
