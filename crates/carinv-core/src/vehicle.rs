use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical drivetrain token. Serialized as the short uppercase form
/// (`"AWD"`, `"4X4"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Drivetrain {
    #[serde(rename = "AWD")]
    Awd,
    #[serde(rename = "4WD")]
    FourWd,
    #[serde(rename = "4X4")]
    FourByFour,
    #[serde(rename = "FWD")]
    Fwd,
    #[serde(rename = "RWD")]
    Rwd,
    #[serde(rename = "4X2")]
    FourByTwo,
}

impl Drivetrain {
    /// Short tokens in the order they are scanned for inside longer strings.
    pub const TOKENS: [Drivetrain; 6] = [
        Drivetrain::Awd,
        Drivetrain::FourWd,
        Drivetrain::Fwd,
        Drivetrain::Rwd,
        Drivetrain::FourByFour,
        Drivetrain::FourByTwo,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Drivetrain::Awd => "AWD",
            Drivetrain::FourWd => "4WD",
            Drivetrain::FourByFour => "4X4",
            Drivetrain::Fwd => "FWD",
            Drivetrain::Rwd => "RWD",
            Drivetrain::FourByTwo => "4X2",
        }
    }

    /// Exact, case-insensitive match against the short token form.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let upper = token.trim().to_uppercase();
        Self::TOKENS.into_iter().find(|d| d.as_str() == upper)
    }
}

impl std::fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar as adapters deliver it: a JSON number or a display string such as
/// `"$48,714"` or `"-$1,200"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for RawScalar {
    fn from(value: &str) -> Self {
        RawScalar::Text(value.to_owned())
    }
}

impl From<i64> for RawScalar {
    fn from(value: i64) -> Self {
        RawScalar::Integer(value)
    }
}

/// Adapters emit `null` for fields they could not fill; treat it like a
/// missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `{name, price}` option line exactly as an adapter scraped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPackage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub price: Option<RawScalar>,
}

/// Sparse listing record produced by a platform extraction adapter.
///
/// Every field is optional. Pricing figures may be numbers or strings with
/// currency punctuation. Any of the derived pricing fields
/// (`base_price`, `total_packages_price`, `dealer_accessories_price`,
/// `adjustments`) may be pre-populated when the platform publishes an
/// authoritative value; the pipeline only fills the ones left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFieldSet {
    pub vin: Option<String>,
    pub stock_number: Option<String>,
    pub model_code: Option<String>,

    pub year: Option<RawScalar>,
    pub trim: Option<String>,
    pub drivetrain: Option<String>,

    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,

    pub msrp: Option<RawScalar>,
    pub base_price: Option<RawScalar>,
    pub total_packages_price: Option<RawScalar>,
    pub dealer_accessories_price: Option<RawScalar>,
    pub adjustments: Option<RawScalar>,
    pub total_price: Option<RawScalar>,

    /// Option lines still to be classified.
    #[serde(deserialize_with = "null_as_default")]
    pub packages: Vec<RawPackage>,
    /// Option lines the adapter already identified as dealer-installed.
    #[serde(deserialize_with = "null_as_default")]
    pub dealer_accessories: Vec<RawPackage>,

    pub status: Option<String>,
    pub availability_date: Option<String>,

    pub dealer_name: Option<String>,
    pub dealer_url: Option<String>,
    pub detail_url: Option<String>,
}

/// A factory package or dealer accessory after name normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Option<u32>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The normalized vehicle entity emitted in the inventory report.
///
/// Zero never appears in an integer field: absent and zero are the same
/// thing. Only `adjustments` may be negative (dealer discount).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivetrain: Option<Drivetrain>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exterior_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interior_color: Option<String>,

    /// Total sticker price (MSRP/TSRP) including factory packages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msrp: Option<u32>,
    /// Sticker price minus factory packages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_packages_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_accessories_price: Option<u32>,
    /// Unexplained dealer pricing: negative is a discount, positive a markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<i64>,
    /// Advertised selling price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<u32>,

    /// Factory packages; `None` rather than an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<Package>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
}
