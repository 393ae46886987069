//! Static country reference table.
//!
//! Loaded once into the binary and never mutated. The table order is the order
//! in which countries appear in selectors and global listings.

use super::CountryCode;

/// Prefix shared by every per-country dataset file.
pub const DATASET_PREFIX: &str = "suite-of-food-security-indicators_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryInfo {
    pub code: CountryCode,
    pub display_name: &'static str,
    pub iso_alpha3: &'static str,
    pub iso_alpha2: &'static str,
    pub flag_glyph: &'static str,
}

impl CountryInfo {
    /// Remote file name, e.g. `suite-of-food-security-indicators_afg.csv`.
    pub fn resource_name(&self) -> String {
        format!("{DATASET_PREFIX}{}.csv", self.code.as_str())
    }

    /// Flag image address under `flag_base_url` (`{base}/{iso2}.svg`).
    pub fn flag_url(&self, flag_base_url: &str) -> String {
        format!(
            "{}/{}.svg",
            flag_base_url.trim_end_matches('/'),
            self.iso_alpha2.to_ascii_lowercase()
        )
    }

    /// `🇦🇫 Afghanistan`
    pub fn label(&self) -> String {
        format!("{} {}", self.flag_glyph, self.display_name)
    }
}

const fn country(
    code: &'static str,
    display_name: &'static str,
    iso_alpha3: &'static str,
    iso_alpha2: &'static str,
    flag_glyph: &'static str,
) -> CountryInfo {
    CountryInfo {
        code: CountryCode::from_static(code),
        display_name,
        iso_alpha3,
        iso_alpha2,
        flag_glyph,
    }
}

pub static COUNTRIES: &[CountryInfo] = &[
    country("afg", "Afghanistan", "AFG", "AF", "🇦🇫"),
    country("aze", "Azerbaijan", "AZE", "AZ", "🇦🇿"),
    country("bra", "Brazil", "BRA", "BR", "🇧🇷"),
    country("can", "Canada", "CAN", "CA", "🇨🇦"),
    country("chn", "China", "CHN", "CN", "🇨🇳"),
    country("dza", "Algeria", "DZA", "DZ", "🇩🇿"),
    country("egy", "Egypt", "EGY", "EG", "🇪🇬"),
    country("esp", "Spain", "ESP", "ES", "🇪🇸"),
    country("gha", "Ghana", "GHA", "GH", "🇬🇭"),
    country("ind", "India", "IND", "IN", "🇮🇳"),
    country("irn", "Iran", "IRN", "IR", "🇮🇷"),
    country("ita", "Italy", "ITA", "IT", "🇮🇹"),
    country("jpn", "Japan", "JPN", "JP", "🇯🇵"),
    country("ken", "Kenya", "KEN", "KE", "🇰🇪"),
    country("kor", "South Korea", "KOR", "KR", "🇰🇷"),
    country("mng", "Mongolia", "MNG", "MN", "🇲🇳"),
    country("mys", "Malaysia", "MYS", "MY", "🇲🇾"),
    country("nga", "Nigeria", "NGA", "NG", "🇳🇬"),
    country("nld", "Netherlands", "NLD", "NL", "🇳🇱"),
    country("pak", "Pakistan", "PAK", "PK", "🇵🇰"),
    country("phl", "Philippines", "PHL", "PH", "🇵🇭"),
    country("pol", "Poland", "POL", "PL", "🇵🇱"),
    country("prt", "Portugal", "PRT", "PT", "🇵🇹"),
    country("rus", "Russia", "RUS", "RU", "🇷🇺"),
    country("swe", "Sweden", "SWE", "SE", "🇸🇪"),
    country("twn", "Taiwan", "TWN", "TW", "🇹🇼"),
    country("usa", "United States", "USA", "US", "🇺🇸"),
    country("ven", "Venezuela", "VEN", "VE", "🇻🇪"),
    country("yem", "Yemen", "YEM", "YE", "🇾🇪"),
    country("zmb", "Zambia", "ZMB", "ZM", "🇿🇲"),
];

/// Look a country up by its dataset code.
pub fn lookup(code: CountryCode) -> Option<&'static CountryInfo> {
    COUNTRIES.iter().find(|c| c.code == code)
}

/// Resolve user input: dataset code, ISO alpha-2/alpha-3, or display name
/// (all case-insensitive).
pub fn find(query: &str) -> Option<&'static CountryInfo> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    COUNTRIES.iter().find(|c| {
        c.code.as_str().eq_ignore_ascii_case(q)
            || c.iso_alpha3.eq_ignore_ascii_case(q)
            || c.iso_alpha2.eq_ignore_ascii_case(q)
            || c.display_name.eq_ignore_ascii_case(q)
    })
}

/// Reverse of [`CountryInfo::resource_name`].
pub fn from_resource_name(name: &str) -> Option<&'static CountryInfo> {
    let code = name.strip_prefix(DATASET_PREFIX)?.strip_suffix(".csv")?;
    lookup(CountryCode::new(code)?)
}
