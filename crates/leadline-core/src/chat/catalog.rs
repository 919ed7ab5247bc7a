use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BRAND_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub key: String,
    pub name: String,
    pub products: Vec<String>,
    /// Replaces the localized product question when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask_interest: Option<String>,
}

impl Brand {
    pub fn new(key: &str, name: &str, products: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            products: products.iter().map(|product| product.to_string()).collect(),
            ask_interest: None,
        }
    }

    pub fn with_ask_interest(mut self, question: &str) -> Self {
        self.ask_interest = Some(question.to_string());
        self
    }

    pub fn offers(&self, product: &str) -> bool {
        self.products.iter().any(|candidate| candidate == product)
    }
}

/// Preset answers to the country question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryChoice {
    Colombia,
    Usa,
    Canada,
    Spain,
    Other,
}

impl CountryChoice {
    pub const ALL: [CountryChoice; 5] = [
        CountryChoice::Colombia,
        CountryChoice::Usa,
        CountryChoice::Canada,
        CountryChoice::Spain,
        CountryChoice::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CountryChoice::Colombia => "colombia",
            CountryChoice::Usa => "usa",
            CountryChoice::Canada => "canada",
            CountryChoice::Spain => "spain",
            CountryChoice::Other => "other",
        }
    }

    /// Stored country name; `None` for `Other`, which asks for free text.
    pub fn canonical_name(&self) -> Option<&'static str> {
        match self {
            CountryChoice::Colombia => Some("Colombia"),
            CountryChoice::Usa => Some("USA"),
            CountryChoice::Canada => Some("Canada"),
            CountryChoice::Spain => Some("España"),
            CountryChoice::Other => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            CountryChoice::Colombia => 0,
            CountryChoice::Usa => 1,
            CountryChoice::Canada => 2,
            CountryChoice::Spain => 3,
            CountryChoice::Other => 4,
        }
    }
}

impl fmt::Display for CountryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CountryChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        CountryChoice::ALL
            .into_iter()
            .find(|choice| choice.key() == needle)
            .ok_or_else(|| format!("unknown country choice: {}", s.trim()))
    }
}

/// Calling code for a stored country name. Exact match only.
pub fn calling_code(country: &str) -> Option<&'static str> {
    match country {
        "Colombia" => Some("+57"),
        "USA" | "Canada" => Some("+1"),
        "España" => Some("+34"),
        _ => None,
    }
}

/// Lowercases `source` and drops everything outside `[a-z0-9]`.
pub fn brand_key(source: &str) -> String {
    source
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

/// Brand table consulted when a conversation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    brands: Vec<Brand>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        let lab_products = [
            "Empanadas Paisanas",
            "Colbrew",
            "Chococol",
            "Puntos de Venta",
        ];
        Self {
            brands: vec![
                Brand::new(
                    "colbrew",
                    "ColBrew Coffee",
                    &[
                        "Elixir Original",
                        "Nitro Infusion",
                        "Flavored Collection",
                        "Quiero ser Distribuidor",
                    ],
                ),
                Brand::new(
                    "chococol",
                    "ChocoCol",
                    &[
                        "Barras de Chocolate",
                        "Cacao en Polvo",
                        "Regalos Corporativos",
                        "Catas",
                    ],
                ),
                Brand::new(
                    "empanadaspaisanas",
                    "Empanada Paisana",
                    &["Empanadas", "Franquicias"],
                )
                .with_ask_interest("¿En qué podemos asesorarte el día de hoy?"),
                Brand::new("empanadaslab", "Empanadas Lab", &lab_products),
                Brand::new(DEFAULT_BRAND_KEY, "Empanadas Lab", &lab_products),
            ],
        }
    }

    /// Adds a brand, replacing any existing brand with the same key.
    pub fn with_brand(mut self, brand: Brand) -> Self {
        match self.brands.iter_mut().find(|existing| existing.key == brand.key) {
            Some(existing) => *existing = brand,
            None => self.brands.push(brand),
        }
        self
    }

    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    pub fn get(&self, key: &str) -> Option<&Brand> {
        self.brands.iter().find(|brand| brand.key == key)
    }

    pub fn default_brand(&self) -> &Brand {
        match self.get(DEFAULT_BRAND_KEY) {
            Some(brand) => brand,
            None => &self.brands[self.brands.len() - 1],
        }
    }

    pub fn brand_for_source(&self, source: &str) -> &Brand {
        self.get(&brand_key(source))
            .unwrap_or_else(|| self.default_brand())
    }
}

#[cfg(test)]
mod tests {
    use super::{brand_key, calling_code, Brand, Catalog, CountryChoice};

    #[test]
    fn brand_key_strips_non_alphanumerics() {
        assert_eq!(brand_key("ColBrew"), "colbrew");
        assert_eq!(brand_key("Empanadas Paisanas!"), "empanadaspaisanas");
        assert_eq!(brand_key("Chat Widget Web"), "chatwidgetweb");
    }

    #[test]
    fn unknown_source_uses_default_brand() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.brand_for_source("Chat Widget Web").name, "Empanadas Lab");
        assert_eq!(catalog.brand_for_source("Col-Brew").name, "ColBrew Coffee");
        let paisana = catalog.brand_for_source("empanadas paisanas");
        assert_eq!(paisana.products, vec!["Empanadas", "Franquicias"]);
        assert!(paisana.ask_interest.is_some());
    }

    #[test]
    fn configured_brand_overrides_builtin() {
        let catalog = Catalog::builtin()
            .with_brand(Brand::new("colbrew", "ColBrew", &["Cold Brew"]))
            .with_brand(Brand::new("acme", "Acme", &["Anvils"]));
        assert_eq!(catalog.brand_for_source("colbrew").products, vec!["Cold Brew"]);
        assert_eq!(catalog.brand_for_source("ACME").name, "Acme");
        assert_eq!(catalog.brands().len(), 6);
    }

    #[test]
    fn country_choices_map_to_canonical_names_and_codes() {
        assert_eq!("USA".parse::<CountryChoice>().unwrap(), CountryChoice::Usa);
        assert_eq!(CountryChoice::Spain.canonical_name(), Some("España"));
        assert_eq!(CountryChoice::Other.canonical_name(), None);
        assert_eq!(calling_code("Canada"), Some("+1"));
        assert_eq!(calling_code("España"), Some("+34"));
        assert_eq!(calling_code("colombia"), None);
        assert_eq!(calling_code("Mexico"), None);
    }
}
