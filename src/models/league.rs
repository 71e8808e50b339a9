use serde::{Deserialize, Serialize};

/// One entry of the league catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
    /// Country name, used to disambiguate leagues with the same name
    pub country: Option<String>,
}

impl League {
    /// Display label for menu buttons and the config view
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{} ({})", self.name, country),
            None => self.name.clone(),
        }
    }
}
