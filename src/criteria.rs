//! Search criteria and results-page URLs

use std::fmt;
use std::str::FromStr;
use url::Url;

pub const VEHICLES_BASE: &str = "https://www.otomoto.pl/osobowe/";
pub const HOUSING_BASE: &str = "https://www.otodom.pl/pl/oferty/sprzedaz/mieszkanie/";
pub const JOBS_BASE: &str = "https://nofluffjobs.com/pl/";

/// Cities with a housing results page
pub const CITIES: [&str; 11] = [
    "warszawa",
    "lodz",
    "krakow",
    "poznan",
    "wroclaw",
    "gdansk",
    "szczecin",
    "bydgoszcz",
    "lublin",
    "bialystok",
    "katowice",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketType {
    Primary,
    Secondary,
}

impl MarketType {
    fn query_value(self) -> &'static str {
        match self {
            MarketType::Primary => "PRIMARY",
            MarketType::Secondary => "SECONDARY",
        }
    }
}

impl FromStr for MarketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" | "pierwotny" => Ok(MarketType::Primary),
            "secondary" | "wtorny" => Ok(MarketType::Secondary),
            other => Err(format!("unknown market type: {}", other)),
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

/// What one harvest run searches for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    Vehicles {
        brand: String,
    },
    Housing {
        market: Option<MarketType>,
        city: String,
        limit: u32,
    },
    Jobs {
        category: String,
    },
}

impl SearchCriteria {
    /// URL of the given results page (1-based)
    pub fn page_url(&self, page: u32) -> String {
        match self {
            SearchCriteria::Vehicles { brand } => {
                paged_url(VEHICLES_BASE, brand, &[], page)
            }
            SearchCriteria::Housing {
                market,
                city,
                limit,
            } => {
                let limit = limit.to_string();
                let mut query: Vec<(&str, &str)> = Vec::new();
                if let Some(market) = market {
                    query.push(("market", market.query_value()));
                }
                query.push(("limit", limit.as_str()));
                paged_url(HOUSING_BASE, city, &query, page)
            }
            SearchCriteria::Jobs { category } => paged_url(JOBS_BASE, category, &[], page),
        }
    }
}

fn paged_url(base: &str, segment: &str, query: &[(&str, &str)], page: u32) -> String {
    let page = page.to_string();
    // The bases are constants, so only the segment can make this fail
    match Url::parse(base).and_then(|b| b.join(segment.trim_matches('/'))) {
        Ok(mut url) => {
            {
                let mut pairs = url.query_pairs_mut();
                for (k, v) in query {
                    pairs.append_pair(k, v);
                }
                pairs.append_pair("page", &page);
            }
            url.to_string()
        }
        Err(_) => format!("{}{}?page={}", base, segment, page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_url() {
        let c = SearchCriteria::Vehicles {
            brand: "audi".to_string(),
        };
        assert_eq!(c.page_url(2), "https://www.otomoto.pl/osobowe/audi?page=2");
    }

    #[test]
    fn test_housing_url_with_market() {
        let c = SearchCriteria::Housing {
            market: Some(MarketType::Secondary),
            city: "krakow".to_string(),
            limit: 24,
        };
        assert_eq!(
            c.page_url(1),
            "https://www.otodom.pl/pl/oferty/sprzedaz/mieszkanie/krakow?market=SECONDARY&limit=24&page=1"
        );
    }

    #[test]
    fn test_housing_url_without_market() {
        let c = SearchCriteria::Housing {
            market: None,
            city: "lodz".to_string(),
            limit: 36,
        };
        assert_eq!(
            c.page_url(3),
            "https://www.otodom.pl/pl/oferty/sprzedaz/mieszkanie/lodz?limit=36&page=3"
        );
    }

    #[test]
    fn test_jobs_urls_are_sequential() {
        let c = SearchCriteria::Jobs {
            category: "backend".to_string(),
        };
        assert_eq!(c.page_url(1), "https://nofluffjobs.com/pl/backend?page=1");
        assert_eq!(c.page_url(2), "https://nofluffjobs.com/pl/backend?page=2");
    }

    #[test]
    fn test_market_type_parsing() {
        assert_eq!("wtorny".parse::<MarketType>().unwrap(), MarketType::Secondary);
        assert_eq!("PRIMARY".parse::<MarketType>().unwrap(), MarketType::Primary);
        assert!("rental".parse::<MarketType>().is_err());
    }
}
