//! services/api/src/adapters/geo.rs
//!
//! This module contains the IP-geolocation adapter, implementing the
//! `GeoLocationService` port. Korean regions are translated to their Korean
//! names so the label feeds straight into the transport prompt; everywhere
//! else keeps the provider's English strings.

use async_trait::async_trait;
use serde::Deserialize;
use wander_persona_core::ports::{GeoLocationService, PortError, PortResult};

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    region: String,
    #[serde(default)]
    city: String,
}

const KOREAN_REGIONS: &[(&str, &str)] = &[
    ("Busan", "부산"),
    ("Seoul", "서울"),
    ("Daegu", "대구"),
    ("Incheon", "인천"),
    ("Gwangju", "광주"),
    ("Daejeon", "대전"),
    ("Ulsan", "울산"),
    ("Gyeonggi-do", "경기도"),
    ("Gangwon-do", "강원도"),
    ("Chungcheongbuk-do", "충청북도"),
    ("Chungcheongnam-do", "충청남도"),
    ("Jeollabuk-do", "전라북도"),
    ("Jeollanam-do", "전라남도"),
    ("Gyeongsangbuk-do", "경상북도"),
    ("Gyeongsangnam-do", "경상남도"),
    ("Jeju-do", "제주도"),
];

const CITY_BASES: &[(&str, &str)] = &[
    ("Suyeong", "수영"),
    ("Haeundae", "해운대"),
    ("Dongnae", "동래"),
    ("Jung", "중"),
    ("Seo", "서"),
    ("Yeonje", "연제"),
    ("Nam", "남"),
    ("Buk", "북"),
    ("Saha", "사하"),
    ("Sasang", "사상"),
    ("Geumjeong", "금정"),
    ("Busanjin", "부산진"),
];

fn korean_region(region: &str) -> Option<&'static str> {
    KOREAN_REGIONS
        .iter()
        .find(|(en, _)| *en == region)
        .map(|(_, ko)| *ko)
}

fn korean_city_base(base: &str) -> &str {
    CITY_BASES
        .iter()
        .find(|(en, _)| *en == base)
        .map(|(_, ko)| *ko)
        .unwrap_or(base)
}

/// Formats a provider region/city pair into the locale label used as the
/// trip's departure point.
fn format_label(region: &str, city: &str) -> String {
    let (region, city) = match korean_region(region) {
        Some(korean) => {
            let city = if let Some(base) = city.strip_suffix("-gu") {
                format!("{}구", korean_city_base(base))
            } else if let Some(base) = city.strip_suffix("-si") {
                format!("{}시", korean_city_base(base))
            } else if let Some(base) = city.strip_suffix("-gun") {
                format!("{}군", korean_city_base(base))
            } else {
                city.to_string()
            };
            (korean.to_string(), city)
        }
        None => (region.to_string(), city.to_string()),
    };

    match (region.is_empty(), city.is_empty()) {
        (false, false) => format!("{region} - {city}"),
        (false, true) => region,
        (true, false) => city,
        (true, true) => String::new(),
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `GeoLocationService` port against an
/// ipapi-style JSON endpoint.
#[derive(Clone)]
pub struct IpGeoAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl IpGeoAdapter {
    /// Creates a new `IpGeoAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

//=========================================================================================
// `GeoLocationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GeoLocationService for IpGeoAdapter {
    async fn locate(&self, ip: &str) -> PortResult<String> {
        let url = format!("{}/{}/json/", self.base_url.trim_end_matches('/'), ip);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("geolocation lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "geolocation lookup returned {}",
                response.status()
            )));
        }

        let geo: GeoResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("unreadable geolocation response: {e}")))?;

        Ok(format_label(&geo.region, &geo.city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_regions_and_gu_cities_are_translated() {
        assert_eq!(format_label("Busan", "Haeundae-gu"), "부산 - 해운대구");
        assert_eq!(format_label("Jeollanam-do", "Suncheon-si"), "전라남도 - Suncheon시");
        assert_eq!(format_label("Gyeonggi-do", ""), "경기도");
    }

    #[test]
    fn non_korean_locations_pass_through_untranslated() {
        assert_eq!(format_label("California", "San Jose"), "California - San Jose");
        assert_eq!(format_label("", "Osaka"), "Osaka");
        assert_eq!(format_label("", ""), "");
    }
}
