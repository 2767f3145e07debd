// src/services/vehicles.rs
//
// Proxy da API vPIC da NHTSA para o formulário de veículo (ano/marca/modelo).
// Colaborador opaco: qualquer resposta estranha vira erro de upstream.

use std::time::Duration;

use serde::Deserialize;

use crate::common::error::AppError;

const VPIC_BASE: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
const VPIC_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct VpicResponse<T> {
    #[serde(rename = "Results", default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct VpicMake {
    #[serde(rename = "MakeName")]
    make_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VpicModel {
    #[serde(rename = "Model_Name")]
    model_name: Option<String>,
}

#[derive(Clone)]
pub struct VehicleLookup {
    client: reqwest::Client,
}

impl VehicleLookup {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(VPIC_TIMEOUT_SECS))
            .user_agent("pitstop-backend/1.0")
            .build()?;

        Ok(Self { client })
    }

    pub async fn makes(&self) -> Result<Vec<String>, AppError> {
        let url = format!("{}/GetMakesForVehicleType/car?format=json", VPIC_BASE);
        let response: VpicResponse<VpicMake> = self.fetch_json(&url).await?;

        let names = response
            .results
            .into_iter()
            .filter_map(|m| m.make_name)
            .collect();

        Ok(Self::dedupe_sorted(names))
    }

    pub async fn models(&self, year: &str, make: &str) -> Result<Vec<String>, AppError> {
        let url = format!(
            "{}/GetModelsForMakeYear/make/{}/modelyear/{}?format=json",
            VPIC_BASE,
            urlencode(make),
            urlencode(year),
        );
        let response: VpicResponse<VpicModel> = self.fetch_json(&url).await?;

        let names = response
            .results
            .into_iter()
            .filter_map(|m| m.model_name)
            .collect();

        Ok(Self::dedupe_sorted(names))
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("vPIC fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamError(format!(
                "vPIC returned status {}",
                status
            )));
        }

        // O vPIC às vezes responde HTML com status 200; não engolir isso
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::UpstreamError(format!("vPIC returned non-JSON: {}", e)))
    }

    fn dedupe_sorted(mut names: Vec<String>) -> Vec<String> {
        names.retain(|n| !n.trim().is_empty());
        names.sort();
        names.dedup();
        names
    }
}

// Escape mínimo para os segmentos de path da URL do vPIC.
// O percent-encoding é por byte UTF-8, não por scalar Unicode.
fn urlencode(raw: &str) -> String {
    let mut out = String::new();
    for &byte in raw.trim().as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapes_spaces_and_slashes() {
        assert_eq!(urlencode("Land Rover"), "Land%20Rover");
        assert_eq!(urlencode("A/B"), "A%2FB");
        assert_eq!(urlencode(" 2019 "), "2019");
    }

    #[test]
    fn urlencode_escapes_non_ascii_as_utf8_bytes() {
        assert_eq!(urlencode("Škoda"), "%C5%A0koda");
        assert_eq!(urlencode("Citroën"), "Citro%C3%ABn");
    }

    #[test]
    fn dedupe_sorted_drops_blanks_and_duplicates() {
        let names = vec![
            "Civic".to_string(),
            "Accord".to_string(),
            "Civic".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(
            VehicleLookup::dedupe_sorted(names),
            vec!["Accord".to_string(), "Civic".to_string()]
        );
    }

    #[test]
    fn vpic_payload_with_missing_results_defaults_to_empty() {
        let parsed: VpicResponse<VpicModel> = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
