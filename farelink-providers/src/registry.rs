use crate::airasia::AirAsiaAdapter;
use crate::batik::BatikAirAdapter;
use crate::garuda::GarudaAdapter;
use crate::lion::LionAirAdapter;
use crate::source::FileSource;
use farelink_core::adapter::ProviderAdapter;
use farelink_core::airports::AirportRegistry;
use farelink_store::app_config::ProvidersConfig;
use std::sync::Arc;
use std::time::Duration;

/// Typed registry of every provider adapter, enumerated once at startup.
pub struct ProviderRegistry {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Wire the full provider set from configuration, with file-backed
    /// sources and one shared airport registry.
    pub fn from_config(config: &ProvidersConfig, airports: Arc<AirportRegistry>) -> Self {
        let garuda = GarudaAdapter::new(
            Arc::new(FileSource::new(&config.garuda.data_path)),
            airports.clone(),
            Duration::from_millis(config.garuda.deadline_ms),
        );
        let lion = LionAirAdapter::new(
            Arc::new(FileSource::new(&config.lion_air.data_path)),
            Duration::from_millis(config.lion_air.deadline_ms),
        );
        let batik = BatikAirAdapter::new(
            Arc::new(FileSource::new(&config.batik_air.data_path)),
            airports.clone(),
            Duration::from_millis(config.batik_air.deadline_ms),
        );
        let airasia = AirAsiaAdapter::new(
            Arc::new(FileSource::new(&config.air_asia.data_path)),
            airports,
            Duration::from_millis(config.air_asia.deadline_ms),
        );

        Self::new(vec![
            Arc::new(garuda),
            Arc::new(lion),
            Arc::new(batik),
            Arc::new(airasia),
        ])
    }

    pub fn all(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.adapters
    }

    /// Adapters matching the allow-list, or every adapter when the list is
    /// empty. Names are matched case-insensitively against provider codes;
    /// unknown names are ignored.
    pub fn select(&self, allow_list: &[String]) -> Vec<Arc<dyn ProviderAdapter>> {
        if allow_list.is_empty() {
            return self.adapters.clone();
        }
        self.adapters
            .iter()
            .filter(|adapter| {
                allow_list
                    .iter()
                    .any(|name| adapter.kind().code().eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSource;
    use farelink_core::provider::ProviderKind;

    fn registry() -> ProviderRegistry {
        let airports = Arc::new(AirportRegistry::new());
        ProviderRegistry::new(vec![
            Arc::new(GarudaAdapter::new(
                Arc::new(StaticSource::new("{}")),
                airports.clone(),
                Duration::from_secs(2),
            )),
            Arc::new(LionAirAdapter::new(
                Arc::new(StaticSource::new("{}")),
                Duration::from_secs(2),
            )),
            Arc::new(BatikAirAdapter::new(
                Arc::new(StaticSource::new("{}")),
                airports.clone(),
                Duration::from_secs(2),
            )),
            Arc::new(AirAsiaAdapter::new(
                Arc::new(StaticSource::new("{}")),
                airports,
                Duration::from_secs(2),
            )),
        ])
    }

    #[test]
    fn test_empty_allow_list_selects_all() {
        assert_eq!(registry().select(&[]).len(), 4);
    }

    #[test]
    fn test_allow_list_is_case_insensitive_and_ignores_unknowns() {
        let selected = registry().select(&[
            "garuda".to_string(),
            "LIONAIR".to_string(),
            "Sriwijaya".to_string(),
        ]);
        let kinds: Vec<ProviderKind> = selected.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![ProviderKind::Garuda, ProviderKind::LionAir]);
    }
}
