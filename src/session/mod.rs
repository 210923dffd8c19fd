pub mod providers;

use crate::config::Config;
use ::anyhow::Result;

pub use providers::interface::SessionStore;

pub fn make_provider(config: &Config) -> Result<Box<dyn SessionStore>> {
    match config.session_interface.as_str() {
        "memory" => {
            let capacity = ::std::num::NonZeroUsize::new(
                config.session_capacity,
            )
            .ok_or_else(|| {
                ::anyhow::anyhow!("SESSION_CAPACITY must be greater than zero")
            })?;

            ::log::info!(
                "memory session store with capacity {} and ttl {}s",
                capacity,
                config.session_ttl_seconds
            );

            Ok(Box::new(providers::memory::MemoryProvider::new(
                capacity,
                ::std::time::Duration::from_secs(config.session_ttl_seconds),
            )))
        }
        "noop" => {
            ::log::info!("No session store selected");
            Ok(Box::new(providers::noop::NoopProvider::new()))
        }
        interface => {
            Err(::anyhow::anyhow!("Unknown session interface: {}", interface))
        }
    }
}

#[cfg(test)]
mod tests {
    use ::envconfig::Envconfig;
    use ::std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> crate::config::Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        crate::config::Config::init_from_hashmap(&map).unwrap()
    }

    #[test]
    fn test_make_provider() {
        assert!(super::make_provider(&config(&[])).is_ok());
        assert!(
            super::make_provider(&config(&[("SESSION_INTERFACE", "noop")]))
                .is_ok()
        );
        assert!(
            super::make_provider(&config(&[("SESSION_INTERFACE", "redis")]))
                .is_err()
        );
        assert!(
            super::make_provider(&config(&[("SESSION_CAPACITY", "0")]))
                .is_err()
        );
    }
}
