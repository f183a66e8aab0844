//! Startup state shared by every run: configuration, exchange rates, the
//! price catalog and the location client.

use anyhow::Context;
use locsync_core::{AppConfig, ExchangeRateTable, PriceCatalog};
use locsync_fetch::{FileCache, LocationClient};

pub(crate) struct App {
    pub config: AppConfig,
    pub prices: PriceCatalog,
    pub client: LocationClient,
}

impl App {
    /// Load exchange rates and prices from the config directory and build the
    /// HTTP client. Both files are read once; daemon cycles reuse them.
    ///
    /// # Errors
    ///
    /// Fails when either file is unreadable or malformed, when the display
    /// currency has no exchange rate, or when the HTTP client cannot be built.
    pub(crate) fn init(config: AppConfig) -> anyhow::Result<Self> {
        let rates = ExchangeRateTable::load(&config.exchange_rates_path())?;
        rates.require(&config.currency).with_context(|| {
            format!(
                "configured currency {} has no exchange rate in {}",
                config.currency,
                config.exchange_rates_path().display()
            )
        })?;

        let (prices, warnings) =
            PriceCatalog::load(&config.prices_path(), &config.currency, &rates)?;
        if !warnings.is_empty() {
            tracing::warn!(
                count = warnings.len(),
                "some prices could not be converted and are shown unconverted"
            );
        }
        tracing::debug!(countries = prices.len(), currency = %prices.display_currency(), "loaded prices");

        let client = LocationClient::new(
            config.request_timeout_secs,
            &config.user_agent,
            Box::new(FileCache::new(config.cache_path.clone())),
        )?;

        Ok(Self {
            config,
            prices,
            client,
        })
    }
}
