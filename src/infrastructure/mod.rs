pub mod binance;
pub mod core;
pub mod exchange_rate;
pub mod repositories;
pub mod settings_persistence;
pub mod upbit;

pub use binance::BinanceTickerClient;
pub use exchange_rate::ExchangeRateClient;
pub use repositories::InMemoryPreferenceStore;
pub use settings_persistence::SettingsPersistence;
pub use upbit::UpbitTickerClient;
