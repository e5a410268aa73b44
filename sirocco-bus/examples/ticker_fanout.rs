//! Fans simulated ticker feeds out to two subscribers.
//!
//! Run with:
//!
//! ```bash
//! cargo run --example ticker_fanout
//! ```

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use rust_decimal_macros::dec;
use tokio_stream::wrappers::IntervalStream;

use sirocco_bus::MarketEventBus;
use sirocco_core::data::Ticker;
use sirocco_core::error::FeedError;
use sirocco_core::feed::{FeedKey, InstrumentSpec, MarketEvent, TickerEvent};
use sirocco_core::traits::FeedManager;
use sirocco_core::types::{AssetCode, ExchangeId, Price, SubscriberId, Timestamp};

/// Toy upstream: every feed produces a ticker every 100ms with a slowly
/// drifting price.
struct SimulatedFeedManager;

impl FeedManager for SimulatedFeedManager {
    fn update_subscriptions(&self, keys: HashSet<FeedKey>) -> Result<(), FeedError> {
        tracing::info!(feeds = keys.len(), "upstream reconciled");
        Ok(())
    }

    fn stream(&self, key: &FeedKey) -> BoxStream<'static, MarketEvent> {
        let instrument = key.instrument.clone();
        let interval = tokio::time::interval(Duration::from_millis(100));
        IntervalStream::new(interval)
            .enumerate()
            .map(move |(i, _)| {
                let last = Price::new(dec!(42000) + rust_decimal::Decimal::from(i as u64)).unwrap();
                MarketEvent::Ticker(TickerEvent {
                    instrument: instrument.clone(),
                    ticker: Ticker::new(last, last, last, Timestamp::now()),
                })
            })
            .boxed()
    }
}

fn pair(base: &str) -> InstrumentSpec {
    InstrumentSpec::new(
        ExchangeId::new("simulated").unwrap(),
        AssetCode::new(base).unwrap(),
        AssetCode::new("USDT").unwrap(),
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bus = Arc::new(MarketEventBus::new(Arc::new(SimulatedFeedManager)));

    // Two subscribers share the BTC feed; only one union goes upstream.
    let alice = SubscriberId::new("alice").unwrap();
    let bob = SubscriberId::new("bob").unwrap();
    bus.change_subscriptions(
        &alice,
        HashSet::from([FeedKey::ticker(pair("BTC")), FeedKey::ticker(pair("ETH"))]),
    )
    .unwrap();
    bus.change_subscriptions(&bob, HashSet::from([FeedKey::ticker(pair("BTC"))]))
        .unwrap();

    let mut alice_stream = bus.get_tickers(&alice).take(6);
    while let Some(event) = alice_stream.next().await {
        tracing::info!(
            instrument = %event.instrument,
            last = %event.ticker.last,
            "alice saw ticker"
        );
    }

    // Bob binds a callback instead of consuming a stream directly.
    bus.register_callback(FeedKey::ticker(pair("BTC")), &bob, |event| {
        if let MarketEvent::Ticker(ticker) = event {
            tracing::info!(
                instrument = %ticker.instrument,
                last = %ticker.ticker.last,
                "bob's callback fired"
            );
        }
    })
    .unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    // Departures close feeds once the last holder leaves.
    bus.unregister_callbacks(&bob).unwrap();
    bus.clear_subscriptions(&alice).unwrap();
}
