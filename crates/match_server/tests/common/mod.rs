#![allow(dead_code)]

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use chess_core::Color;
use match_server::{
    ChannelNotifier, ConnId, ManualClock, MatchService, Registry, RequestMatchOutcome,
    ServerConfig, ServerEvent,
};

pub struct Table {
    pub service: Arc<MatchService>,
    pub clock: Arc<ManualClock>,
    pub events: Receiver<(ConnId, ServerEvent)>,
    pub white: ConnId,
    pub black: ConnId,
}

impl Table {
    pub fn drain(&self) -> Vec<(ConnId, ServerEvent)> {
        self.events.try_iter().collect()
    }
}

pub fn service_with(
    config: ServerConfig,
) -> (Arc<MatchService>, Arc<ManualClock>, Receiver<(ConnId, ServerEvent)>) {
    let clock = Arc::new(ManualClock::new(0));
    let (notifier, rx) = ChannelNotifier::new();
    let service = MatchService::with_parts(
        Arc::new(Registry::with_seed(42)),
        clock.clone(),
        Arc::new(notifier),
        config,
    );
    (Arc::new(service), clock, rx)
}

/// A service with one match already running between conns 1 and 2.
pub fn paired_with(config: ServerConfig) -> Table {
    let (service, clock, events) = service_with(config);
    assert_eq!(service.request_match(ConnId(1), "alice"), RequestMatchOutcome::Waiting);
    let RequestMatchOutcome::Started(started) = service.request_match(ConnId(2), "bob") else {
        panic!("second request should pair");
    };
    let (white, black) = match started.color {
        Color::White => (ConnId(2), ConnId(1)),
        Color::Black => (ConnId(1), ConnId(2)),
    };
    let table = Table { service, clock, events, white, black };
    table.drain();
    table
}

pub fn paired() -> Table {
    paired_with(ServerConfig::default())
}
